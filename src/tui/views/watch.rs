use std::collections::HashSet;

use log::debug;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, List, ListState};
use ratatui::Frame;

use crate::engine::variable::{Variable, VariableKind};
use crate::tui::views::{flatten_tree, needs_unfold, tree_list_items};
use crate::vartree::columns;
use crate::vartree::insert::ensure_members;
use crate::vartree::scope::{ScopeError, ScopePartitioner};
use crate::vartree::store::{NodeId, StoreError, TreeStore};
use crate::vartree::update::{update_node, UpdateError};
use crate::vartree::variable_schema;

/// Errors surfaced while refreshing a monitored expression
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error(transparent)]
    Scope(#[from] ScopeError),
    #[error(transparent)]
    Update(#[from] UpdateError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Expression monitor panel.
///
/// User-added expressions are re-evaluated on every stop; the scope
/// partitioner keeps each one under exactly one of the "In scope" /
/// "Out of scope" anchors as the inferior moves between frames.
pub struct WatchView {
    store: TreeStore,
    partitioner: ScopePartitioner,
    expanded: HashSet<NodeId>,
    monitored: Vec<String>,
    /// Expressions never rendered yet; their first value is not a change
    fresh: HashSet<String>,
    pub selected: usize,
}

impl WatchView {
    pub fn new() -> Self {
        let mut store = TreeStore::new(variable_schema());
        let in_scope = store.append(None).expect("fresh store accepts anchors");
        store
            .set_text(in_scope, columns::NAME, "In scope")
            .expect("anchor name");
        let out_of_scope = store.append(None).expect("fresh store accepts anchors");
        store
            .set_text(out_of_scope, columns::NAME, "Out of scope")
            .expect("anchor name");

        let mut expanded = HashSet::new();
        expanded.insert(in_scope);
        expanded.insert(out_of_scope);

        Self {
            store,
            partitioner: ScopePartitioner::new(in_scope, out_of_scope),
            expanded,
            monitored: Vec::new(),
            fresh: HashSet::new(),
            selected: 0,
        }
    }

    pub fn store(&self) -> &TreeStore {
        &self.store
    }

    /// Expressions in add order
    pub fn expressions(&self) -> &[String] {
        &self.monitored
    }

    pub fn is_monitored(&self, expression: &str) -> bool {
        self.monitored.iter().any(|e| e == expression)
    }

    /// Start monitoring an expression; false if already monitored
    pub fn add(&mut self, expression: &str) -> bool {
        if self.is_monitored(expression) {
            return false;
        }
        self.monitored.push(expression.to_string());
        self.fresh.insert(expression.to_string());
        true
    }

    /// Stop monitoring an expression and drop its row
    pub fn remove(&mut self, expression: &str) -> Result<bool, WatchError> {
        let Some(position) = self.monitored.iter().position(|e| e == expression) else {
            return Ok(false);
        };
        self.monitored.remove(position);
        self.fresh.remove(expression);
        let probe = Variable::new(expression, VariableKind::Monitored);
        self.partitioner.remove(&mut self.store, &probe)?;
        Ok(true)
    }

    /// Land an evaluation for one monitored expression.
    ///
    /// Partitions the row by the reported scope flag, rebuilds members if
    /// the shape moved, and refreshes the cells. The first evaluation of a
    /// newly added expression never counts as a change.
    pub fn apply_value(
        &mut self,
        qname: &str,
        variable: &Variable,
        is_new_frame: bool,
    ) -> Result<(), WatchError> {
        let (node, _anchor) = self.partitioner.partition(&mut self.store, variable)?;
        ensure_members(&mut self.store, node, variable)?;
        let handle_highlight = !self.fresh.remove(qname);
        update_node(
            &mut self.store,
            node,
            variable,
            handle_highlight,
            is_new_frame,
        )?;
        debug!(
            "\"{}\" now {}",
            qname,
            if variable.in_scope() {
                "in scope"
            } else {
                "out of scope"
            }
        );
        Ok(())
    }

    /// Land an unfold completion for a monitored pointer expression
    pub fn apply_unfold(
        &mut self,
        qname: &str,
        variable: &Variable,
        is_new_frame: bool,
    ) -> Result<bool, WatchError> {
        let anchors = [
            self.partitioner.in_scope_anchor(),
            self.partitioner.out_of_scope_anchor(),
        ];
        for anchor in anchors {
            if let Some(node) = crate::vartree::resolve::resolve(&self.store, anchor, qname)? {
                let rebuilt = ensure_members(&mut self.store, node, variable)?;
                update_node(&mut self.store, node, variable, !rebuilt, is_new_frame)?;
                self.expanded.insert(node);
                for child in self
                    .store
                    .children(Some(node))
                    .map(<[NodeId]>::to_vec)
                    .unwrap_or_default()
                {
                    self.expanded.insert(child);
                }
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn select_next(&mut self) {
        let rows = flatten_tree(&self.store, &self.expanded);
        if !rows.is_empty() {
            self.selected = (self.selected + 1).min(rows.len() - 1);
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Toggle expansion; returns an expression to unfold when the selected
    /// row is a pointer whose target has not been fetched
    pub fn toggle_selected(&mut self) -> Option<String> {
        let rows = flatten_tree(&self.store, &self.expanded);
        let row = rows.get(self.selected)?;
        if !row.expandable {
            return None;
        }
        if row.expanded {
            self.expanded.remove(&row.node);
            return None;
        }
        self.expanded.insert(row.node);
        if needs_unfold(&self.store, row.node) {
            let qname = self.store.text(row.node, columns::QNAME).ok()?;
            if !qname.is_empty() {
                return Some(qname.to_string());
            }
        }
        None
    }

    /// The selected row's expression, for unmonitoring from the keyboard
    pub fn selected_expression(&self) -> Option<String> {
        let rows = flatten_tree(&self.store, &self.expanded);
        let row = rows.get(self.selected)?;
        let qname = self.store.text(row.node, columns::QNAME).ok()?;
        if self.is_monitored(qname) {
            Some(qname.to_string())
        } else {
            None
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, focused: bool) {
        let rows = flatten_tree(&self.store, &self.expanded);
        let items = tree_list_items(&self.store, &rows);

        let block = Block::default()
            .title("Expression monitor")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if focused { Color::Green } else { Color::Gray }));

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(Some(self.selected.min(rows.len().saturating_sub(1))));
        f.render_stateful_widget(list, area, &mut state);
    }
}

impl Default for WatchView {
    fn default() -> Self {
        Self::new()
    }
}
