use std::collections::HashSet;

use log::warn;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, List, ListState};
use ratatui::Frame;

use crate::engine::variable::Variable;
use crate::tui::views::{flatten_tree, tree_list_items};
use crate::vartree::columns;
use crate::vartree::insert::{ensure_members, insert_variable};
use crate::vartree::store::{NodeId, TreeStore};
use crate::vartree::update::update_node;
use crate::vartree::variable_schema;

/// Global-variables panel; one anchor, refreshed on demand
pub struct GlobalsView {
    store: TreeStore,
    anchor: NodeId,
    expanded: HashSet<NodeId>,
    /// False until the first listing landed; first values are not changes
    populated: bool,
    pub selected: usize,
}

impl GlobalsView {
    pub fn new() -> Self {
        let mut store = TreeStore::new(variable_schema());
        let anchor = store.append(None).expect("fresh store accepts anchors");
        store
            .set_text(anchor, columns::NAME, "Global variables")
            .expect("anchor name");

        let mut expanded = HashSet::new();
        expanded.insert(anchor);

        Self {
            store,
            anchor,
            expanded,
            populated: false,
            selected: 0,
        }
    }

    pub fn store(&self) -> &TreeStore {
        &self.store
    }

    pub fn anchor(&self) -> NodeId {
        self.anchor
    }

    /// Apply a listed set of globals, highlighting changed values after
    /// the first population
    pub fn set_globals(&mut self, variables: &[Variable]) {
        let handle_highlight = self.populated;
        for variable in variables {
            let existing = self
                .store
                .children(Some(self.anchor))
                .map(<[NodeId]>::to_vec)
                .unwrap_or_default()
                .into_iter()
                .find(|child| {
                    self.store
                        .text(*child, columns::QNAME)
                        .map(|q| q == variable.qualified_name())
                        .unwrap_or(false)
                });
            let placed = match existing {
                Some(node) => ensure_members(&mut self.store, node, variable).map(|_| node),
                None => insert_variable(&mut self.store, self.anchor, variable),
            };
            let result = placed.map_err(Into::into).and_then(|node| {
                update_node(&mut self.store, node, variable, handle_highlight, false)
            });
            if let Err(err) = result {
                warn!("skipping global \"{}\": {}", variable.qualified_name(), err);
            }
        }
        self.populated = true;
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

    pub fn toggle_selected(&mut self) {
        let rows = flatten_tree(&self.store, &self.expanded);
        if let Some(row) = rows.get(self.selected) {
            if row.expandable {
                if row.expanded {
                    self.expanded.remove(&row.node);
                } else {
                    self.expanded.insert(row.node);
                }
            }
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, focused: bool) {
        let rows = flatten_tree(&self.store, &self.expanded);
        let items = tree_list_items(&self.store, &rows);

        let block = Block::default()
            .title("Globals")
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

impl Default for GlobalsView {
    fn default() -> Self {
        Self::new()
    }
}
