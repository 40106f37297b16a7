use std::collections::HashSet;

use log::{debug, warn};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, List, ListState};
use ratatui::Frame;

use crate::engine::variable::{Variable, VariableKind};
use crate::tui::views::{flatten_tree, needs_unfold, tree_list_items};
use crate::vartree::columns;
use crate::vartree::insert::{ensure_members, insert_variable};
use crate::vartree::resolve::resolve;
use crate::vartree::store::{NodeId, StoreError, TreeStore};
use crate::vartree::update::{update_node, UpdateError};
use crate::vartree::variable_schema;

/// Locals panel: the selected frame's variables under two fixed anchors,
/// "Local variables" and "Function arguments".
///
/// The anchors are created once and survive until the panel is dropped;
/// their contents are cleared and rebuilt whenever the inferior stops in a
/// different frame.
pub struct LocalsView {
    store: TreeStore,
    locals_anchor: NodeId,
    args_anchor: NodeId,
    expanded: HashSet<NodeId>,
    pub selected: usize,
}

impl LocalsView {
    pub fn new() -> Self {
        let mut store = TreeStore::new(variable_schema());
        let locals_anchor = store.append(None).expect("fresh store accepts anchors");
        store
            .set_text(locals_anchor, columns::NAME, "Local variables")
            .expect("anchor name");
        let args_anchor = store.append(None).expect("fresh store accepts anchors");
        store
            .set_text(args_anchor, columns::NAME, "Function arguments")
            .expect("anchor name");

        let mut expanded = HashSet::new();
        expanded.insert(locals_anchor);
        expanded.insert(args_anchor);

        Self {
            store,
            locals_anchor,
            args_anchor,
            expanded,
            selected: 0,
        }
    }

    pub fn store(&self) -> &TreeStore {
        &self.store
    }

    pub fn locals_anchor(&self) -> NodeId {
        self.locals_anchor
    }

    pub fn args_anchor(&self) -> NodeId {
        self.args_anchor
    }

    /// Throw away the rendered frame; called when the stop switched frames
    pub fn begin_frame(&mut self) -> Result<(), StoreError> {
        self.store.clear_children(self.locals_anchor)?;
        self.store.clear_children(self.args_anchor)?;
        self.expanded
            .retain(|node| self.store.contains(*node));
        self.selected = 0;
        Ok(())
    }

    /// Apply a freshly listed set of locals and arguments.
    ///
    /// Rows are inserted for new variables, refreshed in place for known
    /// ones, and dropped for variables the engine no longer reports. A
    /// variable whose update fails structurally is logged and skipped, the
    /// rest of the list still lands. Returns the pointer expressions whose
    /// targets were fetched earlier; the caller re-unfolds them so their
    /// member values stay fresh.
    pub fn set_locals(&mut self, variables: &[Variable], is_new_frame: bool) -> Vec<String> {
        let mut seen: Vec<(NodeId, String)> = Vec::new();

        for variable in variables {
            let anchor = self.anchor_for(variable.kind());
            match self.place(anchor, variable, is_new_frame) {
                Ok(_) => seen.push((anchor, variable.qualified_name().to_string())),
                Err(err) => {
                    warn!("skipping \"{}\": {}", variable.qualified_name(), err);
                }
            }
        }

        // Drop rows for variables that left the frame
        for anchor in [self.locals_anchor, self.args_anchor] {
            let stale: Vec<NodeId> = self
                .store
                .children(Some(anchor))
                .map(<[NodeId]>::to_vec)
                .unwrap_or_default()
                .into_iter()
                .filter(|child| {
                    let qname = self
                        .store
                        .text(*child, columns::QNAME)
                        .unwrap_or_default()
                        .to_string();
                    !seen.iter().any(|(a, q)| *a == anchor && *q == qname)
                })
                .collect();
            for node in stale {
                debug!("dropping out-of-frame row {}", node);
                let _ = self.store.erase(node);
            }
        }

        self.unfolded_pointers()
    }

    /// Pointer rows whose target was fetched earlier: a single starred
    /// child that already has members of its own
    fn unfolded_pointers(&self) -> Vec<String> {
        let mut out = Vec::new();
        for node in self.store.iter() {
            let Ok(children) = self.store.children(Some(node)) else {
                continue;
            };
            let [only] = children else {
                continue;
            };
            let starred = self
                .store
                .text(*only, columns::NAME)
                .map(|n| n.starts_with('*'))
                .unwrap_or(false);
            let fetched = self
                .store
                .children(Some(*only))
                .map(|c| !c.is_empty())
                .unwrap_or(false);
            if starred && fetched {
                if let Ok(qname) = self.store.text(node, columns::QNAME) {
                    if !qname.is_empty() {
                        out.push(qname.to_string());
                    }
                }
            }
        }
        out
    }

    /// Refresh one variable from a value-print completion
    pub fn apply_value(
        &mut self,
        qname: &str,
        variable: &Variable,
        is_new_frame: bool,
    ) -> Result<bool, UpdateError> {
        match self.find(qname)? {
            Some(node) => {
                ensure_members(&mut self.store, node, variable)?;
                update_node(&mut self.store, node, variable, true, is_new_frame)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Write a type-print completion into the row's type cell
    pub fn apply_type(&mut self, qname: &str, type_name: &str) -> Result<bool, StoreError> {
        match self.find(qname)? {
            Some(node) => {
                self.store.set_text(node, columns::TYPE, type_name)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Land an unfold completion: rebuild the pointer's subtree and expand
    /// it. Freshly built rows are populated without highlights; a re-unfold
    /// of an already fetched target highlights moved values.
    pub fn apply_unfold(
        &mut self,
        qname: &str,
        variable: &Variable,
        is_new_frame: bool,
    ) -> Result<bool, UpdateError> {
        match self.find(qname)? {
            Some(node) => {
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
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Locate a row under either anchor
    pub fn find(&self, qname: &str) -> Result<Option<NodeId>, StoreError> {
        if let Some(node) = resolve(&self.store, self.locals_anchor, qname)? {
            return Ok(Some(node));
        }
        resolve(&self.store, self.args_anchor, qname)
    }

    /// Move the selection down
    pub fn select_next(&mut self) {
        let rows = flatten_tree(&self.store, &self.expanded);
        if !rows.is_empty() {
            self.selected = (self.selected + 1).min(rows.len() - 1);
        }
    }

    /// Move the selection up
    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Toggle expansion of the selected row.
    ///
    /// Returns the qualified name to unfold when the row is a pointer
    /// whose target has not been fetched yet.
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

    pub fn render(&self, f: &mut Frame, area: Rect, focused: bool) {
        let rows = flatten_tree(&self.store, &self.expanded);
        let items = tree_list_items(&self.store, &rows);

        let block = Block::default()
            .title("Variables")
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

    fn anchor_for(&self, kind: VariableKind) -> NodeId {
        match kind {
            VariableKind::Argument => self.args_anchor,
            _ => self.locals_anchor,
        }
    }

    /// Insert-or-refresh one listed variable under its anchor
    fn place(
        &mut self,
        anchor: NodeId,
        variable: &Variable,
        is_new_frame: bool,
    ) -> Result<NodeId, UpdateError> {
        let existing = self
            .store
            .children(Some(anchor))?
            .iter()
            .copied()
            .find(|child| {
                self.store
                    .text(*child, columns::QNAME)
                    .map(|q| q == variable.qualified_name())
                    .unwrap_or(false)
            });
        let node = match existing {
            Some(node) => {
                ensure_members(&mut self.store, node, variable)?;
                node
            }
            None => insert_variable(&mut self.store, anchor, variable)?,
        };
        update_node(&mut self.store, node, variable, true, is_new_frame)?;
        Ok(node)
    }
}

impl Default for LocalsView {
    fn default() -> Self {
        Self::new()
    }
}
