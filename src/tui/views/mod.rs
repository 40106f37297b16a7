pub mod command;
pub mod globals;
pub mod memory;
pub mod process;
pub mod registers;
pub mod stack;
pub mod variables;
pub mod watch;

// Re-export view components
pub use command::CommandView;
pub use globals::GlobalsView;
pub use memory::MemoryPanel;
pub use process::ProcessPicker;
pub use registers::RegistersPanel;
pub use stack::StackPanel;
pub use variables::LocalsView;
pub use watch::WatchView;

use std::collections::HashSet;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::ListItem;

use crate::vartree::columns;
use crate::vartree::store::{NodeId, TreeStore};

/// One visible row of a flattened tree panel
pub struct TreeRow {
    pub node: NodeId,
    pub depth: usize,
    pub expandable: bool,
    pub expanded: bool,
}

/// Flatten a store into the rows a list widget can show, honoring the
/// panel's expansion set
pub fn flatten_tree(store: &TreeStore, expanded: &HashSet<NodeId>) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    let roots = match store.children(None) {
        Ok(roots) => roots.to_vec(),
        Err(_) => return rows,
    };
    let mut stack: Vec<(NodeId, usize)> = roots.into_iter().rev().map(|n| (n, 0)).collect();
    while let Some((node, depth)) = stack.pop() {
        let children = store
            .children(Some(node))
            .map(<[NodeId]>::to_vec)
            .unwrap_or_default();
        let is_expanded = expanded.contains(&node);
        rows.push(TreeRow {
            node,
            depth,
            expandable: !children.is_empty(),
            expanded: is_expanded,
        });
        if is_expanded {
            for child in children.into_iter().rev() {
                stack.push((child, depth + 1));
            }
        }
    }
    rows
}

/// Render flattened rows as list items: anchors plain, variables as
/// `name = value [type]`, changed rows flagged in yellow
pub fn tree_list_items<'a>(store: &TreeStore, rows: &[TreeRow]) -> Vec<ListItem<'a>> {
    rows.iter()
        .map(|row| {
            let name = store
                .text(row.node, columns::NAME)
                .unwrap_or_default()
                .to_string();
            let value = store
                .text(row.node, columns::VALUE)
                .unwrap_or_default()
                .to_string();
            let type_name = store
                .text(row.node, columns::TYPE)
                .unwrap_or_default()
                .to_string();
            let changed = store.flag(row.node, columns::CHANGED).unwrap_or(false);
            let is_anchor = row.depth == 0;

            let marker = if row.expandable {
                if row.expanded {
                    "▾ "
                } else {
                    "▸ "
                }
            } else {
                "  "
            };
            let indent = "  ".repeat(row.depth);

            let mut spans = vec![Span::raw(format!("{}{}", indent, marker))];
            if is_anchor {
                spans.push(Span::styled(
                    name,
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ));
            } else {
                let name_style = if changed {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                spans.push(Span::styled(name, name_style));
                if !value.is_empty() {
                    spans.push(Span::raw(" = "));
                    let value_style = if changed {
                        Style::default().fg(Color::Yellow)
                    } else {
                        Style::default().fg(Color::Gray)
                    };
                    spans.push(Span::styled(value, value_style));
                }
                if !type_name.is_empty() {
                    spans.push(Span::styled(
                        format!("  [{}]", type_name),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
            }
            ListItem::new(Line::from(spans))
        })
        .collect()
}

/// Whether a row still waits for its pointer target: its only child is an
/// empty placeholder
pub fn needs_unfold(store: &TreeStore, node: NodeId) -> bool {
    let Ok(children) = store.children(Some(node)) else {
        return false;
    };
    let [only] = children else {
        return false;
    };
    let empty_value = store
        .text(*only, columns::VALUE)
        .map(str::is_empty)
        .unwrap_or(false);
    let starred = store
        .text(*only, columns::NAME)
        .map(|n| n.starts_with('*'))
        .unwrap_or(false);
    let childless = store
        .children(Some(*only))
        .map(<[NodeId]>::is_empty)
        .unwrap_or(false);
    empty_value && starred && childless
}
