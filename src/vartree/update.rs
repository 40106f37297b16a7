use log::debug;
use thiserror::Error;

use crate::engine::variable::Variable;
use crate::vartree::columns;
use crate::vartree::resolve::resolve;
use crate::vartree::store::{NodeId, StoreError, TreeStore};

/// Errors raised while refreshing a rendered variable
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpdateError {
    /// The engine reported a member the tree has no row for; the rendered
    /// shape and the reported shape disagree
    #[error("no tree row for member \"{0}\"")]
    NodeNotFound(String),
    /// The target row was erased while the request was in flight
    #[error("target row {0} is gone from the store")]
    StaleNode(NodeId),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Refresh a rendered variable row from freshly reported data.
///
/// The row's display name is written only on first population; once set it
/// is never overwritten, the name is the row's identity. The value cell is
/// compared against the incoming value to drive the changed highlight:
/// the row is highlighted only when highlighting is enabled, the stop did
/// not switch frames, and the displayed value actually differs. Members are
/// refreshed recursively through the resolver; a member without a
/// pre-existing row is a structural mismatch and aborts the update.
pub fn update_node(
    store: &mut TreeStore,
    node: NodeId,
    variable: &Variable,
    handle_highlight: bool,
    is_new_frame: bool,
) -> Result<(), UpdateError> {
    if !store.contains(node) {
        return Err(UpdateError::StaleNode(node));
    }

    if store.text(node, columns::NAME)?.is_empty() {
        store.set_text(node, columns::NAME, variable.name())?;
    }
    if store.text(node, columns::QNAME)?.is_empty() {
        store.set_text(node, columns::QNAME, variable.qualified_name())?;
    }
    if !variable.internal_name().is_empty() {
        store.set_text(node, columns::INTERNAL, variable.internal_name())?;
    }

    let previous_value = store.text(node, columns::VALUE)?.to_string();
    let highlight = handle_highlight && !is_new_frame && previous_value != variable.value();
    store.set_flag(node, columns::CHANGED, highlight)?;
    store.set_text(node, columns::VALUE, variable.value())?;
    store.set_text(node, columns::TYPE, variable.type_name())?;

    for member in variable.members() {
        let member_node = resolve(store, node, member.name())?
            .ok_or_else(|| UpdateError::NodeNotFound(member.qualified_name().to_string()))?;
        debug!(
            "refreshing member \"{}\" at row {}",
            member.qualified_name(),
            member_node
        );
        update_node(store, member_node, member, handle_highlight, is_new_frame)?;
    }

    Ok(())
}
