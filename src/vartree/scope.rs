use std::collections::HashSet;

use log::debug;
use thiserror::Error;

use crate::engine::variable::Variable;
use crate::vartree::columns;
use crate::vartree::store::{NodeId, StoreError, TreeStore};

/// Errors raised while partitioning monitored expressions
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScopeError {
    /// Only root-level expressions are partitioned; members travel with
    /// their root
    #[error("\"{0}\" is a member variable, not a root-level expression")]
    MemberVariable(String),
    /// An anchor row has been erased; anchors live as long as the panel
    #[error("scope anchor {0} is gone from the store")]
    MissingAnchor(NodeId),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Keeps each monitored expression under exactly one of two anchor rows.
///
/// The two anchors are created once when the owning panel is built. On
/// every stop the panel re-partitions its expressions: an expression whose
/// variable reports `in_scope` lives under the in-scope anchor, everything
/// else under the out-of-scope anchor, and never both.
pub struct ScopePartitioner {
    in_scope_anchor: NodeId,
    out_of_scope_anchor: NodeId,
    in_scope: HashSet<String>,
}

impl ScopePartitioner {
    pub fn new(in_scope_anchor: NodeId, out_of_scope_anchor: NodeId) -> Self {
        Self {
            in_scope_anchor,
            out_of_scope_anchor,
            in_scope: HashSet::new(),
        }
    }

    pub fn in_scope_anchor(&self) -> NodeId {
        self.in_scope_anchor
    }

    pub fn out_of_scope_anchor(&self) -> NodeId {
        self.out_of_scope_anchor
    }

    /// Whether the expression currently sits under the in-scope anchor
    pub fn is_in_scope(&self, qualified_name: &str) -> bool {
        self.in_scope.contains(qualified_name)
    }

    /// Forget all membership, e.g. when detaching from the inferior
    pub fn reset(&mut self) {
        self.in_scope.clear();
    }

    /// Link `variable`'s row under the anchor matching its scope flag.
    ///
    /// Inserts the row if absent, removes any row for the same expression
    /// from the opposite anchor, and returns the row together with the
    /// anchor it now lives under. Re-partitioning an unchanged variable is
    /// a no-op.
    pub fn partition(
        &mut self,
        store: &mut TreeStore,
        variable: &Variable,
    ) -> Result<(NodeId, NodeId), ScopeError> {
        if variable.is_member() {
            return Err(ScopeError::MemberVariable(
                variable.qualified_name().to_string(),
            ));
        }
        for anchor in [self.in_scope_anchor, self.out_of_scope_anchor] {
            if !store.contains(anchor) {
                return Err(ScopeError::MissingAnchor(anchor));
            }
        }

        let (target, other) = if variable.in_scope() {
            (self.in_scope_anchor, self.out_of_scope_anchor)
        } else {
            (self.out_of_scope_anchor, self.in_scope_anchor)
        };

        if let Some(stale) = find_entry(store, other, variable)? {
            debug!(
                "moving \"{}\" {} scope",
                variable.qualified_name(),
                if variable.in_scope() { "into" } else { "out of" }
            );
            store.erase(stale)?;
        }

        let node = match find_entry(store, target, variable)? {
            Some(node) => node,
            None => {
                let node = store.append(Some(target))?;
                store.set_text(node, columns::NAME, variable.name())?;
                store.set_text(node, columns::QNAME, variable.qualified_name())?;
                store.set_text(node, columns::INTERNAL, variable.internal_name())?;
                node
            }
        };

        if variable.in_scope() {
            self.in_scope.insert(variable.qualified_name().to_string());
        } else {
            self.in_scope.remove(variable.qualified_name());
        }

        Ok((node, target))
    }

    /// Drop the expression's row from whichever anchor holds it
    pub fn remove(
        &mut self,
        store: &mut TreeStore,
        variable: &Variable,
    ) -> Result<bool, ScopeError> {
        let mut removed = false;
        for anchor in [self.in_scope_anchor, self.out_of_scope_anchor] {
            if !store.contains(anchor) {
                return Err(ScopeError::MissingAnchor(anchor));
            }
            if let Some(node) = find_entry(store, anchor, variable)? {
                store.erase(node)?;
                removed = true;
            }
        }
        self.in_scope.remove(variable.qualified_name());
        Ok(removed)
    }
}

/// Find the anchor child carrying this expression, matched by qualified name
fn find_entry(
    store: &TreeStore,
    anchor: NodeId,
    variable: &Variable,
) -> Result<Option<NodeId>, StoreError> {
    for child in store.children(Some(anchor))? {
        if store.text(*child, columns::QNAME)? == variable.qualified_name() {
            return Ok(Some(*child));
        }
    }
    Ok(None)
}
