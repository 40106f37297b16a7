use crate::engine::variable::Variable;
use crate::vartree::columns;
use crate::vartree::store::{NodeId, StoreError, TreeStore};

/// Insert the row structure for a variable and its reported members.
///
/// Only identity cells (name, qualified name, engine handle) are written
/// here; value and type cells are filled by the updater so that its
/// changed-value comparison starts from an empty cell. A pointer that has
/// not been unfolded yet gets a single `*name` placeholder child, which
/// both draws the expander and lets the resolver descend through the
/// pointer before the target has been fetched.
pub fn insert_variable(
    store: &mut TreeStore,
    parent: NodeId,
    variable: &Variable,
) -> Result<NodeId, StoreError> {
    let node = store.append(Some(parent))?;
    store.set_text(node, columns::NAME, variable.name())?;
    store.set_text(node, columns::QNAME, variable.qualified_name())?;
    store.set_text(node, columns::INTERNAL, variable.internal_name())?;

    if variable.members().is_empty() {
        if variable.needs_unfolding() {
            append_placeholder(store, node, variable.name())?;
        }
    } else {
        for member in variable.members() {
            insert_variable(store, node, member)?;
        }
    }

    Ok(node)
}

/// Rebuild a row's children when the reported member shape no longer
/// matches the rendered one.
///
/// Returns true when the children were rebuilt; the caller must then run
/// the updater to fill the fresh cells.
pub fn ensure_members(
    store: &mut TreeStore,
    node: NodeId,
    variable: &Variable,
) -> Result<bool, StoreError> {
    if members_match(store, node, variable)? {
        return Ok(false);
    }
    store.clear_children(node)?;
    if variable.members().is_empty() {
        if variable.needs_unfolding() {
            append_placeholder(store, node, variable.name())?;
        }
    } else {
        for member in variable.members() {
            insert_variable(store, node, member)?;
        }
    }
    Ok(true)
}

fn members_match(
    store: &TreeStore,
    node: NodeId,
    variable: &Variable,
) -> Result<bool, StoreError> {
    let children = store.children(Some(node))?;
    if variable.members().is_empty() {
        // A single placeholder child is an acceptable rendering of "no
        // members fetched yet".
        return Ok(if variable.needs_unfolding() {
            children.len() == 1
        } else {
            children.is_empty()
        });
    }
    if children.len() != variable.members().len() {
        return Ok(false);
    }
    let children = children.to_vec();
    for (child, member) in children.iter().zip(variable.members()) {
        if store.text(*child, columns::NAME)? != member.name() {
            return Ok(false);
        }
        if !members_match(store, *child, member)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn append_placeholder(
    store: &mut TreeStore,
    node: NodeId,
    name: &str,
) -> Result<(), StoreError> {
    let placeholder = store.append(Some(node))?;
    store.set_text(placeholder, columns::NAME, &format!("*{}", name))?;
    Ok(())
}
