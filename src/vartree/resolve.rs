use log::debug;

use crate::vartree::columns;
use crate::vartree::qname::{parse_qualified_name, split_pointer_marker, NameElement};
use crate::vartree::store::{NodeId, StoreError, TreeStore};

/// Locate the row for a qualified name below `root`.
///
/// Pure lookup: walks the rows already inserted by the panels, never
/// creates any. `Ok(None)` means the name parsed but no matching row
/// exists; names that fail to parse fall back to a literal single-element
/// lookup among `root`'s direct children before giving up.
pub fn resolve(
    store: &TreeStore,
    root: NodeId,
    qualified_name: &str,
) -> Result<Option<NodeId>, StoreError> {
    if !store.contains(root) {
        return Err(StoreError::StaleNode(root));
    }

    let elements = match parse_qualified_name(qualified_name) {
        Ok(elements) => elements,
        Err(err) => {
            debug!(
                "treating \"{}\" as an opaque name, tokenizing failed: {}",
                qualified_name, err
            );
            return literal_lookup(store, root, qualified_name);
        }
    };

    let mut current = root;
    for element in &elements {
        match match_child(store, current, element)? {
            Some(child) => current = child,
            None => {
                // Flat names that the structured walk cannot place may
                // still sit directly under the root.
                return literal_lookup(store, root, qualified_name);
            }
        }
    }
    Ok(Some(current))
}

/// Find the child of `parent` matching one name element.
///
/// A direct child matches when its stored text equals the element and its
/// leading-`*` pointer marker agrees with the element's pointer flag. When
/// no direct child matches, a placeholder row standing in for an
/// unexpanded pointer target is descended through: a child whose single
/// child carries the element's name, bare or `*`-prefixed.
fn match_child(
    store: &TreeStore,
    parent: NodeId,
    element: &NameElement,
) -> Result<Option<NodeId>, StoreError> {
    let children = store.children(Some(parent))?;

    for child in children {
        let (bare, starred) = split_pointer_marker(store.text(*child, columns::NAME)?);
        if bare == element.name() && starred == element.is_pointer() {
            return Ok(Some(*child));
        }
    }

    for child in children {
        let grandchildren = store.children(Some(*child))?;
        if let [only] = grandchildren {
            let (bare, _) = split_pointer_marker(store.text(*only, columns::NAME)?);
            if bare == element.name() {
                return Ok(Some(*only));
            }
        }
    }

    Ok(None)
}

fn literal_lookup(
    store: &TreeStore,
    root: NodeId,
    qualified_name: &str,
) -> Result<Option<NodeId>, StoreError> {
    for child in store.children(Some(root))? {
        if store.text(*child, columns::NAME)? == qualified_name {
            return Ok(Some(*child));
        }
    }
    Ok(None)
}
