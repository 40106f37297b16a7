use proptest::prelude::*;
use scopeview::vartree::columns;
use scopeview::vartree::insert::insert_variable;
use scopeview::vartree::resolve::resolve;
use scopeview::vartree::store::{NodeId, StoreError, TreeStore};
use scopeview::vartree::variable_schema;
use scopeview::{Variable, VariableKind};

use crate::test_helpers::{sample_order, sample_pointer};

fn store_with_anchor() -> (TreeStore, NodeId) {
    let mut store = TreeStore::new(variable_schema());
    let anchor = store.append(None).unwrap();
    store.set_text(anchor, columns::NAME, "Local variables").unwrap();
    (store, anchor)
}

#[test]
fn test_resolves_dotted_member_path() {
    let (mut store, anchor) = store_with_anchor();
    insert_variable(&mut store, anchor, &sample_order("19.90")).unwrap();

    let node = resolve(&store, anchor, "order.total").unwrap().unwrap();
    assert_eq!(store.text(node, columns::NAME).unwrap(), "total");
    assert_eq!(store.text(node, columns::QNAME).unwrap(), "order.total");

    let root = resolve(&store, anchor, "order").unwrap().unwrap();
    assert_eq!(store.parent(node).unwrap(), Some(root));
}

#[test]
fn test_resolves_through_unfolded_pointer() {
    let (mut store, anchor) = store_with_anchor();
    insert_variable(&mut store, anchor, &sample_pointer("10")).unwrap();

    // The pointed value itself
    let pointee = resolve(&store, anchor, "*head").unwrap().unwrap();
    assert_eq!(store.text(pointee, columns::NAME).unwrap(), "*head");

    // A member of the pointed value, addressed with the arrow
    let value = resolve(&store, anchor, "head->value").unwrap().unwrap();
    assert_eq!(store.text(value, columns::NAME).unwrap(), "value");
    assert_eq!(store.parent(value).unwrap(), Some(pointee));
}

#[test]
fn test_unfetched_pointer_target_does_not_resolve_members() {
    let (mut store, anchor) = store_with_anchor();
    let mut head = Variable::new("head", VariableKind::Local);
    head.set_type_name("struct node *");
    head.set_needs_unfolding(true);
    insert_variable(&mut store, anchor, &head).unwrap();

    // The placeholder row stands in for the target...
    assert!(resolve(&store, anchor, "*head").unwrap().is_some());
    // ...but members under it do not exist yet.
    assert_eq!(resolve(&store, anchor, "head->value").unwrap(), None);
}

#[test]
fn test_literal_fallback_for_flat_expression_rows() {
    let (mut store, anchor) = store_with_anchor();
    let row = store.append(Some(anchor)).unwrap();
    store.set_text(row, columns::NAME, "order.total").unwrap();

    // The structured walk fails (there is no "order" child), the literal
    // lookup lands on the flat row.
    assert_eq!(resolve(&store, anchor, "order.total").unwrap(), Some(row));
}

#[test]
fn test_unparseable_name_still_finds_literal_row() {
    let (mut store, anchor) = store_with_anchor();
    let row = store.append(Some(anchor)).unwrap();
    store.set_text(row, columns::NAME, "buf[0]").unwrap();

    assert_eq!(resolve(&store, anchor, "buf[0]").unwrap(), Some(row));
    assert_eq!(resolve(&store, anchor, "buf[1]").unwrap(), None);
}

#[test]
fn test_missing_path_resolves_to_none() {
    let (mut store, anchor) = store_with_anchor();
    insert_variable(&mut store, anchor, &sample_order("19.90")).unwrap();

    assert_eq!(resolve(&store, anchor, "order.missing").unwrap(), None);
    assert_eq!(resolve(&store, anchor, "nothing").unwrap(), None);
}

#[test]
fn test_stale_root_is_an_error() {
    let (mut store, anchor) = store_with_anchor();
    let row = store.append(Some(anchor)).unwrap();
    store.erase(row).unwrap();

    assert!(matches!(
        resolve(&store, row, "anything"),
        Err(StoreError::StaleNode(_))
    ));
}

#[test]
fn test_pointer_marker_must_agree() {
    let (mut store, anchor) = store_with_anchor();
    let row = store.append(Some(anchor)).unwrap();
    store.set_text(row, columns::NAME, "*p").unwrap();

    // "*p" wants a pointer-marked row and finds it; plain "p" does not
    // match a starred row directly (and there is no placeholder chain).
    assert_eq!(resolve(&store, anchor, "*p").unwrap(), Some(row));
    assert_eq!(resolve(&store, anchor, "p").unwrap(), None);
}

proptest! {
    /// Inserting a chain of members and resolving the joined path finds
    /// the node that was inserted.
    #[test]
    fn prop_resolution_after_insertion(segments in prop::collection::vec("[a-z][a-z0-9_]{0,6}", 1..5)) {
        let (mut store, anchor) = store_with_anchor();

        // Build the chain by hand, qualified names joined with '.'
        let mut parent = anchor;
        let mut path = String::new();
        let mut last = anchor;
        for segment in &segments {
            if !path.is_empty() {
                path.push('.');
            }
            path.push_str(segment);
            let node = store.append(Some(parent)).unwrap();
            store.set_text(node, columns::NAME, segment).unwrap();
            store.set_text(node, columns::QNAME, &path).unwrap();
            parent = node;
            last = node;
        }

        prop_assert_eq!(resolve(&store, anchor, &path).unwrap(), Some(last));
    }
}
