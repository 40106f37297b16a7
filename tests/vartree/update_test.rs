use scopeview::vartree::columns;
use scopeview::vartree::insert::insert_variable;
use scopeview::vartree::resolve::resolve;
use scopeview::vartree::store::{NodeId, TreeStore};
use scopeview::vartree::update::{update_node, UpdateError};
use scopeview::vartree::variable_schema;
use scopeview::{Variable, VariableKind};

use crate::test_helpers::sample_pointer;

fn store_with_anchor() -> (TreeStore, NodeId) {
    let mut store = TreeStore::new(variable_schema());
    let anchor = store.append(None).unwrap();
    store.set_text(anchor, columns::NAME, "In scope").unwrap();
    (store, anchor)
}

fn int_variable(name: &str, value: &str) -> Variable {
    let mut v = Variable::new(name, VariableKind::Local);
    v.set_type_name("int");
    v.set_value(value);
    v
}

#[test]
fn test_value_change_sets_highlight() {
    let (mut store, anchor) = store_with_anchor();
    let node = insert_variable(&mut store, anchor, &int_variable("count", "1")).unwrap();

    update_node(&mut store, node, &int_variable("count", "1"), true, false).unwrap();
    update_node(&mut store, node, &int_variable("count", "2"), true, false).unwrap();

    assert_eq!(store.text(node, columns::VALUE).unwrap(), "2");
    assert_eq!(store.text(node, columns::TYPE).unwrap(), "int");
    assert!(store.flag(node, columns::CHANGED).unwrap());
}

#[test]
fn test_unchanged_value_clears_highlight() {
    let (mut store, anchor) = store_with_anchor();
    let node = insert_variable(&mut store, anchor, &int_variable("count", "1")).unwrap();

    update_node(&mut store, node, &int_variable("count", "1"), true, false).unwrap();
    update_node(&mut store, node, &int_variable("count", "2"), true, false).unwrap();
    update_node(&mut store, node, &int_variable("count", "2"), true, false).unwrap();

    assert!(!store.flag(node, columns::CHANGED).unwrap());
}

#[test]
fn test_highlight_disabled_never_sets_the_flag() {
    let (mut store, anchor) = store_with_anchor();
    let node = insert_variable(&mut store, anchor, &int_variable("count", "1")).unwrap();

    update_node(&mut store, node, &int_variable("count", "1"), false, false).unwrap();
    update_node(&mut store, node, &int_variable("count", "2"), false, false).unwrap();

    assert!(!store.flag(node, columns::CHANGED).unwrap());
}

#[test]
fn test_new_frame_suppresses_highlight() {
    let (mut store, anchor) = store_with_anchor();
    let node = insert_variable(&mut store, anchor, &int_variable("count", "1")).unwrap();

    update_node(&mut store, node, &int_variable("count", "1"), true, false).unwrap();
    update_node(&mut store, node, &int_variable("count", "9"), true, true).unwrap();

    assert_eq!(store.text(node, columns::VALUE).unwrap(), "9");
    assert!(!store.flag(node, columns::CHANGED).unwrap());
}

#[test]
fn test_display_name_is_written_once() {
    let (mut store, anchor) = store_with_anchor();
    let node = store.append(Some(anchor)).unwrap();
    assert_eq!(store.text(node, columns::NAME).unwrap(), "");

    // First population fills the empty name cell
    update_node(&mut store, node, &int_variable("count", "1"), false, false).unwrap();
    assert_eq!(store.text(node, columns::NAME).unwrap(), "count");

    // A later update must not rename the row
    update_node(&mut store, node, &int_variable("renamed", "2"), false, false).unwrap();
    assert_eq!(store.text(node, columns::NAME).unwrap(), "count");
}

#[test]
fn test_members_are_updated_recursively() {
    let (mut store, anchor) = store_with_anchor();
    let node = insert_variable(&mut store, anchor, &sample_pointer("10")).unwrap();
    update_node(&mut store, node, &sample_pointer("10"), false, false).unwrap();

    update_node(&mut store, node, &sample_pointer("20"), true, false).unwrap();

    let value = resolve(&store, anchor, "head->value").unwrap().unwrap();
    assert_eq!(store.text(value, columns::VALUE).unwrap(), "20");
    assert!(store.flag(value, columns::CHANGED).unwrap());
}

#[test]
fn test_member_without_row_is_a_structural_mismatch() {
    let (mut store, anchor) = store_with_anchor();
    // Insert a bare row, then report a variable that claims a member
    let node = store.append(Some(anchor)).unwrap();

    let mut order = Variable::new("order", VariableKind::Local);
    order.set_type_name("struct order");
    order.add_member(int_variable("id", "4711"));

    let err = update_node(&mut store, node, &order, false, false).unwrap_err();
    assert!(matches!(err, UpdateError::NodeNotFound(_)));
}

#[test]
fn test_stale_target_is_detected() {
    let (mut store, anchor) = store_with_anchor();
    let node = insert_variable(&mut store, anchor, &int_variable("count", "1")).unwrap();
    store.erase(node).unwrap();

    let err = update_node(&mut store, node, &int_variable("count", "1"), false, false).unwrap_err();
    assert!(matches!(err, UpdateError::StaleNode(_)));
}
