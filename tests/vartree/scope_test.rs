use scopeview::vartree::columns;
use scopeview::vartree::scope::{ScopeError, ScopePartitioner};
use scopeview::vartree::store::{NodeId, TreeStore};
use scopeview::vartree::variable_schema;
use scopeview::{Variable, VariableKind};

use crate::test_helpers::sample_order;

fn setup() -> (TreeStore, ScopePartitioner) {
    let mut store = TreeStore::new(variable_schema());
    let in_scope = store.append(None).unwrap();
    store.set_text(in_scope, columns::NAME, "In scope").unwrap();
    let out_of_scope = store.append(None).unwrap();
    store
        .set_text(out_of_scope, columns::NAME, "Out of scope")
        .unwrap();
    (store, ScopePartitioner::new(in_scope, out_of_scope))
}

fn children(store: &TreeStore, anchor: NodeId) -> Vec<NodeId> {
    store.children(Some(anchor)).unwrap().to_vec()
}

#[test]
fn test_in_scope_variable_lands_under_in_scope_anchor() {
    let (mut store, mut partitioner) = setup();
    let count = Variable::new("count", VariableKind::Monitored);

    let (node, anchor) = partitioner.partition(&mut store, &count).unwrap();

    assert_eq!(anchor, partitioner.in_scope_anchor());
    assert_eq!(store.text(node, columns::NAME).unwrap(), "count");
    assert_eq!(children(&store, partitioner.in_scope_anchor()), vec![node]);
    assert!(children(&store, partitioner.out_of_scope_anchor()).is_empty());
    assert!(partitioner.is_in_scope("count"));
}

#[test]
fn test_leaving_scope_moves_the_node_without_duplicates() {
    let (mut store, mut partitioner) = setup();
    let mut count = Variable::new("count", VariableKind::Monitored);

    partitioner.partition(&mut store, &count).unwrap();

    count.set_in_scope(false);
    let (node, anchor) = partitioner.partition(&mut store, &count).unwrap();

    assert_eq!(anchor, partitioner.out_of_scope_anchor());
    assert!(children(&store, partitioner.in_scope_anchor()).is_empty());
    assert_eq!(
        children(&store, partitioner.out_of_scope_anchor()),
        vec![node]
    );
    assert!(!partitioner.is_in_scope("count"));
}

#[test]
fn test_partition_is_idempotent() {
    let (mut store, mut partitioner) = setup();
    let count = Variable::new("count", VariableKind::Monitored);

    let (first, _) = partitioner.partition(&mut store, &count).unwrap();
    let (second, _) = partitioner.partition(&mut store, &count).unwrap();

    assert_eq!(first, second);
    assert_eq!(children(&store, partitioner.in_scope_anchor()).len(), 1);
    assert!(children(&store, partitioner.out_of_scope_anchor()).is_empty());
}

#[test]
fn test_returning_to_scope_moves_back() {
    let (mut store, mut partitioner) = setup();
    let mut count = Variable::new("count", VariableKind::Monitored);

    partitioner.partition(&mut store, &count).unwrap();
    count.set_in_scope(false);
    partitioner.partition(&mut store, &count).unwrap();
    count.set_in_scope(true);
    partitioner.partition(&mut store, &count).unwrap();

    assert_eq!(children(&store, partitioner.in_scope_anchor()).len(), 1);
    assert!(children(&store, partitioner.out_of_scope_anchor()).is_empty());
    assert!(partitioner.is_in_scope("count"));
}

#[test]
fn test_member_variables_are_rejected() {
    let (mut store, mut partitioner) = setup();
    let order = sample_order("19.90");
    let member = order.members()[0].clone();
    assert!(member.is_member());

    let err = partitioner.partition(&mut store, &member).unwrap_err();
    assert!(matches!(err, ScopeError::MemberVariable(_)));
}

#[test]
fn test_missing_anchor_is_an_invariant_failure() {
    let (mut store, mut partitioner) = setup();
    store.erase(partitioner.in_scope_anchor()).unwrap();

    let count = Variable::new("count", VariableKind::Monitored);
    let err = partitioner.partition(&mut store, &count).unwrap_err();
    assert!(matches!(err, ScopeError::MissingAnchor(_)));
}

#[test]
fn test_remove_drops_the_row_from_either_anchor() {
    let (mut store, mut partitioner) = setup();
    let mut count = Variable::new("count", VariableKind::Monitored);
    partitioner.partition(&mut store, &count).unwrap();

    assert!(partitioner.remove(&mut store, &count).unwrap());
    assert!(children(&store, partitioner.in_scope_anchor()).is_empty());
    assert!(!partitioner.is_in_scope("count"));

    // Removing again is a clean no-op
    count.set_in_scope(false);
    assert!(!partitioner.remove(&mut store, &count).unwrap());
}
