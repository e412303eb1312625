use super::*;
use crate::model::InvocationId;

fn id(s: &str) -> InvocationId {
    InvocationId(s.to_string())
}

fn ids(list: &[&str]) -> Vec<InvocationId> {
    list.iter().map(|s| id(s)).collect()
}

#[test]
fn reconciliation_is_idempotent() {
    let snapshot = ids(&["a", "b", "c"]);
    let mut rendered = Vec::new();
    let ops = history_delta(&rendered, &snapshot, None);
    apply_ops(&mut rendered, &ops);
    assert_eq!(rendered, snapshot);

    let again = history_delta(&rendered, &snapshot, None);
    assert!(again.is_empty());
}

#[test]
fn rendered_set_is_snapshot_minus_excluded() {
    let snapshot = ids(&["a", "b", "c", "d"]);
    let excluded = id("b");
    let mut rendered = Vec::new();
    let ops = history_delta(&rendered, &snapshot, Some(&excluded));
    apply_ops(&mut rendered, &ops);
    assert_eq!(rendered, ids(&["a", "c", "d"]));
}

#[test]
fn newly_excluded_id_is_removed() {
    let snapshot = ids(&["a", "b"]);
    let mut rendered = ids(&["a", "b"]);
    let ops = history_delta(&rendered, &snapshot, Some(&id("b")));
    assert_eq!(ops, vec![ListOp::Remove(id("b"))]);
    apply_ops(&mut rendered, &ops);
    assert_eq!(rendered, ids(&["a"]));
}

#[test]
fn evicted_id_is_removed_and_new_id_appended() {
    let mut rendered = ids(&["a", "b"]);
    let snapshot = ids(&["b", "c"]);
    let ops = history_delta(&rendered, &snapshot, None);
    assert_eq!(ops, vec![ListOp::Remove(id("a")), ListOp::Append(id("c"))]);
    apply_ops(&mut rendered, &ops);
    assert_eq!(rendered, ids(&["b", "c"]));
}

#[test]
fn previously_excluded_id_is_appended_once_released() {
    // "b" finishes running: it leaves the active slot and joins history.
    let mut rendered = ids(&["a"]);
    let snapshot = ids(&["a", "b"]);
    let ops = history_delta(&rendered, &snapshot, None);
    assert_eq!(ops, vec![ListOp::Append(id("b"))]);
    apply_ops(&mut rendered, &ops);
    assert_eq!(rendered, ids(&["a", "b"]));
}

#[test]
fn surviving_rows_keep_their_positions() {
    // Bounded churn: rows that stay eligible are never moved.
    let mut rendered = ids(&["c", "a", "b"]);
    let snapshot = ids(&["a", "b", "c", "d"]);
    let ops = history_delta(&rendered, &snapshot, None);
    apply_ops(&mut rendered, &ops);
    assert_eq!(rendered, ids(&["c", "a", "b", "d"]));
}
