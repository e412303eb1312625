use crate::model::InvocationId;

/// One mutation of the rendered history list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListOp {
    Remove(InvocationId),
    Append(InvocationId),
}

/// Diff the rendered history list against the reconciled snapshot.
///
/// A rendered id is kept iff it is still in `snapshot` and is not the
/// excluded id (the active invocation occupies its own slot). Ids that fail
/// either test are removed; snapshot ids that are eligible but not yet
/// rendered are appended, in snapshot order. Reconciling twice against an
/// unchanged snapshot yields no ops, so churn is bounded by the delta
/// between snapshots.
pub fn history_delta(
    rendered: &[InvocationId],
    snapshot: &[InvocationId],
    excluded: Option<&InvocationId>,
) -> Vec<ListOp> {
    let mut ops = Vec::new();
    for id in rendered {
        let evicted = !snapshot.contains(id);
        if evicted || Some(id) == excluded {
            ops.push(ListOp::Remove(id.clone()));
        }
    }
    for id in snapshot {
        if Some(id) != excluded && !rendered.contains(id) {
            ops.push(ListOp::Append(id.clone()));
        }
    }
    ops
}

/// Apply a diff to the retained render order.
pub fn apply_ops(rendered: &mut Vec<InvocationId>, ops: &[ListOp]) {
    for op in ops {
        match op {
            ListOp::Remove(id) => rendered.retain(|r| r != id),
            ListOp::Append(id) => rendered.push(id.clone()),
        }
    }
}

#[cfg(test)]
#[path = "../tests/state/reconcile_tests.rs"]
mod tests;
