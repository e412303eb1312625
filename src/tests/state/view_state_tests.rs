use super::*;
use crate::model::{Descriptor, InvocationDetail};

use std::collections::{BTreeMap, HashMap};

fn detail(id: &str) -> InvocationDetail {
    InvocationDetail {
        id: InvocationId(id.to_string()),
        name: Some(format!("run-{}", id)),
        url: "https://example.com/repo".to_string(),
        commit: "deadbeef".to_string(),
        start: "2026-08-30T10:00:00Z".to_string(),
        descriptor: Descriptor {
            name: format!("run-{}", id),
            command: None,
            args: vec![],
            hosts: BTreeMap::new(),
            gen_logs: false,
            log_dir: "logs/".to_string(),
        },
        logs: HashMap::new(),
    }
}

fn inv(id: &str) -> InvocationId {
    InvocationId(id.to_string())
}

#[test]
fn viewing_a_detail_sets_both_halves() {
    let mut view = ViewState::default();
    view.view(detail("a"));
    assert_eq!(view.viewing, Some(inv("a")));
    assert_eq!(view.viewing_detail.as_ref().unwrap().id, inv("a"));
}

#[test]
fn dangling_viewing_is_pruned_unless_it_is_current() {
    let mut view = ViewState::default();
    view.view(detail("a"));

    // Still current: the snapshot dropping it does not clear the pane.
    view.set_current(CurrentState::Active(inv("a")));
    assert!(!view.prune_dangling(false));
    assert_eq!(view.viewing, Some(inv("a")));

    // No longer current: now the prune fires.
    view.set_current(CurrentState::Idle);
    assert!(view.prune_dangling(false));
    assert_eq!(view.viewing, None);
    assert!(view.viewing_detail.is_none());
}

#[test]
fn present_viewing_is_never_pruned() {
    let mut view = ViewState::default();
    view.view(detail("a"));
    assert!(!view.prune_dangling(true));
    assert_eq!(view.viewing, Some(inv("a")));
}

#[test]
fn stale_detail_refresh_is_discarded() {
    let mut view = ViewState::default();
    view.view(detail("a"));
    view.view(detail("b"));
    // A refresh for the previously viewed invocation arrives late.
    view.refresh_detail(detail("a"));
    assert_eq!(view.viewing_detail.as_ref().unwrap().id, inv("b"));
}

#[test]
fn cancel_is_visible_only_while_viewing_the_active_invocation() {
    let mut view = ViewState::default();
    view.view(detail("a"));
    assert!(!view.cancel_visible());

    view.set_current(CurrentState::Active(inv("a")));
    assert!(view.cancel_visible());

    view.set_current(CurrentState::Active(inv("b")));
    assert!(!view.cancel_visible());
}

#[test]
fn confirmed_cancel_hides_the_affordance_until_current_changes() {
    let mut view = ViewState::default();
    view.view(detail("a"));
    view.set_current(CurrentState::Active(inv("a")));
    view.ack_cancel();
    assert!(!view.cancel_visible());

    // The next current tick reports idle; a later run of the same
    // invocation id would show the affordance again.
    view.set_current(CurrentState::Idle);
    view.set_current(CurrentState::Active(inv("a")));
    assert!(view.cancel_visible());
}
