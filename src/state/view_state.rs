use crate::model::{InvocationDetail, InvocationId};

/// What the server last said about the active invocation. `Idle` (an ok
/// envelope with a null payload) and `Unreachable` (a server-reported error)
/// are deliberately distinct states; the historical dashboard collapsed the
/// two, which hid real outages behind an innocuous empty slot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CurrentState {
    #[default]
    Idle,
    Active(InvocationId),
    Unreachable,
}

impl CurrentState {
    pub fn id(&self) -> Option<&InvocationId> {
        match self {
            CurrentState::Active(id) => Some(id),
            _ => None,
        }
    }
}

/// The selection half of the dashboard: which invocation is running, which
/// one the user is inspecting, and the full detail of the latter.
#[derive(Clone, Debug, Default)]
pub struct ViewState {
    pub current: CurrentState,
    pub viewing: Option<InvocationId>,
    pub viewing_detail: Option<InvocationDetail>,
    /// Set once a cancel has been confirmed, so the affordance disappears
    /// immediately instead of waiting out the next current tick. Reset
    /// whenever `current` changes.
    cancel_acked: bool,
}

impl ViewState {
    pub fn set_current(&mut self, next: CurrentState) {
        if self.current != next {
            self.current = next;
            self.cancel_acked = false;
        }
    }

    /// Select an invocation for inspection and store its detail.
    pub fn view(&mut self, detail: InvocationDetail) {
        self.viewing = Some(detail.id.clone());
        self.viewing_detail = Some(detail);
    }

    /// A periodic refresh of the viewed detail landed. Applied only if the
    /// user still views that id; a refresh for a previously viewed
    /// invocation that arrives late must not clobber the pane.
    pub fn refresh_detail(&mut self, detail: InvocationDetail) {
        if self.viewing.as_ref() == Some(&detail.id) {
            self.viewing_detail = Some(detail);
        }
    }

    /// Prune rule: if the latest invocations snapshot no longer carries the
    /// viewed id and that id is not the active invocation, the server has
    /// dropped it from history (retention); revert the pane to its
    /// placeholder. Returns whether anything was cleared.
    pub fn prune_dangling(&mut self, snapshot_has_viewing: bool) -> bool {
        let Some(viewing) = self.viewing.as_ref() else {
            return false;
        };
        if snapshot_has_viewing || self.current.id() == Some(viewing) {
            return false;
        }
        self.viewing = None;
        self.viewing_detail = None;
        true
    }

    pub fn ack_cancel(&mut self) {
        self.cancel_acked = true;
    }

    /// The cancel affordance shows only while inspecting the invocation that
    /// is actually running, and hides as soon as a cancel is confirmed.
    pub fn cancel_visible(&self) -> bool {
        !self.cancel_acked
            && self.current.id().is_some()
            && self.current.id() == self.viewing.as_ref()
    }
}

#[cfg(test)]
#[path = "../tests/state/view_state_tests.rs"]
mod tests;
