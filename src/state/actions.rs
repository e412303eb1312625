use crate::api::ApiClient;
use crate::model::InvocationId;

use super::app::AppState;

/// Follow-up work a confirmed action asks of the poller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Refresh `/api/current` now instead of waiting out the tick.
    RefreshCurrent,
}

/// Wraps the three mutating operations. Each is a single fire-and-confirm
/// request: confirmation applies to the state, failure only enqueues a
/// notification and leaves everything as it was so the user can retry.
pub struct ActionGateway<'a> {
    api: &'a ApiClient,
}

impl<'a> ActionGateway<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Clone `url`, resolve its descriptor and start a new invocation; on
    /// confirmation the new invocation becomes the viewed one.
    pub fn invoke(&self, state: &mut AppState, url: &str) -> Option<Effect> {
        match self.api.invoke(url) {
            Ok(detail) => {
                state.view.view(detail);
                Some(Effect::RefreshCurrent)
            }
            Err(err) => {
                state.notifications.push(err.to_string());
                None
            }
        }
    }

    /// Re-run the descriptor of `id` under a fresh invocation id, which
    /// becomes the viewed one.
    pub fn reinvoke(&self, state: &mut AppState, id: &InvocationId) -> Option<Effect> {
        match self.api.reinvoke(id) {
            Ok(detail) => {
                state.view.view(detail);
                Some(Effect::RefreshCurrent)
            }
            Err(err) => {
                state.notifications.push(err.to_string());
                None
            }
        }
    }

    /// Select an invocation for inspection, fetching its full detail. Not a
    /// mutation: a failed fetch leaves the selection as it was, and the next
    /// attempt (or the viewing refresh) will try again.
    pub fn view(&self, state: &mut AppState, id: &InvocationId) {
        if let Ok(detail) = self.api.invocation(id) {
            state.view.view(detail);
        }
    }

    /// Stop the active invocation. The affordance disappears on
    /// confirmation; the next current tick is expected to report idle.
    pub fn cancel(&self, state: &mut AppState) -> Option<Effect> {
        match self.api.cancel() {
            Ok(()) => {
                state.view.ack_cancel();
                Some(Effect::RefreshCurrent)
            }
            Err(err) => {
                state.notifications.push(err.to_string());
                None
            }
        }
    }
}
