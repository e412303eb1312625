use crate::model::{
    HostId, HostRecord, InvocationDetail, InvocationId, InvocationSummary,
};

use super::cache::{EntityCache, Keyed};
use super::notify::NotificationQueue;
use super::reconcile::{apply_ops, history_delta};
use super::view_state::{CurrentState, ViewState};

impl Keyed for InvocationSummary {
    type Key = InvocationId;

    fn key(&self) -> &InvocationId {
        &self.id
    }
}

impl Keyed for HostRecord {
    type Key = HostId;

    fn key(&self) -> &HostId {
        &self.id
    }
}

/// The polled resources. Each carries its own sequence counter so a stale
/// delivery for one resource can never mask a fresh one for another.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resource {
    Current,
    Invocations,
    Hosts,
    Viewing,
}

impl Resource {
    fn index(self) -> usize {
        match self {
            Resource::Current => 0,
            Resource::Invocations => 1,
            Resource::Hosts => 2,
            Resource::Viewing => 3,
        }
    }
}

#[derive(Clone, Debug)]
pub enum Outcome {
    /// `/api/current`: the active invocation id, or `None` for an idle
    /// cluster.
    Current(Option<InvocationId>),
    Invocations(Vec<InvocationSummary>),
    Hosts(Vec<HostRecord>),
    ViewingDetail(InvocationDetail),
    /// The server answered with an error envelope. Transport failures and
    /// unparseable bodies never become events; those ticks are dropped.
    ServerError(String),
}

#[derive(Clone, Debug)]
pub struct PollEvent {
    pub resource: Resource,
    pub seq: u64,
    pub outcome: Outcome,
}

/// The whole mutable state of the dashboard, threaded explicitly through
/// `apply` so tests can build fixtures instead of poking at ambient globals.
/// Only the UI thread mutates it; poll threads communicate by event.
#[derive(Debug, Default)]
pub struct AppState {
    pub view: ViewState,
    pub invocations: EntityCache<InvocationSummary>,
    pub hosts: EntityCache<HostRecord>,
    /// Server-supplied host order from the latest snapshot; the host list is
    /// rebuilt from it wholesale each tick.
    pub host_order: Vec<HostId>,
    /// Invocation ids in the order of the latest snapshot.
    invocation_order: Vec<InvocationId>,
    /// Retained render order of the history list, mutated only through
    /// reconciliation ops.
    pub history: Vec<InvocationId>,
    pub notifications: NotificationQueue,
    last_seq: [Option<u64>; 4],
}

impl AppState {
    /// Apply one poll event. Events whose sequence number is not newer than
    /// the last applied one for the resource are discarded: an earlier
    /// tick's response arriving after a later tick's must not overwrite the
    /// cache with stale data.
    pub fn apply(&mut self, event: PollEvent) {
        let slot = &mut self.last_seq[event.resource.index()];
        if slot.is_some_and(|last| event.seq <= last) {
            tracing::debug!(resource = ?event.resource, seq = event.seq, "stale poll event dropped");
            return;
        }
        *slot = Some(event.seq);

        match event.outcome {
            Outcome::Current(id) => {
                let next = match id {
                    Some(id) => CurrentState::Active(id),
                    None => CurrentState::Idle,
                };
                if self.view.current != next {
                    self.view.set_current(next);
                    self.reconcile_history();
                }
            }
            Outcome::Invocations(snapshot) => {
                self.invocations.reconcile(&snapshot);
                self.invocation_order = snapshot.iter().map(|inv| inv.id.clone()).collect();
                self.reconcile_history();
                let has_viewing = self
                    .view
                    .viewing
                    .as_ref()
                    .is_some_and(|id| self.invocations.contains(id));
                self.view.prune_dangling(has_viewing);
            }
            Outcome::Hosts(snapshot) => {
                self.hosts.reconcile(&snapshot);
                self.host_order = snapshot.iter().map(|host| host.id.clone()).collect();
            }
            Outcome::ViewingDetail(detail) => {
                self.view.refresh_detail(detail);
            }
            Outcome::ServerError(msg) => match event.resource {
                // A failing current resource is indistinguishable from an
                // outage of the orchestrator itself; surface it in the
                // active slot rather than flooding the queue every tick.
                Resource::Current => {
                    if self.view.current != CurrentState::Unreachable {
                        self.view.set_current(CurrentState::Unreachable);
                        self.reconcile_history();
                    }
                }
                Resource::Invocations | Resource::Hosts | Resource::Viewing => {
                    self.notifications.push(msg);
                }
            },
        }
    }

    /// Look up a host record by hostname in the latest snapshot.
    pub fn host_by_name(&self, hostname: &str) -> Option<&HostRecord> {
        self.host_order
            .iter()
            .filter_map(|id| self.hosts.get(id))
            .find(|host| host.hostname == hostname)
    }

    fn reconcile_history(&mut self) {
        let ops = history_delta(
            &self.history,
            &self.invocation_order,
            self.view.current.id(),
        );
        apply_ops(&mut self.history, &ops);
    }
}

#[cfg(test)]
#[path = "../tests/state/app_tests.rs"]
mod tests;
