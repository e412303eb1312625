use std::collections::HashMap;

use crate::model::{HostRecord, InvocationId};

/// Display status of one host slot in the viewed invocation's detail pane.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostStatus {
    /// The host has dropped out of the latest host snapshot entirely.
    Disconnected,
    /// The host's log artifact for the viewed invocation exists; the badge
    /// links to it.
    Logs { url: String },
    /// The host's own state descriptor, verbatim (`running`, `idle`, ...).
    Reported(String),
    /// Something is running cluster-wide and this host is bound to it, but
    /// the viewer is looking at that same run from another host's slot.
    Busy,
    /// The host is still bound to an invocation that is neither viewed nor
    /// active: a stale assignment from a finished or interrupted run.
    Abandoned,
}

impl HostStatus {
    pub fn label(&self) -> &str {
        match self {
            HostStatus::Disconnected => "disconnected",
            HostStatus::Logs { .. } => "logs",
            HostStatus::Reported(desc) => desc,
            HostStatus::Busy => "busy",
            HostStatus::Abandoned => "abandoned",
        }
    }
}

/// Resolve a hostname mentioned by the viewed descriptor to one status.
///
/// Pure and precedence-ordered; first match wins:
/// 1. absent from the latest host snapshot -> disconnected
/// 2. log artifact registered for the hostname -> logs
/// 3. bound to the viewed invocation -> reported state, verbatim
/// 4. unbound -> reported state, verbatim
/// 5. viewing the active invocation -> busy
/// 6. otherwise -> abandoned
///
/// The result is recomputed on every render and never stored.
pub fn resolve_host_status(
    host: Option<&HostRecord>,
    current: Option<&InvocationId>,
    viewing: Option<&InvocationId>,
    viewed_logs: &HashMap<String, String>,
) -> HostStatus {
    let Some(host) = host else {
        return HostStatus::Disconnected;
    };
    if let Some(url) = viewed_logs.get(&host.hostname) {
        return HostStatus::Logs { url: url.clone() };
    }
    if host.state.id.as_ref() == viewing || host.state.id.is_none() {
        return HostStatus::Reported(host.state.desc.clone());
    }
    if viewing == current {
        return HostStatus::Busy;
    }
    HostStatus::Abandoned
}

#[cfg(test)]
#[path = "../tests/state/status_tests.rs"]
mod tests;
