use crate::model::{HostId, InvocationId, InvocationSummary};
use crate::state::{AppState, CurrentState, HostStatus, resolve_host_status};

/// Immutable description of everything on screen, derived from [`AppState`]
/// by [`render`]. The presentation layer diffs/draws it; nothing in here
/// touches a display surface, so every rule is unit-testable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardView {
    pub active: ActiveSlot,
    pub history: Vec<InvocationRow>,
    pub history_placeholder: bool,
    pub hosts: Vec<HostRow>,
    pub hosts_placeholder: bool,
    pub detail: Option<DetailPane>,
    pub notice: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActiveSlot {
    /// Nothing is running.
    Idle,
    /// The current resource reports errors; the cluster may be down. Kept
    /// distinct from [`ActiveSlot::Idle`] so an outage never masquerades as
    /// an idle cluster.
    Unreachable,
    Running(InvocationRow),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvocationRow {
    pub id: InvocationId,
    /// `None` when descriptor resolution failed; renders as "(failed)".
    pub name: Option<String>,
    pub url: String,
    pub commit_short: String,
    pub start: String,
    /// Failed rows have no detail to expand.
    pub expandable: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostRow {
    pub id: HostId,
    pub hostname: String,
    pub state_desc: String,
    /// Bound invocation, if any; selecting the row views it.
    pub bound: Option<InvocationId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailPane {
    pub id: InvocationId,
    pub name: String,
    pub url: String,
    pub commit: String,
    pub start: String,
    pub can_cancel: bool,
    pub global_command: Option<String>,
    pub hosts: Vec<DetailHostRow>,
    pub gen_logs: bool,
    pub log_dir: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailHostRow {
    pub hostname: String,
    pub status: HostStatus,
    pub command: Option<String>,
}

/// Derive the full view description from the state. Pure; recomputed on
/// every relevant change, host badges included.
pub fn render(state: &AppState) -> DashboardView {
    let active = match &state.view.current {
        CurrentState::Idle => ActiveSlot::Idle,
        CurrentState::Unreachable => ActiveSlot::Unreachable,
        CurrentState::Active(id) => ActiveSlot::Running(
            state
                .invocations
                .get(id)
                .map(invocation_row)
                // The summary can trail the current tick by one snapshot;
                // render the bare id until it lands.
                .unwrap_or_else(|| placeholder_row(id)),
        ),
    };

    let history: Vec<InvocationRow> = state
        .history
        .iter()
        .filter_map(|id| state.invocations.get(id))
        .map(invocation_row)
        .collect();

    let hosts: Vec<HostRow> = state
        .host_order
        .iter()
        .filter_map(|id| state.hosts.get(id))
        .map(|host| HostRow {
            id: host.id.clone(),
            hostname: host.hostname.clone(),
            state_desc: host.state.desc.clone(),
            bound: host.state.id.clone(),
        })
        .collect();

    let detail = state.view.viewing_detail.as_ref().map(|detail| {
        let current = state.view.current.id();
        let viewing = state.view.viewing.as_ref();
        DetailPane {
            id: detail.id.clone(),
            name: detail.descriptor.name.clone(),
            url: detail.url.clone(),
            commit: detail.commit.clone(),
            start: detail.start.clone(),
            can_cancel: state.view.cancel_visible(),
            global_command: detail
                .descriptor
                .command
                .as_ref()
                .map(|cmd| format_command(cmd, &detail.descriptor.args)),
            hosts: detail
                .descriptor
                .hosts
                .iter()
                .map(|(hostname, setup)| DetailHostRow {
                    hostname: hostname.clone(),
                    status: resolve_host_status(
                        state.host_by_name(hostname),
                        current,
                        viewing,
                        &detail.logs,
                    ),
                    command: setup
                        .command
                        .as_ref()
                        .map(|cmd| format_command(cmd, &setup.args)),
                })
                .collect(),
            gen_logs: detail.descriptor.gen_logs,
            log_dir: detail.descriptor.log_dir.clone(),
        }
    });

    DashboardView {
        active,
        history_placeholder: history.is_empty(),
        history,
        hosts_placeholder: hosts.is_empty(),
        hosts,
        detail,
        notice: state.notifications.visible().map(str::to_string),
    }
}

fn invocation_row(summary: &InvocationSummary) -> InvocationRow {
    InvocationRow {
        id: summary.id.clone(),
        name: summary.name.clone(),
        url: summary.url.clone(),
        commit_short: summary.commit.chars().take(10).collect(),
        start: summary.start.clone(),
        expandable: !summary.failed(),
    }
}

fn placeholder_row(id: &InvocationId) -> InvocationRow {
    InvocationRow {
        id: id.clone(),
        name: None,
        url: String::new(),
        commit_short: String::new(),
        start: String::new(),
        expandable: false,
    }
}

/// Render a command line the way it would be typed: arguments containing
/// spaces are quoted, with single quotes when the argument itself carries a
/// double quote.
pub fn format_command(command: &str, args: &[String]) -> String {
    let mut line = command.to_string();
    for arg in args {
        line.push(' ');
        if arg.contains(' ') {
            if arg.contains('"') {
                line.push_str(&format!("'{}'", arg));
            } else {
                line.push_str(&format!("\"{}\"", arg));
            }
        } else {
            line.push_str(arg);
        }
    }
    line
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
