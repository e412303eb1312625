use super::*;

use serde::Deserialize;

/// The scripted cluster. `/ctl/state` replaces the snapshot halves wholesale;
/// the `/api/*` handlers only read, except invoke/reinvoke/cancel which
/// mutate the way the real orchestrator would.
#[derive(Default)]
pub(crate) struct SimState {
    pub current: Option<InvocationId>,
    pub invocations: Vec<InvocationDetail>,
    pub hosts: Vec<HostRecord>,
    /// Resource name -> optional error message; while set, that resource
    /// answers with an error envelope (message omitted when `None`, to
    /// exercise the client's default substitution).
    pub failures: HashMap<String, Option<String>>,
    /// Paths that answer with a non-JSON body, to exercise the client's
    /// malformed-response handling.
    pub garbage: HashMap<String, bool>,
    next_id: u64,
}

/// Body of `POST /ctl/state`. Fields left out keep their current value.
#[derive(Deserialize)]
pub(crate) struct StatePatch {
    #[serde(default, with = "double_option")]
    pub current: Option<Option<InvocationId>>,
    pub invocations: Option<Vec<InvocationDetail>>,
    pub hosts: Option<Vec<HostRecord>>,
}

// Distinguishes `"current": null` (set idle) from an absent field (leave).
mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(de).map(Some)
    }
}

impl SimState {
    pub fn apply(&mut self, patch: StatePatch) {
        if let Some(current) = patch.current {
            self.current = current;
        }
        if let Some(invocations) = patch.invocations {
            self.invocations = invocations;
        }
        if let Some(hosts) = patch.hosts {
            self.hosts = hosts;
        }
    }

    pub fn invocation(&self, id: &InvocationId) -> Option<&InvocationDetail> {
        self.invocations.iter().find(|inv| &inv.id == id)
    }

    /// Start a new invocation from a repository URL with a canned
    /// descriptor, the way the real server would after a clone.
    pub fn invoke(&mut self, url: &str) -> InvocationDetail {
        let name = url
            .rsplit('/')
            .find(|part| !part.is_empty())
            .unwrap_or("invocation")
            .to_string();
        let detail = InvocationDetail {
            id: self.fresh_id(),
            name: Some(name.clone()),
            url: url.to_string(),
            commit: format!("{:040x}", self.next_id),
            start: now_ts(),
            descriptor: clusterdash::model::Descriptor {
                name,
                command: None,
                args: vec![],
                hosts: self
                    .hosts
                    .iter()
                    .map(|host| {
                        (
                            host.hostname.clone(),
                            clusterdash::model::HostSetup {
                                command: None,
                                args: vec![],
                            },
                        )
                    })
                    .collect(),
                gen_logs: true,
                log_dir: "logs/".to_string(),
            },
            logs: HashMap::new(),
        };
        self.start(detail.clone());
        detail
    }

    /// Re-run an existing invocation's descriptor under a fresh id.
    pub fn reinvoke(&mut self, id: &InvocationId) -> Option<InvocationDetail> {
        let mut detail = self.invocation(id)?.clone();
        detail.id = self.fresh_id();
        detail.start = now_ts();
        detail.logs = HashMap::new();
        self.start(detail.clone());
        Some(detail)
    }

    fn start(&mut self, detail: InvocationDetail) {
        self.current = Some(detail.id.clone());
        self.invocations.insert(0, detail);
    }

    fn fresh_id(&mut self) -> InvocationId {
        self.next_id += 1;
        InvocationId(format!("sim-{:04}", self.next_id))
    }
}

pub(crate) fn now_ts() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}
