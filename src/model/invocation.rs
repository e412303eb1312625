use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvocationId(pub String);

impl InvocationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of the invocation history. `name` is `None` when the server could
/// not resolve a descriptor for the invocation (a failed clone or a broken
/// manifest); such rows render as failed and have no detail to expand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationSummary {
    pub id: InvocationId,
    pub name: Option<String>,
    pub url: String,
    pub commit: String,
    /// RFC 3339.
    pub start: String,
}

impl InvocationSummary {
    pub fn failed(&self) -> bool {
        self.name.is_none()
    }
}

/// Per-host section of a descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostSetup {
    pub command: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
}

/// The resolved specification of an invocation: an optional global setup
/// command, per-host commands, and logging configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    pub name: String,
    pub command: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    pub hosts: BTreeMap<String, HostSetup>,
    pub gen_logs: bool,
    pub log_dir: String,
}

/// Full detail for a single invocation. `logs` maps hostname to artifact URL
/// and only carries entries for hosts whose log archive has been uploaded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationDetail {
    pub id: InvocationId,
    pub name: Option<String>,
    pub url: String,
    pub commit: String,
    pub start: String,
    pub descriptor: Descriptor,
    #[serde(default)]
    pub logs: HashMap<String, String>,
}

impl InvocationDetail {
    pub fn summary(&self) -> InvocationSummary {
        InvocationSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            url: self.url.clone(),
            commit: self.commit.clone(),
            start: self.start.clone(),
        }
    }
}
