use std::fmt;

use serde::{Deserialize, Serialize};

use super::invocation::InvocationId;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostId(pub String);

impl HostId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a host last reported: a state descriptor (`idle`, `running`,
/// `setting-up`, ...) and the invocation it is bound to, if any. The server
/// may omit `id` entirely for unbound hosts; both absent and null decode to
/// `None`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostBinding {
    pub desc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<InvocationId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRecord {
    pub id: HostId,
    pub hostname: String,
    pub state: HostBinding,
}
