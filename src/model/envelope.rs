use serde::{Deserialize, Serialize};

/// Substituted when an error envelope arrives without a `msg`.
pub const DEFAULT_ERROR_MSG: &str = "an error occurred";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    // Older servers abbreviate the error status.
    #[serde(alias = "err")]
    Error,
}

/// Response envelope shared by every API endpoint: `status` is mandatory,
/// `payload` is optional even on success (a void acknowledgement), and `msg`
/// is optional on error.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: Status,
    #[serde(default = "none", skip_serializing_if = "Option::is_none")]
    pub payload: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

// `#[serde(default)]` alone requires `T: Default`; route through a helper so
// any payload type works.
fn none<T>() -> Option<T> {
    None
}

impl<T> Envelope<T> {
    pub fn into_result(self) -> Result<Option<T>, String> {
        match self.status {
            Status::Ok => Ok(self.payload),
            Status::Error => Err(self.msg.unwrap_or_else(|| DEFAULT_ERROR_MSG.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "../tests/model/envelope_tests.rs"]
mod tests;
