use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::model::{Envelope, HostRecord, InvocationDetail, InvocationId, InvocationSummary};

/// Errors from one API request. The split matters to the poll loop: transport
/// and parse failures are swallowed for the tick (the cache keeps its last
/// good snapshot), while a server-reported error is surfaced per resource.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("could not reach the cluster server: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unparseable response from the cluster server: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("{0}")]
    Server(String),
}

#[derive(Clone)]
pub struct ApiClient {
    base: String,
    http: reqwest::blocking::Client,
}

impl ApiClient {
    pub fn new(server: &str, port: u16) -> Result<Self> {
        Self::with_base(&format!("http://{}:{}", server, port))
    }

    pub fn with_base(base: &str) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent("clusterdash")
            .build()
            .context("build reqwest client")?;
        Ok(Self {
            base: base.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// The id of the actively running invocation, or `None` when the server
    /// confirms nothing is running. A server-side error is distinct from an
    /// idle cluster and comes back as `ApiError::Server`.
    pub fn current(&self) -> Result<Option<InvocationId>, ApiError> {
        self.get("/api/current")
    }

    pub fn invocations(&self) -> Result<Vec<InvocationSummary>, ApiError> {
        self.get("/api/invocations").map(Option::unwrap_or_default)
    }

    pub fn hosts(&self) -> Result<Vec<HostRecord>, ApiError> {
        self.get("/api/hosts").map(Option::unwrap_or_default)
    }

    pub fn invocation(&self, id: &InvocationId) -> Result<InvocationDetail, ApiError> {
        self.require(self.get(&format!("/api/invocation/{}", encode_segment(id.as_str())))?)
    }

    /// Ask the server to clone `url`, resolve its descriptor and start a new
    /// invocation. Fire-and-confirm: no retry on failure.
    pub fn invoke(&self, url: &str) -> Result<InvocationDetail, ApiError> {
        self.require(self.get(&format!("/api/invoke/{}", encode_segment(url)))?)
    }

    /// Re-run the descriptor of an existing invocation under a fresh id.
    pub fn reinvoke(&self, id: &InvocationId) -> Result<InvocationDetail, ApiError> {
        self.require(self.get(&format!("/api/reinvoke/{}", encode_segment(id.as_str())))?)
    }

    /// Stop the active invocation. The acknowledgement carries no payload.
    pub fn cancel(&self) -> Result<(), ApiError> {
        self.get::<serde_json::Value>("/api/cancel").map(|_| ())
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, ApiError> {
        let body = self
            .http
            .get(format!("{}{}", self.base, path))
            .send()?
            .text()?;
        let envelope: Envelope<T> = serde_json::from_str(&body)?;
        envelope.into_result().map_err(ApiError::Server)
    }

    fn require<T>(&self, payload: Option<T>) -> Result<T, ApiError> {
        payload.ok_or_else(|| ApiError::Server("the server returned an empty payload".to_string()))
    }
}

/// Percent-encode a value destined for one path segment, so repository URLs
/// can ride inside `/api/invoke/{url}`.
pub fn encode_segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
