use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WriteError {
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no runtime available to deliver beacon")]
    BeaconUnavailable,
}

/// What the store should send back for an insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prefer {
    /// No body; used for routine updates.
    Minimal,
    /// The inserted rows; used to learn the generated session id.
    Representation,
}

impl Prefer {
    pub fn header_value(self) -> &'static str {
        match self {
            Self::Minimal => "return=minimal",
            Self::Representation => "return=representation",
        }
    }
}

/// Raw delivery to the store. Errors are reported here and swallowed by
/// [`RemoteWriter`](crate::RemoteWriter).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Insert one row into `table`.
    ///
    /// Returns the decoded response body for [`Prefer::Representation`],
    /// `None` for [`Prefer::Minimal`].
    async fn insert(
        &self,
        table: &str,
        body: Value,
        prefer: Prefer,
    ) -> Result<Option<Value>, WriteError>;

    /// Queue a delivery that is attempted even while the host tears down.
    ///
    /// Must not block and never reports the store's response.
    fn beacon(&self, table: &str, body: Value) -> Result<(), WriteError>;
}
