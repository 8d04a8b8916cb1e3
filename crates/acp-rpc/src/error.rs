//! Submission error types.
//!
//! These never escape a batch submission: the aggregator folds them into
//! per-proof [`SubmissionResult`](acp_core::SubmissionResult) values.

/// A proof string could not be turned into verifier call data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    /// The payload is shorter than the fixed public-inputs segment.
    #[error("proof payload has {len} hex characters; at least {min} are required for public inputs")]
    TooShort { len: usize, min: usize },
    /// The payload is not an even-length hex string.
    #[error("proof payload is not valid hex: {0}")]
    InvalidHex(String),
}

/// JSON-RPC transport errors.
///
/// The endpoint URL carries the API key, so request URLs are stripped from
/// every wrapped [`reqwest::Error`].
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Request failed after retries (connect, timeout, body read).
    #[error("JSON-RPC request failed: {0}")]
    Http(#[source] reqwest::Error),
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}
