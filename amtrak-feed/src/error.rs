//! Feed error types.
//!
//! Every stage of the pipeline fails fast with one of these. Nothing in the
//! crate substitutes empty or default data for a failed stage.

use std::fmt;

/// Longest response-body excerpt carried inside an error.
const MAX_BODY_EXCERPT: usize = 500;

/// Which of the two ciphertext segments a decryption error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// The fixed-length tail carrying the ephemeral key.
    Key,
    /// The prefix carrying the GeoJSON document.
    Content,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layer::Key => f.write_str("key"),
            Layer::Content => f.write_str("content"),
        }
    }
}

/// Why an upstream endpoint could not be used.
#[derive(Debug, thiserror::Error)]
pub enum Unavailable {
    /// No response within the configured timeout
    #[error("request timed out")]
    Timeout,

    /// Connection, TLS, or body-read failure
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// Non-2xx response
    #[error("status {status}: {body}")]
    Status { status: u16, body: String },

    /// 2xx response whose body is not JSON
    #[error("body is not JSON: {message}")]
    NotJson { message: String, body: String },
}

/// Errors from fetching and decrypting the map feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// Network failure, timeout, non-2xx status, or unparseable parameter document
    #[error("upstream unavailable ({url}): {reason}")]
    UpstreamUnavailable {
        url: String,
        #[source]
        reason: Unavailable,
    },

    /// An expected field, array, or index is missing or out of range
    #[error("unexpected upstream shape: {0}")]
    ProtocolShape(String),

    /// Salt is not valid hexadecimal
    #[error("invalid salt: {0}")]
    InvalidSalt(String),

    /// IV is not valid hexadecimal or has the wrong length
    #[error("invalid IV: {0}")]
    InvalidIv(String),

    /// Payload does not match the expected segment layout
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// Padding or UTF-8 check failed after decryption
    #[error("decryption failed for {layer} segment: {reason}")]
    DecryptionFailed { layer: Layer, reason: &'static str },

    /// Content decrypted cleanly but is not JSON
    #[error("decrypted content is not JSON: {message}")]
    JsonParse { message: String },

    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl FeedError {
    /// Whether this error came from the network rather than the data.
    ///
    /// Callers deciding on a retry should only retry these.
    pub fn is_upstream_unavailable(&self) -> bool {
        matches!(self, FeedError::UpstreamUnavailable { .. })
    }
}

/// Truncate a response body for inclusion in an error message.
pub(crate) fn body_excerpt(body: &str) -> String {
    body.chars().take(MAX_BODY_EXCERPT).collect()
}
