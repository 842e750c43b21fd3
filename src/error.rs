//! Error types.

use axum::http::uri::InvalidUri;
use thiserror::Error;

/// Failure raised inside a pipeline before it finalized the response.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("handler failed: {0}")]
    Handler(String),

    #[error("failed to collect response body: {0}")]
    Body(#[source] axum::Error),
}

impl PipelineError {
    pub fn handler(message: impl Into<String>) -> Self {
        Self::Handler(message.into())
    }
}

/// Errors returned by [`Harness`](crate::harness::Harness).
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("request descriptor has no url")]
    MissingUrl,

    #[error("invalid url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: InvalidUri,
    },

    #[error("invalid method {0:?}")]
    InvalidMethod(String),

    #[error("invalid header {0:?}")]
    InvalidHeader(String),

    #[error("malformed request descriptor: {0}")]
    Descriptor(#[from] serde_json::Error),

    #[error("dispatch failed: {0}")]
    Dispatch(#[from] PipelineError),

    #[error("response dropped without being finalized")]
    Unfinalized,
}
