//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

/// Default cap on collected endpoint response bodies (2 MiB).
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Settings for an [`App`](crate::pipeline::App) pipeline.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Maximum number of response body bytes collected from the endpoint.
    pub body_limit: usize,

    /// Collect repeated query keys into arrays instead of keeping the last value.
    pub query_arrays: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            body_limit: DEFAULT_BODY_LIMIT,
            query_arrays: true,
        }
    }
}
