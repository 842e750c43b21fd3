//! In-process request harness for middleware pipelines.
//!
//! Drives a pipeline's request handling directly with a synthetic
//! request/response pair: no socket, no listening port. Pre-parsed query
//! objects and bodies are injected so handlers observe them without any
//! body parser running.

pub mod config;
pub mod error;
pub mod fake;
pub mod harness;
pub mod observability;
pub mod pipeline;

pub use config::AppConfig;
pub use error::{HarnessError, PipelineError};
pub use fake::{Descriptor, FakeRequest, FakeResponse, RequestOptions};
pub use harness::{Harness, InjectPayload};
pub use pipeline::{App, Pipeline};
