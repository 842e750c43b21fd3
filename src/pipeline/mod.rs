//! Middleware pipeline subsystem.
//!
//! The harness drives any [`Pipeline`]: something with a mutable, ordered
//! middleware list and a compiled "dispatch one request" entry point.
//! [`App`] is the concrete implementation, fronting an axum `Router`.

pub mod app;
pub mod context;
pub mod extract;
pub mod locked;
pub mod middleware;
pub mod surface;

use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::error::PipelineError;

pub use app::App;
pub use context::Context;
pub use extract::{RequestBody, RequestQuery};
pub use locked::Locked;
pub use middleware::{from_fn, Middleware, MiddlewareStack, Next};
pub use surface::{IncomingRequest, OutgoingResponse};

/// Compiled entry point handling a single request/response pair.
pub type Dispatch = Arc<
    dyn Fn(
            Box<dyn IncomingRequest>,
            Box<dyn OutgoingResponse>,
        ) -> BoxFuture<'static, Result<(), PipelineError>>
        + Send
        + Sync,
>;

/// A middleware pipeline the harness can wrap.
pub trait Pipeline {
    fn middleware_mut(&mut self) -> &mut MiddlewareStack;

    /// Compile the current stack into a dispatch function.
    fn callback(&self) -> Dispatch;
}
