//! Payload injection middleware.
//!
//! Copies pre-parsed `query`/`body` values off the raw request onto every
//! view of the context, pinning them so later middleware (body parsers,
//! query rewriters) cannot replace them.

use futures_util::future::BoxFuture;

use crate::error::PipelineError;
use crate::fake::is_structured;
use crate::pipeline::{Context, Middleware, Next};

/// Pins injected query and body values. Installed at the front of the chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct InjectPayload;

impl InjectPayload {
    fn inject(ctx: &mut Context) {
        let body = ctx.req.body.get().clone().filter(is_structured);
        let query = ctx.req.query.get().clone().filter(is_structured);

        if let Some(body) = body {
            ctx.req.body.pin(Some(body.clone()));
            ctx.request.body.pin(Some(body));
        }

        if let Some(query) = query {
            ctx.req.query.pin(Some(query.clone()));
            ctx.request.query.pin(query);
        }
    }
}

impl Middleware for InjectPayload {
    fn handle<'a>(
        &'a self,
        ctx: &'a mut Context,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<(), PipelineError>> {
        Self::inject(ctx);
        next.run(ctx)
    }
}
