//! Concrete middleware pipeline in front of an axum router.
//!
//! # Data Flow
//! ```text
//! (IncomingRequest, OutgoingResponse)
//!     → Context (raw view, parsed view, collected response)
//!     → middleware stack, in order
//!     → Endpoint (axum Router via tower oneshot)
//!     → Context::respond → OutgoingResponse::end(body)
//! ```
//!
//! # Design Decisions
//! - `callback()` snapshots the stack; later edits need a new callback
//! - Errors from middleware are returned to the caller untranslated
//! - Routing, 404 and 405 are entirely the router's business

use std::sync::Arc;

use axum::http::Request;
use axum::Router;
use futures_util::future::BoxFuture;
use tower::ServiceExt;

use crate::config::AppConfig;
use crate::error::PipelineError;
use crate::pipeline::context::Context;
use crate::pipeline::extract::{RequestBody, RequestQuery};
use crate::pipeline::middleware::{Middleware, MiddlewareStack, Next};
use crate::pipeline::surface::{IncomingRequest, OutgoingResponse};
use crate::pipeline::{Dispatch, Pipeline};

/// Terminal stage: hands the request to the router and collects its response.
pub struct Endpoint {
    router: Router,
    body_limit: usize,
}

impl Endpoint {
    pub(crate) async fn serve(&self, ctx: &mut Context) -> Result<(), PipelineError> {
        let mut request = Request::new(ctx.req.take_raw_body());
        *request.method_mut() = ctx.req.method().clone();
        *request.uri_mut() = ctx.req.uri().clone();
        *request.headers_mut() = ctx.req.headers().clone();
        request
            .extensions_mut()
            .insert(RequestQuery(ctx.query().clone()));
        request
            .extensions_mut()
            .insert(RequestBody(ctx.body().cloned()));

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .unwrap_or_else(|never| match never {});

        let (parts, body) = response.into_parts();
        let body = axum::body::to_bytes(body, self.body_limit)
            .await
            .map_err(PipelineError::Body)?;

        ctx.response.status = parts.status;
        ctx.response.headers.extend(parts.headers);
        ctx.response.body = body;
        Ok(())
    }
}

/// Middleware pipeline wrapping an axum router.
pub struct App {
    middleware: MiddlewareStack,
    router: Router,
    config: AppConfig,
}

impl App {
    pub fn new(router: Router) -> Self {
        Self::with_config(router, AppConfig::default())
    }

    pub fn with_config(router: Router, config: AppConfig) -> Self {
        Self {
            middleware: MiddlewareStack::new(),
            router,
            config,
        }
    }

    /// Append middleware to the end of the stack.
    pub fn use_middleware<M: Middleware>(&mut self, middleware: M) -> &mut Self {
        self.middleware.push(middleware);
        self
    }

    pub fn middleware(&self) -> &MiddlewareStack {
        &self.middleware
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl Pipeline for App {
    fn middleware_mut(&mut self) -> &mut MiddlewareStack {
        &mut self.middleware
    }

    fn callback(&self) -> Dispatch {
        let chain = self.middleware.compile();
        let endpoint = Arc::new(Endpoint {
            router: self.router.clone(),
            body_limit: self.config.body_limit,
        });
        let query_arrays = self.config.query_arrays;

        Arc::new(
            move |req: Box<dyn IncomingRequest>,
                  res: Box<dyn OutgoingResponse>|
                  -> BoxFuture<'static, Result<(), PipelineError>> {
                let chain = Arc::clone(&chain);
                let endpoint = Arc::clone(&endpoint);
                Box::pin(async move {
                    let mut ctx = Context::new(req, res, query_arrays);
                    tracing::debug!(
                        method = %ctx.method(),
                        path = %ctx.path(),
                        "Dispatching request"
                    );

                    Next::new(&chain, &endpoint).run(&mut ctx).await?;
                    ctx.respond();
                    Ok(())
                })
            },
        )
    }
}
