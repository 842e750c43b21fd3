//! Middleware chain primitives.
//!
//! # Responsibilities
//! - Define the middleware contract (`handle(ctx, next)`)
//! - Keep an ordered stack with type-identity lookups
//! - Drive the remainder of the chain through `Next`
//!
//! # Design Decisions
//! - Identity is the middleware's `TypeId`, recorded when it is added
//! - The stack is compiled into an immutable slice per `callback()`

use std::any::{type_name, TypeId};
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::error::PipelineError;
use crate::pipeline::app::Endpoint;
use crate::pipeline::context::Context;

/// A single stage of the pipeline.
pub trait Middleware: Send + Sync + 'static {
    fn handle<'a>(
        &'a self,
        ctx: &'a mut Context,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<(), PipelineError>>;
}

/// Continuation for the rest of the chain.
pub struct Next<'a> {
    rest: &'a [Arc<dyn Middleware>],
    endpoint: &'a Endpoint,
}

impl<'a> Next<'a> {
    pub(crate) fn new(chain: &'a [Arc<dyn Middleware>], endpoint: &'a Endpoint) -> Self {
        Self {
            rest: chain,
            endpoint,
        }
    }

    /// Run the remaining middleware, then the endpoint.
    pub fn run<'b>(self, ctx: &'b mut Context) -> BoxFuture<'b, Result<(), PipelineError>>
    where
        'a: 'b,
    {
        match self.rest.split_first() {
            Some((head, rest)) => head.handle(
                ctx,
                Next {
                    rest,
                    endpoint: self.endpoint,
                },
            ),
            None => Box::pin(self.endpoint.serve(ctx)),
        }
    }
}

/// Middleware built from a closure. See [`from_fn`].
pub struct FnMiddleware<F> {
    f: F,
}

impl<F> Middleware for FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut Context, Next<'a>) -> BoxFuture<'a, Result<(), PipelineError>>
        + Send
        + Sync
        + 'static,
{
    fn handle<'a>(
        &'a self,
        ctx: &'a mut Context,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<(), PipelineError>> {
        (self.f)(ctx, next)
    }
}

/// Wrap a closure returning a boxed future as middleware.
///
/// ```ignore
/// app.use_middleware(from_fn(|ctx, next| Box::pin(async move {
///     next.run(ctx).await?;
///     ctx.response.headers.insert("x-seen", HeaderValue::from_static("1"));
///     Ok(())
/// })));
/// ```
pub fn from_fn<F>(f: F) -> FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut Context, Next<'a>) -> BoxFuture<'a, Result<(), PipelineError>>
        + Send
        + Sync
        + 'static,
{
    FnMiddleware { f }
}

struct Entry {
    id: TypeId,
    name: &'static str,
    middleware: Arc<dyn Middleware>,
}

/// Ordered middleware list.
#[derive(Default)]
pub struct MiddlewareStack {
    entries: Vec<Entry>,
}

impl MiddlewareStack {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry<M: Middleware>(middleware: M) -> Entry {
        Entry {
            id: TypeId::of::<M>(),
            name: type_name::<M>(),
            middleware: Arc::new(middleware),
        }
    }

    /// Append to the end of the chain.
    pub fn push<M: Middleware>(&mut self, middleware: M) {
        self.entries.push(Self::entry(middleware));
    }

    /// Insert at the front of the chain.
    pub fn unshift<M: Middleware>(&mut self, middleware: M) {
        self.entries.insert(0, Self::entry(middleware));
    }

    pub fn contains<M: Middleware>(&self) -> bool {
        self.position::<M>().is_some()
    }

    pub fn position<M: Middleware>(&self) -> Option<usize> {
        let id = TypeId::of::<M>();
        self.entries.iter().position(|entry| entry.id == id)
    }

    /// Number of entries of type `M`.
    pub fn count<M: Middleware>(&self) -> usize {
        let id = TypeId::of::<M>();
        self.entries.iter().filter(|entry| entry.id == id).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    pub(crate) fn compile(&self) -> Arc<[Arc<dyn Middleware>]> {
        self.entries
            .iter()
            .map(|entry| Arc::clone(&entry.middleware))
            .collect()
    }
}

impl std::fmt::Debug for MiddlewareStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct First;
    struct Second;

    impl Middleware for First {
        fn handle<'a>(
            &'a self,
            ctx: &'a mut Context,
            next: Next<'a>,
        ) -> BoxFuture<'a, Result<(), PipelineError>> {
            next.run(ctx)
        }
    }

    impl Middleware for Second {
        fn handle<'a>(
            &'a self,
            ctx: &'a mut Context,
            next: Next<'a>,
        ) -> BoxFuture<'a, Result<(), PipelineError>> {
            next.run(ctx)
        }
    }

    #[test]
    fn unshift_places_at_front() {
        let mut stack = MiddlewareStack::new();
        stack.push(First);
        stack.unshift(Second);

        assert_eq!(stack.len(), 2);
        assert_eq!(stack.position::<Second>(), Some(0));
        assert_eq!(stack.position::<First>(), Some(1));
    }

    #[test]
    fn identity_is_by_type() {
        let mut stack = MiddlewareStack::new();
        assert!(!stack.contains::<First>());

        stack.push(First);
        stack.push(First);
        assert!(stack.contains::<First>());
        assert!(!stack.contains::<Second>());
        assert_eq!(stack.count::<First>(), 2);
    }

    #[test]
    fn compile_preserves_order() {
        let mut stack = MiddlewareStack::new();
        stack.push(First);
        stack.push(Second);
        assert_eq!(stack.compile().len(), 2);
        assert!(stack.names().next().is_some_and(|name| name.ends_with("First")));
    }
}
