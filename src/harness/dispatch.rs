//! Dispatch adapter: the entry point test code calls.

use tokio::sync::oneshot;

use crate::error::{HarnessError, PipelineError};
use crate::fake::{Descriptor, FakeRequest, FakeResponse, RequestOptions};
use crate::harness::inject::InjectPayload;
use crate::pipeline::{Dispatch, Pipeline};

/// Drives a pipeline with synthetic requests, no sockets involved.
#[derive(Clone)]
pub struct Harness {
    dispatch: Dispatch,
}

impl Harness {
    /// Wrap `pipeline`, installing [`InjectPayload`] at the front unless it
    /// is already there, and capture its dispatch entry point.
    pub fn new<P: Pipeline + ?Sized>(pipeline: &mut P) -> Self {
        let stack = pipeline.middleware_mut();
        if stack.contains::<InjectPayload>() {
            tracing::debug!("Payload injection already installed");
        } else {
            stack.unshift(InjectPayload);
            tracing::debug!(middleware = stack.len(), "Installed payload injection");
        }

        Self {
            dispatch: pipeline.callback(),
        }
    }

    /// Simulate one request and resolve with the finalized response.
    ///
    /// Rejects if the pipeline fails before finalizing. A pipeline that
    /// keeps the response without ever finalizing it makes this wait forever.
    pub async fn request(
        &self,
        descriptor: impl Into<Descriptor>,
    ) -> Result<FakeResponse, HarnessError> {
        let req = FakeRequest::new(descriptor)?;
        let (tx, mut finished) = oneshot::channel();
        let res = FakeResponse::new(move |res| {
            // The receiver is gone only if the caller dropped the request future.
            let _ = tx.send(res);
        });

        let mut dispatch = (self.dispatch)(Box::new(req), Box::new(res));

        tokio::select! {
            biased;

            finalized = &mut finished => match finalized {
                Ok(res) => Ok(res),
                // Response dropped unfinalized: report the pipeline's own error if it has one.
                Err(_) => match dispatch.await {
                    Ok(()) => Err(HarnessError::Unfinalized),
                    Err(err) => Err(rejected(err)),
                },
            },
            outcome = &mut dispatch => match outcome {
                Ok(()) => finished.await.map_err(|_| HarnessError::Unfinalized),
                // Finalized and failed within the same poll: the response stands.
                Err(err) => match finished.try_recv() {
                    Ok(res) => Ok(res),
                    Err(_) => Err(rejected(err)),
                },
            },
        }
    }

    pub async fn get(&self, path: &str) -> Result<FakeResponse, HarnessError> {
        self.request(path).await
    }

    pub async fn post_json(
        &self,
        path: &str,
        json: serde_json::Value,
    ) -> Result<FakeResponse, HarnessError> {
        self.request(RequestOptions::new(path).method("POST").json(json)).await
    }

    pub async fn post_form(
        &self,
        path: &str,
        form: serde_json::Value,
    ) -> Result<FakeResponse, HarnessError> {
        self.request(RequestOptions::new(path).method("POST").form(form)).await
    }
}

fn rejected(err: PipelineError) -> HarnessError {
    tracing::warn!(error = %err, "Dispatch failed before finalize");
    HarnessError::Dispatch(err)
}

impl std::fmt::Debug for Harness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Harness").finish_non_exhaustive()
    }
}
