//! Request and response surfaces consumed by the pipeline.
//!
//! # Responsibilities
//! - Describe the readable side of a request the pipeline dispatches on
//! - Describe the writable sink the pipeline finalizes into
//!
//! # Design Decisions
//! - Trait objects, so a pipeline never knows whether it talks to a socket
//! - `end` consumes the boxed response: finalizing twice cannot be expressed
//! - Pre-parsed `query`/`body` are optional extension fields, `None` for real traffic

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};
use serde_json::Value;

/// Readable side of a request.
pub trait IncomingRequest: Send + 'static {
    fn method(&self) -> &Method;

    fn uri(&self) -> &Uri;

    fn headers(&self) -> &HeaderMap;

    /// Pre-parsed query object carried alongside the request, if any.
    fn query(&self) -> Option<&Value> {
        None
    }

    /// Pre-parsed body carried alongside the request, if any.
    fn body(&self) -> Option<&Value> {
        None
    }

    /// Raw body bytes for native parsers.
    fn into_raw_body(self: Box<Self>) -> Body;
}

/// Writable side of a response.
pub trait OutgoingResponse: Send + 'static {
    fn status_code(&self) -> StatusCode;

    fn set_status_code(&mut self, status: StatusCode);

    /// Set a header, replacing earlier values under the same name.
    fn set_header(&mut self, name: HeaderName, value: HeaderValue);

    /// Add a header value, keeping earlier values under the same name.
    fn append_header(&mut self, name: HeaderName, value: HeaderValue);

    fn get_headers(&self) -> &HeaderMap;

    /// Finalize the response with `body`.
    fn end(self: Box<Self>, body: Bytes);
}
