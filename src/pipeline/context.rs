//! Per-request context threaded through the middleware chain.
//!
//! # Responsibilities
//! - Hold the raw request view and the parsed request view side by side
//! - Natively parse the URI query string into the parsed view
//! - Collect the pipeline's own status, headers and body until respond time
//!
//! # Design Decisions
//! - `query` and `body` are `Locked` on both views so they can be pinned
//! - The raw response sink stays reachable (`ctx.res`) for handlers that
//!   bypass the collected response, exactly like a real socket-backed sink
//! - At respond time collected headers are appended to the sink, so repeated
//!   names (`Set-Cookie`) survive; a status written straight to the sink
//!   takes precedence over the collected one

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use serde_json::{Map, Value};

use crate::pipeline::locked::Locked;
use crate::pipeline::surface::{IncomingRequest, OutgoingResponse};

/// Raw request view.
pub struct RawRequest {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    raw_body: Option<Body>,
    /// Extension field carrying a pre-parsed query.
    pub query: Locked<Option<Value>>,
    /// Extension field carrying a pre-parsed body.
    pub body: Locked<Option<Value>>,
}

impl RawRequest {
    fn from_surface(surface: Box<dyn IncomingRequest>) -> Self {
        let method = surface.method().clone();
        let uri = surface.uri().clone();
        let headers = surface.headers().clone();
        let query = Locked::new(surface.query().cloned());
        let body = Locked::new(surface.body().cloned());

        Self {
            method,
            uri,
            headers,
            raw_body: Some(surface.into_raw_body()),
            query,
            body,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Take the raw body stream. Subsequent calls yield an empty body.
    pub fn take_raw_body(&mut self) -> Body {
        self.raw_body.take().unwrap_or_else(Body::empty)
    }
}

/// Parsed request view.
#[derive(Debug, Default)]
pub struct RequestView {
    pub query: Locked<Value>,
    pub body: Locked<Option<Value>>,
}

/// Response the pipeline is assembling.
#[derive(Debug)]
pub struct ResponseView {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Default for ResponseView {
    fn default() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }
}

/// Context for a single dispatched request.
pub struct Context {
    pub req: RawRequest,
    pub request: RequestView,
    pub response: ResponseView,
    pub res: Box<dyn OutgoingResponse>,
    sink_status: StatusCode,
}

impl Context {
    pub fn new(
        req: Box<dyn IncomingRequest>,
        res: Box<dyn OutgoingResponse>,
        query_arrays: bool,
    ) -> Self {
        let req = RawRequest::from_surface(req);
        let query = parse_query(req.uri().query(), query_arrays);
        let sink_status = res.status_code();

        Self {
            req,
            request: RequestView {
                query: Locked::new(query),
                body: Locked::new(None),
            },
            response: ResponseView::default(),
            res,
            sink_status,
        }
    }

    pub fn method(&self) -> &Method {
        self.req.method()
    }

    pub fn path(&self) -> &str {
        self.req.uri().path()
    }

    /// Query alias, backed by the parsed request view.
    pub fn query(&self) -> &Value {
        self.request.query.get()
    }

    pub fn set_query(&mut self, query: Value) -> bool {
        self.request.query.set(query)
    }

    /// Body alias, backed by the parsed request view.
    pub fn body(&self) -> Option<&Value> {
        self.request.body.get().as_ref()
    }

    /// Set the response status and body.
    pub fn respond_with(&mut self, status: StatusCode, body: impl Into<Bytes>) {
        self.response.status = status;
        self.response.body = body.into();
    }

    /// Write the collected response onto the sink and finalize it.
    pub(crate) fn respond(self) {
        let Context {
            response,
            mut res,
            sink_status,
            ..
        } = self;

        if res.status_code() == sink_status {
            res.set_status_code(response.status);
        }
        for (name, value) in response.headers.iter() {
            res.append_header(name.clone(), value.clone());
        }
        res.end(response.body);
    }
}

/// Parse a URL-encoded query string into a JSON object of strings.
///
/// With `arrays` set, a repeated key collects its values into an array;
/// otherwise the last occurrence wins.
pub fn parse_query(query: Option<&str>, arrays: bool) -> Value {
    let mut map = Map::new();
    let Some(query) = query else {
        return Value::Object(map);
    };

    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        let value = Value::String(value.into_owned());
        if arrays {
            if let Some(existing) = map.get_mut(key.as_ref()) {
                match existing {
                    Value::Array(items) => items.push(value),
                    other => {
                        let first = other.take();
                        *other = Value::Array(vec![first, value]);
                    }
                }
                continue;
            }
        }
        map.insert(key.into_owned(), value);
    }
    Value::Object(map)
}
