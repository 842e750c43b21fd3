//! Synthetic writable response.

use axum::body::Bytes;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use serde::de::DeserializeOwned;

use crate::pipeline::surface::OutgoingResponse;

type OnFinish = Box<dyn FnOnce(FakeResponse) + Send>;

/// Response sink that hands itself to a callback instead of writing to a socket.
///
/// `end` stores the finalized body on the instance and then passes the
/// instance to the completion callback, so whoever receives it can inspect
/// status, headers and body together. `end` consumes the response, so the
/// callback runs at most once.
pub struct FakeResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Option<Bytes>,
    on_finish: Option<OnFinish>,
}

impl FakeResponse {
    pub fn new<F>(on_finish: F) -> Self
    where
        F: FnOnce(FakeResponse) + Send + 'static,
    {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: None,
            on_finish: Some(Box::new(on_finish)),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn set_status_code(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Set a header, replacing any previous value under the same name.
    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    pub fn append_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.append(name, value);
    }

    pub fn get_headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value as a string, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Value the pipeline finalized the response with.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub fn text(&self) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|body| std::str::from_utf8(body).ok())
    }

    /// Deserialize the finalized body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(self.body.as_deref().unwrap_or_default())
    }

    /// Finalize: capture `body`, then run the completion callback.
    pub fn end(mut self, body: Bytes) {
        self.body = Some(body);
        if let Some(on_finish) = self.on_finish.take() {
            on_finish(self);
        }
    }
}

impl std::fmt::Debug for FakeResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body", &self.body)
            .field("finalized", &self.on_finish.is_none())
            .finish()
    }
}

impl OutgoingResponse for FakeResponse {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn set_status_code(&mut self, status: StatusCode) {
        self.status = status;
    }

    fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    fn append_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.append(name, value);
    }

    fn get_headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn end(self: Box<Self>, body: Bytes) {
        FakeResponse::end(*self, body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn defaults_to_ok() {
        let res = FakeResponse::new(|_| {});
        assert_eq!(res.status_code(), StatusCode::OK);
        assert!(res.get_headers().is_empty());
        assert!(res.body().is_none());
    }

    #[test]
    fn last_header_write_wins() {
        let mut res = FakeResponse::new(|_| {});
        res.set_header(HeaderName::from_static("x-k"), HeaderValue::from_static("v1"));
        res.set_header(HeaderName::from_static("x-k"), HeaderValue::from_static("v2"));

        assert_eq!(res.get_headers().len(), 1);
        assert_eq!(res.header("x-k"), Some("v2"));
    }

    #[test]
    fn append_keeps_every_value() {
        let mut res = FakeResponse::new(|_| {});
        res.append_header(HeaderName::from_static("set-cookie"), HeaderValue::from_static("a=1"));
        res.append_header(HeaderName::from_static("set-cookie"), HeaderValue::from_static("b=2"));

        assert_eq!(res.get_headers().get_all("set-cookie").iter().count(), 2);
        assert_eq!(res.header("set-cookie"), Some("a=1"));
    }

    #[test]
    fn end_captures_body_before_callback() {
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        let mut res = FakeResponse::new(move |res: FakeResponse| {
            *sink.lock().unwrap() = Some((res.status_code(), res.text().map(str::to_owned)));
        });
        res.set_status_code(StatusCode::CREATED);

        res.end(Bytes::from_static(b"done"));

        assert_eq!(
            *seen.lock().unwrap(),
            Some((StatusCode::CREATED, Some("done".to_string())))
        );
    }

    #[test]
    fn boxed_end_runs_callback_once() {
        let calls = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&calls);
        let res: Box<dyn OutgoingResponse> = Box::new(FakeResponse::new(move |_| {
            *counter.lock().unwrap() += 1;
        }));

        res.end(Bytes::new());
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[test]
    fn json_body() {
        let (tx, rx) = std::sync::mpsc::channel();
        let res = FakeResponse::new(move |res| tx.send(res).unwrap());
        res.end(Bytes::from_static(br#"{"a":1}"#));

        let res = rx.recv().unwrap();
        let value: serde_json::Value = res.json().unwrap();
        assert_eq!(value, serde_json::json!({"a": 1}));
    }
}
