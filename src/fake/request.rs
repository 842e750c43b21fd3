//! Synthetic readable request.

use axum::body::Body;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, Uri};
use serde_json::Value;

use crate::error::HarnessError;
use crate::fake::descriptor::Descriptor;
use crate::pipeline::surface::IncomingRequest;

/// Request surface built from a [`Descriptor`].
///
/// Carries no byte stream. Pre-parsed `query` and `body` ride along as
/// extension fields for the injection middleware to pick up.
#[derive(Debug, Clone)]
pub struct FakeRequest {
    url: String,
    uri: Uri,
    method: Method,
    headers: HeaderMap,
    query: Option<Value>,
    body: Option<Value>,
}

impl FakeRequest {
    pub fn new(descriptor: impl Into<Descriptor>) -> Result<Self, HarnessError> {
        let options = descriptor.into().into_options();
        if options.url.is_empty() {
            return Err(HarnessError::MissingUrl);
        }

        let uri = options
            .url
            .parse::<Uri>()
            .map_err(|source| HarnessError::InvalidUrl {
                url: options.url.clone(),
                source,
            })?;

        let method = match options.method.as_deref() {
            None => Method::GET,
            Some(method) => Method::from_bytes(method.to_ascii_uppercase().as_bytes())
                .map_err(|_| HarnessError::InvalidMethod(method.to_string()))?,
        };

        let mut headers = HeaderMap::with_capacity(options.headers.len());
        for (name, value) in &options.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| HarnessError::InvalidHeader(name.clone()))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| HarnessError::InvalidHeader(name.clone()))?;
            headers.insert(header_name, header_value);
        }

        let query = options.effective_query().cloned();
        let body = options.effective_body().cloned();

        Ok(Self {
            url: options.url,
            uri,
            method,
            headers,
            query,
            body,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn query(&self) -> Option<&Value> {
        self.query.as_ref()
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

impl IncomingRequest for FakeRequest {
    fn method(&self) -> &Method {
        &self.method
    }

    fn uri(&self) -> &Uri {
        &self.uri
    }

    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn query(&self) -> Option<&Value> {
        self.query.as_ref()
    }

    fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    fn into_raw_body(self: Box<Self>) -> Body {
        Body::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::descriptor::RequestOptions;
    use serde_json::json;

    #[test]
    fn bare_path_defaults() {
        let req = FakeRequest::new("/items").unwrap();
        assert_eq!(req.url(), "/items");
        assert_eq!(req.method(), Method::GET);
        assert!(req.headers().is_empty());
        assert!(req.query().is_none());
        assert!(req.body().is_none());
    }

    #[test]
    fn options_without_method_default_to_get() {
        let req = FakeRequest::new(RequestOptions::new("/items")).unwrap();
        assert_eq!(req.method(), Method::GET);
    }

    #[test]
    fn json_body_ignores_form_and_body() {
        let req = FakeRequest::new(
            RequestOptions::new("/items")
                .method("POST")
                .json(json!({"a": 1}))
                .form(json!({"f": 2}))
                .body(json!({"b": 3})),
        )
        .unwrap();
        assert_eq!(req.method(), Method::POST);
        assert_eq!(req.body(), Some(&json!({"a": 1})));
    }

    #[test]
    fn lowercase_method_is_normalized() {
        let req = FakeRequest::new(RequestOptions::new("/").method("post")).unwrap();
        assert_eq!(req.method(), Method::POST);
    }

    #[test]
    fn url_query_string_is_left_alone() {
        let req = FakeRequest::new("/query?a=1").unwrap();
        assert_eq!(IncomingRequest::uri(&req).query(), Some("a=1"));
        assert!(req.query().is_none());
    }

    #[test]
    fn headers_are_copied() {
        let req = FakeRequest::new(RequestOptions::new("/").header("x-k", "v")).unwrap();
        assert_eq!(req.headers()["x-k"], "v");
    }

    #[test]
    fn construction_errors() {
        assert!(matches!(
            FakeRequest::new(RequestOptions::default()),
            Err(HarnessError::MissingUrl)
        ));
        assert!(matches!(
            FakeRequest::new("not a uri"),
            Err(HarnessError::InvalidUrl { .. })
        ));
        assert!(matches!(
            FakeRequest::new(RequestOptions::new("/").method("BAD METHOD")),
            Err(HarnessError::InvalidMethod(_))
        ));
        assert!(matches!(
            FakeRequest::new(RequestOptions::new("/").header("bad header", "v")),
            Err(HarnessError::InvalidHeader(_))
        ));
    }
}
