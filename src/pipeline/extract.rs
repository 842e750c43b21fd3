//! Axum extractors for the context's query and body accessors.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Query object as seen by the pipeline context (pinned or natively parsed).
#[derive(Debug, Clone, PartialEq)]
pub struct RequestQuery(pub Value);

/// Parsed request body as seen by the pipeline context.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RequestBody(pub Option<Value>);

impl RequestQuery {
    /// Look up a top-level query field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl RequestBody {
    /// Deserialize the body into `T`. Returns `None` when no body was parsed.
    pub fn parse<T: DeserializeOwned>(&self) -> Option<Result<T, serde_json::Error>> {
        self.0.clone().map(serde_json::from_value)
    }
}

impl<S> FromRequestParts<S> for RequestQuery
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<Self>()
            .cloned()
            .unwrap_or_else(|| RequestQuery(Value::Object(Map::new()))))
    }
}

impl<S> FromRequestParts<S> for RequestBody
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Self>().cloned().unwrap_or_default())
    }
}
