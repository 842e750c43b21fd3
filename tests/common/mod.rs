//! Shared router and pipeline setup for harness tests.

use axum::extract::{Path, Query};
use axum::http::{header::SET_COOKIE, HeaderName, HeaderValue, StatusCode};
use axum::response::{AppendHeaders, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use offline_pipeline::pipeline::{RequestBody, RequestQuery};
use offline_pipeline::App;

pub const OK_TEXT: &str = "route is ok";
pub const HEADER_KEY: &str = "x-my-header-key";
pub const HEADER_VALUE: &str = "x-my-header-value";

/// Router exercising status codes, headers, params, query and body access.
pub fn router() -> Router {
    Router::new()
        .route("/", get(|| async { OK_TEXT }))
        .route("/status/code", get(|| async { (StatusCode::CREATED, OK_TEXT) }))
        .route(
            "/header",
            get(|| async {
                (
                    [(HeaderName::from_static(HEADER_KEY), HeaderValue::from_static(HEADER_VALUE))],
                    OK_TEXT,
                )
            }),
        )
        .route("/done", post(|| async { "done" }))
        .route(
            "/cookies",
            get(|| async { (AppendHeaders([(SET_COOKIE, "a=1"), (SET_COOKIE, "b=2")]), OK_TEXT) }),
        )
        .route(
            "/param/{a}/{b}/c/{d}",
            get(|Path((a, b, d)): Path<(String, String, String)>| async move {
                format!("{a} {b} {d}")
            }),
        )
        .route(
            "/query",
            get(|RequestQuery(query): RequestQuery| async move { Json(query) }),
        )
        .route(
            "/native-query",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let mut keys: Vec<_> = params.into_iter().collect();
                keys.sort();
                Json(json!(keys))
            }),
        )
        .route("/form", post(echo_body))
        .route("/json", post(echo_body).put(echo_body))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-served-by"),
            HeaderValue::from_static("router"),
        ))
        .layer(TraceLayer::new_for_http())
}

async fn echo_body(RequestBody(body): RequestBody) -> impl IntoResponse {
    match body {
        Some(body) => Json(body).into_response(),
        None => (StatusCode::BAD_REQUEST, "no body").into_response(),
    }
}

pub fn app() -> App {
    offline_pipeline::observability::init_logging("offline_pipeline=debug");
    App::new(router())
}

pub fn body_json(res: &offline_pipeline::FakeResponse) -> Value {
    res.json().expect("response body is JSON")
}
