//! Request descriptors: what test code asks the harness to send.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::HarnessError;

/// A request to simulate: a bare path (GET) or a full set of options.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Descriptor {
    Path(String),
    Options(RequestOptions),
}

/// Structured request description.
///
/// `query` (or its alias `qs`) and the body fields carry already-parsed
/// values; nothing here is re-encoded into the URL or a byte stream.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RequestOptions {
    pub url: String,
    pub method: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub query: Option<Value>,
    pub qs: Option<Value>,
    pub body: Option<Value>,
    pub form: Option<Value>,
    pub json: Option<Value>,
}

/// Whether `value` counts as a structured payload (object or array).
pub fn is_structured(value: &Value) -> bool {
    value.is_object() || value.is_array()
}

impl RequestOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn query(mut self, query: Value) -> Self {
        self.query = Some(query);
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn form(mut self, form: Value) -> Self {
        self.form = Some(form);
        self
    }

    pub fn json(mut self, json: Value) -> Self {
        self.json = Some(json);
        self
    }

    /// The query value, falling back to `qs`.
    pub fn effective_query(&self) -> Option<&Value> {
        self.query.as_ref().or(self.qs.as_ref())
    }

    /// The single body exposed to the pipeline: the first structured value
    /// among `json`, `form`, `body`, in that order.
    pub fn effective_body(&self) -> Option<&Value> {
        [&self.json, &self.form, &self.body]
            .into_iter()
            .flatten()
            .find(|value| is_structured(value))
    }
}

impl From<&str> for Descriptor {
    fn from(path: &str) -> Self {
        Descriptor::Path(path.to_string())
    }
}

impl From<String> for Descriptor {
    fn from(path: String) -> Self {
        Descriptor::Path(path)
    }
}

impl From<RequestOptions> for Descriptor {
    fn from(options: RequestOptions) -> Self {
        Descriptor::Options(options)
    }
}

impl TryFrom<Value> for Descriptor {
    type Error = HarnessError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Ok(serde_json::from_value(value)?)
    }
}

impl Descriptor {
    /// Normalize into options; a bare path becomes a GET.
    pub fn into_options(self) -> RequestOptions {
        match self {
            Descriptor::Path(url) => RequestOptions::new(url).method("GET"),
            Descriptor::Options(options) => options,
        }
    }
}
