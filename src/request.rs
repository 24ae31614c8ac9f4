//! Request builder carrying inherited defaults and per-call options.

use std::fmt;
use std::time::Duration;

use serde_json::{Map, Value, json};

use crate::apply::{AUTH, HEADERS, JSON, TIMEOUT, apply_options};
use crate::merge::{deep_replace, value_kind};

/// Builder for a single request, seeded with the client's default options.
///
/// Options set here are kept as a tree next to the underlying
/// `reqwest::RequestBuilder` and translated into builder calls only when the
/// request is sent or built. That deferral is what lets an explicit per-call
/// option override an inherited default instead of stacking on top of it.
#[must_use = "a RequestBuilder does nothing until it is sent or built"]
#[derive(Debug)]
pub struct RequestBuilder {
    inner: reqwest::RequestBuilder,
    options: Map<String, Value>,
}

impl RequestBuilder {
    pub(crate) fn new(
        inner: reqwest::RequestBuilder,
        defaults: Option<Map<String, Value>>,
    ) -> Self {
        Self {
            inner,
            options: defaults.unwrap_or_default(),
        }
    }

    /// Merge `options` over everything set so far, inherited defaults included.
    ///
    /// Override semantics: nested objects merge key by key, while arrays and
    /// scalars are replaced outright, so a per-call value beats a default on
    /// the same leaf. Anything other than a JSON object is ignored with a
    /// warning.
    pub fn with_options(mut self, options: Value) -> Self {
        match options {
            Value::Object(incoming) => deep_replace(&mut self.options, incoming),
            other => {
                tracing::warn!(
                    "request options must be a JSON object, got {}; ignoring",
                    value_kind(&other)
                );
            }
        }
        self
    }

    /// Set a single header, replacing a default of the same name.
    pub fn header(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        let value: Value = value.into();
        self.with_options(json!({ HEADERS: { name: value } }))
    }

    /// Set several headers at once, replacing defaults of the same names.
    pub fn headers<I, K, V>(self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let entries: Map<String, Value> = headers
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        self.with_options(json!({ HEADERS: entries }))
    }

    /// Authenticate with HTTP basic auth.
    ///
    /// Replaces any inherited `auth` default and drops a literal
    /// `Authorization` header default so the two cannot compete.
    pub fn basic_auth(
        mut self,
        username: impl Into<String>,
        password: Option<impl Into<String>>,
    ) -> Self {
        clear_header(&mut self.options, "authorization");
        let mut credentials = vec![Value::String(username.into())];
        if let Some(password) = password {
            credentials.push(Value::String(password.into()));
        }
        self.options.insert(AUTH.to_owned(), Value::Array(credentials));
        self
    }

    /// Authenticate with a bearer token.
    ///
    /// Replaces any inherited `auth` default and any default `Authorization`
    /// header.
    pub fn bearer_auth(mut self, token: impl fmt::Display) -> Self {
        self.options.shift_remove(AUTH);
        clear_header(&mut self.options, "authorization");
        self.with_options(json!({ HEADERS: { "Authorization": format!("Bearer {token}") } }))
    }

    /// Set the request timeout, replacing an inherited `timeout` default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options
            .insert(TIMEOUT.to_owned(), json!(timeout.as_secs_f64()));
        self
    }

    /// Send `body` as JSON, replacing an inherited `json` default outright.
    ///
    /// A body that fails to serialize is ignored with a warning; the request
    /// still goes out, without it.
    pub fn json<T: serde::Serialize + ?Sized>(mut self, body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(value) => {
                self.options.insert(JSON.to_owned(), value);
            }
            Err(error) => tracing::warn!("failed to serialize JSON body: {error}; ignoring"),
        }
        self
    }

    /// The option tree as it stands, defaults and per-call settings merged.
    #[must_use]
    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    /// Translate the option tree onto the request and send it.
    ///
    /// # Errors
    ///
    /// Returns the underlying transport error untouched: invalid URLs,
    /// connection failures, timeouts.
    pub async fn send(self) -> reqwest::Result<reqwest::Response> {
        let Self { inner, options } = self;
        apply_options(inner, &options).send().await
    }

    /// Translate the option tree onto the request and build it without
    /// sending.
    ///
    /// # Errors
    ///
    /// Returns the underlying builder error untouched, for example an
    /// invalid URL.
    pub fn build(self) -> reqwest::Result<reqwest::Request> {
        let Self { inner, options } = self;
        apply_options(inner, &options).build()
    }
}

/// Drop every `headers.<name>` entry matching `name` case-insensitively.
///
/// Header names live in the tree exactly as the caller spelled them, so a
/// typed method that replaces a header has to clear all spellings.
fn clear_header(options: &mut Map<String, Value>, name: &str) {
    if let Some(Value::Object(headers)) = options.get_mut(HEADERS) {
        let stale: Vec<String> = headers
            .keys()
            .filter(|key| key.eq_ignore_ascii_case(name))
            .cloned()
            .collect();
        for key in stale {
            headers.shift_remove(&key);
        }
    }
}
