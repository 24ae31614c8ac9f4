//! Translation of an option tree onto a `reqwest::RequestBuilder`.
//!
//! Each recognized top-level key maps to one builder call. Unknown keys are
//! skipped with a debug log and malformed values with a warning, so the
//! translation itself never fails; errors only arise at send time, from the
//! transport.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde_json::{Map, Value};

pub(crate) const HEADERS: &str = "headers";
pub(crate) const AUTH: &str = "auth";
pub(crate) const QUERY: &str = "query";
pub(crate) const TIMEOUT: &str = "timeout";
pub(crate) const JSON: &str = "json";
pub(crate) const FORM_PARAMS: &str = "form_params";
pub(crate) const BODY: &str = "body";

/// Apply every recognized option in `options` to `builder`.
///
/// When both `auth` and a literal `Authorization` header are present, `auth`
/// wins and the literal header is dropped. Body-producing keys (`json`,
/// `form_params`, `body`) each overwrite the request body, so if several are
/// present the last one in tree order wins.
pub(crate) fn apply_options(
    mut builder: reqwest::RequestBuilder,
    options: &Map<String, Value>,
) -> reqwest::RequestBuilder {
    let auth = options.get(AUTH).and_then(basic_credentials);

    for (key, value) in options {
        match key.as_str() {
            HEADERS => {
                let mut headers = header_map(value);
                if auth.is_some() && headers.remove(AUTHORIZATION).is_some() {
                    tracing::warn!(
                        "both `auth` and a literal Authorization header are set; keeping `auth`"
                    );
                }
                builder = builder.headers(headers);
            }
            AUTH => {
                if let Some((username, password)) = &auth {
                    builder = builder.basic_auth(username, password.as_ref());
                } else {
                    tracing::warn!("`auth` must be an array of one or two strings; skipping");
                }
            }
            QUERY => match value.as_object() {
                Some(entries) => builder = builder.query(&flat_pairs(QUERY, entries)),
                None => tracing::warn!("`query` must be an object; skipping"),
            },
            TIMEOUT => match timeout_duration(value) {
                Some(timeout) => builder = builder.timeout(timeout),
                None => {
                    tracing::warn!("`timeout` must be a non-negative number of seconds; skipping");
                }
            },
            JSON => builder = builder.json(value),
            FORM_PARAMS => match value.as_object() {
                Some(entries) => builder = builder.form(&flat_pairs(FORM_PARAMS, entries)),
                None => tracing::warn!("`form_params` must be an object; skipping"),
            },
            BODY => match value.as_str() {
                Some(body) => builder = builder.body(body.to_owned()),
                None => tracing::warn!("`body` must be a string; skipping"),
            },
            other => tracing::debug!("unsupported request option `{other}`; skipping"),
        }
    }

    builder
}

/// Username and optional password from an `auth` array.
///
/// A third element (Guzzle carries the auth scheme there) is ignored.
fn basic_credentials(value: &Value) -> Option<(String, Option<String>)> {
    let parts = value.as_array()?;
    match parts.as_slice() {
        [] => None,
        [username] => Some((username.as_str()?.to_owned(), None)),
        [username, password, ..] => Some((
            username.as_str()?.to_owned(),
            Some(password.as_str()?.to_owned()),
        )),
    }
}

fn header_map(value: &Value) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let Some(entries) = value.as_object() else {
        tracing::warn!("`headers` must be an object; skipping");
        return headers;
    };
    for (name, value) in entries {
        let Ok(name) = HeaderName::try_from(name.as_str()) else {
            tracing::warn!("invalid header name `{name}`; skipping");
            continue;
        };
        match value {
            Value::Array(values) => {
                for value in values {
                    if let Some(value) = header_value(value) {
                        headers.append(name.clone(), value);
                    } else {
                        tracing::warn!("invalid value for header `{name}`; skipping");
                    }
                }
            }
            single => {
                if let Some(value) = header_value(single) {
                    headers.insert(name, value);
                } else {
                    tracing::warn!("invalid value for header `{name}`; skipping");
                }
            }
        }
    }
    headers
}

fn header_value(value: &Value) -> Option<HeaderValue> {
    match value {
        Value::String(text) => HeaderValue::try_from(text.as_str()).ok(),
        Value::Number(number) => HeaderValue::try_from(number.to_string()).ok(),
        Value::Bool(flag) => HeaderValue::try_from(flag.to_string()).ok(),
        _ => None,
    }
}

/// Flatten an object into `(name, value)` pairs for query or form encoding.
///
/// Array values repeat the name once per element; non-scalar values are
/// skipped with a warning naming the option they came from.
fn flat_pairs(option: &str, entries: &Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (name, value) in entries {
        match value {
            Value::Array(values) => {
                for value in values {
                    if let Some(text) = scalar_string(value) {
                        pairs.push((name.clone(), text));
                    } else {
                        tracing::warn!("non-scalar `{option}` value for `{name}`; skipping");
                    }
                }
            }
            single => {
                if let Some(text) = scalar_string(single) {
                    pairs.push((name.clone(), text));
                } else {
                    tracing::warn!("non-scalar `{option}` value for `{name}`; skipping");
                }
            }
        }
    }
    pairs
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn timeout_duration(value: &Value) -> Option<Duration> {
    Duration::try_from_secs_f64(value.as_f64()?).ok()
}
