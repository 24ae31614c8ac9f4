//! HTTP client decorator that seeds every request with default options.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use reqwest::{IntoUrl, Method};
use serde_json::{Map, Value};

use crate::options::DefaultOptions;
use crate::request::RequestBuilder;

/// `reqwest::Client` wrapper that applies default options to every request
/// builder it creates.
///
/// Defaults accumulate through [`with_default_options`], can be removed per
/// dotted path or in bulk, and can be suppressed for good with
/// [`ignore_default_options`]. Clones share the same overlay: a default set
/// through one clone is visible to all of them. Each builder takes a snapshot
/// of the overlay at creation, so later changes never reach requests already
/// being built.
///
/// [`with_default_options`]: Self::with_default_options
/// [`ignore_default_options`]: Self::ignore_default_options
#[derive(Debug, Clone, Default)]
pub struct Client {
    http: reqwest::Client,
    defaults: Arc<Mutex<DefaultOptions>>,
}

impl Client {
    /// Client over a fresh `reqwest::Client` with no defaults set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decorate an existing `reqwest::Client`, keeping its connection pool,
    /// TLS, and proxy configuration.
    #[must_use]
    pub fn with_client(http: reqwest::Client) -> Self {
        Self {
            http,
            defaults: Arc::new(Mutex::new(DefaultOptions::new())),
        }
    }

    fn defaults(&self) -> MutexGuard<'_, DefaultOptions> {
        self.defaults.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Deep-merge `options` into the shared defaults.
    ///
    /// Nested objects union key by key, arrays concatenate, and a
    /// conflicting scalar takes the incoming value. Non-object input is
    /// ignored with a warning.
    pub fn with_default_options(&self, options: Value) -> &Self {
        self.defaults().merge(options);
        self
    }

    /// Remove the default at the dotted `path`, leaving siblings intact.
    ///
    /// Missing or unresolvable paths are a no-op.
    pub fn without_default_option(&self, path: &str) -> &Self {
        self.defaults().forget(path);
        self
    }

    /// Remove every default named in `paths`, dotted or top-level.
    pub fn without_default_options<I, S>(&self, paths: I) -> &Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.defaults().forget_many(paths);
        self
    }

    /// Stop applying defaults to new request builders, permanently.
    ///
    /// One-way: nothing re-enables the overlay afterwards, including further
    /// [`with_default_options`](Self::with_default_options) calls. Stored
    /// defaults remain readable through
    /// [`default_options`](Self::default_options).
    pub fn ignore_default_options(&self) -> &Self {
        self.defaults().suppress();
        self
    }

    /// Copy of the shared defaults as they stand right now.
    #[must_use]
    pub fn default_options(&self) -> Map<String, Value> {
        self.defaults().options().clone()
    }

    /// Request builder for `method` and `url`, seeded with a snapshot of the
    /// current defaults.
    pub fn request(&self, method: Method, url: impl IntoUrl) -> RequestBuilder {
        let snapshot = self.defaults().snapshot();
        if let Some(defaults) = &snapshot {
            tracing::debug!("seeding request builder with {} default options", defaults.len());
        }
        RequestBuilder::new(self.http.request(method, url), snapshot)
    }

    pub fn get(&self, url: impl IntoUrl) -> RequestBuilder {
        self.request(Method::GET, url)
    }

    pub fn post(&self, url: impl IntoUrl) -> RequestBuilder {
        self.request(Method::POST, url)
    }

    pub fn put(&self, url: impl IntoUrl) -> RequestBuilder {
        self.request(Method::PUT, url)
    }

    pub fn patch(&self, url: impl IntoUrl) -> RequestBuilder {
        self.request(Method::PATCH, url)
    }

    pub fn delete(&self, url: impl IntoUrl) -> RequestBuilder {
        self.request(Method::DELETE, url)
    }

    pub fn head(&self, url: impl IntoUrl) -> RequestBuilder {
        self.request(Method::HEAD, url)
    }
}
