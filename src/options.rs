//! Default-options overlay shared by every request a client creates.

use serde_json::{Map, Value};

use crate::merge::{deep_merge, value_kind};
use crate::path::forget_path;

/// Ordered bag of default request options plus a one-way suppress switch.
///
/// The overlay itself is plain single-threaded state; [`Client`](crate::Client)
/// wraps one in a mutex to share it across clones. Every operation is total:
/// malformed input is logged and skipped rather than surfaced as an error.
#[derive(Debug, Clone, Default)]
pub struct DefaultOptions {
    options: Map<String, Value>,
    suppressed: bool,
}

impl DefaultOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deep-merge `options` into the stored defaults.
    ///
    /// Accumulate semantics: nested objects union key by key, arrays
    /// concatenate, and a conflicting scalar takes the incoming value.
    /// Anything other than a JSON object is ignored with a warning.
    pub fn merge(&mut self, options: Value) {
        match options {
            Value::Object(incoming) => deep_merge(&mut self.options, incoming),
            other => {
                tracing::warn!(
                    "default options must be a JSON object, got {}; ignoring",
                    value_kind(&other)
                );
            }
        }
    }

    /// Remove the default at the dotted `path`, if present.
    ///
    /// Missing or unresolvable paths are a no-op, so removal is idempotent.
    pub fn forget(&mut self, path: &str) {
        forget_path(&mut self.options, path);
    }

    /// Remove every dotted path in `paths`.
    ///
    /// Equivalent to calling [`forget`](Self::forget) once per path, in order.
    pub fn forget_many<I, S>(&mut self, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for path in paths {
            self.forget(path.as_ref());
        }
    }

    /// Stop handing defaults to new request builders.
    ///
    /// One-way: there is no operation that re-enables a suppressed overlay.
    /// The stored options are kept as-is and stay visible through
    /// [`options`](Self::options), they just no longer reach builders.
    pub fn suppress(&mut self) {
        self.suppressed = true;
        tracing::debug!("default request options suppressed");
    }

    #[must_use]
    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// The stored defaults, suppressed or not.
    #[must_use]
    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    /// Clone of the defaults for seeding a new request builder.
    ///
    /// `None` when the overlay is suppressed or empty; the clone is detached,
    /// so later changes to the overlay do not reach builders already created.
    #[must_use]
    pub fn snapshot(&self) -> Option<Map<String, Value>> {
        if self.suppressed || self.options.is_empty() {
            return None;
        }
        Some(self.options.clone())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn merge_accumulates_across_calls() {
        let mut defaults = DefaultOptions::new();
        defaults.merge(json!({"headers": {"X-One": "1"}}));
        defaults.merge(json!({"headers": {"X-Two": "2"}, "timeout": 5}));

        assert_eq!(
            Value::Object(defaults.options().clone()),
            json!({"headers": {"X-One": "1", "X-Two": "2"}, "timeout": 5})
        );
    }

    #[test]
    fn merge_takes_later_scalar_on_conflict() {
        let mut defaults = DefaultOptions::new();
        defaults.merge(json!({"timeout": 5}));
        defaults.merge(json!({"timeout": 30}));

        assert_eq!(defaults.options().get("timeout"), Some(&json!(30)));
    }

    #[test]
    fn merge_ignores_non_object_input() {
        let mut defaults = DefaultOptions::new();
        defaults.merge(json!({"timeout": 5}));
        defaults.merge(json!("not an object"));
        defaults.merge(json!(42));
        defaults.merge(json!(["headers"]));

        assert_eq!(Value::Object(defaults.options().clone()), json!({"timeout": 5}));
    }

    #[test]
    fn forget_removes_nested_default_and_keeps_siblings() {
        let mut defaults = DefaultOptions::new();
        defaults.merge(json!({"headers": {"X-One": "1", "X-Two": "2"}}));
        defaults.forget("headers.X-One");

        assert_eq!(
            Value::Object(defaults.options().clone()),
            json!({"headers": {"X-Two": "2"}})
        );
    }

    #[test]
    fn forget_is_idempotent() {
        let mut defaults = DefaultOptions::new();
        defaults.merge(json!({"headers": {"X-One": "1"}}));
        defaults.forget("headers.X-One");
        let after_first = defaults.options().clone();
        defaults.forget("headers.X-One");

        assert_eq!(defaults.options(), &after_first);
    }

    #[test]
    fn forget_many_equals_sequential_forgets() {
        let seed = json!({
            "headers": {"X-One": "1", "X-Two": "2"},
            "auth": ["u", "p"],
            "timeout": 5,
        });

        let mut bulk = DefaultOptions::new();
        bulk.merge(seed.clone());
        bulk.forget_many(["headers.X-One", "auth"]);

        let mut sequential = DefaultOptions::new();
        sequential.merge(seed);
        sequential.forget("headers.X-One");
        sequential.forget("auth");

        assert_eq!(bulk.options(), sequential.options());
    }

    #[test]
    fn snapshot_is_none_when_empty() {
        let defaults = DefaultOptions::new();
        assert!(defaults.snapshot().is_none());
    }

    #[test]
    fn snapshot_returns_stored_defaults() {
        let mut defaults = DefaultOptions::new();
        defaults.merge(json!({"timeout": 5}));

        assert_eq!(defaults.snapshot(), Some(defaults.options().clone()));
    }

    #[test]
    fn snapshot_is_detached_from_later_merges() {
        let mut defaults = DefaultOptions::new();
        defaults.merge(json!({"timeout": 5}));
        let snapshot = defaults.snapshot();
        defaults.merge(json!({"timeout": 30}));

        assert_eq!(
            snapshot.map(Value::Object),
            Some(json!({"timeout": 5}))
        );
    }

    #[test]
    fn suppress_hides_defaults_from_snapshots() {
        let mut defaults = DefaultOptions::new();
        defaults.merge(json!({"headers": {"X-One": "1"}}));
        defaults.suppress();

        assert!(defaults.is_suppressed());
        assert!(defaults.snapshot().is_none());
    }

    #[test]
    fn suppress_keeps_stored_options_intact() {
        let mut defaults = DefaultOptions::new();
        defaults.merge(json!({"headers": {"X-One": "1"}}));
        defaults.suppress();

        assert!(!defaults.is_empty());
        assert_eq!(
            Value::Object(defaults.options().clone()),
            json!({"headers": {"X-One": "1"}})
        );
    }

    #[test]
    fn suppress_outlives_later_merges_and_removals() {
        let mut defaults = DefaultOptions::new();
        defaults.suppress();
        defaults.merge(json!({"headers": {"X-One": "1"}}));
        defaults.forget("headers");
        defaults.merge(json!({"timeout": 5}));

        assert!(defaults.is_suppressed());
        assert!(defaults.snapshot().is_none());
        // Storage keeps mutating; only application is gated.
        assert_eq!(Value::Object(defaults.options().clone()), json!({"timeout": 5}));
    }
}
