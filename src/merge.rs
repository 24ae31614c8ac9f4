//! Recursive merge rules for option trees.
//!
//! The two rules differ only at non-object collisions: [`deep_merge`]
//! accumulates (arrays concatenate, later scalar wins) and backs default
//! registration, while [`deep_replace`] overrides (arrays and scalars are
//! replaced) and backs per-call options landing on a builder.

use serde_json::map::Entry;
use serde_json::{Map, Value};

/// Accumulate `incoming` into `base`.
///
/// Nested objects merge key by key, arrays concatenate with incoming
/// elements appended after existing ones, and any other collision is
/// resolved in favor of the incoming value. Keys absent from `base` are
/// inserted in `incoming` order.
pub(crate) fn deep_merge(base: &mut Map<String, Value>, incoming: Map<String, Value>) {
    for (key, value) in incoming {
        match base.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
            Entry::Occupied(mut slot) => merge_value(slot.get_mut(), value),
        }
    }
}

fn merge_value(base: &mut Value, incoming: Value) {
    match (base, incoming) {
        (Value::Object(base), Value::Object(incoming)) => deep_merge(base, incoming),
        (Value::Array(base), Value::Array(mut incoming)) => base.append(&mut incoming),
        (base, incoming) => *base = incoming,
    }
}

/// Overlay `incoming` onto `base`.
///
/// Nested objects still merge key by key, but arrays and scalars are
/// replaced by the incoming value instead of accumulating.
pub(crate) fn deep_replace(base: &mut Map<String, Value>, incoming: Map<String, Value>) {
    for (key, value) in incoming {
        match base.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
            Entry::Occupied(mut slot) => replace_value(slot.get_mut(), value),
        }
    }
}

fn replace_value(base: &mut Value, incoming: Value) {
    match (base, incoming) {
        (Value::Object(base), Value::Object(incoming)) => deep_replace(base, incoming),
        (base, incoming) => *base = incoming,
    }
}

/// Human-readable node kind for log messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
