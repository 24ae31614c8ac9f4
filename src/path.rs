//! Dotted-path removal from option trees.

use serde_json::{Map, Value};

/// Remove the entry addressed by `path` from `options`.
///
/// Each `.`-separated segment names a key in a nested object. A path whose
/// prefix is missing, or whose prefix resolves to something other than an
/// object, removes nothing: the call is a total no-op and never fails, so
/// removing the same path twice is the same as removing it once.
pub(crate) fn forget_path(options: &mut Map<String, Value>, path: &str) {
    match path.split_once('.') {
        None => {
            // shift_remove keeps sibling order intact under preserve_order.
            options.shift_remove(path);
        }
        Some((head, rest)) => {
            if let Some(Value::Object(child)) = options.get_mut(head) {
                forget_path(child, rest);
            }
        }
    }
}
