//! Dot-path traversal over JSON values.

use serde_json::Value;

/// Resolves a dot-separated path (`user.profile.name`) inside `root`.
///
/// Missing intermediate keys, or traversing through a non-container value,
/// yield `None`. Numeric segments index into sequences, so `items.0.title`
/// addresses the first element of `items`.
pub fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }

    let mut current = root;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Like [`lookup`], but treats an explicit `null` the same as a missing key.
pub fn lookup_present<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    lookup(root, path).filter(|v| !v.is_null())
}
