//! XSS-safe string cleaning over a whole document.

use super::repair::repair_shape;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static SCRIPT_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<\s*script\b[^>]*>.*?<\s*/\s*script\s*>").expect("script block pattern")
});
static SCRIPT_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<\s*/?\s*script\b[^>]*>?").expect("script tag pattern")
});
static JAVASCRIPT_URI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)javascript\s*:").expect("javascript uri pattern"));
static EVENT_HANDLER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)on\w+\s*=").expect("event handler pattern"));

/// Returns a repaired, sanitized copy of `document`.
///
/// Every string leaf loses script elements, `javascript:` prefixes and inline
/// `on<event>=` assignments. Keys and non-string leaves are left as they are.
pub fn sanitize(document: &Value) -> Value {
    sanitize_value(repair_shape(document))
}

fn sanitize_value(value: Value) -> Value {
    match value {
        Value::String(text) => Value::String(sanitize_str(&text)),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize_value).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, val)| (key, sanitize_value(val)))
                .collect(),
        ),
        other => other,
    }
}

/// Cleans a single string.
///
/// Removal can splice a new dangerous fragment together (`<scr<script></script>ipt>`),
/// so the passes repeat until the text stops changing.
pub fn sanitize_str(input: &str) -> String {
    let mut current = input.to_string();
    loop {
        let next = [&*SCRIPT_BLOCK, &*SCRIPT_TAG, &*JAVASCRIPT_URI, &*EVENT_HANDLER]
            .iter()
            .fold(current.clone(), |text, pattern| {
                pattern.replace_all(&text, "").into_owned()
            });
        if next == current {
            return current;
        }
        current = next;
    }
}
