//! Shape repair for documents whose sequences were serialized as index-keyed objects.
//!
//! Some transports turn `[x, y]` into `{"0": x, "1": y}`. Any object whose
//! keys are exactly `"0"..="n-1"` is converted back into a sequence, at every
//! depth. A genuine mapping that happens to use only those keys is converted
//! too; the shape alone cannot tell the two apart.

use serde_json::{Map, Value};

/// Returns a repaired deep copy of `value`.
pub fn repair_shape(value: &Value) -> Value {
    match value {
        Value::Object(map) => match as_index_sequence(map) {
            Some(items) => Value::Array(items.into_iter().map(repair_shape).collect()),
            None => Value::Object(
                map.iter()
                    .map(|(key, val)| (key.clone(), repair_shape(val)))
                    .collect(),
            ),
        },
        Value::Array(items) => Value::Array(items.iter().map(repair_shape).collect()),
        other => other.clone(),
    }
}

/// Returns the values of `map` in index order when its keys are exactly `0..n`.
fn as_index_sequence(map: &Map<String, Value>) -> Option<Vec<&Value>> {
    if map.is_empty() {
        return None;
    }
    (0..map.len())
        .map(|index| map.get(&index.to_string()))
        .collect()
}
