//! Minimal-footprint rewrite of a document for lean render passes.

use super::repair::repair_shape;
use serde_json::{Map, Value};

/// Returns a repaired copy of `document` whose nodes keep only what rendering needs.
///
/// Every node, at every depth, is reduced to `id`, `type`, `props` and `order`,
/// plus `children` and `conditions` when they are non-empty. Styling,
/// animation, accessibility and fallback metadata are dropped. A `components`
/// field that is still not a sequence after repair becomes an empty one.
pub fn optimize(document: &Value) -> Value {
    let mut repaired = repair_shape(document);

    if let Some(components) = repaired.get_mut("components") {
        *components = match &*components {
            Value::Array(nodes) => Value::Array(nodes.iter().map(optimize_node).collect()),
            Value::Null => Value::Null,
            other => {
                log::error!("Components is not an array after conversion: {}", other);
                Value::Array(Vec::new())
            }
        };
    }

    repaired
}

fn optimize_node(node: &Value) -> Value {
    let Value::Object(fields) = node else {
        return node.clone();
    };

    let mut lean = Map::new();
    for key in ["id", "type"] {
        if let Some(value) = fields.get(key) {
            lean.insert(key.to_string(), value.clone());
        }
    }
    let props = match fields.get("props") {
        Some(props @ Value::Object(_)) => props.clone(),
        _ => Value::Object(Map::new()),
    };
    lean.insert("props".to_string(), props);
    if let Some(order) = fields.get("order") {
        lean.insert("order".to_string(), order.clone());
    }

    if let Some(Value::Array(children)) = fields.get("children")
        && !children.is_empty()
    {
        lean.insert(
            "children".to_string(),
            Value::Array(children.iter().map(optimize_node).collect()),
        );
    }
    if let Some(Value::Array(conditions)) = fields.get("conditions")
        && !conditions.is_empty()
    {
        lean.insert("conditions".to_string(), Value::Array(conditions.clone()));
    }

    Value::Object(lean)
}
