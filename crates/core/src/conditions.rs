//! Visibility predicate evaluation.
//!
//! A node renders only when every one of its top-level conditions holds.
//! Each condition may carry `nested` conditions; those are folded into the
//! condition's own result through its `logicalOperator` (`and` by default),
//! which gives mixed AND/OR trees without a separate group type.

use crate::document::{Condition, LogicalOperator, Operator};
use crate::path::lookup_present;
use regex::Regex;
use serde_json::Value;

/// Evaluates a condition list as a conjunction. An empty list holds.
pub fn evaluate_conditions(conditions: &[Condition], context: &Value) -> bool {
    conditions
        .iter()
        .all(|condition| evaluate_condition(condition, context))
}

/// Evaluates a single condition together with its nested conditions.
pub fn evaluate_condition(condition: &Condition, context: &Value) -> bool {
    let own = evaluate_operator(condition, context);
    if condition.nested.is_empty() {
        return own;
    }

    let mut nested = condition.nested.iter().map(|c| evaluate_condition(c, context));
    match condition.logical_operator.unwrap_or_default() {
        LogicalOperator::And => own && nested.all(|r| r),
        LogicalOperator::Or => own || nested.any(|r| r),
    }
}

fn evaluate_operator(condition: &Condition, context: &Value) -> bool {
    let actual = lookup_present(context, &condition.field);
    let expected = &condition.value;

    match &condition.operator {
        Operator::Equals => actual.is_some_and(|v| strict_equals(v, expected)),
        Operator::Contains => match actual {
            Some(Value::Array(items)) => items.iter().any(|item| strict_equals(item, expected)),
            Some(Value::String(text)) => text.contains(text_form(expected).as_str()),
            _ => false,
        },
        Operator::GreaterThan => compare(actual, expected, |a, b| a > b),
        Operator::LessThan => compare(actual, expected, |a, b| a < b),
        Operator::In => match (expected, actual) {
            (Value::Array(items), Some(value)) => items.iter().any(|item| strict_equals(item, value)),
            _ => false,
        },
        Operator::Exists => actual.is_some(),
        Operator::Matches => {
            let (Some(value), Value::String(pattern)) = (actual, expected) else {
                return false;
            };
            match Regex::new(pattern) {
                Ok(regex) => regex.is_match(&text_form(value)),
                Err(err) => {
                    log::debug!("Malformed pattern '{}' in condition on '{}': {}", pattern, condition.field, err);
                    false
                }
            }
        }
        Operator::Unknown(name) => {
            log::warn!("Unknown condition operator: {}", name);
            true
        }
    }
}

/// Strict equality; numbers compare by numeric value so `2` equals `2.0`.
fn strict_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

fn compare(actual: Option<&Value>, expected: &Value, op: impl Fn(f64, f64) -> bool) -> bool {
    match (actual.and_then(to_number), to_number(expected)) {
        (Some(a), Some(b)) => op(a, b),
        _ => false,
    }
}

/// Numeric coercion of a JSON value; `None` when the value has no numeric reading.
pub fn to_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Null => 0.0,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse::<f64>().ok()?
            }
        }
        Value::Array(_) | Value::Object(_) => return None,
    };
    (!n.is_nan()).then_some(n)
}

/// Text form of a value: strings verbatim, everything else as compact JSON.
pub fn text_form(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cond(field: &str, op: &str, value: Value) -> Condition {
        Condition::new(field, Operator::from(op.to_string()), value)
    }

    #[test]
    fn empty_list_is_true() {
        assert!(evaluate_conditions(&[], &json!({})));
    }

    #[test]
    fn conjunction_of_conditions() {
        let conditions = vec![
            cond("user.tier", "equals", json!("gold")),
            cond("cart.count", "greaterThan", json!(0)),
        ];
        let ctx = json!({"user": {"tier": "gold"}, "cart": {"count": 2}});
        assert!(evaluate_conditions(&conditions, &ctx));

        let ctx = json!({"user": {"tier": "gold"}, "cart": {"count": 0}});
        assert!(!evaluate_conditions(&conditions, &ctx));
    }

    #[test]
    fn equals_is_strict() {
        let ctx = json!({"n": 2, "s": "2"});
        assert!(evaluate_condition(&cond("n", "equals", json!(2)), &ctx));
        assert!(evaluate_condition(&cond("n", "equals", json!(2.0)), &ctx));
        assert!(!evaluate_condition(&cond("s", "equals", json!(2)), &ctx));
        assert!(!evaluate_condition(&cond("missing", "equals", json!(null)), &ctx));
    }

    #[test]
    fn contains_on_sequences_and_text() {
        let ctx = json!({"tags": ["sale", "new"], "title": "Summer sale 2024"});
        assert!(evaluate_condition(&cond("tags", "contains", json!("sale")), &ctx));
        assert!(!evaluate_condition(&cond("tags", "contains", json!("old")), &ctx));
        assert!(evaluate_condition(&cond("title", "contains", json!("sale")), &ctx));
        assert!(evaluate_condition(&cond("title", "contains", json!(2024)), &ctx));
        assert!(!evaluate_condition(&cond("missing", "contains", json!("x")), &ctx));
    }

    #[test]
    fn numeric_comparisons_coerce() {
        let ctx = json!({"count": "5", "name": "abc"});
        assert!(evaluate_condition(&cond("count", "greaterThan", json!(4)), &ctx));
        assert!(evaluate_condition(&cond("count", "lessThan", json!("10")), &ctx));
        assert!(!evaluate_condition(&cond("name", "greaterThan", json!(0)), &ctx));
        assert!(!evaluate_condition(&cond("missing", "lessThan", json!(10)), &ctx));
    }

    #[test]
    fn in_requires_sequence_value() {
        let ctx = json!({"region": "eu"});
        assert!(evaluate_condition(&cond("region", "in", json!(["us", "eu"])), &ctx));
        assert!(!evaluate_condition(&cond("region", "in", json!("eu")), &ctx));
        assert!(!evaluate_condition(&cond("missing", "in", json!(["eu"])), &ctx));
    }

    #[test]
    fn exists_ignores_null() {
        let ctx = json!({"a": 0, "b": null});
        assert!(evaluate_condition(&cond("a", "exists", Value::Null), &ctx));
        assert!(!evaluate_condition(&cond("b", "exists", Value::Null), &ctx));
        assert!(!evaluate_condition(&cond("c", "exists", Value::Null), &ctx));
    }

    #[test]
    fn matches_pattern() {
        let ctx = json!({"email": "ada@example.com", "age": 42});
        assert!(evaluate_condition(&cond("email", "matches", json!("@example\\.com$")), &ctx));
        assert!(evaluate_condition(&cond("age", "matches", json!("^4")), &ctx));
        assert!(!evaluate_condition(&cond("email", "matches", json!("([unclosed")), &ctx));
        assert!(!evaluate_condition(&cond("email", "matches", json!(5)), &ctx));
    }

    #[test]
    fn unknown_operator_defaults_to_show() {
        let ctx = json!({});
        assert!(evaluate_condition(&cond("x", "startsWith", json!("a")), &ctx));
    }

    #[test]
    fn nested_or_tree() {
        let mut root = cond("user.tier", "equals", json!("gold"));
        root.logical_operator = Some(LogicalOperator::Or);
        root.nested = vec![cond("feature.beta", "equals", json!(true))];

        assert!(evaluate_condition(&root, &json!({"user": {"tier": "gold"}})));
        assert!(evaluate_condition(&root, &json!({"feature": {"beta": true}})));
        assert!(!evaluate_condition(&root, &json!({"user": {"tier": "silver"}})));
    }

    #[test]
    fn nested_and_tree() {
        let mut root = cond("user.tier", "equals", json!("gold"));
        root.nested = vec![cond("cart.count", "greaterThan", json!(0))];

        assert!(evaluate_condition(&root, &json!({"user": {"tier": "gold"}, "cart": {"count": 1}})));
        assert!(!evaluate_condition(&root, &json!({"user": {"tier": "gold"}})));
    }
}
