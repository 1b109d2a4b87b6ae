//! Structural validation with auto-repair.

use super::repair::repair_shape;
use crate::conditions::text_form;
use crate::error::{ErrorCode, ValidationError, ValidationWarning};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

/// Outcome of validating a document.
///
/// Produced fresh on every call. `repaired_document` is always the
/// shape-repaired input, whether or not the document is valid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// No structural errors were found.
    pub is_valid: bool,
    /// Structural errors, each with a stable code.
    pub errors: Vec<ValidationError>,
    /// Soft-quality issues.
    pub warnings: Vec<ValidationWarning>,
    /// Shape-repaired input.
    pub repaired_document: Value,
}

impl ValidationResult {
    /// Whether an error with `code` was reported.
    pub fn has_error(&self, code: ErrorCode) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }
}

/// Validates the required structure of a document.
///
/// Never fails: problems are returned as data.
pub fn validate(document: &Value) -> ValidationResult {
    let repaired = repair_shape(document);
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if !repaired.get("id").is_some_and(is_set) {
        errors.push(ValidationError::new(
            "id",
            "Config must have an id",
            ErrorCode::MissingId,
        ));
    }

    if !repaired.get("version").is_some_and(is_set) {
        warnings.push(ValidationWarning::with_suggestion(
            "version",
            "Config should have a version for better tracking",
            "Add a version field like \"1.0.0\"",
        ));
    }

    match repaired.get("components") {
        Some(Value::Array(components)) => check_components(components, &mut warnings),
        _ => errors.push(ValidationError::new(
            "components",
            "Config must have a components array",
            ErrorCode::MissingComponents,
        )),
    }

    if !matches!(repaired.get("layout"), Some(Value::Object(_))) {
        errors.push(ValidationError::new(
            "layout",
            "Config must have a layout configuration",
            ErrorCode::MissingLayout,
        ));
    }

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
        warnings,
        repaired_document: repaired,
    }
}

/// A field counts as set unless it is `null`, `false`, `0` or `""`.
fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Soft checks on the node tree: duplicate ids and nodes without a type.
fn check_components(components: &[Value], warnings: &mut Vec<ValidationWarning>) {
    let mut seen = HashSet::new();
    let mut stack: Vec<&Value> = components.iter().rev().collect();

    while let Some(node) = stack.pop() {
        let id = match node.get("id") {
            None | Some(Value::Null) => String::new(),
            Some(id) => text_form(id),
        };

        if !id.is_empty() && !seen.insert(id.clone()) {
            warnings.push(ValidationWarning::with_suggestion(
                "components",
                format!("Duplicate component id '{}'", id),
                "Give every component a unique id",
            ));
        }

        let has_type = matches!(node.get("type"), Some(Value::String(t)) if !t.is_empty());
        if !has_type {
            warnings.push(ValidationWarning::with_suggestion(
                "components",
                format!("Component '{}' has no type and will not render", id),
                "Set type to a registered component name",
            ));
        }

        if let Some(Value::Array(children)) = node.get("children") {
            stack.extend(children.iter().rev());
        }
    }
}
