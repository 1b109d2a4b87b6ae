use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur outside the data-driven validation flow.
///
/// Structural problems with a configuration document are reported through
/// [`ValidationResult`](crate::ValidationResult) instead; this type is reserved
/// for failures a caller cannot recover from by inspecting data.
#[derive(Debug, Error)]
pub enum UiError {
    /// JSON decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// YAML decoding failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// The document could not be converted into the typed model.
    #[error("Invalid document at '{field}': {message}")]
    InvalidDocument {
        /// Field that failed conversion
        field: String,
        /// Error message
        message: String,
    },
    /// A deferred registry unit failed to load.
    #[error("Failed to load component '{component_type}': {message}")]
    LoaderFailed {
        /// Registry key of the unit
        component_type: String,
        /// Error message
        message: String,
    },
    /// Internal logic error (unexpected state).
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl UiError {
    /// Create an invalid document error for a field
    pub fn invalid_document(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a loader failure for a registry key
    pub fn loader_failed(component_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::LoaderFailed {
            component_type: component_type.into(),
            message: message.into(),
        }
    }
}

/// Stable codes attached to structural validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Document has no (or an empty) `id`.
    MissingId,
    /// Document has no `components` sequence.
    MissingComponents,
    /// Document has no `layout` object.
    MissingLayout,
}

impl ErrorCode {
    /// Returns the wire form of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::MissingId => "MISSING_ID",
            ErrorCode::MissingComponents => "MISSING_COMPONENTS",
            ErrorCode::MissingLayout => "MISSING_LAYOUT",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Blocks validity
    Error,
    /// Informational, never blocks rendering
    Warning,
}

/// A structural error found while validating a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Top-level field the error refers to
    pub field: String,
    /// Human readable message
    pub message: String,
    /// Error severity
    pub severity: ErrorSeverity,
    /// Stable error code
    pub code: ErrorCode,
}

impl ValidationError {
    /// Create a new error-severity validation error
    pub fn new(field: impl Into<String>, message: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: ErrorSeverity::Error,
            code,
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.field, self.message)
    }
}

/// A soft-quality issue that never blocks rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationWarning {
    /// Top-level field the warning refers to
    pub field: String,
    /// Human readable message
    pub message: String,
    /// Suggested fix
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ValidationWarning {
    /// Create a warning with a suggested fix
    pub fn with_suggestion(
        field: impl Into<String>,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: Some(suggestion.into()),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.suggestion {
            Some(s) => write!(f, "{}: {} ({})", self.field, self.message, s),
            None => write!(f, "{}: {}", self.field, self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_serializes_to_stable_tag() {
        let json = serde_json::to_string(&ErrorCode::MissingComponents).unwrap();
        assert_eq!(json, "\"MISSING_COMPONENTS\"");
        assert_eq!(ErrorCode::MissingId.to_string(), "MISSING_ID");
    }

    #[test]
    fn validation_error_display_includes_code() {
        let err = ValidationError::new("layout", "Config must have a layout", ErrorCode::MissingLayout);
        assert_eq!(
            err.to_string(),
            "[MISSING_LAYOUT] layout: Config must have a layout"
        );
        assert_eq!(err.severity, ErrorSeverity::Error);
    }

    #[test]
    fn ui_error_messages() {
        let err = UiError::loader_failed("Hero", "chunk missing");
        assert_eq!(err.to_string(), "Failed to load component 'Hero': chunk missing");
    }
}
