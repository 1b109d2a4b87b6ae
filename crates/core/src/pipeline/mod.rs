//! Document pipeline: shape repair, sanitization, validation and optimization.
//!
//! - `repair`: converts index-keyed objects back into sequences.
//! - `sanitize`: strips script content from every string leaf.
//! - `validate`: structural checks returned as data.
//! - `optimize`: reduces nodes to the fields a render pass needs.
//!
//! Every pass takes the document by reference and returns a new value, and
//! every pass repairs shape first, so each one is safe to call on raw input.

/// Index-keyed object to sequence repair.
pub mod repair;
/// XSS-safe string cleaning.
pub mod sanitize;
/// Structural validation.
pub mod validate;
/// Minimal-footprint rewrite.
pub mod optimize;

pub use optimize::optimize;
pub use repair::repair_shape;
pub use sanitize::{sanitize, sanitize_str};
pub use validate::{ValidationResult, validate};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which optional passes [`run`] applies after sanitization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOptions {
    /// Run validation and continue with its repaired document.
    #[serde(default = "default_validate")]
    pub validate: bool,
    /// Rewrite the document to its minimal form.
    #[serde(default)]
    pub optimize: bool,
}

fn default_validate() -> bool {
    true
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            validate: default_validate(),
            optimize: false,
        }
    }
}

/// Output of a full pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOutput {
    /// Processed document.
    pub document: Value,
    /// Validation outcome, when validation ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationResult>,
}

/// Runs sanitize → validate → optimize over a raw document.
pub fn run(raw: &Value, options: &PipelineOptions) -> PipelineOutput {
    let mut document = sanitize(raw);

    let validation = options.validate.then(|| {
        let result = validate(&document);
        document = result.repaired_document.clone();
        result
    });

    if options.optimize {
        document = optimize(&document);
    }

    PipelineOutput {
        document,
        validation,
    }
}
