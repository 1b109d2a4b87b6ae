#![deny(missing_docs)]
//! hybridui core: configuration document model, condition evaluation,
//! props resolution and the sanitize/validate/optimize pipeline.

/// Visibility predicate evaluation.
pub mod conditions;
/// Render context and viewport classification.
pub mod context;
/// Typed configuration document model.
pub mod document;
/// Core error and validation diagnostic types.
pub mod error;
/// Dot-path traversal over JSON values.
pub mod path;
/// Shape repair, sanitization, validation and optimization passes.
pub mod pipeline;
/// Template, responsive and theme resolution of node props.
pub mod props;

pub use conditions::{evaluate_condition, evaluate_conditions};
pub use context::{
    Connection, HostEnvironment, PerformanceHint, RenderContext, ThemeMode, Viewport,
    WIDE_BREAKPOINT,
};
pub use document::{
    ComponentNode, Condition, ConfigDocument, LayoutConfig, LayoutType, LogicalOperator, Operator,
    Props, ResponsiveConfig, ThemeConfig,
};
pub use error::{ErrorCode, ErrorSeverity, UiError, ValidationError, ValidationWarning};
pub use path::lookup;
pub use pipeline::{
    PipelineOptions, PipelineOutput, ValidationResult, optimize, repair_shape, sanitize, validate,
};
pub use props::{resolve_props, resolve_responsive, resolve_theme, resolve_theme_props};
