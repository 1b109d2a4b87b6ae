#![deny(missing_docs)]
//! hybridui render engine: component registry, failure isolation, renderer and controller.

/// Document lifecycle: pipeline processing, context and metrics over time.
pub mod controller;
/// Component registry keyed by component type.
pub mod registry;
/// Render passes, layout styles and failure isolation.
pub mod renderer;

pub use controller::{Controller, ControllerOptions, ControllerStatus, LoadTicket};
pub use registry::{RegisteredUnit, Registry, RenderableFactory, UnitInfo, UnitOptions};
pub use renderer::{
    ComponentError, LayoutStyle, PerformanceMetric, RenderBlock, RenderDiagnostic, RenderError,
    RenderOptions, RenderOutput, Renderer, render, with_failure_isolation,
};
