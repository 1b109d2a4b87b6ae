//! Registry type definitions for renderable units.

use crate::renderer::RenderError;
use hybridui_core::{Props, UiError};
use serde::Serialize;
use serde_json::Value;
use std::rc::Rc;

/// A renderable unit: turns resolved props into an instance the host understands.
///
/// The engine treats the produced value as opaque.
pub trait RenderableFactory {
    /// Instantiate the unit with fully merged props.
    fn render(&self, props: &Props) -> Result<Value, RenderError>;
}

impl<F> RenderableFactory for F
where
    F: Fn(&Props) -> Result<Value, RenderError>,
{
    fn render(&self, props: &Props) -> Result<Value, RenderError> {
        (self)(props)
    }
}

/// Deferred constructor of a renderable unit, resolved on first lookup.
pub type Loader = Box<dyn Fn() -> Result<Rc<dyn RenderableFactory>, UiError>>;

/// Registration options shared by eager and lazy units.
#[derive(Debug, Clone, Default)]
pub struct UnitOptions {
    /// Props applied underneath node props.
    pub default_props: Props,
    /// Diagnostic name; defaults to the registry key.
    pub display_name: Option<String>,
}

impl UnitOptions {
    /// Options carrying only default props.
    pub fn with_defaults(default_props: Props) -> Self {
        Self {
            default_props,
            display_name: None,
        }
    }
}

/// A resolved registry entry, as returned by [`Registry::get`](super::Registry::get).
#[derive(Clone)]
pub struct RegisteredUnit {
    /// Factory producing instances.
    pub factory: Rc<dyn RenderableFactory>,
    /// Props applied underneath node props.
    pub default_props: Props,
    /// Diagnostic name.
    pub display_name: String,
}

impl std::fmt::Debug for RegisteredUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredUnit")
            .field("display_name", &self.display_name)
            .field("default_props", &self.default_props)
            .finish_non_exhaustive()
    }
}

/// Diagnostic snapshot of one registry entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitInfo {
    /// Diagnostic name.
    pub display_name: String,
    /// Props applied underneath node props.
    pub default_props: Props,
    /// Whether the unit was registered through a loader.
    pub lazy: bool,
    /// Whether the unit is ready without running a loader.
    pub loaded: bool,
}
