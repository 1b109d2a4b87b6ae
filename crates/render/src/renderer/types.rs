use hybridui_core::document::{AccessibilityConfig, ComponentAnimation};
use hybridui_core::{Props, RenderContext, UiError};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::layout::LayoutStyle;
use super::metrics::PerformanceMetric;

/// Failure raised while instantiating a renderable unit.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The factory reported an error.
    #[error("{0}")]
    Failed(String),
    /// The factory panicked; the payload message is kept when it is a string.
    #[error("Component panicked: {0}")]
    Panicked(String),
    /// The unit could not be loaded or the document could not be decoded.
    #[error(transparent)]
    Load(#[from] UiError),
}

impl RenderError {
    /// Shorthand for [`RenderError::Failed`].
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// One entry of a render pass output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RenderBlock {
    /// A successfully instantiated unit.
    Component {
        /// Node id.
        id: String,
        /// Registry key the node was resolved through.
        component: String,
        /// Registry display name.
        display_name: String,
        /// Fully merged props the factory was called with.
        props: Props,
        /// Opaque instance produced by the factory.
        output: Value,
        /// Style class from the node's `styles`, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        class_name: Option<String>,
        /// Accessibility attributes passed through from the node.
        #[serde(skip_serializing_if = "Option::is_none")]
        accessibility: Option<AccessibilityConfig>,
        /// Entrance/exit animation; omitted when animations are disabled.
        #[serde(skip_serializing_if = "Option::is_none")]
        animation: Option<ComponentAnimation>,
        /// Rendered child nodes in ascending order.
        ///
        /// The engine owns nested rendering: children go through the same
        /// conditions, registry lookup and isolation as top-level nodes, and
        /// the factory of this node never sees them. A unit places the blocks
        /// it receives here.
        #[serde(skip_serializing_if = "Vec::is_empty")]
        children: Vec<RenderBlock>,
    },
    /// Presentation substituted for a node whose instantiation failed.
    Fallback {
        /// Id of the failed node.
        id: String,
        /// Registry key of the failed node.
        component: String,
        /// Failure message.
        error: String,
        /// Manual retries attempted so far.
        retry_count: u32,
        /// Fallback instance.
        output: Value,
    },
}

impl RenderBlock {
    /// Node id of the block.
    pub fn id(&self) -> &str {
        match self {
            RenderBlock::Component { id, .. } | RenderBlock::Fallback { id, .. } => id,
        }
    }

    /// Whether this block is a failure fallback.
    pub fn is_fallback(&self) -> bool {
        matches!(self, RenderBlock::Fallback { .. })
    }
}

/// Non-fatal problems noticed during a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RenderDiagnostic {
    /// The node's type is not registered; the node was omitted.
    MissingComponent {
        /// Node id.
        node_id: String,
        /// Unregistered type.
        component_type: String,
    },
    /// The node failed to instantiate and was replaced by a fallback.
    InstantiationFailed {
        /// Node id.
        node_id: String,
        /// Registry key of the node.
        component_type: String,
        /// Failure message.
        message: String,
    },
}

/// Result of a render pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOutput {
    /// Resolved layout-level style parameters.
    pub layout: LayoutStyle,
    /// Rendered blocks in ascending node order.
    pub blocks: Vec<RenderBlock>,
    /// Diagnostics collected along the way.
    pub diagnostics: Vec<RenderDiagnostic>,
    /// Per-node timings of this pass.
    pub metrics: Vec<PerformanceMetric>,
    /// Whether the document asks for a loading boundary around its content.
    pub loading_boundary: bool,
}

impl RenderOutput {
    /// Ids of the top-level blocks, in output order.
    pub fn ids(&self) -> Vec<&str> {
        self.blocks.iter().map(RenderBlock::id).collect()
    }
}

/// Failure report delivered to the error callback.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentError {
    /// Id of the failing node.
    pub component_id: String,
    /// Type of the failing node.
    pub component_type: String,
    /// Failure message.
    pub error: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// Effective context of the failing pass.
    pub context: RenderContext,
}
