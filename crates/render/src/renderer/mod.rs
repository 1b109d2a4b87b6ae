//! Render pass: turns a typed document and a context into ordered blocks.
//!
//! A pass computes the effective context, walks nodes in ascending `order`,
//! drops nodes whose conditions fail, resolves responsive, template and theme
//! props, and instantiates each registered unit behind a failure isolation
//! boundary. Missing registry entries are reported as diagnostics and never
//! stop sibling nodes from rendering.

mod isolation;
mod layout;
mod metrics;
mod types;

pub use isolation::{Isolated, isolate, with_failure_isolation};
pub use layout::{LayoutStyle, resolve_layout};
pub use metrics::PerformanceMetric;
pub use types::{ComponentError, RenderBlock, RenderDiagnostic, RenderError, RenderOutput};

pub(crate) use metrics::{Stopwatch, now_ms};

use std::collections::HashMap;
use std::rc::Rc;

use hybridui_core::props::merge_shallow;
use hybridui_core::{
    ComponentNode, ConfigDocument, HostEnvironment, Props, RenderContext, evaluate_conditions,
    resolve_props, resolve_responsive, resolve_theme_props,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::registry::{RenderableFactory, Registry};

/// Receives every per-node failure report.
pub type ErrorCallback = Rc<dyn Fn(&ComponentError)>;
/// Receives every per-node timing sample.
pub type MetricCallback = Rc<dyn Fn(&PerformanceMetric)>;
/// Builds the fallback instance shown in place of a failed node.
pub type FallbackFactory = Rc<dyn Fn(&ComponentError) -> Value>;

/// Component type reported when the document-level boundary trips.
pub const DOCUMENT_BOUNDARY_TYPE: &str = "ConfigRenderer";

/// Options of a render pass.
///
/// The plain fields deserialize from camelCase JSON; callbacks are set in code.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Emit animation metadata and the layout transition.
    pub enable_animations: bool,
    /// Extra class appended to the layout class list.
    pub class_name: Option<String>,
    /// Hosting window and device facts.
    pub host: HostEnvironment,
    /// Failure report sink.
    #[serde(skip)]
    pub on_error: Option<ErrorCallback>,
    /// Timing sample sink.
    #[serde(skip)]
    pub on_performance_metric: Option<MetricCallback>,
    /// Caller-provided fallback presentation.
    #[serde(skip)]
    pub fallback: Option<FallbackFactory>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            enable_animations: true,
            class_name: None,
            host: HostEnvironment::default(),
            on_error: None,
            on_performance_metric: None,
            fallback: None,
        }
    }
}

impl std::fmt::Debug for RenderOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderOptions")
            .field("enable_animations", &self.enable_animations)
            .field("class_name", &self.class_name)
            .field("host", &self.host)
            .field("on_error", &self.on_error.is_some())
            .field("on_performance_metric", &self.on_performance_metric.is_some())
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

/// Stateful renderer of one document over time.
///
/// A node that fails to instantiate keeps showing its fallback on later
/// passes until [`Renderer::retry`] is called for it.
#[derive(Debug, Default)]
pub struct Renderer {
    options: RenderOptions,
    failures: HashMap<String, String>,
    retry_counts: HashMap<String, u32>,
    update_counts: HashMap<String, u32>,
}

struct Pass<'a> {
    registry: &'a Registry,
    context: RenderContext,
    context_value: Value,
    theme_value: Option<Value>,
    retry_affordance: bool,
    diagnostics: Vec<RenderDiagnostic>,
    metrics: Vec<PerformanceMetric>,
}

impl Renderer {
    /// Creates a renderer with no failure state.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Current options.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Replaces the options; failure, retry and update state is kept.
    pub fn set_options(&mut self, options: RenderOptions) {
        self.options = options;
    }

    /// Replaces the hosting environment used for the effective context.
    pub fn set_host(&mut self, host: HostEnvironment) {
        self.options.host = host;
    }

    /// Records a new host window size; the next pass reclassifies the viewport.
    pub fn on_viewport_change(&mut self, width: u32, height: u32) {
        self.options.host.width = width;
        self.options.host.height = height;
    }

    /// Effective context of a pass over `context`.
    pub fn effective_context(&self, context: &RenderContext) -> RenderContext {
        context.effective(&self.options.host)
    }

    /// Whether `node_id` is currently shown as a fallback.
    pub fn has_failed(&self, node_id: &str) -> bool {
        self.failures.contains_key(node_id)
    }

    /// Retries attempted for `node_id`.
    pub fn retry_count(&self, node_id: &str) -> u32 {
        self.retry_counts.get(node_id).copied().unwrap_or(0)
    }

    /// Clears all failure, retry and update state.
    pub fn reset(&mut self) {
        self.failures.clear();
        self.retry_counts.clear();
        self.update_counts.clear();
    }

    /// Renders `document` against `context`.
    pub fn render(
        &mut self,
        document: &ConfigDocument,
        context: &RenderContext,
        registry: &Registry,
    ) -> RenderOutput {
        let mut pass = self.begin_pass(document, context, registry);
        let layout = resolve_layout(
            &document.layout,
            document.theme.as_ref(),
            &pass.context.viewport_or_default(),
            &self.options,
        );
        let loading_boundary = document.loading.as_ref().is_some_and(|l| l.enabled);

        log::debug!(
            "Rendering {} components of '{}'",
            document.components.len(),
            document.id
        );

        let boundary = document.error_boundary.as_ref().is_some_and(|b| b.enabled);
        let blocks = if boundary {
            match isolate(|| Ok(self.render_nodes(&document.components, &mut pass))) {
                Ok(blocks) => blocks,
                Err(err) => vec![self.document_fallback(document, &mut pass, err)],
            }
        } else {
            self.render_nodes(&document.components, &mut pass)
        };

        RenderOutput {
            layout,
            blocks,
            diagnostics: pass.diagnostics,
            metrics: pass.metrics,
            loading_boundary,
        }
    }

    /// Clears the failure state of `node_id` and re-renders only that node.
    ///
    /// Returns `None` when the node does not exist, is hidden by its
    /// conditions, or its type is not registered.
    pub fn retry(
        &mut self,
        document: &ConfigDocument,
        context: &RenderContext,
        registry: &Registry,
        node_id: &str,
    ) -> Option<RenderBlock> {
        self.failures.remove(node_id);
        *self.retry_counts.entry(node_id.to_string()).or_insert(0) += 1;
        log::debug!("Retrying component '{}'", node_id);

        let node = document.find_node(node_id)?;
        let mut pass = self.begin_pass(document, context, registry);
        self.render_node(node, &mut pass)
    }

    fn begin_pass<'a>(
        &self,
        document: &ConfigDocument,
        context: &RenderContext,
        registry: &'a Registry,
    ) -> Pass<'a> {
        let context = self.effective_context(context);
        let context_value = context.to_value();
        Pass {
            registry,
            context,
            context_value,
            theme_value: document.theme.as_ref().map(|theme| theme.to_value()),
            retry_affordance: document
                .error_boundary
                .as_ref()
                .and_then(|b| b.retry_button)
                .unwrap_or(true),
            diagnostics: Vec::new(),
            metrics: Vec::new(),
        }
    }

    fn render_nodes(&mut self, nodes: &[ComponentNode], pass: &mut Pass<'_>) -> Vec<RenderBlock> {
        let mut sorted: Vec<&ComponentNode> = nodes.iter().collect();
        sorted.sort_by_key(|node| node.order);
        sorted
            .into_iter()
            .filter_map(|node| self.render_node(node, pass))
            .collect()
    }

    fn render_node(&mut self, node: &ComponentNode, pass: &mut Pass<'_>) -> Option<RenderBlock> {
        if !evaluate_conditions(&node.conditions, &pass.context_value) {
            return None;
        }

        let props = self.node_props(node, pass);

        let Some(unit) = pass.registry.get(&node.component_type) else {
            log::warn!(
                "Component type \"{}\" not found in registry",
                node.component_type
            );
            pass.diagnostics.push(RenderDiagnostic::MissingComponent {
                node_id: node.id.clone(),
                component_type: node.component_type.clone(),
            });
            return None;
        };

        if let Some(message) = self.failures.get(&node.id).cloned() {
            return Some(self.fallback_block(node, message, pass));
        }

        let merged = merge_shallow(&unit.default_props, &props);
        let result = self.instantiate(node, unit.factory, &merged, pass);

        match result {
            Ok(output) => Some(RenderBlock::Component {
                id: node.id.clone(),
                component: node.component_type.clone(),
                display_name: unit.display_name,
                props: merged,
                output,
                class_name: node.styles.as_ref().and_then(|s| s.class_name.clone()),
                accessibility: node.accessibility.clone(),
                animation: if self.options.enable_animations {
                    node.animation.clone()
                } else {
                    None
                },
                children: self.render_nodes(&node.children, pass),
            }),
            Err(err) => {
                let message = err.to_string();
                log::error!(
                    "Component '{}' ({}) failed: {}",
                    node.id,
                    node.component_type,
                    message
                );
                self.failures.insert(node.id.clone(), message.clone());
                pass.diagnostics.push(RenderDiagnostic::InstantiationFailed {
                    node_id: node.id.clone(),
                    component_type: node.component_type.clone(),
                    message: message.clone(),
                });
                let report = self.report(&node.id, &node.component_type, &message, pass);
                Some(self.fallback_block_with(node, &report, pass))
            }
        }
    }

    /// Base props, then the responsive bucket, then templates, then theme references.
    fn node_props(&self, node: &ComponentNode, pass: &Pass<'_>) -> Props {
        let mut props = node.props.clone();
        if let Some(responsive) = &node.responsive {
            let overrides = resolve_responsive(responsive, &pass.context.viewport_or_default());
            let bucket = match overrides.get("props") {
                Some(Value::Object(bucket)) => bucket.clone(),
                _ => overrides,
            };
            props = merge_shallow(&props, &bucket);
        }

        let props = resolve_props(&props, &pass.context_value);
        match &pass.theme_value {
            Some(theme) => resolve_theme_props(&props, theme),
            None => props,
        }
    }

    fn instantiate(
        &mut self,
        node: &ComponentNode,
        factory: Rc<dyn RenderableFactory>,
        props: &Props,
        pass: &mut Pass<'_>,
    ) -> Result<Value, RenderError> {
        let stopwatch = Stopwatch::start();
        let result = with_failure_isolation(factory).render(props);
        let render_time_ms = stopwatch.elapsed_ms();

        let update_count = self.update_counts.entry(node.id.clone()).or_insert(0);
        *update_count += 1;
        let metric = PerformanceMetric {
            component_id: node.id.clone(),
            component_type: node.component_type.clone(),
            render_time_ms,
            update_count: *update_count,
            last_update: now_ms(),
        };
        if let Some(callback) = &self.options.on_performance_metric {
            callback(&metric);
        }
        pass.metrics.push(metric);

        result
    }

    fn report(
        &self,
        component_id: &str,
        component_type: &str,
        message: &str,
        pass: &Pass<'_>,
    ) -> ComponentError {
        let report = ComponentError {
            component_id: component_id.to_string(),
            component_type: component_type.to_string(),
            error: message.to_string(),
            timestamp: now_ms(),
            context: pass.context.clone(),
        };
        if let Some(callback) = &self.options.on_error {
            callback(&report);
        }
        report
    }

    fn fallback_block(&self, node: &ComponentNode, message: String, pass: &Pass<'_>) -> RenderBlock {
        let report = ComponentError {
            component_id: node.id.clone(),
            component_type: node.component_type.clone(),
            error: message,
            timestamp: now_ms(),
            context: pass.context.clone(),
        };
        self.fallback_block_with(node, &report, pass)
    }

    fn fallback_block_with(
        &self,
        node: &ComponentNode,
        report: &ComponentError,
        pass: &Pass<'_>,
    ) -> RenderBlock {
        let output = node
            .error_fallback
            .as_deref()
            .and_then(|fallback| self.render_fallback_node(fallback, report, pass))
            .unwrap_or_else(|| self.fallback_presentation(report, pass));

        RenderBlock::Fallback {
            id: node.id.clone(),
            component: node.component_type.clone(),
            error: report.error.clone(),
            retry_count: self.retry_count(&node.id),
            output,
        }
    }

    fn render_fallback_node(
        &self,
        fallback: &ComponentNode,
        report: &ComponentError,
        pass: &Pass<'_>,
    ) -> Option<Value> {
        let unit = pass.registry.get(&fallback.component_type)?;
        let mut props = merge_shallow(&unit.default_props, &self.node_props(fallback, pass));
        props.insert("error".to_string(), Value::String(report.error.clone()));

        match with_failure_isolation(unit.factory).render(&props) {
            Ok(output) => Some(output),
            Err(err) => {
                log::error!(
                    "Error fallback '{}' for '{}' failed: {}",
                    fallback.id,
                    report.component_id,
                    err
                );
                None
            }
        }
    }

    fn fallback_presentation(&self, report: &ComponentError, pass: &Pass<'_>) -> Value {
        match &self.options.fallback {
            Some(fallback) => fallback(report),
            None => default_fallback(&report.error, pass.retry_affordance),
        }
    }

    fn document_fallback(
        &self,
        document: &ConfigDocument,
        pass: &Pass<'_>,
        err: RenderError,
    ) -> RenderBlock {
        let message = err.to_string();
        log::error!("Render of '{}' failed: {}", document.id, message);
        let report = self.report(&document.id, DOCUMENT_BOUNDARY_TYPE, &message, pass);

        let named = document
            .error_boundary
            .as_ref()
            .and_then(|b| b.fallback_component.as_deref())
            .and_then(|name| pass.registry.get(name))
            .and_then(|unit| {
                let mut props = unit.default_props.clone();
                props.insert("error".to_string(), Value::String(message.clone()));
                props.insert("retry".to_string(), Value::Bool(pass.retry_affordance));
                with_failure_isolation(unit.factory).render(&props).ok()
            });

        RenderBlock::Fallback {
            id: document.id.clone(),
            component: DOCUMENT_BOUNDARY_TYPE.to_string(),
            error: message,
            retry_count: 0,
            output: named.unwrap_or_else(|| {
                isolate(|| Ok(self.fallback_presentation(&report, pass)))
                    .unwrap_or_else(|_| default_fallback(&report.error, pass.retry_affordance))
            }),
        }
    }
}

/// Generic failure presentation used when no other fallback applies.
pub fn default_fallback(error: &str, retry: bool) -> Value {
    json!({
        "className": "config-ui-error-boundary",
        "title": "Something went wrong",
        "error": error,
        "retry": retry,
    })
}

/// One-shot render with fresh failure state.
pub fn render(
    document: &ConfigDocument,
    context: &RenderContext,
    registry: &Registry,
    options: &RenderOptions,
) -> RenderOutput {
    Renderer::new(options.clone()).render(document, context, registry)
}
