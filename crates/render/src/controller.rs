//! Lifecycle of one (document, context) pairing over time.
//!
//! The [`Controller`] keeps the last processed document, runs the
//! sanitize → validate → optimize pipeline on every new input, derives the
//! effective context from its host, and accumulates per-node metrics across
//! render passes. Asynchronous configuration fetches are modeled with
//! [`LoadTicket`]s: only the result of the most recent
//! [`begin_load`](Controller::begin_load) is applied.

use std::rc::Rc;

use hybridui_core::{
    ConfigDocument, HostEnvironment, RenderContext, UiError, ValidationError, ValidationResult,
    ValidationWarning, optimize, sanitize, validate,
};
use serde::Deserialize;
use serde_json::Value;

use crate::registry::Registry;
use crate::renderer::{
    ComponentError, ErrorCallback, MetricCallback, PerformanceMetric, RenderBlock, RenderError,
    RenderOptions, RenderOutput, Renderer, isolate, now_ms,
};

/// Id reported when processing a document fails unexpectedly.
pub const PROCESSOR_ID: &str = "config-processor";
/// Component type reported when processing a document fails unexpectedly.
pub const PROCESSOR_TYPE: &str = "ConfigProcessor";

/// Receives the errors of a failed validation.
pub type ValidationCallback = Rc<dyn Fn(&[ValidationError])>;

/// Controller configuration.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ControllerOptions {
    /// Validate every processed document.
    pub enable_validation: bool,
    /// Rewrite every processed document to its minimal form.
    pub enable_optimization: bool,
    /// Keep per-node metrics across render passes.
    pub enable_performance_tracking: bool,
    /// Options of the owned renderer, including the host environment.
    pub render: RenderOptions,
    /// Unexpected processing failures; also used for node failures when
    /// `render.on_error` is unset.
    #[serde(skip)]
    pub on_error: Option<ErrorCallback>,
    /// Errors of a failed validation.
    #[serde(skip)]
    pub on_validation_error: Option<ValidationCallback>,
    /// Tracked metrics, called only when tracking is enabled.
    #[serde(skip)]
    pub on_performance_metric: Option<MetricCallback>,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            enable_validation: true,
            enable_optimization: false,
            enable_performance_tracking: false,
            render: RenderOptions::default(),
            on_error: None,
            on_validation_error: None,
            on_performance_metric: None,
        }
    }
}

impl std::fmt::Debug for ControllerOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerOptions")
            .field("enable_validation", &self.enable_validation)
            .field("enable_optimization", &self.enable_optimization)
            .field(
                "enable_performance_tracking",
                &self.enable_performance_tracking,
            )
            .field("render", &self.render)
            .finish_non_exhaustive()
    }
}

/// Processing state of the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerStatus {
    /// No document has been supplied.
    Idle,
    /// The current document was processed successfully.
    Ready,
    /// The last processing attempt failed; the previous document, if any, is kept.
    Failed {
        /// Failure message.
        message: String,
    },
}

/// Handle of one in-flight configuration fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone)]
struct Validation {
    is_valid: bool,
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationWarning>,
}

impl Default for Validation {
    fn default() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl From<ValidationResult> for Validation {
    fn from(result: ValidationResult) -> Self {
        Self {
            is_valid: result.is_valid,
            errors: result.errors,
            warnings: result.warnings,
        }
    }
}

struct Processed {
    value: Value,
    document: ConfigDocument,
    validation: Validation,
}

/// Stateful owner of one document, its context and its renderer.
#[derive(Debug)]
pub struct Controller {
    options: ControllerOptions,
    context: RenderContext,
    renderer: Renderer,
    input: Option<Value>,
    value: Option<Value>,
    document: Option<ConfigDocument>,
    validation: Validation,
    metrics: Vec<PerformanceMetric>,
    status: ControllerStatus,
    pending: Option<LoadTicket>,
    next_ticket: u64,
}

impl Controller {
    /// Creates a controller and processes `initial_document` if given.
    pub fn new(
        initial_document: Option<Value>,
        initial_context: RenderContext,
        options: ControllerOptions,
    ) -> Self {
        let mut render_options = options.render.clone();
        if render_options.on_error.is_none() {
            render_options.on_error = options.on_error.clone();
        }

        let mut controller = Self {
            renderer: Renderer::new(render_options),
            options,
            context: initial_context,
            input: None,
            value: None,
            document: None,
            validation: Validation::default(),
            metrics: Vec::new(),
            status: ControllerStatus::Idle,
            pending: None,
            next_ticket: 0,
        };
        controller.process(initial_document);
        controller
    }

    /// Current processed document.
    pub fn document(&self) -> Option<&ConfigDocument> {
        self.document.as_ref()
    }

    /// Current processed document as a raw value.
    pub fn document_value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Whether a fetch started with [`begin_load`](Self::begin_load) is outstanding.
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Validity of the current document; `true` when validation is disabled.
    pub fn is_valid(&self) -> bool {
        self.validation.is_valid
    }

    /// Structural errors of the current document.
    pub fn errors(&self) -> &[ValidationError] {
        &self.validation.errors
    }

    /// Structural warnings of the current document.
    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.validation.warnings
    }

    /// Latest tracked metric per node.
    pub fn metrics(&self) -> &[PerformanceMetric] {
        &self.metrics
    }

    /// Effective context: caller context plus host-derived viewport and performance hint.
    pub fn context(&self) -> RenderContext {
        self.renderer.effective_context(&self.context)
    }

    /// Processing state.
    pub fn status(&self) -> &ControllerStatus {
        &self.status
    }

    /// Shallow-merges `updates` into the caller context.
    pub fn update_context(&mut self, updates: RenderContext) {
        self.context.merge(updates);
    }

    /// Records a new host window size.
    pub fn on_viewport_change(&mut self, width: u32, height: u32) {
        self.renderer.on_viewport_change(width, height);
    }

    /// Replaces the whole host environment.
    pub fn set_host(&mut self, host: HostEnvironment) {
        self.renderer.set_host(host);
    }

    /// Replaces the document; supersedes any outstanding fetch.
    pub fn set_document(&mut self, raw: Option<Value>) {
        if let Some(ticket) = self.pending.take() {
            log::debug!("Superseding pending load {:?}", ticket);
        }
        self.process(raw);
    }

    /// Starts a fetch; any earlier outstanding ticket becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.next_ticket += 1;
        let ticket = LoadTicket(self.next_ticket);
        self.pending = Some(ticket);
        ticket
    }

    /// Applies the result of a fetch. Returns `false` when `ticket` is stale.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<Value, UiError>) -> bool {
        if self.pending != Some(ticket) {
            log::warn!("Ignoring stale configuration load {:?}", ticket);
            return false;
        }
        self.pending = None;

        match result {
            Ok(raw) => self.process(Some(raw)),
            Err(err) => self.fail(&err.to_string()),
        }
        true
    }

    /// Validates the current document again and refreshes `errors` and
    /// `warnings`, also when per-input validation is disabled.
    ///
    /// The document and the renderer's node state are left untouched.
    pub fn revalidate(&mut self) {
        let Some(value) = &self.value else {
            return;
        };
        let validation = Validation::from(validate(value));
        self.report_validation(&validation);
        self.validation = validation;
    }

    /// Rewrites the current document to its minimal form.
    pub fn optimize(&mut self) {
        let Some(value) = &self.value else {
            return;
        };
        let optimized = optimize(value);
        match ConfigDocument::from_value(optimized.clone()) {
            Ok(document) => {
                self.document = Some(document);
                self.value = Some(optimized);
            }
            Err(err) => self.fail(&err.to_string()),
        }
    }

    /// Re-processes the last supplied input, typically after a failure.
    ///
    /// Like any accepted input, this starts from fresh node state.
    pub fn retry(&mut self) {
        let input = self.input.clone();
        self.process(input);
    }

    /// Renders the current document against the effective context.
    pub fn render(&mut self, registry: &Registry) -> Option<RenderOutput> {
        let document = self.document.as_ref()?;
        let output = self.renderer.render(document, &self.context, registry);
        for metric in &output.metrics {
            self.record_metric(metric.clone());
        }
        Some(output)
    }

    /// Clears the failure state of one node and re-renders it.
    pub fn retry_node(&mut self, registry: &Registry, node_id: &str) -> Option<RenderBlock> {
        let document = self.document.as_ref()?;
        self.renderer.retry(document, &self.context, registry, node_id)
    }

    /// Keeps `metric` as the latest sample of its node when tracking is enabled.
    pub fn record_metric(&mut self, metric: PerformanceMetric) {
        if !self.options.enable_performance_tracking {
            return;
        }
        if let Some(callback) = &self.options.on_performance_metric {
            callback(&metric);
        }
        self.metrics
            .retain(|existing| existing.component_id != metric.component_id);
        self.metrics.push(metric);
    }

    fn process(&mut self, raw: Option<Value>) {
        self.input = raw.clone();
        let Some(raw) = raw else {
            self.document = None;
            self.value = None;
            self.validation = Validation::default();
            self.status = ControllerStatus::Idle;
            return;
        };

        let options = &self.options;
        match isolate(|| run_pipeline(&raw, options)) {
            Ok(processed) => {
                self.report_validation(&processed.validation);
                self.validation = processed.validation;
                self.value = Some(processed.value);
                self.document = Some(processed.document);
                self.status = ControllerStatus::Ready;
                // failures, retry counts and metrics belong to the replaced document
                self.renderer.reset();
                self.metrics.clear();
            }
            Err(err) => self.fail(&err.to_string()),
        }
    }

    fn report_validation(&self, validation: &Validation) {
        if validation.is_valid {
            return;
        }
        log::warn!(
            "Config validation failed: {}",
            validation
                .errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ")
        );
        if let Some(callback) = &self.options.on_validation_error {
            callback(&validation.errors);
        }
    }

    fn fail(&mut self, message: &str) {
        log::error!("Failed to process config: {}", message);
        if let Some(callback) = &self.options.on_error {
            callback(&ComponentError {
                component_id: PROCESSOR_ID.to_string(),
                component_type: PROCESSOR_TYPE.to_string(),
                error: message.to_string(),
                timestamp: now_ms(),
                context: self.context(),
            });
        }
        self.status = ControllerStatus::Failed {
            message: message.to_string(),
        };
    }
}

fn run_pipeline(raw: &Value, options: &ControllerOptions) -> Result<Processed, RenderError> {
    let mut value = sanitize(raw);

    let validation = if options.enable_validation {
        let mut result = validate(&value);
        value = std::mem::take(&mut result.repaired_document);
        Validation::from(result)
    } else {
        Validation::default()
    };

    if options.enable_optimization {
        value = optimize(&value);
    }

    let document = ConfigDocument::from_value(value.clone())?;
    Ok(Processed {
        value,
        document,
        validation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hybridui_core::{ErrorCode, Props};
    use serde_json::json;
    use std::cell::{Cell, RefCell};

    fn page(id: &str) -> Value {
        json!({
            "id": id,
            "version": "1.0.0",
            "layout": {"type": "flex"},
            "components": [{"id": "hero", "type": "Hero", "order": 1, "props": {"title": "<script>x</script>Hi"}}]
        })
    }

    #[test]
    fn processes_initial_document() {
        let controller = Controller::new(
            Some(page("home")),
            RenderContext::default(),
            ControllerOptions::default(),
        );
        assert_eq!(controller.status(), &ControllerStatus::Ready);
        assert!(controller.is_valid());
        let document = controller.document().unwrap();
        assert_eq!(document.components[0].props["title"], "Hi");
    }

    #[test]
    fn no_document_is_idle_and_valid() {
        let controller = Controller::new(None, RenderContext::default(), ControllerOptions::default());
        assert_eq!(controller.status(), &ControllerStatus::Idle);
        assert!(controller.is_valid());
        assert!(controller.document().is_none());
    }

    #[test]
    fn reports_validation_errors() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let options = ControllerOptions {
            on_validation_error: Some(Rc::new(move |errors: &[ValidationError]| {
                sink.borrow_mut().extend(errors.iter().map(|e| e.code))
            })),
            ..ControllerOptions::default()
        };
        let controller = Controller::new(
            Some(json!({"layout": {}, "components": []})),
            RenderContext::default(),
            options,
        );
        assert!(!controller.is_valid());
        assert_eq!(*seen.borrow(), vec![ErrorCode::MissingId]);
        assert_eq!(controller.warnings().len(), 1);
        assert!(controller.document().is_some());
    }

    #[test]
    fn validation_disabled_is_always_valid() {
        let options = ControllerOptions {
            enable_validation: false,
            ..ControllerOptions::default()
        };
        let controller = Controller::new(Some(json!({"components": []})), RenderContext::default(), options);
        assert!(controller.is_valid());
        assert!(controller.errors().is_empty());
    }

    #[test]
    fn unexpected_failure_keeps_previous_document() {
        let reports = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&reports);
        let options = ControllerOptions {
            on_error: Some(Rc::new(move |e: &ComponentError| sink.borrow_mut().push(e.clone()))),
            ..ControllerOptions::default()
        };
        let mut controller = Controller::new(Some(page("home")), RenderContext::default(), options);

        controller.set_document(Some(json!("not a document")));
        assert!(matches!(controller.status(), ControllerStatus::Failed { .. }));
        assert_eq!(controller.document().unwrap().id, "home");
        assert_eq!(reports.borrow()[0].component_id, PROCESSOR_ID);
        assert_eq!(reports.borrow()[0].component_type, PROCESSOR_TYPE);

        controller.set_document(Some(page("next")));
        assert_eq!(controller.status(), &ControllerStatus::Ready);
        assert_eq!(controller.document().unwrap().id, "next");
    }

    #[test]
    fn latest_load_wins() {
        let mut controller = Controller::new(None, RenderContext::default(), ControllerOptions::default());
        let first = controller.begin_load();
        let second = controller.begin_load();
        assert!(controller.is_loading());

        assert!(controller.finish_load(second, Ok(page("second"))));
        assert!(!controller.is_loading());
        assert!(!controller.finish_load(first, Ok(page("first"))));
        assert_eq!(controller.document().unwrap().id, "second");
    }

    #[test]
    fn set_document_supersedes_pending_load() {
        let mut controller = Controller::new(None, RenderContext::default(), ControllerOptions::default());
        let ticket = controller.begin_load();
        controller.set_document(Some(page("direct")));
        assert!(!controller.finish_load(ticket, Ok(page("late"))));
        assert_eq!(controller.document().unwrap().id, "direct");
    }

    #[test]
    fn failed_load_then_retry() {
        let mut controller = Controller::new(Some(page("home")), RenderContext::default(), ControllerOptions::default());
        let ticket = controller.begin_load();
        controller.finish_load(ticket, Err(UiError::InternalError("timeout".into())));
        assert!(matches!(controller.status(), ControllerStatus::Failed { message } if message.contains("timeout")));

        controller.retry();
        assert_eq!(controller.status(), &ControllerStatus::Ready);
    }

    #[test]
    fn optimize_strips_metadata() {
        let mut controller = Controller::new(
            Some(json!({
                "id": "home",
                "layout": {},
                "components": [{"id": "a", "type": "A", "order": 1, "styles": {"className": "x"}}]
            })),
            RenderContext::default(),
            ControllerOptions::default(),
        );
        assert!(controller.document().unwrap().components[0].styles.is_some());
        controller.optimize();
        assert!(controller.document().unwrap().components[0].styles.is_none());
        assert!(controller.document_value().unwrap()["components"][0].get("styles").is_none());
    }

    #[test]
    fn context_updates_and_viewport() {
        let mut controller = Controller::new(
            None,
            RenderContext::from_value(json!({"user": {"tier": "gold"}})).unwrap(),
            ControllerOptions::default(),
        );
        controller.update_context(RenderContext::from_value(json!({"cart": {"count": 2}})).unwrap());
        controller.on_viewport_change(500, 900);

        let context = controller.context();
        assert_eq!(context.user, Some(json!({"tier": "gold"})));
        assert_eq!(context.extra["cart"], json!({"count": 2}));
        assert!(context.viewport.unwrap().is_mobile);
    }

    #[test]
    fn tracked_metrics_keep_latest_per_node() {
        let options = ControllerOptions {
            enable_performance_tracking: true,
            ..ControllerOptions::default()
        };
        let mut controller = Controller::new(Some(page("home")), RenderContext::default(), options);
        let mut registry = Registry::new();
        registry.register(
            "Hero",
            |props: &Props| -> Result<Value, RenderError> { Ok(Value::Object(props.clone())) },
            Default::default(),
        );

        controller.render(&registry).unwrap();
        controller.render(&registry).unwrap();
        assert_eq!(controller.metrics().len(), 1);
        assert_eq!(controller.metrics()[0].update_count, 2);
    }

    #[test]
    fn metrics_untracked_by_default() {
        let mut controller = Controller::new(Some(page("home")), RenderContext::default(), ControllerOptions::default());
        let registry = Registry::new();
        let output = controller.render(&registry).unwrap();
        assert!(output.blocks.is_empty());
        assert!(controller.metrics().is_empty());
    }

    fn registry_with_hero() -> Registry {
        let mut registry = Registry::new();
        registry.register(
            "Hero",
            |props: &Props| -> Result<Value, RenderError> { Ok(Value::Object(props.clone())) },
            Default::default(),
        );
        registry
    }

    fn flaky_registry(ready: Rc<Cell<bool>>) -> Registry {
        let mut registry = registry_with_hero();
        registry.register(
            "Flaky",
            move |_: &Props| -> Result<Value, RenderError> {
                if ready.get() {
                    Ok(json!("ok"))
                } else {
                    Err(RenderError::failed("boom"))
                }
            },
            Default::default(),
        );
        registry
    }

    fn single(id: &str, component_type: &str) -> Value {
        json!({
            "id": id,
            "version": "1",
            "layout": {"type": "flex"},
            "components": [{"id": "hero", "type": component_type, "order": 1}]
        })
    }

    #[test]
    fn numeric_version_renders() {
        let mut controller = Controller::new(
            Some(json!({
                "id": "home",
                "version": 2,
                "layout": {"type": "flex"},
                "components": [{"id": "hero", "type": "Hero", "order": 1}]
            })),
            RenderContext::default(),
            ControllerOptions::default(),
        );
        assert_eq!(controller.status(), &ControllerStatus::Ready);
        assert!(controller.is_valid());
        assert!(controller.warnings().is_empty());
        assert_eq!(controller.document().unwrap().version.as_deref(), Some("2"));

        let output = controller.render(&registry_with_hero()).unwrap();
        assert_eq!(output.ids(), vec!["hero"]);
    }

    #[test]
    fn new_document_starts_from_fresh_node_state() {
        let options = ControllerOptions {
            enable_performance_tracking: true,
            ..ControllerOptions::default()
        };
        let mut controller = Controller::new(Some(single("a", "Flaky")), RenderContext::default(), options);
        let registry = flaky_registry(Rc::new(Cell::new(false)));

        let output = controller.render(&registry).unwrap();
        assert!(output.blocks[0].is_fallback());
        assert_eq!(controller.metrics().len(), 1);

        controller.set_document(Some(single("b", "Hero")));
        assert!(controller.metrics().is_empty());
        let output = controller.render(&registry).unwrap();
        assert!(!output.blocks[0].is_fallback());
        assert_eq!(controller.metrics()[0].update_count, 1);
    }

    #[test]
    fn failed_input_keeps_node_state() {
        let mut controller = Controller::new(
            Some(single("a", "Flaky")),
            RenderContext::default(),
            ControllerOptions::default(),
        );
        let ready = Rc::new(Cell::new(false));
        let registry = flaky_registry(Rc::clone(&ready));
        controller.render(&registry).unwrap();

        controller.set_document(Some(json!(3)));
        ready.set(true);
        let output = controller.render(&registry).unwrap();
        assert!(output.blocks[0].is_fallback());
    }

    #[test]
    fn revalidate_runs_with_validation_disabled() {
        let options = ControllerOptions {
            enable_validation: false,
            ..ControllerOptions::default()
        };
        let mut controller = Controller::new(Some(json!({"components": []})), RenderContext::default(), options);
        assert!(controller.is_valid());

        controller.revalidate();
        assert!(!controller.is_valid());
        let codes: Vec<ErrorCode> = controller.errors().iter().map(|e| e.code).collect();
        assert_eq!(codes, vec![ErrorCode::MissingId, ErrorCode::MissingLayout]);
        assert_eq!(controller.warnings().len(), 1);
    }

    #[test]
    fn revalidate_reflects_optimized_document() {
        let mut controller = Controller::new(Some(page("home")), RenderContext::default(), ControllerOptions::default());
        controller.update_context(RenderContext::from_value(json!({"cart": {"count": 1}})).unwrap());
        controller.revalidate();
        assert!(controller.is_valid());
        assert!(controller.warnings().is_empty());

        controller.optimize();
        let mut raw = controller.document_value().unwrap().clone();
        raw.as_object_mut().unwrap().remove("version");
        controller.set_document(Some(raw));
        controller.revalidate();
        assert_eq!(controller.warnings()[0].field, "version");
    }

    #[test]
    fn revalidate_keeps_sticky_failures() {
        let mut controller = Controller::new(
            Some(single("a", "Flaky")),
            RenderContext::default(),
            ControllerOptions::default(),
        );
        let ready = Rc::new(Cell::new(false));
        let registry = flaky_registry(Rc::clone(&ready));
        controller.render(&registry).unwrap();

        ready.set(true);
        controller.revalidate();
        assert!(controller.render(&registry).unwrap().blocks[0].is_fallback());
    }

    #[test]
    fn retry_node_recovers_failed_node() {
        let mut controller = Controller::new(
            Some(single("a", "Flaky")),
            RenderContext::default(),
            ControllerOptions::default(),
        );
        let ready = Rc::new(Cell::new(false));
        let registry = flaky_registry(Rc::clone(&ready));
        assert!(controller.render(&registry).unwrap().blocks[0].is_fallback());

        ready.set(true);
        assert!(controller.render(&registry).unwrap().blocks[0].is_fallback());

        let block = controller.retry_node(&registry, "hero").unwrap();
        assert!(!block.is_fallback());
        assert!(!controller.render(&registry).unwrap().blocks[0].is_fallback());
        assert!(controller.retry_node(&registry, "missing").is_none());
    }
}
