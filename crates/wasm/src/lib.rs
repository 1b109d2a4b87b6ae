use std::rc::Rc;

use hybridui_core::pipeline::{self, PipelineOptions};
use hybridui_core::{
    Condition, ConfigDocument, Props, RenderContext, ResponsiveConfig, Viewport,
};
use hybridui_render::{
    ComponentError, Registry, RenderError, RenderOptions, RenderableFactory, UnitOptions,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

// ============================================================================
// Conversion helpers
// ============================================================================

fn from_js(value: JsValue) -> Result<Value, JsError> {
    if value.is_undefined() || value.is_null() {
        return Ok(Value::Null);
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| JsError::new(&format!("Invalid input: {}", e)))
}

fn decode<T: DeserializeOwned + Default>(value: JsValue, what: &str) -> Result<T, JsError> {
    match from_js(value)? {
        Value::Null => Ok(T::default()),
        value => serde_json::from_value(value)
            .map_err(|e| JsError::new(&format!("Invalid {}: {}", what, e))),
    }
}

/// Serializes with plain JS objects instead of `Map`s.
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

fn js_error_message(err: &JsValue) -> String {
    if let Some(message) = err.as_string() {
        return message;
    }
    err.dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .unwrap_or_else(|| "JavaScript factory threw".to_string())
}

// ============================================================================
// Pipeline API
// ============================================================================

/// Strips script content from every string in a document.
#[wasm_bindgen(js_name = sanitizeConfig)]
pub fn sanitize_config(document: JsValue) -> Result<JsValue, JsError> {
    to_js(&hybridui_core::sanitize(&from_js(document)?))
}

/// Validates a document; returns `{ isValid, errors, warnings, repairedDocument }`.
#[wasm_bindgen(js_name = validateConfig)]
pub fn validate_config(document: JsValue) -> Result<JsValue, JsError> {
    to_js(&hybridui_core::validate(&from_js(document)?))
}

/// Reduces every node of a document to the fields a render pass needs.
#[wasm_bindgen(js_name = optimizeConfig)]
pub fn optimize_config(document: JsValue) -> Result<JsValue, JsError> {
    to_js(&hybridui_core::optimize(&from_js(document)?))
}

/// Runs sanitize, then validate and optimize as selected by `options`.
#[wasm_bindgen(js_name = processConfig)]
pub fn process_config(document: JsValue, options: JsValue) -> Result<JsValue, JsError> {
    let options: PipelineOptions = decode(options, "pipeline options")?;
    to_js(&pipeline::run(&from_js(document)?, &options))
}

/// Evaluates visibility conditions against a context; all must hold.
#[wasm_bindgen(js_name = evaluateConditions)]
pub fn evaluate_conditions(conditions: JsValue, context: JsValue) -> Result<bool, JsError> {
    let conditions: Vec<Condition> = decode(conditions, "conditions")?;
    Ok(hybridui_core::evaluate_conditions(
        &conditions,
        &from_js(context)?,
    ))
}

/// Resolves `{{path}}` templates in props against a context.
#[wasm_bindgen(js_name = resolveProps)]
pub fn resolve_props(props: JsValue, context: JsValue) -> Result<JsValue, JsError> {
    let props: Props = decode(props, "props")?;
    to_js(&hybridui_core::resolve_props(&props, &from_js(context)?))
}

/// Picks the responsive overrides for a viewport of `width` x `height`.
#[wasm_bindgen(js_name = resolveResponsive)]
pub fn resolve_responsive(responsive: JsValue, width: u32, height: u32) -> Result<JsValue, JsError> {
    let responsive: ResponsiveConfig = decode(responsive, "responsive config")?;
    to_js(&hybridui_core::resolve_responsive(
        &responsive,
        &Viewport::from_size(width, height),
    ))
}

// ============================================================================
// Renderer
// ============================================================================

/// A renderable unit backed by a JavaScript function `(props) => instance`.
struct JsFactory {
    function: js_sys::Function,
}

impl RenderableFactory for JsFactory {
    fn render(&self, props: &Props) -> Result<Value, RenderError> {
        let arg = to_js(props).map_err(|_| RenderError::failed("props are not serializable"))?;
        let result = self
            .function
            .call1(&JsValue::NULL, &arg)
            .map_err(|err| RenderError::Failed(js_error_message(&err)))?;
        if result.is_undefined() {
            return Ok(Value::Null);
        }
        serde_wasm_bindgen::from_value(result)
            .map_err(|e| RenderError::Failed(format!("Unsupported component output: {}", e)))
    }
}

/// Registry plus stateful renderer driven from JavaScript.
#[wasm_bindgen]
pub struct Renderer {
    registry: Registry,
    inner: hybridui_render::Renderer,
    on_error: Option<js_sys::Function>,
    document: Option<ConfigDocument>,
    context: RenderContext,
}

#[wasm_bindgen]
impl Renderer {
    /// Creates a renderer; `options` takes `{ enableAnimations, className, host }`.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<Renderer, JsError> {
        let options: RenderOptions = decode(options, "render options")?;
        Ok(Renderer {
            registry: Registry::new(),
            inner: hybridui_render::Renderer::new(options),
            on_error: None,
            document: None,
            context: RenderContext::default(),
        })
    }

    /// Registers `factory` under `component_type` with optional default props.
    pub fn register(
        &mut self,
        component_type: &str,
        factory: js_sys::Function,
        default_props: JsValue,
    ) -> Result<(), JsError> {
        let default_props: Props = decode(default_props, "default props")?;
        self.registry.register(
            component_type,
            JsFactory { function: factory },
            UnitOptions::with_defaults(default_props),
        );
        Ok(())
    }

    /// Removes a registration.
    pub fn unregister(&mut self, component_type: &str) {
        self.registry.unregister(component_type);
    }

    /// Whether `component_type` is registered.
    pub fn has(&self, component_type: &str) -> bool {
        self.registry.has(component_type)
    }

    /// Snapshot of every registration.
    #[wasm_bindgen(js_name = listAll)]
    pub fn list_all(&self) -> Result<JsValue, JsError> {
        to_js(&self.registry.list_all())
    }

    /// Sets the callback receiving `{ componentId, componentType, error, timestamp, context }`.
    #[wasm_bindgen(js_name = onError)]
    pub fn on_error(&mut self, callback: js_sys::Function) {
        self.on_error = Some(callback);
        self.install_error_callback();
    }

    /// Records a new host window size.
    #[wasm_bindgen(js_name = setViewport)]
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.inner.on_viewport_change(width, height);
    }

    /// Renders a document against a context; `options` replaces the constructor options when given.
    pub fn render(
        &mut self,
        document: JsValue,
        context: JsValue,
        options: JsValue,
    ) -> Result<JsValue, JsError> {
        if !(options.is_undefined() || options.is_null()) {
            let mut options: RenderOptions = decode(options, "render options")?;
            options.host = self.inner.options().host.clone();
            self.inner.set_options(options);
            self.install_error_callback();
        }

        let document = ConfigDocument::from_value(from_js(document)?)
            .map_err(|e| JsError::new(&e.to_string()))?;
        let context: RenderContext = decode(context, "render context")?;

        let output = self.inner.render(&document, &context, &self.registry);
        self.document = Some(document);
        self.context = context;
        to_js(&output)
    }

    /// Retries one failed node of the last rendered document; returns its block or `null`.
    pub fn retry(&mut self, node_id: &str) -> Result<JsValue, JsError> {
        let Some(document) = &self.document else {
            return Ok(JsValue::NULL);
        };
        match self
            .inner
            .retry(document, &self.context, &self.registry, node_id)
        {
            Some(block) => to_js(&block),
            None => Ok(JsValue::NULL),
        }
    }

    fn install_error_callback(&mut self) {
        let Some(callback) = self.on_error.clone() else {
            return;
        };
        let mut options = self.inner.options().clone();
        options.on_error = Some(Rc::new(move |report: &ComponentError| {
            let delivered = to_js(report)
                .map_err(|_| "report is not serializable".to_string())
                .and_then(|arg| {
                    callback
                        .call1(&JsValue::NULL, &arg)
                        .map_err(|err| js_error_message(&err))
                });
            if let Err(message) = delivered {
                log::warn!(
                    "Error callback failed for component '{}': {}",
                    report.component_id,
                    message
                );
            }
        }));
        self.inner.set_options(options);
    }
}
