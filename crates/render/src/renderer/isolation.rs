//! Failure containment around renderable factories.
//!
//! [`with_failure_isolation`] wraps a factory so that both reported errors and
//! panics come back as [`RenderError`] values. The renderer applies it to
//! every unit, so one node's failure never unwinds through its siblings.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use hybridui_core::Props;
use serde_json::Value;

use super::RenderError;
use crate::registry::RenderableFactory;

/// A factory whose panics are converted into [`RenderError::Panicked`].
#[derive(Clone)]
pub struct Isolated {
    inner: Rc<dyn RenderableFactory>,
}

impl RenderableFactory for Isolated {
    fn render(&self, props: &Props) -> Result<Value, RenderError> {
        isolate(|| self.inner.render(props))
    }
}

/// Wraps `factory` in a failure isolation boundary.
pub fn with_failure_isolation(factory: Rc<dyn RenderableFactory>) -> Isolated {
    Isolated { inner: factory }
}

/// Runs `f`, turning a panic into [`RenderError::Panicked`].
pub fn isolate<T>(f: impl FnOnce() -> Result<T, RenderError>) -> Result<T, RenderError> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(RenderError::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn passes_through_success() {
        let factory: Rc<dyn RenderableFactory> =
            Rc::new(|_: &Props| -> Result<Value, RenderError> { Ok(json!("ok")) });
        let isolated = with_failure_isolation(factory);
        assert_eq!(isolated.render(&Props::new()).unwrap(), json!("ok"));
    }

    #[test]
    fn passes_through_reported_errors() {
        let factory: Rc<dyn RenderableFactory> = Rc::new(|_: &Props| -> Result<Value, RenderError> {
            Err(RenderError::failed("bad props"))
        });
        let err = with_failure_isolation(factory)
            .render(&Props::new())
            .unwrap_err();
        assert!(matches!(err, RenderError::Failed(ref m) if m == "bad props"));
    }

    #[test]
    fn contains_panics() {
        let factory: Rc<dyn RenderableFactory> =
            Rc::new(|_: &Props| -> Result<Value, RenderError> { panic!("boom") });
        let err = with_failure_isolation(factory)
            .render(&Props::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "Component panicked: boom");
    }

    #[test]
    fn keeps_formatted_panic_messages() {
        let err = isolate::<()>(|| panic!("node {} failed", 7)).unwrap_err();
        assert!(matches!(err, RenderError::Panicked(ref m) if m == "node 7 failed"));
    }
}
