//! Name to renderable-unit lookup table.
//!
//! One [`Registry`] is created at startup and passed by reference to the
//! renderer and controller. Tests build a fresh one each. All access happens
//! on the rendering thread, so a later registration simply replaces an
//! earlier one under the same key.

mod types;

pub use types::{Loader, RegisteredUnit, RenderableFactory, UnitInfo, UnitOptions};

use crate::renderer::RenderError;
use hybridui_core::{Props, UiError};
use once_cell::unsync::OnceCell;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

enum UnitSource {
    Ready(Rc<dyn RenderableFactory>),
    Lazy {
        loader: Loader,
        loaded: OnceCell<Rc<dyn RenderableFactory>>,
    },
}

struct Entry {
    source: UnitSource,
    default_props: Props,
    display_name: String,
}

/// Stand-in for a lazy unit whose loader failed; every instantiation reports the failure.
struct FailedLoad {
    message: String,
}

impl RenderableFactory for FailedLoad {
    fn render(&self, _props: &Props) -> Result<Value, RenderError> {
        Err(RenderError::Failed(self.message.clone()))
    }
}

/// Registry of renderable units keyed by component type.
#[derive(Default)]
pub struct Registry {
    entries: HashMap<String, Entry>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a ready unit, replacing any previous entry under `component_type`.
    pub fn register<F>(&mut self, component_type: impl Into<String>, factory: F, options: UnitOptions)
    where
        F: RenderableFactory + 'static,
    {
        self.insert(
            component_type.into(),
            UnitSource::Ready(Rc::new(factory)),
            options,
        );
    }

    /// Registers a unit whose factory is built by `loader` on first lookup.
    pub fn register_lazy<L>(&mut self, component_type: impl Into<String>, loader: L, options: UnitOptions)
    where
        L: Fn() -> Result<Rc<dyn RenderableFactory>, UiError> + 'static,
    {
        self.insert(
            component_type.into(),
            UnitSource::Lazy {
                loader: Box::new(loader),
                loaded: OnceCell::new(),
            },
            options,
        );
    }

    fn insert(&mut self, component_type: String, source: UnitSource, options: UnitOptions) {
        let display_name = options
            .display_name
            .unwrap_or_else(|| component_type.clone());
        log::debug!("Component \"{}\" registered", component_type);
        self.entries.insert(
            component_type,
            Entry {
                source,
                default_props: options.default_props,
                display_name,
            },
        );
    }

    /// Looks up a unit, running its loader if it is lazy and not yet loaded.
    ///
    /// Returns `None` only when nothing is registered under `component_type`.
    /// A failing loader is not cached: the returned unit fails on
    /// instantiation and the next lookup tries the loader again.
    pub fn get(&self, component_type: &str) -> Option<RegisteredUnit> {
        let entry = self.entries.get(component_type)?;
        let factory = match &entry.source {
            UnitSource::Ready(factory) => Rc::clone(factory),
            UnitSource::Lazy { loader, loaded } => match loaded.get_or_try_init(loader) {
                Ok(factory) => {
                    log::debug!("Lazy component \"{}\" resolved", component_type);
                    Rc::clone(factory)
                }
                Err(err) => {
                    log::error!("{}", err);
                    Rc::new(FailedLoad {
                        message: err.to_string(),
                    })
                }
            },
        };

        Some(RegisteredUnit {
            factory,
            default_props: entry.default_props.clone(),
            display_name: entry.display_name.clone(),
        })
    }

    /// Whether a unit is registered under `component_type`.
    pub fn has(&self, component_type: &str) -> bool {
        self.entries.contains_key(component_type)
    }

    /// Removes the entry under `component_type`, if any.
    pub fn unregister(&mut self, component_type: &str) {
        if self.entries.remove(component_type).is_some() {
            log::debug!("Component \"{}\" unregistered", component_type);
        }
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        log::debug!("Component registry cleared");
    }

    /// Number of registered units.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of every entry, ordered by key. Does not run loaders.
    pub fn list_all(&self) -> BTreeMap<String, UnitInfo> {
        self.entries
            .iter()
            .map(|(key, entry)| {
                let (lazy, loaded) = match &entry.source {
                    UnitSource::Ready(_) => (false, true),
                    UnitSource::Lazy { loaded, .. } => (true, loaded.get().is_some()),
                };
                (
                    key.clone(),
                    UnitInfo {
                        display_name: entry.display_name.clone(),
                        default_props: entry.default_props.clone(),
                        lazy,
                        loaded,
                    },
                )
            })
            .collect()
    }

    /// Ends the registry's lifecycle, dropping every unit.
    pub fn dispose(mut self) {
        log::debug!("Disposing component registry with {} entries", self.len());
        self.entries.clear();
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&String> = self.entries.keys().collect();
        keys.sort();
        f.debug_struct("Registry").field("types", &keys).finish()
    }
}
