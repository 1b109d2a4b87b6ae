//! Render context: the environment a render pass is evaluated against.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Widths below this are mobile.
pub const TABLET_BREAKPOINT: u32 = 768;
/// Widths at or above this are desktop.
pub const DESKTOP_BREAKPOINT: u32 = 1024;
/// Widths at or above this additionally receive `wide` overrides.
pub const WIDE_BREAKPOINT: u32 = 1440;

/// Color scheme requested by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light scheme
    #[default]
    Light,
    /// Dark scheme
    Dark,
    /// Follow the host preference
    Auto,
}

/// Classified viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    /// Window width in CSS pixels.
    pub width: u32,
    /// Window height in CSS pixels.
    pub height: u32,
    /// Narrower than the tablet breakpoint.
    pub is_mobile: bool,
    /// Between the tablet and desktop breakpoints.
    pub is_tablet: bool,
    /// At or above the desktop breakpoint.
    pub is_desktop: bool,
}

impl Viewport {
    /// Classifies a window size into exactly one tier.
    pub fn from_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            is_mobile: width < TABLET_BREAKPOINT,
            is_tablet: (TABLET_BREAKPOINT..DESKTOP_BREAKPOINT).contains(&width),
            is_desktop: width >= DESKTOP_BREAKPOINT,
        }
    }

    /// Whether `wide` overrides apply.
    pub fn is_wide(&self) -> bool {
        self.width >= WIDE_BREAKPOINT
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::from_size(1200, 800)
    }
}

/// Coarse connection quality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connection {
    /// 2g-class connection
    Slow,
    /// Anything faster
    #[default]
    Fast,
}

/// Coarse device/connection hint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceHint {
    /// Two or fewer logical CPUs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_slow_device: Option<bool>,
    /// Connection quality.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<Connection>,
}

impl PerformanceHint {
    /// Fills fields missing from `self` with the ones in `derived`.
    pub fn or(self, derived: PerformanceHint) -> PerformanceHint {
        PerformanceHint {
            is_slow_device: self.is_slow_device.or(derived.is_slow_device),
            connection: self.connection.or(derived.connection),
        }
    }
}

/// Facts about the hosting environment the viewport and performance hint are derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostEnvironment {
    /// Window width.
    pub width: u32,
    /// Window height.
    pub height: u32,
    /// Logical CPU count, when the host exposes it.
    #[serde(default)]
    pub hardware_concurrency: Option<usize>,
    /// Effective connection type (`4g`, `slow-2g`, ...), when the host exposes it.
    #[serde(default)]
    pub effective_connection: Option<String>,
}

impl Default for HostEnvironment {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            hardware_concurrency: None,
            effective_connection: None,
        }
    }
}

impl HostEnvironment {
    /// Classified viewport of the host window.
    pub fn viewport(&self) -> Viewport {
        Viewport::from_size(self.width, self.height)
    }

    /// Performance hint derived from device and connection facts.
    pub fn performance(&self) -> PerformanceHint {
        let is_slow_device = self.hardware_concurrency.is_some_and(|cores| cores <= 2);
        let connection = match &self.effective_connection {
            Some(kind) if kind.contains("2g") => Connection::Slow,
            _ => Connection::Fast,
        };
        PerformanceHint {
            is_slow_device: Some(is_slow_device),
            connection: Some(connection),
        }
    }
}

/// Data a render pass is evaluated against.
///
/// Keys outside the known ones (`cart`, `session`, ...) are kept in `extra`
/// and addressable from conditions and templates like any other field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderContext {
    /// Current user, addressed as `user.*`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Value>,
    /// Requested color scheme.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeMode>,
    /// Viewport classification; replaced by the host's in the effective context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,
    /// Feature flags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature: Option<Map<String, Value>>,
    /// Application data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
    /// Application state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Map<String, Value>>,
    /// Device hint; fields set here win over derived ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<PerformanceHint>,
    /// Any other top-level key.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RenderContext {
    /// Decodes a context from a raw value.
    pub fn from_value(value: Value) -> Result<Self, crate::UiError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Shallow-merges `updates` into `self`: every field set in `updates` replaces ours.
    pub fn merge(&mut self, updates: RenderContext) {
        if updates.user.is_some() {
            self.user = updates.user;
        }
        if updates.theme.is_some() {
            self.theme = updates.theme;
        }
        if updates.viewport.is_some() {
            self.viewport = updates.viewport;
        }
        if updates.feature.is_some() {
            self.feature = updates.feature;
        }
        if updates.data.is_some() {
            self.data = updates.data;
        }
        if updates.state.is_some() {
            self.state = updates.state;
        }
        if updates.performance.is_some() {
            self.performance = updates.performance;
        }
        self.extra.extend(updates.extra);
    }

    /// Builds the effective context of a render pass.
    ///
    /// The viewport always comes from the host. The performance hint is
    /// derived from the host, with caller-supplied fields taking precedence.
    /// A missing theme defaults to light.
    pub fn effective(&self, host: &HostEnvironment) -> RenderContext {
        let performance = self
            .performance
            .clone()
            .unwrap_or_default()
            .or(host.performance());
        RenderContext {
            viewport: Some(host.viewport()),
            performance: Some(performance),
            theme: Some(self.theme.unwrap_or_default()),
            ..self.clone()
        }
    }

    /// The classified viewport, or the default desktop viewport.
    pub fn viewport_or_default(&self) -> Viewport {
        self.viewport.unwrap_or_default()
    }

    /// Returns the context as a raw value for dot-path evaluation.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
