//! Typed model of a configuration document.
//!
//! The pipeline passes (`sanitize`, `validate`, `optimize`) work on raw
//! [`serde_json::Value`] trees because they must cope with malformed input.
//! Once a document has been normalized it is converted into [`ConfigDocument`]
//! for rendering.

use crate::UiError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Property mapping of a component node.
pub type Props = Map<String, Value>;

/// Treats an explicit `null` as the type's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reads any value as text: strings verbatim, numbers and booleans in their
/// literal form, sequences and mappings as compact JSON. `null` is absent.
fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    })
}

fn scalar_text_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(deserializer)?.unwrap_or_default())
}

/// Root of a render pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocument {
    /// Document identifier; numeric ids are kept in their text form.
    #[serde(default, deserialize_with = "scalar_text_or_default")]
    pub id: String,
    /// Document version, used for tracking only. `2` and `"2"` read the same.
    #[serde(
        default,
        deserialize_with = "scalar_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,
    /// Page-level layout.
    #[serde(default, deserialize_with = "null_as_default")]
    pub layout: LayoutConfig,
    /// Design tokens addressable through `theme(path)` references.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeConfig>,
    /// Descriptive metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ConfigMetadata>,
    /// Top-level component nodes.
    #[serde(default, deserialize_with = "null_as_default")]
    pub components: Vec<ComponentNode>,
    /// Document-level failure isolation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_boundary: Option<ErrorBoundaryConfig>,
    /// Loading boundary configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loading: Option<LoadingConfig>,
    /// Animation defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animations: Option<AnimationConfig>,
}

impl ConfigDocument {
    /// Converts a raw (ideally already repaired) document into the typed model.
    ///
    /// A `components` field that is not a sequence is treated as empty.
    pub fn from_value(value: Value) -> Result<Self, UiError> {
        let Value::Object(mut map) = value else {
            return Err(UiError::invalid_document("document", "expected an object"));
        };

        if let Some(components) = map.get_mut("components")
            && !components.is_array()
            && !components.is_null()
        {
            log::warn!("Document components is not a sequence, treating it as empty");
            *components = Value::Array(Vec::new());
        }

        serde_json::from_value(Value::Object(map))
            .map_err(|err| UiError::invalid_document("document", err.to_string()))
    }

    /// Decodes a document from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, UiError> {
        Self::from_value(parse_json(text)?)
    }

    /// Decodes a document from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, UiError> {
        Self::from_value(parse_yaml(text)?)
    }

    /// Serializes the document back into a raw value.
    pub fn to_value(&self) -> Result<Value, UiError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Top-level nodes in render order: ascending `order`, ties keep document order.
    pub fn sorted_components(&self) -> Vec<&ComponentNode> {
        let mut nodes: Vec<&ComponentNode> = self.components.iter().collect();
        nodes.sort_by_key(|node| node.order);
        nodes
    }

    /// Finds a node anywhere in the tree by id.
    pub fn find_node(&self, id: &str) -> Option<&ComponentNode> {
        fn walk<'a>(nodes: &'a [ComponentNode], id: &str) -> Option<&'a ComponentNode> {
            nodes.iter().find_map(|node| {
                if node.id == id {
                    Some(node)
                } else {
                    walk(&node.children, id)
                }
            })
        }
        walk(&self.components, id)
    }
}

/// Parses JSON text into a raw document value.
pub fn parse_json(text: &str) -> Result<Value, UiError> {
    Ok(serde_json::from_str(text)?)
}

/// Parses YAML text into a raw document value.
pub fn parse_yaml(text: &str) -> Result<Value, UiError> {
    Ok(serde_yaml::from_str(text)?)
}

/// Layout strategy of the page container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutType {
    /// Flexbox container
    Flex,
    /// Grid container
    Grid,
    /// Vertical stack
    Stack,
    /// Column-based masonry
    Masonry,
    /// Block flow, also used for unrecognized values
    #[default]
    #[serde(other)]
    Auto,
}

impl LayoutType {
    /// Returns the lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutType::Flex => "flex",
            LayoutType::Grid => "grid",
            LayoutType::Stack => "stack",
            LayoutType::Masonry => "masonry",
            LayoutType::Auto => "auto",
        }
    }
}

/// Page-level layout configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Layout strategy.
    #[serde(rename = "type", default)]
    pub kind: LayoutType,
    /// Flex direction (`row`, `column`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    /// Gap between children, number or CSS length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<Value>,
    /// Container padding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<Value>,
    /// Container margin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<Value>,
    /// Extra CSS class names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Viewport-dependent overrides of the layout fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsive: Option<ResponsiveConfig>,
    /// Main/cross axis alignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    /// Background of the container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<BackgroundConfig>,
}

/// Main/cross axis alignment of a layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Alignment {
    /// Main axis (`start`, `center`, `between`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justify: Option<String>,
    /// Cross axis (`start`, `center`, `stretch`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
}

/// Background of a layout container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackgroundConfig {
    /// Solid color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Gradient description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<Gradient>,
    /// Pattern name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Color overlay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay: Option<Overlay>,
}

/// Background gradient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    /// `linear` or `radial`.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Color stops.
    #[serde(default)]
    pub colors: Vec<String>,
    /// Direction, e.g. `to right`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
}

/// Background overlay.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    /// Overlay color.
    pub color: String,
    /// Overlay opacity in `0.0..=1.0`.
    pub opacity: f64,
}

/// Viewport-tier override buckets.
///
/// Each bucket is a partial node or layout; for components the interesting
/// key is `props`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponsiveConfig {
    /// Applied when the viewport is classified as mobile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<Props>,
    /// Applied when the viewport is classified as tablet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tablet: Option<Props>,
    /// Applied when the viewport is classified as desktop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desktop: Option<Props>,
    /// Applied on top of the tier match on wide screens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wide: Option<Props>,
}

/// Design tokens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    /// Color palette.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<ThemeColors>,
    /// Spacing scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing: Option<Props>,
    /// Font families, sizes, weights and line heights.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typography: Option<Props>,
    /// Border radius scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<Props>,
    /// Shadow presets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadows: Option<Props>,
    /// Named breakpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakpoints: Option<Props>,
    /// Tokens outside the known sections.
    #[serde(flatten)]
    pub extra: Props,
}

impl ThemeConfig {
    /// Returns the theme as a raw value, the form `theme(path)` references resolve against.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Page background color, if defined.
    pub fn background_color(&self) -> Option<&str> {
        self.colors.as_ref()?.background.as_deref()
    }

    /// Primary text color, if defined.
    pub fn text_color(&self) -> Option<&str> {
        self.colors.as_ref()?.text.as_ref()?.primary.as_deref()
    }
}

/// Theme color palette.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeColors {
    /// Brand color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    /// Secondary brand color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
    /// Accent color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    /// Page background.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    /// Card and panel background.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface: Option<String>,
    /// Text colors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextColors>,
    /// Border color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
    /// Error state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Warning state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// Success state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<String>,
    /// Informational state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    /// Colors outside the known palette slots.
    #[serde(flatten)]
    pub extra: Props,
}

/// Text color variants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextColors {
    /// Body text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    /// Secondary text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
    /// De-emphasized text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muted: Option<String>,
}

/// Descriptive document metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMetadata {
    /// Human readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Search tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last modification timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Performance budget hints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<Props>,
}

/// Document-level failure isolation settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBoundaryConfig {
    /// Wraps the whole render pass in a failure boundary.
    #[serde(default)]
    pub enabled: bool,
    /// Registry key rendered when the whole pass fails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_component: Option<String>,
    /// Name of a host-side error handler.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_error: Option<String>,
    /// Whether fallbacks offer a retry affordance; defaults to true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_button: Option<bool>,
}

/// Loading boundary settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingConfig {
    /// Marks render output as wrapped in a loading boundary.
    #[serde(default)]
    pub enabled: bool,
    /// Registry key of the loading indicator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    /// Milliseconds before the indicator shows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<u64>,
    /// Minimum milliseconds the indicator stays visible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_duration: Option<u64>,
}

/// Document animation defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Whether document animations run.
    #[serde(default)]
    pub enabled: bool,
    /// Default duration in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Default easing function.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<String>,
    /// Delay between sibling entrances in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stagger: Option<f64>,
    /// Named animation presets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presets: Option<Props>,
}

/// One declared, typed, positioned element of the configuration tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentNode {
    /// Identifier, unique within the document.
    #[serde(default, deserialize_with = "scalar_text_or_default")]
    pub id: String,
    /// Registry key.
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub component_type: String,
    /// Properties handed to the renderable unit.
    #[serde(default, deserialize_with = "null_as_default")]
    pub props: Props,
    /// Render sequence key among siblings.
    #[serde(default, deserialize_with = "null_as_default")]
    pub order: i64,
    /// Nested nodes; rendered and ordered by the engine, not by the owning unit.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub children: Vec<ComponentNode>,
    /// Visibility predicates, all of which must hold.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub conditions: Vec<Condition>,
    /// Viewport-dependent overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsive: Option<ResponsiveConfig>,
    /// Styling hooks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<StyleConfig>,
    /// Entrance and exit animation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<ComponentAnimation>,
    /// ARIA attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<AccessibilityConfig>,
    /// Node rendered in place of this one when it fails to instantiate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_fallback: Option<Box<ComponentNode>>,
}

impl ComponentNode {
    /// Creates a bare node.
    pub fn new(id: impl Into<String>, component_type: impl Into<String>, order: i64) -> Self {
        Self {
            id: id.into(),
            component_type: component_type.into(),
            order,
            ..Default::default()
        }
    }
}

/// Styling hooks of a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleConfig {
    /// Extra CSS class names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Inline style declarations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css: Option<Props>,
    /// Declarations applied on hover.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover: Option<Props>,
    /// Declarations applied on focus.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<Props>,
    /// Declarations applied while active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<Props>,
}

/// Entrance/exit animation of a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentAnimation {
    /// Entrance preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrance: Option<String>,
    /// Exit preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit: Option<String>,
    /// Duration in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Delay in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<f64>,
    /// Easing function.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<String>,
}

/// Accessibility attributes of a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessibilityConfig {
    /// `aria-label`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,
    /// `aria-describedby`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aria_described_by: Option<String>,
    /// ARIA role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Tab order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_index: Option<i32>,
    /// Whether the element takes focus.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focusable: Option<bool>,
    /// Visually hidden, announced by screen readers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_reader_only: Option<bool>,
}

/// Visibility predicate over the render context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Dot-path into the render context.
    #[serde(default)]
    pub field: String,
    /// Comparison to apply.
    pub operator: Operator,
    /// Right-hand side of the comparison.
    #[serde(default)]
    pub value: Value,
    /// How this condition combines with its `nested` conditions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_operator: Option<LogicalOperator>,
    /// Sub-conditions combined through `logical_operator`.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub nested: Vec<Condition>,
}

impl Condition {
    /// Creates a flat condition.
    pub fn new(field: impl Into<String>, operator: Operator, value: Value) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
            logical_operator: None,
            nested: Vec::new(),
        }
    }
}

/// Comparison operator of a condition.
///
/// Unrecognized names are kept verbatim in [`Operator::Unknown`] so they
/// round-trip and can be reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    /// Strict equality.
    Equals,
    /// Sequence membership or substring.
    Contains,
    /// Numeric `>`.
    GreaterThan,
    /// Numeric `<`.
    LessThan,
    /// Resolved value is an element of the condition value.
    In,
    /// Resolved value is present and not null.
    Exists,
    /// Resolved text matches the condition value as a pattern.
    Matches,
    /// Any other name.
    Unknown(String),
}

impl Operator {
    /// Returns the wire name of the operator.
    pub fn as_str(&self) -> &str {
        match self {
            Operator::Equals => "equals",
            Operator::Contains => "contains",
            Operator::GreaterThan => "greaterThan",
            Operator::LessThan => "lessThan",
            Operator::In => "in",
            Operator::Exists => "exists",
            Operator::Matches => "matches",
            Operator::Unknown(name) => name,
        }
    }
}

impl From<String> for Operator {
    fn from(name: String) -> Self {
        match name.as_str() {
            "equals" => Operator::Equals,
            "contains" => Operator::Contains,
            "greaterThan" => Operator::GreaterThan,
            "lessThan" => Operator::LessThan,
            "in" => Operator::In,
            "exists" => Operator::Exists,
            "matches" => Operator::Matches,
            _ => Operator::Unknown(name),
        }
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.as_str().to_string()
    }
}

/// Boolean connective of a condition tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOperator {
    /// All must hold.
    #[default]
    And,
    /// Any may hold.
    Or,
}
