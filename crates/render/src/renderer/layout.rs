use hybridui_core::props::{merge_deep, resolve_theme_props};
use hybridui_core::{LayoutConfig, LayoutType, ThemeConfig, Viewport, resolve_responsive};
use serde::Serialize;
use serde_json::Value;

use super::RenderOptions;

const ANIMATED_TRANSITION: &str = "all 0.3s ease-in-out";

/// Layout-level style parameters of a render pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutStyle {
    /// `config-ui-layout config-ui-layout--{type}` plus layout and caller classes.
    pub class_name: String,
    /// `flex`, `grid` or `block`.
    pub display: String,
    /// Flex direction of the container.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex_direction: Option<String>,
    /// Gap between children.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap: Option<Value>,
    /// Container padding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<Value>,
    /// Container margin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Value>,
    /// Main axis alignment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justify_content: Option<String>,
    /// Cross axis alignment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_items: Option<String>,
    /// Layout background color, else the theme background.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Background image of the layout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    /// Primary text color of the theme.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Present only when animations are enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<String>,
}

/// Derives the layout style from `layout` and `theme` for one viewport.
///
/// Responsive layout buckets are merged over the base fields with the same
/// tier rules as node props, and `theme(...)` references in layout fields
/// are replaced with theme tokens.
pub fn resolve_layout(
    layout: &LayoutConfig,
    theme: Option<&ThemeConfig>,
    viewport: &Viewport,
    options: &RenderOptions,
) -> LayoutStyle {
    let layout = effective_layout(layout, theme, viewport);

    let display = match layout.kind {
        LayoutType::Flex => "flex",
        LayoutType::Grid => "grid",
        _ => "block",
    };

    let class_name = [
        "config-ui-layout".to_string(),
        format!("config-ui-layout--{}", layout.kind.as_str()),
        layout.class_name.clone().unwrap_or_default(),
        options.class_name.clone().unwrap_or_default(),
    ]
    .into_iter()
    .map(|class| class.trim().to_string())
    .filter(|class| !class.is_empty())
    .collect::<Vec<_>>()
    .join(" ");

    let background = layout.background.as_ref();
    let alignment = layout.alignment.as_ref();

    LayoutStyle {
        class_name,
        display: display.to_string(),
        flex_direction: layout.direction.clone(),
        gap: layout.gap.clone(),
        padding: layout.padding.clone(),
        margin: layout.margin.clone(),
        justify_content: alignment.and_then(|a| a.justify.clone()),
        align_items: alignment.and_then(|a| a.align.clone()),
        background_color: background
            .and_then(|b| b.color.clone())
            .or_else(|| theme.and_then(|t| t.background_color().map(str::to_string))),
        background_image: background.and_then(|b| b.image.clone()),
        color: theme.and_then(|t| t.text_color().map(str::to_string)),
        transition: options
            .enable_animations
            .then(|| ANIMATED_TRANSITION.to_string()),
    }
}

fn effective_layout(layout: &LayoutConfig, theme: Option<&ThemeConfig>, viewport: &Viewport) -> LayoutConfig {
    let overrides = layout
        .responsive
        .as_ref()
        .map(|responsive| resolve_responsive(responsive, viewport))
        .unwrap_or_default();
    if overrides.is_empty() && theme.is_none() {
        return layout.clone();
    }

    let Ok(Value::Object(mut fields)) = serde_json::to_value(layout) else {
        return layout.clone();
    };
    fields.remove("responsive");
    merge_deep(&mut fields, &overrides);
    if let Some(theme) = theme {
        fields = resolve_theme_props(&fields, &theme.to_value());
    }

    match serde_json::from_value(Value::Object(fields)) {
        Ok(resolved) => resolved,
        Err(err) => {
            log::warn!("Ignoring responsive layout overrides: {}", err);
            layout.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn layout(value: Value) -> LayoutConfig {
        serde_json::from_value(value).unwrap()
    }

    fn theme(value: Value) -> ThemeConfig {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn display_follows_layout_type() {
        let options = RenderOptions::default();
        let vp = Viewport::default();
        for (kind, display) in [
            ("flex", "flex"),
            ("grid", "grid"),
            ("stack", "block"),
            ("masonry", "block"),
            ("auto", "block"),
        ] {
            let style = resolve_layout(&layout(json!({"type": kind})), None, &vp, &options);
            assert_eq!(style.display, display, "{kind}");
        }
    }

    #[test]
    fn class_name_joins_layout_and_caller_classes() {
        let options = RenderOptions {
            class_name: Some("page".into()),
            ..RenderOptions::default()
        };
        let style = resolve_layout(
            &layout(json!({"type": "grid", "className": "min-h-screen"})),
            None,
            &Viewport::default(),
            &options,
        );
        assert_eq!(
            style.class_name,
            "config-ui-layout config-ui-layout--grid min-h-screen page"
        );

        let style = resolve_layout(
            &layout(json!({"type": "flex"})),
            None,
            &Viewport::default(),
            &RenderOptions::default(),
        );
        assert_eq!(style.class_name, "config-ui-layout config-ui-layout--flex");
    }

    #[test]
    fn theme_supplies_colors() {
        let style = resolve_layout(
            &layout(json!({"type": "flex", "direction": "column"})),
            Some(&theme(json!({"colors": {"background": "#fff", "text": {"primary": "#111"}}}))),
            &Viewport::default(),
            &RenderOptions::default(),
        );
        assert_eq!(style.background_color.as_deref(), Some("#fff"));
        assert_eq!(style.color.as_deref(), Some("#111"));
        assert_eq!(style.flex_direction.as_deref(), Some("column"));
        assert_eq!(style.transition.as_deref(), Some("all 0.3s ease-in-out"));
    }

    #[test]
    fn layout_background_wins_over_theme() {
        let style = resolve_layout(
            &layout(json!({"type": "flex", "background": {"color": "#000", "image": "url(a.png)"}})),
            Some(&theme(json!({"colors": {"background": "#fff"}}))),
            &Viewport::default(),
            &RenderOptions::default(),
        );
        assert_eq!(style.background_color.as_deref(), Some("#000"));
        assert_eq!(style.background_image.as_deref(), Some("url(a.png)"));
    }

    #[test]
    fn responsive_overrides_apply_per_tier() {
        let config = layout(json!({
            "type": "flex",
            "gap": "0",
            "responsive": {
                "mobile": {"gap": "0.5rem"},
                "tablet": {"gap": "1rem"},
                "desktop": {"gap": "1.5rem"}
            }
        }));
        let options = RenderOptions::default();

        let mobile = resolve_layout(&config, None, &Viewport::from_size(375, 700), &options);
        assert_eq!(mobile.gap, Some(json!("0.5rem")));
        let tablet = resolve_layout(&config, None, &Viewport::from_size(800, 700), &options);
        assert_eq!(tablet.gap, Some(json!("1rem")));
        let desktop = resolve_layout(&config, None, &Viewport::from_size(1280, 700), &options);
        assert_eq!(desktop.gap, Some(json!("1.5rem")));
    }

    #[test]
    fn theme_references_resolve_in_layout_fields() {
        let style = resolve_layout(
            &layout(json!({"type": "grid", "gap": "theme(spacing.md)"})),
            Some(&theme(json!({"spacing": {"md": "1rem"}}))),
            &Viewport::default(),
            &RenderOptions::default(),
        );
        assert_eq!(style.gap, Some(json!("1rem")));
    }

    #[test]
    fn no_transition_without_animations() {
        let options = RenderOptions {
            enable_animations: false,
            ..RenderOptions::default()
        };
        let style = resolve_layout(&layout(json!({"type": "flex"})), None, &Viewport::default(), &options);
        assert!(style.transition.is_none());
        let value = serde_json::to_value(&style).unwrap();
        assert!(value.get("transition").is_none());
    }
}
