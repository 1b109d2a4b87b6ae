//! Property resolution: `{{path}}` templates, responsive buckets and `theme(path)` references.

use crate::conditions::text_form;
use crate::context::Viewport;
use crate::document::{Props, ResponsiveConfig};
use crate::path::lookup_present;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;

static THEME_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"theme\(([^)]+)\)").expect("theme reference pattern is valid"));

/// Returns the dot-path of a `{{a.b.c}}` template, or `None` for ordinary text.
pub fn template_path(value: &str) -> Option<&str> {
    let inner = value.strip_prefix("{{")?.strip_suffix("}}")?;
    Some(inner.trim())
}

/// Resolves template strings in `props` against `context`.
///
/// Template values whose path is absent keep their literal text. Nested
/// objects are resolved recursively; sequences and other leaves pass through.
pub fn resolve_props(props: &Props, context: &Value) -> Props {
    props
        .iter()
        .map(|(key, value)| (key.clone(), resolve_value(value, context)))
        .collect()
}

fn resolve_value(value: &Value, context: &Value) -> Value {
    match value {
        Value::String(text) => template_path(text)
            .and_then(|path| lookup_present(context, path))
            .cloned()
            .unwrap_or_else(|| value.clone()),
        Value::Object(map) => Value::Object(resolve_props(map, context)),
        other => other.clone(),
    }
}

/// Picks the override buckets that apply to `viewport`.
///
/// At most one of `mobile`/`tablet`/`desktop` is chosen (a viewport matching
/// no tier counts as desktop). On wide screens the `wide` bucket is merged on
/// top of the tier match.
pub fn resolve_responsive(responsive: &ResponsiveConfig, viewport: &Viewport) -> Props {
    let tier = if viewport.is_mobile {
        responsive.mobile.as_ref()
    } else if viewport.is_tablet {
        responsive.tablet.as_ref()
    } else {
        responsive.desktop.as_ref()
    };

    let mut resolved = tier.cloned().unwrap_or_default();
    if viewport.is_wide()
        && let Some(wide) = &responsive.wide
    {
        merge_deep(&mut resolved, wide);
    }
    resolved
}

/// Merges `overlay` into `base`; nested objects merge key by key, anything else replaces.
pub fn merge_deep(base: &mut Props, overlay: &Props) {
    for (key, value) in overlay {
        if let (Some(Value::Object(existing)), Value::Object(incoming)) = (base.get_mut(key), value)
        {
            merge_deep(existing, incoming);
            continue;
        }
        base.insert(key.clone(), value.clone());
    }
}

/// Shallow merge: every key of `overlay` replaces the one in `base`.
pub fn merge_shallow(base: &Props, overlay: &Props) -> Props {
    let mut merged = base.clone();
    for (key, value) in overlay {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Substitutes `theme(path.to.token)` references in `value` with theme tokens.
///
/// References that do not resolve to a scalar token are left untouched.
pub fn resolve_theme(value: &str, theme: &Value) -> String {
    if !value.contains("theme(") {
        return value.to_string();
    }

    THEME_REFERENCE
        .replace_all(value, |caps: &Captures<'_>| {
            match lookup_present(theme, caps[1].trim()) {
                Some(token @ (Value::String(_) | Value::Number(_) | Value::Bool(_))) => {
                    text_form(token)
                }
                _ => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Applies [`resolve_theme`] to every string in `props`, recursing into objects.
pub fn resolve_theme_props(props: &Props, theme: &Value) -> Props {
    props
        .iter()
        .map(|(key, value)| (key.clone(), resolve_theme_value(value, theme)))
        .collect()
}

fn resolve_theme_value(value: &Value, theme: &Value) -> Value {
    match value {
        Value::String(text) => Value::String(resolve_theme(text, theme)),
        Value::Object(map) => Value::Object(resolve_theme_props(map, theme)),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Props {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn substitutes_templates() {
        let resolved = resolve_props(
            &props(json!({"greeting": "{{ user.name }}", "count": "{{cart.count}}", "plain": "hi"})),
            &json!({"user": {"name": "Ada"}, "cart": {"count": 3}}),
        );
        assert_eq!(resolved["greeting"], "Ada");
        assert_eq!(resolved["count"], 3);
        assert_eq!(resolved["plain"], "hi");
    }

    #[test]
    fn missing_template_keeps_literal() {
        let resolved = resolve_props(&props(json!({"name": "{{user.name}}"})), &json!({}));
        assert_eq!(resolved["name"], "{{user.name}}");
    }

    #[test]
    fn falsy_values_still_substitute() {
        let resolved = resolve_props(
            &props(json!({"n": "{{cart.count}}", "flag": "{{feature.beta}}"})),
            &json!({"cart": {"count": 0}, "feature": {"beta": false}}),
        );
        assert_eq!(resolved["n"], 0);
        assert_eq!(resolved["flag"], false);
    }

    #[test]
    fn recurses_objects_but_not_sequences() {
        let resolved = resolve_props(
            &props(json!({
                "cta": {"label": "{{user.name}}"},
                "items": ["{{user.name}}"]
            })),
            &json!({"user": {"name": "Ada"}}),
        );
        assert_eq!(resolved["cta"]["label"], "Ada");
        assert_eq!(resolved["items"][0], "{{user.name}}");
    }

    #[test]
    fn partial_templates_are_text() {
        assert_eq!(template_path("Hello {{user.name}}"), None);
        assert_eq!(template_path("{{a.b}}"), Some("a.b"));
    }

    #[test]
    fn wide_applies_on_top_of_desktop_default() {
        let responsive: ResponsiveConfig = serde_json::from_value(json!({
            "mobile": {"props": {"limit": 4}},
            "wide": {"props": {"limit": 10}}
        }))
        .unwrap();
        let viewport = Viewport::from_size(1500, 900);
        let resolved = resolve_responsive(&responsive, &viewport);
        assert_eq!(resolved["props"]["limit"], 10);
    }

    #[test]
    fn tiers_are_exclusive() {
        let responsive: ResponsiveConfig = serde_json::from_value(json!({
            "mobile": {"props": {"columns": 1}},
            "tablet": {"props": {"columns": 2}},
            "desktop": {"props": {"columns": 4, "dense": true}},
            "wide": {"props": {"columns": 6}}
        }))
        .unwrap();

        let mobile = resolve_responsive(&responsive, &Viewport::from_size(400, 800));
        assert_eq!(mobile["props"], json!({"columns": 1}));

        let tablet = resolve_responsive(&responsive, &Viewport::from_size(800, 800));
        assert_eq!(tablet["props"], json!({"columns": 2}));

        let wide = resolve_responsive(&responsive, &Viewport::from_size(1920, 1080));
        assert_eq!(wide["props"], json!({"columns": 6, "dense": true}));
    }

    #[test]
    fn no_tier_flags_counts_as_desktop() {
        let responsive: ResponsiveConfig =
            serde_json::from_value(json!({"desktop": {"gap": "2rem"}})).unwrap();
        let viewport = Viewport {
            width: 1000,
            height: 600,
            is_mobile: false,
            is_tablet: false,
            is_desktop: false,
        };
        assert_eq!(resolve_responsive(&responsive, &viewport)["gap"], "2rem");
    }

    #[test]
    fn theme_references() {
        let theme = json!({"colors": {"primary": "#3b82f6"}, "spacing": {"md": "1rem"}});
        assert_eq!(
            resolve_theme("1px solid theme(colors.primary)", &theme),
            "1px solid #3b82f6"
        );
        assert_eq!(
            resolve_theme("theme(spacing.md) theme(spacing.xl)", &theme),
            "1rem theme(spacing.xl)"
        );
        assert_eq!(resolve_theme("no refs", &theme), "no refs");
    }

    #[test]
    fn theme_props_recurse() {
        let theme = json!({"colors": {"accent": "#f59e0b"}});
        let resolved = resolve_theme_props(
            &props(json!({"style": {"color": "theme(colors.accent)"}, "size": 3})),
            &theme,
        );
        assert_eq!(resolved["style"]["color"], "#f59e0b");
        assert_eq!(resolved["size"], 3);
    }

    #[test]
    fn shallow_merge_prefers_overlay() {
        let merged = merge_shallow(&props(json!({"a": 1, "b": 2})), &props(json!({"b": 3})));
        assert_eq!(Value::Object(merged), json!({"a": 1, "b": 3}));
    }
}
