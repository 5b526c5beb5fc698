//! Description Normalizer: extracts the per-node facts every parser needs
//! (name, documentation, required, default, readonly) independent of kind.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::content::{Doc, Meta};
use crate::describe::{Describe, Presence};
use crate::settings::Settings;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s").unwrap());

/// Resolve the declared type name per the configured naming strategy:
/// `flags.label` when labels name declarations, otherwise the last
/// `className` metadata entry. Whitespace is stripped so the result is a
/// legal identifier fragment.
pub fn declared_name(details: &Describe, settings: &Settings) -> Option<String> {
    let raw = if settings.use_label_as_name {
        details.flags.label.as_deref()
    } else {
        details.meta_str("className")
    }?;
    let name = WHITESPACE.replace_all(raw, "").into_owned();
    if name.is_empty() { None } else { Some(name) }
}

/// Derive a declaration name from the exported identifier the schema was
/// found under, applying the interface-suffix replacement when configured.
pub fn fallback_name(exported: &str, settings: &Settings) -> String {
    if let Some(suffix) = &settings.default_interface_suffix {
        if exported.to_lowercase().ends_with("schema") {
            let stem = &exported[..exported.len() - "schema".len()];
            return format!("{stem}{suffix}");
        }
    }
    exported.to_string()
}

/// Required resolution precedence: explicit required beats explicit
/// optional beats the defaulted-counts-as-required option beats the global
/// default policy.
pub fn resolve_required(details: &Describe, settings: &Settings) -> bool {
    match details.presence() {
        Some(Presence::Required) => true,
        Some(Presence::Optional) => false,
        // forbidden carries no presence opinion of its own; the member
        // renders as `undefined` and follows the default policy
        Some(Presence::Forbidden) | None => {
            if settings.treat_defaulted_optional_as_required && default_value(details).is_some() {
                true
            } else {
                settings.default_to_required
            }
        }
    }
}

/// The node's default value, with the producing library's "deep default"
/// sentinel (`{"special": ...}`) treated as no default at all.
pub fn default_value(details: &Describe) -> Option<&Value> {
    let value = details.flags.default.as_ref()?;
    if let Value::Object(map) = value {
        if map.contains_key("special") {
            return None;
        }
    }
    Some(value)
}

pub fn is_readonly(details: &Describe) -> bool {
    details.meta_bool("readonly").unwrap_or(false)
}

pub fn doc(details: &Describe) -> Doc {
    Doc {
        description: details.flags.description.clone(),
        examples: details.examples.clone(),
        disable: details.meta_bool("ignoreDescription").unwrap_or(false),
    }
}

/// All common facts in one pass, ready to attach to a resolved node.
pub fn normalize(details: &Describe, settings: &Settings) -> Meta {
    Meta {
        name: declared_name(details, settings),
        doc: doc(details),
        required: Some(resolve_required(details, settings)),
        default: default_value(details).cloned(),
        readonly: is_readonly(details),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn describe(v: Value) -> Describe {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn class_name_metadata_names_the_declaration() {
        let d = describe(json!({
            "type": "object",
            "flags": { "label": "Labelled" },
            "metas": [{ "className": "FromMeta" }]
        }));
        let settings = Settings::default();
        assert_eq!(declared_name(&d, &settings), Some("FromMeta".into()));

        let by_label = Settings {
            use_label_as_name: true,
            ..Settings::default()
        };
        assert_eq!(declared_name(&d, &by_label), Some("Labelled".into()));
    }

    #[test]
    fn names_drop_whitespace() {
        let d = describe(json!({
            "type": "object",
            "metas": [{ "className": "Spaced Out Name" }]
        }));
        assert_eq!(
            declared_name(&d, &Settings::default()),
            Some("SpacedOutName".into())
        );
    }

    #[test]
    fn fallback_suffix_replacement() {
        let settings = Settings {
            default_interface_suffix: Some("Interface".into()),
            ..Settings::default()
        };
        assert_eq!(fallback_name("TestSchema", &settings), "TestInterface");
        assert_eq!(fallback_name("Plain", &settings), "Plain");
        assert_eq!(fallback_name("TestSchema", &Settings::default()), "TestSchema");
    }

    #[test]
    fn required_precedence() {
        let settings = Settings {
            treat_defaulted_optional_as_required: true,
            ..Settings::default()
        };

        let explicit_required = describe(json!({
            "type": "string",
            "flags": { "presence": "required" }
        }));
        assert!(resolve_required(&explicit_required, &settings));

        // explicit optional wins over the defaulted rule
        let defaulted_optional = describe(json!({
            "type": "string",
            "flags": { "presence": "optional", "default": "x" }
        }));
        assert!(!resolve_required(&defaulted_optional, &settings));

        let defaulted = describe(json!({
            "type": "string",
            "flags": { "default": "x" }
        }));
        assert!(resolve_required(&defaulted, &settings));
        assert!(!resolve_required(&defaulted, &Settings::default()));

        let bare = describe(json!({ "type": "string" }));
        let required_by_policy = Settings {
            default_to_required: true,
            ..Settings::default()
        };
        assert!(resolve_required(&bare, &required_by_policy));
        assert!(!resolve_required(&bare, &Settings::default()));
    }

    #[test]
    fn deep_default_sentinel_is_no_default() {
        let d = describe(json!({
            "type": "object",
            "flags": { "default": { "special": "deep" } }
        }));
        assert!(default_value(&d).is_none());

        let real = describe(json!({
            "type": "object",
            "flags": { "default": { "val": "Test" } }
        }));
        assert_eq!(default_value(&real), Some(&json!({ "val": "Test" })));
    }
}
