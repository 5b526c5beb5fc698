//! Type Resolver: turns a description node into [`TypeContent`].
//!
//! Dispatch is by node kind (after cast overrides), one parser per shape,
//! each recursing through [`resolve`]. A node that resolves a declared name
//! is replaced by a reference leaf instead of being expanded; the
//! `names_to_ignore` list threaded down the call stack keeps a node from
//! referencing the very name it is currently being declared under. That
//! substitution is also the only recursion guard: a self-referential schema
//! without a resolvable name is an unsupported input and will recurse
//! without bound.

use colored::Colorize;
use serde_json::Value;

use crate::content::{JoinOp, TypeContent};
use crate::describe::{Describe, Kind, Presence};
use crate::facts;
use crate::settings::Settings;

// ————————————————————————————————————————————————————————————————————————————
// RESOLVER
// ————————————————————————————————————————————————————————————————————————————

/// Resolve a description node. `None` only for an alternatives node with
/// zero usable branches (and for containers of such a node), which the
/// object-property loop drops.
pub fn resolve(
    details: &Describe,
    settings: &Settings,
    allow_name_ref: bool,
    names_to_ignore: &[String],
) -> Option<TypeContent> {
    let meta = facts::normalize(details, settings);

    // a forbidden member has no value type at all
    if details.presence() == Some(Presence::Forbidden) {
        return Some(TypeContent::leaf("undefined").with_meta(meta));
    }

    // reference an already-declared shape by name instead of expanding it
    if let Some(name) = &meta.name {
        if allow_name_ref && !names_to_ignore.iter().any(|n| n == name) {
            let reference = attach_allow_extras(TypeContent::reference(name), details);
            return Some(reference.with_meta(meta));
        }
    }

    let kind = effective_kind(details);
    let parsed = match kind {
        Kind::Object => parse_object(details, settings)?,
        Kind::Array => parse_array(details, settings)?,
        Kind::Alternatives => parse_alternatives(details, settings, meta.name.as_deref())?,
        Kind::String => parse_scalar(details, "string"),
        Kind::Number => parse_scalar(details, "number"),
        Kind::Boolean => parse_scalar(details, "boolean"),
        Kind::Date => parse_scalar(details, "Date"),
        Kind::Any => parse_scalar(details, "any"),
        Kind::Function | Kind::Symbol | Kind::Binary | Kind::Link | Kind::Other => {
            parse_unsupported(details, settings)
        }
    };

    let parsed = match kind {
        // composite shapes union in their own literal allow-values
        // (e.g. a named tuple with `allow(null)` becomes `[...] | null`)
        Kind::Object | Kind::Array | Kind::Alternatives => attach_allow_extras(parsed, details),
        _ => parsed,
    };
    Some(parsed.with_meta(meta))
}

/// A declared cast annotation swaps the kind used for dispatch. Only the
/// producing library's own cast pairs are honored.
fn effective_kind(details: &Describe) -> Kind {
    let kind = details.kind();
    match (kind, details.flags.cast.as_deref()) {
        (Kind::Boolean, Some("number")) | (Kind::Date, Some("number")) => Kind::Number,
        (Kind::Number, Some("string")) => Kind::String,
        _ => kind,
    }
}

// ————————————————————————————————————————————————————————————————————————————
// KIND-SPECIFIC PARSERS
// ————————————————————————————————————————————————————————————————————————————

fn parse_object(details: &Describe, settings: &Settings) -> Option<TypeContent> {
    // no key map at all (open object) and an explicitly empty key map
    // (exact empty object) are distinct shapes
    let join = if details.keys.is_some() {
        JoinOp::Object
    } else {
        JoinOp::ObjectWithUnknownKeys
    };

    let mut children: Vec<TypeContent> = Vec::new();
    if let Some(keys) = &details.keys {
        for (key, child_details) in keys {
            // a child may legitimately resolve to nothing (empty alternatives)
            let Some(mut child) = resolve(child_details, settings, true, &[]) else {
                continue;
            };
            child.meta_mut().name = Some(property_name(key));
            children.push(child);
        }
    }

    // exactly one dynamic-key pattern maps onto an index signature; the
    // static type system has no position for several distinct patterns
    let mut pattern_added = false;
    if details.patterns.len() == 1 {
        if let Some(rule) = &details.patterns[0].rule {
            if let Some(mut child) = resolve(rule, settings, true, &[]) {
                let meta = child.meta_mut();
                meta.name = Some("[pattern: string]".to_string());
                meta.required = Some(true);
                children.push(child);
                pattern_added = true;
            }
        }
    }

    // a pattern rule already occupies the one string index position, so an
    // unknown-keys signature would collide with it
    if details.flags.unknown == Some(true) && !pattern_added {
        let mut child = match details.meta_str("unknownType") {
            Some(type_name) => TypeContent::reference(type_name),
            None => TypeContent::leaf("any"),
        };
        let meta = child.meta_mut();
        meta.name = Some("[x: string]".to_string());
        meta.required = Some(true);
        meta.doc.description = Some("Unknown Property".to_string());
        children.push(child);
    }

    if settings.sort_properties_by_name {
        children.sort_by(|a, b| a.meta().name.cmp(&b.meta().name));
    }

    Some(TypeContent::composite(join, children))
}

fn parse_array(details: &Describe, settings: &Settings) -> Option<TypeContent> {
    if !details.ordered.is_empty() {
        // positional items; each keeps its own required flag
        let children: Vec<TypeContent> = details
            .ordered
            .iter()
            .filter_map(|item| resolve(item, settings, true, &[]))
            .collect();
        return Some(TypeContent::composite(JoinOp::Tuple, children));
    }

    let any_item = Describe {
        type_name: "any".to_string(),
        ..Describe::default()
    };
    // only the first item schema is honored; a documented limitation
    let item = details.items.first().unwrap_or(&any_item);
    let child = resolve(item, settings, true, &[])?;

    let child = if details.flags.sparse == Some(true) {
        // holes surface as undefined entries: (X | undefined)[]
        TypeContent::composite(JoinOp::Union, vec![child, TypeContent::leaf("undefined")])
    } else {
        child
    };
    Some(TypeContent::composite(JoinOp::List, vec![child]))
}

fn parse_alternatives(
    details: &Describe,
    settings: &Settings,
    own_name: Option<&str>,
) -> Option<TypeContent> {
    // branches inherit the parent's name; ignore it so they expand instead
    // of referencing the declaration currently being built
    let ignore: Vec<String> = own_name.map(|n| vec![n.to_string()]).unwrap_or_default();

    let children: Vec<TypeContent> = details
        .matches
        .iter()
        .filter_map(|branch| match &branch.schema {
            // conditional branches carry no schema; degrade that branch to any
            None => Some(TypeContent::leaf("any")),
            Some(schema) => resolve(schema, settings, true, &ignore),
        })
        .collect();

    if children.is_empty() {
        // the one legitimate undefined-propagation path
        return None;
    }
    Some(TypeContent::composite(JoinOp::Union, children))
}

/// Scalar kinds, with the allow-list folded into a literal union.
fn parse_scalar(details: &Describe, base: &str) -> TypeContent {
    let values = literal_allow_values(&details.allow);
    if values.is_empty() {
        return TypeContent::leaf(base);
    }
    // allowing only the empty string changes nothing about the type
    if values.len() == 1 && is_empty_string(values[0]) {
        return TypeContent::leaf(base);
    }

    let mut children: Vec<TypeContent> = values.iter().map(|v| literal_leaf(v)).collect();
    let all_markers = values.iter().all(|v| v.is_null() || is_empty_string(v));
    if all_markers {
        // `string | null | ''` reads better than the literals leading
        children.insert(0, TypeContent::leaf(base));
    } else if details.flags.only != Some(true) {
        // out-of-enum values stay type-legal unless the list is exhaustive
        children.push(TypeContent::leaf(base));
    }
    TypeContent::composite(JoinOp::Union, children)
}

fn parse_unsupported(details: &Describe, settings: &Settings) -> TypeContent {
    if let Some(base) = details.meta_str("baseType") {
        return TypeContent::leaf(base);
    }
    match details.kind() {
        Kind::Function => TypeContent::leaf("((...args: any[]) => any)"),
        Kind::Symbol => TypeContent::leaf("symbol"),
        Kind::Binary => TypeContent::leaf("Buffer"),
        _ => {
            if settings.debug {
                eprintln!(
                    "{}",
                    format!("unsupported type: {}", details.type_name).yellow()
                );
            }
            TypeContent::leaf("unknown")
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// ENUMERATION / ALLOW-VALUE BUILDER
// ————————————————————————————————————————————————————————————————————————————

/// Literal alternatives for a node's allow-list, non-literal sentinel
/// entries already dropped.
pub fn build_allow_values(allow: &[Value]) -> Vec<TypeContent> {
    literal_allow_values(allow)
        .into_iter()
        .map(literal_leaf)
        .collect()
}

/// Union a node's own literal allow-values behind its main content.
fn attach_allow_extras(main: TypeContent, details: &Describe) -> TypeContent {
    let extras = build_allow_values(&details.allow);
    if extras.is_empty() {
        return main;
    }
    let mut children = vec![main];
    children.extend(extras);
    TypeContent::composite(JoinOp::Union, children)
}

/// Keep only values a user can express as a literal type: null, strings,
/// numbers and booleans. Override markers and reference objects cannot be
/// spelled as literals and are silently dropped.
fn literal_allow_values(allow: &[Value]) -> Vec<&Value> {
    allow
        .iter()
        .filter(|v| {
            matches!(
                v,
                Value::Null | Value::String(_) | Value::Number(_) | Value::Bool(_)
            )
        })
        .collect()
}

fn literal_leaf(value: &Value) -> TypeContent {
    let content = match value {
        Value::Null => "null".to_string(),
        Value::String(s) if s.is_empty() => "''".to_string(),
        Value::String(s) => format!("'{}'", escape_string_literal(s)),
        other => other.to_string(),
    };
    TypeContent::leaf(content)
}

fn escape_string_literal(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('\'', "\\'")
}

fn is_empty_string(value: &Value) -> bool {
    matches!(value, Value::String(s) if s.is_empty())
}

fn property_name(key: &str) -> String {
    if is_identifier(key) {
        key.to_string()
    } else {
        format!("'{}'", escape_string_literal(key))
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '$' || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '$' || c == '_')
}
