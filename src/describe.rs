//! Serde model of the schema-description tree.
//!
//! The producing library serializes every schema into a loosely-typed JSON
//! tree: a `type` tag, a bag of flags, a list of metadata entries, and
//! kind-specific payloads (object keys, array items, alternative branches,
//! allow-lists). One struct covers every shape; [`Describe::kind`] gives the
//! closed tag the resolver dispatches on.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// One node of a serialized schema description.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Describe {
    /// Kind tag, e.g. `"object"`, `"string"`, `"alternatives"`.
    #[serde(rename = "type")]
    pub type_name: String,

    pub flags: Flags,

    /// Metadata entries. Later entries win when a field repeats (schema
    /// concatenation produces duplicates).
    pub metas: Vec<serde_json::Map<String, Value>>,

    /// Literal allow-list. May contain sentinel objects (override markers,
    /// references) a user cannot express as a literal type.
    pub allow: Vec<Value>,

    /// Example values attached to the schema.
    pub examples: Vec<Value>,

    /// Object: declared properties in source order. `None` (no key map at
    /// all) and `Some` of an empty map are distinct shapes.
    pub keys: Option<IndexMap<String, Describe>>,

    /// Object: dynamic-key pattern entries.
    pub patterns: Vec<PatternEntry>,

    /// Array: item schema(s). Only the first is honored.
    pub items: Vec<Describe>,

    /// Array: positional item schemas (tuple mode).
    pub ordered: Vec<Describe>,

    /// Alternatives: branch list.
    pub matches: Vec<AlternativeBranch>,
}

/// Common per-node flags.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Flags {
    pub label: Option<String>,
    pub description: Option<String>,
    pub presence: Option<Presence>,
    pub default: Option<Value>,
    /// Object: unknown keys allowed.
    pub unknown: Option<bool>,
    /// Scalar: the allow-list is exhaustive (strict enum).
    pub only: Option<bool>,
    /// Array: holes permitted.
    pub sparse: Option<bool>,
    /// Cast-to override, e.g. `"number"` on a boolean schema.
    pub cast: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    Optional,
    Required,
    Forbidden,
}

/// A dynamic-key pattern on an object: `rule` is the value schema. The key
/// matcher (`schema` or `regex`) is not representable in a static member
/// name, so only the value side is consumed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PatternEntry {
    pub schema: Option<Value>,
    pub regex: Option<String>,
    pub rule: Option<Describe>,
}

/// One branch of an alternatives node. `schema` is absent for conditional
/// branches (`is`/`then`/`otherwise`), which this system does not model.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AlternativeBranch {
    pub schema: Option<Describe>,
    #[serde(rename = "ref")]
    pub reference: Option<Value>,
}

/// Closed kind tag for resolver dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Object,
    Array,
    Alternatives,
    String,
    Number,
    Boolean,
    Date,
    Any,
    // Known but unsupported kinds, mapped to placeholders.
    Function,
    Symbol,
    Binary,
    Link,
    /// Anything else (custom extensions).
    Other,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Describe {
    pub fn kind(&self) -> Kind {
        match self.type_name.as_str() {
            "object" => Kind::Object,
            "array" => Kind::Array,
            // alt and alternatives both describe as "alternatives"
            "alternatives" => Kind::Alternatives,
            "string" => Kind::String,
            "number" => Kind::Number,
            // bool and boolean both describe as "boolean"
            "boolean" => Kind::Boolean,
            "date" => Kind::Date,
            "any" => Kind::Any,
            "function" => Kind::Function,
            "symbol" => Kind::Symbol,
            "binary" => Kind::Binary,
            "link" => Kind::Link,
            _ => Kind::Other,
        }
    }

    /// Last metadata value stored under `field`, if any. Later entries win:
    /// schema concatenation appends metadata, and the newest is current.
    pub fn meta(&self, field: &str) -> Option<&Value> {
        self.metas.iter().rev().find_map(|entry| entry.get(field))
    }

    /// Last metadata value under `field` as a string.
    pub fn meta_str(&self, field: &str) -> Option<&str> {
        self.meta(field).and_then(Value::as_str)
    }

    /// Last metadata value under `field` as a truthy boolean.
    pub fn meta_bool(&self, field: &str) -> Option<bool> {
        self.meta(field).map(truthy)
    }

    pub fn presence(&self) -> Option<Presence> {
        self.flags.presence
    }
}

/// Javascript-style truthiness for metadata values.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
