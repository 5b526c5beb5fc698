//! Strongly-typed intermediate representation for emission. No raw
//! description nodes past this point.

use serde_json::Value;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Metadata shared by every resolved node.
#[derive(Debug, Clone, Default)]
pub struct Meta {
    /// Declared type name, or the property key once the node is placed
    /// inside an object composite.
    pub name: Option<String>,
    pub doc: Doc,
    /// Resolved required flag. `None` until the normalizer decides.
    pub required: Option<bool>,
    /// Default value, sentinel markers already filtered out.
    pub default: Option<Value>,
    pub readonly: bool,
}

/// Documentation attached to a node.
#[derive(Debug, Clone, Default)]
pub struct Doc {
    pub description: Option<String>,
    pub examples: Vec<Value>,
    /// Suppress the doc block entirely.
    pub disable: bool,
}

impl Doc {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.examples.is_empty()
    }
}

/// How a composite joins its children in rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOp {
    /// `T[]`; exactly one child.
    List,
    /// `[A, B?]`; positional children, individually optional.
    Tuple,
    /// `A | B`.
    Union,
    /// Brace-delimited member list; every child carries a property name.
    /// Zero children render the exact-empty-object token.
    Object,
    /// Object declared without any key map; zero children render the
    /// generic-object token.
    ObjectWithUnknownKeys,
}

/// A resolved type: either a literal rendered fragment or a join of children.
#[derive(Debug, Clone)]
pub enum TypeContent {
    Leaf {
        meta: Meta,
        /// The rendered fragment, e.g. `string`, `'red'`, `SomeTypeName`.
        content: String,
        /// Names of other top-level declarations this fragment references.
        custom_types: Vec<String>,
    },
    Composite {
        meta: Meta,
        join: JoinOp,
        children: Vec<TypeContent>,
    },
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl TypeContent {
    pub fn leaf(content: impl Into<String>) -> Self {
        TypeContent::Leaf {
            meta: Meta::default(),
            content: content.into(),
            custom_types: Vec::new(),
        }
    }

    pub fn reference(name: impl Into<String>) -> Self {
        let name = name.into();
        TypeContent::Leaf {
            meta: Meta::default(),
            content: name.clone(),
            custom_types: vec![name],
        }
    }

    pub fn composite(join: JoinOp, children: Vec<TypeContent>) -> Self {
        TypeContent::Composite {
            meta: Meta::default(),
            join,
            children,
        }
    }

    pub fn meta(&self) -> &Meta {
        match self {
            TypeContent::Leaf { meta, .. } => meta,
            TypeContent::Composite { meta, .. } => meta,
        }
    }

    pub fn meta_mut(&mut self) -> &mut Meta {
        match self {
            TypeContent::Leaf { meta, .. } => meta,
            TypeContent::Composite { meta, .. } => meta,
        }
    }

    pub fn with_meta(mut self, meta: Meta) -> Self {
        *self.meta_mut() = meta;
        self
    }

    pub fn is_union(&self) -> bool {
        matches!(
            self,
            TypeContent::Composite {
                join: JoinOp::Union,
                ..
            }
        )
    }

    pub fn is_object(&self) -> bool {
        matches!(
            self,
            TypeContent::Composite {
                join: JoinOp::Object | JoinOp::ObjectWithUnknownKeys,
                ..
            }
        )
    }

    /// Whether the resolved node is required in member position. Unresolved
    /// counts as optional.
    pub fn required(&self) -> bool {
        self.meta().required.unwrap_or(false)
    }
}

/// Collect every external declaration name the resolved tree references,
/// depth-first, duplicates preserved. Composites hold no list of their own.
pub fn collect_custom_types(content: &TypeContent) -> Vec<String> {
    match content {
        TypeContent::Leaf { custom_types, .. } => custom_types.clone(),
        TypeContent::Composite { children, .. } => {
            children.iter().flat_map(collect_custom_types).collect()
        }
    }
}
