//! Top-level schema conversion: one description tree in, one named
//! declaration out.

use crate::content::collect_custom_types;
use crate::describe::Describe;
use crate::emit;
use crate::error::ConvertError;
use crate::facts;
use crate::settings::Settings;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// A fully converted schema, ready to be placed into an output file.
#[derive(Debug, Clone)]
pub struct ConvertedType {
    /// The exported declaration name.
    pub name: String,
    /// Complete declaration text, documentation block included.
    pub content: String,
    /// Names of other declarations this one references, deduplicated in
    /// first-seen order. Drives import resolution.
    pub custom_types: Vec<String>,
}

// ————————————————————————————————————————————————————————————————————————————
// CONVERSION
// ————————————————————————————————————————————————————————————————————————————

/// Convert one description tree into a named declaration.
///
/// The name comes from the node itself when it declares one, otherwise from
/// `exported_as` (the identifier the schema was found under) with the
/// interface-suffix rule applied. A schema that resolves neither is an
/// error; a schema whose body resolves to nothing at all (an alternatives
/// node with no usable branch) yields `Ok(None)`.
pub fn convert_schema(
    settings: &Settings,
    details: &Describe,
    exported_as: Option<&str>,
) -> Result<Option<ConvertedType>, ConvertError> {
    let name = facts::declared_name(details, settings)
        .or_else(|| exported_as.map(|id| facts::fallback_name(id, settings)))
        .ok_or_else(|| ConvertError::missing_name(details))?;

    let Some(mut resolved) = crate::resolve::resolve(details, settings, false, &[]) else {
        return Ok(None);
    };
    resolved.meta_mut().name = Some(name.clone());

    let doc = emit::doc_block(settings, &name, &resolved.meta().doc, 0);
    let body = emit::render(settings, &resolved, 0, true)?;

    let mut custom_types = collect_custom_types(&resolved);
    custom_types.retain(|t| t != &name);
    dedup_preserving_order(&mut custom_types);

    Ok(Some(ConvertedType {
        name,
        content: format!("{doc}{body}"),
        custom_types,
    }))
}

fn dedup_preserving_order(names: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    names.retain(|n| seen.insert(n.clone()));
}
