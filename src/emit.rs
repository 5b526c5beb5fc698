//! Source Emitter: renders resolved [`TypeContent`] into declaration text.
//!
//! Pure and recursive; the only inputs are the resolved tree, the settings
//! and the indent level. Naming is guaranteed before emission runs, so a
//! missing name here is an internal-invariant violation, not a user error.

use serde_json::Value;

use crate::content::{Doc, JoinOp, Meta, TypeContent};
use crate::error::ConvertError;
use crate::settings::Settings;

// ————————————————————————————————————————————————————————————————————————————
// TYPE TEXT
// ————————————————————————————————————————————————————————————————————————————

/// Render a resolved node. With `export` set, the result is a full
/// top-level declaration (structural for object shapes, an alias for
/// everything else); otherwise it is a bare type expression.
pub fn render(
    settings: &Settings,
    content: &TypeContent,
    indent: usize,
    export: bool,
) -> Result<String, ConvertError> {
    match content {
        TypeContent::Leaf { meta, content, .. } => {
            let body = inline_default(settings, meta, content.clone(), export);
            wrap_alias(meta, body, export)
        }
        TypeContent::Composite {
            meta,
            join,
            children,
        } => match join {
            JoinOp::List => {
                if children.len() != 1 {
                    return Err(ConvertError::internal(
                        "a list composite renders exactly one item type",
                    ));
                }
                let item = render(settings, &children[0], indent, false)?;
                let item = if joins_as_union(settings, &children[0]) {
                    format!("({item})")
                } else {
                    item
                };
                let body = inline_default(settings, meta, format!("{item}[]"), export);
                wrap_alias(meta, body, export)
            }
            JoinOp::Union => {
                let mut parts = Vec::with_capacity(children.len());
                for child in children {
                    let mut part = render(settings, child, indent + 1, false)?;
                    // an object member list containing a union of its own
                    // needs parentheses to stay readable inside this union
                    if child.is_object() && part.contains('|') {
                        part = format!("({part})");
                    }
                    parts.push(part);
                }
                let body = if settings.union_new_line {
                    let sep = format!("\n{}| ", indent_str(settings, indent + 1));
                    parts.join(&sep)
                } else {
                    parts.join(" | ")
                };
                let body = inline_default(settings, meta, body, export);
                wrap_alias(meta, body, export)
            }
            JoinOp::Tuple => {
                let mut parts = Vec::with_capacity(children.len());
                for child in children {
                    let mut part = render(settings, child, indent + 1, false)?;
                    if !child.required() {
                        if joins_as_union(settings, child) {
                            part = format!("({part})");
                        }
                        part.push('?');
                    }
                    parts.push(part);
                }
                let body = if settings.tuple_new_line {
                    let inner = indent_str(settings, indent + 1);
                    format!(
                        "[\n{inner}{}\n{}]",
                        parts.join(&format!(",\n{inner}")),
                        indent_str(settings, indent)
                    )
                } else {
                    format!("[{}]", parts.join(", "))
                };
                let body = inline_default(settings, meta, body, export);
                wrap_alias(meta, body, export)
            }
            JoinOp::Object | JoinOp::ObjectWithUnknownKeys => {
                render_object(settings, meta, *join, children, indent, export)
            }
        },
    }
}

fn render_object(
    settings: &Settings,
    meta: &Meta,
    join: JoinOp,
    children: &[TypeContent],
    indent: usize,
    export: bool,
) -> Result<String, ConvertError> {
    if children.is_empty() {
        // the two empty shapes must never render identically
        return match (join, export) {
            (JoinOp::Object, false) => Ok(inline_default(settings, meta, "{}".to_string(), false)),
            (JoinOp::ObjectWithUnknownKeys, false) => {
                Ok(inline_default(settings, meta, "object".to_string(), false))
            }
            (JoinOp::Object, true) => {
                let name = exported_name(meta)?;
                Ok(format!("export interface {name} {{}}"))
            }
            (JoinOp::ObjectWithUnknownKeys, true) => {
                let name = exported_name(meta)?;
                Ok(format!("export type {name} = object;"))
            }
            _ => unreachable!(),
        };
    }

    let member_indent = indent_str(settings, indent + 1);
    let mut members = Vec::with_capacity(children.len());
    for child in children {
        let child_meta = child.meta();
        let name = child_meta.name.as_ref().ok_or_else(|| {
            ConvertError::internal("object member resolved without a property name")
        })?;
        let doc = doc_block(settings, name, &child_meta.doc, indent + 1);
        let rendered = render(settings, child, indent + 1, false)?;
        let readonly = if child_meta.readonly { "readonly " } else { "" };
        let optional = if child.required() { "" } else { "?" };
        members.push(format!(
            "{doc}{member_indent}{readonly}{name}{optional}: {rendered};"
        ));
    }

    let body = format!(
        "{{\n{}\n{}}}",
        members.join("\n"),
        indent_str(settings, indent)
    );
    if export {
        let name = exported_name(meta)?;
        Ok(format!("export interface {name} {body}"))
    } else {
        Ok(inline_default(settings, meta, body, false))
    }
}

fn wrap_alias(meta: &Meta, body: String, export: bool) -> Result<String, ConvertError> {
    if export {
        let name = exported_name(meta)?;
        Ok(format!("export type {name} = {body};"))
    } else {
        Ok(body)
    }
}

fn exported_name(meta: &Meta) -> Result<&String, ConvertError> {
    meta.name
        .as_ref()
        .ok_or_else(|| ConvertError::internal("export requested with no resolved name"))
}

/// Whether the child renders as a top-level union and so needs parentheses
/// inside a tighter-binding position. Structural, not textual; a literal
/// leaf whose text happens to contain a pipe is not a union. An inlined
/// default also unions itself in front of any child.
fn joins_as_union(settings: &Settings, child: &TypeContent) -> bool {
    child.is_union() || (settings.supply_defaults_in_type && child.meta().default.is_some())
}

/// Union the JSON-rendered default value in front of the member type.
/// Never applies at export position; an interface has no slot for it.
fn inline_default(settings: &Settings, meta: &Meta, body: String, export: bool) -> String {
    if export || !settings.supply_defaults_in_type {
        return body;
    }
    let Some(value) = &meta.default else {
        return body;
    };
    match serde_json::to_string(value) {
        Ok(rendered) => format!("{rendered} | {body}"),
        Err(_) => body,
    }
}

fn indent_str(settings: &Settings, level: usize) -> String {
    settings.indentation.repeat(level)
}

// ————————————————————————————————————————————————————————————————————————————
// DOCUMENTATION BLOCKS
// ————————————————————————————————————————————————————————————————————————————

/// Render a documentation comment, terminated by a newline, or nothing.
/// `fallback_name` stands in for a missing description when everything is
/// being commented.
pub fn doc_block(settings: &Settings, fallback_name: &str, doc: &Doc, indent: usize) -> String {
    if doc.disable {
        return String::new();
    }
    if !settings.comment_everything && doc.is_empty() {
        return String::new();
    }

    let mut lines: Vec<String> = vec!["/**".to_string()];
    match &doc.description {
        Some(description) => {
            for line in deindent(description) {
                lines.push(format!(" * {line}"));
            }
        }
        None => {
            if settings.comment_everything {
                lines.push(format!(" * {fallback_name}"));
            }
        }
    }
    for example in &doc.examples {
        push_example(&mut lines, example);
    }
    lines.push(" */".to_string());

    let prefix = indent_str(settings, indent);
    let mut block = lines
        .iter()
        .map(|line| format!("{prefix}{line}"))
        .collect::<Vec<_>>()
        .join("\n");
    block.push('\n');
    block
}

fn push_example(lines: &mut Vec<String>, example: &Value) {
    let text = match example {
        Value::String(s) => s.clone(),
        other => serde_json::to_string(other).unwrap_or_default(),
    };
    let rendered = deindent(&text);
    match rendered.as_slice() {
        [single] => lines.push(format!(" * @example {single}")),
        many => {
            lines.push(" * @example".to_string());
            for line in many {
                lines.push(format!(" * {line}"));
            }
        }
    }
}

/// De-indent multi-line text relative to its first non-blank line.
fn deindent(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    let margin = lines
        .iter()
        .find(|line| !line.trim().is_empty())
        .map(|line| line.chars().take_while(|c| c.is_whitespace()).count())
        .unwrap_or(0);
    lines
        .iter()
        .map(|line| {
            let lead = line.chars().take_while(|c| c.is_whitespace()).count();
            line.chars().skip(lead.min(margin)).collect()
        })
        .collect()
}
