//! Project walker and writer: whole-directory conversion.
//!
//! Discovers schema-description JSON files under a source directory,
//! converts every schema in every file (in parallel, conversions are
//! independent), resolves cross-file imports from each declaration's
//! referenced-name list, and writes one declaration file per schema module
//! plus `index.ts` re-export files per the configured layout.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use colored::Colorize;
use indexmap::IndexMap;
use rayon::prelude::*;
use regex::Regex;
use serde_json::Value;

use crate::convert::{ConvertedType, convert_schema};
use crate::describe::Describe;
use crate::settings::Settings;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// One file written by a directory conversion.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    /// Path relative to the output root, extension included.
    pub path: PathBuf,
    pub content: String,
}

/// A converted schema file, before import resolution.
struct AnalyzedFile {
    /// Output module path relative to the output root, no extension.
    module: PathBuf,
    /// Declarations, sorted by name.
    types: Vec<ConvertedType>,
}

// ————————————————————————————————————————————————————————————————————————————
// ENTRY POINTS
// ————————————————————————————————————————————————————————————————————————————

/// Convert every schema file under `schema_dir` and write the results under
/// `output_dir`. Returns everything written, in write order.
pub fn convert_from_directory(
    settings: &Settings,
    schema_dir: &Path,
    output_dir: &Path,
) -> Result<Vec<GeneratedFile>> {
    if !schema_dir.is_dir() {
        bail!("schema directory {} does not exist", schema_dir.display());
    }

    let filter = Regex::new(&settings.input_file_filter)
        .with_context(|| format!("invalid input file filter {:?}", settings.input_file_filter))?;

    let mut sources = Vec::new();
    discover(settings, &filter, schema_dir, Path::new(""), &mut sources)?;

    let analyzed: Vec<Option<AnalyzedFile>> = sources
        .par_iter()
        .map(|relative| analyze_schema_file(settings, schema_dir, relative))
        .collect::<Result<_>>()?;
    let analyzed: Vec<AnalyzedFile> = analyzed.into_iter().flatten().collect();

    if analyzed.is_empty() {
        bail!(
            "there are no schemas in {} so no types can be generated",
            schema_dir.display()
        );
    }

    let files = assemble(settings, &analyzed);
    for file in &files {
        let path = output_dir.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output directory {}", parent.display()))?;
        }
        fs::write(&path, &file.content)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(files)
}

/// Convert one schema file's source text. Declarations come back sorted by
/// name; an empty result means the file holds no schema entries.
pub fn convert_source(settings: &Settings, source: &str) -> Result<Vec<ConvertedType>> {
    let entries: IndexMap<String, Value> = decode_with_path(source)?;

    let mut types = Vec::new();
    for (exported_name, value) in entries {
        if !is_schema_entry(&value) {
            continue;
        }
        let details: Describe = serde_path_to_error::deserialize(value)
            .map_err(|err| {
                let path = err.path().to_string();
                anyhow::anyhow!("at JSON path {path}: {}", err.into_inner())
            })
            .with_context(|| format!("schema entry {exported_name:?}"))?;
        let converted = convert_schema(settings, &details, Some(&exported_name))
            .with_context(|| format!("converting schema {exported_name:?}"))?;
        if let Some(converted) = converted {
            types.push(converted);
        }
    }
    types.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(types)
}

// ————————————————————————————————————————————————————————————————————————————
// DISCOVERY
// ————————————————————————————————————————————————————————————————————————————

/// Collect schema files depth-first, entries sorted by name so the run is
/// deterministic regardless of filesystem order.
fn discover(
    settings: &Settings,
    filter: &Regex,
    dir: &Path,
    relative: &Path,
    out: &mut Vec<PathBuf>,
) -> Result<()> {
    let mut entries: Vec<_> = fs::read_dir(dir)
        .with_context(|| format!("reading schema directory {}", dir.display()))?
        .collect::<std::io::Result<_>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        let path = entry.path();
        if path.is_dir() {
            if settings.root_directory_only {
                continue;
            }
            if settings.ignore_files.iter().any(|f| *f == format!("{name}/")) {
                if settings.debug {
                    eprintln!("{}", format!("skipping ignored directory {name}/").dimmed());
                }
                continue;
            }
            discover(settings, filter, &path, &relative.join(&name), out)?;
        } else {
            if settings.ignore_files.iter().any(|f| *f == name) {
                if settings.debug {
                    eprintln!("{}", format!("skipping ignored file {name}").dimmed());
                }
                continue;
            }
            if filter.is_match(&name) {
                out.push(relative.join(&name));
            }
        }
    }
    Ok(())
}

// ————————————————————————————————————————————————————————————————————————————
// ANALYSIS
// ————————————————————————————————————————————————————————————————————————————

fn analyze_schema_file(
    settings: &Settings,
    schema_dir: &Path,
    relative: &Path,
) -> Result<Option<AnalyzedFile>> {
    let path = schema_dir.join(relative);
    let source =
        fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    let types =
        convert_source(settings, &source).with_context(|| format!("in {}", path.display()))?;

    if types.is_empty() {
        if settings.debug {
            eprintln!(
                "{}",
                format!("{} - skipped - no schemas found", relative.display()).yellow()
            );
        }
        return Ok(None);
    }
    if settings.debug {
        eprintln!("{}", format!("{} - processing", relative.display()).dimmed());
    }

    let stem = output_stem(settings, relative);
    let module = if settings.flatten_tree {
        PathBuf::from(stem)
    } else {
        match relative.parent() {
            Some(parent) if parent != Path::new("") => parent.join(stem),
            _ => PathBuf::from(stem),
        }
    };
    Ok(Some(AnalyzedFile { module, types }))
}

/// Output file stem for a schema file: extension dropped, the schema-file
/// suffix stripped from the end, the interface-file suffix appended
/// (`AddressSchema.json` -> `Address`).
fn output_stem(settings: &Settings, relative: &Path) -> String {
    let stem = relative
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base = if !settings.schema_file_suffix.is_empty() && stem.ends_with(&settings.schema_file_suffix)
    {
        stem[..stem.len() - settings.schema_file_suffix.len()].to_string()
    } else {
        stem
    };
    format!("{base}{}", settings.interface_file_suffix)
}

fn is_schema_entry(value: &Value) -> bool {
    value
        .as_object()
        .and_then(|map| map.get("type"))
        .is_some_and(Value::is_string)
}

/// Deserialize with JSON-path context in error messages.
fn decode_with_path<T: serde::de::DeserializeOwned>(src: &str) -> Result<T> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize(de).map_err(|err| {
        let path = err.path().to_string();
        anyhow::anyhow!("at JSON path {path}: {}", err.into_inner())
    })
}

// ————————————————————————————————————————————————————————————————————————————
// ASSEMBLY
// ————————————————————————————————————————————————————————————————————————————

fn assemble(settings: &Settings, analyzed: &[AnalyzedFile]) -> Vec<GeneratedFile> {
    // every module defining each declaration name, for import lookup
    let mut locations: HashMap<&str, Vec<&Path>> = HashMap::new();
    for file in analyzed {
        for converted in &file.types {
            locations
                .entry(converted.name.as_str())
                .or_default()
                .push(file.module.as_path());
        }
    }

    let mut out = Vec::new();
    for file in analyzed {
        let imports = resolve_imports(settings, file, &locations);
        let bodies: Vec<&str> = file.types.iter().map(|t| t.content.as_str()).collect();
        let content = format!(
            "{}\n\n{imports}{}\n",
            settings.file_header,
            bodies.join("\n\n")
        );
        out.push(GeneratedFile {
            path: file.module.with_extension("ts"),
            content,
        });
    }
    out.extend(index_files(settings, analyzed));
    out
}

/// Import lines for one output file, newline-terminated as a block, or
/// empty.
fn resolve_imports(
    settings: &Settings,
    file: &AnalyzedFile,
    locations: &HashMap<&str, Vec<&Path>>,
) -> String {
    let internal: Vec<&str> = file.types.iter().map(|t| t.name.as_str()).collect();
    let mut external: Vec<&str> = Vec::new();
    for converted in &file.types {
        for custom in &converted.custom_types {
            if !internal.contains(&custom.as_str()) && !external.contains(&custom.as_str()) {
                external.push(custom);
            }
        }
    }
    if external.is_empty() {
        return String::new();
    }

    // a flat tree puts everything next to its own index, one import covers it
    if settings.flatten_tree {
        return format!("import {{ {} }} from '.';\n\n", external.join(", "));
    }

    let own_dir = file.module.parent().unwrap_or(Path::new(""));
    // BTreeMap keeps the import block stable across runs
    let mut by_target: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for name in external {
        if settings.index_all_to_root {
            let target = import_path(own_dir, Path::new(""));
            push_unique(by_target.entry(target).or_default(), name);
            continue;
        }
        let Some(defined_in) = locations.get(name) else {
            // declared nowhere in this run; assumed ambient
            continue;
        };
        for module in defined_in {
            if **module == file.module {
                continue;
            }
            let target = if settings.omit_index_files {
                // no index files to route through, import the file itself
                import_path(own_dir, module)
            } else {
                import_path(own_dir, module.parent().unwrap_or(Path::new("")))
            };
            push_unique(by_target.entry(target).or_default(), name);
        }
    }

    let mut block = String::new();
    for (target, names) in &by_target {
        block.push_str(&format!("import {{ {} }} from '{target}';\n", names.join(", ")));
    }
    if !block.is_empty() {
        block.push('\n');
    }
    block
}

fn push_unique<'a>(names: &mut Vec<&'a str>, name: &'a str) {
    if !names.contains(&name) {
        names.push(name);
    }
}

/// Module-specifier path from the directory `from` to `to`, both relative
/// to the output root. Same directory is `.`; descending paths get a `./`
/// prefix.
fn import_path(from: &Path, to: &Path) -> String {
    let from: Vec<&str> = from.iter().filter_map(|c| c.to_str()).collect();
    let to: Vec<&str> = to.iter().filter_map(|c| c.to_str()).collect();
    let shared = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = vec!["..".to_string(); from.len() - shared];
    parts.extend(to[shared..].iter().map(|s| s.to_string()));
    if parts.is_empty() {
        return ".".to_string();
    }
    let joined = parts.join("/");
    if joined.starts_with("..") {
        joined
    } else {
        format!("./{joined}")
    }
}

fn module_specifier(module: &Path) -> String {
    module
        .iter()
        .filter_map(|c| c.to_str())
        .collect::<Vec<_>>()
        .join("/")
}

/// `index.ts` re-export files for the configured layout. Flat and
/// hoisted layouts write a single root index; the nested layout writes one
/// per directory that holds generated files.
fn index_files(settings: &Settings, analyzed: &[AnalyzedFile]) -> Vec<GeneratedFile> {
    if settings.omit_index_files {
        return Vec::new();
    }

    if settings.flatten_tree || settings.index_all_to_root {
        let exports: Vec<String> = analyzed
            .iter()
            .map(|file| module_specifier(&file.module))
            .collect();
        return vec![index_file(settings, Path::new(""), &exports)];
    }

    let mut by_dir: BTreeMap<PathBuf, Vec<String>> = BTreeMap::new();
    for file in analyzed {
        let dir = file
            .module
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let stem = file
            .module
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        by_dir.entry(dir).or_default().push(stem);
    }
    by_dir
        .iter()
        .map(|(dir, exports)| index_file(settings, dir, exports))
        .collect()
}

fn index_file(settings: &Settings, dir: &Path, exports: &[String]) -> GeneratedFile {
    let lines: Vec<String> = exports
        .iter()
        .map(|name| format!("export * from './{name}';"))
        .collect();
    GeneratedFile {
        path: dir.join("index.ts"),
        content: format!("{}\n\n{}\n", settings.file_header, lines.join("\n")),
    }
}
