//! Per-run configuration. Resolved once, read-only for the whole pipeline.

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Conversion and output settings.
///
/// Nothing in the pipeline mutates this; independent conversions can share
/// one instance across threads.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Name declarations from `flags.label` instead of the `className`
    /// metadata entry.
    pub use_label_as_name: bool,

    /// When the fallback export name ends with "schema", replace that ending
    /// with this suffix (e.g. `TestSchema` -> `TestInterface`).
    pub default_interface_suffix: Option<String>,

    /// Members with no explicit presence default to required.
    pub default_to_required: bool,

    /// A member that is optional only because nothing was declared, but
    /// carries a default value, counts as required.
    pub treat_defaulted_optional_as_required: bool,

    /// Union the (JSON-rendered) default value into the member type.
    pub supply_defaults_in_type: bool,

    /// Sort object members by name instead of source order.
    pub sort_properties_by_name: bool,

    /// Document every declaration and member, falling back to its own name
    /// when no description exists.
    pub comment_everything: bool,

    /// The indentation unit.
    pub indentation: String,

    /// Place every union member on its own line.
    pub union_new_line: bool,

    /// Place every tuple member on its own line.
    pub tuple_new_line: bool,

    /// Extra diagnostics on stderr.
    pub debug: bool,

    // ——— project-level (directory conversion) ———
    /// Suffix stripped from a schema file's stem to form the output file
    /// name (`AddressSchema.json` -> `Address.ts`).
    pub schema_file_suffix: String,

    /// Suffix appended to every generated file name.
    pub interface_file_suffix: String,

    /// Header comment prepended to every generated file.
    pub file_header: String,

    /// Regex an input file name must match to be converted.
    pub input_file_filter: String,

    /// File names (`AddressSchema.json`) or directory entries postfixed with
    /// a slash (`addressSchemas/`) excluded from conversion.
    pub ignore_files: Vec<String>,

    /// Only read the root of the schema directory.
    pub root_directory_only: bool,

    /// Write all output files into the output root instead of mirroring the
    /// input directory structure.
    pub flatten_tree: bool,

    /// Keep the nested layout but hoist every export into a single root
    /// `index.ts`.
    pub index_all_to_root: bool,

    /// Skip `index.ts` generation entirely.
    pub omit_index_files: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            use_label_as_name: false,
            default_interface_suffix: None,
            default_to_required: false,
            treat_defaulted_optional_as_required: false,
            supply_defaults_in_type: false,
            sort_properties_by_name: true,
            comment_everything: false,
            indentation: "  ".to_string(),
            union_new_line: false,
            tuple_new_line: false,
            debug: false,
            schema_file_suffix: "Schema".to_string(),
            interface_file_suffix: String::new(),
            file_header: DEFAULT_FILE_HEADER.to_string(),
            input_file_filter: r"\.json$".to_string(),
            ignore_files: Vec::new(),
            root_directory_only: false,
            flatten_tree: false,
            index_all_to_root: false,
            omit_index_files: false,
        }
    }
}

pub const DEFAULT_FILE_HEADER: &str = "/**\n * This file was automatically generated by schema2ts\n * Do not modify this file manually\n */";
