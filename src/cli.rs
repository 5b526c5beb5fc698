//! Command line: generate (directory → directory) | print (files → stdout)

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use crate::project;
use crate::settings::{DEFAULT_FILE_HEADER, Settings};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// convert serialized schema descriptions into declaration files
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// convert a directory tree of schema description files
    Generate(Generate),
    /// convert schema description files and print the declarations
    Print(Print),
}

#[derive(Args, Debug, Clone)]
struct ConvertSettings {
    /// name declarations from the label flag instead of className metadata
    #[arg(long, default_value_t = false)]
    use_label_as_name: bool,

    /// replace a trailing "Schema" in fallback export names with this suffix
    #[arg(long)]
    default_interface_suffix: Option<String>,

    /// members without an explicit presence are required
    #[arg(long, default_value_t = false)]
    default_to_required: bool,

    /// members with a default value count as required
    #[arg(long, default_value_t = false)]
    treat_defaulted_optional_as_required: bool,

    /// union each member's default value into its type
    #[arg(long, default_value_t = false)]
    supply_defaults_in_type: bool,

    /// keep object members in source order instead of sorting by name
    #[arg(long, default_value_t = false)]
    source_order_properties: bool,

    /// document every declaration and member, name as the fallback text
    #[arg(long, default_value_t = false)]
    comment_everything: bool,

    /// indentation unit for generated text
    #[arg(long, default_value = "  ")]
    indentation: String,

    /// one union member per line
    #[arg(long, default_value_t = false)]
    union_new_line: bool,

    /// one tuple member per line
    #[arg(long, default_value_t = false)]
    tuple_new_line: bool,

    /// extra diagnostics on stderr
    #[arg(long, default_value_t = false)]
    debug: bool,
}

#[derive(Args, Debug, Clone)]
struct Generate {
    #[command(flatten)]
    convert_settings: ConvertSettings,

    /// directory holding schema description files
    schema_directory: PathBuf,

    /// directory to write declaration files into
    output_directory: PathBuf,

    /// suffix stripped from schema file stems (AddressSchema.json -> Address.ts)
    #[arg(long, default_value = "Schema")]
    schema_file_suffix: String,

    /// suffix appended to every generated file name
    #[arg(long, default_value = "")]
    interface_file_suffix: String,

    /// header comment prepended to every generated file
    #[arg(long, default_value = DEFAULT_FILE_HEADER)]
    file_header: String,

    /// regex an input file name must match
    #[arg(long, default_value = r"\.json$")]
    input_file_filter: String,

    /// file names, or directory names postfixed with '/', to skip
    #[arg(long, num_args = 1..)]
    ignore: Vec<String>,

    /// only read the root of the schema directory
    #[arg(long, default_value_t = false)]
    root_directory_only: bool,

    /// write every output file into the output root
    #[arg(long, default_value_t = false)]
    flatten_tree: bool,

    /// keep the nested layout but hoist all exports into the root index.ts
    #[arg(long, default_value_t = false)]
    index_all_to_root: bool,

    /// skip index.ts generation
    #[arg(long, default_value_t = false)]
    omit_index_files: bool,
}

#[derive(Args, Debug, Clone)]
struct Print {
    #[command(flatten)]
    convert_settings: ConvertSettings,

    /// one or more schema description files; literal paths or quoted glob patterns
    #[arg(num_args = 1.., required = true)]
    input: Vec<String>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl ConvertSettings {
    fn apply(&self, settings: &mut Settings) {
        settings.use_label_as_name = self.use_label_as_name;
        settings.default_interface_suffix = self.default_interface_suffix.clone();
        settings.default_to_required = self.default_to_required;
        settings.treat_defaulted_optional_as_required = self.treat_defaulted_optional_as_required;
        settings.supply_defaults_in_type = self.supply_defaults_in_type;
        settings.sort_properties_by_name = !self.source_order_properties;
        settings.comment_everything = self.comment_everything;
        settings.indentation = self.indentation.clone();
        settings.union_new_line = self.union_new_line;
        settings.tuple_new_line = self.tuple_new_line;
        settings.debug = self.debug;
    }
}

impl Generate {
    fn settings(&self) -> Settings {
        let mut settings = Settings::default();
        self.convert_settings.apply(&mut settings);
        settings.schema_file_suffix = self.schema_file_suffix.clone();
        settings.interface_file_suffix = self.interface_file_suffix.clone();
        settings.file_header = self.file_header.clone();
        settings.input_file_filter = self.input_file_filter.clone();
        settings.ignore_files = self.ignore.clone();
        settings.root_directory_only = self.root_directory_only;
        settings.flatten_tree = self.flatten_tree;
        settings.index_all_to_root = self.index_all_to_root;
        settings.omit_index_files = self.omit_index_files;
        settings
    }
}

impl Print {
    fn settings(&self) -> Settings {
        let mut settings = Settings::default();
        self.convert_settings.apply(&mut settings);
        settings
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Generate(target) => {
                let settings = target.settings();
                let generated = project::convert_from_directory(
                    &settings,
                    &target.schema_directory,
                    &target.output_directory,
                )?;
                if settings.debug {
                    for file in &generated {
                        eprintln!("{}", format!("wrote {}", file.path.display()).green());
                    }
                }
                eprintln!(
                    "generated {} file(s) in {}",
                    generated.len(),
                    target.output_directory.display()
                );
                Ok(())
            }
            Command::Print(target) => {
                let settings = target.settings();
                let paths = resolve_file_path_patterns(&target.input)?;
                let mut outputs = Vec::new();
                for path in paths {
                    let source = std::fs::read_to_string(&path)
                        .with_context(|| format!("reading {}", path.display()))?;
                    let types = project::convert_source(&settings, &source)
                        .with_context(|| format!("in {}", path.display()))?;
                    outputs.extend(types.into_iter().map(|t| t.content));
                }
                if outputs.is_empty() {
                    bail!("no schemas found in the given input files");
                }
                println!("{}", outputs.join("\n\n"));
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)
                .with_context(|| format!("invalid glob pattern {pattern:?}"))?
            {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            // Treat as a literal path
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_args_map_onto_settings() {
        let cli = CommandLineInterface::try_parse_from([
            "schema2ts",
            "generate",
            "schemas",
            "types",
            "--default-to-required",
            "--source-order-properties",
            "--interface-file-suffix",
            "Types",
            "--ignore",
            "DropSchema.json",
            "sub/",
        ])
        .unwrap();
        let Command::Generate(generate) = &cli.cmd else {
            panic!("expected generate");
        };
        let settings = generate.settings();
        assert!(settings.default_to_required);
        assert!(!settings.sort_properties_by_name);
        assert_eq!(settings.interface_file_suffix, "Types");
        assert_eq!(settings.ignore_files, ["DropSchema.json", "sub/"]);
        assert_eq!(settings.schema_file_suffix, "Schema");
    }

    #[test]
    fn print_requires_at_least_one_input() {
        assert!(CommandLineInterface::try_parse_from(["schema2ts", "print"]).is_err());
    }

    #[test]
    fn literal_paths_pass_through_unresolved() {
        let paths = resolve_file_path_patterns(["plain/path.json"]).unwrap();
        assert_eq!(paths, [PathBuf::from("plain/path.json")]);
    }

    #[test]
    fn globs_that_match_nothing_are_errors() {
        let missing = resolve_file_path_patterns(["no/such/dir/*.json"]);
        assert!(missing.is_err());
    }
}
