//! Convert serialized validation-schema descriptions into declaration text.
//!
//! A schema builder's `describe()` output is a loosely-typed JSON tree. This
//! crate turns such trees into TypeScript declaration source:
//!
//! 1. [`describe`] deserializes the raw tree,
//! 2. [`facts`] normalizes the per-node facts (name, required, default, docs),
//! 3. [`resolve`] builds the typed intermediate representation ([`content`]),
//! 4. [`emit`] renders that representation into declaration text,
//! 5. [`project`] walks whole directories and resolves cross-file imports.
//!
//! [`convert::convert_schema`] covers the single-schema case; the `generate`
//! subcommand of the binary drives [`project::convert_from_directory`].

pub mod cli;
pub mod content;
pub mod convert;
pub mod describe;
pub mod emit;
pub mod error;
pub mod facts;
pub mod project;
pub mod resolve;
pub mod settings;

pub use content::{JoinOp, TypeContent};
pub use convert::{ConvertedType, convert_schema};
pub use describe::Describe;
pub use error::ConvertError;
pub use project::convert_from_directory;
pub use settings::Settings;
