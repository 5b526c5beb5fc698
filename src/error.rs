//! Error types for schema conversion.

use thiserror::Error;

/// Error type for converting a schema description into declaration text.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// A schema that must become a top-level declaration resolved no name.
    /// Carries a compact rendering of the offending node for diagnosis.
    #[error("schema needs a name to be exported: {node}")]
    MissingName {
        /// Compact JSON of the unnamed node.
        node: String,
    },

    /// An invariant the resolver guarantees was violated at emission time.
    /// Should never occur in normal operation.
    #[error("internal consistency: {0}")]
    Internal(String),
}

impl ConvertError {
    pub fn missing_name(details: &crate::describe::Describe) -> Self {
        ConvertError::MissingName {
            node: format!(
                "{} flags={:?}",
                details.type_name.as_str(),
                details.flags
            ),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ConvertError::Internal(message.into())
    }
}
