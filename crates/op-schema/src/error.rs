//! Error types for schema lookup and schema authoring defects.

use thiserror::Error;

/// Errors raised while resolving or checking connector type schemas.
///
/// Both variants that describe the registry contents (`UnknownType`,
/// `InvalidSchema`) are structural: the caller cannot fix them by editing
/// form input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The requested connector type is not in the active registry.
    #[error("unknown connector type: {type_id}")]
    UnknownType {
        /// The type identifier that was looked up.
        type_id: String,
    },

    /// A field specification violates the structural rules of its kind.
    #[error("invalid schema for '{type_id}.{key}': {reason}")]
    InvalidSchema {
        /// The connector type owning the field.
        type_id: String,
        /// The offending field key.
        key: String,
        /// What is wrong with the field.
        reason: String,
    },

    /// Two descriptors in one registry share a type identifier.
    #[error("duplicate connector type: {type_id}")]
    DuplicateType {
        /// The repeated type identifier.
        type_id: String,
    },

    /// The registry payload could not be decoded.
    #[error("failed to parse connector types: {reason}")]
    Parse {
        /// The decoder's message.
        reason: String,
    },
}

impl SchemaError {
    /// Create an "unknown type" error.
    #[must_use]
    pub fn unknown_type(type_id: impl Into<String>) -> Self {
        Self::UnknownType {
            type_id: type_id.into(),
        }
    }

    /// Create an "invalid schema" error.
    #[must_use]
    pub fn invalid_schema(
        type_id: impl Into<String>,
        key: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidSchema {
            type_id: type_id.into(),
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error is a schema-authoring defect.
    #[must_use]
    pub fn is_authoring_defect(&self) -> bool {
        matches!(self, Self::InvalidSchema { .. } | Self::DuplicateType { .. })
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            reason: err.to_string(),
        }
    }
}

/// Result type alias for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;
