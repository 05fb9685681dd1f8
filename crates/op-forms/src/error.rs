//! Form error types: structural failures and per-field validation errors.

use std::fmt;

use op_schema::SchemaError;
use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;

/// Structural failures of the form engine.
///
/// These abort the operation and never produce a partial form. User input
/// problems are reported through [`FieldErrors`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// Unknown connector type or a malformed schema.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The record being edited belongs to a different connector type.
    #[error("record is of type '{record_type}', form requested '{requested}'")]
    TypeMismatch {
        /// Type of the existing record.
        record_type: String,
        /// Type the form was requested for.
        requested: String,
    },

    /// The form has no input with this key.
    #[error("form has no field '{key}'")]
    UnknownField {
        /// The key that was addressed.
        key: String,
    },
}

/// The kind of validation error that occurred on a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// Required value was empty or unset.
    Required,
    /// Numeric field value did not parse as a finite number.
    NotANumber,
    /// Select field value is not one of the options.
    NotAnOption {
        /// The allowed options.
        options: Vec<String>,
    },
    /// A configuration key the schema does not declare.
    UnexpectedKey,
}

/// A validation error on a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field key.
    pub key: String,
    /// Field label used in the message.
    pub label: String,
    /// What went wrong.
    pub kind: FieldErrorKind,
}

impl FieldError {
    /// Create a new field error.
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>, kind: FieldErrorKind) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind,
        }
    }

    /// Create a "required" field error.
    #[must_use]
    pub fn required(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, FieldErrorKind::Required)
    }

    /// Create a "not a number" field error.
    #[must_use]
    pub fn not_a_number(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, FieldErrorKind::NotANumber)
    }

    /// Create a "not an option" field error.
    #[must_use]
    pub fn not_an_option(key: impl Into<String>, label: impl Into<String>, options: &[String]) -> Self {
        Self::new(
            key,
            label,
            FieldErrorKind::NotAnOption {
                options: options.to_vec(),
            },
        )
    }

    /// Create an "unexpected key" field error.
    #[must_use]
    pub fn unexpected_key(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::new(key.clone(), key, FieldErrorKind::UnexpectedKey)
    }

    /// User-facing message.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this is a "required" error.
    #[must_use]
    pub fn is_required_error(&self) -> bool {
        matches!(self.kind, FieldErrorKind::Required)
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FieldErrorKind::Required => write!(f, "{} is required", self.label),
            FieldErrorKind::NotANumber => write!(f, "{} must be a number", self.label),
            FieldErrorKind::NotAnOption { options } => {
                write!(f, "{} must be one of: {}", self.label, options.join(", "))
            }
            FieldErrorKind::UnexpectedKey => write!(f, "{} is not a field of this connector type", self.key),
        }
    }
}

/// Every validation error of one submission, in form order, at most one per
/// key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Error)]
#[error("{} field(s) failed validation", .errors.len())]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub(crate) fn from_vec(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    /// The error for a key, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.key == key)
    }

    /// The message for a key, if any.
    #[must_use]
    pub fn message(&self, key: &str) -> Option<String> {
        self.get(key).map(FieldError::message)
    }

    /// Whether a key has an error.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Keys with errors, in form order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.key.as_str())
    }

    /// Iterate over the errors.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Number of fields with errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether there are no errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl IntoIterator for FieldErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

/// Serializes as a `{key: message}` object.
impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.errors.len()))?;
        for error in &self.errors {
            map.serialize_entry(&error.key, &error.message())?;
        }
        map.end()
    }
}
