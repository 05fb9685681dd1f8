//! Field specifications: one declarative description per configuration input.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

/// The input kind of a configuration field.
///
/// The set is closed. Tags that are not recognised decode to
/// [`FieldKind::String`] so that schemas written for newer kinds still render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FieldKind {
    /// Single-line free text.
    #[default]
    String,
    /// Masked single-line text.
    Password,
    /// One choice out of a fixed option list.
    Select,
    /// Numeric input.
    Number,
    /// Multi-line free text.
    Textarea,
}

impl FieldKind {
    /// Resolve a wire tag. Never fails.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "string" => Self::String,
            "password" => Self::Password,
            "select" => Self::Select,
            "number" => Self::Number,
            "textarea" => Self::Textarea,
            other => {
                debug!(kind = other, "unrecognized field kind, rendering as string");
                Self::String
            }
        }
    }

    /// The canonical wire tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Password => "password",
            Self::Select => "select",
            Self::Number => "number",
            Self::Textarea => "textarea",
        }
    }

    /// Whether values of this kind are free text.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::String | Self::Password | Self::Textarea)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::from_tag(&tag))
    }
}

/// Declarative description of one configurable input of a connector type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    /// Identifier, unique within the owning type.
    pub key: String,
    /// Input kind.
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// Human-readable label.
    pub label: String,
    /// Whether a value must be supplied.
    pub required: bool,
    /// Choices for `select` fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    /// Pre-filled value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Input hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl FieldSpec {
    /// Create an optional field with no default or placeholder.
    #[must_use]
    pub fn new(key: impl Into<String>, kind: FieldKind, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind,
            label: label.into(),
            required: false,
            options: None,
            default: None,
            placeholder: None,
        }
    }

    /// Single-line text field.
    #[must_use]
    pub fn string(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, FieldKind::String, label)
    }

    /// Masked text field.
    #[must_use]
    pub fn password(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, FieldKind::Password, label)
    }

    /// Numeric field.
    #[must_use]
    pub fn number(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, FieldKind::Number, label)
    }

    /// Multi-line text field.
    #[must_use]
    pub fn textarea(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, FieldKind::Textarea, label)
    }

    /// Single-choice field over `options`.
    #[must_use]
    pub fn select<I, S>(key: impl Into<String>, label: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut spec = Self::new(key, FieldKind::Select, label);
        spec.options = Some(options.into_iter().map(Into::into).collect());
        spec
    }

    /// Mark the field as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the default value.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Set the placeholder.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// The option list, or an empty slice for non-select fields.
    #[must_use]
    pub fn options(&self) -> &[String] {
        self.options.as_deref().unwrap_or_default()
    }

    /// Check the structural rules of this field's kind.
    ///
    /// Returns the reason the field is malformed, if it is.
    pub(crate) fn structural_defect(&self) -> Option<String> {
        if self.key.trim().is_empty() {
            return Some("field key cannot be empty".to_string());
        }

        match self.kind {
            FieldKind::Select => {
                let Some(options) = &self.options else {
                    return Some("select field has no options".to_string());
                };
                if options.is_empty() {
                    return Some("select field has an empty option list".to_string());
                }
                match &self.default {
                    None | Some(Value::Null) => None,
                    Some(Value::String(d)) if options.contains(d) => None,
                    Some(other) => Some(format!("default {other} is not one of the options")),
                }
            }
            FieldKind::Number => match &self.default {
                None | Some(Value::Null | Value::Number(_)) => None,
                Some(Value::String(s)) if s.trim().parse::<f64>().is_ok() => None,
                Some(other) => Some(format!("default {other} is not a number")),
            },
            FieldKind::String | FieldKind::Password | FieldKind::Textarea => None,
        }
    }
}

/// Wire shape of one entry in a `config_schema` object.
#[derive(Debug, Deserialize)]
pub(crate) struct FieldSpecWire {
    #[serde(rename = "type", default)]
    kind: FieldKind,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    options: Option<Vec<String>>,
    #[serde(default)]
    default: Option<Value>,
    #[serde(default)]
    placeholder: Option<String>,
}

impl FieldSpecWire {
    pub(crate) fn into_spec(self, key: String) -> FieldSpec {
        let label = self.label.unwrap_or_else(|| key.clone());
        FieldSpec {
            key,
            kind: self.kind,
            label,
            required: self.required,
            options: self.options,
            default: self.default.filter(|v| !v.is_null()),
            placeholder: self.placeholder,
        }
    }
}
