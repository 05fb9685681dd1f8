//! Mapping from field kinds to input widgets.

use op_schema::{FieldKind, FieldSpec};
use serde::Serialize;

/// Rows shown by a multi-line input.
pub const TEXTAREA_ROWS: u16 = 4;

/// A concrete input control for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum Widget {
    /// Single-line free text.
    Text {
        /// Input hint.
        placeholder: Option<String>,
    },
    /// Single-line text with the value masked.
    Masked {
        /// Input hint.
        placeholder: Option<String>,
    },
    /// Single choice constrained to `options`.
    Choice {
        /// Allowed values, in display order.
        options: Vec<String>,
        /// Prompt shown while nothing is chosen.
        placeholder: String,
    },
    /// Numeric input.
    Numeric {
        /// Input hint.
        placeholder: Option<String>,
    },
    /// Multi-line free text.
    MultiLine {
        /// Visible rows.
        rows: u16,
        /// Input hint.
        placeholder: Option<String>,
    },
}

impl Widget {
    /// Short name of the widget.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Masked { .. } => "masked",
            Self::Choice { .. } => "choice",
            Self::Numeric { .. } => "numeric",
            Self::MultiLine { .. } => "multiline",
        }
    }

    /// Whether the entered value should be hidden when displayed.
    #[must_use]
    pub const fn is_masked(&self) -> bool {
        matches!(self, Self::Masked { .. })
    }
}

/// Build the widget for a field.
///
/// Total over [`FieldKind`]; unrecognized wire kinds have already been folded
/// into [`FieldKind::String`] when the schema was decoded.
#[must_use]
pub fn render_field(spec: &FieldSpec) -> Widget {
    let placeholder = spec.placeholder.clone();
    match spec.kind {
        FieldKind::Password => Widget::Masked { placeholder },
        FieldKind::Select => Widget::Choice {
            options: spec.options().to_vec(),
            placeholder: placeholder.unwrap_or_else(|| format!("Select {}", spec.label)),
        },
        FieldKind::Number => Widget::Numeric { placeholder },
        FieldKind::Textarea => Widget::MultiLine {
            rows: TEXTAREA_ROWS,
            placeholder,
        },
        FieldKind::String => Widget::Text { placeholder },
    }
}
