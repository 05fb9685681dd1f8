//! Schema-driven connector configuration forms.
//!
//! A [`FormState`] is instantiated from a [`op_schema::SchemaRegistry`] entry
//! and holds one [`BoundInput`] per schema field, preceded by the connector's
//! `name` and `description`. Values are bound with [`FormState::set`], checked
//! with [`FormState::validate`], and the resulting [`ValidatedForm`] is
//! assembled into the [`op_schema::ConnectorDraft`] the backend expects.
//!
//! ```
//! use op_forms::FormState;
//! use op_schema::SchemaRegistry;
//!
//! let registry = SchemaRegistry::builtin();
//! let mut form = FormState::instantiate(&registry, "http", None)?;
//! form.set("name", "Orders API")?;
//!
//! let errors = form.validate().unwrap_err();
//! assert_eq!(errors.message("base_url").as_deref(), Some("Base URL is required"));
//!
//! form.set("base_url", "https://orders.example.com")?;
//! form.set("auth_type", "None")?;
//! let draft = form.submit().unwrap();
//! assert_eq!(draft.connector_type, "http");
//! assert!(!draft.config.contains_key("name"));
//! # Ok::<(), op_forms::FormError>(())
//! ```
//!
//! Validation never stops at the first problem: every field is checked and
//! the errors come back together as [`FieldErrors`], keyed by field.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod form;
mod validate;
mod widget;


pub use error::{FieldError, FieldErrorKind, FieldErrors, FormError};
pub use form::{BoundInput, DESCRIPTION_LABEL, FormState, InputRole, NAME_LABEL, ValidatedForm};
pub use validate::{ValidationBuilder, is_blank, parse_number, validate_config};
pub use widget::{TEXTAREA_ROWS, Widget, render_field};
