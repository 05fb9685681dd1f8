//! Form instances: bound inputs for one connector type, and their submission.

use op_schema::{
    ConfigMap, ConnectorDraft, ConnectorId, ConnectorRecord, DESCRIPTION_KEY, FieldSpec, NAME_KEY,
    SchemaRegistry, TypeDescriptor,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{FieldErrors, FormError};
use crate::validate::{ValidationBuilder, is_blank, normalize, unanswered};
use crate::widget::{Widget, render_field};

/// Label of the implicit name input.
pub const NAME_LABEL: &str = "Connector Name";

/// Label of the implicit description input.
pub const DESCRIPTION_LABEL: &str = "Description";

/// Whether an input carries connector identity or configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputRole {
    /// `name` or `description`.
    Identity,
    /// A schema field.
    Config,
}

/// One input of a form together with its current value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundInput {
    key: String,
    label: String,
    required: bool,
    role: InputRole,
    widget: Widget,
    value: Option<Value>,
    #[serde(skip)]
    edited: bool,
}

impl BoundInput {
    fn identity(
        key: &str,
        label: &str,
        required: bool,
        placeholder: &str,
        value: Option<Value>,
    ) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            required,
            role: InputRole::Identity,
            widget: Widget::Text {
                placeholder: Some(placeholder.to_string()),
            },
            value,
            edited: false,
        }
    }

    fn config(spec: &FieldSpec, value: Option<Value>) -> Self {
        Self {
            key: spec.key.clone(),
            label: spec.label.clone(),
            required: spec.required,
            role: InputRole::Config,
            widget: render_field(spec),
            value,
            edited: false,
        }
    }

    /// Field key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Display label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether a value must be supplied.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Identity or configuration input.
    #[must_use]
    pub fn role(&self) -> InputRole {
        self.role
    }

    /// The rendered widget.
    #[must_use]
    pub fn widget(&self) -> &Widget {
        &self.widget
    }

    /// Current value, `None` when unset.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Whether the input holds an answer.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        !is_blank(self.value.as_ref())
    }

    /// Whether the value was bound or cleared after instantiation.
    ///
    /// Values that were only loaded from a record or a default are submitted
    /// exactly as loaded.
    #[must_use]
    pub fn is_edited(&self) -> bool {
        self.edited
    }
}

/// A connector form bound to one type descriptor.
///
/// Each instance owns its own copy of the descriptor and values; nothing is
/// shared between forms.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    descriptor: TypeDescriptor,
    inputs: Vec<BoundInput>,
    record_id: Option<ConnectorId>,
}

impl FormState {
    /// Resolve `type_id` in the registry and build a form for it.
    ///
    /// When `existing` is given the form is bound to that record's name,
    /// description and configuration, and must be of the same type.
    pub fn instantiate(
        registry: &SchemaRegistry,
        type_id: &str,
        existing: Option<&ConnectorRecord>,
    ) -> Result<Self, FormError> {
        let descriptor = registry.lookup(type_id)?;
        Self::from_descriptor(descriptor, existing)
    }

    /// Build a form for editing an existing record.
    pub fn edit(registry: &SchemaRegistry, record: &ConnectorRecord) -> Result<Self, FormError> {
        Self::instantiate(registry, &record.connector_type, Some(record))
    }

    /// Build a form from an already resolved descriptor.
    ///
    /// Fails with [`FormError::Schema`] when the descriptor has an authoring
    /// defect, before any input is created.
    pub fn from_descriptor(
        descriptor: &TypeDescriptor,
        existing: Option<&ConnectorRecord>,
    ) -> Result<Self, FormError> {
        descriptor.check()?;

        if let Some(record) = existing {
            if record.connector_type != descriptor.type_id {
                return Err(FormError::TypeMismatch {
                    record_type: record.connector_type.clone(),
                    requested: descriptor.type_id.clone(),
                });
            }
            for key in record.config.keys() {
                if descriptor.field(key).is_none() {
                    warn!(
                        record = %record.id,
                        type_id = %descriptor.type_id,
                        key = %key,
                        "dropping configuration key not declared by the schema"
                    );
                }
            }
        }

        let mut inputs = Vec::with_capacity(descriptor.fields.len() + 2);
        inputs.push(BoundInput::identity(
            NAME_KEY,
            NAME_LABEL,
            true,
            "e.g. SAP Production",
            existing.map(|r| Value::String(r.name.clone())),
        ));
        inputs.push(BoundInput::identity(
            DESCRIPTION_KEY,
            DESCRIPTION_LABEL,
            false,
            "Optional description",
            existing.and_then(|r| r.description.clone()).map(Value::String),
        ));

        for spec in &descriptor.fields {
            let initial = match existing.map(|r| &r.config) {
                Some(config) if config.contains_key(&spec.key) => {
                    config.get(&spec.key).filter(|v| !v.is_null()).cloned()
                }
                _ => spec.default.clone(),
            };
            inputs.push(BoundInput::config(spec, initial));
        }

        debug!(
            type_id = %descriptor.type_id,
            inputs = inputs.len(),
            editing = existing.is_some(),
            "instantiated connector form"
        );

        Ok(Self {
            descriptor: descriptor.clone(),
            inputs,
            record_id: existing.map(|r| r.id),
        })
    }

    /// The descriptor this form was built from.
    #[must_use]
    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    /// Connector type identifier.
    #[must_use]
    pub fn type_id(&self) -> &str {
        &self.descriptor.type_id
    }

    /// Id of the record being edited, `None` for a new connector.
    #[must_use]
    pub fn record_id(&self) -> Option<ConnectorId> {
        self.record_id
    }

    /// Inputs in render order: name, description, then the schema fields.
    #[must_use]
    pub fn inputs(&self) -> &[BoundInput] {
        &self.inputs
    }

    /// Number of inputs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// Whether the form has no inputs. Never true for an instantiated form.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Look up an input.
    #[must_use]
    pub fn input(&self, key: &str) -> Option<&BoundInput> {
        self.inputs.iter().find(|i| i.key == key)
    }

    /// Current value of an input.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.input(key).and_then(BoundInput::value)
    }

    /// Bind a value to an input.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<(), FormError> {
        let input = self.input_mut(key)?;
        input.value = Some(value.into());
        input.edited = true;
        Ok(())
    }

    /// Unset an input.
    pub fn clear(&mut self, key: &str) -> Result<(), FormError> {
        let input = self.input_mut(key)?;
        input.value = None;
        input.edited = true;
        Ok(())
    }

    fn input_mut(&mut self, key: &str) -> Result<&mut BoundInput, FormError> {
        self.inputs
            .iter_mut()
            .find(|i| i.key == key)
            .ok_or_else(|| FormError::UnknownField {
                key: key.to_string(),
            })
    }

    /// Validate every input, collecting all violations.
    ///
    /// Has no side effects; the form can be corrected and validated again.
    pub fn validate(&self) -> Result<ValidatedForm, FieldErrors> {
        let mut builder = ValidationBuilder::new();
        let mut config = ConfigMap::new();

        let name = self.value(NAME_KEY);
        builder = builder.require(NAME_KEY, NAME_LABEL, name);

        for spec in &self.descriptor.fields {
            let Some(input) = self.input(&spec.key) else {
                continue;
            };
            let value = input.value();
            if is_blank(value) {
                if spec.required {
                    builder = builder.require(&spec.key, &spec.label, value);
                } else if input.edited {
                    config.insert(spec.key.clone(), unanswered(spec, value));
                } else {
                    config.insert(spec.key.clone(), value.cloned().unwrap_or(Value::Null));
                }
                continue;
            }
            if let Some(value) = value {
                // Loaded values are checked but never rewritten.
                match normalize(spec, value) {
                    Ok(normalized) if input.edited => {
                        config.insert(spec.key.clone(), normalized);
                    }
                    Ok(_) => {
                        config.insert(spec.key.clone(), value.clone());
                    }
                    Err(e) => builder.push(e),
                }
            }
        }

        if let Err(errors) = builder.finish() {
            debug!(type_id = %self.type_id(), errors = errors.len(), "connector form rejected");
            return Err(errors);
        }

        Ok(ValidatedForm {
            type_id: self.descriptor.type_id.clone(),
            name: text_of(name).unwrap_or_default(),
            description: self.description(),
            config,
            record_id: self.record_id,
        })
    }

    /// A loaded description is kept as stored, even when blank. An edited one
    /// is dropped when blank.
    fn description(&self) -> Option<String> {
        let input = self.input(DESCRIPTION_KEY)?;
        match input.value() {
            Some(Value::String(s)) if !input.edited => Some(s.clone()),
            value => text_of(value),
        }
    }

    /// Validate and assemble in one step.
    pub fn submit(&self) -> Result<ConnectorDraft, FieldErrors> {
        self.validate().map(ValidatedForm::assemble)
    }
}

/// Identity values are plain text even when bound to another JSON scalar.
fn text_of(value: Option<&Value>) -> Option<String> {
    match value {
        _ if is_blank(value) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
        None => None,
    }
}

/// The outcome of a successful [`FormState::validate`].
///
/// Can only be obtained by validating, so holding one proves the values
/// passed every check.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedForm {
    type_id: String,
    name: String,
    description: Option<String>,
    config: ConfigMap,
    record_id: Option<ConnectorId>,
}

impl ValidatedForm {
    /// Id of the record being edited, if any.
    #[must_use]
    pub fn record_id(&self) -> Option<ConnectorId> {
        self.record_id
    }

    /// Normalized configuration values keyed by field key.
    #[must_use]
    pub fn config(&self) -> &ConfigMap {
        &self.config
    }

    /// Split identity from configuration and produce the draft payload.
    ///
    /// `config` holds exactly the schema's keys; `name` and `description`
    /// never appear in it.
    #[must_use]
    pub fn assemble(self) -> ConnectorDraft {
        ConnectorDraft {
            name: self.name,
            description: self.description,
            connector_type: self.type_id,
            config: self.config,
        }
    }
}
