//! Connector type descriptors.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{SchemaError, SchemaResult};
use crate::field::{FieldSpec, FieldSpecWire};

/// Key of the implicit connector name input.
pub const NAME_KEY: &str = "name";

/// Key of the implicit connector description input.
pub const DESCRIPTION_KEY: &str = "description";

/// The identity keys every connector form carries regardless of type.
pub const IDENTITY_KEYS: [&str; 2] = [NAME_KEY, DESCRIPTION_KEY];

/// Full field-specification set and metadata for one connector type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDescriptor {
    /// Registry key.
    pub type_id: String,
    /// Display name.
    pub display_name: String,
    /// Short description.
    pub description: String,
    /// Optional icon glyph.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Fields in render order.
    pub fields: Vec<FieldSpec>,
}

impl TypeDescriptor {
    /// Create a descriptor with no fields.
    #[must_use]
    pub fn new(
        type_id: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            type_id: type_id.into(),
            display_name: display_name.into(),
            description: description.into(),
            icon: None,
            fields: Vec::new(),
        }
    }

    /// Append a field.
    #[must_use]
    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Set the icon glyph.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Find a field by key.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Field keys in render order.
    pub fn field_keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.key.as_str())
    }

    /// Number of required fields.
    #[must_use]
    pub fn required_count(&self) -> usize {
        self.fields.iter().filter(|f| f.required).count()
    }

    /// Check every field for schema-authoring defects.
    ///
    /// Reports the first defect found, in field order.
    pub fn check(&self) -> SchemaResult<()> {
        let mut seen = HashSet::with_capacity(self.fields.len());
        for field in &self.fields {
            if IDENTITY_KEYS.contains(&field.key.as_str()) {
                return Err(SchemaError::invalid_schema(
                    &self.type_id,
                    &field.key,
                    "key is reserved for the connector identity",
                ));
            }
            if !seen.insert(field.key.as_str()) {
                return Err(SchemaError::invalid_schema(
                    &self.type_id,
                    &field.key,
                    "duplicate field key",
                ));
            }
            if let Some(reason) = field.structural_defect() {
                return Err(SchemaError::invalid_schema(&self.type_id, &field.key, reason));
            }
        }
        Ok(())
    }
}

/// Wire shape of one entry in the connector types mapping.
#[derive(Debug, Deserialize)]
pub(crate) struct TypeDescriptorWire {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    config_schema: Map<String, Value>,
}

impl TypeDescriptorWire {
    pub(crate) fn into_descriptor(self, type_id: String) -> SchemaResult<TypeDescriptor> {
        let mut fields = Vec::with_capacity(self.config_schema.len());
        for (key, raw) in self.config_schema {
            let wire: FieldSpecWire = serde_json::from_value(raw).map_err(|e| {
                SchemaError::Parse {
                    reason: format!("{type_id}.{key}: {e}"),
                }
            })?;
            fields.push(wire.into_spec(key));
        }

        Ok(TypeDescriptor {
            display_name: self.name.unwrap_or_else(|| type_id.clone()),
            description: self.description.unwrap_or_default(),
            icon: self.icon,
            fields,
            type_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldKind;
    use serde_json::json;

    fn sample() -> TypeDescriptor {
        TypeDescriptor::new("email", "Email", "SMTP/IMAP servers")
            .with_field(FieldSpec::string("host", "Host").required())
            .with_field(FieldSpec::number("port", "Port").required())
            .with_field(FieldSpec::password("password", "Password"))
    }

    #[test]
    fn test_field_lookup() {
        let d = sample();
        assert_eq!(d.field("port").map(|f| f.kind), Some(FieldKind::Number));
        assert!(d.field("missing").is_none());
        assert_eq!(d.field_keys().collect::<Vec<_>>(), ["host", "port", "password"]);
        assert_eq!(d.required_count(), 2);
    }

    #[test]
    fn test_check_passes() {
        assert!(sample().check().is_ok());
    }

    #[test]
    fn test_check_duplicate_key() {
        let d = sample().with_field(FieldSpec::string("host", "Host again"));
        let err = d.check().unwrap_err();
        assert!(err.to_string().contains("duplicate field key"));
    }

    #[test]
    fn test_check_reserved_key() {
        let d = sample().with_field(FieldSpec::string("name", "Name"));
        assert!(matches!(d.check(), Err(SchemaError::InvalidSchema { key, .. }) if key == "name"));
    }

    #[test]
    fn test_check_select_without_options() {
        let d = sample().with_field(FieldSpec::new("protocol", FieldKind::Select, "Protocol"));
        assert!(matches!(
            d.check(),
            Err(SchemaError::InvalidSchema { key, .. }) if key == "protocol"
        ));
    }

    #[test]
    fn test_wire_preserves_field_order() {
        let wire: TypeDescriptorWire = serde_json::from_value(json!({
            "name": "FTP/SFTP",
            "description": "File transfer servers",
            "config_schema": {
                "protocol": {"type": "select", "label": "Protocol", "options": ["FTP", "SFTP"]},
                "host": {"type": "string", "label": "Host", "required": true},
                "port": {"type": "number", "label": "Port", "default": 22},
                "private_key": {"type": "textarea", "label": "Private Key"}
            }
        }))
        .unwrap();

        let d = wire.into_descriptor("ftp".to_string()).unwrap();
        assert_eq!(d.type_id, "ftp");
        assert_eq!(d.field_keys().collect::<Vec<_>>(), ["protocol", "host", "port", "private_key"]);
    }

    #[test]
    fn test_wire_bad_field_reports_path() {
        let wire: TypeDescriptorWire = serde_json::from_value(json!({
            "config_schema": {"host": {"required": "yes"}}
        }))
        .unwrap();

        let err = wire.into_descriptor("sap".to_string()).unwrap_err();
        assert!(err.to_string().contains("sap.host"));
    }
}
