//! The read-only connector type registry.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::builtin;
use crate::descriptor::{TypeDescriptor, TypeDescriptorWire};
use crate::error::{SchemaError, SchemaResult};

/// Mapping from connector type identifier to its descriptor.
///
/// Descriptors keep the order in which the source listed them. The registry
/// has no mutation operations once built.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    types: Vec<TypeDescriptor>,
    index: HashMap<String, usize>,
}

impl SchemaRegistry {
    /// Build a registry from descriptors.
    ///
    /// Fails on a repeated type identifier. Field-level defects are not
    /// checked here; see [`SchemaRegistry::check_all`].
    pub fn from_descriptors<I>(descriptors: I) -> SchemaResult<Self>
    where
        I: IntoIterator<Item = TypeDescriptor>,
    {
        let mut registry = Self::default();
        for descriptor in descriptors {
            if registry.index.contains_key(&descriptor.type_id) {
                return Err(SchemaError::DuplicateType {
                    type_id: descriptor.type_id,
                });
            }
            registry
                .index
                .insert(descriptor.type_id.clone(), registry.types.len());
            registry.types.push(descriptor);
        }
        Ok(registry)
    }

    /// Decode the backend's `{typeId: {name, description, config_schema}}`
    /// mapping.
    pub fn from_value(value: Value) -> SchemaResult<Self> {
        let Value::Object(entries) = value else {
            return Err(SchemaError::Parse {
                reason: "connector types must be a JSON object".to_string(),
            });
        };

        let mut descriptors = Vec::with_capacity(entries.len());
        for (type_id, raw) in entries {
            let wire: TypeDescriptorWire = serde_json::from_value(raw).map_err(|e| {
                SchemaError::Parse {
                    reason: format!("{type_id}: {e}"),
                }
            })?;
            descriptors.push(wire.into_descriptor(type_id)?);
        }

        let registry = Self::from_descriptors(descriptors)?;
        debug!(types = registry.len(), "decoded connector type registry");
        Ok(registry)
    }

    /// Decode a registry from JSON text.
    pub fn from_json(json: &str) -> SchemaResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// The built-in fallback registry.
    #[must_use]
    pub fn builtin() -> Self {
        builtin::registry()
    }

    /// Resolve a type identifier.
    pub fn lookup(&self, type_id: &str) -> SchemaResult<&TypeDescriptor> {
        self.get(type_id)
            .ok_or_else(|| SchemaError::unknown_type(type_id))
    }

    /// Resolve a type identifier, returning `None` when absent.
    #[must_use]
    pub fn get(&self, type_id: &str) -> Option<&TypeDescriptor> {
        self.index.get(type_id).and_then(|&i| self.types.get(i))
    }

    /// Whether the type identifier is known.
    #[must_use]
    pub fn contains(&self, type_id: &str) -> bool {
        self.index.contains_key(type_id)
    }

    /// Descriptors in source order.
    pub fn types(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.iter()
    }

    /// Type identifiers in source order.
    pub fn type_ids(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(|d| d.type_id.as_str())
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Run [`TypeDescriptor::check`] over every descriptor, collecting the
    /// defects.
    #[must_use]
    pub fn check_all(&self) -> Vec<SchemaError> {
        self.types.iter().filter_map(|d| d.check().err()).collect()
    }
}
