//! Connector service: forms in, persisted records out.

use op_forms::{FormError, FormState};
use op_schema::{
    ConnectionTestResult, ConnectorId, ConnectorRecord, ConnectorSummary, SchemaRegistry,
};
use tracing::{debug, info};

use crate::error::{ClientError, ClientResult, ServiceError};
use crate::registry::{RegistryOrigin, load_registry};
use crate::traits::{ConnectionTester, ConnectorStore, RegistrySource};

/// Ties the form engine to a persistence backend.
#[derive(Debug)]
pub struct ConnectorService<B> {
    backend: B,
    registry: SchemaRegistry,
    origin: RegistryOrigin,
}

impl<B> ConnectorService<B>
where
    B: ConnectorStore + ConnectionTester,
{
    /// Create a service using an already loaded registry.
    pub fn new(backend: B, registry: SchemaRegistry, origin: RegistryOrigin) -> Self {
        Self {
            backend,
            registry,
            origin,
        }
    }

    /// Create a service, loading the registry from the backend itself.
    pub async fn connect(backend: B) -> Self
    where
        B: RegistrySource,
    {
        let (registry, origin) = load_registry(&backend).await;
        Self::new(backend, registry, origin)
    }

    /// The active registry.
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Where the active registry came from.
    pub fn origin(&self) -> RegistryOrigin {
        self.origin
    }

    /// The underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// A blank form for a new connector of `type_id`.
    pub fn new_form(&self, type_id: &str) -> Result<FormState, FormError> {
        FormState::instantiate(&self.registry, type_id, None)
    }

    /// A form bound to the stored connector `id`.
    pub async fn edit_form(&self, id: ConnectorId) -> Result<FormState, ServiceError> {
        let record = self.backend.get(id).await?;
        Ok(FormState::edit(&self.registry, &record)?)
    }

    /// Validate the form and persist it.
    ///
    /// Creates a record when the form was instantiated blank and updates the
    /// original record otherwise. Nothing is sent when validation fails.
    pub async fn save(&self, form: &FormState) -> Result<ConnectorRecord, ServiceError> {
        let validated = form.validate()?;
        let record_id = validated.record_id();
        let draft = validated.assemble();

        let record = match record_id {
            Some(id) => self.backend.update(id, &draft).await,
            None => self.backend.create(&draft).await,
        }
        .map_err(ClientError::into_save_error)?;

        info!(
            id = %record.id,
            type_id = %record.connector_type,
            created = record_id.is_none(),
            "saved connector"
        );
        Ok(record)
    }

    /// All stored connectors with their status summary.
    pub async fn list(&self) -> ClientResult<(Vec<ConnectorRecord>, ConnectorSummary)> {
        let records = self.backend.list().await?;
        let summary = ConnectorSummary::from_records(&records);
        debug!(total = summary.total, "listed connectors");
        Ok((records, summary))
    }

    /// Fetch one connector.
    pub async fn get(&self, id: ConnectorId) -> ClientResult<ConnectorRecord> {
        self.backend.get(id).await
    }

    /// Run a connection test.
    pub async fn test(&self, id: ConnectorId) -> ClientResult<ConnectionTestResult> {
        self.backend.test_connection(id).await
    }

    /// Delete a connector.
    pub async fn delete(&self, id: ConnectorId) -> ClientResult<()> {
        self.backend.delete(id).await
    }
}
