//! Collaborator traits.
//!
//! The registry source, persistence store and connection tester are the
//! form engine's only asynchronous boundaries. Each is a trait so the REST
//! client and the in-memory backend can be used interchangeably.

use std::future::Future;
use std::pin::Pin;

use op_schema::{ConnectionTestResult, ConnectorDraft, ConnectorId, ConnectorRecord, SchemaRegistry};

use crate::error::ClientResult;

/// Supplies connector type schemas.
pub trait RegistrySource: Send + Sync {
    /// Fetch the full type registry.
    fn fetch_types(&self) -> Pin<Box<dyn Future<Output = ClientResult<SchemaRegistry>> + Send + '_>>;
}

/// Persists connector records.
pub trait ConnectorStore: Send + Sync {
    /// List every connector.
    ///
    /// Records may come back without their configuration.
    fn list(&self) -> Pin<Box<dyn Future<Output = ClientResult<Vec<ConnectorRecord>>> + Send + '_>>;

    /// Fetch one connector.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ClientError::NotFound`] for an unknown id.
    fn get(
        &self,
        id: ConnectorId,
    ) -> Pin<Box<dyn Future<Output = ClientResult<ConnectorRecord>> + Send + '_>>;

    /// Persist a new connector and return the stored record.
    ///
    /// # Errors
    ///
    /// Every failure is reported as [`crate::ClientError::UnhandledSave`].
    fn create<'a>(
        &'a self,
        draft: &'a ConnectorDraft,
    ) -> Pin<Box<dyn Future<Output = ClientResult<ConnectorRecord>> + Send + 'a>>;

    /// Replace the editable parts of an existing connector.
    ///
    /// # Errors
    ///
    /// Every failure is reported as [`crate::ClientError::UnhandledSave`].
    fn update<'a>(
        &'a self,
        id: ConnectorId,
        draft: &'a ConnectorDraft,
    ) -> Pin<Box<dyn Future<Output = ClientResult<ConnectorRecord>> + Send + 'a>>;

    /// Delete a connector.
    fn delete(&self, id: ConnectorId) -> Pin<Box<dyn Future<Output = ClientResult<()>> + Send + '_>>;
}

/// Runs connection tests.
pub trait ConnectionTester: Send + Sync {
    /// Test a stored connector. Updates its status and `last_tested` as a
    /// side effect.
    fn test_connection(
        &self,
        id: ConnectorId,
    ) -> Pin<Box<dyn Future<Output = ClientResult<ConnectionTestResult>> + Send + '_>>;
}
