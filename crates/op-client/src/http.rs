//! REST client for the platform API.

use std::future::Future;
use std::pin::Pin;

use op_schema::{ConnectionTestResult, ConnectorDraft, ConnectorId, ConnectorRecord, SchemaRegistry};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::traits::{ConnectionTester, ConnectorStore, RegistrySource};

/// Error body returned by the platform API.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Value,
}

/// Client for the `/connectors` endpoints of the platform API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ApiClient {
    /// Create a client with the given configuration.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::unavailable(e.to_string()))?;
        Ok(Self { http, config })
    }

    /// The client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.http.request(method, self.config.url(path));
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let response = check_status(response).await?;
        response.json::<T>().await.map_err(|e| ClientError::decode(e.to_string()))
    }

    async fn fetch_types_inner(&self) -> ClientResult<SchemaRegistry> {
        let value: Value = self.send(self.request(Method::GET, "connectors/types")).await?;
        let registry =
            SchemaRegistry::from_value(value).map_err(|e| ClientError::decode(e.to_string()))?;
        debug!(types = registry.len(), "fetched connector types");
        Ok(registry)
    }

    async fn get_inner(&self, id: ConnectorId) -> ClientResult<ConnectorRecord> {
        self.send(self.request(Method::GET, &format!("connectors/{id}")))
            .await
            .map_err(|e| not_found(e, id))
    }

    async fn create_inner(&self, draft: &ConnectorDraft) -> ClientResult<ConnectorRecord> {
        let record: ConnectorRecord = self
            .send(self.request(Method::POST, "connectors").json(draft))
            .await
            .map_err(ClientError::into_save_error)?;
        debug!(id = %record.id, type_id = %record.connector_type, "created connector");
        Ok(record)
    }

    async fn update_inner(
        &self,
        id: ConnectorId,
        draft: &ConnectorDraft,
    ) -> ClientResult<ConnectorRecord> {
        let record: ConnectorRecord = self
            .send(self.request(Method::PUT, &format!("connectors/{id}")).json(draft))
            .await
            .map_err(ClientError::into_save_error)?;
        debug!(id = %record.id, "updated connector");
        Ok(record)
    }

    async fn delete_inner(&self, id: ConnectorId) -> ClientResult<()> {
        let _: Value = self
            .send(self.request(Method::DELETE, &format!("connectors/{id}")))
            .await
            .map_err(|e| not_found(e, id))?;
        debug!(id = %id, "deleted connector");
        Ok(())
    }

    async fn test_inner(&self, id: ConnectorId) -> ClientResult<ConnectionTestResult> {
        let result: ConnectionTestResult = self
            .send(self.request(Method::POST, &format!("connectors/{id}/test")))
            .await
            .map_err(|e| not_found(e, id))?;
        debug!(id = %id, success = result.success, "connection test finished");
        Ok(result)
    }
}

/// Turn a non-success response into [`ClientError::Status`].
async fn check_status(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        message: error_message(status, &body),
    })
}

/// Extract the human-readable message from an error body.
fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: Value::String(detail),
        }) => detail,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    }
}

fn not_found(err: ClientError, id: ConnectorId) -> ClientError {
    match err {
        ClientError::Status { status: 404, .. } => ClientError::NotFound { id },
        other => other,
    }
}

impl RegistrySource for ApiClient {
    fn fetch_types(&self) -> Pin<Box<dyn Future<Output = ClientResult<SchemaRegistry>> + Send + '_>> {
        Box::pin(self.fetch_types_inner())
    }
}

impl ConnectorStore for ApiClient {
    fn list(&self) -> Pin<Box<dyn Future<Output = ClientResult<Vec<ConnectorRecord>>> + Send + '_>> {
        Box::pin(self.send(self.request(Method::GET, "connectors")))
    }

    fn get(
        &self,
        id: ConnectorId,
    ) -> Pin<Box<dyn Future<Output = ClientResult<ConnectorRecord>> + Send + '_>> {
        Box::pin(self.get_inner(id))
    }

    fn create<'a>(
        &'a self,
        draft: &'a ConnectorDraft,
    ) -> Pin<Box<dyn Future<Output = ClientResult<ConnectorRecord>> + Send + 'a>> {
        Box::pin(self.create_inner(draft))
    }

    fn update<'a>(
        &'a self,
        id: ConnectorId,
        draft: &'a ConnectorDraft,
    ) -> Pin<Box<dyn Future<Output = ClientResult<ConnectorRecord>> + Send + 'a>> {
        Box::pin(self.update_inner(id, draft))
    }

    fn delete(&self, id: ConnectorId) -> Pin<Box<dyn Future<Output = ClientResult<()>> + Send + '_>> {
        Box::pin(self.delete_inner(id))
    }
}

impl ConnectionTester for ApiClient {
    fn test_connection(
        &self,
        id: ConnectorId,
    ) -> Pin<Box<dyn Future<Output = ClientResult<ConnectionTestResult>> + Send + '_>> {
        Box::pin(self.test_inner(id))
    }
}
