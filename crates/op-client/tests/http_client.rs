//! `ApiClient` against a platform API served by axum on an ephemeral port.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use op_client::{
    ApiClient, ClientConfig, ClientError, ConnectionTester, ConnectorService, ConnectorStore,
    MemoryBackend, RegistryOrigin, ServiceError, load_registry,
};
use op_schema::{ConnectorDraft, ConnectorId, ConnectorRecord, ConnectorStatus, FieldKind};
use serde_json::{Value, json};

const TOKEN: &str = "s3cr3t";

type Backend = Arc<MemoryBackend>;
type ApiError = (StatusCode, Json<Value>);

fn detail(status: StatusCode, message: &str) -> ApiError {
    (status, Json(json!({ "detail": message })))
}

fn to_api_error(err: ClientError) -> ApiError {
    match err {
        ClientError::NotFound { .. } => detail(StatusCode::NOT_FOUND, "Connector not found"),
        other => detail(StatusCode::INTERNAL_SERVER_ERROR, &other.to_string()),
    }
}

fn authorized(headers: &HeaderMap) -> Result<(), ApiError> {
    let expected = format!("Bearer {TOKEN}");
    match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(detail(StatusCode::UNAUTHORIZED, "Not authenticated")),
    }
}

async fn types() -> Json<Value> {
    Json(json!({
        "sap": {
            "name": "SAP",
            "description": "Connect to SAP ERP",
            "icon": "sap",
            "config_schema": {
                "host": {"type": "string", "label": "Host", "required": true},
                "client": {"type": "string", "label": "Client", "default": "100"},
                "username": {"type": "string", "label": "Username", "required": true},
                "password": {"type": "password", "label": "Password", "required": true}
            }
        },
        "email": {
            "name": "Email",
            "description": "SMTP/IMAP servers",
            "config_schema": {
                "host": {"type": "string", "label": "Host", "required": true},
                "port": {"type": "number", "label": "Port", "default": 587},
                "use_tls": {"type": "boolean", "label": "Use TLS", "default": true}
            }
        }
    }))
}

async fn list(
    State(backend): State<Backend>,
    headers: HeaderMap,
) -> Result<Json<Vec<Value>>, ApiError> {
    authorized(&headers)?;
    let records = backend.list().await.map_err(to_api_error)?;
    // The platform omits configuration from listings.
    let rows = records
        .into_iter()
        .map(|r| {
            json!({
                "id": r.id,
                "name": r.name,
                "description": r.description,
                "type": r.connector_type,
                "status": r.status,
                "last_tested": r.last_tested,
            })
        })
        .collect();
    Ok(Json(rows))
}

async fn create(
    State(backend): State<Backend>,
    Json(draft): Json<ConnectorDraft>,
) -> Result<Json<ConnectorRecord>, ApiError> {
    if draft.name == "explode" {
        return Err(detail(StatusCode::INTERNAL_SERVER_ERROR, "database is locked"));
    }
    backend.create(&draft).await.map(Json).map_err(to_api_error)
}

async fn fetch(
    State(backend): State<Backend>,
    Path(id): Path<u64>,
) -> Result<Json<ConnectorRecord>, ApiError> {
    backend
        .get(ConnectorId::new(id))
        .await
        .map(Json)
        .map_err(to_api_error)
}

async fn update(
    State(backend): State<Backend>,
    Path(id): Path<u64>,
    Json(draft): Json<ConnectorDraft>,
) -> Result<Json<ConnectorRecord>, ApiError> {
    let id = ConnectorId::new(id);
    backend.get(id).await.map_err(to_api_error)?;
    backend.update(id, &draft).await.map(Json).map_err(to_api_error)
}

async fn remove(
    State(backend): State<Backend>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, ApiError> {
    backend
        .delete(ConnectorId::new(id))
        .await
        .map_err(to_api_error)?;
    Ok(Json(json!({"message": "Connector deleted"})))
}

async fn test_connection(
    State(backend): State<Backend>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, ApiError> {
    let result = backend
        .test_connection(ConnectorId::new(id))
        .await
        .map_err(to_api_error)?;
    Ok(Json(json!(result)))
}

async fn serve() -> (String, Backend) {
    let backend = Arc::new(MemoryBackend::new());
    let api = Router::new()
        .route("/connectors/types", get(types))
        .route("/connectors", get(list).post(create))
        .route("/connectors/{id}", get(fetch).put(update).delete(remove))
        .route("/connectors/{id}/test", post(test_connection));
    let app = Router::new().nest("/api", api).with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/api"), backend)
}

fn client(base: &str) -> ApiClient {
    ApiClient::new(ClientConfig::new(base).with_token(TOKEN)).unwrap()
}

#[tokio::test]
async fn remote_registry_is_decoded_in_order() {
    let (base, _) = serve().await;
    let (registry, origin) = load_registry(&client(&base)).await;

    assert_eq!(origin, RegistryOrigin::Remote);
    assert_eq!(registry.type_ids().collect::<Vec<_>>(), ["sap", "email"]);

    let sap = registry.lookup("sap").unwrap();
    assert_eq!(sap.icon.as_deref(), Some("sap"));
    assert_eq!(
        sap.field_keys().collect::<Vec<_>>(),
        ["host", "client", "username", "password"]
    );

    let email = registry.lookup("email").unwrap();
    assert_eq!(email.field("use_tls").unwrap().kind, FieldKind::String);
}

#[tokio::test]
async fn unreachable_backend_falls_back_to_builtin() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = client(&format!("http://{addr}/api"));
    let (registry, origin) = load_registry(&api).await;
    assert_eq!(origin, RegistryOrigin::Builtin);
    assert!(registry.contains("azure_blob"));

    let err = api.list().await.unwrap_err();
    assert!(matches!(err, ClientError::Unavailable { .. }));
}

#[tokio::test]
async fn save_test_and_list_through_the_api() {
    let (base, backend) = serve().await;
    let service = ConnectorService::connect(client(&base)).await;

    let mut form = service.new_form("sap").unwrap();
    assert_eq!(form.value("client"), Some(&json!("100")));
    form.set("name", "SAP Production").unwrap();
    form.set("host", "erp.example.com").unwrap();
    form.set("username", "RFC_USER").unwrap();
    form.set("password", "pw").unwrap();

    let created = service.save(&form).await.unwrap();
    assert_eq!(created.id, ConnectorId::new(1));
    assert_eq!(created.status, ConnectorStatus::Inactive);
    assert_eq!(backend.len(), 1);

    let result = service.test(created.id).await.unwrap();
    assert!(result.success);
    assert_eq!(result.status, Some(ConnectorStatus::Active));

    let (records, summary) = service.list().await.unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].config.is_empty());
    assert!(records[0].last_tested.is_some());
    assert_eq!(summary.active, 1);
}

#[tokio::test]
async fn edit_round_trip_updates_in_place() {
    let (base, _) = serve().await;
    let service = ConnectorService::connect(client(&base)).await;

    let mut form = service.new_form("email").unwrap();
    form.set("name", "Mail").unwrap();
    form.set("host", "smtp.example.com").unwrap();
    let created = service.save(&form).await.unwrap();
    assert_eq!(created.config["port"], json!(587));

    let mut form = service.edit_form(created.id).await.unwrap();
    form.set("port", "2525").unwrap();
    let updated = service.save(&form).await.unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.config["port"], json!(2525));
    assert_eq!(service.get(created.id).await.unwrap().config["port"], json!(2525));
}

#[tokio::test]
async fn failed_create_is_unhandled_save() {
    let (base, _) = serve().await;
    let service = ConnectorService::connect(client(&base)).await;

    let mut form = service.new_form("email").unwrap();
    form.set("name", "explode").unwrap();
    form.set("host", "smtp.example.com").unwrap();

    let err = service.save(&form).await.unwrap_err();
    assert_eq!(
        err,
        ServiceError::Save(ClientError::unhandled_save("database is locked"))
    );
}

#[tokio::test]
async fn missing_connector_maps_to_not_found() {
    let (base, _) = serve().await;
    let api = client(&base);
    let id = ConnectorId::new(99);

    assert_eq!(api.get(id).await.unwrap_err(), ClientError::NotFound { id });
    assert_eq!(api.delete(id).await.unwrap_err(), ClientError::NotFound { id });
    assert_eq!(
        api.test_connection(id).await.unwrap_err(),
        ClientError::NotFound { id }
    );
}

#[tokio::test]
async fn missing_token_is_rejected() {
    let (base, _) = serve().await;
    let api = ApiClient::new(ClientConfig::new(&base)).unwrap();

    assert_eq!(
        api.list().await.unwrap_err(),
        ClientError::Status {
            status: 401,
            message: "Not authenticated".into(),
        }
    );
}
