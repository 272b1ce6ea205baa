#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::Path,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use backoffice_api::{ApiClient, MemorySessionStore, RecordingNavigator, SessionStore};
use serde_json::{json, Value};

/// Mock platform backend bound to a free local port
pub struct MockBackend {
    pub port: u16,
    pub base_url: String,
}

impl MockBackend {
    pub async fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind mock backend on {}", port))?;

        tokio::spawn(async move {
            let _ = axum::serve(listener, router()).await;
        });

        Ok(Self {
            port,
            base_url: format!("http://127.0.0.1:{}/api/", port),
        })
    }
}

/// Session store that counts how often it was cleared
#[derive(Default)]
pub struct CountingSessionStore {
    inner: MemorySessionStore,
    clears: AtomicUsize,
}

impl CountingSessionStore {
    pub fn with_token(token: &str) -> Self {
        Self {
            inner: MemorySessionStore::with_token(token),
            clears: AtomicUsize::new(0),
        }
    }

    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl SessionStore for CountingSessionStore {
    fn token(&self) -> Option<String> {
        self.inner.token()
    }

    fn clear(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.inner.clear();
    }
}

pub struct Harness {
    pub client: ApiClient,
    pub session: Arc<CountingSessionStore>,
    pub navigator: Arc<RecordingNavigator>,
}

pub fn harness(base_url: &str, token: Option<&str>) -> Result<Harness> {
    let session = Arc::new(match token {
        Some(token) => CountingSessionStore::with_token(token),
        None => CountingSessionStore::default(),
    });
    let navigator = Arc::new(RecordingNavigator::new());
    let client = ApiClient::builder(base_url)
        .session(session.clone())
        .navigator(navigator.clone())
        .build()?;

    Ok(Harness {
        client,
        session,
        navigator,
    })
}

fn router() -> Router {
    Router::new()
        .route("/api/ok", get(ok))
        .route("/api/legacy", get(legacy))
        .route("/api/precedence", get(precedence))
        .route("/api/errors", get(declared_errors))
        .route("/api/empty", get(no_content).delete(no_content))
        .route("/api/expired", get(token_message))
        .route("/api/unauthorized", get(unauthorized))
        .route("/api/forbidden", get(forbidden))
        .route("/api/token-rejected", get(token_rejected))
        .route("/api/coded", get(coded_rejection))
        .route("/api/invoices", post(invalid_amount))
        .route("/api/crash", get(crash))
        .route("/api/whoami", get(whoami))
        .route("/api/clients", get(list_clients).post(create_client))
        .route(
            "/api/clients/:id",
            get(show_client).put(update_client).delete(no_content),
        )
}

async fn ok() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {"id": 1, "name": "Agence Centrale"},
        "message": "Chargé"
    }))
}

async fn legacy() -> Json<Value> {
    Json(json!({"etat": true, "result": [{"id": 7}]}))
}

async fn precedence() -> Json<Value> {
    Json(json!({"data": "Y", "result": "Z", "success": false}))
}

async fn declared_errors() -> Json<Value> {
    Json(json!({
        "success": false,
        "message": "Validation échouée",
        "errors": ["email requis", "téléphone invalide"]
    }))
}

async fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn token_message() -> Json<Value> {
    Json(json!({"success": false, "message": "Invalid token provided"}))
}

async fn unauthorized() -> (StatusCode, Json<Value>) {
    (StatusCode::UNAUTHORIZED, Json(json!({"message": "nope"})))
}

async fn forbidden() -> (StatusCode, Json<Value>) {
    (StatusCode::FORBIDDEN, Json(json!({"message": "Unauthorized access"})))
}

async fn token_rejected() -> (StatusCode, Json<Value>) {
    (StatusCode::FORBIDDEN, Json(json!({"message": "Token expired"})))
}

async fn coded_rejection() -> (StatusCode, Json<Value>) {
    (
        StatusCode::FORBIDDEN,
        Json(json!({"message": "Accès refusé", "code": "TOKEN_EXPIRED"})),
    )
}

async fn invalid_amount() -> (StatusCode, Json<Value>) {
    (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({"message": "Invalid amount"})))
}

async fn crash() -> (StatusCode, &'static str) {
    (StatusCode::BAD_GATEWAY, "<html>bad gateway</html>")
}

async fn whoami(headers: HeaderMap) -> Json<Value> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    Json(json!({
        "success": true,
        "data": {
            "authorization": header("authorization"),
            "content_type": header("content-type"),
            "request_id": header("x-request-id"),
        }
    }))
}

async fn list_clients() -> Json<Value> {
    Json(json!({"success": true, "data": [{"id": "c1"}, {"id": "c2"}]}))
}

async fn create_client(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::CREATED,
        Json(json!({"success": true, "data": body, "message": "Client créé"})),
    )
}

async fn show_client(Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    if id == "missing" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Client introuvable"})),
        );
    }
    (StatusCode::OK, Json(json!({"success": true, "data": {"id": id}})))
}

async fn update_client(Path(id): Path<String>, Json(body): Json<Value>) -> Json<Value> {
    Json(json!({"etat": true, "result": {"id": id, "changes": body}}))
}
