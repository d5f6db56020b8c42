//! Shared harness for API integration tests.
//!
//! Mirrors the router construction in `main.rs` so tests exercise the same
//! middleware stack (CORS, request ID, timeout, tracing, panic recovery)
//! that production uses.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use helpdesk_api::auth::jwt::{generate_access_token, JwtConfig};
use helpdesk_api::config::ServerConfig;
use helpdesk_api::router::build_app_router;
use helpdesk_api::state::AppState;
use helpdesk_api::tickets::TicketService;
use helpdesk_notify::Notifier;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        sweep_interval_secs: 3600,
        jwt: JwtConfig {
            secret: "test-secret-not-for-production".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router over the given pool, with
/// notifications in log-only mode.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let tickets = Arc::new(TicketService::new(
        pool.clone(),
        Arc::new(Notifier::disabled()),
    ));
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        tickets,
    };
    build_app_router(state, &config)
}

/// A `Bearer` header value for a synthetic user.
pub fn bearer(user_id: i64, email: &str, role: &str) -> String {
    let config = test_config();
    let token = generate_access_token(user_id, email, role, &config.jwt).unwrap();
    format!("Bearer {token}")
}

/// Issue a request and return `(status, parsed JSON body)`.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    auth: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    let request = builder
        .body(match body {
            Some(json) => Body::from(json.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response: Response<_> = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
