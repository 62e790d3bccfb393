//! Axum HTTP API: the item resource and the `/nl2sql` placeholder.

mod items;
mod nl2sql;

pub use items::ItemStore;

use crate::config::ServerConfig;
use anyhow::{Context, Result};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Maximum request body size (64KB)
pub const MAX_BODY_SIZE: usize = 65_536;
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Shared state for all axum handlers
#[derive(Clone, Default)]
pub struct AppState {
    pub items: ItemStore,
}

/// GET /
async fn handle_root() -> impl IntoResponse {
    Json(serde_json::json!({"message": "Welcome to the Sample sqlchat API"}))
}

pub fn router(items: ItemStore) -> Router {
    let state = AppState { items };

    Router::new()
        .route("/", get(handle_root))
        .route(
            "/api/items",
            get(items::handle_list_items).post(items::handle_create_item),
        )
        .route("/api/items/{id}", get(items::handle_get_item))
        .route("/nl2sql", post(nl2sql::handle_nl2sql))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        ))
}

pub async fn run_server(config: ServerConfig) -> Result<()> {
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let local_addr = listener.local_addr()?;

    tracing::info!(%local_addr, "sqlchat API listening");
    tracing::info!("  GET  /");
    tracing::info!("  GET  /api/items");
    tracing::info!("  POST /api/items");
    tracing::info!("  GET  /api/items/{{id}}");
    tracing::info!("  POST /nl2sql");

    axum::serve(listener, router(ItemStore::default()))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(request)
            .await
            .expect("router should respond");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body should collect")
            .to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request should build")
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request should build")
    }

    #[test]
    fn security_body_limit_is_64kb() {
        assert_eq!(MAX_BODY_SIZE, 65_536);
    }

    #[tokio::test]
    async fn root_welcomes() {
        let app = router(ItemStore::default());
        let (status, body) = send(&app, get_request("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"]
            .as_str()
            .is_some_and(|message| message.starts_with("Welcome")));
    }

    #[tokio::test]
    async fn create_then_get_item() {
        let app = router(ItemStore::default());

        let (status, created) = send(
            &app,
            post_json(
                "/api/items",
                json!({"name": "Test item", "description": "desc"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["id"], 1);

        let (status, fetched) = send(&app, get_request("/api/items/1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["name"], "Test item");
        assert_eq!(fetched["description"], "desc");

        let (status, listed) = send(&app, get_request("/api/items")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn missing_item_is_not_found() {
        let app = router(ItemStore::default());
        let (status, body) = send(&app, get_request("/api/items/999")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"detail": "Item not found"}));
    }

    #[tokio::test]
    async fn create_without_name_is_rejected() {
        let app = router(ItemStore::default());
        let (status, _) = send(&app, post_json("/api/items", json!({"description": "x"}))).await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn nl2sql_returns_sql_and_rows() {
        let app = router(ItemStore::default());
        let (status, body) = send(
            &app,
            post_json("/nl2sql", json!({"query": "List discounted orders."})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sql"], "SELECT * FROM orders LIMIT 5;");
        assert_eq!(body["rows"].as_array().map(Vec::len), Some(5));
    }
}
