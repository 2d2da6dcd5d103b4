use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tracing::info;

use super::backend::SessionBackend;
use super::resolve::{RequestCredentials, SessionResolver};

#[derive(Clone)]
struct AppState {
    resolver: SessionResolver,
}

/// Router exposing the session endpoint backed by `backend`.
pub fn router(backend: Arc<dyn SessionBackend>) -> Router {
    Router::new().route("/api/me", get(me)).with_state(AppState {
        resolver: SessionResolver::new(backend),
    })
}

async fn me(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let credentials = RequestCredentials::new(
        header_str(&headers, header::AUTHORIZATION),
        header_str(&headers, header::COOKIE),
    );
    match state.resolver.resolve(&credentials).await {
        Some(identity) => (StatusCode::OK, Json(identity)).into_response(),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": "Unauthorized" })),
        )
            .into_response(),
    }
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<&str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Bind and serve the session endpoint until the process is stopped.
pub async fn serve(addr: SocketAddr, backend: Arc<dyn SessionBackend>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "session endpoint listening");
    axum::serve(listener, router(backend)).await
}
