//! HTTP assembly for the rolo contact service.
//!
//! Builds the full application router — health and descriptor endpoints,
//! the `/api/contacts` REST surface, CORS, request tracing, and the JSON
//! 404 fallback. The binary in `main.rs` loads configuration and serves
//! this router.

use std::sync::Arc;

use axum::{
  Json, Router,
  http::{HeaderValue, Method, StatusCode, Uri, header},
  response::IntoResponse,
  routing::get,
};
use chrono::Utc;
use rolo_api::ApiState;
use rolo_store_memory::MemoryStore;
use serde::Deserialize;
use serde_json::json;
use tower_http::{
  cors::{AllowOrigin, Any, CorsLayer},
  trace::TraceLayer,
};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and the
/// `ROLO_`-prefixed environment. Every field has a default, so the server
/// starts with no configuration at all.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:            String,
  pub port:            u16,
  /// Origins allowed by CORS. An empty list yields a permissive
  /// any-origin layer for development.
  pub allowed_origins: Vec<String>,
  /// Surfaces internal error detail in responses.
  pub development:     bool,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:            "127.0.0.1".to_string(),
      port:            3000,
      allowed_origins: vec![
        "http://localhost:8080".to_string(),
        "http://127.0.0.1:8080".to_string(),
        "http://localhost".to_string(),
      ],
      development:     false,
    }
  }
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state for the whole application.
#[derive(Clone)]
pub struct AppState {
  pub store:  Arc<MemoryStore>,
  pub config: Arc<ServerConfig>,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router(state: AppState) -> Router {
  let api_state = ApiState {
    store:       state.store.clone(),
    development: state.config.development,
  };

  Router::new()
    .route("/health", get(health))
    .route("/", get(service_descriptor))
    .nest("/api/contacts", rolo_api::contacts_router(api_state))
    .fallback(not_found)
    .layer(TraceLayer::new_for_http())
    .layer(cors_layer(&state.config.allowed_origins))
}

/// CORS policy: the configured origin list with credentials, or a
/// permissive any-origin layer when no origins are configured.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
  let origins: Vec<HeaderValue> =
    allowed_origins.iter().filter_map(|o| o.parse().ok()).collect();

  if origins.is_empty() {
    CorsLayer::new()
      .allow_origin(Any)
      .allow_methods(Any)
      .allow_headers(Any)
  } else {
    CorsLayer::new()
      .allow_origin(AllowOrigin::list(origins))
      .allow_methods([
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
      ])
      .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
      .allow_credentials(true)
  }
}

// ─── Root handlers ───────────────────────────────────────────────────────────

/// `GET /health` — liveness probe.
async fn health() -> impl IntoResponse {
  Json(json!({
    "status":    "ok",
    "message":   "server is running",
    "timestamp": Utc::now().to_rfc3339(),
  }))
}

/// `GET /` — service descriptor listing the documented endpoints.
async fn service_descriptor() -> impl IntoResponse {
  Json(json!({
    "message": "rolo contact service",
    "version": env!("CARGO_PKG_VERSION"),
    "endpoints": {
      "health":   "/health",
      "contacts": "/api/contacts",
      "search":   "/api/contacts/search?keyword=…",
    },
  }))
}

/// Fallback for unmatched routes.
async fn not_found(uri: Uri) -> impl IntoResponse {
  (
    StatusCode::NOT_FOUND,
    Json(json!({
      "error":   "NotFoundError",
      "message": format!("resource {} not found", uri.path()),
    })),
  )
}

#[cfg(test)]
mod tests;
