//! API error taxonomy and its [`axum::response::IntoResponse`] boundary.
//!
//! Handlers raise an [`ApiError`] value at the point of detection; this
//! module is the single layer converting every variant into a
//! `{error, message, details?}` JSON body.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Malformed input; carries one message per violated rule.
  #[error("input validation failed")]
  Validation(Vec<String>),

  /// No record for the given identifier.
  #[error("{0} not found")]
  NotFound(String),

  /// The operation would violate the phone-uniqueness invariant.
  #[error("{0}")]
  Conflict(String),

  /// Unexpected failure inside a handler. `detail` is populated only when
  /// the server runs in development mode and joins the response body.
  #[error("{message}")]
  Internal {
    message: String,
    detail:  Option<String>,
  },

  /// The store backend failed.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Shorthand for a single-message validation failure.
  pub fn invalid(message: impl Into<String>) -> Self {
    Self::Validation(vec![message.into()])
  }

  /// Shorthand for a missing-resource failure.
  pub fn not_found(resource: impl Into<String>) -> Self {
    Self::NotFound(resource.into())
  }

  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    if let ApiError::Store(e) = &self {
      tracing::error!(error = %e, "store backend failure");
    }

    let (status, kind, message, details) = match self {
      ApiError::Validation(errors) => (
        StatusCode::BAD_REQUEST,
        "ValidationError",
        "input validation failed".to_string(),
        Some(errors),
      ),
      ApiError::NotFound(resource) => (
        StatusCode::NOT_FOUND,
        "NotFoundError",
        format!("{resource} not found"),
        None,
      ),
      ApiError::Conflict(message) => {
        (StatusCode::CONFLICT, "ConflictError", message, None)
      }
      ApiError::Internal { message, detail } => (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Error",
        message,
        detail.map(|d| vec![d]),
      ),
      ApiError::Store(_) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Error",
        "internal server error".to_string(),
        None,
      ),
    };

    tracing::error!(status = status.as_u16(), "{kind}: {message}");

    let mut body = json!({ "error": kind, "message": message });
    if let Some(details) = details {
      body["details"] = json!(details);
    }

    (status, Json(body)).into_response()
  }
}
