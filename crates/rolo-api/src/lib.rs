//! JSON REST API for the rolo contact service.
//!
//! Exposes an axum [`Router`] backed by any
//! [`rolo_core::store::ContactStore`]. Transport concerns (CORS, request
//! tracing, listening sockets) are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api/contacts", rolo_api::contacts_router(state))
//! ```

pub mod contacts;
pub mod error;

use std::sync::Arc;

use axum::{Router, routing::get};
use rolo_core::store::ContactStore;

pub use error::ApiError;

/// State threaded through all API handlers.
pub struct ApiState<S> {
  pub store:       Arc<S>,
  /// When set, internal error responses carry the underlying detail in
  /// `details`; otherwise the detail stays in the server log.
  pub development: bool,
}

// A manual impl so `S` itself does not need to be `Clone`.
impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), development: self.development }
  }
}

/// Build a fully-materialised `/contacts` router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn contacts_router<S>(state: ApiState<S>) -> Router<()>
where
  S: ContactStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/", get(contacts::list::<S>).post(contacts::create::<S>))
    .route("/stats", get(contacts::stats::<S>))
    .route("/search", get(contacts::search::<S>))
    .route(
      "/{id}",
      get(contacts::get_one::<S>)
        .put(contacts::update_one::<S>)
        .delete(contacts::delete_one::<S>),
    )
    .with_state(state)
}
