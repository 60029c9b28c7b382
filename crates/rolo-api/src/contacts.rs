//! Handlers for the `/contacts` endpoints.
//!
//! | Method   | Path      | Notes |
//! |----------|-----------|-------|
//! | `GET`    | `/`       | Full collection |
//! | `GET`    | `/stats`  | Aggregate counts, computed fresh per call |
//! | `GET`    | `/search` | `?keyword=`; blank keyword falls back to the full list |
//! | `GET`    | `/{id}`   | 404 if not found |
//! | `POST`   | `/`       | 201 + created record, 409 on duplicate phone |
//! | `PUT`    | `/{id}`   | Partial update; absent fields stay untouched |
//! | `DELETE` | `/{id}`   | Acknowledgement body |
//!
//! Each handler sequences identifier validation, existence checks, payload
//! validation, the phone-uniqueness check, and the store call, mapping
//! every failure onto an [`ApiError`] variant.

use axum::{
  Json,
  extract::{Path, Query, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use rolo_core::{
  contact::Contact, sanitize::sanitize_payload, store::ContactStore, validate,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ApiState, error::ApiError};

const INVALID_ID: &str = "invalid contact id";
const DUPLICATE_PHONE: &str = "phone number already in use";
const RESOURCE: &str = "contact";

/// Extract the JSON body, folding unparseable bodies into the same
/// validation failure as a non-object payload.
fn read_body(
  body: Result<Json<Value>, JsonRejection>,
) -> Result<Value, ApiError> {
  match body {
    Ok(Json(value)) => Ok(value),
    Err(_) => Err(ApiError::invalid(validate::PAYLOAD_NOT_OBJECT)),
  }
}

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /contacts`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<Contact>>, ApiError>
where
  S: ContactStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let contacts = state.store.list_all().await.map_err(ApiError::store)?;
  Ok(Json(contacts))
}

// ─── Stats ───────────────────────────────────────────────────────────────────

/// Aggregate counts for `GET /contacts/stats`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactStats {
  pub total_count:         usize,
  pub with_email_count:    usize,
  pub without_email_count: usize,
}

/// `GET /contacts/stats` — derived fresh from the collection on every call.
pub async fn stats<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<ContactStats>, ApiError>
where
  S: ContactStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let contacts = state.store.list_all().await.map_err(ApiError::store)?;
  let total_count = contacts.len();
  let with_email_count =
    contacts.iter().filter(|c| c.email.is_some()).count();

  Ok(Json(ContactStats {
    total_count,
    with_email_count,
    without_email_count: total_count - with_email_count,
  }))
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SearchParams {
  pub keyword: Option<String>,
}

/// `GET /contacts/search?keyword=K`
///
/// A missing or blank keyword falls back to the full list rather than
/// failing validation.
pub async fn search<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Contact>>, ApiError>
where
  S: ContactStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let keyword = params.keyword.unwrap_or_default();
  if !validate::is_valid_search_keyword(&keyword) {
    let contacts = state.store.list_all().await.map_err(ApiError::store)?;
    return Ok(Json(contacts));
  }

  let contacts =
    state.store.search(&keyword).await.map_err(ApiError::store)?;
  Ok(Json(contacts))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /contacts/{id}`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<Json<Contact>, ApiError>
where
  S: ContactStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if !validate::is_valid_id(&id) {
    return Err(ApiError::invalid(INVALID_ID));
  }

  let contact = state
    .store
    .get_by_id(&id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::not_found(RESOURCE))?;
  Ok(Json(contact))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /contacts` — body: `{"name": …, "phone": …, "email"?: …}`.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContactStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let payload = read_body(body)?;

  let report = validate::validate_contact_payload(&payload, false);
  if !report.valid {
    return Err(ApiError::Validation(report.errors));
  }

  let patch = sanitize_payload(&payload);
  let Some(data) = patch.into_new_contact() else {
    // A full payload that passed validation always carries both fields.
    return Err(ApiError::Internal {
      message: "failed to assemble contact".to_string(),
      detail:  None,
    });
  };

  if state
    .store
    .exists_by_phone(&data.phone, None)
    .await
    .map_err(ApiError::store)?
  {
    return Err(ApiError::Conflict(DUPLICATE_PHONE.to_string()));
  }

  let contact = state.store.create(data).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(contact)))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PUT /contacts/{id}` — partial body; absent fields are left untouched.
pub async fn update_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Contact>, ApiError>
where
  S: ContactStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if !validate::is_valid_id(&id) {
    return Err(ApiError::invalid(INVALID_ID));
  }

  let existing = state
    .store
    .get_by_id(&id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::not_found(RESOURCE))?;

  let payload = read_body(body)?;
  let report = validate::validate_contact_payload(&payload, true);
  if !report.valid {
    return Err(ApiError::Validation(report.errors));
  }

  let patch = sanitize_payload(&payload);

  // Uniqueness is only re-checked when the phone actually changes; keeping
  // one's own number is never a conflict.
  if let Some(phone) = &patch.phone
    && *phone != existing.phone
    && state
      .store
      .exists_by_phone(phone, Some(&id))
      .await
      .map_err(ApiError::store)?
  {
    return Err(ApiError::Conflict(DUPLICATE_PHONE.to_string()));
  }

  let updated = state
    .store
    .update(&id, patch)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::not_found(RESOURCE))?;
  Ok(Json(updated))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// Acknowledgement body for `DELETE /contacts/{id}`.
#[derive(Debug, Serialize)]
pub struct DeleteAck {
  pub success: bool,
  pub message: String,
}

/// `DELETE /contacts/{id}`
pub async fn delete_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<Json<DeleteAck>, ApiError>
where
  S: ContactStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if !validate::is_valid_id(&id) {
    return Err(ApiError::invalid(INVALID_ID));
  }

  state
    .store
    .get_by_id(&id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::not_found(RESOURCE))?;

  let removed = state.store.delete(&id).await.map_err(ApiError::store)?;
  if !removed {
    // Unreachable while each store call is atomic; kept as a fallback in
    // case the existence check and the removal ever disagree.
    return Err(ApiError::Internal {
      message: "failed to delete contact".to_string(),
      detail:  state.development.then(|| {
        format!("contact {id} vanished between existence check and removal")
      }),
    });
  }

  Ok(Json(DeleteAck {
    success: true,
    message: "contact deleted".to_string(),
  }))
}
