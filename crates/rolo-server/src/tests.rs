//! Integration tests driving the full router through `tower::oneshot`.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
};
use chrono::{DateTime, Utc};
use rolo_store_memory::MemoryStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{AppState, ServerConfig};

fn make_state(store: MemoryStore) -> AppState {
  AppState {
    store:  Arc::new(store),
    config: Arc::new(ServerConfig::default()),
  }
}

async fn send(
  state: AppState,
  method: &str,
  uri: &str,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  let req = builder.body(body).unwrap();

  let resp = crate::router(state).oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes =
    axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

fn timestamp(record: &Value, field: &str) -> DateTime<Utc> {
  DateTime::parse_from_rfc3339(record[field].as_str().unwrap())
    .unwrap()
    .with_timezone(&Utc)
}

// ── Service endpoints ────────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_ok() {
  let state = make_state(MemoryStore::new());
  let (status, body) = send(state, "GET", "/health", None).await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "ok");
  assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn root_lists_documented_endpoints() {
  let state = make_state(MemoryStore::new());
  let (status, body) = send(state, "GET", "/", None).await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["endpoints"]["health"], "/health");
  assert_eq!(body["endpoints"]["contacts"], "/api/contacts");
}

#[tokio::test]
async fn unmatched_route_returns_json_404() {
  let state = make_state(MemoryStore::new());
  let (status, body) = send(state, "GET", "/nope", None).await;

  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "NotFoundError");
  assert!(body["message"].as_str().unwrap().contains("/nope"));
}

// ── List / get ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_returns_seeded_contacts_in_order() {
  let state = make_state(MemoryStore::seeded());
  let (status, body) = send(state, "GET", "/api/contacts", None).await;

  assert_eq!(status, StatusCode::OK);
  let list = body.as_array().unwrap();
  assert_eq!(list.len(), 3);
  assert_eq!(list[0]["id"], "1");
  assert_eq!(list[0]["name"], "张三");
  assert_eq!(list[2]["email"], Value::Null);
}

#[tokio::test]
async fn get_by_seeded_id_returns_record() {
  let state = make_state(MemoryStore::seeded());
  let (status, body) = send(state, "GET", "/api/contacts/1", None).await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["name"], "张三");
  assert_eq!(body["phone"], "13800138001");
}

#[tokio::test]
async fn get_with_malformed_id_returns_400() {
  let state = make_state(MemoryStore::seeded());
  let (status, body) = send(state, "GET", "/api/contacts/abc!", None).await;

  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "ValidationError");
  assert_eq!(body["details"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn get_with_unknown_id_returns_404() {
  let state = make_state(MemoryStore::seeded());
  let (status, body) = send(state, "GET", "/api/contacts/99", None).await;

  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "NotFoundError");
}

// ── Create ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_returns_201_with_generated_id_and_null_email() {
  let state = make_state(MemoryStore::new());
  let (status, body) = send(
    state,
    "POST",
    "/api/contacts",
    Some(json!({ "name": "张三", "phone": "13800138001" })),
  )
  .await;

  assert_eq!(status, StatusCode::CREATED);
  assert!(rolo_core::validate::is_valid_id(body["id"].as_str().unwrap()));
  assert_eq!(body["email"], Value::Null);
  assert_eq!(timestamp(&body, "createdAt"), timestamp(&body, "updatedAt"));
}

#[tokio::test]
async fn create_trims_name_and_nulls_empty_email() {
  let state = make_state(MemoryStore::new());
  let (status, body) = send(
    state,
    "POST",
    "/api/contacts",
    Some(json!({
      "name":  "  张三 ",
      "phone": "13800138001",
      "email": "",
    })),
  )
  .await;

  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["name"], "张三");
  assert_eq!(body["phone"], "13800138001");
  assert_eq!(body["email"], Value::Null);
}

#[tokio::test]
async fn create_with_duplicate_phone_conflicts() {
  let state = make_state(MemoryStore::new());
  let payload = json!({ "name": "张三", "phone": "13800138001" });

  let (status, _) =
    send(state.clone(), "POST", "/api/contacts", Some(payload)).await;
  assert_eq!(status, StatusCode::CREATED);

  let (status, body) = send(
    state,
    "POST",
    "/api/contacts",
    Some(json!({ "name": "李四", "phone": "13800138001" })),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["error"], "ConflictError");
}

#[tokio::test]
async fn create_accumulates_all_validation_errors() {
  let state = make_state(MemoryStore::new());
  let (status, body) = send(
    state,
    "POST",
    "/api/contacts",
    Some(json!({ "name": "  ", "phone": "123", "email": "nope" })),
  )
  .await;

  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "ValidationError");
  let details = body["details"].as_array().unwrap();
  assert_eq!(details.len(), 3);
  assert!(details[0].as_str().unwrap().contains("name"));
  assert!(details[1].as_str().unwrap().contains("phone"));
  assert!(details[2].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn create_rejects_non_object_body() {
  let state = make_state(MemoryStore::new());
  let (status, body) =
    send(state, "POST", "/api/contacts", Some(json!([1, 2, 3]))).await;

  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "ValidationError");
  assert_eq!(body["details"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn create_rejects_unparseable_body() {
  let state = make_state(MemoryStore::new());
  let req = Request::builder()
    .method("POST")
    .uri("/api/contacts")
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from("not json"))
    .unwrap();

  let resp = crate::router(state).oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ── Update ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_merges_partial_payload() {
  let state = make_state(MemoryStore::new());
  let (_, created) = send(
    state.clone(),
    "POST",
    "/api/contacts",
    Some(json!({ "name": "张三", "phone": "13800138001" })),
  )
  .await;
  let id = created["id"].as_str().unwrap();

  let (status, updated) = send(
    state,
    "PUT",
    &format!("/api/contacts/{id}"),
    Some(json!({ "email": "a@b.com" })),
  )
  .await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(updated["name"], "张三");
  assert_eq!(updated["phone"], "13800138001");
  assert_eq!(updated["email"], "a@b.com");
  assert_eq!(
    timestamp(&updated, "createdAt"),
    timestamp(&created, "createdAt")
  );
  assert!(
    timestamp(&updated, "updatedAt") >= timestamp(&created, "updatedAt")
  );
}

#[tokio::test]
async fn update_phone_to_another_contacts_number_conflicts() {
  let state = make_state(MemoryStore::seeded());
  let (status, body) = send(
    state,
    "PUT",
    "/api/contacts/1",
    Some(json!({ "phone": "13800138002" })),
  )
  .await;

  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["error"], "ConflictError");
}

#[tokio::test]
async fn update_keeping_own_phone_is_not_a_conflict() {
  let state = make_state(MemoryStore::seeded());
  let (status, body) = send(
    state,
    "PUT",
    "/api/contacts/1",
    Some(json!({ "phone": "13800138001", "name": "张三丰" })),
  )
  .await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["name"], "张三丰");
}

#[tokio::test]
async fn update_clears_email_with_empty_value() {
  let state = make_state(MemoryStore::seeded());
  let (status, body) =
    send(state, "PUT", "/api/contacts/1", Some(json!({ "email": "" })))
      .await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["email"], Value::Null);
}

#[tokio::test]
async fn update_rejects_invalid_partial_field() {
  let state = make_state(MemoryStore::seeded());
  let (status, body) =
    send(state, "PUT", "/api/contacts/1", Some(json!({ "phone": "123" })))
      .await;

  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["details"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn update_unknown_id_returns_404() {
  let state = make_state(MemoryStore::seeded());
  let (status, _) =
    send(state, "PUT", "/api/contacts/99", Some(json!({}))).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_malformed_id_returns_400() {
  let state = make_state(MemoryStore::seeded());
  let (status, _) =
    send(state, "PUT", "/api/contacts/abc!", Some(json!({}))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── Delete ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_acknowledges_then_404s() {
  let state = make_state(MemoryStore::seeded());

  let (status, body) =
    send(state.clone(), "DELETE", "/api/contacts/1", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["success"], true);

  let (status, _) = send(state.clone(), "GET", "/api/contacts/1", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, _) = send(state, "DELETE", "/api/contacts/1", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_malformed_id_returns_400() {
  let state = make_state(MemoryStore::seeded());
  let (status, _) = send(state, "DELETE", "/api/contacts/abc!", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── Search ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_matches_phone_substring() {
  let state = make_state(MemoryStore::seeded());
  let (status, body) =
    send(state, "GET", "/api/contacts/search?keyword=138", None).await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn search_matches_name() {
  let state = make_state(MemoryStore::seeded());
  let (status, body) = send(
    state,
    "GET",
    "/api/contacts/search?keyword=%E5%BC%A0%E4%B8%89",
    None,
  )
  .await;

  assert_eq!(status, StatusCode::OK);
  let hits = body.as_array().unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0]["name"], "张三");
}

#[tokio::test]
async fn search_with_blank_keyword_falls_back_to_full_list() {
  let state = make_state(MemoryStore::seeded());

  for uri in [
    "/api/contacts/search",
    "/api/contacts/search?keyword=",
    "/api/contacts/search?keyword=%20%20",
  ] {
    let (status, body) = send(state.clone(), "GET", uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3, "uri {uri}");
  }
}

// ── Stats ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn stats_reflect_the_current_collection() {
  let state = make_state(MemoryStore::seeded());

  let (status, body) =
    send(state.clone(), "GET", "/api/contacts/stats", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["totalCount"], 3);
  assert_eq!(body["withEmailCount"], 2);
  assert_eq!(body["withoutEmailCount"], 1);

  send(state.clone(), "DELETE", "/api/contacts/1", None).await;
  let (_, body) = send(state, "GET", "/api/contacts/stats", None).await;
  assert_eq!(body["totalCount"], 2);
  assert_eq!(body["withEmailCount"], 1);
  assert_eq!(body["withoutEmailCount"], 1);
}

// ── End-to-end scenario ──────────────────────────────────────────────────────

#[tokio::test]
async fn create_conflict_update_search_delete_scenario() {
  let state = make_state(MemoryStore::new());

  // Create with no email.
  let (status, created) = send(
    state.clone(),
    "POST",
    "/api/contacts",
    Some(json!({ "name": "张三", "phone": "13800138001" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(created["email"], Value::Null);
  let id = created["id"].as_str().unwrap().to_string();

  // Round-trip: the fetched record equals the created one.
  let (_, fetched) =
    send(state.clone(), "GET", &format!("/api/contacts/{id}"), None).await;
  assert_eq!(fetched, created);

  // A second contact with the same phone conflicts.
  let (status, _) = send(
    state.clone(),
    "POST",
    "/api/contacts",
    Some(json!({ "name": "李四", "phone": "13800138001" })),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT);

  // A second contact with another phone is fine.
  let (status, _) = send(
    state.clone(),
    "POST",
    "/api/contacts",
    Some(json!({ "name": "李四", "phone": "13800138002" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);

  // Update the first contact's email only.
  let (status, updated) = send(
    state.clone(),
    "PUT",
    &format!("/api/contacts/{id}"),
    Some(json!({ "email": "a@b.com" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(updated["name"], "张三");
  assert_eq!(updated["phone"], "13800138001");
  assert_eq!(updated["email"], "a@b.com");

  // Both contacts match the shared phone prefix.
  let (_, hits) = send(
    state.clone(),
    "GET",
    "/api/contacts/search?keyword=138",
    None,
  )
  .await;
  assert_eq!(hits.as_array().unwrap().len(), 2);

  // Delete the first contact, then it is gone.
  let (status, ack) =
    send(state.clone(), "DELETE", &format!("/api/contacts/{id}"), None)
      .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(ack["success"], true);

  let (status, _) =
    send(state.clone(), "GET", &format!("/api/contacts/{id}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  // Stats reflect the surviving contact.
  let (_, stats) = send(state, "GET", "/api/contacts/stats", None).await;
  assert_eq!(stats["totalCount"], 1);
  assert_eq!(stats["withEmailCount"], 0);
  assert_eq!(stats["withoutEmailCount"], 1);
}
