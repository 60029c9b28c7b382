//! Payload sanitisation: trim accepted fields, null out blank emails.

use serde_json::Value;

use crate::contact::ContactPatch;

/// Normalise an accepted payload into a [`ContactPatch`].
///
/// Only keys present in the input appear in the patch, so partial updates
/// never touch fields the caller did not send. `name` and `phone` lose
/// surrounding whitespace; an `email` key holding a blank or non-string
/// value becomes an explicit null.
pub fn sanitize_payload(payload: &Value) -> ContactPatch {
  let mut patch = ContactPatch::default();

  if let Some(name) = payload.get("name").and_then(Value::as_str) {
    patch.name = Some(name.trim().to_string());
  }

  if let Some(phone) = payload.get("phone").and_then(Value::as_str) {
    patch.phone = Some(phone.trim().to_string());
  }

  if let Some(email) = payload.get("email") {
    let trimmed = email.as_str().map(str::trim).unwrap_or_default();
    patch.email = if trimmed.is_empty() {
      Some(None)
    } else {
      Some(Some(trimmed.to_string()))
    };
  }

  patch
}
