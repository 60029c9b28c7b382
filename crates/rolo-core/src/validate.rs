//! Validation of contact payloads and request scalars.
//!
//! All checks are pure functions; the regexes are compiled once on first
//! use. Payload validation accumulates every violated rule instead of
//! stopping at the first, so one response can name them all.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Mainland-China mobile number: 11 digits, `1[3-9]` prefix.
static PHONE_RE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^1[3-9]\d{9}$").expect("phone regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex")
});

static UUID_RE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(
    r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$",
  )
  .expect("uuid regex")
});

/// Seeded legacy records use bare decimal ids.
static NUMERIC_ID_RE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^\d+$").expect("numeric id regex"));

/// Longest accepted name, in characters, measured after trimming.
pub const MAX_NAME_LEN: usize = 50;

/// Error reported when a request body is not a JSON object.
pub const PAYLOAD_NOT_OBJECT: &str = "contact payload must be a JSON object";

/// True iff `s` is a valid mobile number.
pub fn is_valid_phone(s: &str) -> bool {
  PHONE_RE.is_match(s)
}

/// True iff `s` is a plausible `local@domain.tld` address with no embedded
/// whitespace. The empty string is valid — email is an optional field.
pub fn is_valid_email(s: &str) -> bool {
  s.is_empty() || EMAIL_RE.is_match(s)
}

/// True iff `s` is a UUID textual id or a bare decimal id.
pub fn is_valid_id(s: &str) -> bool {
  UUID_RE.is_match(s) || NUMERIC_ID_RE.is_match(s)
}

/// True iff `s` is usable as a search keyword (non-blank after trimming).
pub fn is_valid_search_keyword(s: &str) -> bool {
  !s.trim().is_empty()
}

/// Outcome of [`validate_contact_payload`]: `errors` lists every violated
/// rule, in field order (name, phone, email).
#[derive(Debug, Clone)]
pub struct PayloadReport {
  pub valid:  bool,
  pub errors: Vec<String>,
}

/// Validate a contact payload.
///
/// With `partial` set (updates), mandatory fields are only checked when
/// their key is present; on creation both `name` and `phone` are required.
/// A payload that is not a JSON object yields a single error and
/// short-circuits.
pub fn validate_contact_payload(payload: &Value, partial: bool) -> PayloadReport {
  let Some(map) = payload.as_object() else {
    return PayloadReport {
      valid:  false,
      errors: vec![PAYLOAD_NOT_OBJECT.to_string()],
    };
  };

  let mut errors = Vec::new();

  if !partial || map.contains_key("name") {
    match map.get("name").and_then(Value::as_str) {
      None => errors.push("name is required and must be a string".to_string()),
      Some(s) if s.trim().is_empty() => {
        errors.push("name must not be blank".to_string())
      }
      Some(s) if s.trim().chars().count() > MAX_NAME_LEN => errors
        .push(format!("name must be at most {MAX_NAME_LEN} characters")),
      Some(_) => {}
    }
  }

  if !partial || map.contains_key("phone") {
    match map.get("phone").and_then(Value::as_str) {
      None => {
        errors.push("phone is required and must be a string".to_string())
      }
      Some(s) if !is_valid_phone(s) => {
        errors.push("phone must be a valid mobile number".to_string())
      }
      Some(_) => {}
    }
  }

  // Email is optional; only a present, non-empty value is checked.
  match map.get("email") {
    None | Some(Value::Null) => {}
    Some(Value::String(s)) if s.is_empty() => {}
    Some(Value::String(s)) if is_valid_email(s) => {}
    Some(_) => {
      errors.push("email must be a valid email address".to_string())
    }
  }

  PayloadReport { valid: errors.is_empty(), errors }
}
