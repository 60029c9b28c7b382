//! Contact — the single record type managed by the store — plus the input
//! shapes used to create and patch one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored contact record.
///
/// `id` is a string: freshly created records carry a UUID-v4 textual id,
/// while pre-seeded records carry bare decimal ids (`"1"`, `"2"`, …).
/// The id is immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
  pub id:         String,
  pub name:       String,
  pub phone:      String,
  /// `None` serialises as JSON `null`; the field is never omitted.
  pub email:      Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Input to [`ContactStore::create`](crate::store::ContactStore::create).
///
/// Fields are stored verbatim — sanitisation happens before this is built.
#[derive(Debug, Clone)]
pub struct NewContact {
  pub name:  String,
  pub phone: String,
  pub email: Option<String>,
}

/// A partial update with explicit presence.
///
/// Outer `None` means "leave the field untouched", so patches never clobber
/// fields the caller did not send. `email: Some(None)` clears the email to
/// null.
#[derive(Debug, Clone, Default)]
pub struct ContactPatch {
  pub name:  Option<String>,
  pub phone: Option<String>,
  pub email: Option<Option<String>>,
}

impl ContactPatch {
  /// Convert a patch carrying both mandatory fields into a [`NewContact`].
  /// Returns `None` if name or phone is missing.
  pub fn into_new_contact(self) -> Option<NewContact> {
    Some(NewContact {
      name:  self.name?,
      phone: self.phone?,
      email: self.email.flatten(),
    })
  }
}
