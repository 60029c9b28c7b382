//! In-memory backend for the rolo contact store.
//!
//! The whole collection lives in a single `RwLock<Vec<Contact>>`. Every
//! operation takes the lock for its full duration, so each store call is
//! atomic even though the axum runtime handles requests in parallel. The
//! lock is never held across an await point. State is process-lifetime
//! only — nothing survives a restart.

use std::convert::Infallible;

use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use rolo_core::{
  contact::{Contact, ContactPatch, NewContact},
  store::ContactStore,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A contact store backed by an ordered in-memory collection.
///
/// Construct one per process (or per test) and share it behind an `Arc`.
pub struct MemoryStore {
  contacts: RwLock<Vec<Contact>>,
}

impl MemoryStore {
  /// An empty store — useful for tests.
  pub fn new() -> Self {
    Self { contacts: RwLock::new(Vec::new()) }
  }

  /// A store pre-loaded with the fixed example records served at startup.
  /// Seeded records carry legacy decimal ids.
  pub fn seeded() -> Self {
    let now = Utc::now();
    let seed =
      |id: &str, name: &str, phone: &str, email: Option<&str>| Contact {
        id:         id.to_string(),
        name:       name.to_string(),
        phone:      phone.to_string(),
        email:      email.map(str::to_string),
        created_at: now,
        updated_at: now,
      };

    Self {
      contacts: RwLock::new(vec![
        seed("1", "张三", "13800138001", Some("zhangsan@example.com")),
        seed("2", "李四", "13800138002", Some("lisi@example.com")),
        seed("3", "王五", "13800138003", None),
      ]),
    }
  }
}

impl Default for MemoryStore {
  fn default() -> Self {
    Self::new()
  }
}

// ─── ContactStore implementation ─────────────────────────────────────────────

impl ContactStore for MemoryStore {
  type Error = Infallible;

  async fn list_all(&self) -> Result<Vec<Contact>, Infallible> {
    Ok(self.contacts.read().clone())
  }

  async fn get_by_id(&self, id: &str) -> Result<Option<Contact>, Infallible> {
    Ok(self.contacts.read().iter().find(|c| c.id == id).cloned())
  }

  async fn exists_by_phone(
    &self,
    phone: &str,
    exclude_id: Option<&str>,
  ) -> Result<bool, Infallible> {
    Ok(
      self
        .contacts
        .read()
        .iter()
        .any(|c| c.phone == phone && Some(c.id.as_str()) != exclude_id),
    )
  }

  async fn create(&self, data: NewContact) -> Result<Contact, Infallible> {
    let now = Utc::now();
    let contact = Contact {
      id:         Uuid::new_v4().to_string(),
      name:       data.name,
      phone:      data.phone,
      email:      data.email,
      created_at: now,
      updated_at: now,
    };

    self.contacts.write().push(contact.clone());
    Ok(contact)
  }

  async fn update(
    &self,
    id: &str,
    patch: ContactPatch,
  ) -> Result<Option<Contact>, Infallible> {
    let mut contacts = self.contacts.write();
    let Some(contact) = contacts.iter_mut().find(|c| c.id == id) else {
      return Ok(None);
    };

    if let Some(name) = patch.name {
      contact.name = name;
    }
    if let Some(phone) = patch.phone {
      contact.phone = phone;
    }
    if let Some(email) = patch.email {
      contact.email = email;
    }
    contact.updated_at = Utc::now();

    Ok(Some(contact.clone()))
  }

  async fn delete(&self, id: &str) -> Result<bool, Infallible> {
    let mut contacts = self.contacts.write();
    let before = contacts.len();
    contacts.retain(|c| c.id != id);
    Ok(contacts.len() < before)
  }

  async fn search(&self, keyword: &str) -> Result<Vec<Contact>, Infallible> {
    let lowered = keyword.to_lowercase();
    Ok(
      self
        .contacts
        .read()
        .iter()
        .filter(|c| {
          c.name.to_lowercase().contains(&lowered)
            || c.phone.contains(keyword)
            || c
              .email
              .as_deref()
              .is_some_and(|e| e.to_lowercase().contains(&lowered))
        })
        .cloned()
        .collect(),
    )
  }
}
