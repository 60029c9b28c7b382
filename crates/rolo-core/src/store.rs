//! The `ContactStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `rolo-store-memory`).
//! Higher layers (`rolo-api`, `rolo-server`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use crate::contact::{Contact, ContactPatch, NewContact};

/// Abstraction over a contact store backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (tokio with `axum`).
pub trait ContactStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Every contact, in insertion order. No side effects.
  fn list_all(
    &self,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;

  /// Look up a contact by exact id. Returns `None` if not found.
  fn get_by_id<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + 'a;

  /// True iff some contact other than `exclude_id` holds `phone`.
  ///
  /// `exclude_id` lets updates re-check uniqueness against all *other*
  /// contacts, so keeping one's own number is never a conflict.
  fn exists_by_phone<'a>(
    &'a self,
    phone: &'a str,
    exclude_id: Option<&'a str>,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Persist a new contact with a fresh unique id; `created_at` and
  /// `updated_at` are both set to the current time.
  fn create(
    &self,
    data: NewContact,
  ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + '_;

  /// Merge the present fields of `patch` over the contact with `id` and
  /// refresh `updated_at`. Returns `None` if no such contact exists.
  fn update<'a>(
    &'a self,
    id: &'a str,
    patch: ContactPatch,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + 'a;

  /// Remove the contact with `id`; returns whether a removal occurred.
  fn delete<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Case-insensitive substring match on name and email, plus exact
  /// substring match on phone. Results keep collection order.
  fn search<'a>(
    &'a self,
    keyword: &'a str,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + 'a;
}
