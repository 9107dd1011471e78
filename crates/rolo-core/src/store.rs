//! The `ContactStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `rolo-store-sqlite`).
//! Higher layers (`rolo-api`, `rolo-server`) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::{
  contact::{Contact, ContactId, ContactPatch, NewContact},
  error::Classify,
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`ContactStore::list_contacts`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactQuery {
  /// Case-insensitive substring matched against `first` and `last`.
  /// `None` and `Some("")` both mean "no filter".
  pub text: Option<String>,
}

impl ContactQuery {
  /// Every contact.
  pub fn all() -> Self { Self::default() }

  /// Contacts whose first or last name contains `text`.
  pub fn matching(text: impl Into<String>) -> Self {
    Self { text: Some(text.into()) }
  }

  /// The search text, if it actually filters anything.
  pub fn filter_text(&self) -> Option<&str> {
    self.text.as_deref().filter(|t| !t.is_empty())
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a contact storage backend.
///
/// Every method is a single round trip to the backend. Writes against an id
/// that does not exist succeed without effect; callers that need to tell the
/// difference must read first.
pub trait ContactStore: Send + Sync {
  type Error: std::error::Error + Classify + Send + Sync + 'static;

  /// All contacts matching `query`, ordered by `last` (absent last names
  /// after present ones), then `created_at`, then `id`.
  fn list_contacts<'a>(
    &'a self,
    query: &'a ContactQuery,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + 'a;

  /// Retrieve a contact by id. Returns `None` if not found.
  fn get_contact(
    &self,
    id: ContactId,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  /// Retrieve a contact by the external string form of its id.
  ///
  /// An id that does not parse is treated exactly like a missing one.
  fn find_contact(
    &self,
    raw_id: &str,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_ {
    let id = raw_id.parse::<ContactId>().ok();
    async move {
      match id {
        Some(id) => self.get_contact(id).await,
        None => Ok(None),
      }
    }
  }

  /// Persist a new contact and return it with its generated `id` and
  /// `created_at`.
  fn create_contact(
    &self,
    input: NewContact,
  ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + '_;

  /// Apply the fields present in `patch`; absent fields are left untouched.
  fn update_contact(
    &self,
    id: ContactId,
    patch: ContactPatch,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Hard-delete a contact.
  fn delete_contact(
    &self,
    id: ContactId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Atomically flip `favorite` in a single statement.
  fn toggle_favorite(
    &self,
    id: ContactId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
