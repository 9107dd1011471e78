//! Contact types — the single entity of the Rolo address book.
//!
//! A contact is a flat record of optional fields. Only `id` and `created_at`
//! are guaranteed to be present; both are assigned by the store.

use std::{fmt, num::ParseIntError, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{Error, Result};

/// Maximum length of the `twitter` field, in UTF-16 code units.
pub const TWITTER_MAX_LEN: usize = 255;

// ─── Identifier ──────────────────────────────────────────────────────────────

/// Store-assigned contact identifier. Monotonic and never reused.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ContactId(pub i64);

impl FromStr for ContactId {
  type Err = ParseIntError;

  /// Parses the external (URL path, form field) representation. Anything
  /// that is not a base-10 `i64` is rejected.
  fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
    s.parse::<i64>().map(ContactId)
  }
}

impl fmt::Display for ContactId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ─── Contact ─────────────────────────────────────────────────────────────────

/// A persisted contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
  pub id:         ContactId,
  pub first:      Option<String>,
  pub last:       Option<String>,
  /// Avatar image URI.
  pub avatar:     Option<String>,
  pub twitter:    Option<String>,
  pub notes:      Option<String>,
  pub favorite:   bool,
  /// Set by the database on insert; never changes afterwards.
  pub created_at: DateTime<Utc>,
}

// ─── NewContact ──────────────────────────────────────────────────────────────

/// Input to [`crate::store::ContactStore::create_contact`].
///
/// Every field is optional; `NewContact::default()` creates a blank
/// placeholder row. `favorite` falls back to `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewContact {
  pub first:    Option<String>,
  pub last:     Option<String>,
  pub avatar:   Option<String>,
  pub twitter:  Option<String>,
  pub notes:    Option<String>,
  pub favorite: Option<bool>,
}

impl NewContact {
  /// Reject values the `contacts` table would refuse.
  pub fn validate(&self) -> Result<()> {
    check_twitter(self.twitter.as_deref())
  }
}

// ─── ContactPatch ────────────────────────────────────────────────────────────

/// Input to [`crate::store::ContactStore::update_contact`].
///
/// Text fields are tri-state:
///
/// | JSON | Rust | Effect |
/// |------|------|--------|
/// | key missing | `None` | left untouched |
/// | `null` | `Some(None)` | cleared |
/// | `"x"` | `Some(Some("x"))` | set |
///
/// `id` and `created_at` are deliberately not representable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPatch {
  #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
  pub first:    Option<Option<String>>,
  #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
  pub last:     Option<Option<String>>,
  #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
  pub avatar:   Option<Option<String>>,
  #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
  pub twitter:  Option<Option<String>>,
  #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
  pub notes:    Option<Option<String>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub favorite: Option<bool>,
}

impl ContactPatch {
  /// `true` if applying this patch would change nothing.
  pub fn is_empty(&self) -> bool {
    self.first.is_none()
      && self.last.is_none()
      && self.avatar.is_none()
      && self.twitter.is_none()
      && self.notes.is_none()
      && self.favorite.is_none()
  }

  pub fn validate(&self) -> Result<()> {
    check_twitter(self.twitter.as_ref().and_then(Option::as_deref))
  }
}

/// Maps a present JSON value (including `null`) to `Some(_)`; missing keys
/// fall through to `#[serde(default)]` and stay `None`.
fn present<'de, D, T>(de: D) -> std::result::Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  T::deserialize(de).map(Some)
}

fn check_twitter(twitter: Option<&str>) -> Result<()> {
  let Some(handle) = twitter else { return Ok(()) };
  let len = handle.encode_utf16().count();
  if len > TWITTER_MAX_LEN {
    return Err(Error::FieldTooLong {
      field: "twitter",
      max: TWITTER_MAX_LEN,
      len,
    });
  }
  Ok(())
}
