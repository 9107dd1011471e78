//! Encoding and decoding helpers between Rust domain types and the
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings written by the database itself. Booleans
//! are `0`/`1` integers. Absent text fields are `NULL`.

use chrono::{DateTime, Utc};
use rolo_core::contact::{Contact, ContactId, ContactPatch};
use rusqlite::types::Value;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Column values ───────────────────────────────────────────────────────────

pub fn encode_text(v: Option<String>) -> Value {
  v.map_or(Value::Null, Value::Text)
}

pub fn encode_bool(b: bool) -> Value { Value::Integer(i64::from(b)) }

/// The `SET` assignments for a patch, in column order. Only fields present in
/// the patch appear.
pub fn encode_patch(patch: ContactPatch) -> Vec<(&'static str, Value)> {
  let ContactPatch { first, last, avatar, twitter, notes, favorite } = patch;

  let text_fields = [
    ("first", first),
    ("last", last),
    ("avatar", avatar),
    ("twitter", twitter),
    ("notes", notes),
  ];

  let mut assignments: Vec<(&'static str, Value)> = text_fields
    .into_iter()
    .filter_map(|(col, v)| v.map(|v| (col, encode_text(v))))
    .collect();

  if let Some(f) = favorite {
    assignments.push(("favorite", encode_bool(f)));
  }

  assignments
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

/// A `contacts` row as read from SQLite, before timestamp decoding.
pub struct RawContact {
  pub id:         i64,
  pub first:      Option<String>,
  pub last:       Option<String>,
  pub avatar:     Option<String>,
  pub twitter:    Option<String>,
  pub notes:      Option<String>,
  pub favorite:   bool,
  pub created_at: String,
}

impl RawContact {
  /// Read a row selected with [`crate::schema::CONTACT_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      first:      row.get(1)?,
      last:       row.get(2)?,
      avatar:     row.get(3)?,
      twitter:    row.get(4)?,
      notes:      row.get(5)?,
      favorite:   row.get(6)?,
      created_at: row.get(7)?,
    })
  }

  pub fn into_contact(self) -> Result<Contact> {
    Ok(Contact {
      id:         ContactId(self.id),
      first:      self.first,
      last:       self.last,
      avatar:     self.avatar,
      twitter:    self.twitter,
      notes:      self.notes,
      favorite:   self.favorite,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
