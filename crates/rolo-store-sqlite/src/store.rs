//! [`SqliteStore`] — the SQLite implementation of [`ContactStore`].

use std::{cmp::Ordering, path::Path};

use rolo_core::{
  contact::{Contact, ContactId, ContactPatch, NewContact},
  store::{ContactQuery, ContactStore},
};
use rusqlite::{OptionalExtension as _, functions::FunctionFlags};

use crate::{
  Error, Result,
  encode::{RawContact, encode_bool, encode_patch, encode_text},
  schema::{CONTACT_COLUMNS, CONTAINS_FN, FOLD_COLLATION, SCHEMA},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Rolo contact store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Statements
/// are executed one at a time on the connection's thread, so each one is
/// atomic with respect to every other caller.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init().await?;
    Ok(store)
  }

  async fn init(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.create_scalar_function(
          CONTAINS_FN,
          2,
          FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
          |ctx| {
            let haystack: Option<String> = ctx.get(0)?;
            let needle: Option<String> = ctx.get(1)?;
            Ok(match (haystack, needle) {
              (Some(h), Some(n)) => contains_folded(&h, &n),
              _ => false,
            })
          },
        )?;
        conn.create_collation(FOLD_COLLATION, compare_folded)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// Unicode-aware case-insensitive substring test. `needle` must already be
/// lowercased.
///
/// The needle is matched literally: `%`, `_` and `\` carry no special
/// meaning, unlike in `LIKE`.
pub(crate) fn contains_folded(haystack: &str, needle: &str) -> bool {
  haystack.to_lowercase().contains(needle)
}

/// Orders strings by their Unicode lowercase forms, so `"adams"` sorts before
/// `"Baker"`. Strings that differ only in case compare equal; the list query
/// breaks those ties with a plain `BINARY` comparison.
pub(crate) fn compare_folded(a: &str, b: &str) -> Ordering {
  a.to_lowercase().cmp(&b.to_lowercase())
}

// ─── ContactStore impl ───────────────────────────────────────────────────────

impl ContactStore for SqliteStore {
  type Error = Error;

  async fn list_contacts(&self, query: &ContactQuery) -> Result<Vec<Contact>> {
    let needle = query.filter_text().map(str::to_lowercase);

    let raws: Vec<RawContact> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {CONTACT_COLUMNS}
           FROM contacts
           WHERE ?1 IS NULL
              OR {CONTAINS_FN}(first, ?1)
              OR {CONTAINS_FN}(last, ?1)
           ORDER BY last IS NULL, last COLLATE {FOLD_COLLATION}, last, created_at, id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![needle], RawContact::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawContact::into_contact).collect()
  }

  async fn get_contact(&self, id: ContactId) -> Result<Option<Contact>> {
    let raw: Option<RawContact> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?1"),
            rusqlite::params![id.0],
            RawContact::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawContact::into_contact).transpose()
  }

  async fn create_contact(&self, input: NewContact) -> Result<Contact> {
    input.validate()?;

    let NewContact { first, last, avatar, twitter, notes, favorite } = input;
    let values = [
      encode_text(first),
      encode_text(last),
      encode_text(avatar),
      encode_text(twitter),
      encode_text(notes),
      encode_bool(favorite.unwrap_or_default()),
    ];

    let raw: RawContact = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &format!(
            "INSERT INTO contacts (first, last, avatar, twitter, notes, favorite)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING {CONTACT_COLUMNS}"
          ),
          rusqlite::params_from_iter(values),
          RawContact::from_row,
        )?)
      })
      .await?;

    tracing::debug!(id = raw.id, "created contact");
    raw.into_contact()
  }

  async fn update_contact(&self, id: ContactId, patch: ContactPatch) -> Result<()> {
    patch.validate()?;
    if patch.is_empty() {
      return Ok(());
    }

    let assignments = encode_patch(patch);

    let affected = self
      .conn
      .call(move |conn| {
        let set_clause = assignments
          .iter()
          .enumerate()
          .map(|(i, (col, _))| format!("{col} = ?{}", i + 1))
          .collect::<Vec<_>>()
          .join(", ");
        let sql = format!(
          "UPDATE contacts SET {set_clause} WHERE id = ?{}",
          assignments.len() + 1
        );

        let params = assignments
          .into_iter()
          .map(|(_, v)| v)
          .chain(std::iter::once(rusqlite::types::Value::Integer(id.0)));
        Ok(conn.execute(&sql, rusqlite::params_from_iter(params))?)
      })
      .await?;

    tracing::debug!(%id, affected, "updated contact");
    Ok(())
  }

  async fn delete_contact(&self, id: ContactId) -> Result<()> {
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM contacts WHERE id = ?1", rusqlite::params![id.0])?)
      })
      .await?;

    tracing::debug!(%id, affected, "deleted contact");
    Ok(())
  }

  async fn toggle_favorite(&self, id: ContactId) -> Result<()> {
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE contacts SET favorite = NOT favorite WHERE id = ?1",
          rusqlite::params![id.0],
        )?)
      })
      .await?;

    tracing::debug!(%id, affected, "toggled favorite");
    Ok(())
  }
}
