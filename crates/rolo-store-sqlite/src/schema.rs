//! SQL schema for the Rolo SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- AUTOINCREMENT keeps ids monotonic and never reuses a deleted id.
CREATE TABLE IF NOT EXISTS contacts (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    first      TEXT,
    last       TEXT,
    avatar     TEXT,
    twitter    TEXT CHECK (twitter IS NULL OR length(twitter) <= 255),
    notes      TEXT,
    favorite   INTEGER NOT NULL DEFAULT 0 CHECK (favorite IN (0, 1)),
    -- Fixed-width RFC 3339 UTC, so text order is time order.
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE INDEX IF NOT EXISTS contacts_order_idx ON contacts(last, created_at);

PRAGMA user_version = 1;
";

/// Name of the case-insensitive substring function registered on every
/// connection; see [`crate::store::contains_folded`].
pub const CONTAINS_FN: &str = "rolo_contains";

/// Name of the Unicode case-folding collation registered on every
/// connection; see [`crate::store::compare_folded`].
pub const FOLD_COLLATION: &str = "rolo_fold";

/// Column list shared by every `SELECT`/`RETURNING`, in
/// [`crate::encode::RawContact::from_row`] order.
pub const CONTACT_COLUMNS: &str =
  "id, first, last, avatar, twitter, notes, favorite, created_at";
