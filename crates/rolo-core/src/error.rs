//! Error types for `rolo-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A field exceeded its storage limit. `len` is measured in the same unit
  /// as `max`.
  #[error("{field} is too long: {len} > {max}")]
  FieldTooLong {
    field: &'static str,
    max:   usize,
    len:   usize,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Failure classification ──────────────────────────────────────────────────

/// How a store failure should be surfaced. Stores never retry; this only
/// tells the caller what kind of failure it is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
  /// The input was rejected (validation or a constraint violation).
  Invalid,
  /// The backend is temporarily unreachable or busy.
  Transient,
  /// Anything else.
  Permanent,
}

/// Implemented by store error types so higher layers can classify failures
/// without knowing the backend.
pub trait Classify {
  fn failure_kind(&self) -> FailureKind;
}

impl Classify for Error {
  fn failure_kind(&self) -> FailureKind {
    match self {
      Error::FieldTooLong { .. } => FailureKind::Invalid,
    }
  }
}
