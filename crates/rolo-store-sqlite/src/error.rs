//! Error type for `rolo-store-sqlite`.

use rolo_core::error::{Classify, FailureKind};
use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Input rejected before reaching the database.
  #[error("invalid contact: {0}")]
  Core(#[from] rolo_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

impl Error {
  /// Whether retrying the same call later could succeed.
  ///
  /// Busy/locked databases, unopenable files and a closed connection thread
  /// are infrastructure hiccups; constraint violations and bad input are not.
  pub fn is_transient(&self) -> bool {
    match self {
      Error::Database(tokio_rusqlite::Error::ConnectionClosed) => true,
      Error::Database(tokio_rusqlite::Error::Rusqlite(e)) => matches!(
        e.sqlite_error_code(),
        Some(
          ErrorCode::DatabaseBusy
            | ErrorCode::DatabaseLocked
            | ErrorCode::CannotOpen
            | ErrorCode::SystemIoFailure
        )
      ),
      _ => false,
    }
  }
}

impl Classify for Error {
  fn failure_kind(&self) -> FailureKind {
    match self {
      Error::Core(e) => e.failure_kind(),
      Error::Database(tokio_rusqlite::Error::Rusqlite(e))
        if e.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) =>
      {
        FailureKind::Invalid
      }
      e if e.is_transient() => FailureKind::Transient,
      _ => FailureKind::Permanent,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
