//! Error types and axum `IntoResponse` implementation.

use axum::{
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// No valid session; the response challenges the client to sign in to
  /// `realm`.
  #[error("unauthorized")]
  Unauthorized { realm: String },

  /// The configured realm cannot be sent in a `WWW-Authenticate` header.
  #[error("realm {0:?} is not a valid header value")]
  InvalidRealm(String),
}

/// The `WWW-Authenticate` value that challenges a client to sign in to
/// `realm`.
pub(crate) fn basic_challenge(realm: &str) -> Option<HeaderValue> {
  HeaderValue::from_str(&format!("Basic realm=\"{realm}\"")).ok()
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Unauthorized { realm } => {
        let mut res =
          (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
        match basic_challenge(&realm) {
          Some(challenge) => {
            res.headers_mut().insert(header::WWW_AUTHENTICATE, challenge);
          }
          None => {
            tracing::warn!(%realm, "realm is not a valid header value; 401 sent without a challenge");
          }
        }
        res
      }
      Error::InvalidRealm(_) => {
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
      }
    }
  }
}
