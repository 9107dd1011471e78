//! The auth gate: turns request credentials into an [`AuthOutcome`].
//!
//! [`BasicAuthGate`] checks HTTP Basic credentials against the configured
//! users, whose passwords are stored as argon2 PHC strings.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::http::{HeaderMap, header};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use rand_core::OsRng;
use rolo_core::session::{AuthOutcome, Session};

use crate::UserConfig;

/// Decides whether a request carries a valid session.
///
/// The gate only answers; what happens to an unauthenticated request is up
/// to the caller.
pub trait AuthGate: Send + Sync + 'static {
  fn authenticate(&self, headers: &HeaderMap) -> AuthOutcome;
}

/// Hash `password` into an argon2id PHC string suitable for
/// [`UserConfig::password_hash`].
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(Argon2::default()
    .hash_password(password.as_bytes(), &salt)?
    .to_string())
}

// ─── Basic auth ───────────────────────────────────────────────────────────────

/// HTTP Basic gate over a fixed set of users.
#[derive(Clone)]
pub struct BasicAuthGate {
  users: Vec<UserConfig>,
}

impl BasicAuthGate {
  pub fn new(users: Vec<UserConfig>) -> Self { Self { users } }

  fn verify(&self, headers: &HeaderMap) -> Option<Session> {
    let (username, password) = basic_credentials(headers)?;

    let Some(user) = self.users.iter().find(|u| u.username == username) else {
      tracing::warn!(%username, "rejected login for unknown user");
      return None;
    };

    let verified = PasswordHash::new(&user.password_hash)
      .and_then(|hash| {
        Argon2::default().verify_password(password.as_bytes(), &hash)
      });
    if let Err(e) = verified {
      tracing::warn!(%username, error = %e, "rejected login");
      return None;
    }

    Some(Session {
      username:     user.username.clone(),
      display_name: user
        .display_name
        .clone()
        .unwrap_or_else(|| user.username.clone()),
    })
  }
}

impl AuthGate for BasicAuthGate {
  fn authenticate(&self, headers: &HeaderMap) -> AuthOutcome {
    match self.verify(headers) {
      Some(session) => AuthOutcome::Authenticated(session),
      None => AuthOutcome::Unauthenticated,
    }
  }
}

/// Decode `Authorization: Basic <base64(user:pass)>`.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
  let encoded = headers
    .get(header::AUTHORIZATION)?
    .to_str()
    .ok()?
    .strip_prefix("Basic ")?;

  let decoded = B64.decode(encoded).ok()?;
  let creds = String::from_utf8(decoded).ok()?;
  let (username, password) = creds.split_once(':')?;
  Some((username.to_owned(), password.to_owned()))
}
