//! Session types shared between the auth gate and its callers.
//!
//! Authentication is an explicit result, not a control-flow signal: the gate
//! answers with an [`AuthOutcome`] and the caller decides where to send an
//! unauthenticated user.

use serde::{Deserialize, Serialize};

/// An authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  pub username:     String,
  pub display_name: String,
}

/// The answer an auth gate gives for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
  Authenticated(Session),
  Unauthenticated,
}
