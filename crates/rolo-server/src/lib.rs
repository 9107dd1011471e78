//! HTTP server for Rolo.
//!
//! Puts the JSON API from `rolo-api` behind an [`AuthGate`] and adds the
//! session and health endpoints.
//!
//! | Method | Path | Auth | Notes |
//! |--------|------|------|-------|
//! | `GET`  | `/health` | no | Liveness check |
//! | `GET`  | `/session` | yes | The signed-in user |
//! | any    | `/api/contacts…` | yes | See [`rolo_api::contacts`] |

pub mod auth;
pub mod error;

pub use error::Error;

use std::{
  ffi::OsStr,
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::{
  Extension, Json, Router,
  extract::{Request, State},
  middleware::{self, Next},
  response::{IntoResponse, Response},
  routing::get,
};
use rolo_core::{
  error::Classify,
  session::{AuthOutcome, Session},
  store::ContactStore,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::AuthGate;

// ─── Configuration ────────────────────────────────────────────────────────────

fn default_realm() -> String { "rolo".to_string() }

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  /// Realm named in the `WWW-Authenticate` challenge.
  #[serde(default = "default_realm")]
  pub realm:      String,
  #[serde(default)]
  pub users:      Vec<UserConfig>,
}

impl ServerConfig {
  /// Reject settings the server could not honour at request time.
  pub fn validate(&self) -> Result<(), Error> {
    if error::basic_challenge(&self.realm).is_none() {
      return Err(Error::InvalidRealm(self.realm.clone()));
    }
    Ok(())
  }

  /// `store_path` with a leading `~` component replaced by `$HOME`.
  pub fn resolved_store_path(&self) -> PathBuf {
    resolve_home(&self.store_path, std::env::var_os("HOME").as_deref())
  }
}

fn resolve_home(path: &Path, home: Option<&OsStr>) -> PathBuf {
  match (path.strip_prefix("~"), home) {
    (Ok(rest), Some(home)) => Path::new(home).join(rest),
    _ => path.to_path_buf(),
  }
}

/// A user allowed to sign in.
#[derive(Deserialize, Clone)]
pub struct UserConfig {
  pub username:      String,
  /// Shown in the UI; falls back to `username`.
  pub display_name:  Option<String>,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

// ─── Application state ────────────────────────────────────────────────────────

/// State for the server-level routes. The contact store is owned by the API
/// router, not by this state.
#[derive(Clone)]
pub struct AppState {
  pub gate:   Arc<dyn AuthGate>,
  pub config: Arc<ServerConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router for `store`.
pub fn router<S>(store: Arc<S>, state: AppState) -> Router
where
  S: ContactStore + Send + Sync + 'static,
  S::Error: std::error::Error + Classify + Send + Sync + 'static,
{
  let protected = Router::new()
    .route("/session", get(current_session))
    .nest("/api", rolo_api::api_router(store))
    .layer(middleware::from_fn_with_state(state, require_session));

  Router::new()
    .route("/health", get(health))
    .merge(protected)
    .layer(TraceLayer::new_for_http())
}

/// Admit requests with a session; challenge everything else.
///
/// The session is handed to downstream handlers as a request extension.
async fn require_session(
  State(state): State<AppState>,
  mut req: Request,
  next: Next,
) -> Response {
  match state.gate.authenticate(req.headers()) {
    AuthOutcome::Authenticated(session) => {
      req.extensions_mut().insert(session);
      next.run(req).await
    }
    AuthOutcome::Unauthenticated => Error::Unauthorized {
      realm: state.config.realm.clone(),
    }
    .into_response(),
  }
}

async fn current_session(Extension(session): Extension<Session>) -> Json<Session> {
  Json(session)
}

async fn health() -> &'static str { "ok" }

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{StatusCode, header},
  };
  use rolo_core::{contact::NewContact, store::ContactQuery};
  use rolo_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use crate::auth::{
    BasicAuthGate,
    tests::{basic, cheap_hash},
  };

  fn make_state() -> AppState {
    let users = vec![UserConfig {
      username:      "ada".to_string(),
      display_name:  Some("Ada Lovelace".to_string()),
      password_hash: cheap_hash("secret"),
    }];
    AppState {
      gate:   Arc::new(BasicAuthGate::new(users.clone())),
      config: Arc::new(ServerConfig {
        host:       "127.0.0.1".to_string(),
        port:       3000,
        store_path: PathBuf::from(":memory:"),
        realm:      "rolo-test".to_string(),
        users,
      }),
    }
  }

  async fn make_app() -> (Router, Arc<SqliteStore>) {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    (router(store.clone(), make_state()), store)
  }

  async fn oneshot_raw(
    app:    &Router,
    method: &str,
    uri:    &str,
    auth:   Option<&str>,
    body:   Option<Value>,
  ) -> Response {
    let mut builder = axum::http::Request::builder().method(method).uri(uri);
    if let Some(a) = auth {
      builder = builder.header(header::AUTHORIZATION, a);
    }
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
  }

  async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  #[test]
  fn realm_must_fit_in_a_header() {
    let mut config = (*make_state().config).clone();
    assert!(config.validate().is_ok());

    config.realm = "two\nlines".to_string();
    assert!(matches!(config.validate(), Err(Error::InvalidRealm(r)) if r == "two\nlines"));
  }

  #[test]
  fn unsendable_realm_still_answers_401() {
    let resp = Error::Unauthorized { realm: "two\nlines".to_string() }.into_response();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().get(header::WWW_AUTHENTICATE).is_none());
  }

  #[test]
  fn store_path_expands_leading_tilde() {
    let home = Some(OsStr::new("/home/ada"));
    assert_eq!(
      resolve_home(Path::new("~/rolo/contacts.db"), home),
      PathBuf::from("/home/ada/rolo/contacts.db")
    );
    assert_eq!(
      resolve_home(Path::new("/var/lib/rolo.db"), home),
      PathBuf::from("/var/lib/rolo.db")
    );
    assert_eq!(
      resolve_home(Path::new("~ada/contacts.db"), home),
      PathBuf::from("~ada/contacts.db")
    );
    assert_eq!(
      resolve_home(Path::new("~/contacts.db"), None),
      PathBuf::from("~/contacts.db")
    );
  }

  #[tokio::test]
  async fn health_needs_no_session() {
    let (app, _) = make_app().await;
    let resp = oneshot_raw(&app, "GET", "/health", None, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn unauthenticated_api_request_is_challenged() {
    let (app, _) = make_app().await;
    let resp = oneshot_raw(&app, "GET", "/api/contacts", None, None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
      resp.headers().get(header::WWW_AUTHENTICATE).unwrap(),
      "Basic realm=\"rolo-test\""
    );
  }

  #[tokio::test]
  async fn rejected_requests_never_reach_the_store() {
    let (app, store) = make_app().await;
    let seeded = store
      .create_contact(NewContact { first: Some("Kept".into()), ..Default::default() })
      .await
      .unwrap();
    let wrong = basic("ada", "wrong");

    let resp = oneshot_raw(&app, "POST", "/api/contacts", Some(&wrong), Some(json!({}))).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let uri = format!("/api/contacts/{}", seeded.id);
    let resp = oneshot_raw(&app, "DELETE", &uri, Some(&wrong), None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let all = store.list_contacts(&ContactQuery::all()).await.unwrap();
    assert_eq!(all, vec![seeded]);
  }

  #[tokio::test]
  async fn session_endpoint_returns_display_name() {
    let (app, _) = make_app().await;
    let auth = basic("ada", "secret");
    let resp = oneshot_raw(&app, "GET", "/session", Some(&auth), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["username"], "ada");
    assert_eq!(body["display_name"], "Ada Lovelace");
  }

  #[tokio::test]
  async fn authenticated_contact_workflow() {
    let (app, _) = make_app().await;
    let auth = basic("ada", "secret");

    // Create an empty contact, then fill it in.
    let resp = oneshot_raw(&app, "POST", "/api/contacts", Some(&auth), Some(json!({}))).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let id = json_body(resp).await["id"].as_i64().unwrap();
    let uri = format!("/api/contacts/{id}");

    let resp = oneshot_raw(
      &app,
      "PATCH",
      &uri,
      Some(&auth),
      Some(json!({ "first": "Charles", "last": "Babbage" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = oneshot_raw(&app, "GET", "/api/contacts?q=babb", Some(&auth), None).await;
    let hits = json_body(resp).await;
    assert_eq!(hits.as_array().unwrap().len(), 1);
    assert_eq!(hits[0]["first"], "Charles");
    assert_eq!(hits[0]["favorite"], false);
  }
}
