//! JSON REST API for Rolo.
//!
//! Exposes an axum [`Router`] backed by any [`rolo_core::store::ContactStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", rolo_api::api_router(store.clone()))
//! ```

pub mod contacts;
pub mod error;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use rolo_core::{error::Classify, store::ContactStore};

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ContactStore + Send + Sync + 'static,
  S::Error: std::error::Error + Classify + Send + Sync + 'static,
{
  Router::new()
    .route("/contacts", get(contacts::list::<S>).post(contacts::create::<S>))
    .route(
      "/contacts/{id}",
      get(contacts::get_one::<S>)
        .patch(contacts::update::<S>)
        .delete(contacts::delete::<S>),
    )
    .route("/contacts/{id}/favorite", post(contacts::toggle_favorite::<S>))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use rolo_core::contact::Contact;
  use rolo_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    api_router(Arc::new(store))
  }

  async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
      Some(v) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(v.to_string())),
      None => builder.body(Body::empty()),
    }
    .unwrap();
    app.clone().oneshot(req).await.unwrap()
  }

  async fn json_body<T: serde::de::DeserializeOwned>(resp: Response) -> T {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  async fn create(app: &Router, body: Value) -> Contact {
    let resp = send(app, "POST", "/contacts", Some(body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    json_body(resp).await
  }

  #[tokio::test]
  async fn create_blank_contact() {
    let app = app().await;
    let c = create(&app, json!({})).await;
    assert_eq!(c.first, None);
    assert!(!c.favorite);

    let resp = send(&app, "GET", &format!("/contacts/{}", c.id), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body::<Contact>(resp).await, c);
  }

  #[tokio::test]
  async fn get_unknown_or_malformed_id_is_404() {
    let app = app().await;
    for uri in ["/contacts/999999999", "/contacts/not-a-number"] {
      let resp = send(&app, "GET", uri, None).await;
      assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
      let body: Value = json_body(resp).await;
      assert!(body["error"].is_string());
    }
  }

  #[tokio::test]
  async fn list_filters_with_q() {
    let app = app().await;
    create(&app, json!({ "first": "John", "last": "Doe" })).await;
    create(&app, json!({ "first": "Mary", "last": "Johnson" })).await;
    create(&app, json!({ "first": "Alice", "last": "Walker" })).await;

    let resp = send(&app, "GET", "/contacts", None).await;
    assert_eq!(json_body::<Vec<Contact>>(resp).await.len(), 3);

    let resp = send(&app, "GET", "/contacts?q=JO", None).await;
    let hits: Vec<Contact> = json_body(resp).await;
    let lasts: Vec<_> = hits.iter().filter_map(|c| c.last.as_deref()).collect();
    assert_eq!(lasts, vec!["Doe", "Johnson"]);

    let resp = send(&app, "GET", "/contacts?q=", None).await;
    assert_eq!(json_body::<Vec<Contact>>(resp).await.len(), 3);
  }

  #[tokio::test]
  async fn patch_updates_only_given_fields() {
    let app = app().await;
    let c = create(&app, json!({ "first": "Ada", "last": "Byron", "notes": "math" })).await;
    let uri = format!("/contacts/{}", c.id);

    let resp = send(&app, "PATCH", &uri, Some(json!({ "last": "Lovelace", "notes": null }))).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let updated: Contact = json_body(send(&app, "GET", &uri, None).await).await;
    assert_eq!(updated.first.as_deref(), Some("Ada"));
    assert_eq!(updated.last.as_deref(), Some("Lovelace"));
    assert_eq!(updated.notes, None);
    assert_eq!(updated.created_at, c.created_at);
  }

  #[tokio::test]
  async fn writes_to_missing_ids_are_noops() {
    let app = app().await;
    for (method, uri, body) in [
      ("PATCH", "/contacts/12345", Some(json!({ "first": "X" }))),
      ("PATCH", "/contacts/abc", Some(json!({ "first": "X" }))),
      ("DELETE", "/contacts/12345", None),
      ("DELETE", "/contacts/abc", None),
      ("POST", "/contacts/12345/favorite", None),
      ("POST", "/contacts/abc/favorite", None),
    ] {
      let resp = send(&app, method, uri, body).await;
      assert_eq!(resp.status(), StatusCode::NO_CONTENT, "{method} {uri}");
    }
    let all: Vec<Contact> = json_body(send(&app, "GET", "/contacts", None).await).await;
    assert!(all.is_empty());
  }

  #[tokio::test]
  async fn favorite_toggles() {
    let app = app().await;
    let c = create(&app, json!({ "first": "Ada" })).await;
    let uri = format!("/contacts/{}", c.id);
    let fav_uri = format!("{uri}/favorite");

    send(&app, "POST", &fav_uri, None).await;
    let once: Contact = json_body(send(&app, "GET", &uri, None).await).await;
    assert!(once.favorite);

    send(&app, "POST", &fav_uri, None).await;
    let twice: Contact = json_body(send(&app, "GET", &uri, None).await).await;
    assert!(!twice.favorite);
  }

  #[tokio::test]
  async fn delete_then_get_is_404() {
    let app = app().await;
    let c = create(&app, json!({ "first": "Temp" })).await;
    let uri = format!("/contacts/{}", c.id);

    assert_eq!(send(&app, "DELETE", &uri, None).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(send(&app, "GET", &uri, None).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(send(&app, "DELETE", &uri, None).await.status(), StatusCode::NO_CONTENT);
  }

  #[tokio::test]
  async fn overlong_twitter_is_422() {
    let app = app().await;
    let resp = send(
      &app,
      "POST",
      "/contacts",
      Some(json!({ "twitter": "t".repeat(256) })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
  }
}
