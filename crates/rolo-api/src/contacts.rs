//! Handlers for `/contacts` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/contacts` | Optional `?q=` substring filter on first/last name |
//! | `POST`   | `/contacts` | Body: [`NewContact`]; `{}` creates a blank contact; returns 201 |
//! | `GET`    | `/contacts/:id` | 404 if missing or if the id is not a number |
//! | `PATCH`  | `/contacts/:id` | Body: [`ContactPatch`]; 204 even if nothing matched |
//! | `DELETE` | `/contacts/:id` | 204 even if nothing matched |
//! | `POST`   | `/contacts/:id/favorite` | Toggle; 204 even if nothing matched |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use rolo_core::{
  contact::{Contact, ContactId, ContactPatch, NewContact},
  error::Classify,
  store::{ContactQuery, ContactStore},
};
use serde::Deserialize;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  /// Case-insensitive substring matched against first and last name.
  pub q: Option<String>,
}

/// `GET /contacts[?q=<text>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Contact>>, ApiError>
where
  S: ContactStore,
  S::Error: std::error::Error + Classify + Send + Sync + 'static,
{
  let query = ContactQuery { text: params.q };
  let contacts = store
    .list_contacts(&query)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(contacts))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /contacts` — returns 201 + the stored [`Contact`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewContact>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContactStore,
  S::Error: std::error::Error + Classify + Send + Sync + 'static,
{
  let contact = store
    .create_contact(body)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(contact)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /contacts/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Contact>, ApiError>
where
  S: ContactStore,
  S::Error: std::error::Error + Classify + Send + Sync + 'static,
{
  let contact = store
    .find_contact(&id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("contact {id} not found")))?;
  Ok(Json(contact))
}

// ─── Writes ───────────────────────────────────────────────────────────────────

/// `PATCH /contacts/:id` — only the keys present in the body are changed;
/// `null` clears a field.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  Json(patch): Json<ContactPatch>,
) -> Result<StatusCode, ApiError>
where
  S: ContactStore,
  S::Error: std::error::Error + Classify + Send + Sync + 'static,
{
  if let Ok(id) = id.parse::<ContactId>() {
    store
      .update_contact(id, patch)
      .await
      .map_err(ApiError::store)?;
  }
  Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /contacts/:id`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: ContactStore,
  S::Error: std::error::Error + Classify + Send + Sync + 'static,
{
  if let Ok(id) = id.parse::<ContactId>() {
    store.delete_contact(id).await.map_err(ApiError::store)?;
  }
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /contacts/:id/favorite`
pub async fn toggle_favorite<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: ContactStore,
  S::Error: std::error::Error + Classify + Send + Sync + 'static,
{
  if let Ok(id) = id.parse::<ContactId>() {
    store.toggle_favorite(id).await.map_err(ApiError::store)?;
  }
  Ok(StatusCode::NO_CONTENT)
}
