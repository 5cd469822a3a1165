//! Handlers for `/properties` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/properties` | Newest listing first |
//! | `GET`  | `/properties/:id` | 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use sumika_core::{property::Property, store::ViewingStore};
use uuid::Uuid;

use crate::error::ApiError;

/// `GET /properties`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Property>>, ApiError>
where
  S: ViewingStore,
{
  let properties = store.list_properties().await?;
  Ok(Json(properties))
}

/// `GET /properties/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Property>, ApiError>
where
  S: ViewingStore,
{
  let property = store
    .get_property(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("property {id} not found")))?;
  Ok(Json(property))
}
