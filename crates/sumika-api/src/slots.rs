//! Handler for `/properties/:id/slots`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;
use sumika_core::{slot::SlotAvailability, store::ViewingStore};
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct SlotsParams {
  /// Calendar date, `YYYY-MM-DD`.
  pub date: Option<String>,
}

/// `GET /properties/:id/slots?date=YYYY-MM-DD`
///
/// Returns the day's slots ordered by start time, materializing them on
/// first access. The date is validated before any store access; an unknown
/// property id yields an empty array, not an error.
pub async fn list_for_day<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Query(params): Query<SlotsParams>,
) -> Result<Json<Vec<SlotAvailability>>, ApiError>
where
  S: ViewingStore,
{
  let date = params.date.ok_or_else(|| {
    ApiError::BadRequest("date query parameter is required".to_string())
  })?;
  let day = NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|_| {
    ApiError::BadRequest(format!("invalid date {date:?}, expected YYYY-MM-DD"))
  })?;

  let slots = store.day_slots(id, day).await?;
  Ok(Json(slots))
}
