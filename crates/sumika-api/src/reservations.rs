//! Handlers for `/reservations` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/reservations` | Body: [`CreateReservationBody`]; 201 + detail |
//! | `GET`  | `/reservations/:token` | 404 if the token matches nothing |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use sumika_core::{
  reservation::{NewReservation, ReservationDetail},
  store::ViewingStore,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;

/// JSON body accepted by `POST /reservations`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReservationBody {
  pub slot_id:         Uuid,
  #[validate(length(min = 1, message = "name must not be empty"))]
  pub name:            String,
  #[validate(email(message = "email address is invalid"))]
  pub email:           String,
  #[validate(length(min = 10, message = "phone number must be at least 10 characters"))]
  pub phone:           String,
  #[serde(default)]
  pub staff_requested: bool,
}

/// `POST /reservations` — 201 + the committed [`ReservationDetail`].
///
/// Shape validation runs first and reports every violated field at once;
/// only then is the slot looked up and the capacity checked.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateReservationBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ViewingStore,
{
  body.validate()?;

  let detail = store
    .reserve(NewReservation {
      slot_id:         body.slot_id,
      name:            body.name,
      email:           body.email,
      phone:           body.phone,
      staff_requested: body.staff_requested,
    })
    .await?;
  Ok((StatusCode::CREATED, Json(detail)))
}

/// `GET /reservations/:token`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(token): Path<String>,
) -> Result<Json<ReservationDetail>, ApiError>
where
  S: ViewingStore,
{
  let detail = store
    .find_reservation(&token)
    .await?
    .ok_or_else(|| ApiError::NotFound("reservation not found".to_string()))?;
  Ok(Json(detail))
}
