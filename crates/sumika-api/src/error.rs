//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Validation and business rejections carry enough structure for the
//! caller to act; storage failures are logged here and surfaced as a
//! generic retry prompt without internal detail.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

/// A single violated input field with its human-readable reason.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
  pub field:   String,
  pub message: String,
}

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("validation failed")]
  Validation(Vec<FieldError>),

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<sumika_core::Error> for ApiError {
  fn from(e: sumika_core::Error) -> Self {
    match e {
      sumika_core::Error::SlotNotFound(id) => {
        Self::NotFound(format!("slot {id} not found"))
      }
      sumika_core::Error::SlotFull(_) => Self::BadRequest(
        "this slot is fully booked, please choose another".to_string(),
      ),
      sumika_core::Error::Storage(e) => Self::Internal(e),
    }
  }
}

impl From<ValidationErrors> for ApiError {
  fn from(errors: ValidationErrors) -> Self {
    let mut details: Vec<FieldError> = errors
      .field_errors()
      .iter()
      .flat_map(|(field, errs)| {
        errs.iter().map(|e| FieldError {
          field:   (*field).to_string(),
          message: e
            .message
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| e.code.to_string()),
        })
      })
      .collect();
    // field_errors() iterates a HashMap; sort for a stable response shape.
    details.sort_by(|a, b| a.field.cmp(&b.field));
    Self::Validation(details)
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::NotFound(m) => {
        (StatusCode::NOT_FOUND, Json(json!({ "error": m }))).into_response()
      }
      ApiError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": m }))).into_response()
      }
      ApiError::Validation(details) => (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "invalid input", "details": details })),
      )
        .into_response(),
      ApiError::Internal(e) => {
        tracing::error!(error = %e, "request failed on a storage error");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "error": "temporary failure, please try again" })),
        )
          .into_response()
      }
    }
  }
}
