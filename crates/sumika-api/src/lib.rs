//! JSON REST API for the Sumika viewing-reservation service.
//!
//! Exposes an axum [`Router`] backed by any
//! [`sumika_core::store::ViewingStore`]. TLS and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", sumika_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod properties;
pub mod reservations;
pub mod slots;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use sumika_core::store::ViewingStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ViewingStore + 'static,
{
  Router::new()
    // Properties
    .route("/properties", get(properties::list::<S>))
    .route("/properties/{id}", get(properties::get_one::<S>))
    .route("/properties/{id}/slots", get(slots::list_for_day::<S>))
    // Reservations
    .route("/reservations", post(reservations::create::<S>))
    .route("/reservations/{token}", get(reservations::get_one::<S>))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────
