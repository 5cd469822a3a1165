//! Reservations — a customer's commitment against one viewing slot.
//!
//! A reservation is created exactly once, inside the same atomic unit that
//! increments its slot's counter, and is immutable thereafter. The token is
//! the sole handle a customer holds on it afterwards.

use chrono::{DateTime, Utc};
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{property::Property, slot::ViewingSlot};

// ─── Token ───────────────────────────────────────────────────────────────────

/// Number of random bytes behind a reservation token.
const TOKEN_BYTES: usize = 24;

/// Generate an opaque reservation token from the OS CSPRNG.
///
/// Possession of the token is the only authentication the lookup operation
/// performs, so it is a capability rather than a mere identifier: 24 random
/// bytes, hex-encoded to a 48-character string.
pub fn generate_token() -> String {
  let mut bytes = [0u8; TOKEN_BYTES];
  OsRng.fill_bytes(&mut bytes);
  hex::encode(bytes)
}

// ─── Reservation ─────────────────────────────────────────────────────────────

/// A committed reservation. Never updated, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
  pub reservation_id:  Uuid,
  /// Opaque lookup capability; unique across all reservations.
  pub token:           String,
  pub slot_id:         Uuid,
  pub name:            String,
  pub email:           String,
  pub phone:           String,
  /// Whether the customer asked for a staff member to attend the viewing.
  pub staff_requested: bool,
  pub created_at:      DateTime<Utc>,
}

/// Input to [`crate::store::ViewingStore::reserve`]. The id, token, and
/// `created_at` are assigned by the store inside the commit transaction.
#[derive(Debug, Clone)]
pub struct NewReservation {
  pub slot_id:         Uuid,
  pub name:            String,
  pub email:           String,
  pub phone:           String,
  pub staff_requested: bool,
}

/// The confirmation read model: a reservation with its slot and that slot's
/// property, so a caller can render the full confirmation in one fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationDetail {
  pub reservation: Reservation,
  pub slot:        ViewingSlot,
  pub property:    Property,
}

// ─── Tests ───────────────────────────────────────────────────────────────────
