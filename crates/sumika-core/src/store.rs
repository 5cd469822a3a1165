//! The `ViewingStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `sumika-store-sqlite`). Higher layers (`sumika-api`, `sumika-server`)
//! depend on this abstraction, not on any concrete backend.

use std::future::Future;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
  Result,
  property::{NewProperty, Property},
  reservation::{NewReservation, ReservationDetail},
  slot::SlotAvailability,
};

/// Abstraction over a viewing-reservation store backend.
///
/// The two write paths — `day_slots` when it materializes a day, and
/// `reserve` — must each behave as a single indivisible unit with respect
/// to every concurrent caller. Everything else is a plain read and
/// tolerates slightly stale counters, since the commit path re-validates
/// with its own isolated read.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ViewingStore: Send + Sync {
  // ── Properties ────────────────────────────────────────────────────────

  /// List all properties, newest first.
  fn list_properties(
    &self,
  ) -> impl Future<Output = Result<Vec<Property>>> + Send + '_;

  /// Retrieve a property by id. Returns `None` if not found.
  fn get_property(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Property>>> + Send + '_;

  /// Create and persist a listing.
  ///
  /// Used by the seeding helper; the HTTP surface never exposes this.
  fn add_property(
    &self,
    input: NewProperty,
  ) -> impl Future<Output = Result<Property>> + Send + '_;

  // ── Slots ─────────────────────────────────────────────────────────────

  /// Return the slots for `(property_id, day)` ordered by start time,
  /// materializing the day's eight windows first if none exist yet.
  ///
  /// Idempotent: once a day has any slots, repeated calls return the same
  /// set and never top it up. A `property_id` with no matching property
  /// yields an empty vec.
  fn day_slots(
    &self,
    property_id: Uuid,
    day: NaiveDate,
  ) -> impl Future<Output = Result<Vec<SlotAvailability>>> + Send + '_;

  // ── Reservations ──────────────────────────────────────────────────────

  /// Atomically commit a reservation against `input.slot_id`.
  ///
  /// The capacity check, the reservation insert, and the counter
  /// increment happen inside one unit; with capacity 1, concurrent calls
  /// against the same slot produce exactly one success. Fails with
  /// [`crate::Error::SlotNotFound`] or [`crate::Error::SlotFull`]; any
  /// storage failure rolls the whole unit back.
  fn reserve(
    &self,
    input: NewReservation,
  ) -> impl Future<Output = Result<ReservationDetail>> + Send + '_;

  /// Look up a reservation by its token, with slot and property attached.
  /// Returns `None` if no reservation carries the token.
  fn find_reservation<'a>(
    &'a self,
    token: &'a str,
  ) -> impl Future<Output = Result<Option<ReservationDetail>>> + Send + 'a;

  // ── Auditing ──────────────────────────────────────────────────────────

  /// Ids of slots whose stored `reserved_count` disagrees with the actual
  /// number of reservation rows. Healthy stores return an empty vec; no
  /// runtime path depends on this check.
  fn audit_slot_counts(
    &self,
  ) -> impl Future<Output = Result<Vec<Uuid>>> + Send + '_;
}
