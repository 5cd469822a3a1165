//! Viewing slots — the one-hour bookable windows offered for a property.
//!
//! A day's slots are materialized lazily the first time any client asks for
//! them; see [`crate::store::ViewingStore::day_slots`]. The window
//! generation itself is pure and lives here so it can be tested without a
//! database.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Business hours ──────────────────────────────────────────────────────────

/// First bookable hour of the day.
pub const OPENING_HOUR: u32 = 10;
/// Hour the last slot ends; no slot starts at or after this hour.
pub const CLOSING_HOUR: u32 = 18;
/// Maximum simultaneous reservations a freshly generated slot accepts.
pub const DEFAULT_CAPACITY: i64 = 1;

/// The UTC half-open interval `[00:00, +24h)` covering `day`.
pub fn day_window(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
  let start = day.and_time(NaiveTime::MIN).and_utc();
  (start, start + Duration::hours(24))
}

/// The eight `(start, end)` pairs a freshly materialized day consists of:
/// one-hour windows from [`OPENING_HOUR`] up to [`CLOSING_HOUR`].
pub fn viewing_windows(day: NaiveDate) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
  let midnight = day.and_time(NaiveTime::MIN).and_utc();
  (OPENING_HOUR..CLOSING_HOUR)
    .map(|hour| {
      let start = midnight + Duration::hours(i64::from(hour));
      (start, start + Duration::hours(1))
    })
    .collect()
}

// ─── ViewingSlot ─────────────────────────────────────────────────────────────

/// A one-hour bookable window for one property on one day.
///
/// `reserved_count` is the authoritative counter checked by the commit
/// path; it only ever moves upward (there is no cancellation).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewingSlot {
  pub slot_id:        Uuid,
  pub property_id:    Uuid,
  pub start_time:     DateTime<Utc>,
  pub end_time:       DateTime<Utc>,
  pub capacity:       i64,
  pub reserved_count: i64,
}

/// A slot annotated with the reservation-row count derived in the same read
/// as the stored counter. The derived count is for display only; capacity
/// checks always use `slot.reserved_count`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotAvailability {
  pub slot:              ViewingSlot,
  pub reservation_count: i64,
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::Timelike;

  use super::*;

  fn day() -> NaiveDate { NaiveDate::from_ymd_opt(2025, 6, 1).unwrap() }

  #[test]
  fn eight_one_hour_windows() {
    let windows = viewing_windows(day());
    assert_eq!(windows.len(), 8);
    for (i, (start, end)) in windows.iter().enumerate() {
      assert_eq!(start.hour(), OPENING_HOUR + i as u32);
      assert_eq!(start.minute(), 0);
      assert_eq!(*end - *start, Duration::hours(1));
    }
  }

  #[test]
  fn windows_fall_inside_the_day() {
    let (day_start, day_end) = day_window(day());
    for (start, end) in viewing_windows(day()) {
      assert!(start >= day_start);
      assert!(end <= day_end);
    }
  }

  #[test]
  fn day_window_spans_24_hours() {
    let (start, end) = day_window(day());
    assert_eq!(end - start, Duration::hours(24));
    assert_eq!(start.hour(), 0);
  }
}
