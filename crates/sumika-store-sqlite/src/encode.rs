//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. UUIDs are stored as
//! hyphenated lowercase strings. Booleans are stored as INTEGER 0/1.

use chrono::{DateTime, Utc};
use sumika_core::{
  property::Property,
  reservation::{Reservation, ReservationDetail},
  slot::{SlotAvailability, ViewingSlot},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw columns read directly from a `properties` row.
pub struct RawProperty {
  pub property_id: String,
  pub name:        String,
  pub address:     String,
  pub description: String,
  pub image_url:   String,
  pub rent:        i64,
  pub layout:      String,
  pub floor_size:  f64,
  pub created_at:  String,
}

impl RawProperty {
  pub fn into_property(self) -> Result<Property> {
    Ok(Property {
      property_id: decode_uuid(&self.property_id)?,
      name:        self.name,
      address:     self.address,
      description: self.description,
      image_url:   self.image_url,
      rent:        self.rent,
      layout:      self.layout,
      floor_size:  self.floor_size,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Raw columns read directly from a `viewing_slots` row.
pub struct RawSlot {
  pub slot_id:        String,
  pub property_id:    String,
  pub start_time:     String,
  pub end_time:       String,
  pub capacity:       i64,
  pub reserved_count: i64,
}

impl RawSlot {
  pub fn into_slot(self) -> Result<ViewingSlot> {
    Ok(ViewingSlot {
      slot_id:        decode_uuid(&self.slot_id)?,
      property_id:    decode_uuid(&self.property_id)?,
      start_time:     decode_dt(&self.start_time)?,
      end_time:       decode_dt(&self.end_time)?,
      capacity:       self.capacity,
      reserved_count: self.reserved_count,
    })
  }
}

/// A slot row joined with its derived reservation-row count.
pub struct RawSlotAvailability {
  pub slot:              RawSlot,
  pub reservation_count: i64,
}

impl RawSlotAvailability {
  pub fn into_availability(self) -> Result<SlotAvailability> {
    Ok(SlotAvailability {
      slot:              self.slot.into_slot()?,
      reservation_count: self.reservation_count,
    })
  }
}

/// Raw columns read directly from a `reservations` row.
pub struct RawReservation {
  pub reservation_id:  String,
  pub token:           String,
  pub slot_id:         String,
  pub name:            String,
  pub email:           String,
  pub phone:           String,
  pub staff_requested: bool,
  pub created_at:      String,
}

impl RawReservation {
  pub fn into_reservation(self) -> Result<Reservation> {
    Ok(Reservation {
      reservation_id:  decode_uuid(&self.reservation_id)?,
      token:           self.token,
      slot_id:         decode_uuid(&self.slot_id)?,
      name:            self.name,
      email:           self.email,
      phone:           self.phone,
      staff_requested: self.staff_requested,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

/// The three-table join backing a [`ReservationDetail`].
pub struct RawReservationDetail {
  pub reservation: RawReservation,
  pub slot:        RawSlot,
  pub property:    RawProperty,
}

impl RawReservationDetail {
  pub fn into_detail(self) -> Result<ReservationDetail> {
    Ok(ReservationDetail {
      reservation: self.reservation.into_reservation()?,
      slot:        self.slot.into_slot()?,
      property:    self.property.into_property()?,
    })
  }
}
