//! [`SqliteStore`] — the SQLite implementation of [`ViewingStore`].
//!
//! The two write paths each run inside a single immediate transaction on
//! the store's connection:
//!
//! - day materialization reads the day's slots and, only if the day is
//!   empty, inserts all eight windows with one multi-row statement;
//! - the reservation commit performs the capacity check and the counter
//!   increment as one conditional `UPDATE`, then inserts the reservation
//!   row, so no concurrent committer can observe the gap between them.

use std::path::Path;

use chrono::{NaiveDate, Utc};
use rusqlite::{OptionalExtension as _, TransactionBehavior};
use uuid::Uuid;

use sumika_core::{
  Result as CoreResult,
  property::{NewProperty, Property},
  reservation::{NewReservation, Reservation, ReservationDetail, generate_token},
  slot::{self, DEFAULT_CAPACITY, SlotAvailability},
  store::ViewingStore,
};

use crate::{
  Error, Result,
  encode::{
    RawProperty, RawReservation, RawReservationDetail, RawSlot,
    RawSlotAvailability, encode_dt, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A viewing-reservation store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert a fully-built [`Property`] into the `properties` table.
  async fn insert_property(&self, property: &Property) -> Result<()> {
    let id_str      = encode_uuid(property.property_id);
    let name        = property.name.clone();
    let address     = property.address.clone();
    let description = property.description.clone();
    let image_url   = property.image_url.clone();
    let rent        = property.rent;
    let layout      = property.layout.clone();
    let floor_size  = property.floor_size;
    let at_str      = encode_dt(property.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO properties (
             property_id, name, address, description, image_url,
             rent, layout, floor_size, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            id_str,
            name,
            address,
            description,
            image_url,
            rent,
            layout,
            floor_size,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Get-or-create the slots of one `(property, day)` pair.
  ///
  /// Runs inside an immediate transaction so the read-then-generate pair
  /// is indivisible. A constraint violation during generation means either
  /// a concurrent writer already materialized the day or the property does
  /// not exist (foreign-key miss); both degrade to the plain re-read, so a
  /// missing property surfaces as an empty result set.
  async fn fetch_or_create_day(
    &self,
    property_id: Uuid,
    day: NaiveDate,
  ) -> Result<Vec<SlotAvailability>> {
    let pid = encode_uuid(property_id);
    let (window_start, window_end) = slot::day_window(day);
    let start_str = encode_dt(window_start);
    let end_str   = encode_dt(window_end);

    // Slot ids are minted up front; the insert decides whether they stick.
    let generated: Vec<(String, String, String)> = slot::viewing_windows(day)
      .into_iter()
      .map(|(s, e)| (encode_uuid(Uuid::new_v4()), encode_dt(s), encode_dt(e)))
      .collect();

    let raws: Vec<RawSlotAvailability> = self
      .conn
      .call(move |conn| {
        let tx =
          conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut rows = select_day_rows(&tx, &pid, &start_str, &end_str)?;
        if rows.is_empty() {
          match insert_day_rows(&tx, &pid, &generated) {
            Ok(()) => {}
            // The multi-row insert is all-or-nothing, so after a
            // constraint violation nothing of ours is in the day and the
            // re-read below returns whatever actually exists.
            Err(rusqlite::Error::SqliteFailure(e, _))
              if e.code == rusqlite::ErrorCode::ConstraintViolation => {}
            Err(e) => return Err(e.into()),
          }
          rows = select_day_rows(&tx, &pid, &start_str, &end_str)?;
        }

        tx.commit()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawSlotAvailability::into_availability)
      .collect()
  }

  /// Commit a fully-built [`Reservation`] against its slot.
  ///
  /// One immediate transaction around: conditional increment → insert →
  /// joined read-back. Dropping the transaction on either rejection path
  /// rolls back without a trace.
  async fn commit_reservation(
    &self,
    reservation: Reservation,
  ) -> Result<ReservationDetail> {
    let slot_id = reservation.slot_id;

    let res_id_str  = encode_uuid(reservation.reservation_id);
    let token       = reservation.token.clone();
    let slot_id_str = encode_uuid(reservation.slot_id);
    let name        = reservation.name.clone();
    let email       = reservation.email.clone();
    let phone       = reservation.phone.clone();
    let staff       = reservation.staff_requested;
    let at_str      = encode_dt(reservation.created_at);

    let step = self
      .conn
      .call(move |conn| {
        let tx =
          conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        // The capacity check and the bump are one statement; zero matched
        // rows means the slot is either absent or already full.
        let claimed = tx.execute(
          "UPDATE viewing_slots
           SET reserved_count = reserved_count + 1
           WHERE slot_id = ?1 AND reserved_count < capacity",
          rusqlite::params![slot_id_str],
        )?;

        if claimed == 0 {
          let exists = tx
            .query_row(
              "SELECT 1 FROM viewing_slots WHERE slot_id = ?1",
              rusqlite::params![slot_id_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
          return Ok(if exists {
            ReserveStep::Full
          } else {
            ReserveStep::Missing
          });
        }

        tx.execute(
          "INSERT INTO reservations (
             reservation_id, token, slot_id, name, email, phone,
             staff_requested, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            res_id_str, token, slot_id_str, name, email, phone, staff, at_str,
          ],
        )?;

        let raw =
          match select_detail(&tx, "r.reservation_id = ?1", &res_id_str)? {
            Some(raw) => raw,
            None => return Err(rusqlite::Error::QueryReturnedNoRows.into()),
          };

        tx.commit()?;
        Ok(ReserveStep::Created(raw))
      })
      .await?;

    match step {
      ReserveStep::Missing => Err(Error::SlotNotFound(slot_id)),
      ReserveStep::Full => Err(Error::SlotFull(slot_id)),
      ReserveStep::Created(raw) => raw.into_detail(),
    }
  }
}

/// Outcome of the in-transaction reservation attempt, reported through the
/// `Ok` channel so the rejection paths roll back cleanly.
enum ReserveStep {
  Missing,
  Full,
  Created(RawReservationDetail),
}

// ─── SQL helpers ─────────────────────────────────────────────────────────────

fn read_property_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawProperty> {
  Ok(RawProperty {
    property_id: row.get(0)?,
    name:        row.get(1)?,
    address:     row.get(2)?,
    description: row.get(3)?,
    image_url:   row.get(4)?,
    rent:        row.get(5)?,
    layout:      row.get(6)?,
    floor_size:  row.get(7)?,
    created_at:  row.get(8)?,
  })
}

const PROPERTY_COLUMNS: &str = "property_id, name, address, description, \
                                image_url, rent, layout, floor_size, created_at";

/// One day's slot rows with their derived reservation counts, ordered by
/// start time. The derived count rides along in the same read as the
/// stored counter so the two can never be from different snapshots.
fn select_day_rows(
  conn: &rusqlite::Connection,
  property_id: &str,
  window_start: &str,
  window_end: &str,
) -> rusqlite::Result<Vec<RawSlotAvailability>> {
  let mut stmt = conn.prepare(
    "SELECT s.slot_id, s.property_id, s.start_time, s.end_time,
            s.capacity, s.reserved_count,
            COUNT(r.reservation_id) AS reservation_count
     FROM viewing_slots s
     LEFT JOIN reservations r ON r.slot_id = s.slot_id
     WHERE s.property_id = ?1
       AND s.start_time >= ?2
       AND s.start_time < ?3
     GROUP BY s.slot_id
     ORDER BY s.start_time ASC",
  )?;

  let rows = stmt
    .query_map(
      rusqlite::params![property_id, window_start, window_end],
      |row| {
        Ok(RawSlotAvailability {
          slot:              RawSlot {
            slot_id:        row.get(0)?,
            property_id:    row.get(1)?,
            start_time:     row.get(2)?,
            end_time:       row.get(3)?,
            capacity:       row.get(4)?,
            reserved_count: row.get(5)?,
          },
          reservation_count: row.get(6)?,
        })
      },
    )?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  Ok(rows)
}

/// Insert one day's generated windows as a single multi-row statement, so
/// the batch either lands whole or not at all.
fn insert_day_rows(
  conn: &rusqlite::Connection,
  property_id: &str,
  rows: &[(String, String, String)],
) -> rusqlite::Result<()> {
  let placeholders = (0..rows.len())
    .map(|i| {
      let base = i * 4;
      format!(
        "(?{}, ?{}, ?{}, ?{}, {DEFAULT_CAPACITY}, 0)",
        base + 1,
        base + 2,
        base + 3,
        base + 4
      )
    })
    .collect::<Vec<_>>()
    .join(", ");

  let sql = format!(
    "INSERT INTO viewing_slots
       (slot_id, property_id, start_time, end_time, capacity, reserved_count)
     VALUES {placeholders}"
  );

  let mut values: Vec<&str> = Vec::with_capacity(rows.len() * 4);
  for (slot_id, start, end) in rows {
    values.push(slot_id);
    values.push(property_id);
    values.push(start);
    values.push(end);
  }

  conn.execute(&sql, rusqlite::params_from_iter(values))?;
  Ok(())
}

/// The reservation → slot → property join behind [`ReservationDetail`],
/// filtered by `condition` (a single-`?1` predicate).
fn select_detail(
  conn: &rusqlite::Connection,
  condition: &str,
  value: &str,
) -> rusqlite::Result<Option<RawReservationDetail>> {
  let sql = format!(
    "SELECT r.reservation_id, r.token, r.slot_id, r.name, r.email, r.phone,
            r.staff_requested, r.created_at,
            s.slot_id, s.property_id, s.start_time, s.end_time,
            s.capacity, s.reserved_count,
            p.property_id, p.name, p.address, p.description, p.image_url,
            p.rent, p.layout, p.floor_size, p.created_at
     FROM reservations r
     JOIN viewing_slots s ON s.slot_id = r.slot_id
     JOIN properties p    ON p.property_id = s.property_id
     WHERE {condition}"
  );

  conn
    .query_row(&sql, rusqlite::params![value], |row| {
      Ok(RawReservationDetail {
        reservation: RawReservation {
          reservation_id:  row.get(0)?,
          token:           row.get(1)?,
          slot_id:         row.get(2)?,
          name:            row.get(3)?,
          email:           row.get(4)?,
          phone:           row.get(5)?,
          staff_requested: row.get(6)?,
          created_at:      row.get(7)?,
        },
        slot:        RawSlot {
          slot_id:        row.get(8)?,
          property_id:    row.get(9)?,
          start_time:     row.get(10)?,
          end_time:       row.get(11)?,
          capacity:       row.get(12)?,
          reserved_count: row.get(13)?,
        },
        property:    RawProperty {
          property_id: row.get(14)?,
          name:        row.get(15)?,
          address:     row.get(16)?,
          description: row.get(17)?,
          image_url:   row.get(18)?,
          rent:        row.get(19)?,
          layout:      row.get(20)?,
          floor_size:  row.get(21)?,
          created_at:  row.get(22)?,
        },
      })
    })
    .optional()
}

// ─── ViewingStore impl ───────────────────────────────────────────────────────

impl ViewingStore for SqliteStore {
  // ── Properties ────────────────────────────────────────────────────────────

  async fn list_properties(&self) -> CoreResult<Vec<Property>> {
    let raws: Vec<RawProperty> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PROPERTY_COLUMNS} FROM properties ORDER BY created_at DESC"
        ))?;
        let rows = stmt
          .query_map([], read_property_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::from)?;

    raws
      .into_iter()
      .map(RawProperty::into_property)
      .collect::<Result<Vec<_>>>()
      .map_err(Into::into)
  }

  async fn get_property(&self, id: Uuid) -> CoreResult<Option<Property>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawProperty> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {PROPERTY_COLUMNS} FROM properties \
                 WHERE property_id = ?1"
              ),
              rusqlite::params![id_str],
              read_property_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(Error::from)?;

    raw
      .map(RawProperty::into_property)
      .transpose()
      .map_err(Into::into)
  }

  async fn add_property(&self, input: NewProperty) -> CoreResult<Property> {
    let property = Property {
      property_id: Uuid::new_v4(),
      name:        input.name,
      address:     input.address,
      description: input.description,
      image_url:   input.image_url,
      rent:        input.rent,
      layout:      input.layout,
      floor_size:  input.floor_size,
      created_at:  Utc::now(),
    };

    self.insert_property(&property).await?;
    Ok(property)
  }

  // ── Slots ─────────────────────────────────────────────────────────────────

  async fn day_slots(
    &self,
    property_id: Uuid,
    day: NaiveDate,
  ) -> CoreResult<Vec<SlotAvailability>> {
    self
      .fetch_or_create_day(property_id, day)
      .await
      .map_err(Into::into)
  }

  // ── Reservations ──────────────────────────────────────────────────────────

  async fn reserve(
    &self,
    input: NewReservation,
  ) -> CoreResult<ReservationDetail> {
    let reservation = Reservation {
      reservation_id:  Uuid::new_v4(),
      token:           generate_token(),
      slot_id:         input.slot_id,
      name:            input.name,
      email:           input.email,
      phone:           input.phone,
      staff_requested: input.staff_requested,
      created_at:      Utc::now(),
    };

    self.commit_reservation(reservation).await.map_err(Into::into)
  }

  async fn find_reservation(
    &self,
    token: &str,
  ) -> CoreResult<Option<ReservationDetail>> {
    let token = token.to_owned();

    let raw: Option<RawReservationDetail> = self
      .conn
      .call(move |conn| Ok(select_detail(conn, "r.token = ?1", &token)?))
      .await
      .map_err(Error::from)?;

    raw
      .map(RawReservationDetail::into_detail)
      .transpose()
      .map_err(Into::into)
  }

  // ── Auditing ──────────────────────────────────────────────────────────────

  async fn audit_slot_counts(&self) -> CoreResult<Vec<Uuid>> {
    let ids: Vec<String> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT s.slot_id
           FROM viewing_slots s
           LEFT JOIN reservations r ON r.slot_id = s.slot_id
           GROUP BY s.slot_id
           HAVING s.reserved_count != COUNT(r.reservation_id)",
        )?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::from)?;

    ids
      .iter()
      .map(|s| crate::encode::decode_uuid(s))
      .collect::<Result<Vec<_>>>()
      .map_err(Into::into)
  }
}
