//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Duration, NaiveDate, Timelike};
use sumika_core::{
  property::NewProperty,
  reservation::NewReservation,
  slot::{DEFAULT_CAPACITY, OPENING_HOUR},
  store::ViewingStore,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn listing() -> NewProperty {
  NewProperty {
    name:        "サンライズマンション 301号室".into(),
    address:     "東京都渋谷区神宮前1-2-3".into(),
    description: "駅徒歩5分、南向きで日当たり良好。".into(),
    image_url:   "https://example.com/sunrise.jpg".into(),
    rent:        120_000,
    layout:      "1LDK".into(),
    floor_size:  45.5,
  }
}

fn day() -> NaiveDate { NaiveDate::from_ymd_opt(2025, 6, 1).unwrap() }

fn booking(slot_id: Uuid) -> NewReservation {
  NewReservation {
    slot_id,
    name: "Taro Yamada".into(),
    email: "taro@example.com".into(),
    phone: "0901234567".into(),
    staff_requested: true,
  }
}

// ─── Properties ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_property() {
  let s = store().await;

  let property = s.add_property(listing()).await.unwrap();
  assert_eq!(property.layout, "1LDK");

  let fetched = s.get_property(property.property_id).await.unwrap();
  assert!(fetched.is_some());
  let fetched = fetched.unwrap();
  assert_eq!(fetched.property_id, property.property_id);
  assert_eq!(fetched.rent, 120_000);
  assert_eq!(fetched.floor_size, 45.5);
}

#[tokio::test]
async fn get_property_missing_returns_none() {
  let s = store().await;
  let result = s.get_property(Uuid::new_v4()).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn list_properties_newest_first() {
  let s = store().await;

  let older = s.add_property(listing()).await.unwrap();
  tokio::time::sleep(std::time::Duration::from_millis(10)).await;
  let newer = s.add_property(listing()).await.unwrap();

  let all = s.list_properties().await.unwrap();
  assert_eq!(all.len(), 2);
  assert_eq!(all[0].property_id, newer.property_id);
  assert_eq!(all[1].property_id, older.property_id);
}

// ─── Slot materialization ────────────────────────────────────────────────────

#[tokio::test]
async fn day_slots_materializes_eight_windows() {
  let s = store().await;
  let property = s.add_property(listing()).await.unwrap();

  let slots = s.day_slots(property.property_id, day()).await.unwrap();
  assert_eq!(slots.len(), 8);

  for (i, entry) in slots.iter().enumerate() {
    let slot = &entry.slot;
    assert_eq!(slot.property_id, property.property_id);
    assert_eq!(slot.start_time.hour(), OPENING_HOUR + i as u32);
    assert_eq!(slot.start_time.minute(), 0);
    assert_eq!(slot.end_time - slot.start_time, Duration::hours(1));
    assert_eq!(slot.capacity, DEFAULT_CAPACITY);
    assert_eq!(slot.reserved_count, 0);
    assert_eq!(entry.reservation_count, 0);
  }
}

#[tokio::test]
async fn day_slots_is_idempotent() {
  let s = store().await;
  let property = s.add_property(listing()).await.unwrap();

  let first = s.day_slots(property.property_id, day()).await.unwrap();
  let second = s.day_slots(property.property_id, day()).await.unwrap();

  let first_ids: Vec<Uuid> = first.iter().map(|a| a.slot.slot_id).collect();
  let second_ids: Vec<Uuid> = second.iter().map(|a| a.slot.slot_id).collect();
  assert_eq!(first_ids, second_ids);
}

#[tokio::test]
async fn day_slots_for_unknown_property_is_empty() {
  let s = store().await;
  let slots = s.day_slots(Uuid::new_v4(), day()).await.unwrap();
  assert!(slots.is_empty());
}

#[tokio::test]
async fn separate_days_get_separate_slots() {
  let s = store().await;
  let property = s.add_property(listing()).await.unwrap();

  let sunday = s.day_slots(property.property_id, day()).await.unwrap();
  let monday = s
    .day_slots(property.property_id, day().succ_opt().unwrap())
    .await
    .unwrap();

  assert_eq!(sunday.len(), 8);
  assert_eq!(monday.len(), 8);
  for (a, b) in sunday.iter().zip(monday.iter()) {
    assert_ne!(a.slot.slot_id, b.slot.slot_id);
    assert_eq!(b.slot.start_time - a.slot.start_time, Duration::hours(24));
  }
}

// ─── Reservation commit ──────────────────────────────────────────────────────

#[tokio::test]
async fn reserve_round_trips_through_token() {
  let s = store().await;
  let property = s.add_property(listing()).await.unwrap();
  let slots = s.day_slots(property.property_id, day()).await.unwrap();

  // 11:00–12:00.
  let slot_id = slots[1].slot.slot_id;
  let detail = s.reserve(booking(slot_id)).await.unwrap();

  assert_eq!(detail.reservation.slot_id, slot_id);
  assert_eq!(detail.reservation.name, "Taro Yamada");
  assert_eq!(detail.reservation.email, "taro@example.com");
  assert_eq!(detail.reservation.phone, "0901234567");
  assert!(detail.reservation.staff_requested);
  assert_eq!(detail.reservation.token.len(), 48);
  assert_eq!(detail.slot.slot_id, slot_id);
  assert_eq!(detail.slot.reserved_count, 1);
  assert_eq!(detail.property.property_id, property.property_id);

  let found = s
    .find_reservation(&detail.reservation.token)
    .await
    .unwrap()
    .expect("reservation by token");
  assert_eq!(
    found.reservation.reservation_id,
    detail.reservation.reservation_id
  );
  assert_eq!(found.slot.start_time.hour(), 11);
  assert_eq!(found.property.name, property.name);
}

#[tokio::test]
async fn find_reservation_unknown_token_returns_none() {
  let s = store().await;
  let result = s.find_reservation("not-a-token").await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn reserve_missing_slot_errors() {
  let s = store().await;
  let err = s.reserve(booking(Uuid::new_v4())).await.unwrap_err();
  assert!(matches!(err, sumika_core::Error::SlotNotFound(_)));
}

#[tokio::test]
async fn reserve_full_slot_errors_and_leaves_no_trace() {
  let s = store().await;
  let property = s.add_property(listing()).await.unwrap();
  let slots = s.day_slots(property.property_id, day()).await.unwrap();
  let slot_id = slots[0].slot.slot_id;

  s.reserve(booking(slot_id)).await.unwrap();
  let err = s.reserve(booking(slot_id)).await.unwrap_err();
  assert!(matches!(err, sumika_core::Error::SlotFull(id) if id == slot_id));

  // The losing attempt must not have bumped the counter or left a row.
  let slots = s.day_slots(property.property_id, day()).await.unwrap();
  assert_eq!(slots[0].slot.reserved_count, 1);
  assert_eq!(slots[0].reservation_count, 1);
}

#[tokio::test]
async fn concurrent_reservations_never_overbook() {
  let s = store().await;
  let property = s.add_property(listing()).await.unwrap();
  let slots = s.day_slots(property.property_id, day()).await.unwrap();
  let slot_id = slots[2].slot.slot_id;

  let (r1, r2, r3, r4) = tokio::join!(
    s.reserve(booking(slot_id)),
    s.reserve(booking(slot_id)),
    s.reserve(booking(slot_id)),
    s.reserve(booking(slot_id)),
  );

  let results = [r1, r2, r3, r4];
  let successes = results.iter().filter(|r| r.is_ok()).count();
  assert_eq!(successes, 1);
  for result in &results {
    if let Err(e) = result {
      assert!(matches!(e, sumika_core::Error::SlotFull(_)));
    }
  }

  let slots = s.day_slots(property.property_id, day()).await.unwrap();
  assert_eq!(slots[2].slot.reserved_count, 1);
  assert_eq!(slots[2].reservation_count, 1);
}

// ─── Auditing ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn audit_is_clean_after_commits() {
  let s = store().await;
  let property = s.add_property(listing()).await.unwrap();
  let slots = s.day_slots(property.property_id, day()).await.unwrap();

  s.reserve(booking(slots[0].slot.slot_id)).await.unwrap();
  s.reserve(booking(slots[1].slot.slot_id)).await.unwrap();

  assert!(s.audit_slot_counts().await.unwrap().is_empty());
}

#[tokio::test]
async fn audit_flags_a_drifted_counter() {
  let s = store().await;
  let property = s.add_property(listing()).await.unwrap();
  let slots = s.day_slots(property.property_id, day()).await.unwrap();
  let slot_id = slots[0].slot.slot_id;

  s.reserve(booking(slot_id)).await.unwrap();

  // Skew the stored counter behind the store's back.
  s.conn
    .call(|conn| {
      conn.execute("UPDATE viewing_slots SET reserved_count = 0", [])?;
      Ok(())
    })
    .await
    .unwrap();

  let drifted = s.audit_slot_counts().await.unwrap();
  assert_eq!(drifted, vec![slot_id]);
}
