//! SQL schema for the Sumika SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS properties (
    property_id TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    address     TEXT NOT NULL,
    description TEXT NOT NULL,
    image_url   TEXT NOT NULL,
    rent        INTEGER NOT NULL,  -- monthly rent, yen
    layout      TEXT NOT NULL,     -- e.g. '1LDK'
    floor_size  REAL NOT NULL,     -- square metres
    created_at  TEXT NOT NULL      -- ISO 8601 UTC; store-assigned
);

-- A day's slots are created once and never deleted. reserved_count moves
-- only upward, and only through the reservation commit path.
-- The UNIQUE pair keeps slot identity stable even when two writers try to
-- materialize the same day.
CREATE TABLE IF NOT EXISTS viewing_slots (
    slot_id        TEXT PRIMARY KEY,
    property_id    TEXT NOT NULL REFERENCES properties(property_id),
    start_time     TEXT NOT NULL,  -- ISO 8601 UTC
    end_time       TEXT NOT NULL,  -- start_time + 1 hour
    capacity       INTEGER NOT NULL DEFAULT 1,
    reserved_count INTEGER NOT NULL DEFAULT 0,
    CHECK  (reserved_count >= 0 AND reserved_count <= capacity),
    UNIQUE (property_id, start_time)
);

-- Reservations are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS reservations (
    reservation_id  TEXT PRIMARY KEY,
    token           TEXT NOT NULL UNIQUE,
    slot_id         TEXT NOT NULL REFERENCES viewing_slots(slot_id),
    name            TEXT NOT NULL,
    email           TEXT NOT NULL,
    phone           TEXT NOT NULL,
    staff_requested INTEGER NOT NULL DEFAULT 0,
    created_at      TEXT NOT NULL   -- ISO 8601 UTC; store-assigned
);

CREATE INDEX IF NOT EXISTS properties_created_idx ON properties(created_at);
CREATE INDEX IF NOT EXISTS reservations_slot_idx  ON reservations(slot_id);

PRAGMA user_version = 1;
";
