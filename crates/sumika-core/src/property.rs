//! Property — a rental listing offered for viewings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A listing. The reservation core only ever reads these; rows are written
/// by the seeding helper standing in for the administrative side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
  pub property_id: Uuid,
  pub name:        String,
  pub address:     String,
  pub description: String,
  pub image_url:   String,
  /// Monthly rent in yen.
  pub rent:        i64,
  /// Layout code, e.g. "1LDK".
  pub layout:      String,
  /// Floor size in square metres.
  pub floor_size:  f64,
  pub created_at:  DateTime<Utc>,
}

/// Input to [`crate::store::ViewingStore::add_property`].
/// `property_id` and `created_at` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewProperty {
  pub name:        String,
  pub address:     String,
  pub description: String,
  pub image_url:   String,
  pub rent:        i64,
  pub layout:      String,
  pub floor_size:  f64,
}
