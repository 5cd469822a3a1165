//! Error type for `sumika-store-sqlite`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// Attempted to reserve against a slot id with no row.
  #[error("slot not found: {0}")]
  SlotNotFound(Uuid),

  /// The conditional increment matched no row because the slot is at
  /// capacity.
  #[error("slot {0} is fully booked")]
  SlotFull(Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Fold into the domain taxonomy: the two business rejections keep their
/// identity, everything else is a retryable storage failure.
impl From<Error> for sumika_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::SlotNotFound(id) => Self::SlotNotFound(id),
      Error::SlotFull(id) => Self::SlotFull(id),
      other => Self::Storage(Box::new(other)),
    }
  }
}
