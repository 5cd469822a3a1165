//! Error types for `sumika-core`.
//!
//! Domain rejections get their own variants; anything infrastructural is
//! folded into [`Error::Storage`] and is safe to retry from scratch, since
//! every failed write unit leaves the store unchanged.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  /// The referenced slot does not exist. Terminal; not retryable.
  #[error("slot not found: {0}")]
  SlotNotFound(Uuid),

  /// The slot's capacity is already fully committed. Terminal for this
  /// slot; the caller should re-query available slots and pick another.
  #[error("slot {0} is fully booked")]
  SlotFull(Uuid),

  /// Store unavailable, transaction conflict, or similar transient
  /// failure. The whole operation may be retried from scratch.
  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
