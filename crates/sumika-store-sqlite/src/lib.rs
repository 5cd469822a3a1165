//! SQLite backend for the Sumika viewing-reservation store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. The two write paths (day
//! materialization and reservation commit) run inside immediate
//! transactions; see [`store::SqliteStore`].

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
