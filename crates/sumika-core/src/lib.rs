//! Core types and trait definitions for the Sumika viewing-reservation
//! service.
//!
//! This crate is deliberately free of HTTP and database dependencies;
//! every other crate in the workspace builds on the types and the
//! [`store::ViewingStore`] trait defined here.

pub mod error;
pub mod property;
pub mod reservation;
pub mod slot;
pub mod store;

pub use error::{Error, Result};
