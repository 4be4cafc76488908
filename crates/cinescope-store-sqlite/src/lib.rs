//! SQLite event store for CineScope's query log.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. The store file is created on first use
//! and its schema is brought up to date on every open.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteEventStore;

#[cfg(test)]
mod tests;
