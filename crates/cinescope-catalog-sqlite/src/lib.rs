//! Read-only movie catalog over a sakila-layout SQLite database.
//!
//! Expects the `film`, `category`, `film_category`, `actor` and `film_actor`
//! tables. The file is opened read-only; nothing here writes to it.

mod catalog;
mod queries;

pub mod error;

pub use catalog::SqliteCatalog;
pub use error::{Error, Result};
