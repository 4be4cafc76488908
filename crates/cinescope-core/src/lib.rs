//! Core types and trait definitions for CineScope.
//!
//! This crate is deliberately free of database and terminal dependencies.
//! Storage backends implement [`store::EventStore`] and [`catalog::Catalog`];
//! the logging, statistics and presentation layers depend on those traits,
//! not on any concrete backend.

// Native `async fn` in traits; see the `Send` bounds spelled out on each
// method instead.
#![allow(async_fn_in_trait)]

pub mod catalog;
pub mod category;
pub mod error;
pub mod event;
pub mod stats;
pub mod store;

pub use error::{Error, Result};
