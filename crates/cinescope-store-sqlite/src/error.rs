//! Error type for `cinescope-store-sqlite`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The store file could not be opened, created or initialised.
  #[error("event store unavailable at {path:?}: {source}")]
  StoreUnavailable {
    path:   PathBuf,
    #[source]
    source: tokio_rusqlite::Error,
  },

  #[error("event store write failed: {0}")]
  Write(#[source] tokio_rusqlite::Error),

  #[error("event store read failed: {0}")]
  Read(#[source] tokio_rusqlite::Error),

  #[error("event store close failed: {0}")]
  Close(#[source] tokio_rusqlite::Error),

  /// A stored column value has the wrong type or is out of range.
  #[error("undecodable {column} value: {value}")]
  Decode {
    column: &'static str,
    value:  String,
  },

  #[error("core error: {0}")]
  Core(#[from] cinescope_core::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
