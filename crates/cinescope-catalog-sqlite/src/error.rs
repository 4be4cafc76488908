//! Error type for `cinescope-catalog-sqlite`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("catalog unavailable at {path:?}: {source}")]
  Unavailable {
    path:   PathBuf,
    #[source]
    source: tokio_rusqlite::Error,
  },

  #[error("catalog query failed: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("invalid keyword pattern: {0}")]
  Pattern(#[from] regex::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
