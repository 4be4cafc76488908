//! Error types for `cinescope-core`.

use thiserror::Error;

use crate::category::Category;

#[derive(Debug, Error)]
pub enum Error {
  /// The populated fields of a search do not match its category.
  #[error("invalid fields for {category} search: expected {expected}")]
  InvalidCategoryFields {
    category: Category,
    expected: &'static str,
  },

  #[error("unknown search category: {0:?}")]
  UnknownCategory(String),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
