//! The fixed set of search kinds.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{Error, Result};

/// The kind of a recorded search action.
///
/// The snake_case text form is what is stored in `search_events.category`.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Category {
  Genre,
  Year,
  GenreYear,
  Keyword,
  Actor,
}

impl Category {
  /// Column text for this category.
  pub fn as_str(self) -> &'static str { self.into() }

  /// Parse a stored category, rejecting anything outside the five kinds.
  pub fn parse(s: &str) -> Result<Self> {
    Self::from_str(s).map_err(|_| Error::UnknownCategory(s.to_owned()))
  }

  /// Menu-facing name, e.g. `"Genre & Year"`.
  pub fn title(self) -> &'static str {
    match self {
      Self::Genre => "Genre",
      Self::Year => "Year",
      Self::GenreYear => "Genre & Year",
      Self::Keyword => "Keyword",
      Self::Actor => "Actor",
    }
  }

  /// Which of the optional event fields a search of this kind populates.
  pub fn expected_fields(self) -> &'static str {
    match self {
      Self::Genre => "genre only",
      Self::Year => "year only",
      Self::GenreYear => "genre and year only",
      Self::Keyword | Self::Actor => "free text only",
    }
  }
}
