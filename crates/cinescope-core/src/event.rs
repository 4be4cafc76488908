//! Search events and keyword occurrences.
//!
//! Both are append-only: a row is written once when the user submits a search
//! and is never updated or deleted. A [`KeywordOccurrence`] refers to its
//! event by id only; nothing enforces or cascades that link.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, category::Category};

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// Store-assigned surrogate key of a [`SearchEvent`].
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EventId(pub i64);

impl fmt::Display for EventId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { fmt::Display::fmt(&self.0, f) }
}

// ─── Search query ────────────────────────────────────────────────────────────

/// What the user searched for, one variant per [`Category`].
///
/// Each variant carries exactly the fields its category uses, so a value of
/// this type can always be written without further checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum SearchQuery {
  Genre { genre: String },
  Year { year: i32 },
  GenreYear { genre: String, year: i32 },
  Keyword { keyword: String },
  /// Holds the resolved full name when one is known.
  Actor { name: String },
}

impl SearchQuery {
  pub fn genre(genre: impl Into<String>) -> Self {
    Self::Genre { genre: genre.into() }
  }

  pub fn year(year: i32) -> Self { Self::Year { year } }

  pub fn genre_year(genre: impl Into<String>, year: i32) -> Self {
    Self::GenreYear { genre: genre.into(), year }
  }

  pub fn keyword(keyword: impl Into<String>) -> Self {
    Self::Keyword { keyword: keyword.into() }
  }

  pub fn actor(name: impl Into<String>) -> Self {
    Self::Actor { name: name.into() }
  }

  pub fn category(&self) -> Category {
    match self {
      Self::Genre { .. } => Category::Genre,
      Self::Year { .. } => Category::Year,
      Self::GenreYear { .. } => Category::GenreYear,
      Self::Keyword { .. } => Category::Keyword,
      Self::Actor { .. } => Category::Actor,
    }
  }

  /// Human-readable rendering used by every statistics view.
  pub fn label(&self) -> String {
    match self {
      Self::Genre { genre } => format!("Genre: {genre}"),
      Self::Year { year } => format!("Year: {year}"),
      Self::Keyword { keyword } => format!("Keyword: {keyword}"),
      Self::GenreYear { genre, year } => format!("Genre: {genre}, Year: {year}"),
      Self::Actor { name } => format!("Actor: {name}"),
    }
  }

  /// Check the query against the same rules applied to stored rows, so
  /// that anything written can be read back.
  ///
  /// Blank text is rejected: `SearchQuery::keyword("  ")` fails here.
  pub fn checked(self) -> Result<Self> { Self::try_from(self.to_fields()) }

  /// Flatten into the column layout of `search_events`.
  pub fn to_fields(&self) -> SearchFields {
    let mut fields = SearchFields::new(self.category());
    match self {
      Self::Genre { genre } => fields.genre = Some(genre.clone()),
      Self::Year { year } => fields.year = Some(*year),
      Self::GenreYear { genre, year } => {
        fields.genre = Some(genre.clone());
        fields.year = Some(*year);
      }
      Self::Keyword { keyword: text } | Self::Actor { name: text } => {
        fields.free_text = Some(text.clone());
      }
    }
    fields
  }
}

impl fmt::Display for SearchQuery {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.label())
  }
}

// ─── Flat fields ─────────────────────────────────────────────────────────────

/// The loosely-typed column form of a search: a category plus three optional
/// values. Only some combinations are valid; see [`SearchQuery::try_from`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFields {
  pub category:  Category,
  pub genre:     Option<String>,
  pub year:      Option<i32>,
  pub free_text: Option<String>,
}

impl SearchFields {
  pub fn new(category: Category) -> Self {
    Self { category, genre: None, year: None, free_text: None }
  }

  pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
    self.genre = Some(genre.into());
    self
  }

  pub fn with_year(mut self, year: i32) -> Self {
    self.year = Some(year);
    self
  }

  pub fn with_free_text(mut self, text: impl Into<String>) -> Self {
    self.free_text = Some(text.into());
    self
  }
}

/// Blank text counts as absent.
fn present(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<SearchFields> for SearchQuery {
  type Error = Error;

  fn try_from(fields: SearchFields) -> Result<Self> {
    let category = fields.category;
    let genre = present(fields.genre);
    let free_text = present(fields.free_text);

    match (category, genre, fields.year, free_text) {
      (Category::Genre, Some(genre), None, None) => Ok(Self::Genre { genre }),
      (Category::Year, None, Some(year), None) => Ok(Self::Year { year }),
      (Category::GenreYear, Some(genre), Some(year), None) => {
        Ok(Self::GenreYear { genre, year })
      }
      (Category::Keyword, None, None, Some(keyword)) => Ok(Self::Keyword { keyword }),
      (Category::Actor, None, None, Some(name)) => Ok(Self::Actor { name }),
      _ => Err(Error::InvalidCategoryFields {
        category,
        expected: category.expected_fields(),
      }),
    }
  }
}

// ─── Persisted records ───────────────────────────────────────────────────────

/// One recorded search action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEvent {
  pub id:          EventId,
  #[serde(flatten)]
  pub query:       SearchQuery,
  pub recorded_at: DateTime<Utc>,
}

impl SearchEvent {
  pub fn category(&self) -> Category { self.query.category() }

  pub fn label(&self) -> String { self.query.label() }
}

/// One recorded keyword usage, linked to the event that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordOccurrence {
  pub id:          i64,
  /// Weak reference: a lookup key into `search_events`, never ownership.
  pub event_id:    EventId,
  pub keyword:     String,
  pub recorded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn labels_follow_category_templates() {
    assert_eq!(SearchQuery::genre("Comedy").label(), "Genre: Comedy");
    assert_eq!(SearchQuery::year(2006).label(), "Year: 2006");
    assert_eq!(SearchQuery::keyword("dragon").label(), "Keyword: dragon");
    assert_eq!(
      SearchQuery::genre_year("Drama", 2006).label(),
      "Genre: Drama, Year: 2006"
    );
    assert_eq!(
      SearchQuery::actor("PENELOPE GUINESS").label(),
      "Actor: PENELOPE GUINESS"
    );
  }

  #[test]
  fn valid_fields_convert_for_every_category() {
    let cases = [
      (SearchFields::new(Category::Genre).with_genre("Comedy"), SearchQuery::genre("Comedy")),
      (SearchFields::new(Category::Year).with_year(2006), SearchQuery::year(2006)),
      (
        SearchFields::new(Category::GenreYear).with_genre("Drama").with_year(2006),
        SearchQuery::genre_year("Drama", 2006),
      ),
      (
        SearchFields::new(Category::Keyword).with_free_text("dragon"),
        SearchQuery::keyword("dragon"),
      ),
      (
        SearchFields::new(Category::Actor).with_free_text("NICK WAHLBERG"),
        SearchQuery::actor("NICK WAHLBERG"),
      ),
    ];

    for (fields, expected) in cases {
      assert_eq!(SearchQuery::try_from(fields).unwrap(), expected);
    }
  }

  #[test]
  fn extra_field_is_rejected() {
    let fields = SearchFields::new(Category::Genre)
      .with_genre("Comedy")
      .with_year(2006);
    let err = SearchQuery::try_from(fields).unwrap_err();
    assert!(matches!(
      err,
      Error::InvalidCategoryFields { category: Category::Genre, .. }
    ));
  }

  #[test]
  fn missing_field_is_rejected() {
    let fields = SearchFields::new(Category::GenreYear).with_genre("Comedy");
    assert!(SearchQuery::try_from(fields).is_err());

    let fields = SearchFields::new(Category::Keyword);
    assert!(SearchQuery::try_from(fields).is_err());
  }

  #[test]
  fn blank_text_counts_as_absent() {
    let fields = SearchFields::new(Category::Actor).with_free_text("   ");
    assert!(SearchQuery::try_from(fields).is_err());

    let fields = SearchFields::new(Category::Year)
      .with_year(1999)
      .with_genre("");
    assert_eq!(SearchQuery::try_from(fields).unwrap(), SearchQuery::year(1999));
  }

  #[test]
  fn checked_rejects_blank_text() {
    assert!(SearchQuery::keyword("  ").checked().is_err());
    assert!(SearchQuery::genre("").checked().is_err());
    assert!(SearchQuery::genre_year(" ", 2006).checked().is_err());
    assert!(SearchQuery::actor("\t").checked().is_err());
    assert_eq!(SearchQuery::year(2006).checked().unwrap(), SearchQuery::year(2006));
    assert_eq!(
      SearchQuery::keyword("dragon").checked().unwrap(),
      SearchQuery::keyword("dragon")
    );
  }

  #[test]
  fn to_fields_is_accepted_back() {
    let query = SearchQuery::genre_year("Horror", 2006);
    let fields = query.to_fields();
    assert_eq!(fields.category, Category::GenreYear);
    assert_eq!(fields.free_text, None);
    assert_eq!(SearchQuery::try_from(fields).unwrap(), query);
  }

  #[test]
  fn event_serialises_flat() {
    let event = SearchEvent {
      id:          EventId(7),
      query:       SearchQuery::genre("Comedy"),
      recorded_at: DateTime::from_timestamp(0, 0).unwrap(),
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["id"], 7);
    assert_eq!(json["category"], "genre");
    assert_eq!(json["genre"], "Comedy");
  }
}
