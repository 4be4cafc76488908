//! Decoding helpers between SQLite column values and the domain types.
//!
//! Timestamps are written by SQLite's `CURRENT_TIMESTAMP`, i.e. UTC in
//! `YYYY-MM-DD HH:MM:SS` form. RFC 3339 and Unix seconds are accepted as well.
//!
//! Columns that rows from other writers may fill with the wrong type are read
//! as [`Value`] and checked here, so one bad row fails on its own instead of
//! failing the whole query.

use chrono::{DateTime, NaiveDateTime, Utc};
use cinescope_core::{
  Error as CoreError,
  category::Category,
  event::{EventId, KeywordOccurrence, SearchEvent, SearchFields, SearchQuery},
  stats::{KeywordCount, SearchGroup},
};
use rusqlite::types::Value;

use crate::{Error, Result};

// ─── Timestamps ──────────────────────────────────────────────────────────────

const SQLITE_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

pub fn decode_timestamp(s: Option<&str>) -> Result<DateTime<Utc>> {
  let s = s.ok_or_else(|| CoreError::DateParse("missing timestamp".into()))?;
  if let Ok(naive) = NaiveDateTime::parse_from_str(s, SQLITE_TIMESTAMP) {
    return Ok(naive.and_utc());
  }
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| CoreError::DateParse(format!("{s:?}: {e}")).into())
}

fn decode_recorded_at(value: Value) -> Result<DateTime<Utc>> {
  match value {
    Value::Null => decode_timestamp(None),
    Value::Text(s) => decode_timestamp(Some(s.as_str())),
    Value::Integer(secs) => DateTime::from_timestamp(secs, 0)
      .ok_or_else(|| CoreError::DateParse(format!("{secs} is out of range")).into()),
    other => Err(CoreError::DateParse(format!("{other:?}")).into()),
  }
}

// ─── Columns ─────────────────────────────────────────────────────────────────

fn undecodable(column: &'static str, value: impl std::fmt::Debug) -> Error {
  Error::Decode { column, value: format!("{value:?}") }
}

/// A text column. Numbers are accepted in their decimal form.
fn decode_text(column: &'static str, value: Value) -> Result<Option<String>> {
  match value {
    Value::Null => Ok(None),
    Value::Text(s) => Ok(Some(s)),
    Value::Integer(n) => Ok(Some(n.to_string())),
    Value::Real(x) => Ok(Some(x.to_string())),
    other @ Value::Blob(_) => Err(undecodable(column, other)),
  }
}

fn decode_year(value: Value) -> Result<Option<i32>> {
  match value {
    Value::Null => Ok(None),
    Value::Integer(n) => i32::try_from(n)
      .map(Some)
      .map_err(|_| undecodable("year", n)),
    other => Err(undecodable("year", other)),
  }
}

fn decode_id(column: &'static str, value: Value) -> Result<i64> {
  match value {
    Value::Integer(n) => Ok(n),
    other => Err(undecodable(column, other)),
  }
}

// ─── Search fields ───────────────────────────────────────────────────────────

fn decode_query(category: &str, genre: Value, year: Value, free_text: Value) -> Result<SearchQuery> {
  let fields = SearchFields {
    category:  Category::parse(category)?,
    genre:     decode_text("genre", genre)?,
    year:      decode_year(year)?,
    free_text: decode_text("free_text", free_text)?,
  };
  Ok(SearchQuery::try_from(fields)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `search_events` row.
pub struct RawEvent {
  pub id:          i64,
  pub category:    String,
  pub genre:       Value,
  pub year:        Value,
  pub free_text:   Value,
  pub recorded_at: Value,
}

impl RawEvent {
  pub fn into_event(self) -> Result<SearchEvent> {
    Ok(SearchEvent {
      id:          EventId(self.id),
      query:       decode_query(&self.category, self.genre, self.year, self.free_text)?,
      recorded_at: decode_recorded_at(self.recorded_at)?,
    })
  }
}

/// One `GROUP BY category, genre, year, free_text` row.
pub struct RawGroup {
  pub category:  String,
  pub genre:     Value,
  pub year:      Value,
  pub free_text: Value,
  pub count:     i64,
  pub first_id:  i64,
}

impl RawGroup {
  pub fn into_group(self) -> Result<SearchGroup> {
    Ok(SearchGroup {
      query:    decode_query(&self.category, self.genre, self.year, self.free_text)?,
      count:    self.count.max(0) as u64,
      first_id: EventId(self.first_id),
    })
  }
}

/// Raw values read directly from a `keyword_occurrences` row.
pub struct RawOccurrence {
  pub id:          i64,
  pub event_id:    Value,
  pub keyword:     String,
  pub recorded_at: Value,
}

impl RawOccurrence {
  pub fn into_occurrence(self) -> Result<KeywordOccurrence> {
    Ok(KeywordOccurrence {
      id:          self.id,
      event_id:    EventId(decode_id("event_id", self.event_id)?),
      keyword:     self.keyword,
      recorded_at: decode_recorded_at(self.recorded_at)?,
    })
  }
}

/// One `GROUP BY keyword` row.
pub struct RawKeywordCount {
  pub keyword: Value,
  pub count:   i64,
}

impl RawKeywordCount {
  pub fn into_count(self) -> Result<KeywordCount> {
    let keyword = decode_text("keyword", self.keyword)?
      .ok_or_else(|| undecodable("keyword", Value::Null))?;
    Ok(KeywordCount { keyword, count: self.count.max(0) as u64 })
  }
}
