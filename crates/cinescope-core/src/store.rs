//! The `EventStore` trait.
//!
//! Implemented by storage backends (e.g. `cinescope-store-sqlite`). The query
//! logger, statistics aggregator and reporting façade in `cinescope-stats`
//! depend on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  category::Category,
  event::{EventId, KeywordOccurrence, SearchEvent, SearchQuery},
  stats::{CategoryCount, KeywordCount, SearchGroup},
};

/// Append-only persistence for search events and keyword occurrences.
///
/// There is no update or delete. Each insert is its own implicit
/// transaction; an event and its occurrence are never written atomically.
pub trait EventStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Append one search event and return its store-assigned id.
  fn insert_event(
    &self,
    query: SearchQuery,
  ) -> impl Future<Output = Result<EventId, Self::Error>> + Send + '_;

  /// Append one keyword occurrence referring to `event_id`.
  ///
  /// The reference is not checked.
  fn insert_keyword_occurrence(
    &self,
    event_id: EventId,
    keyword: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Count identical searches, optionally restricted to one category.
  /// Rows whose category is not one of the known kinds are skipped.
  fn search_groups(
    &self,
    category: Option<Category>,
  ) -> impl Future<Output = Result<Vec<SearchGroup>, Self::Error>> + Send + '_;

  /// Events per category. Categories with no events are absent.
  fn category_counts(
    &self,
  ) -> impl Future<Output = Result<Vec<CategoryCount>, Self::Error>> + Send + '_;

  /// The `limit` most frequent keywords, most frequent first.
  fn keyword_counts(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<KeywordCount>, Self::Error>> + Send + '_;

  /// The `limit` newest events, newest first.
  fn recent_events(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<SearchEvent>, Self::Error>> + Send + '_;

  /// Keyword occurrences that refer to `event_id`.
  fn occurrences_for(
    &self,
    event_id: EventId,
  ) -> impl Future<Output = Result<Vec<KeywordOccurrence>, Self::Error>> + Send + '_;

  // ── Lifecycle ─────────────────────────────────────────────────────────

  /// Release the underlying handle. Calling this more than once is a no-op.
  fn close(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
