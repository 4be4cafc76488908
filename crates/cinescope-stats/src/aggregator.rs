//! [`StatisticsAggregator`] — ranked, labelled views over the event store.

use cinescope_core::{
  category::Category,
  event::SearchEvent,
  stats::{CategoryCount, KeywordCount, TopQuery, rank_groups},
  store::EventStore,
};
use tracing::warn;

/// Reads the store and produces top-N rankings and distributions.
///
/// A failed read is logged and reported as "no data".
#[derive(Clone)]
pub struct StatisticsAggregator<S> {
  store: S,
}

impl<S: EventStore> StatisticsAggregator<S> {
  pub fn new(store: S) -> Self { Self { store } }

  /// Most frequent searches across every category.
  pub async fn top_queries(&self, limit: usize) -> Vec<TopQuery> {
    match self.store.search_groups(None).await {
      Ok(groups) => rank_groups(groups, limit),
      Err(e) => no_data("top queries", e),
    }
  }

  /// Most frequent searches of a single category.
  pub async fn top_queries_by_category(&self, category: Category, limit: usize) -> Vec<TopQuery> {
    match self.store.search_groups(Some(category)).await {
      Ok(groups) => rank_groups(
        groups.into_iter().filter(|g| g.query.category() == category),
        limit,
      ),
      Err(e) => no_data("top queries by category", e),
    }
  }

  /// Event count per category; empty categories are absent.
  pub async fn category_distribution(&self) -> Vec<CategoryCount> {
    match self.store.category_counts().await {
      Ok(mut counts) => {
        counts.retain(|c| c.count > 0);
        counts
      }
      Err(e) => no_data("category distribution", e),
    }
  }

  /// Most frequent keywords.
  pub async fn top_keywords(&self, limit: usize) -> Vec<KeywordCount> {
    match self.store.keyword_counts(limit).await {
      Ok(counts) => counts,
      Err(e) => no_data("keyword frequency", e),
    }
  }

  /// Newest events first.
  pub async fn recent_events(&self, limit: usize) -> Vec<SearchEvent> {
    match self.store.recent_events(limit).await {
      Ok(events) => events,
      Err(e) => no_data("recent events", e),
    }
  }
}

fn no_data<T>(view: &str, error: impl std::fmt::Display) -> Vec<T> {
  warn!(view, %error, "statistics read failed; showing no data");
  Vec::new()
}
