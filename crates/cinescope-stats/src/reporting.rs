//! [`Reporting`] — the façade presentation code talks to.

use cinescope_core::{
  Result,
  category::Category,
  event::{EventId, SearchEvent, SearchFields, SearchQuery},
  stats::{CategoryCount, KeywordCount, TopQuery},
  store::EventStore,
};
use tracing::{info, warn};

use crate::{QueryLogger, ReportLimits, StatisticsAggregator, logger::check_fields};

struct Enabled<S> {
  store:      S,
  logger:     QueryLogger<S>,
  aggregator: StatisticsAggregator<S>,
}

/// Logging and statistics over an optional event store.
///
/// Built with [`Reporting::disabled`] when the store could not be opened; in
/// that state every write returns `None` and every read is empty, so the
/// rest of the application runs unchanged.
pub struct Reporting<S> {
  enabled: Option<Enabled<S>>,
  limits:  ReportLimits,
}

impl<S: EventStore + Clone> Reporting<S> {
  pub fn new(store: S, limits: ReportLimits) -> Self {
    Self {
      enabled: Some(Enabled {
        logger: QueryLogger::new(store.clone()),
        aggregator: StatisticsAggregator::new(store.clone()),
        store,
      }),
      limits,
    }
  }

  /// A façade with logging and statistics turned off.
  pub fn disabled(limits: ReportLimits) -> Self {
    info!("query logging and statistics are disabled");
    Self { enabled: None, limits }
  }

  pub fn is_enabled(&self) -> bool { self.enabled.is_some() }

  pub fn limits(&self) -> ReportLimits { self.limits }

  // ── Logging ───────────────────────────────────────────────────────────────

  pub async fn log_search(&self, query: SearchQuery) -> Option<EventId> {
    match &self.enabled {
      Some(e) => e.logger.log_search(query).await,
      None => None,
    }
  }

  /// Log a search given in column form, checking its fields first.
  ///
  /// The check runs even when logging is disabled, so a caller bug surfaces
  /// the same way in every configuration.
  pub async fn log_fields(&self, fields: SearchFields) -> Result<Option<EventId>> {
    let query = check_fields(fields)?;
    Ok(self.log_search(query).await)
  }

  pub async fn log_keyword_occurrence(&self, event_id: Option<EventId>, keyword: &str) {
    if let Some(e) = &self.enabled {
      e.logger.log_keyword_occurrence(event_id, keyword).await;
    }
  }

  /// Log a keyword search and link an occurrence to the new event.
  pub async fn log_keyword_search(&self, keyword: &str) -> Option<EventId> {
    let event_id = self.log_search(SearchQuery::keyword(keyword)).await;
    self.log_keyword_occurrence(event_id, keyword).await;
    event_id
  }

  // ── Statistics ────────────────────────────────────────────────────────────

  /// Top searches overall; `limit` defaults to [`ReportLimits::top_queries`].
  pub async fn top_queries(&self, limit: Option<usize>) -> Vec<TopQuery> {
    let limit = limit.unwrap_or(self.limits.top_queries);
    match &self.enabled {
      Some(e) => e.aggregator.top_queries(limit).await,
      None => Vec::new(),
    }
  }

  pub async fn top_queries_by_category(
    &self,
    category: Category,
    limit: Option<usize>,
  ) -> Vec<TopQuery> {
    let limit = limit.unwrap_or(self.limits.top_queries);
    match &self.enabled {
      Some(e) => e.aggregator.top_queries_by_category(category, limit).await,
      None => Vec::new(),
    }
  }

  pub async fn category_distribution(&self) -> Vec<CategoryCount> {
    match &self.enabled {
      Some(e) => e.aggregator.category_distribution().await,
      None => Vec::new(),
    }
  }

  /// Most frequent keywords; `limit` defaults to [`ReportLimits::keywords`].
  pub async fn top_keywords(&self, limit: Option<usize>) -> Vec<KeywordCount> {
    let limit = limit.unwrap_or(self.limits.keywords);
    match &self.enabled {
      Some(e) => e.aggregator.top_keywords(limit).await,
      None => Vec::new(),
    }
  }

  pub async fn recent_events(&self, limit: usize) -> Vec<SearchEvent> {
    match &self.enabled {
      Some(e) => e.aggregator.recent_events(limit).await,
      None => Vec::new(),
    }
  }

  // ── Lifecycle ─────────────────────────────────────────────────────────────

  /// Release the store. Safe to call more than once.
  pub async fn close(&self) {
    if let Some(e) = &self.enabled
      && let Err(err) = e.store.close().await
    {
      warn!(error = %err, "failed to close event store");
    }
  }
}
