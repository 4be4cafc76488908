//! [`QueryLogger`] — turns a submitted search into store rows.

use cinescope_core::{
  Result,
  event::{EventId, SearchFields, SearchQuery},
  store::EventStore,
};
use tracing::{debug, error, warn};

/// Writes exactly one event per search, plus one keyword occurrence for
/// keyword searches. Store failures are logged and swallowed.
#[derive(Clone)]
pub struct QueryLogger<S> {
  store: S,
}

impl<S: EventStore> QueryLogger<S> {
  pub fn new(store: S) -> Self { Self { store } }

  /// Record `query`. Returns `None` if the query is rejected by
  /// [`SearchQuery::checked`] or the store write failed.
  pub async fn log_search(&self, query: SearchQuery) -> Option<EventId> {
    let query = match query.checked() {
      Ok(query) => query,
      Err(e) => {
        error!(error = %e, "refusing to log search with blank or mismatched fields");
        return None;
      }
    };

    let category = query.category();
    match self.store.insert_event(query).await {
      Ok(id) => Some(id),
      Err(e) => {
        warn!(%category, error = %e, "failed to log search; continuing without it");
        None
      }
    }
  }

  /// Record a search given in column form.
  ///
  /// Fields that do not match the category are a caller bug: they are
  /// reported as [`InvalidCategoryFields`] and nothing is written.
  ///
  /// [`InvalidCategoryFields`]: cinescope_core::Error::InvalidCategoryFields
  pub async fn log_fields(&self, fields: SearchFields) -> Result<Option<EventId>> {
    let query = check_fields(fields)?;
    Ok(self.log_search(query).await)
  }

  /// Link a keyword occurrence to `event_id`.
  ///
  /// Does nothing when `event_id` is `None`, so a failed event never gets
  /// an occurrence attached.
  pub async fn log_keyword_occurrence(&self, event_id: Option<EventId>, keyword: &str) {
    let Some(event_id) = event_id else {
      debug!(keyword, "no event id; skipping keyword occurrence");
      return;
    };
    if keyword.trim().is_empty() {
      error!(%event_id, "refusing to log blank keyword occurrence");
      return;
    }

    if let Err(e) = self
      .store
      .insert_keyword_occurrence(event_id, keyword.to_owned())
      .await
    {
      warn!(%event_id, keyword, error = %e, "failed to log keyword occurrence");
    }
  }
}

/// Convert column-form fields, logging the rejection when they do not match
/// their category.
pub(crate) fn check_fields(fields: SearchFields) -> Result<SearchQuery> {
  SearchQuery::try_from(fields).inspect_err(|e| {
    error!(error = %e, "refusing to log search with mismatched fields");
  })
}
