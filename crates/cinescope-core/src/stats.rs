//! Aggregation result types and the ranking rule shared by every top-N view.
//!
//! These are the only shapes that leave the statistics layer: plain,
//! serialisable structs with no store types inside.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
  category::Category,
  event::{EventId, SearchQuery},
};

/// One ranked `(category, label, count)` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopQuery {
  pub category: Category,
  pub label:    String,
  pub count:    u64,
}

/// Number of events recorded for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
  pub category: Category,
  pub count:    u64,
}

/// Number of occurrences of one literal keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
  pub keyword: String,
  pub count:   u64,
}

/// Identical searches as counted by a store, before labelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchGroup {
  pub query:    SearchQuery,
  pub count:    u64,
  /// Smallest event id in the group; breaks ties between equal counts.
  pub first_id: EventId,
}

/// Label, merge and rank `groups`, keeping the first `limit`.
///
/// Groups are merged on `(category, label)`. Ordering is count descending,
/// then earliest first occurrence.
pub fn rank_groups(
  groups: impl IntoIterator<Item = SearchGroup>,
  limit: usize,
) -> Vec<TopQuery> {
  let mut merged: HashMap<(Category, String), (u64, EventId)> = HashMap::new();

  for group in groups {
    let key = (group.query.category(), group.query.label());
    merged
      .entry(key)
      .and_modify(|(count, first)| {
        *count += group.count;
        *first = (*first).min(group.first_id);
      })
      .or_insert((group.count, group.first_id));
  }

  let mut ranked: Vec<_> = merged.into_iter().collect();
  ranked.sort_by(|(_, (a_count, a_first)), (_, (b_count, b_first))| {
    b_count.cmp(a_count).then(a_first.cmp(b_first))
  });

  ranked
    .into_iter()
    .take(limit)
    .map(|((category, label), (count, _))| TopQuery { category, label, count })
    .collect()
}
