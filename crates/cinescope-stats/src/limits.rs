//! Default sizes for the top-N views.

use serde::{Deserialize, Serialize};

/// Limits used when a caller does not pass one explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLimits {
  /// Top-N for the overall and per-category query rankings.
  pub top_queries: usize,
  /// Number of keywords in the frequency view.
  pub keywords:    usize,
}

impl Default for ReportLimits {
  fn default() -> Self { Self { top_queries: 5, keywords: 10 } }
}
