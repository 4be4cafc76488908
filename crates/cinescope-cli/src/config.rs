//! Application configuration: an optional TOML file under `CINESCOPE_*`
//! environment variables.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail};
use cinescope_stats::ReportLimits;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  /// Query log database.
  pub store_path:           PathBuf,
  /// Read-only movie catalog database.
  pub catalog_path:         PathBuf,
  pub top_queries_limit:    usize,
  pub chart_queries_limit:  usize,
  pub keyword_bubble_limit: usize,
  pub page_size:            usize,
  /// Invalid entries tolerated before returning to the main menu.
  pub max_attempts:         u32,
  pub log_file:             PathBuf,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      store_path:           PathBuf::from("queries_log.db"),
      catalog_path:         PathBuf::from("sakila.db"),
      top_queries_limit:    5,
      chart_queries_limit:  7,
      keyword_bubble_limit: 10,
      page_size:            10,
      max_attempts:         3,
      log_file:             PathBuf::from("cinescope.log"),
    }
  }
}

impl AppConfig {
  /// Load from `path` (if it exists), then apply environment overrides.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("CINESCOPE").try_parsing(true))
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?;
    Self::from_settings(settings)
  }

  fn from_settings(settings: config::Config) -> anyhow::Result<Self> {
    let mut cfg: Self = settings
      .try_deserialize()
      .context("failed to deserialise configuration")?;

    cfg.store_path = expand_tilde(&cfg.store_path);
    cfg.catalog_path = expand_tilde(&cfg.catalog_path);
    cfg.log_file = expand_tilde(&cfg.log_file);

    cfg.validate()?;
    Ok(cfg)
  }

  fn validate(&self) -> anyhow::Result<()> {
    let limits = [
      ("top_queries_limit", self.top_queries_limit),
      ("chart_queries_limit", self.chart_queries_limit),
      ("keyword_bubble_limit", self.keyword_bubble_limit),
      ("page_size", self.page_size),
    ];
    for (key, value) in limits {
      if value == 0 {
        bail!("{key} must be at least 1");
      }
    }
    if self.max_attempts == 0 {
      bail!("max_attempts must be at least 1");
    }
    Ok(())
  }

  pub fn report_limits(&self) -> ReportLimits {
    ReportLimits {
      top_queries: self.top_queries_limit,
      keywords:    self.keyword_bubble_limit,
    }
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
