//! SQL schema and start-up migrations for the event store.
//!
//! The applied version lives in `PRAGMA user_version`. Every step is safe to
//! re-run: tables and indexes use `IF NOT EXISTS`, and the legacy import is
//! gated on the version number.

use cinescope_core::category::Category;
use strum::IntoEnumIterator as _;

/// Version written after the base schema has been created.
pub const BASE_VERSION: i64 = 1;

/// Version written after the legacy-log import step has run (or been skipped).
pub const CURRENT_VERSION: i64 = 2;

/// Base schema DDL.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Append-only: no UPDATE or DELETE is ever issued against either table.
CREATE TABLE IF NOT EXISTS search_events (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    category     TEXT NOT NULL,   -- genre | year | genre_year | keyword | actor
    genre        TEXT NULL,
    year         INTEGER NULL,
    free_text    TEXT NULL,
    recorded_at  TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

-- event_id is a weak reference to search_events.id: no constraint, no cascade.
CREATE TABLE IF NOT EXISTS keyword_occurrences (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    event_id     INTEGER,
    keyword      TEXT NOT NULL,
    recorded_at  TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS search_events_category_idx   ON search_events(category);
CREATE INDEX IF NOT EXISTS keyword_occurrences_kw_idx   ON keyword_occurrences(keyword);
CREATE INDEX IF NOT EXISTS keyword_occurrences_evt_idx  ON keyword_occurrences(event_id);
";

/// Tables written by the earlier query logger; imported once if present.
pub const LEGACY_EVENTS_TABLE: &str = "queries_log";
pub const LEGACY_KEYWORDS_TABLE: &str = "keywords_log";

/// Copies the earlier `queries_log` rows, keeping their ids so occurrence
/// links stay valid. The legacy tables are left in place.
pub const LEGACY_EVENTS_IMPORT: &str = "
INSERT INTO search_events (id, category, genre, year, free_text, recorded_at)
    SELECT id, query_type, genre, production_year, keyword, executed_at
    FROM queries_log
    ORDER BY id;
";

pub const LEGACY_KEYWORDS_IMPORT: &str = "
INSERT INTO keyword_occurrences (id, event_id, keyword, recorded_at)
    SELECT id, query_id, keyword, recorded_at
    FROM keywords_log
    ORDER BY id;
";

/// `'genre', 'year', ...` for use in `category IN (...)` filters.
pub fn known_categories_sql() -> String {
  Category::iter()
    .map(|c| format!("'{}'", c.as_str()))
    .collect::<Vec<_>>()
    .join(", ")
}
