//! Integration tests for `SqliteEventStore`.

use std::{
  path::PathBuf,
  sync::atomic::{AtomicUsize, Ordering},
};

use cinescope_core::{
  category::Category,
  event::{EventId, SearchQuery},
  stats::{CategoryCount, KeywordCount},
  store::EventStore,
};
use rusqlite::types::Value;

use crate::{Error, SqliteEventStore};

async fn store() -> SqliteEventStore {
  SqliteEventStore::open_in_memory()
    .await
    .expect("in-memory store")
}

/// A fresh path under the system temp dir; the file does not exist yet.
fn temp_db_path(name: &str) -> PathBuf {
  static COUNTER: AtomicUsize = AtomicUsize::new(0);
  let n = COUNTER.fetch_add(1, Ordering::SeqCst);
  let path = std::env::temp_dir().join(format!(
    "cinescope-{name}-{}-{n}.db",
    std::process::id()
  ));
  let _ = std::fs::remove_file(&path);
  path
}

fn remove_db(path: &PathBuf) {
  for suffix in ["", "-wal", "-shm"] {
    let mut p = path.clone().into_os_string();
    p.push(suffix);
    let _ = std::fs::remove_file(p);
  }
}

// ─── Initialisation ──────────────────────────────────────────────────────────

#[tokio::test]
async fn initialize_twice_keeps_tables_and_data() {
  let s = store().await;
  let id = s.insert_event(SearchQuery::genre("Comedy")).await.unwrap();

  s.initialize().await.unwrap();
  s.initialize().await.unwrap();

  let tables: Vec<String> = s
    .query(
      "SELECT name FROM sqlite_master
       WHERE type = 'table' AND name IN ('search_events', 'keyword_occurrences')
       ORDER BY name",
      Vec::new(),
      |row| row.get(0),
    )
    .await
    .unwrap();
  assert_eq!(tables, ["keyword_occurrences", "search_events"]);

  let recent = s.recent_events(10).await.unwrap();
  assert_eq!(recent.len(), 1);
  assert_eq!(recent[0].id, id);
}

#[tokio::test]
async fn reopening_a_file_store_preserves_events() {
  let path = temp_db_path("reopen");

  let first = SqliteEventStore::open(&path).await.unwrap();
  first.insert_event(SearchQuery::year(2006)).await.unwrap();
  first.close().await.unwrap();

  let second = SqliteEventStore::open(&path).await.unwrap();
  second.insert_event(SearchQuery::year(2006)).await.unwrap();
  let counts = second.category_counts().await.unwrap();
  second.close().await.unwrap();

  assert_eq!(counts, vec![CategoryCount { category: Category::Year, count: 2 }]);
  remove_db(&path);
}

#[tokio::test]
async fn open_in_missing_directory_is_unavailable() {
  let path = std::env::temp_dir()
    .join("cinescope-no-such-dir")
    .join("nested")
    .join("log.db");

  let err = SqliteEventStore::open(&path).await.err().expect("must fail");
  assert!(matches!(err, Error::StoreUnavailable { .. }));
}

#[tokio::test]
async fn open_on_garbage_file_is_unavailable() {
  let path = temp_db_path("garbage");
  std::fs::write(&path, "not a database ".repeat(256)).unwrap();

  let err = SqliteEventStore::open(&path).await.err().expect("must fail");
  assert!(matches!(err, Error::StoreUnavailable { .. }));
  remove_db(&path);
}

#[tokio::test]
async fn legacy_log_is_imported_once() {
  let path = temp_db_path("legacy");
  {
    let conn = rusqlite::Connection::open(&path).unwrap();
    conn
      .execute_batch(
        "CREATE TABLE queries_log (
           id INTEGER PRIMARY KEY AUTOINCREMENT,
           genre TEXT,
           production_year INTEGER,
           keyword TEXT,
           query_type TEXT NOT NULL,
           executed_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
         );
         CREATE TABLE keywords_log (
           id INTEGER PRIMARY KEY AUTOINCREMENT,
           query_id INTEGER,
           keyword TEXT NOT NULL,
           recorded_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
         );
         INSERT INTO queries_log (genre, query_type) VALUES ('comedy', 'genre');
         INSERT INTO queries_log (keyword, query_type) VALUES ('dragon', 'keyword');
         INSERT INTO keywords_log (query_id, keyword) VALUES (2, 'dragon');",
      )
      .unwrap();
  }

  let s = SqliteEventStore::open(&path).await.unwrap();
  let counts = s.category_counts().await.unwrap();
  assert_eq!(counts, vec![
    CategoryCount { category: Category::Genre, count: 1 },
    CategoryCount { category: Category::Keyword, count: 1 },
  ]);
  let linked = s.occurrences_for(EventId(2)).await.unwrap();
  assert_eq!(linked.len(), 1);
  assert_eq!(linked[0].keyword, "dragon");
  s.close().await.unwrap();

  // A second open must not import again.
  let s = SqliteEventStore::open(&path).await.unwrap();
  let total: u64 = s.category_counts().await.unwrap().iter().map(|c| c.count).sum();
  assert_eq!(total, 2);
  s.close().await.unwrap();
  remove_db(&path);
}

// ─── Writes ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_event_assigns_increasing_ids() {
  let s = store().await;
  let a = s.insert_event(SearchQuery::genre("Action")).await.unwrap();
  let b = s.insert_event(SearchQuery::genre("Action")).await.unwrap();
  assert!(b > a);
}

#[tokio::test]
async fn insert_event_stores_only_category_fields() {
  let s = store().await;
  s.insert_event(SearchQuery::genre_year("Drama", 2006)).await.unwrap();
  s.insert_event(SearchQuery::actor("NICK WAHLBERG")).await.unwrap();

  let rows: Vec<(String, Option<String>, Option<i64>, Option<String>)> = s
    .query(
      "SELECT category, genre, year, free_text FROM search_events ORDER BY id",
      Vec::new(),
      |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
    )
    .await
    .unwrap();

  assert_eq!(rows, vec![
    ("genre_year".into(), Some("Drama".into()), Some(2006), None),
    ("actor".into(), None, None, Some("NICK WAHLBERG".into())),
  ]);
}

#[tokio::test]
async fn recorded_at_is_set_by_the_store() {
  let s = store().await;
  s.insert_event(SearchQuery::keyword("shark")).await.unwrap();

  let event = s.recent_events(1).await.unwrap().remove(0);
  let age = chrono::Utc::now() - event.recorded_at;
  assert!(age.num_minutes().abs() < 5);
}

#[tokio::test]
async fn occurrence_links_to_its_event() {
  let s = store().await;
  let id = s.insert_event(SearchQuery::keyword("dragon")).await.unwrap();
  s.insert_keyword_occurrence(id, "dragon".into()).await.unwrap();

  let linked = s.occurrences_for(id).await.unwrap();
  assert_eq!(linked.len(), 1);
  assert_eq!(linked[0].event_id, id);
  assert_eq!(linked[0].keyword, "dragon");
}

#[tokio::test]
async fn occurrence_reference_is_not_enforced() {
  let s = store().await;
  s.insert_keyword_occurrence(EventId(999), "ghost".into())
    .await
    .unwrap();

  assert_eq!(s.occurrences_for(EventId(999)).await.unwrap().len(), 1);
  assert!(s.recent_events(10).await.unwrap().is_empty());
}

// ─── Reads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_store_reads_are_empty() {
  let s = store().await;
  assert!(s.search_groups(None).await.unwrap().is_empty());
  assert!(s.search_groups(Some(Category::Actor)).await.unwrap().is_empty());
  assert!(s.category_counts().await.unwrap().is_empty());
  assert!(s.keyword_counts(10).await.unwrap().is_empty());
  assert!(s.recent_events(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn search_groups_count_identical_searches() {
  let s = store().await;
  let first = s.insert_event(SearchQuery::genre("Comedy")).await.unwrap();
  s.insert_event(SearchQuery::year(2006)).await.unwrap();
  s.insert_event(SearchQuery::genre("Comedy")).await.unwrap();

  let groups = s.search_groups(None).await.unwrap();
  assert_eq!(groups.len(), 2);
  assert_eq!(groups[0].query, SearchQuery::genre("Comedy"));
  assert_eq!(groups[0].count, 2);
  assert_eq!(groups[0].first_id, first);
}

#[tokio::test]
async fn search_groups_filter_by_category() {
  let s = store().await;
  s.insert_event(SearchQuery::genre("Comedy")).await.unwrap();
  s.insert_event(SearchQuery::actor("ED CHASE")).await.unwrap();
  s.insert_event(SearchQuery::genre_year("Comedy", 2006)).await.unwrap();

  let groups = s.search_groups(Some(Category::Genre)).await.unwrap();
  assert_eq!(groups.len(), 1);
  assert!(groups.iter().all(|g| g.query.category() == Category::Genre));
}

#[tokio::test]
async fn unknown_and_malformed_rows_are_skipped() {
  let s = store().await;
  s.insert_event(SearchQuery::genre("Comedy")).await.unwrap();
  // Rows written by something other than this crate.
  s.query(
    "INSERT INTO search_events (category, genre) VALUES ('director', 'x'), ('year', 'Drama')
     RETURNING id",
    Vec::new(),
    |row| row.get::<_, i64>(0),
  )
  .await
  .unwrap();

  let groups = s.search_groups(None).await.unwrap();
  assert_eq!(groups.len(), 1);

  // Distribution counts only what the rankings can show.
  let counts = s.category_counts().await.unwrap();
  assert_eq!(counts, vec![CategoryCount { category: Category::Genre, count: 1 }]);
}

#[tokio::test]
async fn badly_typed_column_skips_only_that_row() {
  let s = store().await;
  s.insert_event(SearchQuery::genre("Comedy")).await.unwrap();
  s.insert_event(SearchQuery::genre("Comedy")).await.unwrap();
  s.insert_event(SearchQuery::year(2006)).await.unwrap();
  s.query(
    "INSERT INTO search_events (category, year) VALUES ('year', 'n/a'), ('year', 99999999999)
     RETURNING id",
    Vec::new(),
    |row| row.get::<_, i64>(0),
  )
  .await
  .unwrap();

  let groups = s.search_groups(None).await.unwrap();
  let labels: Vec<_> = groups.iter().map(|g| (g.query.label(), g.count)).collect();
  assert_eq!(labels, [("Genre: Comedy".to_owned(), 2), ("Year: 2006".to_owned(), 1)]);

  let recent = s.recent_events(10).await.unwrap();
  assert_eq!(recent.len(), 3);
  assert_eq!(recent[0].query, SearchQuery::year(2006));

  let counts = s.category_counts().await.unwrap();
  assert_eq!(counts, vec![
    CategoryCount { category: Category::Genre, count: 2 },
    CategoryCount { category: Category::Year, count: 1 },
  ]);
}

#[tokio::test]
async fn badly_typed_occurrence_skips_only_that_row() {
  let s = store().await;
  let id = s.insert_event(SearchQuery::keyword("dragon")).await.unwrap();
  s.insert_keyword_occurrence(id, "dragon".into()).await.unwrap();
  s.query(
    "INSERT INTO keyword_occurrences (event_id, keyword, recorded_at)
     VALUES (?1, 'dragon', X'00') RETURNING id",
    vec![Value::Integer(id.0)],
    |row| row.get::<_, i64>(0),
  )
  .await
  .unwrap();

  let occurrences = s.occurrences_for(id).await.unwrap();
  assert_eq!(occurrences.len(), 1);
  assert_eq!(s.keyword_counts(10).await.unwrap(), vec![KeywordCount {
    keyword: "dragon".into(),
    count:   2,
  }]);
}

#[tokio::test]
async fn category_counts_omit_empty_categories() {
  let s = store().await;
  s.insert_event(SearchQuery::actor("ED CHASE")).await.unwrap();
  s.insert_event(SearchQuery::genre("Comedy")).await.unwrap();
  s.insert_event(SearchQuery::actor("ED CHASE")).await.unwrap();

  let counts = s.category_counts().await.unwrap();
  assert_eq!(counts, vec![
    CategoryCount { category: Category::Genre, count: 1 },
    CategoryCount { category: Category::Actor, count: 2 },
  ]);
}

#[tokio::test]
async fn keyword_counts_rank_and_limit() {
  let s = store().await;
  for kw in ["shark", "dragon", "dragon", "robot", "dragon", "robot"] {
    let id = s.insert_event(SearchQuery::keyword(kw)).await.unwrap();
    s.insert_keyword_occurrence(id, kw.into()).await.unwrap();
  }

  let top = s.keyword_counts(2).await.unwrap();
  assert_eq!(top, vec![
    KeywordCount { keyword: "dragon".into(), count: 3 },
    KeywordCount { keyword: "robot".into(), count: 2 },
  ]);
}

#[tokio::test]
async fn keyword_count_ties_go_to_first_seen() {
  let s = store().await;
  for kw in ["zebra", "apple"] {
    s.insert_keyword_occurrence(EventId(1), kw.into()).await.unwrap();
  }

  let top = s.keyword_counts(10).await.unwrap();
  let order: Vec<_> = top.iter().map(|k| k.keyword.as_str()).collect();
  assert_eq!(order, ["zebra", "apple"]);
}

#[tokio::test]
async fn recent_events_newest_first() {
  let s = store().await;
  s.insert_event(SearchQuery::year(2001)).await.unwrap();
  s.insert_event(SearchQuery::year(2002)).await.unwrap();
  s.insert_event(SearchQuery::year(2003)).await.unwrap();

  let recent = s.recent_events(2).await.unwrap();
  let labels: Vec<_> = recent.iter().map(|e| e.label()).collect();
  assert_eq!(labels, ["Year: 2003", "Year: 2002"]);
}

#[tokio::test]
async fn generic_query_binds_parameters() {
  let s = store().await;
  s.insert_event(SearchQuery::genre("Comedy")).await.unwrap();
  s.insert_event(SearchQuery::genre("Horror")).await.unwrap();

  let genres: Vec<String> = s
    .query(
      "SELECT genre FROM search_events WHERE genre = ?1",
      vec![Value::Text("Horror".into())],
      |row| row.get(0),
    )
    .await
    .unwrap();
  assert_eq!(genres, ["Horror"]);
}

#[tokio::test]
async fn bad_sql_is_a_read_error() {
  let s = store().await;
  let err = s
    .query("SELECT nope FROM nowhere", Vec::new(), |row| row.get::<_, i64>(0))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Read(_)));
}

// ─── Close ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn close_is_idempotent() {
  let s = store().await;
  s.close().await.unwrap();
  s.close().await.unwrap();
  s.clone().close().await.unwrap();
  assert!(s.is_closed());
}

#[tokio::test]
async fn writes_after_close_fail() {
  let s = store().await;
  s.close().await.unwrap();

  let err = s.insert_event(SearchQuery::year(2006)).await.unwrap_err();
  assert!(matches!(err, Error::Write(_)));
}
