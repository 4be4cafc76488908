//! [`SqliteEventStore`] — the SQLite implementation of [`EventStore`].

use std::{
  collections::BTreeMap,
  path::{Path, PathBuf},
  sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
  },
};

use rusqlite::{OptionalExtension as _, types::Value};
use tracing::{debug, info, warn};

use cinescope_core::{
  category::Category,
  event::{EventId, KeywordOccurrence, SearchEvent, SearchQuery},
  stats::{CategoryCount, KeywordCount, SearchGroup},
  store::EventStore,
};

use crate::{
  Error, Result,
  encode::{RawEvent, RawGroup, RawKeywordCount, RawOccurrence},
  schema::{
    BASE_VERSION, CURRENT_VERSION, LEGACY_EVENTS_IMPORT, LEGACY_EVENTS_TABLE,
    LEGACY_KEYWORDS_IMPORT, LEGACY_KEYWORDS_TABLE, SCHEMA, known_categories_sql,
  },
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// The query log, backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. The store
/// assumes it is the only writer to its file.
#[derive(Clone)]
pub struct SqliteEventStore {
  conn:   tokio_rusqlite::Connection,
  path:   Arc<PathBuf>,
  closed: Arc<AtomicBool>,
}

impl SqliteEventStore {
  /// Open (or create) a store at `path` and bring its schema up to date.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    let conn = match tokio_rusqlite::Connection::open(&path).await {
      Ok(conn) => conn,
      Err(source) => return Err(Error::StoreUnavailable { path, source }),
    };

    let store = Self::from_connection(conn, path);
    store.initialize().await?;
    info!(path = %store.path.display(), "opened event store");
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let path = PathBuf::from(":memory:");
    let conn = match tokio_rusqlite::Connection::open_in_memory().await {
      Ok(conn) => conn,
      Err(source) => return Err(Error::StoreUnavailable { path, source }),
    };

    let store = Self::from_connection(conn, path);
    store.initialize().await?;
    Ok(store)
  }

  fn from_connection(conn: tokio_rusqlite::Connection, path: PathBuf) -> Self {
    Self {
      conn,
      path: Arc::new(path),
      closed: Arc::new(AtomicBool::new(false)),
    }
  }

  /// Create any missing tables and run pending migrations.
  ///
  /// Safe to call any number of times on the same store.
  pub async fn initialize(&self) -> Result<()> {
    self.migrate().await.map_err(|source| Error::StoreUnavailable {
      path: self.path.to_path_buf(),
      source,
    })
  }

  /// Location of the backing file (`:memory:` for in-memory stores).
  pub fn path(&self) -> &Path { &self.path }

  async fn migrate(&self) -> tokio_rusqlite::Result<()> {
    let version = self
      .conn
      .call(|conn| {
        let mut version: i64 =
          conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

        // The base DDL is idempotent, so it runs on every start.
        conn.execute_batch(SCHEMA)?;
        if version < BASE_VERSION {
          conn.pragma_update(None, "user_version", BASE_VERSION)?;
          version = BASE_VERSION;
        }

        if version < CURRENT_VERSION {
          let tx = conn.transaction()?;
          import_legacy(&tx)?;
          tx.pragma_update(None, "user_version", CURRENT_VERSION)?;
          tx.commit()?;
          version = CURRENT_VERSION;
        }

        Ok(version)
      })
      .await?;

    debug!(version, "event store schema ready");
    Ok(())
  }

  /// Run a parameterized read and map every row with `map`.
  ///
  /// This is the generic read path every aggregation goes through.
  pub async fn query<T, F>(
    &self,
    sql: impl Into<String>,
    params: Vec<Value>,
    mut map: F,
  ) -> Result<Vec<T>>
  where
    T: Send + 'static,
    F: FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<T> + Send + 'static,
  {
    let sql = sql.into();
    self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), |row| map(row))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::Read)
  }

  /// Whether [`close`](EventStore::close) has been called on this store or
  /// any of its clones.
  pub fn is_closed(&self) -> bool { self.closed.load(Ordering::SeqCst) }
}

/// Import rows from the earlier `queries_log` / `keywords_log` layout.
///
/// Only runs into an empty `search_events`; otherwise the ids would collide.
fn import_legacy(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
  let table_exists = |name: &str| -> rusqlite::Result<bool> {
    Ok(
      conn
        .query_row(
          "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
          [name],
          |_| Ok(true),
        )
        .optional()?
        .unwrap_or(false),
    )
  };

  if !table_exists(LEGACY_EVENTS_TABLE)? {
    return Ok(());
  }

  let existing: i64 =
    conn.query_row("SELECT COUNT(*) FROM search_events", [], |row| row.get(0))?;
  if existing > 0 {
    warn!(existing, "search_events is not empty; skipping legacy import");
    return Ok(());
  }

  let events = conn.execute(LEGACY_EVENTS_IMPORT, [])?;
  let keywords = if table_exists(LEGACY_KEYWORDS_TABLE)? {
    conn.execute(LEGACY_KEYWORDS_IMPORT, [])?
  } else {
    0
  };

  info!(events, keywords, "imported legacy query log");
  Ok(())
}

fn event_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawEvent> {
  Ok(RawEvent {
    id:          row.get(0)?,
    category:    row.get(1)?,
    genre:       row.get(2)?,
    year:        row.get(3)?,
    free_text:   row.get(4)?,
    recorded_at: row.get(5)?,
  })
}

/// Decode every row, logging and dropping the ones that do not fit the model.
fn decode_all<R, T>(raws: Vec<R>, decode: impl Fn(R) -> Result<T>) -> Vec<T> {
  raws
    .into_iter()
    .filter_map(|raw| match decode(raw) {
      Ok(value) => Some(value),
      Err(e) => {
        warn!(error = %e, "skipping malformed row");
        None
      }
    })
    .collect()
}

fn sql_limit(limit: usize) -> Value { Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)) }

// ─── EventStore impl ─────────────────────────────────────────────────────────

impl EventStore for SqliteEventStore {
  type Error = Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn insert_event(&self, query: SearchQuery) -> Result<EventId> {
    let fields = query.to_fields();
    let category = fields.category.as_str();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO search_events (category, genre, year, free_text)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![category, fields.genre, fields.year, fields.free_text],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(Error::Write)?;

    debug!(event_id = id, category, "recorded search event");
    Ok(EventId(id))
  }

  async fn insert_keyword_occurrence(&self, event_id: EventId, keyword: String) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO keyword_occurrences (event_id, keyword) VALUES (?1, ?2)",
          rusqlite::params![event_id.0, keyword],
        )?;
        Ok(())
      })
      .await
      .map_err(Error::Write)?;

    debug!(%event_id, "recorded keyword occurrence");
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn search_groups(&self, category: Option<Category>) -> Result<Vec<SearchGroup>> {
    let sql = format!(
      "SELECT category, genre, year, free_text, COUNT(*) AS n, MIN(id) AS first_id
       FROM search_events
       WHERE category IN ({})
         AND (?1 IS NULL OR category = ?1)
       GROUP BY category, genre, year, free_text
       ORDER BY n DESC, first_id ASC",
      known_categories_sql()
    );
    let filter = category.map_or(Value::Null, |c| Value::Text(c.as_str().to_owned()));

    let raws = self
      .query(sql, vec![filter], |row| {
        Ok(RawGroup {
          category:  row.get(0)?,
          genre:     row.get(1)?,
          year:      row.get(2)?,
          free_text: row.get(3)?,
          count:     row.get(4)?,
          first_id:  row.get(5)?,
        })
      })
      .await?;

    Ok(decode_all(raws, RawGroup::into_group))
  }

  async fn category_counts(&self) -> Result<Vec<CategoryCount>> {
    // Totals come from the decoded groups so they agree with the rankings.
    let mut totals = BTreeMap::<Category, u64>::new();
    for group in self.search_groups(None).await? {
      *totals.entry(group.query.category()).or_default() += group.count;
    }

    Ok(
      totals
        .into_iter()
        .map(|(category, count)| CategoryCount { category, count })
        .collect(),
    )
  }

  async fn keyword_counts(&self, limit: usize) -> Result<Vec<KeywordCount>> {
    let raws = self
      .query(
        "SELECT keyword, COUNT(*) AS n, MIN(id) AS first_id
         FROM keyword_occurrences
         GROUP BY keyword
         ORDER BY n DESC, first_id ASC
         LIMIT ?1",
        vec![sql_limit(limit)],
        |row| {
          Ok(RawKeywordCount {
            keyword: row.get(0)?,
            count:   row.get(1)?,
          })
        },
      )
      .await?;
    Ok(decode_all(raws, RawKeywordCount::into_count))
  }

  async fn recent_events(&self, limit: usize) -> Result<Vec<SearchEvent>> {
    let sql = format!(
      "SELECT id, category, genre, year, free_text, recorded_at
       FROM search_events
       WHERE category IN ({})
       ORDER BY id DESC
       LIMIT ?1",
      known_categories_sql()
    );

    let raws = self.query(sql, vec![sql_limit(limit)], event_row).await?;
    Ok(decode_all(raws, RawEvent::into_event))
  }

  async fn occurrences_for(&self, event_id: EventId) -> Result<Vec<KeywordOccurrence>> {
    let raws = self
      .query(
        "SELECT id, event_id, keyword, recorded_at
         FROM keyword_occurrences
         WHERE event_id = ?1
         ORDER BY id",
        vec![Value::Integer(event_id.0)],
        |row| {
          Ok(RawOccurrence {
            id:          row.get(0)?,
            event_id:    row.get(1)?,
            keyword:     row.get(2)?,
            recorded_at: row.get(3)?,
          })
        },
      )
      .await?;
    Ok(decode_all(raws, RawOccurrence::into_occurrence))
  }

  // ── Lifecycle ─────────────────────────────────────────────────────────────

  async fn close(&self) -> Result<()> {
    if self.closed.swap(true, Ordering::SeqCst) {
      return Ok(());
    }
    self.conn.clone().close().await.map_err(Error::Close)?;
    debug!("closed event store");
    Ok(())
  }
}
