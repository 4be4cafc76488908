//! [`SqliteCatalog`] — the SQLite implementation of [`Catalog`].

use std::path::{Path, PathBuf};

use regex::Regex;
use rusqlite::{OpenFlags, OptionalExtension as _, types::Value};
use tracing::{debug, info};

use cinescope_core::catalog::{Catalog, Movie, MovieDetails, YearRange};

use crate::{
  Error, Result,
  queries::{
    ACTORS_FOR_FILM, GENRES, KEYWORD_CANDIDATES, MATCHING_ACTORS, MOVIE_BY_TITLE,
    MOVIES_BY_ACTOR_FULL, MOVIES_BY_ACTOR_SINGLE, MOVIES_BY_GENRE, MOVIES_BY_GENRE_AND_YEAR,
    MOVIES_BY_YEAR, YEAR_RANGE, contains_pattern,
  },
};

// ─── Catalog ─────────────────────────────────────────────────────────────────

/// A sakila-layout movie database opened read-only.
#[derive(Clone)]
pub struct SqliteCatalog {
  conn: tokio_rusqlite::Connection,
}

impl SqliteCatalog {
  /// Open the catalog at `path`. The file must already exist.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path: PathBuf = path.as_ref().to_path_buf();
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
      | OpenFlags::SQLITE_OPEN_URI
      | OpenFlags::SQLITE_OPEN_NO_MUTEX;

    let conn = match tokio_rusqlite::Connection::open_with_flags(&path, flags).await {
      Ok(conn) => conn,
      Err(source) => return Err(Error::Unavailable { path, source }),
    };

    // Opening is lazy in SQLite; touch the schema so a bad file fails here.
    let catalog = Self { conn };
    if let Err(source) = catalog.conn.call(|conn| Ok(probe(conn)?)).await {
      return Err(Error::Unavailable { path, source });
    }

    info!(path = %path.display(), "opened movie catalog");
    Ok(catalog)
  }

  pub(crate) fn from_connection(conn: tokio_rusqlite::Connection) -> Self { Self { conn } }

  async fn movies(&self, sql: &'static str, params: Vec<Value>) -> Result<Vec<Movie>> {
    let movies = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), |row| {
            Ok(Movie { title: row.get(0)?, release_year: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(movies)
  }

  async fn strings(&self, sql: &'static str, params: Vec<Value>) -> Result<Vec<String>> {
    let names = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(names)
  }
}

fn probe(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
  conn.query_row("SELECT COUNT(*) FROM film", [], |row| row.get::<_, i64>(0))?;
  Ok(())
}

/// Matches `keyword` at the start of any whitespace-separated word.
fn word_start(keyword: &str) -> Result<Regex> {
  Ok(Regex::new(&format!(r"(?i)(?:^|\s){}", regex::escape(keyword)))?)
}

fn text(s: &str) -> Value { Value::Text(s.to_owned()) }

// ─── Catalog impl ────────────────────────────────────────────────────────────

impl Catalog for SqliteCatalog {
  type Error = Error;

  async fn genres(&self) -> Result<Vec<String>> { self.strings(GENRES, Vec::new()).await }

  async fn find_by_genre(&self, genre: &str) -> Result<Vec<Movie>> {
    self.movies(MOVIES_BY_GENRE, vec![text(genre.trim())]).await
  }

  async fn find_by_year(&self, year: i32) -> Result<Vec<Movie>> {
    self.movies(MOVIES_BY_YEAR, vec![Value::Integer(year.into())]).await
  }

  async fn find_by_genre_and_year(&self, genre: &str, year: i32) -> Result<Vec<Movie>> {
    self
      .movies(MOVIES_BY_GENRE_AND_YEAR, vec![text(genre.trim()), Value::Integer(year.into())])
      .await
  }

  async fn find_by_actor(&self, name: &str) -> Result<Vec<Movie>> {
    let parts: Vec<&str> = name.split_whitespace().collect();
    match parts.as_slice() {
      [one] => {
        self
          .movies(MOVIES_BY_ACTOR_SINGLE, vec![text(&contains_pattern(one))])
          .await
      }
      [first, last] => {
        self
          .movies(
            MOVIES_BY_ACTOR_FULL,
            vec![text(&contains_pattern(first)), text(&contains_pattern(last))],
          )
          .await
      }
      _ => {
        debug!(name, "actor name has no usable shape");
        Ok(Vec::new())
      }
    }
  }

  async fn matching_actors(&self, partial: &str) -> Result<Vec<String>> {
    let partial = partial.trim();
    if partial.is_empty() {
      return Ok(Vec::new());
    }
    self.strings(MATCHING_ACTORS, vec![text(&contains_pattern(partial))]).await
  }

  async fn find_by_keyword(&self, keyword: &str) -> Result<Vec<Movie>> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
      return Ok(Vec::new());
    }
    let pattern = word_start(keyword)?;
    let like = contains_pattern(keyword);

    let candidates = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(KEYWORD_CANDIDATES)?;
        let rows = stmt
          .query_map([like], |row| {
            Ok((
              row.get::<_, String>(0)?,
              row.get::<_, Option<i32>>(1)?,
              row.get::<_, Option<String>>(2)?,
            ))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(
      candidates
        .into_iter()
        .filter(|(title, _, description)| {
          pattern.is_match(title)
            || description.as_deref().is_some_and(|d| pattern.is_match(d))
        })
        .map(|(title, release_year, _)| Movie { title, release_year })
        .collect(),
    )
  }

  async fn year_range(&self) -> Result<Option<YearRange>> {
    let bounds = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(YEAR_RANGE, [], |row| {
          Ok((row.get::<_, Option<i32>>(0)?, row.get::<_, Option<i32>>(1)?))
        })?)
      })
      .await?;

    Ok(match bounds {
      (Some(min), Some(max)) => Some(YearRange { min, max }),
      _ => None,
    })
  }

  async fn movie_details(&self, title: &str) -> Result<Option<MovieDetails>> {
    let title = title.trim().to_owned();
    let details = self
      .conn
      .call(move |conn| {
        let film = conn
          .query_row(MOVIE_BY_TITLE, [&title], |row| {
            Ok((
              row.get::<_, i64>(0)?,
              row.get::<_, String>(1)?,
              row.get::<_, Option<i32>>(2)?,
              row.get::<_, Option<String>>(3)?,
            ))
          })
          .optional()?;

        let Some((film_id, title, year, description)) = film else {
          return Ok(None);
        };

        let mut stmt = conn.prepare_cached(ACTORS_FOR_FILM)?;
        let actors = stmt
          .query_map([film_id], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;

        Ok(Some(MovieDetails { title, year, description, actors }))
      })
      .await?;
    Ok(details)
  }
}
