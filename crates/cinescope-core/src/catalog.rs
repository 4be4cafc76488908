//! The movie catalog query service.
//!
//! The catalog is read-only: this crate never writes to it. Matching on genre
//! and free text is case-insensitive.

use std::future::Future;

use serde::{Deserialize, Serialize};

/// One film in a result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
  pub title:        String,
  pub release_year: Option<i32>,
}

/// The full record shown for a single film.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDetails {
  pub title:       String,
  pub year:        Option<i32>,
  pub description: Option<String>,
  /// "FIRST LAST" names, sorted.
  pub actors:      Vec<String>,
}

/// Inclusive bounds of the catalog's release years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
  pub min: i32,
  pub max: i32,
}

impl YearRange {
  pub fn contains(&self, year: i32) -> bool { (self.min..=self.max).contains(&year) }
}

/// Read access to the movie catalog.
pub trait Catalog: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// All genre names, in catalog order.
  fn genres(&self) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  fn find_by_genre<'a>(
    &'a self,
    genre: &'a str,
  ) -> impl Future<Output = Result<Vec<Movie>, Self::Error>> + Send + 'a;

  fn find_by_year(
    &self,
    year: i32,
  ) -> impl Future<Output = Result<Vec<Movie>, Self::Error>> + Send + '_;

  fn find_by_genre_and_year<'a>(
    &'a self,
    genre: &'a str,
    year: i32,
  ) -> impl Future<Output = Result<Vec<Movie>, Self::Error>> + Send + 'a;

  /// One word matches a first or last name; two words match first and last.
  /// Any other shape yields no results.
  fn find_by_actor<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Vec<Movie>, Self::Error>> + Send + 'a;

  /// Full names of actors whose first or last name contains `partial`.
  fn matching_actors<'a>(
    &'a self,
    partial: &'a str,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + 'a;

  /// Films whose title or description has a word starting with `keyword`.
  fn find_by_keyword<'a>(
    &'a self,
    keyword: &'a str,
  ) -> impl Future<Output = Result<Vec<Movie>, Self::Error>> + Send + 'a;

  /// `None` when the catalog has no films with a release year.
  fn year_range(
    &self,
  ) -> impl Future<Output = Result<Option<YearRange>, Self::Error>> + Send + '_;

  fn movie_details<'a>(
    &'a self,
    title: &'a str,
  ) -> impl Future<Output = Result<Option<MovieDetails>, Self::Error>> + Send + 'a;
}
