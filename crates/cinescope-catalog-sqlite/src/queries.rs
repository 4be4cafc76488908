//! SQL used against the catalog.
//!
//! `release_year` is cast because some sakila ports store it as text.

pub const GENRES: &str = "SELECT name FROM category ORDER BY category_id";

pub const MOVIES_BY_GENRE: &str = "
SELECT f.title, CAST(f.release_year AS INTEGER)
FROM film AS f
JOIN film_category AS fc ON f.film_id = fc.film_id
JOIN category AS c ON fc.category_id = c.category_id
WHERE LOWER(c.name) = LOWER(?1)
ORDER BY CAST(f.release_year AS INTEGER) DESC, f.title";

pub const MOVIES_BY_YEAR: &str = "
SELECT title, CAST(release_year AS INTEGER)
FROM film
WHERE CAST(release_year AS INTEGER) = ?1
ORDER BY title";

pub const MOVIES_BY_GENRE_AND_YEAR: &str = "
SELECT f.title, CAST(f.release_year AS INTEGER)
FROM film AS f
JOIN film_category AS fc ON f.film_id = fc.film_id
JOIN category AS c ON fc.category_id = c.category_id
WHERE LOWER(c.name) = LOWER(?1)
  AND CAST(f.release_year AS INTEGER) = ?2
ORDER BY f.title";

/// One name part, matched against first or last name.
pub const MOVIES_BY_ACTOR_SINGLE: &str = "
SELECT DISTINCT f.title, CAST(f.release_year AS INTEGER)
FROM film AS f
JOIN film_actor AS fa ON f.film_id = fa.film_id
JOIN actor AS a ON fa.actor_id = a.actor_id
WHERE a.first_name LIKE ?1 ESCAPE '\\' OR a.last_name LIKE ?1 ESCAPE '\\'
ORDER BY CAST(f.release_year AS INTEGER) DESC, f.title";

/// First and last name parts, both required.
pub const MOVIES_BY_ACTOR_FULL: &str = "
SELECT DISTINCT f.title, CAST(f.release_year AS INTEGER)
FROM film AS f
JOIN film_actor AS fa ON f.film_id = fa.film_id
JOIN actor AS a ON fa.actor_id = a.actor_id
WHERE a.first_name LIKE ?1 ESCAPE '\\' AND a.last_name LIKE ?2 ESCAPE '\\'
ORDER BY CAST(f.release_year AS INTEGER) DESC, f.title";

pub const MATCHING_ACTORS: &str = "
SELECT DISTINCT first_name || ' ' || last_name AS full_name
FROM actor
WHERE first_name LIKE ?1 ESCAPE '\\' OR last_name LIKE ?1 ESCAPE '\\'
ORDER BY full_name";

/// Coarse substring prefilter; word-start matching is applied afterwards.
pub const KEYWORD_CANDIDATES: &str = "
SELECT title, CAST(release_year AS INTEGER), description
FROM film
WHERE title LIKE ?1 ESCAPE '\\' OR description LIKE ?1 ESCAPE '\\'
ORDER BY CAST(release_year AS INTEGER) DESC, title";

pub const YEAR_RANGE: &str = "
SELECT MIN(CAST(release_year AS INTEGER)), MAX(CAST(release_year AS INTEGER))
FROM film
WHERE release_year IS NOT NULL";

pub const MOVIE_BY_TITLE: &str = "
SELECT film_id, title, CAST(release_year AS INTEGER), description
FROM film
WHERE LOWER(title) = LOWER(?1)
ORDER BY film_id
LIMIT 1";

pub const ACTORS_FOR_FILM: &str = "
SELECT a.first_name || ' ' || a.last_name AS full_name
FROM film_actor AS fa
JOIN actor AS a ON fa.actor_id = a.actor_id
WHERE fa.film_id = ?1
ORDER BY full_name";

/// `%text%` with LIKE metacharacters escaped.
pub fn contains_pattern(text: &str) -> String {
  let mut escaped = String::with_capacity(text.len() + 2);
  escaped.push('%');
  for c in text.chars() {
    if matches!(c, '%' | '_' | '\\') {
      escaped.push('\\');
    }
    escaped.push(c);
  }
  escaped.push('%');
  escaped
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn contains_pattern_escapes_wildcards() {
    assert_eq!(contains_pattern("penelope"), "%penelope%");
    assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
  }
}
