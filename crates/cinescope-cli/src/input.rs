//! Input validation and pagination for the interactive screens.

use std::ops::Range;

use cinescope_core::catalog::YearRange;
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};

pub const ACTOR_HINT: &str =
  "Actor's name must have at least 3 letters and contain only alphabetic characters.";
pub const KEYWORD_HINT: &str =
  "Keyword must be a single word with at least 3 alphabetic characters.";
pub const TOO_MANY_ATTEMPTS: &str = "Too many invalid attempts. Returning to the main menu.";

// ─── Validation ──────────────────────────────────────────────────────────────

/// Accepts one or more alphabetic words with at least 3 characters overall.
/// Returns the name with whitespace collapsed.
pub fn validate_actor(input: &str) -> Result<String, &'static str> {
  let words: Vec<&str> = input.split_whitespace().collect();
  let alphabetic = words.iter().all(|w| w.chars().all(char::is_alphabetic));
  let name = words.join(" ");
  if name.chars().count() < 3 || !alphabetic {
    return Err(ACTOR_HINT);
  }
  Ok(name)
}

/// Accepts a single alphabetic word of at least 3 characters.
pub fn validate_keyword(input: &str) -> Result<String, &'static str> {
  let keyword = input.trim();
  if keyword.chars().count() < 3 || !keyword.chars().all(char::is_alphabetic) {
    return Err(KEYWORD_HINT);
  }
  Ok(keyword.to_owned())
}

pub fn validate_year(input: &str, range: Option<YearRange>) -> Result<i32, String> {
  let Some(range) = range else {
    return Err("The catalog has no release years.".into());
  };
  let hint = || format!("Please enter a year between {} and {}.", range.min, range.max);

  let input = input.trim();
  if input.is_empty() || !input.chars().all(|c| c.is_ascii_digit()) {
    return Err(hint());
  }
  match input.parse::<i32>() {
    Ok(year) if range.contains(year) => Ok(year),
    _ => Err(hint()),
  }
}

/// Resolve typed genre input: a 1-based number into `genres`, or a genre
/// name in any case. Returns the catalog's spelling.
pub fn resolve_genre(genres: &[String], input: &str) -> Result<String, String> {
  let input = input.trim();
  if !input.is_empty() && input.chars().all(|c| c.is_ascii_digit()) {
    return match input.parse::<usize>() {
      Ok(n) if (1..=genres.len()).contains(&n) => Ok(genres[n - 1].clone()),
      _ => Err(format!("Invalid selection. Please enter a number between 1 and {}.", genres.len())),
    };
  }
  genres
    .iter()
    .find(|g| g.eq_ignore_ascii_case(input))
    .cloned()
    .ok_or_else(|| "Invalid genre selection. Please choose from the available options.".into())
}

/// Indices of `items` matching `query`, best match first. An empty query
/// keeps every item in its original order.
pub fn fuzzy_filter(items: &[String], query: &str) -> Vec<usize> {
  if query.is_empty() {
    return (0..items.len()).collect();
  }
  let matcher = SkimMatcherV2::default().ignore_case();
  let mut scored: Vec<(i64, usize)> = items
    .iter()
    .enumerate()
    .filter_map(|(i, item)| matcher.fuzzy_match(item, query).map(|score| (score, i)))
    .collect();
  scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
  scored.into_iter().map(|(_, i)| i).collect()
}

// ─── Attempts ────────────────────────────────────────────────────────────────

/// Counts invalid entries on one prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempts {
  used: u32,
  max:  u32,
}

impl Attempts {
  pub fn new(max: u32) -> Self { Self { used: 0, max } }

  /// Record an invalid entry. Returns `true` once the limit is reached.
  pub fn fail(&mut self) -> bool {
    self.used += 1;
    self.used >= self.max
  }

  pub fn remaining(&self) -> u32 { self.max.saturating_sub(self.used) }
}

// ─── Pagination ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
  len:       usize,
  page_size: usize,
  offset:    usize,
}

impl Pager {
  pub fn new(len: usize, page_size: usize) -> Self {
    Self { len, page_size: page_size.max(1), offset: 0 }
  }

  /// Index range of the current page.
  pub fn range(&self) -> Range<usize> { self.offset..(self.offset + self.page_size).min(self.len) }

  pub fn has_next(&self) -> bool { self.offset + self.page_size < self.len }

  pub fn has_previous(&self) -> bool { self.offset > 0 }

  pub fn next(&mut self) -> bool {
    if !self.has_next() {
      return false;
    }
    self.offset += self.page_size;
    true
  }

  pub fn previous(&mut self) -> bool {
    if !self.has_previous() {
      return false;
    }
    self.offset = self.offset.saturating_sub(self.page_size);
    true
  }

  /// 1-based page number and page count, for display.
  pub fn position(&self) -> (usize, usize) {
    (self.offset / self.page_size + 1, self.len.div_ceil(self.page_size).max(1))
  }
}
