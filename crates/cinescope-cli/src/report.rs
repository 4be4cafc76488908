//! Plain-text and JSON output for the one-shot subcommands.

use std::fmt::Write as _;

use anyhow::Context as _;
use cinescope_core::{
  event::SearchEvent,
  stats::{CategoryCount, KeywordCount, TopQuery},
};
use serde::Serialize;

use crate::ui::charts::shares;

pub const NO_DATA: &str = "No data available";

pub fn json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
  serde_json::to_string_pretty(value).context("serialising output")
}

pub fn top_queries(rows: &[TopQuery]) -> String {
  if rows.is_empty() {
    return NO_DATA.to_owned();
  }
  let mut out = String::new();
  for (i, q) in rows.iter().enumerate() {
    let _ = writeln!(out, "{:>3}. {:<40} {:>6}", i + 1, q.label, q.count);
  }
  out
}

pub fn distribution(counts: &[CategoryCount]) -> String {
  let shares = shares(counts);
  if shares.is_empty() {
    return NO_DATA.to_owned();
  }
  let mut out = String::new();
  for (count, ratio) in shares {
    let _ = writeln!(
      out,
      "{:<14} {:>6} {:>6.1}%",
      count.category.title(),
      count.count,
      ratio * 100.0
    );
  }
  out
}

pub fn keywords(counts: &[KeywordCount]) -> String {
  if counts.is_empty() {
    return NO_DATA.to_owned();
  }
  let mut out = String::new();
  for k in counts {
    let _ = writeln!(out, "{:<24} {:>6}", k.keyword, k.count);
  }
  out
}

pub fn history(events: &[SearchEvent]) -> String {
  if events.is_empty() {
    return NO_DATA.to_owned();
  }
  let mut out = String::new();
  for e in events {
    let _ = writeln!(
      out,
      "{:>6}  {}  {}",
      e.id.to_string(),
      e.recorded_at.format("%Y-%m-%d %H:%M:%S"),
      e.label()
    );
  }
  out
}
