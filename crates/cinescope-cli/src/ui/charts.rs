//! Chart views over the statistics façade's output.

use cinescope_core::stats::{CategoryCount, KeywordCount, TopQuery};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Style},
  symbols::Marker,
  text::{Line, Span},
  widgets::{
    Bar, BarChart, BarGroup, Gauge,
    canvas::{Canvas, Circle},
  },
};

use super::{draw_placeholder, pane};

const NO_DATA: &str = "No data available for visualization.";

const PALETTE: [Color; 8] = [
  Color::Cyan,
  Color::Magenta,
  Color::Yellow,
  Color::Green,
  Color::LightBlue,
  Color::LightRed,
  Color::LightGreen,
  Color::LightMagenta,
];

fn color(i: usize) -> Color { PALETTE[i % PALETTE.len()] }

// ─── Bar chart ───────────────────────────────────────────────────────────────

pub fn draw_bar_chart(f: &mut Frame, area: Rect, rows: &[TopQuery]) {
  const TITLE: &str = "Top Queries";
  if rows.is_empty() {
    draw_placeholder(f, area, TITLE, NO_DATA);
    return;
  }

  let bars: Vec<Bar> = rows
    .iter()
    .enumerate()
    .map(|(i, q)| {
      Bar::default()
        .value(q.count)
        .label(Line::from(q.label.clone()))
        .text_value(q.count.to_string())
        .style(Style::default().fg(color(i)))
    })
    .collect();

  let chart = BarChart::default()
    .block(pane(TITLE))
    .direction(Direction::Horizontal)
    .bar_width(1)
    .bar_gap(1)
    .data(BarGroup::default().bars(&bars));

  f.render_widget(chart, area);
}

// ─── Category share ──────────────────────────────────────────────────────────

/// Each category's fraction of all recorded searches.
pub fn shares(counts: &[CategoryCount]) -> Vec<(CategoryCount, f64)> {
  let total: u64 = counts.iter().map(|c| c.count).sum();
  if total == 0 {
    return Vec::new();
  }
  counts
    .iter()
    .map(|c| (*c, c.count as f64 / total as f64))
    .collect()
}

pub fn draw_category_share(f: &mut Frame, area: Rect, counts: &[CategoryCount]) {
  const TITLE: &str = "Search Categories";
  let shares = shares(counts);
  if shares.is_empty() {
    draw_placeholder(f, area, TITLE, NO_DATA);
    return;
  }

  let block = pane(TITLE);
  let inner = block.inner(area);
  f.render_widget(block, area);

  let mut constraints = vec![Constraint::Length(3); shares.len()];
  constraints.push(Constraint::Min(0));
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints(constraints)
    .split(inner);

  for (i, (count, ratio)) in shares.iter().enumerate() {
    let gauge = Gauge::default()
      .block(pane(count.category.title()))
      .gauge_style(Style::default().fg(color(i)))
      .ratio(ratio.clamp(0.0, 1.0))
      .label(format!("{:.1}%  ({})", ratio * 100.0, count.count));
    f.render_widget(gauge, rows[i]);
  }
}

// ─── Keyword bubbles ─────────────────────────────────────────────────────────

/// Canvas coordinates run from 0 to this value on both axes.
const CANVAS_SIZE: f64 = 100.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
  pub x:      f64,
  pub y:      f64,
  pub radius: f64,
  pub label:  String,
}

/// Lay keywords out on a grid, most frequent top-left, with radius
/// proportional to frequency.
pub fn bubble_layout(counts: &[KeywordCount]) -> Vec<Bubble> {
  let Some(max) = counts.iter().map(|k| k.count).max().filter(|&m| m > 0) else {
    return Vec::new();
  };

  let n = counts.len();
  let cols = (n as f64).sqrt().ceil().max(1.0) as usize;
  let rows = n.div_ceil(cols);
  let cell_w = CANVAS_SIZE / cols as f64;
  let cell_h = CANVAS_SIZE / rows as f64;
  let max_radius = cell_w.min(cell_h) * 0.45;

  counts
    .iter()
    .enumerate()
    .map(|(i, k)| {
      let (row, col) = (i / cols, i % cols);
      Bubble {
        x:      (col as f64 + 0.5) * cell_w,
        y:      CANVAS_SIZE - (row as f64 + 0.5) * cell_h,
        radius: max_radius * k.count as f64 / max as f64,
        label:  format!("{} ({})", k.keyword, k.count),
      }
    })
    .collect()
}

pub fn draw_keyword_bubbles(f: &mut Frame, area: Rect, counts: &[KeywordCount]) {
  const TITLE: &str = "Keyword Frequency";
  let bubbles = bubble_layout(counts);
  if bubbles.is_empty() {
    draw_placeholder(f, area, TITLE, NO_DATA);
    return;
  }

  let canvas = Canvas::default()
    .block(pane(TITLE))
    .marker(Marker::Braille)
    .x_bounds([0.0, CANVAS_SIZE])
    .y_bounds([0.0, CANVAS_SIZE])
    .paint(|ctx| {
      for (i, b) in bubbles.iter().enumerate() {
        ctx.draw(&Circle { x: b.x, y: b.y, radius: b.radius, color: color(i) });
      }
      // Labels on a separate layer so circles do not overwrite them.
      ctx.layer();
      for (i, b) in bubbles.iter().enumerate() {
        let x = (b.x - b.label.len() as f64 * 0.5).max(0.0);
        ctx.print(x, b.y, Line::from(Span::styled(b.label.clone(), Style::default().fg(color(i)))));
      }
    });

  f.render_widget(canvas, area);
}
