//! Ranked top-query table.

use cinescope_core::stats::TopQuery;
use ratatui::{
  Frame,
  layout::{Constraint, Rect},
  style::{Color, Modifier, Style},
  widgets::{Row, Table},
};

use super::{draw_placeholder, pane};

pub fn draw(f: &mut Frame, area: Rect, title: &str, rows: &[TopQuery]) {
  if rows.is_empty() {
    draw_placeholder(f, area, title, "No data available");
    return;
  }

  let body: Vec<Row> = rows
    .iter()
    .enumerate()
    .map(|(i, q)| {
      Row::new(vec![
        (i + 1).to_string(),
        q.category.title().to_owned(),
        q.label.clone(),
        q.count.to_string(),
      ])
    })
    .collect();

  let header = Row::new(vec!["#", "Category", "Search", "Count"])
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

  let table = Table::new(body, [
    Constraint::Length(4),
    Constraint::Length(14),
    Constraint::Min(20),
    Constraint::Length(7),
  ])
  .header(header)
  .block(pane(title));

  f.render_widget(table, area);
}
