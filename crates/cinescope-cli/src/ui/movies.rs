//! Paginated movie results and the details pane.

use cinescope_core::catalog::MovieDetails;
use ratatui::{
  Frame,
  layout::{Constraint, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Cell, Paragraph, Row, Table, TableState, Wrap},
};

use super::pane;
use crate::app::MovieList;

pub fn draw_list(f: &mut Frame, area: Rect, list: &MovieList) {
  let range = list.pager.range();
  let (page, pages) = list.pager.position();
  let title = format!(
    "{}  ({}-{} of {}, page {page}/{pages})",
    list.title,
    range.start + 1,
    range.end,
    list.movies.len()
  );

  let rows: Vec<Row> = list
    .page()
    .iter()
    .zip(range.start + 1..)
    .map(|(movie, n)| {
      Row::new(vec![
        Cell::from(n.to_string()),
        Cell::from(movie.title.clone()),
        Cell::from(movie.release_year.map(|y| y.to_string()).unwrap_or_default()),
      ])
    })
    .collect();

  let header = Row::new(vec!["#", "Title", "Year"])
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

  let table = Table::new(rows, [
    Constraint::Length(5),
    Constraint::Min(20),
    Constraint::Length(6),
  ])
  .header(header)
  .block(pane(&title))
  .row_highlight_style(
    Style::default()
      .bg(Color::Blue)
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );

  let mut state = TableState::default().with_selected(Some(list.cursor));
  f.render_stateful_widget(table, area, &mut state);
}

pub fn draw_details(f: &mut Frame, area: Rect, details: &MovieDetails) {
  let label = |s: &'static str| {
    Span::styled(
      format!("{s:<14}"),
      Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )
  };
  let year = details.year.map(|y| y.to_string()).unwrap_or_default();
  let actors = if details.actors.is_empty() {
    "-".to_owned()
  } else {
    details.actors.join(", ")
  };

  let lines = vec![
    Line::from(vec![label("Title"), Span::raw(details.title.clone())]),
    Line::from(vec![label("Year"), Span::raw(year)]),
    Line::from(vec![
      label("Description"),
      Span::raw(details.description.clone().unwrap_or_default()),
    ]),
    Line::from(vec![label("Actors"), Span::raw(actors)]),
  ];

  let block = pane(&details.title);
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
