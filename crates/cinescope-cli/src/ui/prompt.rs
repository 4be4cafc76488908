//! Text entry and the genre picker.

use cinescope_core::catalog::YearRange;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{List, ListItem, ListState, Paragraph},
};

use super::pane;
use crate::app::{GenreNext, GenrePicker, Prompt, PromptKind};

fn error_line(error: Option<&str>, remaining: u32) -> Line<'static> {
  match error {
    Some(e) => Line::from(vec![
      Span::styled(e.to_owned(), Style::default().fg(Color::Red)),
      Span::styled(
        format!("  ({remaining} attempts left)"),
        Style::default().fg(Color::DarkGray),
      ),
    ]),
    None => Line::from(""),
  }
}

pub fn draw_prompt(f: &mut Frame, area: Rect, prompt: &Prompt, range: Option<YearRange>) {
  let title = match &prompt.kind {
    PromptKind::Actor => "Search by Actor".to_owned(),
    PromptKind::Year => "Search by Year".to_owned(),
    PromptKind::GenreYear { genre } => format!("Search by Genre & Year: {genre}"),
    PromptKind::Keyword => "Search by Keyword".to_owned(),
  };

  let lines = vec![
    Line::from(Span::styled(
      format!("{}:", prompt.kind.question(range)),
      Style::default().add_modifier(Modifier::BOLD),
    )),
    Line::from(Span::styled(format!("> {}_", prompt.input), Style::default().fg(Color::Yellow))),
    Line::from(""),
    error_line(prompt.error.as_deref(), prompt.attempts.remaining()),
  ];

  let block = pane(&title);
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(lines), inner);
}

pub fn draw_genre_picker(f: &mut Frame, area: Rect, picker: &GenrePicker) {
  let title = match picker.next {
    GenreNext::Search => "Search by Genre",
    GenreNext::AskYear => "Search by Genre & Year",
  };
  let block = pane(title);
  let inner = block.inner(area);
  f.render_widget(block, area);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Min(0), Constraint::Length(2)])
    .split(inner);

  // Numbers always refer to the full list, so they stay stable while filtering.
  let visible = picker.visible();
  let items: Vec<ListItem> = visible
    .iter()
    .map(|&i| ListItem::new(format!("{:>2}. {}", i + 1, picker.genres[i])))
    .collect();

  let mut state = ListState::default();
  state.select((!visible.is_empty()).then_some(picker.cursor));
  f.render_stateful_widget(
    List::new(items).highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    rows[0],
    &mut state,
  );

  let footer = vec![
    Line::from(Span::styled(
      format!("Select genre by number or enter name: {}_", picker.filter),
      Style::default().fg(Color::Yellow),
    )),
    error_line(picker.error.as_deref(), picker.attempts.remaining()),
  ];
  f.render_widget(Paragraph::new(footer), rows[1]);
}
