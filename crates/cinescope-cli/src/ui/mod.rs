//! TUI rendering — orchestrates all panes.

pub mod charts;
pub mod menu;
pub mod movies;
pub mod prompt;
pub mod ranking;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::{self, Screen, View};

// ─── Root draw ───────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, view: &View) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], view);
  draw_body(f, rows[1], view);
  draw_status(f, rows[2], view);
}

/// A bordered block with the shared title style.
pub fn pane(title: &str) -> Block<'static> {
  Block::default()
    .title(format!(" {title} "))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray))
}

/// Grey placeholder text inside a titled pane.
pub fn draw_placeholder(f: &mut Frame, area: Rect, title: &str, text: &str) {
  let block = pane(title);
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(
    Paragraph::new(text.to_owned()).style(Style::default().fg(Color::DarkGray)),
    inner,
  );
}

// ─── Header ──────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, view: &View) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    " cinescope  movie catalog search",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let logging = if view.logging { "" } else { "query log off  " };
  let right = Span::styled(
    format!("{logging}{date} "),
    Style::default().fg(Color::Gray),
  );

  // Simple left-right header: pad the middle.
  let left_width = left.content.len() as u16;
  let right_width = right.content.len() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Body ────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, view: &View) {
  match &view.screen {
    Screen::MainMenu { cursor } => menu::draw(f, area, "Main Menu", &app::MAIN_MENU, *cursor),
    Screen::TopMenu { cursor } => {
      menu::draw(f, area, "View Top Queries", &app::top_menu(), *cursor)
    }
    Screen::VizMenu { cursor } => menu::draw(f, area, "Visualizations", &app::VIZ_MENU, *cursor),
    Screen::Prompt(p) => prompt::draw_prompt(f, area, p, view.year_range),
    Screen::GenrePicker(p) => prompt::draw_genre_picker(f, area, p),
    Screen::ActorPicker(p) => menu::draw(f, area, "Select an actor", &p.names, p.cursor),
    Screen::Movies(list) => movies::draw_list(f, area, list),
    Screen::Details(details) => movies::draw_details(f, area, details),
    Screen::Ranking { title, rows } => ranking::draw(f, area, title, rows),
    Screen::BarChart(rows) => charts::draw_bar_chart(f, area, rows),
    Screen::CategoryShare(counts) => charts::draw_category_share(f, area, counts),
    Screen::KeywordBubbles(counts) => charts::draw_keyword_bubbles(f, area, counts),
  }
}

// ─── Status bar ──────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, view: &View) {
  let (mode_label, hints) = match &view.screen {
    Screen::MainMenu { .. } => ("MENU", "↑↓/jk move  1-8 pick  Enter select  q quit"),
    Screen::TopMenu { .. } | Screen::VizMenu { .. } => {
      ("MENU", "↑↓/jk move  Enter select  Esc back")
    }
    Screen::Prompt(_) => ("INPUT", "Type and press Enter  Esc back"),
    Screen::GenrePicker(_) => ("GENRE", "Type to filter, number or name  ↑↓ move  Enter pick  Esc back"),
    Screen::ActorPicker(_) => ("ACTOR", "↑↓/jk move  Enter pick  Esc cancel"),
    Screen::Movies(_) => ("MOVIES", "↑↓/jk move  m more  p previous  Enter details  n return"),
    Screen::Details(_) => ("DETAIL", "y/Esc back to list  n main menu"),
    _ => ("VIEW", "Esc back"),
  };

  let status = if view.status_msg.is_empty() {
    hints.to_string()
  } else {
    view.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(format!("  {status}"), Style::default().fg(Color::Gray));

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
