//! Numbered menus.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::Line,
  widgets::{List, ListItem, ListState},
};

use super::pane;

/// Render `items` as a numbered list with `cursor` highlighted.
pub fn draw<T: AsRef<str>>(f: &mut Frame, area: Rect, title: &str, items: &[T], cursor: usize) {
  let list_items: Vec<ListItem> = items
    .iter()
    .enumerate()
    .map(|(i, item)| ListItem::new(Line::from(format!("{:>2}. {}", i + 1, item.as_ref()))))
    .collect();

  let mut state = ListState::default();
  state.select((!items.is_empty()).then_some(cursor));

  f.render_stateful_widget(
    List::new(list_items)
      .block(pane(title))
      .highlight_style(
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD),
      ),
    area,
    &mut state,
  );
}
