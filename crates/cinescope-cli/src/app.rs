//! Application state machine and event dispatcher.

use cinescope_core::{
  catalog::{Catalog, Movie, MovieDetails, YearRange},
  category::Category,
  event::SearchQuery,
  stats::{CategoryCount, KeywordCount, TopQuery},
  store::EventStore,
};
use cinescope_stats::Reporting;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use strum::IntoEnumIterator as _;
use tracing::{info, warn};

use crate::{
  config::AppConfig,
  input::{self, Attempts, Pager, TOO_MANY_ATTEMPTS},
};

pub const MAIN_MENU: [&str; 8] = [
  "Search by Actor",
  "Search by Genre",
  "Search by Year",
  "Search by Genre & Year",
  "Search by Keyword",
  "View Top Queries",
  "View Visualizations",
  "Exit",
];

pub const VIZ_MENU: [&str; 3] = [
  "Top queries (bar chart)",
  "Search categories (share)",
  "Keyword frequency (bubbles)",
];

/// Entries of the top-queries menu: overall first, then one per category.
pub fn top_menu() -> Vec<String> {
  std::iter::once("All searches".to_owned())
    .chain(Category::iter().map(|c| format!("{} searches", c.title())))
    .collect()
}

// ─── Screens ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
  Actor,
  Year,
  /// Second step of a genre & year search.
  GenreYear { genre: String },
  Keyword,
}

impl PromptKind {
  pub fn question(&self, range: Option<YearRange>) -> String {
    match self {
      Self::Actor => "Enter actor's name".into(),
      Self::Keyword => "Enter keyword".into(),
      Self::Year | Self::GenreYear { .. } => match range {
        Some(r) => format!("Enter production year ({} - {})", r.min, r.max),
        None => "Enter production year".into(),
      },
    }
  }
}

/// A single-line text entry.
#[derive(Debug, Clone)]
pub struct Prompt {
  pub kind:     PromptKind,
  pub input:    String,
  pub attempts: Attempts,
  pub error:    Option<String>,
}

/// What happens once a genre has been chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenreNext {
  Search,
  AskYear,
}

#[derive(Debug, Clone)]
pub struct GenrePicker {
  pub genres:   Vec<String>,
  /// Typed text: filters the list, or names a genre by number or name.
  pub filter:   String,
  /// Position within [`GenrePicker::visible`].
  pub cursor:   usize,
  pub next:     GenreNext,
  pub attempts: Attempts,
  pub error:    Option<String>,
}

impl GenrePicker {
  /// Indices into `genres` matching the current filter.
  pub fn visible(&self) -> Vec<usize> { input::fuzzy_filter(&self.genres, &self.filter) }
}

#[derive(Debug, Clone)]
pub struct ActorPicker {
  pub names:  Vec<String>,
  pub cursor: usize,
}

#[derive(Debug, Clone)]
pub struct MovieList {
  pub title:  String,
  pub movies: Vec<Movie>,
  pub pager:  Pager,
  /// Row within the current page.
  pub cursor: usize,
}

impl MovieList {
  pub fn page(&self) -> &[Movie] { &self.movies[self.pager.range()] }

  fn selected(&self) -> Option<&Movie> { self.page().get(self.cursor) }
}

#[derive(Debug, Clone)]
pub enum Screen {
  MainMenu { cursor: usize },
  TopMenu { cursor: usize },
  VizMenu { cursor: usize },
  Prompt(Prompt),
  GenrePicker(GenrePicker),
  ActorPicker(ActorPicker),
  Movies(MovieList),
  Details(MovieDetails),
  Ranking { title: String, rows: Vec<TopQuery> },
  BarChart(Vec<TopQuery>),
  CategoryShare(Vec<CategoryCount>),
  KeywordBubbles(Vec<KeywordCount>),
}

// ─── View ────────────────────────────────────────────────────────────────────

/// Everything the renderer reads.
pub struct View {
  /// Current screen.
  pub screen:     Screen,
  /// Screens to return to; the main menu is always at the bottom.
  pub back:       Vec<Screen>,
  /// One-line status message shown in the status bar.
  pub status_msg: String,
  /// Release years in the catalog, loaded on start.
  pub year_range: Option<YearRange>,
  /// Whether searches are being recorded.
  pub logging:    bool,
}

impl View {
  fn new(logging: bool) -> Self {
    Self {
      screen: Screen::MainMenu { cursor: 0 },
      back: Vec::new(),
      status_msg: String::new(),
      year_range: None,
      logging,
    }
  }

  fn push(&mut self, screen: Screen) {
    let previous = std::mem::replace(&mut self.screen, screen);
    self.back.push(previous);
  }

  fn pop(&mut self) {
    if let Some(previous) = self.back.pop() {
      self.screen = previous;
    }
  }

  fn home(&mut self) {
    if !self.back.is_empty() {
      self.screen = self.back.swap_remove(0);
      self.back.clear();
    }
  }
}

// ─── Actions ─────────────────────────────────────────────────────────────────

/// Work decided by a key press that needs the catalog or the façade.
enum Action {
  None,
  Quit,
  Back,
  Home,
  TooManyAttempts,
  MainMenu(usize),
  TopMenu(usize),
  VizMenu(usize),
  SearchActor(String),
  RunActor(String),
  PickGenre(String, GenreNext),
  SearchYear(i32),
  SearchGenreYear(String, i32),
  SearchKeyword(String),
  OpenDetails(String),
}

enum MenuKey {
  None,
  Select(usize),
  Back,
}

fn menu_key(key: KeyEvent, cursor: &mut usize, len: usize) -> MenuKey {
  match key.code {
    KeyCode::Down | KeyCode::Char('j') => {
      if *cursor + 1 < len {
        *cursor += 1;
      }
      MenuKey::None
    }
    KeyCode::Up | KeyCode::Char('k') => {
      *cursor = cursor.saturating_sub(1);
      MenuKey::None
    }
    KeyCode::Enter => MenuKey::Select(*cursor),
    // Number shortcuts, 1-based.
    KeyCode::Char(c @ '1'..='9') => {
      let n = c as usize - '1' as usize;
      if n < len {
        *cursor = n;
        MenuKey::Select(n)
      } else {
        MenuKey::None
      }
    }
    KeyCode::Esc | KeyCode::Char('n') => MenuKey::Back,
    _ => MenuKey::None,
  }
}

/// Record a failed entry; `hint` is shown while attempts remain.
fn reject(attempts: &mut Attempts, error: &mut Option<String>, hint: String) -> Action {
  if attempts.fail() {
    return Action::TooManyAttempts;
  }
  *error = Some(hint);
  Action::None
}

// ─── App ─────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App<C, S> {
  pub view:             View,
  catalog:              C,
  reporting:            Reporting<S>,
  page_size:            usize,
  chart_queries_limit:  usize,
  keyword_bubble_limit: usize,
  max_attempts:         u32,
}

impl<C: Catalog, S: EventStore + Clone> App<C, S> {
  pub fn new(catalog: C, reporting: Reporting<S>, config: &AppConfig) -> Self {
    Self {
      view: View::new(reporting.is_enabled()),
      catalog,
      reporting,
      page_size: config.page_size,
      chart_queries_limit: config.chart_queries_limit,
      keyword_bubble_limit: config.keyword_bubble_limit,
      max_attempts: config.max_attempts,
    }
  }

  pub fn reporting(&self) -> &Reporting<S> { &self.reporting }

  /// Fetch start-up data from the catalog.
  pub async fn load(&mut self) {
    match self.catalog.year_range().await {
      Ok(range) => self.view.year_range = range,
      Err(e) => self.catalog_error(e),
    }
  }

  fn catalog_error(&mut self, e: C::Error) {
    warn!(error = %e, "catalog query failed");
    self.view.status_msg = format!("Catalog error: {e}");
    self.view.home();
  }

  fn prompt(&self, kind: PromptKind) -> Screen {
    Screen::Prompt(Prompt {
      kind,
      input: String::new(),
      attempts: Attempts::new(self.max_attempts),
      error: None,
    })
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> bool {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }
    self.view.status_msg.clear();

    let action = self.dispatch(key);
    self.perform(action).await
  }

  fn dispatch(&mut self, key: KeyEvent) -> Action {
    let year_range = self.view.year_range;
    match &mut self.view.screen {
      Screen::MainMenu { cursor } => {
        if key.code == KeyCode::Char('q') {
          return Action::Quit;
        }
        match menu_key(key, cursor, MAIN_MENU.len()) {
          MenuKey::Select(i) => Action::MainMenu(i),
          MenuKey::Back if key.code == KeyCode::Char('n') => Action::Quit,
          _ => Action::None,
        }
      }
      Screen::TopMenu { cursor } => match menu_key(key, cursor, top_menu().len()) {
        MenuKey::Select(i) => Action::TopMenu(i),
        MenuKey::Back => Action::Back,
        MenuKey::None => Action::None,
      },
      Screen::VizMenu { cursor } => match menu_key(key, cursor, VIZ_MENU.len()) {
        MenuKey::Select(i) => Action::VizMenu(i),
        MenuKey::Back => Action::Back,
        MenuKey::None => Action::None,
      },
      Screen::Prompt(prompt) => prompt_key(prompt, key, year_range),
      Screen::GenrePicker(picker) => genre_key(picker, key),
      Screen::ActorPicker(picker) => match menu_key(key, &mut picker.cursor, picker.names.len()) {
        MenuKey::Select(i) => picker
          .names
          .get(i)
          .cloned()
          .map_or(Action::None, Action::RunActor),
        MenuKey::Back => Action::Home,
        MenuKey::None => Action::None,
      },
      Screen::Movies(list) => movies_key(list, key),
      Screen::Details(_) => match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('y') => Action::Back,
        KeyCode::Char('n') => Action::Home,
        _ => Action::None,
      },
      Screen::Ranking { .. }
      | Screen::BarChart(_)
      | Screen::CategoryShare(_)
      | Screen::KeywordBubbles(_) => match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('n') => Action::Back,
        _ => Action::None,
      },
    }
  }

  async fn perform(&mut self, action: Action) -> bool {
    match action {
      Action::None => {}
      Action::Quit => return false,
      Action::Back => self.view.pop(),
      Action::Home => self.view.home(),
      Action::TooManyAttempts => {
        self.view.status_msg = TOO_MANY_ATTEMPTS.into();
        self.view.home();
      }
      Action::MainMenu(i) => return self.open_main_item(i).await,
      Action::TopMenu(i) => self.open_ranking(i).await,
      Action::VizMenu(i) => self.open_chart(i).await,
      Action::SearchActor(typed) => self.search_actor(typed).await,
      Action::RunActor(name) => self.run_actor(name).await,
      Action::PickGenre(genre, GenreNext::Search) => {
        self.reporting.log_search(SearchQuery::genre(&genre)).await;
        let found = self.catalog.find_by_genre(&genre).await;
        self.show_movies(format!("Genre: {genre}"), found, format!("No movies found for genre: {genre}"));
      }
      Action::PickGenre(genre, GenreNext::AskYear) => {
        let prompt = self.prompt(PromptKind::GenreYear { genre });
        self.view.push(prompt);
      }
      Action::SearchYear(year) => {
        self.reporting.log_search(SearchQuery::year(year)).await;
        let found = self.catalog.find_by_year(year).await;
        self.show_movies(format!("Year: {year}"), found, format!("No movies found for year: {year}"));
      }
      Action::SearchGenreYear(genre, year) => {
        self.reporting.log_search(SearchQuery::genre_year(&genre, year)).await;
        let found = self.catalog.find_by_genre_and_year(&genre, year).await;
        self.show_movies(
          format!("Genre: {genre}, Year: {year}"),
          found,
          format!("No movies found for genre {genre} in {year}"),
        );
      }
      Action::SearchKeyword(keyword) => {
        self.reporting.log_keyword_search(&keyword).await;
        let found = self.catalog.find_by_keyword(&keyword).await;
        self.show_movies(
          format!("Keyword: {keyword}"),
          found,
          format!("No movies found for keyword: {keyword}"),
        );
      }
      Action::OpenDetails(title) => match self.catalog.movie_details(&title).await {
        Ok(Some(details)) => self.view.push(Screen::Details(details)),
        Ok(None) => self.view.status_msg = format!("No details found for {title}."),
        Err(e) => self.catalog_error(e),
      },
    }
    true
  }

  // ── Menus ─────────────────────────────────────────────────────────────────

  async fn open_main_item(&mut self, index: usize) -> bool {
    let screen = match index {
      0 => self.prompt(PromptKind::Actor),
      1 | 3 => {
        let next = if index == 1 { GenreNext::Search } else { GenreNext::AskYear };
        match self.catalog.genres().await {
          Ok(genres) if genres.is_empty() => {
            self.view.status_msg = "The catalog has no genres.".into();
            return true;
          }
          Ok(genres) => Screen::GenrePicker(GenrePicker {
            genres,
            filter: String::new(),
            cursor: 0,
            next,
            attempts: Attempts::new(self.max_attempts),
            error: None,
          }),
          Err(e) => {
            self.catalog_error(e);
            return true;
          }
        }
      }
      2 => self.prompt(PromptKind::Year),
      4 => self.prompt(PromptKind::Keyword),
      5 => Screen::TopMenu { cursor: 0 },
      6 => Screen::VizMenu { cursor: 0 },
      _ => return false,
    };
    self.view.push(screen);
    true
  }

  async fn open_ranking(&mut self, index: usize) {
    let (title, rows) = match index.checked_sub(1).and_then(|i| Category::iter().nth(i)) {
      None => ("Top Searches".to_owned(), self.reporting.top_queries(None).await),
      Some(category) => (
        format!("Top {} Searches", category.title()),
        self.reporting.top_queries_by_category(category, None).await,
      ),
    };
    self.view.push(Screen::Ranking { title, rows });
  }

  async fn open_chart(&mut self, index: usize) {
    let screen = match index {
      0 => Screen::BarChart(self.reporting.top_queries(Some(self.chart_queries_limit)).await),
      1 => Screen::CategoryShare(self.reporting.category_distribution().await),
      _ => Screen::KeywordBubbles(self.reporting.top_keywords(Some(self.keyword_bubble_limit)).await),
    };
    self.view.push(screen);
  }

  // ── Searches ──────────────────────────────────────────────────────────────

  async fn search_actor(&mut self, typed: String) {
    let matches = match self.catalog.matching_actors(&typed).await {
      Ok(matches) => matches,
      Err(e) => return self.catalog_error(e),
    };

    if matches.len() > 1 {
      info!(%typed, matches = matches.len(), "asking which actor was meant");
      self.view.push(Screen::ActorPicker(ActorPicker { names: matches, cursor: 0 }));
      return;
    }

    match matches.into_iter().next() {
      Some(name) => self.run_actor(name).await,
      None => {
        self.reporting.log_search(SearchQuery::actor(&typed)).await;
        self.view.status_msg = format!("No actor {typed} found.");
        self.view.home();
      }
    }
  }

  async fn run_actor(&mut self, name: String) {
    self.reporting.log_search(SearchQuery::actor(&name)).await;
    let found = self.catalog.find_by_actor(&name).await;
    self.show_movies(format!("Actor: {name}"), found, format!("No movies found for actor: {name}"));
  }

  fn show_movies(&mut self, title: String, found: Result<Vec<Movie>, C::Error>, empty: String) {
    let movies = match found {
      Ok(movies) => movies,
      Err(e) => return self.catalog_error(e),
    };

    self.view.home();
    if movies.is_empty() {
      self.view.status_msg = empty;
      return;
    }
    let pager = Pager::new(movies.len(), self.page_size);
    self.view.push(Screen::Movies(MovieList { title, movies, pager, cursor: 0 }));
  }
}

// ─── Per-screen keys ─────────────────────────────────────────────────────────

fn prompt_key(prompt: &mut Prompt, key: KeyEvent, year_range: Option<YearRange>) -> Action {
  match key.code {
    KeyCode::Esc => Action::Back,
    KeyCode::Backspace => {
      prompt.input.pop();
      Action::None
    }
    KeyCode::Char(c) => {
      prompt.input.push(c);
      Action::None
    }
    KeyCode::Enter => {
      let entry = std::mem::take(&mut prompt.input);
      let checked = match &prompt.kind {
        PromptKind::Actor => input::validate_actor(&entry)
          .map(Action::SearchActor)
          .map_err(String::from),
        PromptKind::Keyword => input::validate_keyword(&entry)
          .map(Action::SearchKeyword)
          .map_err(String::from),
        PromptKind::Year => input::validate_year(&entry, year_range).map(Action::SearchYear),
        PromptKind::GenreYear { genre } => input::validate_year(&entry, year_range)
          .map(|year| Action::SearchGenreYear(genre.clone(), year)),
      };
      match checked {
        Ok(action) => action,
        Err(hint) => reject(&mut prompt.attempts, &mut prompt.error, hint),
      }
    }
    _ => Action::None,
  }
}

fn genre_key(picker: &mut GenrePicker, key: KeyEvent) -> Action {
  match key.code {
    KeyCode::Esc => Action::Back,
    KeyCode::Down => {
      if picker.cursor + 1 < picker.visible().len() {
        picker.cursor += 1;
      }
      Action::None
    }
    KeyCode::Up => {
      picker.cursor = picker.cursor.saturating_sub(1);
      Action::None
    }
    KeyCode::Backspace => {
      picker.filter.pop();
      picker.cursor = 0;
      Action::None
    }
    KeyCode::Char(c) => {
      picker.filter.push(c);
      picker.cursor = 0;
      Action::None
    }
    KeyCode::Enter => {
      // An exact number or name wins over the highlighted row.
      let typed = picker.filter.trim().to_owned();
      let exact = (!typed.is_empty()).then(|| input::resolve_genre(&picker.genres, &typed));
      let highlighted = picker
        .visible()
        .get(picker.cursor)
        .map(|&i| picker.genres[i].clone());

      match (exact, highlighted) {
        (Some(Ok(genre)), _) | (_, Some(genre)) => Action::PickGenre(genre, picker.next),
        (Some(Err(hint)), None) => {
          picker.filter.clear();
          picker.cursor = 0;
          reject(&mut picker.attempts, &mut picker.error, hint)
        }
        (None, None) => Action::None,
      }
    }
    _ => Action::None,
  }
}

fn movies_key(list: &mut MovieList, key: KeyEvent) -> Action {
  match key.code {
    KeyCode::Down | KeyCode::Char('j') => {
      if list.cursor + 1 < list.page().len() {
        list.cursor += 1;
      }
      Action::None
    }
    KeyCode::Up | KeyCode::Char('k') => {
      list.cursor = list.cursor.saturating_sub(1);
      Action::None
    }
    KeyCode::Char('m') | KeyCode::Right | KeyCode::PageDown => {
      if list.pager.next() {
        list.cursor = 0;
      }
      Action::None
    }
    KeyCode::Char('p') | KeyCode::Left | KeyCode::PageUp => {
      if list.pager.previous() {
        list.cursor = 0;
      }
      Action::None
    }
    KeyCode::Enter => list
      .selected()
      .map_or(Action::None, |m| Action::OpenDetails(m.title.clone())),
    KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('q') => Action::Home,
    _ => Action::None,
  }
}
