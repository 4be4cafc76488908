use std::{
  io,
  sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
  },
};

use clap::{CommandFactory as _, Parser as _};
use cinescope_core::{
  catalog::{Catalog, Movie, MovieDetails, YearRange},
  category::Category,
  event::SearchQuery,
  store::EventStore as _,
};
use cinescope_stats::Reporting;
use cinescope_store_sqlite::SqliteEventStore;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::{
  Cli, Command, StatsCommand,
  app::{App, Screen},
  config::AppConfig,
  input::TOO_MANY_ATTEMPTS,
};

// ─── Stub catalog ────────────────────────────────────────────────────────────

const GENRES: [&str; 3] = ["Action", "Comedy", "Drama"];
const ACTORS: [&str; 3] = ["ED CHASE", "PENELOPE GUINESS", "PENELOPE MONROE"];

fn movies(prefix: &str, n: usize) -> Vec<Movie> {
  (1..=n)
    .map(|i| Movie { title: format!("{prefix} {i}"), release_year: Some(2006) })
    .collect()
}

#[derive(Clone, Default)]
struct StubCatalog {
  offline: Arc<AtomicBool>,
}

impl StubCatalog {
  fn check(&self) -> io::Result<()> {
    if self.offline.load(Ordering::SeqCst) {
      return Err(io::Error::other("catalog offline"));
    }
    Ok(())
  }
}

impl Catalog for StubCatalog {
  type Error = io::Error;

  async fn genres(&self) -> io::Result<Vec<String>> {
    self.check()?;
    Ok(GENRES.map(String::from).to_vec())
  }

  async fn find_by_genre(&self, genre: &str) -> io::Result<Vec<Movie>> {
    self.check()?;
    Ok(if genre == "Action" { movies("ACTION", 23) } else { Vec::new() })
  }

  async fn find_by_year(&self, year: i32) -> io::Result<Vec<Movie>> {
    self.check()?;
    Ok(movies(&format!("YEAR {year}"), 2))
  }

  async fn find_by_genre_and_year(&self, genre: &str, year: i32) -> io::Result<Vec<Movie>> {
    self.check()?;
    Ok(movies(&format!("{genre} {year}"), 1))
  }

  async fn find_by_actor(&self, name: &str) -> io::Result<Vec<Movie>> {
    self.check()?;
    Ok(if ACTORS.contains(&name) { movies(name, 3) } else { Vec::new() })
  }

  async fn matching_actors(&self, partial: &str) -> io::Result<Vec<String>> {
    self.check()?;
    let partial = partial.to_uppercase();
    Ok(
      ACTORS
        .iter()
        .filter(|a| a.contains(&partial))
        .map(|a| a.to_string())
        .collect(),
    )
  }

  async fn find_by_keyword(&self, keyword: &str) -> io::Result<Vec<Movie>> {
    self.check()?;
    Ok(if keyword == "drama" { movies("DRAMA", 4) } else { Vec::new() })
  }

  async fn year_range(&self) -> io::Result<Option<YearRange>> {
    self.check()?;
    Ok(Some(YearRange { min: 1990, max: 2006 }))
  }

  async fn movie_details(&self, title: &str) -> io::Result<Option<MovieDetails>> {
    self.check()?;
    Ok(Some(MovieDetails {
      title:       title.to_owned(),
      year:        Some(2006),
      description: Some("A Epic Drama".into()),
      actors:      vec!["ED CHASE".into()],
    }))
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

type TestApp = App<StubCatalog, SqliteEventStore>;

async fn app() -> (TestApp, SqliteEventStore, StubCatalog) {
  let store = SqliteEventStore::open_in_memory().await.unwrap();
  let catalog = StubCatalog::default();
  let cfg = AppConfig::default();
  let reporting = Reporting::new(store.clone(), cfg.report_limits());
  let mut app = App::new(catalog.clone(), reporting, &cfg);
  app.load().await;
  (app, store, catalog)
}

async fn press(app: &mut TestApp, code: KeyCode) -> bool {
  app.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).await
}

/// Type `text` and press Enter.
async fn submit(app: &mut TestApp, text: &str) {
  for c in text.chars() {
    press(app, KeyCode::Char(c)).await;
  }
  press(app, KeyCode::Enter).await;
}

/// Labels of every logged search, oldest first.
async fn logged(store: &SqliteEventStore) -> Vec<String> {
  let mut events = store.recent_events(100).await.unwrap();
  events.reverse();
  events.iter().map(|e| e.label()).collect()
}

fn on_main_menu(app: &TestApp) -> bool { matches!(app.view.screen, Screen::MainMenu { .. }) }

fn movie_count(app: &TestApp) -> usize {
  match &app.view.screen {
    Screen::Movies(list) => list.movies.len(),
    _ => 0,
  }
}

// ─── Actor searches ──────────────────────────────────────────────────────────

#[tokio::test]
async fn actor_single_match_logs_resolved_name_once() {
  let (mut app, store, _) = app().await;
  press(&mut app, KeyCode::Char('1')).await;
  submit(&mut app, "chase").await;

  assert_eq!(logged(&store).await, vec!["Actor: ED CHASE"]);
  assert_eq!(movie_count(&app), 3);
}

#[tokio::test]
async fn actor_pick_among_several_is_logged() {
  let (mut app, store, _) = app().await;
  press(&mut app, KeyCode::Char('1')).await;
  submit(&mut app, "penelope").await;

  assert!(matches!(app.view.screen, Screen::ActorPicker(_)));
  assert!(logged(&store).await.is_empty());

  press(&mut app, KeyCode::Down).await;
  press(&mut app, KeyCode::Enter).await;
  assert_eq!(logged(&store).await, vec!["Actor: PENELOPE MONROE"]);
  assert_eq!(movie_count(&app), 3);
}

#[tokio::test]
async fn cancelled_actor_pick_logs_nothing() {
  let (mut app, store, _) = app().await;
  press(&mut app, KeyCode::Char('1')).await;
  submit(&mut app, "penelope").await;
  press(&mut app, KeyCode::Esc).await;

  assert!(on_main_menu(&app));
  assert!(logged(&store).await.is_empty());
}

#[tokio::test]
async fn unknown_actor_logs_typed_name() {
  let (mut app, store, _) = app().await;
  press(&mut app, KeyCode::Char('1')).await;
  submit(&mut app, "nobody").await;

  assert_eq!(logged(&store).await, vec!["Actor: nobody"]);
  assert!(on_main_menu(&app));
  assert_eq!(app.view.status_msg, "No actor nobody found.");
}

#[tokio::test]
async fn repeated_invalid_input_returns_to_menu() {
  let (mut app, store, _) = app().await;
  press(&mut app, KeyCode::Char('1')).await;

  submit(&mut app, "ab").await;
  submit(&mut app, "a1b").await;
  match &app.view.screen {
    Screen::Prompt(p) => {
      assert!(p.error.is_some());
      assert!(p.input.is_empty());
      assert_eq!(p.attempts.remaining(), 1);
    }
    _ => panic!("expected the actor prompt"),
  }

  submit(&mut app, "x").await;
  assert!(on_main_menu(&app));
  assert_eq!(app.view.status_msg, TOO_MANY_ATTEMPTS);
  assert!(logged(&store).await.is_empty());
}

// ─── Genre and year searches ─────────────────────────────────────────────────

#[tokio::test]
async fn genre_by_number_pages_through_results() {
  let (mut app, store, _) = app().await;
  press(&mut app, KeyCode::Char('2')).await;
  submit(&mut app, "1").await;

  assert_eq!(logged(&store).await, vec!["Genre: Action"]);
  press(&mut app, KeyCode::Char('m')).await;
  press(&mut app, KeyCode::Char('m')).await;
  press(&mut app, KeyCode::Char('m')).await;

  let Screen::Movies(list) = &app.view.screen else { panic!("expected movies") };
  assert_eq!(list.pager.position(), (3, 3));
  assert_eq!(list.page().len(), 3);
  assert_eq!(list.page()[0].title, "ACTION 21");

  press(&mut app, KeyCode::Char('p')).await;
  let Screen::Movies(list) = &app.view.screen else { panic!("expected movies") };
  assert_eq!(list.pager.position(), (2, 3));
}

#[tokio::test]
async fn genre_filter_picks_best_match() {
  let (mut app, store, _) = app().await;
  press(&mut app, KeyCode::Char('2')).await;
  submit(&mut app, "com").await;

  assert_eq!(logged(&store).await, vec!["Genre: Comedy"]);
  assert!(on_main_menu(&app));
  assert_eq!(app.view.status_msg, "No movies found for genre: Comedy");
}

#[tokio::test]
async fn unknown_genre_is_rejected_without_logging() {
  let (mut app, store, _) = app().await;
  press(&mut app, KeyCode::Char('2')).await;
  submit(&mut app, "xyz").await;

  let Screen::GenrePicker(picker) = &app.view.screen else { panic!("expected picker") };
  assert!(picker.error.is_some());
  assert!(picker.filter.is_empty());
  assert!(logged(&store).await.is_empty());
}

#[tokio::test]
async fn genre_and_year_logs_combined_search() {
  let (mut app, store, _) = app().await;
  press(&mut app, KeyCode::Char('4')).await;
  submit(&mut app, "drama").await;
  assert!(matches!(app.view.screen, Screen::Prompt(_)));

  submit(&mut app, "2005").await;
  assert_eq!(logged(&store).await, vec!["Genre: Drama, Year: 2005"]);
  assert_eq!(movie_count(&app), 1);
}

#[tokio::test]
async fn year_outside_catalog_range_is_rejected() {
  let (mut app, store, _) = app().await;
  press(&mut app, KeyCode::Char('3')).await;
  submit(&mut app, "1900").await;
  assert!(logged(&store).await.is_empty());

  submit(&mut app, "2006").await;
  assert_eq!(logged(&store).await, vec!["Year: 2006"]);
  assert_eq!(movie_count(&app), 2);
}

// ─── Keyword searches ────────────────────────────────────────────────────────

#[tokio::test]
async fn keyword_search_links_an_occurrence() {
  let (mut app, store, _) = app().await;
  press(&mut app, KeyCode::Char('5')).await;
  submit(&mut app, "drama").await;

  let events = store.recent_events(10).await.unwrap();
  assert_eq!(events.len(), 1);
  assert_eq!(events[0].query, SearchQuery::keyword("drama"));

  let occurrences = store.occurrences_for(events[0].id).await.unwrap();
  assert_eq!(occurrences.len(), 1);
  assert_eq!(occurrences[0].keyword, "drama");
}

#[tokio::test]
async fn details_open_and_return_to_list() {
  let (mut app, _, _) = app().await;
  press(&mut app, KeyCode::Char('5')).await;
  submit(&mut app, "drama").await;
  press(&mut app, KeyCode::Down).await;
  press(&mut app, KeyCode::Enter).await;

  let Screen::Details(details) = &app.view.screen else { panic!("expected details") };
  assert_eq!(details.title, "DRAMA 2");

  press(&mut app, KeyCode::Esc).await;
  assert_eq!(movie_count(&app), 4);
  press(&mut app, KeyCode::Char('n')).await;
  assert!(on_main_menu(&app));
}

// ─── Statistics screens ──────────────────────────────────────────────────────

#[tokio::test]
async fn top_queries_overall_and_by_category() {
  let (mut app, store, _) = app().await;
  for query in [SearchQuery::genre("Action"), SearchQuery::year(2006), SearchQuery::genre("Action")] {
    store.insert_event(query).await.unwrap();
  }

  press(&mut app, KeyCode::Char('6')).await;
  press(&mut app, KeyCode::Enter).await;
  let Screen::Ranking { title, rows } = &app.view.screen else { panic!("expected ranking") };
  assert_eq!(title, "Top Searches");
  assert_eq!(rows[0].label, "Genre: Action");
  assert_eq!(rows[0].count, 2);
  assert_eq!(rows.len(), 2);

  // Back to the menu, then the Actor entry (sixth).
  press(&mut app, KeyCode::Esc).await;
  press(&mut app, KeyCode::Char('6')).await;
  let Screen::Ranking { title, rows } = &app.view.screen else { panic!("expected ranking") };
  assert_eq!(title, "Top Actor Searches");
  assert!(rows.is_empty());
}

#[tokio::test]
async fn charts_on_an_empty_log_have_no_data() {
  let (mut app, _, _) = app().await;
  press(&mut app, KeyCode::Char('7')).await;

  press(&mut app, KeyCode::Char('1')).await;
  assert!(matches!(&app.view.screen, Screen::BarChart(rows) if rows.is_empty()));
  press(&mut app, KeyCode::Esc).await;

  press(&mut app, KeyCode::Char('2')).await;
  assert!(matches!(&app.view.screen, Screen::CategoryShare(c) if c.is_empty()));
  press(&mut app, KeyCode::Esc).await;

  press(&mut app, KeyCode::Char('3')).await;
  assert!(matches!(&app.view.screen, Screen::KeywordBubbles(k) if k.is_empty()));
}

#[tokio::test]
async fn category_share_reflects_logged_searches() {
  let (mut app, _, _) = app().await;
  press(&mut app, KeyCode::Char('5')).await;
  submit(&mut app, "drama").await;
  press(&mut app, KeyCode::Esc).await;

  press(&mut app, KeyCode::Char('7')).await;
  press(&mut app, KeyCode::Char('2')).await;
  let Screen::CategoryShare(counts) = &app.view.screen else { panic!("expected share") };
  assert_eq!(counts.len(), 1);
  assert_eq!(counts[0].category, Category::Keyword);
  assert_eq!(counts[0].count, 1);
}

// ─── Failures and exit ───────────────────────────────────────────────────────

#[tokio::test]
async fn catalog_failure_shows_status_and_stays_home() {
  let (mut app, _, catalog) = app().await;
  catalog.offline.store(true, Ordering::SeqCst);

  assert!(press(&mut app, KeyCode::Char('2')).await);
  assert!(on_main_menu(&app));
  assert!(app.view.status_msg.contains("catalog offline"));
}

#[tokio::test]
async fn searches_work_with_logging_disabled() {
  let cfg = AppConfig::default();
  let reporting: Reporting<SqliteEventStore> = Reporting::disabled(cfg.report_limits());
  let mut app = App::new(StubCatalog::default(), reporting, &cfg);
  app.load().await;
  assert!(!app.view.logging);

  press(&mut app, KeyCode::Char('5')).await;
  submit(&mut app, "drama").await;
  assert_eq!(movie_count(&app), 4);
}

#[tokio::test]
async fn exit_paths() {
  let (mut app, _, _) = app().await;
  assert!(!press(&mut app, KeyCode::Char('8')).await);
  assert!(!press(&mut app, KeyCode::Char('q')).await);

  press(&mut app, KeyCode::Char('1')).await;
  let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
  assert!(!app.handle_key(ctrl_c).await);
}

// ─── Command line ────────────────────────────────────────────────────────────

#[test]
fn cli_definition_is_consistent() { Cli::command().debug_assert(); }

#[test]
fn no_subcommand_means_interactive() {
  let cli = Cli::try_parse_from(["cinescope"]).unwrap();
  assert_eq!(cli.command, None);
  assert_eq!(cli.config, std::path::PathBuf::from("cinescope.toml"));
}

#[test]
fn parses_stats_top_with_category() {
  let cli =
    Cli::try_parse_from(["cinescope", "stats", "top", "-c", "genre_year", "-l", "3", "--json"])
      .unwrap();
  assert_eq!(
    cli.command,
    Some(Command::Stats(StatsCommand::Top {
      limit:    Some(3),
      category: Some(Category::GenreYear),
      json:     true,
    }))
  );
}

#[test]
fn rejects_unknown_category() {
  assert!(Cli::try_parse_from(["cinescope", "stats", "top", "--category", "director"]).is_err());
}

#[test]
fn history_has_default_limit() {
  let cli = Cli::try_parse_from(["cinescope", "history"]).unwrap();
  assert_eq!(cli.command, Some(Command::History { limit: 20, json: false }));
}
