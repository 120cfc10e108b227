pub mod game;
pub mod ranking;
pub mod runtime;
pub mod ui;
pub mod util;

use crate::{
    game::{Game, Phase},
    ranking::Ranking,
    runtime::{CrosstermEventSource, FixedTicker, InputEvent, Runner},
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::{Duration, Instant},
};

// ~10ms cadence keeps the live clock honest to the millisecond display
const TICK_RATE_MS: u64 = 10;

/// minimal reaction time trainer for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A minimal reaction time trainer: wait out a randomized delay, hit the key that appears, and climb the in-memory top-5 board."
)]
pub struct Cli {
    /// seed the session randomness for reproducible delays and symbols
    #[clap(short = 's', long)]
    seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Playing,
    NameEntry,
}

#[derive(Debug, PartialEq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub game: Game,
    pub ranking: Ranking,
    pub state: AppState,
    pub name_input: String,
    pub display_ms: u64,
}

impl App {
    pub fn new(cli: &Cli) -> Self {
        Self {
            game: Game::new(cli.seed),
            ranking: Ranking::new(),
            state: AppState::Playing,
            name_input: String::new(),
            display_ms: 0,
        }
    }

    /// Advance the pending delay and refresh the displayed clock.
    /// Returns whether the screen needs a redraw.
    pub fn on_tick(&mut self, now_ms: u64) -> bool {
        let was_delaying = self.game.phase() == Phase::Delaying;
        self.game.tick(now_ms);
        self.display_ms = self.game.elapsed_ms(now_ms);
        was_delaying || self.game.phase() == Phase::Active
    }

    pub fn handle_key(&mut self, key: KeyEvent, now_ms: u64) -> KeyOutcome {
        match self.state {
            AppState::Playing => match key.code {
                KeyCode::Esc => return KeyOutcome::Quit,
                KeyCode::Enter => self.try_start(now_ms),
                KeyCode::Char(c) => {
                    if key.modifiers.contains(KeyModifiers::CONTROL) && c == 'c' {
                        return KeyOutcome::Quit;
                    }

                    if c == ' ' && self.game.can_start() {
                        self.try_start(now_ms);
                    } else if self.game.check_input(c, now_ms).is_some() {
                        self.display_ms = self.game.elapsed_ms(now_ms);
                        self.name_input.clear();
                        self.state = AppState::NameEntry;
                    }
                }
                _ => {}
            },
            AppState::NameEntry => match key.code {
                KeyCode::Enter => {
                    let reaction_ms = self.game.last_reaction_ms().unwrap_or(0);
                    self.ranking.submit(&self.name_input, reaction_ms);
                    self.name_input.clear();
                    self.state = AppState::Playing;
                }
                KeyCode::Esc => {
                    self.name_input.clear();
                    self.state = AppState::Playing;
                }
                KeyCode::Backspace => {
                    self.name_input.pop();
                }
                KeyCode::Char(c) => {
                    if key.modifiers.contains(KeyModifiers::CONTROL) && c == 'c' {
                        return KeyOutcome::Quit;
                    }
                    self.name_input.push(c);
                }
                _ => {}
            },
        }

        KeyOutcome::Continue
    }

    fn try_start(&mut self, now_ms: u64) {
        if self.game.can_start() {
            self.game.start(now_ms);
            self.display_ms = 0;
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&cli);
    let res = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let epoch = Instant::now();
    let events = CrosstermEventSource::new();
    let ticker = FixedTicker::new(Duration::from_millis(TICK_RATE_MS));
    let runner = Runner::new(events, ticker);

    terminal.draw(|f| ui(app, f))?;

    loop {
        let event = runner.step();
        // timestamp after the blocking wait, not before it
        let now_ms = epoch.elapsed().as_millis() as u64;

        match event {
            InputEvent::Tick => {
                if app.on_tick(now_ms) {
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            InputEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            InputEvent::Key(key) => {
                if app.handle_key(key, now_ms) == KeyOutcome::Quit {
                    break;
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use clap::Parser;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn seeded_app(seed: u64) -> App {
        App::new(&Cli { seed: Some(seed) })
    }

    /// Drive a fresh session to the Active phase and return (app, start instant).
    fn app_with_active_game(seed: u64) -> (App, u64) {
        let mut app = seeded_app(seed);
        app.handle_key(key(' '), 0);
        assert_matches!(app.game.phase(), Phase::Delaying);

        let deadline = app.game.delay_deadline_ms().unwrap();
        app.on_tick(deadline);
        assert_matches!(app.game.phase(), Phase::Active);
        (app, deadline)
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["reflex"]);
        assert_eq!(cli.seed, None);
    }

    #[test]
    fn test_cli_seed() {
        let cli = Cli::parse_from(["reflex", "-s", "42"]);
        assert_eq!(cli.seed, Some(42));

        let cli = Cli::parse_from(["reflex", "--seed", "7"]);
        assert_eq!(cli.seed, Some(7));
    }

    #[test]
    fn test_app_new_starts_idle_with_empty_board() {
        let app = seeded_app(1);

        assert_matches!(app.game.phase(), Phase::Idle);
        assert_eq!(app.state, AppState::Playing);
        assert!(app.ranking.is_empty());
        assert_eq!(app.display_ms, 0);
        assert!(app.name_input.is_empty());
    }

    #[test]
    fn test_space_arms_the_game() {
        let mut app = seeded_app(2);

        let outcome = app.handle_key(key(' '), 100);

        assert_eq!(outcome, KeyOutcome::Continue);
        assert_matches!(app.game.phase(), Phase::Delaying);
    }

    #[test]
    fn test_enter_arms_the_game() {
        let mut app = seeded_app(3);

        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), 100);

        assert_matches!(app.game.phase(), Phase::Delaying);
    }

    #[test]
    fn test_space_during_delay_does_not_rearm() {
        let mut app = seeded_app(4);
        app.handle_key(key(' '), 0);
        let deadline = app.game.delay_deadline_ms().unwrap();

        app.handle_key(key(' '), 10);

        // still the same pending session
        assert_eq!(app.game.delay_deadline_ms(), Some(deadline));
    }

    #[test]
    fn test_letter_during_delay_is_ignored() {
        let mut app = seeded_app(5);
        app.handle_key(key(' '), 0);

        app.handle_key(key('a'), 10);

        assert_matches!(app.game.phase(), Phase::Delaying);
        assert_eq!(app.state, AppState::Playing);
    }

    #[test]
    fn test_matching_key_finishes_and_asks_for_name() {
        let (mut app, started_at) = app_with_active_game(6);
        let target = app.game.target().unwrap();

        app.handle_key(key(target.to_ascii_lowercase()), started_at + 210);

        assert_matches!(app.game.phase(), Phase::Finished);
        assert_eq!(app.state, AppState::NameEntry);
        assert_eq!(app.game.last_reaction_ms(), Some(210));
        assert_eq!(app.display_ms, 210);
    }

    #[test]
    fn test_wrong_key_keeps_playing() {
        let (mut app, started_at) = app_with_active_game(7);
        let target = app.game.target().unwrap();
        let wrong = if target == 'Z' { 'Y' } else { 'Z' };

        app.handle_key(key(wrong), started_at + 100);

        assert_matches!(app.game.phase(), Phase::Active);
        assert_eq!(app.state, AppState::Playing);
    }

    #[test]
    fn test_name_entry_commits_to_ranking() {
        let (mut app, started_at) = app_with_active_game(8);
        let target = app.game.target().unwrap();
        app.handle_key(key(target), started_at + 180);

        for c in "ann".chars() {
            app.handle_key(key(c), started_at + 500);
        }
        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), started_at + 600);

        assert_eq!(app.state, AppState::Playing);
        assert_eq!(app.ranking.len(), 1);
        let entry = &app.ranking.snapshot()[0];
        assert_eq!(entry.player, "ANN");
        assert_eq!(entry.reaction_ms, 180);
    }

    #[test]
    fn test_name_entry_backspace_edits_input() {
        let (mut app, started_at) = app_with_active_game(9);
        let target = app.game.target().unwrap();
        app.handle_key(key(target), started_at + 180);

        app.handle_key(key('a'), started_at + 300);
        app.handle_key(key('b'), started_at + 310);
        app.handle_key(
            KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE),
            started_at + 320,
        );

        assert_eq!(app.name_input, "a");
    }

    #[test]
    fn test_name_entry_escape_skips_recording() {
        let (mut app, started_at) = app_with_active_game(10);
        let target = app.game.target().unwrap();
        app.handle_key(key(target), started_at + 180);

        let outcome = app.handle_key(
            KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE),
            started_at + 400,
        );

        assert_eq!(outcome, KeyOutcome::Continue);
        assert_eq!(app.state, AppState::Playing);
        assert!(app.ranking.is_empty());
    }

    #[test]
    fn test_empty_name_commit_records_nothing() {
        let (mut app, started_at) = app_with_active_game(11);
        let target = app.game.target().unwrap();
        app.handle_key(key(target), started_at + 180);

        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), started_at + 400);

        assert_eq!(app.state, AppState::Playing);
        assert!(app.ranking.is_empty());
    }

    #[test]
    fn test_escape_quits_while_playing() {
        let mut app = seeded_app(12);

        let outcome = app.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE), 0);

        assert_eq!(outcome, KeyOutcome::Quit);
    }

    #[test]
    fn test_ctrl_c_quits_in_both_states() {
        let mut app = seeded_app(13);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);

        assert_eq!(app.handle_key(ctrl_c, 0), KeyOutcome::Quit);

        let (mut app, started_at) = app_with_active_game(13);
        let target = app.game.target().unwrap();
        app.handle_key(key(target), started_at + 100);
        assert_eq!(app.state, AppState::NameEntry);
        assert_eq!(app.handle_key(ctrl_c, started_at + 200), KeyOutcome::Quit);
    }

    #[test]
    fn test_restart_after_commit_runs_a_fresh_session() {
        let (mut app, started_at) = app_with_active_game(14);
        let target = app.game.target().unwrap();
        app.handle_key(key(target), started_at + 150);
        app.handle_key(key('j'), started_at + 300);
        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), started_at + 400);

        app.handle_key(key(' '), started_at + 1000);

        assert_matches!(app.game.phase(), Phase::Delaying);
        assert_eq!(app.game.last_reaction_ms(), None);
        assert_eq!(app.display_ms, 0);
        assert_eq!(app.ranking.len(), 1);
    }

    #[test]
    fn test_on_tick_requests_redraw_while_delay_runs() {
        let mut app = seeded_app(15);
        app.handle_key(key(' '), 0);

        assert!(app.on_tick(10));

        let deadline = app.game.delay_deadline_ms().unwrap();
        assert!(app.on_tick(deadline));
        assert_matches!(app.game.phase(), Phase::Active);
    }

    #[test]
    fn test_on_tick_idle_requests_no_redraw() {
        let mut app = seeded_app(16);

        assert!(!app.on_tick(10));
    }

    #[test]
    fn test_on_tick_updates_live_clock() {
        let (mut app, started_at) = app_with_active_game(17);

        app.on_tick(started_at + 340);

        assert_eq!(app.display_ms, 340);
        assert_matches!(app.game.phase(), Phase::Active);
    }

    #[test]
    fn test_tick_rate_constant() {
        assert_eq!(TICK_RATE_MS, 10);

        const _: () = assert!(TICK_RATE_MS > 0);
        const _: () = assert!(TICK_RATE_MS <= 1000);
    }

    #[test]
    fn test_ui_renders_idle_screen() {
        use ratatui::{backend::TestBackend, Terminal};

        let app = seeded_app(18);
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal.draw(|f| ui(&app, f)).unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = buffer.content.iter().map(|c| c.symbol()).collect();
        assert!(content.contains("press SPACE to start"));
        assert!(content.contains("00:000"));
        assert!(content.contains("(empty)"));
    }

    #[test]
    fn test_ui_renders_active_screen() {
        use ratatui::{backend::TestBackend, Terminal};

        let (app, _) = app_with_active_game(19);
        let target = app.game.target().unwrap();

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal.draw(|f| ui(&app, f)).unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = buffer.content.iter().map(|c| c.symbol()).collect();
        assert!(content.contains(&format!("press the key: {}", target)));
    }

    #[test]
    fn test_ui_renders_name_entry_screen() {
        use ratatui::{backend::TestBackend, Terminal};

        let (mut app, started_at) = app_with_active_game(20);
        let target = app.game.target().unwrap();
        app.handle_key(key(target), started_at + 160);
        app.handle_key(key('b'), started_at + 300);
        app.handle_key(key('o'), started_at + 310);

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal.draw(|f| ui(&app, f)).unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = buffer.content.iter().map(|c| c.symbol()).collect();
        assert!(content.contains("register your score"));
        assert!(content.contains("bo_"));
    }

    #[test]
    fn test_ui_renders_ranking_rows() {
        use ratatui::{backend::TestBackend, Terminal};

        let mut app = seeded_app(21);
        app.ranking.submit("ada", 123);
        app.ranking.submit("bob", 95);

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal.draw(|f| ui(&app, f)).unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = buffer.content.iter().map(|c| c.symbol()).collect();
        assert!(content.contains("1. BOB: 95 ms"));
        assert!(content.contains("2. ADA: 123 ms"));
    }
}
