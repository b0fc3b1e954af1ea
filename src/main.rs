pub mod app_dirs;
pub mod config;
pub mod history;
pub mod logbook;
pub mod panel;
pub mod rng;
pub mod session;
pub mod timing;
pub mod ui;
pub mod util;

use crate::{
    config::{ConfigStore, FileConfigStore, GameConfig},
    logbook::Logbook,
    panel::{KeyLatch, LampRow},
    session::{GameSession, State},
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
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
    sync::mpsc::{self, RecvTimeoutError},
    thread,
    time::{Duration, Instant},
};

/// terminal lamp-chase reflex game
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal reflex game: one lamp in a row lights up, strike the digit key under it before the level's reaction window closes. Hesitate a full polling pass and the lamp moves. Pacing tightens every level; run out of lives and the board goes dark."
)]
pub struct Cli {
    /// number of lamp/key pairs on the board (1-9)
    #[clap(short = 'n', long)]
    channels: Option<usize>,

    /// number of levels to clear for a victory
    #[clap(short = 'l', long)]
    levels: Option<u32>,

    /// number of misses allowed before the run ends
    #[clap(long)]
    lives: Option<u32>,

    /// opening value of the idle seed counter
    #[clap(short = 's', long)]
    seed: Option<u32>,

    /// skip the csv round log
    #[clap(long)]
    no_log: bool,
}

impl Cli {
    /// Lays the command line flags over the stored config.
    fn apply(&self, config: &mut GameConfig) {
        if let Some(channels) = self.channels {
            config.channels = channels;
        }
        if let Some(levels) = self.levels {
            config.levels = levels;
        }
        if let Some(lives) = self.lives {
            config.lives = lives;
        }
    }
}

/// Everything the event loop and the renderer share.
#[derive(Debug)]
pub struct App {
    pub session: GameSession,
    pub lamps: LampRow,
    pub keys: KeyLatch,
    /// State whose output is on the lamps right now; the session itself
    /// has already moved on by the time a frame is drawn.
    pub shown: State,
    pub logbook: Option<Logbook>,
    /// Rounds already flushed to the logbook.
    logged: usize,
}

impl App {
    pub fn new(session: GameSession, log_rounds: bool) -> Self {
        Self {
            lamps: LampRow::new(session.config.channels),
            keys: KeyLatch::new(),
            shown: State::Idle,
            logbook: log_rounds.then(Logbook::default_location).flatten(),
            logged: session.history.len(),
            session,
        }
    }

    /// One state visit: remembers which state produced the frame, flushes
    /// freshly judged rounds to the logbook, and returns the wait the
    /// session asked for.
    pub fn advance(&mut self) -> Duration {
        let visited = self.session.state;
        let wait = self.session.tick(&mut self.lamps, &mut self.keys);
        self.shown = visited;
        self.flush_rounds();
        wait
    }

    fn flush_rounds(&mut self) {
        let fresh = &self.session.history[self.logged..];
        if fresh.is_empty() {
            return;
        }
        if let Some(logbook) = &self.logbook {
            // best effort: a full disk should not stop the game
            let _ = logbook.append(fresh);
        }
        self.logged = self.session.history.len();
    }

    /// Routes one key event; returns true when the player wants out.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => return true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Char(c) => match c.to_digit(10) {
                Some(digit) if (1..=self.session.config.channels).contains(&(digit as usize)) => {
                    self.keys.press(digit as usize - 1);
                }
                // any key arms the idle screen
                _ if self.session.is_idle() => self.keys.press(0),
                _ => {}
            },
            _ if self.session.is_idle() => self.keys.press(0),
            _ => {}
        }
        false
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let mut config = store.load();
    cli.apply(&mut config);
    if let Err(err) = config.validate() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::ValueValidation, err).exit();
    }

    let session = GameSession::new(config)?.with_seed(cli.seed.unwrap_or(0));
    let mut app = App::new(session, !cli.no_log);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    run_board(&mut terminal, &mut app)?;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    Ok(())
}

/// Drives the session loop: each tick tells us how long the board shows
/// its current output, and that wait doubles as the key-event deadline.
fn run_board<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let panel_events = get_panel_events();

    loop {
        let wait = app.advance();
        if wait.is_zero() {
            // setup and draw states pass through without a frame
            continue;
        }
        terminal.draw(|f| ui(app, f))?;

        let deadline = Instant::now() + wait;
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() {
                break;
            }
            match panel_events.recv_timeout(left) {
                Ok(PanelEvent::Key(key)) => {
                    if app.handle_key(key) {
                        return Ok(());
                    }
                }
                Ok(PanelEvent::Resize) => {
                    terminal.draw(|f| ui(app, f))?;
                }
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => return Ok(()),
            }
        }
    }
}

#[derive(Clone, Debug)]
enum PanelEvent {
    Key(KeyEvent),
    Resize,
}

fn get_panel_events() -> mpsc::Receiver<PanelEvent> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || loop {
        let evt = match event::read() {
            Ok(Event::Key(key)) => Some(PanelEvent::Key(key)),
            Ok(Event::Resize(_, _)) => Some(PanelEvent::Resize),
            Ok(_) => None,
            Err(_) => break,
        };

        if let Some(evt) = evt {
            if tx.send(evt).is_err() {
                break;
            }
        }
    });

    rx
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
