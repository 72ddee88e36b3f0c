//! Interactive timer TUI
//!
//! One synchronous event loop multiplexes a 1 Hz tick with key input;
//! the controller sees events strictly one at a time, so its state needs
//! no locking.

pub mod app;
pub mod ui;

use anyhow::Result;
use chrono::Utc;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::time::{Duration, Instant};

use crate::config::TimerConfig;
use crate::session::RunSummary;
use crate::store::{RecordWriter, SessionStore};
use crate::timer::Session;

use app::App;

const TICK_RATE: Duration = Duration::from_secs(1);

/// Run the interactive timer until the user quits. Returns the run
/// summary for the CLI to print.
pub fn run(cfg: TimerConfig, store: SessionStore) -> Result<RunSummary> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let session = Session::new(cfg, Utc::now());
    let mut app = App::new(session, RecordWriter::spawn(store));
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Join the writer thread before surfacing any loop error, so records
    // already queued still reach the database.
    let summary = app.finish(Utc::now());
    result?;
    Ok(summary)
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        let now = Utc::now();
        terminal.draw(|f| ui::draw(f, app, now))?;

        let timeout = TICK_RATE.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.on_key(key, Utc::now()) {
                    return Ok(());
                }
            }
        }

        if last_tick.elapsed() >= TICK_RATE {
            app.on_tick(Utc::now());
            last_tick = Instant::now();
        }
    }
}
