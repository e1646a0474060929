//! Terminal UI for Strictly Hanoi.

mod app;
mod input;
mod ui;

pub use app::{App, Snapshot};
pub use input::{Command, command_for};

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use strictly_hanoi::HighScoreStore;
use tracing::{error, info, instrument};

use crate::HanoiConfig;

/// Redraw interval; also bounds how stale the clock display gets.
const TICK: Duration = Duration::from_millis(100);

/// Runs the interactive game until the user quits.
///
/// Logging should go to a file while this runs; the terminal is in raw
/// mode on the alternate screen.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up or drawn to.
#[instrument(skip_all, fields(disk_count = %config.disk_count()))]
pub async fn run_tui(config: HanoiConfig, store: Box<dyn HighScoreStore>) -> Result<()> {
    info!("Starting Strictly Hanoi TUI");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(*config.disk_count(), config.pace(), store);
    let res = run_app(&mut terminal, &mut app).await;
    app.shutdown().await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    info!("TUI closed");
    res
}

async fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.drain_events();
        app.reap_solver().await;

        let view = app.snapshot().await;
        terminal.draw(|f| ui::draw(f, &view, app.status_message()))?;

        if event::poll(TICK)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && let Some(command) = command_for(key.code)
            && !app.handle_command(command).await
        {
            return Ok(());
        }
    }
}
