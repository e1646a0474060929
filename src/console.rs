//! Headless commands: replay the solution and list best records.

use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use strictly_hanoi::{
    DiskCount, GameController, GameEvent, GameObserver, HighScoreStore, MemoryHighScores,
    ObserverError, SolutionOutcome, format_elapsed, play_solution, standings,
};
use tracing::{info, instrument, warn};

/// How the solve command prints moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One readable line per move.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Prints solver events to a writer as they arrive.
pub struct MovePrinter<W: Write + Send> {
    out: Mutex<W>,
    format: OutputFormat,
}

impl<W: Write + Send> MovePrinter<W> {
    /// Creates a printer writing to `out`.
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out: Mutex::new(out),
            format,
        }
    }

    /// Returns the writer.
    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn render(&self, event: &GameEvent) -> Result<Option<String>, ObserverError> {
        match self.format {
            OutputFormat::Json => serde_json::to_string(event)
                .map(Some)
                .map_err(|e| ObserverError::new(format!("Failed to encode event: {}", e))),
            OutputFormat::Text => Ok(match event {
                GameEvent::SolutionStarted { disk_count } => Some(format!(
                    "Solving {} disks in {} moves",
                    disk_count,
                    disk_count.min_moves()
                )),
                GameEvent::MoveApplied {
                    action,
                    disk,
                    move_count,
                } => Some(format!(
                    "{:>5}: disk {:>2}  peg {} -> peg {}",
                    move_count,
                    disk.size(),
                    action.from.label(),
                    action.to.label()
                )),
                GameEvent::SolutionFinished { moves } => Some(format!("Solved in {} moves", moves)),
                GameEvent::SolutionCancelled { moves_applied } => {
                    Some(format!("Cancelled after {} moves", moves_applied))
                }
                _ => None,
            }),
        }
    }
}

impl<W: Write + Send> GameObserver for MovePrinter<W> {
    fn on_event(&self, event: &GameEvent) -> Result<(), ObserverError> {
        let Some(line) = self.render(event)? else {
            return Ok(());
        };
        let mut out = self
            .out
            .lock()
            .map_err(|_| ObserverError::new("Output writer poisoned"))?;
        writeln!(out, "{}", line)
            .and_then(|()| out.flush())
            .map_err(|e| ObserverError::new(format!("Failed to write move: {}", e)))
    }
}

/// Replays the optimal solution on stdout, one move per `pace`.
///
/// Ctrl-C cancels the run between moves.
///
/// # Errors
///
/// Returns an error if the solver task fails.
#[instrument]
pub async fn run_solve(
    disk_count: DiskCount,
    pace: Duration,
    format: OutputFormat,
) -> Result<SolutionOutcome> {
    let mut game = GameController::with_disk_count(disk_count, Box::new(MemoryHighScores::new()));
    game.add_observer(Box::new(MovePrinter::new(std::io::stdout(), format)));
    let game = game.into_shared();

    let mut solver = tokio::spawn(play_solution(game.clone(), pace));
    let outcome = tokio::select! {
        joined = &mut solver => joined?,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, cancelling solution");
            game.lock().await.cancel_solution();
            solver.await?
        }
    };

    info!(?outcome, "Solve finished");
    Ok(outcome)
}

/// Renders the best-record table, one line per supported disk count.
#[instrument(skip(store))]
pub fn format_standings(store: &dyn HighScoreStore) -> String {
    let mut table = String::from("Disks  Optimal  Best moves  Best time\n");
    for (count, record) in standings(store) {
        let line = match record {
            Some(record) => format!(
                "{:>5}  {:>7}  {:>10}  {:>9}\n",
                count.get(),
                count.min_moves(),
                record.moves(),
                format_elapsed(Duration::from_secs(record.seconds()))
            ),
            None => format!(
                "{:>5}  {:>7}  {:>10}  {:>9}\n",
                count.get(),
                count.min_moves(),
                "-",
                "-"
            ),
        };
        table.push_str(&line);
    }
    table
}

/// Prints the best-record table to stdout.
#[instrument(skip(store))]
pub fn print_standings(store: &dyn HighScoreStore) {
    let table = format_standings(store);
    if let Err(e) = std::io::stdout().write_all(table.as_bytes()) {
        warn!(error = %e, "Failed to print standings");
    }
}
