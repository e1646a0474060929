//! Application state and logic.

use std::time::Duration;

use strictly_hanoi::{
    DiskCount, GameController, GameEvent, GamePhase, HighScoreRecord, HighScoreStore, Peg,
    SharedGame, SolutionOutcome, TowerState, format_elapsed, play_solution,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use super::input::Command;

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Board contents.
    pub tower: TowerState,
    /// Current phase.
    pub phase: GamePhase,
    /// Disks in play.
    pub disk_count: DiskCount,
    /// Moves made so far.
    pub move_count: u32,
    /// Optimal move count.
    pub min_moves: u32,
    /// Play time, excluding pauses.
    pub elapsed: Duration,
    /// Peg picked by the first half of a move.
    pub selected: Option<Peg>,
    /// Stored best record for the disk count.
    pub best: Option<HighScoreRecord>,
}

/// Main application state.
pub struct App {
    game: SharedGame,
    events: mpsc::UnboundedReceiver<GameEvent>,
    pace: Duration,
    solver: Option<JoinHandle<SolutionOutcome>>,
    best: Option<HighScoreRecord>,
    status_message: String,
}

impl App {
    /// Creates the application around a fresh controller.
    pub fn new(disk_count: DiskCount, pace: Duration, store: Box<dyn HighScoreStore>) -> Self {
        let mut controller = GameController::with_disk_count(disk_count, store);
        let (tx, events) = mpsc::unbounded_channel();
        controller.add_observer(Box::new(tx));
        let best = controller.best_record(disk_count);

        Self {
            game: controller.into_shared(),
            events,
            pace,
            solver: None,
            best,
            status_message: "Press Enter to start, s to watch the solution".to_string(),
        }
    }

    /// The shared controller.
    pub fn game(&self) -> &SharedGame {
        &self.game
    }

    /// Gets the current status message.
    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Applies a command. Returns `false` when the user asked to quit.
    #[instrument(skip(self))]
    pub async fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::Quit => {
                info!("User quit");
                return false;
            }
            Command::SelectPeg(peg) => {
                let mut game = self.game.lock().await;
                let had_selection = game.selected_peg().is_some();
                if !game.select_peg(peg) {
                    self.status_message = match (game.phase(), had_selection) {
                        (GamePhase::Playing, true) => "Illegal move".to_string(),
                        (GamePhase::Playing, false) => format!("Peg {} is empty", peg.label()),
                        (phase, _) => format!("No moves while {}", phase),
                    };
                }
            }
            Command::Start => {
                let mut game = self.game.lock().await;
                if game.phase() == GamePhase::Completed {
                    game.reset();
                }
                let disk_count = game.disk_count();
                if !game.start(disk_count) {
                    self.status_message = format!("Can't start while {}", game.phase());
                }
            }
            Command::TogglePause => {
                let mut game = self.game.lock().await;
                if !game.pause() && !game.resume() {
                    self.status_message = "Nothing to pause".to_string();
                }
            }
            Command::ShowSolution => self.show_solution().await,
            Command::CancelSolution => {
                if !self.game.lock().await.cancel_solution() {
                    self.status_message = "No solution running".to_string();
                }
            }
            Command::Reset => self.game.lock().await.reset(),
            Command::MoreDisks => self.change_disks(DiskCount::increment).await,
            Command::FewerDisks => self.change_disks(DiskCount::decrement).await,
        }
        true
    }

    async fn show_solution(&mut self) {
        if self.game.lock().await.phase() == GamePhase::ShowingSolution {
            self.status_message = "Solution already running".to_string();
            return;
        }
        self.reap_solver().await;
        debug!(pace = ?self.pace, "Spawning solution task");
        self.solver = Some(tokio::spawn(play_solution(self.game.clone(), self.pace)));
    }

    async fn change_disks(&mut self, step: fn(DiskCount) -> Option<DiskCount>) {
        let mut game = self.game.lock().await;
        let current = game.disk_count();
        let Some(next) = step(current) else {
            self.status_message = format!(
                "Disk count stays between {} and {}",
                DiskCount::MIN,
                DiskCount::MAX
            );
            return;
        };
        if game.set_disk_count(next) {
            self.best = game.best_record(next);
            self.status_message = format!("{} disks, {} moves minimum", next, next.min_moves());
        } else {
            self.status_message = "Reset before changing the disk count".to_string();
        }
    }

    /// Handles every event queued since the last frame.
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.handle_event(&event);
        }
    }

    /// Updates the status line for a controller event.
    #[instrument(skip(self))]
    pub fn handle_event(&mut self, event: &GameEvent) {
        debug!(?event, "Handling game event");

        match event {
            GameEvent::GameStarted { disk_count } => {
                self.status_message = format!("Move all {} disks to peg 3", disk_count);
            }
            GameEvent::MoveApplied { .. } => {}
            GameEvent::GamePaused => self.status_message = "Paused".to_string(),
            GameEvent::GameResumed => self.status_message = "Resumed".to_string(),
            GameEvent::GameReset => {
                self.status_message = "Press Enter to start, s to watch the solution".to_string();
            }
            GameEvent::GameCompleted {
                moves,
                min_moves,
                elapsed,
                score,
                ..
            } => {
                self.status_message = format!(
                    "Solved in {} moves (best possible {}) and {}. Score {}",
                    moves,
                    min_moves,
                    format_elapsed(*elapsed),
                    score
                );
            }
            GameEvent::NewHighScore { record, .. } => {
                self.best = Some(*record);
                self.status_message.push_str(". New best record!");
            }
            GameEvent::SolutionStarted { disk_count } => {
                self.status_message = format!("Showing the {}-move solution", disk_count.min_moves());
            }
            GameEvent::SolutionFinished { moves } => {
                self.status_message = format!("Solution finished in {} moves", moves);
            }
            GameEvent::SolutionCancelled { moves_applied } => {
                self.status_message = format!("Solution cancelled after {} moves", moves_applied);
            }
        }
    }

    /// Captures the state to render.
    pub async fn snapshot(&self) -> Snapshot {
        let game = self.game.lock().await;
        Snapshot {
            tower: game.tower().clone(),
            phase: game.phase(),
            disk_count: game.disk_count(),
            move_count: game.move_count(),
            min_moves: game.min_moves(),
            elapsed: game.elapsed(),
            selected: game.selected_peg(),
            best: self.best,
        }
    }

    /// Collects a finished solution task, if any.
    pub async fn reap_solver(&mut self) {
        let finished = self.solver.as_ref().is_some_and(|task| task.is_finished());
        if !finished {
            return;
        }
        if let Some(task) = self.solver.take() {
            match task.await {
                Ok(outcome) => debug!(?outcome, "Solution task finished"),
                Err(e) => warn!(error = %e, "Solution task failed"),
            }
        }
    }

    /// Cancels a running solution and waits for its task.
    #[instrument(skip(self))]
    pub async fn shutdown(&mut self) {
        self.game.lock().await.cancel_solution();
        if let Some(task) = self.solver.take()
            && let Err(e) = task.await
        {
            warn!(error = %e, "Solution task failed");
        }
    }
}
