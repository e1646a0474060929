//! Notifications emitted by the controller.
//!
//! Observers are fire-and-forget: the controller logs an observer's error
//! or panic and carries on.

use std::time::Duration;

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::{Disk, DiskCount, GamePhase, HighScoreRecord, Move, TowerState};

/// Discrete game events for audio, logging and persistence hooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new game started.
    GameStarted {
        /// Disks in play.
        disk_count: DiskCount,
    },
    /// A disk moved, by the player or the solver.
    MoveApplied {
        /// The accepted move.
        action: Move,
        /// The disk that moved.
        disk: Disk,
        /// Move count after this move.
        move_count: u32,
    },
    /// Play was paused.
    GamePaused,
    /// Play resumed after a pause.
    GameResumed,
    /// The game returned to idle.
    GameReset,
    /// The player moved every disk onto the target peg.
    GameCompleted {
        /// Disks in play.
        disk_count: DiskCount,
        /// Moves taken.
        moves: u32,
        /// Optimal move count.
        min_moves: u32,
        /// Play time, excluding pauses.
        elapsed: Duration,
        /// Score awarded.
        score: u32,
    },
    /// A completed game beat the stored best record.
    NewHighScore {
        /// Disks in play.
        disk_count: DiskCount,
        /// The new best record.
        record: HighScoreRecord,
    },
    /// The solver began replaying the optimal solution.
    SolutionStarted {
        /// Disks in play.
        disk_count: DiskCount,
    },
    /// The solver applied every move.
    SolutionFinished {
        /// Moves applied.
        moves: u32,
    },
    /// The solution run stopped before finishing.
    SolutionCancelled {
        /// Moves applied before cancellation.
        moves_applied: u32,
    },
}

/// Failure reported by an observer. Logged, never propagated.
#[derive(Debug, Clone, Display, Error)]
#[display("Observer error: {}", message)]
pub struct ObserverError {
    /// Error message.
    pub message: String,
}

impl ObserverError {
    /// Creates a new observer error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Receives controller notifications.
///
/// Implemented by renderers, audio players and loggers.
pub trait GameObserver: Send {
    /// Called after every accepted move and state transition.
    ///
    /// # Errors
    ///
    /// Any error is logged by the controller and otherwise ignored.
    fn on_state_changed(&self, tower: &TowerState, phase: GamePhase) -> Result<(), ObserverError> {
        let _ = (tower, phase);
        Ok(())
    }

    /// Called for each discrete event.
    ///
    /// # Errors
    ///
    /// Any error is logged by the controller and otherwise ignored.
    fn on_event(&self, event: &GameEvent) -> Result<(), ObserverError>;
}

impl GameObserver for mpsc::UnboundedSender<GameEvent> {
    fn on_event(&self, event: &GameEvent) -> Result<(), ObserverError> {
        self.send(event.clone())
            .map_err(|e| ObserverError::new(format!("Event receiver dropped: {}", e)))
    }
}
