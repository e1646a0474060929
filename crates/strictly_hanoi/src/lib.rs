//! Strictly Hanoi - Tower of Hanoi puzzle engine.
//!
//! # Architecture
//!
//! - **Tower**: three pegs of strictly ordered disks ([`TowerState`])
//! - **Rules**: the single legality rule ([`check_move`], [`is_legal`])
//! - **Scoring**: score for a completed game ([`score`])
//! - **Solver**: lazy optimal moves ([`SolutionMoves`]) and a paced,
//!   cancellable driver ([`play_solution`])
//! - **Controller**: the game state machine ([`GameController`])
//!
//! Rendering, input, audio and storage live outside this crate and talk to
//! it through [`GameObserver`] and [`HighScoreStore`].
//!
//! # Example
//!
//! ```
//! use strictly_hanoi::{DiskCount, GameController, GamePhase, MemoryHighScores, SolutionMoves};
//!
//! let disks = DiskCount::new(3).unwrap();
//! let mut game = GameController::new(Box::new(MemoryHighScores::new()));
//! game.start(disks);
//! for action in SolutionMoves::for_game(disks) {
//!     game.request_move(action.from, action.to);
//! }
//! assert_eq!(game.phase(), GamePhase::Completed);
//! assert_eq!(game.move_count(), disks.min_moves());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod clock;
mod controller;
mod events;
mod high_score;
pub mod invariants;
mod rules;
mod scoring;
mod solver;
mod tower;
mod types;

pub use action::Move;
pub use clock::SessionClock;
pub use controller::{GameController, SharedGame, SolutionTicket, SolverStep};
pub use events::{GameEvent, GameObserver, ObserverError};
pub use high_score::{
    HighScoreRecord, HighScoreStore, MemoryHighScores, StoreError, offer_record, standings,
};
pub use rules::{IllegalMove, check_move, is_legal, legal_moves};
pub use scoring::{BASE_SCORE, MIN_SCORE, format_elapsed, score};
pub use solver::{DEFAULT_PACE, SolutionMoves, SolutionOutcome, play_solution};
pub use tower::{EmptyPegError, TowerState};
pub use types::{Disk, DiskCount, DiskCountError, GamePhase, Peg};
