//! Game state machine.
//!
//! `GameController` owns the tower, the session counters and the clock.
//! Every command checks the current [`GamePhase`] first; commands that make
//! no sense in that phase are silent no-ops that return `false`.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tracing::{debug, error, info, instrument, warn};

use crate::invariants::assert_tower_invariants;
use crate::{
    Disk, DiskCount, GameEvent, GameObserver, GamePhase, HighScoreRecord, HighScoreStore, Move,
    Peg, TowerState, check_move, offer_record, score, standings,
};

/// A controller shared between a front end and the solver task.
///
/// All tower and phase mutations happen behind this one lock.
pub type SharedGame = Arc<Mutex<GameController>>;

/// Result of applying one solver move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStep {
    /// The move was applied.
    Applied,
    /// The move broke the rules and was not applied.
    Rejected,
    /// The solution run is no longer active; nothing was applied.
    Cancelled,
}

/// Handle to one solution run, returned by [`GameController::begin_solution`].
#[derive(Debug)]
pub struct SolutionTicket {
    run_id: u64,
    disk_count: DiskCount,
    cancelled: watch::Receiver<bool>,
}

impl SolutionTicket {
    /// Identifier of the run.
    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    /// Disks being solved.
    pub fn disk_count(&self) -> DiskCount {
        self.disk_count
    }

    /// Resolves once the run is cancelled or ended by the controller.
    pub async fn cancelled(&mut self) {
        // Err means the controller dropped the run, which also ends it.
        let _ = self.cancelled.wait_for(|cancelled| *cancelled).await;
    }
}

#[derive(Debug)]
struct ActiveSolution {
    run_id: u64,
    cancel: watch::Sender<bool>,
}

/// Tower of Hanoi session and state machine.
pub struct GameController {
    disk_count: DiskCount,
    tower: TowerState,
    phase: GamePhase,
    move_count: u32,
    clock: crate::SessionClock,
    selected: Option<Peg>,
    solution: Option<ActiveSolution>,
    next_run_id: u64,
    store: Box<dyn HighScoreStore>,
    observers: Vec<Box<dyn GameObserver>>,
}

impl std::fmt::Debug for GameController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameController")
            .field("disk_count", &self.disk_count)
            .field("tower", &self.tower)
            .field("phase", &self.phase)
            .field("move_count", &self.move_count)
            .field("selected", &self.selected)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl GameController {
    /// Creates an idle controller with the default disk count.
    #[instrument(skip(store))]
    pub fn new(store: Box<dyn HighScoreStore>) -> Self {
        Self::with_disk_count(DiskCount::default(), store)
    }

    /// Creates an idle controller for a disk count.
    #[instrument(skip(store))]
    pub fn with_disk_count(disk_count: DiskCount, store: Box<dyn HighScoreStore>) -> Self {
        info!(%disk_count, "Creating game controller");
        Self {
            disk_count,
            tower: TowerState::new(disk_count),
            phase: GamePhase::Idle,
            move_count: 0,
            clock: crate::SessionClock::new(),
            selected: None,
            solution: None,
            next_run_id: 0,
            store,
            observers: Vec::new(),
        }
    }

    /// Registers an observer for state changes and events.
    pub fn add_observer(&mut self, observer: Box<dyn GameObserver>) {
        self.observers.push(observer);
    }

    /// Wraps the controller for sharing with a solver task.
    pub fn into_shared(self) -> SharedGame {
        Arc::new(Mutex::new(self))
    }

    /// Current phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Current tower.
    pub fn tower(&self) -> &TowerState {
        &self.tower
    }

    /// Disks in the current or next game.
    pub fn disk_count(&self) -> DiskCount {
        self.disk_count
    }

    /// Moves accepted since the board was last reset.
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Optimal move count for the current disk count.
    pub fn min_moves(&self) -> u32 {
        self.disk_count.min_moves()
    }

    /// Play time so far, excluding pauses.
    pub fn elapsed(&self) -> Duration {
        self.clock.elapsed()
    }

    /// Peg picked by the first half of a two-step move.
    pub fn selected_peg(&self) -> Option<Peg> {
        self.selected
    }

    /// Stored best record for a disk count. Store failures read as absent.
    #[instrument(skip(self))]
    pub fn best_record(&self, disk_count: DiskCount) -> Option<HighScoreRecord> {
        self.store.load_best(disk_count).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load best record");
            None
        })
    }

    /// Best records for every supported disk count.
    pub fn high_scores(&self) -> Vec<(DiskCount, Option<HighScoreRecord>)> {
        standings(self.store.as_ref())
    }

    /// Changes the disk count. Only allowed while idle.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn set_disk_count(&mut self, disk_count: DiskCount) -> bool {
        if self.phase != GamePhase::Idle {
            debug!("Disk count can only change while idle");
            return false;
        }
        self.disk_count = disk_count;
        self.clear_board();
        info!(%disk_count, min_moves = self.min_moves(), "Disk count changed");
        self.notify_state_changed();
        true
    }

    /// Starts a game with `disk_count` disks. Only allowed while idle.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn start(&mut self, disk_count: DiskCount) -> bool {
        if self.phase != GamePhase::Idle {
            debug!("Start ignored outside idle");
            return false;
        }
        self.disk_count = disk_count;
        self.clear_board();
        self.clock.start();
        self.phase = GamePhase::Playing;
        info!(%disk_count, "Game started");
        self.emit(GameEvent::GameStarted { disk_count });
        self.notify_state_changed();
        true
    }

    /// Moves the top disk of `from` onto `to` if the move is legal.
    ///
    /// Returns whether the move was applied. Completes the game when the
    /// last disk arrives on the target peg.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn request_move(&mut self, from: Peg, to: Peg) -> bool {
        if self.phase != GamePhase::Playing {
            debug!("Move ignored outside play");
            return false;
        }
        if self.apply_move(Move::new(from, to)).is_none() {
            return false;
        }
        if self.tower.is_solved(Peg::TARGET, self.disk_count) {
            self.complete();
        }
        true
    }

    /// Two-step move input.
    ///
    /// With nothing selected, selects `peg` if it holds a disk. With a peg
    /// selected, requests a move onto `peg` and clears the selection
    /// whether or not the move was legal. Returns whether the selection
    /// was made or the move applied.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn select_peg(&mut self, peg: Peg) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        match self.selected.take() {
            None if self.tower.height(peg) > 0 => {
                self.selected = Some(peg);
                self.notify_state_changed();
                true
            }
            None => false,
            Some(from) => {
                let applied = self.request_move(from, peg);
                if !applied {
                    self.notify_state_changed();
                }
                applied
            }
        }
    }

    /// Suspends play and the clock.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn pause(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.clock.pause();
        self.selected = None;
        self.phase = GamePhase::Paused;
        info!(elapsed = ?self.clock.elapsed(), "Game paused");
        self.emit(GameEvent::GamePaused);
        self.notify_state_changed();
        true
    }

    /// Resumes a paused game.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn resume(&mut self) -> bool {
        if self.phase != GamePhase::Paused {
            return false;
        }
        self.clock.resume();
        self.phase = GamePhase::Playing;
        info!("Game resumed");
        self.emit(GameEvent::GameResumed);
        self.notify_state_changed();
        true
    }

    /// Returns to idle from any phase.
    ///
    /// Cancels a running solution, stops the clock, restacks the board and
    /// clears the selection.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn reset(&mut self) {
        self.cancel_active_solution();
        self.clock.reset();
        self.clear_board();
        self.phase = GamePhase::Idle;
        info!("Game reset");
        self.emit(GameEvent::GameReset);
        self.notify_state_changed();
    }

    /// Stops the solution being shown and returns to idle.
    ///
    /// Moves already applied stay on the board.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn cancel_solution(&mut self) -> bool {
        if self.phase != GamePhase::ShowingSolution {
            return false;
        }
        self.cancel_active_solution();
        self.phase = GamePhase::Idle;
        self.notify_state_changed();
        true
    }

    /// Enters the solution phase and restacks the board.
    ///
    /// Returns `None` if a solution is already being shown.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn begin_solution(&mut self) -> Option<SolutionTicket> {
        if self.phase == GamePhase::ShowingSolution {
            debug!("Solution already being shown");
            return None;
        }
        self.clock.reset();
        self.clear_board();

        self.next_run_id += 1;
        let (cancel, cancelled) = watch::channel(false);
        self.solution = Some(ActiveSolution {
            run_id: self.next_run_id,
            cancel,
        });
        self.phase = GamePhase::ShowingSolution;

        info!(run_id = self.next_run_id, disk_count = %self.disk_count, "Solution started");
        self.emit(GameEvent::SolutionStarted {
            disk_count: self.disk_count,
        });
        self.notify_state_changed();

        Some(SolutionTicket {
            run_id: self.next_run_id,
            disk_count: self.disk_count,
            cancelled,
        })
    }

    /// True while `ticket` belongs to the solution being shown.
    pub fn is_solution_current(&self, ticket: &SolutionTicket) -> bool {
        self.phase == GamePhase::ShowingSolution
            && self
                .solution
                .as_ref()
                .is_some_and(|active| active.run_id == ticket.run_id)
    }

    /// Applies one solver move through the same path as player moves.
    #[instrument(skip(self, ticket), fields(run_id = ticket.run_id))]
    pub fn apply_solution_move(&mut self, ticket: &SolutionTicket, action: Move) -> SolverStep {
        if !self.is_solution_current(ticket) {
            debug!("Solution no longer current");
            return SolverStep::Cancelled;
        }
        match self.apply_move(action) {
            Some(_) => SolverStep::Applied,
            None => {
                error!(%action, "Solver produced an illegal move");
                SolverStep::Rejected
            }
        }
    }

    /// Ends a solution run that applied every move, returning to idle.
    #[instrument(skip(self, ticket), fields(run_id = ticket.run_id))]
    pub fn finish_solution(&mut self, ticket: &SolutionTicket) -> bool {
        if !self.is_solution_current(ticket) {
            return false;
        }
        self.solution = None;
        self.phase = GamePhase::Idle;
        info!(moves = self.move_count, "Solution finished");
        self.emit(GameEvent::SolutionFinished {
            moves: self.move_count,
        });
        self.notify_state_changed();
        true
    }

    fn clear_board(&mut self) {
        self.tower.initialize(self.disk_count);
        self.move_count = 0;
        self.selected = None;
    }

    fn cancel_active_solution(&mut self) {
        if let Some(active) = self.solution.take() {
            active.cancel.send_replace(true);
            info!(run_id = active.run_id, moves_applied = self.move_count, "Solution cancelled");
            self.emit(GameEvent::SolutionCancelled {
                moves_applied: self.move_count,
            });
        }
    }

    /// Validates and applies a move. The only path that mutates the tower.
    fn apply_move(&mut self, action: Move) -> Option<Disk> {
        if let Err(reason) = check_move(&self.tower, action) {
            debug!(%action, %reason, "Move rejected");
            return None;
        }
        let disk = match self.tower.remove(action.from) {
            Ok(disk) => disk,
            Err(e) => {
                error!(%action, error = %e, "Validated move found an empty source peg");
                if cfg!(debug_assertions) {
                    panic!("Tower invariant violated: {e}");
                }
                return None;
            }
        };
        self.tower.place(action.to, disk);
        self.move_count += 1;
        assert_tower_invariants(&self.tower);

        debug!(%action, %disk, move_count = self.move_count, "Move applied");
        self.emit(GameEvent::MoveApplied {
            action,
            disk,
            move_count: self.move_count,
        });
        self.notify_state_changed();
        Some(disk)
    }

    fn complete(&mut self) {
        self.clock.pause();
        self.selected = None;
        self.phase = GamePhase::Completed;

        let elapsed = self.clock.elapsed();
        let min_moves = self.min_moves();
        let awarded = score(self.move_count, min_moves, elapsed.as_secs());
        info!(
            moves = self.move_count,
            min_moves,
            elapsed = ?elapsed,
            score = awarded,
            "Game completed"
        );
        self.emit(GameEvent::GameCompleted {
            disk_count: self.disk_count,
            moves: self.move_count,
            min_moves,
            elapsed,
            score: awarded,
        });

        let record = HighScoreRecord::new(self.move_count, elapsed.as_secs());
        match offer_record(self.store.as_ref(), self.disk_count, record) {
            Ok(true) => self.emit(GameEvent::NewHighScore {
                disk_count: self.disk_count,
                record,
            }),
            Ok(false) => {}
            Err(e) => warn!(error = %e, "Failed to record high score"),
        }
        self.notify_state_changed();
    }

    fn emit(&self, event: GameEvent) {
        for observer in &self.observers {
            match catch_unwind(AssertUnwindSafe(|| observer.on_event(&event))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(error = %e, ?event, "Observer failed to handle event"),
                Err(_) => warn!(?event, "Observer panicked while handling event"),
            }
        }
    }

    fn notify_state_changed(&self) {
        for observer in &self.observers {
            match catch_unwind(AssertUnwindSafe(|| {
                observer.on_state_changed(&self.tower, self.phase)
            })) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(error = %e, "Observer failed to handle state change"),
                Err(_) => warn!("Observer panicked while handling state change"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryHighScores, ObserverError};
    use std::sync::Mutex as StdMutex;

    fn three() -> DiskCount {
        DiskCount::new(3).unwrap()
    }

    fn controller() -> GameController {
        GameController::new(Box::new(MemoryHighScores::new()))
    }

    struct Failing;

    impl GameObserver for Failing {
        fn on_event(&self, _event: &GameEvent) -> Result<(), ObserverError> {
            Err(ObserverError::new("speaker unplugged"))
        }
    }

    struct Panicking;

    impl GameObserver for Panicking {
        fn on_state_changed(&self, _: &TowerState, _: GamePhase) -> Result<(), ObserverError> {
            panic!("renderer crashed");
        }

        fn on_event(&self, _event: &GameEvent) -> Result<(), ObserverError> {
            Ok(())
        }
    }

    #[derive(Default, Clone)]
    struct Phases(Arc<StdMutex<Vec<GamePhase>>>);

    impl GameObserver for Phases {
        fn on_state_changed(&self, _: &TowerState, phase: GamePhase) -> Result<(), ObserverError> {
            self.0.lock().unwrap().push(phase);
            Ok(())
        }

        fn on_event(&self, _event: &GameEvent) -> Result<(), ObserverError> {
            Ok(())
        }
    }

    #[test]
    fn test_moves_rejected_while_idle() {
        let mut game = controller();
        assert!(!game.request_move(Peg::Left, Peg::Right));
        assert_eq!(game.move_count(), 0);
    }

    #[test]
    fn test_illegal_move_is_noop() {
        let mut game = controller();
        game.start(three());
        assert!(game.request_move(Peg::Left, Peg::Right));
        assert!(!game.request_move(Peg::Left, Peg::Right));
        assert!(!game.request_move(Peg::Middle, Peg::Left));
        assert_eq!(game.move_count(), 1);
        assert_eq!(game.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_disk_count_only_changes_while_idle() {
        let mut game = controller();
        let five = DiskCount::new(5).unwrap();
        assert!(game.set_disk_count(five));
        assert_eq!(game.tower().height(Peg::Left), 5);
        assert_eq!(game.min_moves(), 31);

        game.start(five);
        assert!(!game.set_disk_count(three()));
        assert_eq!(game.disk_count(), five);
    }

    #[test]
    fn test_start_only_from_idle() {
        let mut game = controller();
        assert!(game.start(three()));
        assert!(!game.start(three()));
    }

    #[test]
    fn test_two_step_selection() {
        let mut game = controller();
        game.start(three());

        assert!(!game.select_peg(Peg::Middle));
        assert_eq!(game.selected_peg(), None);

        assert!(game.select_peg(Peg::Left));
        assert_eq!(game.selected_peg(), Some(Peg::Left));
        assert!(game.select_peg(Peg::Right));
        assert_eq!(game.selected_peg(), None);
        assert_eq!(game.tower().to_sizes(), [vec![3, 2], vec![], vec![1]]);

        // Illegal second click clears the selection without moving.
        assert!(game.select_peg(Peg::Left));
        assert!(!game.select_peg(Peg::Right));
        assert_eq!(game.selected_peg(), None);
        assert_eq!(game.move_count(), 1);
    }

    #[test]
    fn test_pause_blocks_moves() {
        let mut game = controller();
        game.start(three());
        assert!(game.pause());
        assert!(!game.request_move(Peg::Left, Peg::Right));
        assert!(!game.pause());
        assert!(game.resume());
        assert!(game.request_move(Peg::Left, Peg::Right));
    }

    #[test]
    fn test_reset_from_any_phase() {
        let mut game = controller();
        game.start(three());
        game.request_move(Peg::Left, Peg::Right);
        game.select_peg(Peg::Left);
        game.reset();

        assert_eq!(game.phase(), GamePhase::Idle);
        assert_eq!(game.move_count(), 0);
        assert_eq!(game.selected_peg(), None);
        assert_eq!(game.elapsed(), Duration::ZERO);
        assert_eq!(game.tower().to_sizes(), [vec![3, 2, 1], vec![], vec![]]);
    }

    #[test]
    fn test_begin_solution_restacks_board() {
        let mut game = controller();
        game.start(three());
        game.request_move(Peg::Left, Peg::Middle);

        let ticket = game.begin_solution().unwrap();
        assert_eq!(game.phase(), GamePhase::ShowingSolution);
        assert_eq!(game.move_count(), 0);
        assert!(game.begin_solution().is_none());
        assert!(game.is_solution_current(&ticket));

        assert!(!game.request_move(Peg::Left, Peg::Right));
        assert_eq!(
            game.apply_solution_move(&ticket, Move::new(Peg::Left, Peg::Right)),
            SolverStep::Applied
        );
        assert_eq!(
            game.apply_solution_move(&ticket, Move::new(Peg::Left, Peg::Right)),
            SolverStep::Rejected
        );
    }

    #[test]
    fn test_stale_ticket_is_cancelled() {
        let mut game = controller();
        let ticket = game.begin_solution().unwrap();
        game.apply_solution_move(&ticket, Move::new(Peg::Left, Peg::Right));
        assert!(game.cancel_solution());

        assert_eq!(game.phase(), GamePhase::Idle);
        assert_eq!(
            game.apply_solution_move(&ticket, Move::new(Peg::Left, Peg::Middle)),
            SolverStep::Cancelled
        );
        assert!(!game.finish_solution(&ticket));
        // Applied moves are never rolled back.
        assert_eq!(game.tower().to_sizes(), [vec![3, 2], vec![], vec![1]]);
    }

    #[test]
    fn test_failing_observers_do_not_break_play() {
        let mut game = controller();
        game.add_observer(Box::new(Failing));
        game.add_observer(Box::new(Panicking));
        let phases = Phases::default();
        game.add_observer(Box::new(phases.clone()));

        assert!(game.start(three()));
        assert!(game.request_move(Peg::Left, Peg::Right));
        assert_eq!(game.move_count(), 1);
        assert_eq!(
            *phases.0.lock().unwrap(),
            vec![GamePhase::Playing, GamePhase::Playing]
        );
    }
}
