//! Optimal solution generator and its paced, cancellable driver.
//!
//! [`SolutionMoves`] is pure: it yields the canonical move sequence lazily
//! and touches nothing. [`play_solution`] feeds those moves through the
//! controller one at a time, pausing between them so a renderer can show
//! each move.

use std::iter::FusedIterator;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use crate::{DiskCount, Move, Peg, SharedGame, SolverStep};

/// Delay between solver moves unless configured otherwise.
pub const DEFAULT_PACE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy)]
enum Frame {
    Solve { disks: u8, from: Peg, to: Peg, via: Peg },
    Emit(Move),
}

/// Lazy iterator over the optimal move sequence.
///
/// Moving `n` disks from `from` to `to` moves `n - 1` disks onto `via`,
/// the largest disk onto `to`, then the `n - 1` disks from `via` onto `to`.
/// An explicit frame stack replaces recursion, so memory is `O(n)`.
#[derive(Debug, Clone)]
pub struct SolutionMoves {
    frames: Vec<Frame>,
    remaining: u64,
}

impl SolutionMoves {
    /// Moves that carry `disks` disks from `from` to `to` using `via`.
    ///
    /// Yields exactly `2^disks - 1` moves.
    #[instrument]
    pub fn new(disks: u8, from: Peg, to: Peg, via: Peg) -> Self {
        let frames = if disks == 0 {
            Vec::new()
        } else {
            vec![Frame::Solve {
                disks,
                from,
                to,
                via,
            }]
        };
        let remaining = 1u64.checked_shl(u32::from(disks)).map_or(u64::MAX, |n| n - 1);
        Self { frames, remaining }
    }

    /// Moves solving a freshly initialized game of `disk_count` disks.
    pub fn for_game(disk_count: DiskCount) -> Self {
        Self::new(disk_count.get(), Peg::SOURCE, Peg::TARGET, Peg::AUXILIARY)
    }
}

impl Iterator for SolutionMoves {
    type Item = Move;

    fn next(&mut self) -> Option<Move> {
        while let Some(frame) = self.frames.pop() {
            match frame {
                Frame::Emit(action) => {
                    self.remaining -= 1;
                    return Some(action);
                }
                Frame::Solve {
                    disks: 1, from, to, ..
                } => {
                    self.remaining -= 1;
                    return Some(Move::new(from, to));
                }
                Frame::Solve {
                    disks,
                    from,
                    to,
                    via,
                } => {
                    // Pushed in reverse: the top frame runs first.
                    self.frames.push(Frame::Solve {
                        disks: disks - 1,
                        from: via,
                        to,
                        via: from,
                    });
                    self.frames.push(Frame::Emit(Move::new(from, to)));
                    self.frames.push(Frame::Solve {
                        disks: disks - 1,
                        from,
                        to: via,
                        via: to,
                    });
                }
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.remaining).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SolutionMoves {}

impl FusedIterator for SolutionMoves {}

/// How a solution run ended. Cancellation is an expected outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionOutcome {
    /// Every move was applied.
    Completed {
        /// Moves applied.
        moves: u32,
    },
    /// The run stopped early; applied moves stay on the board.
    Cancelled {
        /// Moves applied before stopping.
        moves_applied: u32,
    },
}

/// Shows the optimal solution on a shared game, one move per `pace`.
///
/// Restacks the board, then applies each generated move through the
/// controller. Cancellation is checked before every move and again after
/// every pause; the pause itself ends early when the controller cancels
/// the run. The lock is never held while waiting.
#[instrument(skip(game))]
pub async fn play_solution(game: SharedGame, pace: Duration) -> SolutionOutcome {
    let Some(mut ticket) = game.lock().await.begin_solution() else {
        debug!("Solution already running");
        return SolutionOutcome::Cancelled { moves_applied: 0 };
    };
    info!(run_id = ticket.run_id(), disk_count = %ticket.disk_count(), "Playing solution");

    let mut applied = 0u32;
    for action in SolutionMoves::for_game(ticket.disk_count()) {
        let step = game.lock().await.apply_solution_move(&ticket, action);
        match step {
            SolverStep::Applied => applied += 1,
            SolverStep::Cancelled => {
                return SolutionOutcome::Cancelled {
                    moves_applied: applied,
                };
            }
            SolverStep::Rejected => {
                warn!(%action, "Abandoning solution after rejected move");
                game.lock().await.cancel_solution();
                return SolutionOutcome::Cancelled {
                    moves_applied: applied,
                };
            }
        }

        tokio::select! {
            () = tokio::time::sleep(pace) => {}
            () = ticket.cancelled() => {}
        }

        if !game.lock().await.is_solution_current(&ticket) {
            debug!(applied, "Solution cancelled during pause");
            return SolutionOutcome::Cancelled {
                moves_applied: applied,
            };
        }
    }

    game.lock().await.finish_solution(&ticket);
    SolutionOutcome::Completed { moves: applied }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_disk_sequence() {
        let moves: Vec<(usize, usize)> = SolutionMoves::new(3, Peg::Left, Peg::Right, Peg::Middle)
            .map(|m| (m.from.index(), m.to.index()))
            .collect();
        assert_eq!(
            moves,
            vec![(0, 2), (0, 1), (2, 1), (0, 2), (1, 0), (1, 2), (0, 2)]
        );
    }

    #[test]
    fn test_exact_length() {
        for n in 0..=12u8 {
            let moves = SolutionMoves::new(n, Peg::Left, Peg::Right, Peg::Middle);
            let expected = (1usize << n) - 1;
            assert_eq!(moves.len(), expected);
            assert_eq!(moves.count(), expected);
        }
    }

    #[test]
    fn test_single_disk() {
        let moves: Vec<Move> = SolutionMoves::new(1, Peg::Middle, Peg::Left, Peg::Right).collect();
        assert_eq!(moves, vec![Move::new(Peg::Middle, Peg::Left)]);
    }

    #[test]
    fn test_len_tracks_progress() {
        let mut moves = SolutionMoves::for_game(DiskCount::new(4).unwrap());
        assert_eq!(moves.len(), 15);
        moves.next();
        moves.next();
        assert_eq!(moves.len(), 13);
    }
}
