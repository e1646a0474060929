//! The single rule of the game: a disk may only land on a larger disk.
//!
//! Pure functions over [`TowerState`]. Rejections are ordinary play, not
//! faults, so callers treat them as no-ops.

use derive_more::Display;
use tracing::instrument;

use crate::{Disk, Move, Peg, TowerState};

/// Why a move was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum IllegalMove {
    /// Source and destination are the same peg.
    #[display("Source and destination are both peg {}", _0)]
    SamePeg(Peg),

    /// The source peg has no disk to move.
    #[display("Peg {} is empty", _0)]
    EmptySource(Peg),

    /// The moving disk is larger than the destination's top disk.
    #[display("Disk {} cannot rest on smaller disk {}", disk, onto)]
    LargerOntoSmaller {
        /// Disk being moved.
        disk: Disk,
        /// Top disk of the destination peg.
        onto: Disk,
    },
}

/// Checks a move against the tower, returning the rejection reason.
///
/// # Errors
///
/// Returns [`IllegalMove`] describing the first rule the move breaks.
#[instrument(skip(tower))]
pub fn check_move(tower: &TowerState, action: Move) -> Result<(), IllegalMove> {
    if action.from == action.to {
        return Err(IllegalMove::SamePeg(action.from));
    }
    let disk = tower
        .top_of(action.from)
        .ok_or(IllegalMove::EmptySource(action.from))?;
    match tower.top_of(action.to) {
        Some(onto) if onto < disk => Err(IllegalMove::LargerOntoSmaller { disk, onto }),
        _ => Ok(()),
    }
}

/// True iff moving the top disk of `from` onto `to` is legal.
pub fn is_legal(tower: &TowerState, from: Peg, to: Peg) -> bool {
    check_move(tower, Move::new(from, to)).is_ok()
}

/// Every legal move from the current position.
#[instrument(skip(tower))]
pub fn legal_moves(tower: &TowerState) -> Vec<Move> {
    Peg::all()
        .flat_map(|from| Peg::all().map(move |to| Move::new(from, to)))
        .filter(|action| check_move(tower, *action).is_ok())
        .collect()
}
