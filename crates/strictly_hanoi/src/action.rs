//! First-class move type.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::Peg;

/// Transfer of the top disk of one peg onto another.
///
/// A move carries no history; whether it is legal depends only on the
/// tower it is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// Peg the disk is taken from.
    pub from: Peg,
    /// Peg the disk is placed on.
    pub to: Peg,
}

impl Move {
    /// Creates a new move.
    #[instrument]
    pub fn new(from: Peg, to: Peg) -> Self {
        Self { from, to }
    }

    /// Builds a move from zero-based peg indices.
    ///
    /// Returns `None` if either index is not a peg.
    #[instrument]
    pub fn from_indices(from: usize, to: usize) -> Option<Self> {
        Some(Self::new(Peg::from_index(from)?, Peg::from_index(to)?))
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.from.index(), self.to.index())
    }
}
