//! Core domain types for the Tower of Hanoi.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::instrument;

/// A disk, identified by its size.
///
/// Size 1 is the smallest disk. Sizes are unique within a tower, so two
/// disks never compare equal unless they are the same disk.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
#[display("{}", _0)]
pub struct Disk(u8);

impl Disk {
    /// Creates a disk of the given size.
    pub fn new(size: u8) -> Self {
        Self(size)
    }

    /// Returns the disk size.
    pub fn size(self) -> u8 {
        self.0
    }
}

/// One of the three pegs.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::Display,
)]
pub enum Peg {
    /// Peg 0, where every game starts.
    Left,
    /// Peg 1.
    Middle,
    /// Peg 2, where every game must finish.
    Right,
}

impl Peg {
    /// Peg holding the full stack after initialization.
    pub const SOURCE: Peg = Peg::Left;
    /// Peg the player must move the full stack onto.
    pub const TARGET: Peg = Peg::Right;
    /// Peg left over for intermediate moves.
    pub const AUXILIARY: Peg = Peg::Middle;

    /// Returns the zero-based peg index.
    pub fn index(self) -> usize {
        match self {
            Peg::Left => 0,
            Peg::Middle => 1,
            Peg::Right => 2,
        }
    }

    /// Returns the peg at a zero-based index, if one exists.
    #[instrument]
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Peg::Left),
            1 => Some(Peg::Middle),
            2 => Some(Peg::Right),
            _ => None,
        }
    }

    /// One-based label used by front ends ("1", "2", "3").
    pub fn label(self) -> &'static str {
        match self {
            Peg::Left => "1",
            Peg::Middle => "2",
            Peg::Right => "3",
        }
    }

    /// Iterates all pegs from left to right.
    pub fn all() -> impl Iterator<Item = Peg> {
        Peg::iter()
    }
}

/// Number of disks in a game, restricted to the supported difficulties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display)]
#[serde(try_from = "u8", into = "u8")]
#[display("{}", _0)]
pub struct DiskCount(u8);

impl DiskCount {
    /// Fewest disks a game may use.
    pub const MIN: u8 = 3;
    /// Most disks a game may use.
    pub const MAX: u8 = 12;

    /// Validates a disk count.
    ///
    /// # Errors
    ///
    /// Returns [`DiskCountError`] when `n` is outside `3..=12`.
    #[instrument]
    pub fn new(n: u8) -> Result<Self, DiskCountError> {
        if (Self::MIN..=Self::MAX).contains(&n) {
            Ok(Self(n))
        } else {
            Err(DiskCountError { value: n })
        }
    }

    /// Returns the raw disk count.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Optimal number of moves for this many disks, `2^n - 1`.
    pub fn min_moves(self) -> u32 {
        (1u32 << self.0) - 1
    }

    /// Next larger disk count, if supported.
    pub fn increment(self) -> Option<Self> {
        Self::new(self.0 + 1).ok()
    }

    /// Next smaller disk count, if supported.
    pub fn decrement(self) -> Option<Self> {
        Self::new(self.0 - 1).ok()
    }

    /// Iterates every supported disk count in ascending order.
    pub fn all() -> impl Iterator<Item = DiskCount> {
        (Self::MIN..=Self::MAX).map(DiskCount)
    }
}

impl Default for DiskCount {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl TryFrom<u8> for DiskCount {
    type Error = DiskCountError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DiskCount> for u8 {
    fn from(count: DiskCount) -> Self {
        count.0
    }
}

/// A disk count outside the supported range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display(
    "Disk count {} is outside the supported range {}..={}",
    value,
    DiskCount::MIN,
    DiskCount::MAX
)]
pub struct DiskCountError {
    /// The rejected value.
    pub value: u8,
}

/// Mode of the game state machine.
///
/// Exactly one phase is active at a time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display,
)]
pub enum GamePhase {
    /// No game running. Disk count may be changed.
    #[default]
    #[strum(to_string = "idle")]
    Idle,
    /// The player is moving disks and the clock runs.
    #[strum(to_string = "playing")]
    Playing,
    /// Play suspended; the clock is stopped and moves are rejected.
    #[strum(to_string = "paused")]
    Paused,
    /// The solver is replaying the optimal solution.
    #[strum(to_string = "showing solution")]
    ShowingSolution,
    /// The player moved every disk onto the target peg.
    #[strum(to_string = "completed")]
    Completed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disk_count_bounds() {
        assert!(DiskCount::new(2).is_err());
        assert!(DiskCount::new(3).is_ok());
        assert!(DiskCount::new(12).is_ok());
        assert_eq!(DiskCount::new(13), Err(DiskCountError { value: 13 }));
    }

    #[test]
    fn test_min_moves() {
        assert_eq!(DiskCount::new(3).unwrap().min_moves(), 7);
        assert_eq!(DiskCount::new(12).unwrap().min_moves(), 4095);
    }

    #[test]
    fn test_increment_stops_at_bounds() {
        let max = DiskCount::new(DiskCount::MAX).unwrap();
        assert_eq!(max.increment(), None);
        assert_eq!(DiskCount::default().decrement(), None);
        assert_eq!(DiskCount::default().increment().map(DiskCount::get), Some(4));
    }

    #[test]
    fn test_all_disk_counts() {
        let counts: Vec<u8> = DiskCount::all().map(DiskCount::get).collect();
        assert_eq!(counts, (3..=12).collect::<Vec<_>>());
    }

    #[test]
    fn test_peg_index_round_trip() {
        for peg in Peg::all() {
            assert_eq!(Peg::from_index(peg.index()), Some(peg));
        }
        assert_eq!(Peg::from_index(3), None);
    }
}
