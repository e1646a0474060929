//! Three-peg stack storage and its mutation primitives.
//!
//! `TowerState` knows nothing about the rules. [`place`](TowerState::place)
//! is unchecked; callers validate moves with [`crate::check_move`] first.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{Disk, DiskCount, Peg};

/// Attempt to remove a disk from an empty peg.
///
/// Only reachable when a caller skips move validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Cannot remove a disk from empty peg {}", peg)]
pub struct EmptyPegError {
    /// The empty peg.
    pub peg: Peg,
}

/// The three pegs and the disks stacked on them.
///
/// Each peg is stored bottom to top: index 0 is the peg floor and the last
/// element is the only disk that may be removed or covered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TowerState {
    disk_count: DiskCount,
    pub(crate) pegs: [Vec<Disk>; 3],
}

impl TowerState {
    /// Creates a tower with every disk on the source peg.
    #[instrument]
    pub fn new(disk_count: DiskCount) -> Self {
        let mut tower = Self {
            disk_count,
            pegs: Default::default(),
        };
        tower.initialize(disk_count);
        tower
    }

    /// Empties all pegs, then stacks `n, n-1, ..., 1` on the source peg.
    #[instrument(skip(self))]
    pub fn initialize(&mut self, disk_count: DiskCount) {
        self.disk_count = disk_count;
        for peg in &mut self.pegs {
            peg.clear();
        }
        self.pegs[Peg::SOURCE.index()].extend((1..=disk_count.get()).rev().map(Disk::new));
    }

    /// Number of disks this tower was initialized with.
    pub fn disk_count(&self) -> DiskCount {
        self.disk_count
    }

    /// Returns the top disk of a peg, or `None` when the peg is empty.
    pub fn top_of(&self, peg: Peg) -> Option<Disk> {
        self.pegs[peg.index()].last().copied()
    }

    /// Pops the top disk of a peg.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyPegError`] if the peg holds no disks.
    #[instrument(skip(self))]
    pub fn remove(&mut self, peg: Peg) -> Result<Disk, EmptyPegError> {
        self.pegs[peg.index()].pop().ok_or(EmptyPegError { peg })
    }

    /// Pushes a disk onto a peg without checking legality.
    #[instrument(skip(self))]
    pub fn place(&mut self, peg: Peg, disk: Disk) {
        self.pegs[peg.index()].push(disk);
    }

    /// True when `target` holds exactly `n` disks.
    pub fn is_solved(&self, target: Peg, disk_count: DiskCount) -> bool {
        self.pegs[target.index()].len() == usize::from(disk_count.get())
    }

    /// Disks on a peg, bottom to top.
    pub fn peg(&self, peg: Peg) -> &[Disk] {
        &self.pegs[peg.index()]
    }

    /// Number of disks on a peg.
    pub fn height(&self, peg: Peg) -> usize {
        self.pegs[peg.index()].len()
    }

    /// Disk sizes per peg, bottom to top.
    pub fn to_sizes(&self) -> [Vec<u8>; 3] {
        self.pegs
            .clone()
            .map(|peg| peg.into_iter().map(Disk::size).collect())
    }
}

impl std::fmt::Display for TowerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, peg) in self.pegs.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            let sizes: Vec<String> = peg.iter().map(|d| d.to_string()).collect();
            write!(f, "[{}]", sizes.join(","))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three() -> DiskCount {
        DiskCount::new(3).unwrap()
    }

    #[test]
    fn test_initialize_stacks_source_peg() {
        let tower = TowerState::new(three());
        assert_eq!(tower.to_sizes(), [vec![3, 2, 1], vec![], vec![]]);
        assert_eq!(tower.top_of(Peg::Left), Some(Disk::new(1)));
        assert_eq!(tower.top_of(Peg::Middle), None);
    }

    #[test]
    fn test_reinitialize_with_new_count() {
        let mut tower = TowerState::new(three());
        let disk = tower.remove(Peg::Left).unwrap();
        tower.place(Peg::Right, disk);

        tower.initialize(DiskCount::new(5).unwrap());
        assert_eq!(tower.height(Peg::Left), 5);
        assert_eq!(tower.height(Peg::Right), 0);
        assert_eq!(tower.disk_count().get(), 5);
    }

    #[test]
    fn test_remove_from_empty_peg_fails() {
        let mut tower = TowerState::new(three());
        assert_eq!(
            tower.remove(Peg::Middle),
            Err(EmptyPegError { peg: Peg::Middle })
        );
    }

    #[test]
    fn test_is_solved() {
        let mut tower = TowerState::new(three());
        assert!(!tower.is_solved(Peg::Right, three()));
        tower.pegs = [vec![], vec![], vec![Disk::new(3), Disk::new(2), Disk::new(1)]];
        assert!(tower.is_solved(Peg::Right, three()));
    }

    #[test]
    fn test_display() {
        let tower = TowerState::new(three());
        assert_eq!(tower.to_string(), "[3,2,1] [] []");
    }
}
