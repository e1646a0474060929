//! First-class invariants for the tower.
//!
//! Invariants are logical properties that must hold after every applied
//! move. The controller checks them in debug builds; tests check them
//! directly.

use tracing::{error, instrument};

use crate::TowerState;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implemented for tuples of invariants.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set.
    ///
    /// Returns every violation, not just the first.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();

        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }

        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Invariant: on every peg, disk sizes strictly decrease bottom to top.
pub struct PegsStrictlyDecreasing;

impl Invariant<TowerState> for PegsStrictlyDecreasing {
    fn holds(tower: &TowerState) -> bool {
        tower
            .pegs
            .iter()
            .all(|peg| peg.windows(2).all(|pair| pair[0] > pair[1]))
    }

    fn description() -> &'static str {
        "Disk sizes strictly decrease from bottom to top on every peg"
    }
}

/// Invariant: the pegs together hold each disk `1..=n` exactly once.
pub struct DisksArePermutation;

impl Invariant<TowerState> for DisksArePermutation {
    fn holds(tower: &TowerState) -> bool {
        let mut sizes: Vec<u8> = tower.pegs.iter().flatten().map(|d| d.size()).collect();
        sizes.sort_unstable();
        sizes.iter().copied().eq(1..=tower.disk_count().get())
    }

    fn description() -> &'static str {
        "Pegs hold every disk from 1 to n exactly once"
    }
}

/// All tower invariants as a composable set.
pub type TowerInvariants = (PegsStrictlyDecreasing, DisksArePermutation);

/// Checks every tower invariant, panicking in debug builds on violation.
///
/// Release builds log the violation and continue.
#[instrument(skip(tower), fields(tower = %tower))]
pub fn assert_tower_invariants(tower: &TowerState) {
    if let Err(violations) = TowerInvariants::check_all(tower) {
        let descriptions = violations
            .iter()
            .map(|v| v.description.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        error!(violations = %descriptions, "Tower invariant violated");
        debug_assert!(
            violations.is_empty(),
            "Tower invariant violated: {descriptions}"
        );
    }
}
