//! Score calculation for a completed game.

use std::time::Duration;

use tracing::instrument;

/// Score for a perfect game finished within the first minute.
pub const BASE_SCORE: u32 = 1000;
/// Lowest score any completed game receives.
pub const MIN_SCORE: u32 = 100;
/// Penalty per move beyond the optimum.
pub const EXTRA_MOVE_PENALTY: u32 = 10;
/// Penalty per full minute of play.
pub const MINUTE_PENALTY: u64 = 50;
/// Cap on the total time penalty.
pub const MAX_TIME_PENALTY: u64 = 500;

/// Scores a completed game.
///
/// Starts from [`BASE_SCORE`], subtracts 10 per move beyond `min_moves`
/// and 50 per full minute (at most 500), and never returns less than
/// [`MIN_SCORE`].
#[instrument]
pub fn score(moves: u32, min_moves: u32, elapsed_seconds: u64) -> u32 {
    let move_penalty = u64::from(moves.saturating_sub(min_moves)) * u64::from(EXTRA_MOVE_PENALTY);
    let time_penalty = ((elapsed_seconds / 60) * MINUTE_PENALTY).min(MAX_TIME_PENALTY);
    let remaining = u64::from(BASE_SCORE).saturating_sub(move_penalty + time_penalty);
    // remaining <= BASE_SCORE, so the conversion cannot fail
    u32::try_from(remaining).unwrap_or(MIN_SCORE).max(MIN_SCORE)
}

/// Formats an elapsed duration as `MM:SS`.
///
/// Minutes are not wrapped into hours.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_game() {
        assert_eq!(score(7, 7, 0), 1000);
        assert_eq!(score(7, 7, 59), 1000);
    }

    #[test]
    fn test_extra_moves() {
        assert_eq!(score(12, 7, 0), 950);
    }

    #[test]
    fn test_time_penalty_per_minute() {
        assert_eq!(score(7, 7, 60), 950);
        assert_eq!(score(7, 7, 179), 900);
    }

    #[test]
    fn test_time_penalty_capped() {
        assert_eq!(score(7, 7, 60 * 10), 500);
        assert_eq!(score(7, 7, 60 * 60), 500);
    }

    #[test]
    fn test_floor() {
        assert_eq!(score(1000, 7, 0), 100);
        assert_eq!(score(u32::MAX, 7, u64::MAX), 100);
    }

    #[test]
    fn test_monotone_in_moves_and_time() {
        let mut previous = u32::MAX;
        for moves in 7..200 {
            let s = score(moves, 7, 30);
            assert!(s <= previous);
            previous = s;
        }
        previous = u32::MAX;
        for seconds in (0..3600).step_by(7) {
            let s = score(15, 7, seconds);
            assert!(s <= previous);
            previous = s;
        }
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_secs(0)), "00:00");
        assert_eq!(format_elapsed(Duration::from_millis(45_900)), "00:45");
        assert_eq!(format_elapsed(Duration::from_secs(125)), "02:05");
        assert_eq!(format_elapsed(Duration::from_secs(6000)), "100:00");
    }
}
