//! Pausable session timer.

use std::time::Duration;

use tokio::time::Instant;
use tracing::instrument;

/// Measures play time from session start, excluding paused intervals.
///
/// Backed by [`tokio::time::Instant`], so tests running on a paused
/// runtime control it with `tokio::time::advance`.
#[derive(Debug, Clone, Default)]
pub struct SessionClock {
    accumulated: Duration,
    running_since: Option<Instant>,
}

impl SessionClock {
    /// Creates a stopped clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets to zero and starts running.
    #[instrument(skip(self))]
    pub fn start(&mut self) {
        self.accumulated = Duration::ZERO;
        self.running_since = Some(Instant::now());
    }

    /// Stops running, keeping the elapsed time.
    #[instrument(skip(self))]
    pub fn pause(&mut self) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += since.elapsed();
        }
    }

    /// Continues running after a pause. No effect if already running.
    #[instrument(skip(self))]
    pub fn resume(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    /// Stops and returns to zero.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
        self.running_since = None;
    }

    /// True while the clock is counting.
    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    /// Time counted so far.
    pub fn elapsed(&self) -> Duration {
        self.accumulated
            + self
                .running_since
                .map(|since| since.elapsed())
                .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_pause_excludes_interval() {
        let mut clock = SessionClock::new();
        clock.start();
        tokio::time::advance(Duration::from_secs(10)).await;
        clock.pause();
        tokio::time::advance(Duration::from_secs(100)).await;
        assert_eq!(clock.elapsed(), Duration::from_secs(10));

        clock.resume();
        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(clock.elapsed(), Duration::from_secs(15));
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_resets() {
        let mut clock = SessionClock::new();
        clock.start();
        tokio::time::advance(Duration::from_secs(30)).await;
        clock.start();
        assert_eq!(clock.elapsed(), Duration::ZERO);
        clock.reset();
        assert!(!clock.is_running());
    }
}
