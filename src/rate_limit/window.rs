//! Trailing-window call counter.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tao_income_api::rate_limit::{CallWindow, ManualClock};
//!
//! let clock = Arc::new(ManualClock::new());
//! let mut window = CallWindow::with_clock(Duration::from_secs(60), 2, clock.clone());
//!
//! assert!(window.attempt());
//! assert!(window.attempt());
//! assert!(!window.attempt());
//!
//! clock.advance(Duration::from_secs(61));
//! assert!(window.attempt());
//! ```

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::rate_limit::clock::{Clock, SystemClock};

/// Counts accepted calls within a trailing time window.
///
/// Holds at most `max_calls` instants. An attempt first evicts every instant
/// strictly older than `now - window`, then accepts only if fewer than
/// `max_calls` remain. Rejected attempts are not recorded.
#[derive(Debug)]
pub struct CallWindow {
    /// Accepted call instants, oldest first
    calls: VecDeque<Instant>,
    /// Window duration
    window: Duration,
    /// Maximum calls per window
    max_calls: u32,
    clock: Arc<dyn Clock>,
}

impl CallWindow {
    /// Create a window on the system clock.
    pub fn new(window: Duration, max_calls: u32) -> Self {
        Self::with_clock(window, max_calls, Arc::new(SystemClock))
    }

    /// Create a window on the given clock.
    pub fn with_clock(window: Duration, max_calls: u32, clock: Arc<dyn Clock>) -> Self {
        Self {
            calls: VecDeque::with_capacity(max_calls as usize),
            window,
            max_calls,
            clock,
        }
    }

    /// Try to record a call.
    ///
    /// Returns `true` and records the current instant if the call is allowed,
    /// `false` otherwise.
    pub fn attempt(&mut self) -> bool {
        let now = self.clock.now();
        self.evict(now);

        if (self.calls.len() as u32) < self.max_calls {
            self.calls.push_back(now);
            true
        } else {
            false
        }
    }

    /// Like [`attempt`](Self::attempt), but reports how long to wait on rejection.
    pub fn try_acquire(&mut self) -> Result<(), Duration> {
        if self.attempt() {
            Ok(())
        } else {
            Err(self.retry_after().unwrap_or_default())
        }
    }

    /// Number of calls currently counted against the window.
    pub fn calls_made(&self) -> u32 {
        let now = self.clock.now();
        self.calls.iter().filter(|ts| self.is_live(**ts, now)).count() as u32
    }

    /// Number of calls still allowed in the current window.
    pub fn remaining(&self) -> u32 {
        self.max_calls.saturating_sub(self.calls_made())
    }

    /// Time until the next call would be accepted.
    ///
    /// Returns `None` if a call is allowed now.
    pub fn retry_after(&self) -> Option<Duration> {
        if self.remaining() > 0 {
            return None;
        }
        let now = self.clock.now();
        self.calls
            .iter()
            .find(|ts| self.is_live(**ts, now))
            .map(|oldest| {
                // Evicted once strictly older than the window.
                (*oldest + self.window + Duration::from_nanos(1)).saturating_duration_since(now)
            })
    }

    /// Maximum calls per window.
    pub fn max_calls(&self) -> u32 {
        self.max_calls
    }

    /// Window duration.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Forget every recorded call.
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    fn is_live(&self, ts: Instant, now: Instant) -> bool {
        now.saturating_duration_since(ts) <= self.window
    }

    fn evict(&mut self, now: Instant) {
        while let Some(oldest) = self.calls.front() {
            if self.is_live(*oldest, now) {
                break;
            }
            self.calls.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate_limit::clock::ManualClock;

    fn manual(window_secs: u64, max_calls: u32) -> (CallWindow, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let window = CallWindow::with_clock(
            Duration::from_secs(window_secs),
            max_calls,
            clock.clone(),
        );
        (window, clock)
    }

    #[test]
    fn test_eleventh_call_rejected() {
        let (mut window, _clock) = manual(60, 10);

        for _ in 0..10 {
            assert!(window.attempt());
        }
        assert!(!window.attempt());
        assert_eq!(window.calls_made(), 10);
    }

    #[test]
    fn test_accepts_again_after_window_elapses() {
        let (mut window, clock) = manual(60, 10);

        for _ in 0..10 {
            window.attempt();
        }
        clock.advance(Duration::from_secs(30));
        assert!(!window.attempt());

        clock.advance(Duration::from_secs(31));
        assert!(window.attempt());
        assert_eq!(window.calls_made(), 1);
    }

    #[test]
    fn test_call_exactly_window_old_still_counts() {
        let (mut window, clock) = manual(60, 1);

        assert!(window.attempt());
        clock.advance(Duration::from_secs(60));
        assert!(!window.attempt());

        clock.advance(Duration::from_millis(1));
        assert!(window.attempt());
    }

    #[test]
    fn test_rejected_attempts_are_not_recorded() {
        let (mut window, clock) = manual(60, 2);

        window.attempt();
        clock.advance(Duration::from_secs(10));
        window.attempt();
        for _ in 0..5 {
            assert!(!window.attempt());
        }

        // Only the first call expires here; the rejected ones never counted.
        clock.advance(Duration::from_secs(51));
        assert!(window.attempt());
        assert!(!window.attempt());
    }

    #[test]
    fn test_remaining_and_retry_after() {
        let (mut window, clock) = manual(60, 2);

        assert_eq!(window.remaining(), 2);
        assert_eq!(window.retry_after(), None);

        window.attempt();
        clock.advance(Duration::from_secs(20));
        window.attempt();
        assert_eq!(window.remaining(), 0);

        let wait = window.retry_after().unwrap();
        assert!(wait > Duration::from_secs(39));
        assert!(wait <= Duration::from_secs(41));
    }

    #[test]
    fn test_try_acquire_reports_wait() {
        let (mut window, _clock) = manual(60, 1);

        assert!(window.try_acquire().is_ok());
        let wait = window.try_acquire().unwrap_err();
        assert!(wait > Duration::from_secs(59));
    }

    #[test]
    fn test_record_stays_bounded() {
        let (mut window, clock) = manual(1, 3);

        for _ in 0..100 {
            window.attempt();
            clock.advance(Duration::from_millis(300));
        }
        assert!(window.calls.len() <= 3);
    }
}
