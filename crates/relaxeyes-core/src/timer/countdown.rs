//! Fixed-duration countdown.
//!
//! Shared by the break reminder auto-dismiss, the active break itself and the
//! timed activities. Like the rest of the timers it has no thread of its own;
//! the owner feeds it elapsed time through [`Countdown::tick`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownState {
    Stopped,
    Running,
    Paused,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    total: Duration,
    remaining: Duration,
    state: CountdownState,
}

impl Countdown {
    /// A stopped countdown of `total`.
    pub fn new(total: Duration) -> Self {
        Self {
            total,
            remaining: total,
            state: CountdownState::Stopped,
        }
    }

    pub fn from_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == CountdownState::Running
    }

    pub fn is_finished(&self) -> bool {
        self.state == CountdownState::Finished
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Whole seconds left, rounded up so a display never shows 0 early.
    pub fn remaining_secs(&self) -> u64 {
        let millis = self.remaining.as_millis() as u64;
        millis.div_ceil(1000)
    }

    /// 0.0 .. 1.0 fraction of the countdown still left.
    pub fn fraction_remaining(&self) -> f64 {
        if self.total.is_zero() {
            return 0.0;
        }
        self.remaining.as_secs_f64() / self.total.as_secs_f64()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Restart from the full duration and run.
    pub fn start(&mut self) {
        self.remaining = self.total;
        self.state = if self.total.is_zero() {
            CountdownState::Finished
        } else {
            CountdownState::Running
        };
    }

    /// Back to the full duration, not running.
    pub fn reset(&mut self) {
        self.remaining = self.total;
        self.state = CountdownState::Stopped;
    }

    pub fn pause(&mut self) -> bool {
        if self.state != CountdownState::Running {
            return false;
        }
        self.state = CountdownState::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state != CountdownState::Paused {
            return false;
        }
        self.state = CountdownState::Running;
        true
    }

    /// Consume `elapsed`. Returns `true` only on the tick that reaches zero.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        if self.state != CountdownState::Running {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(elapsed);
        if self.remaining.is_zero() {
            self.state = CountdownState::Finished;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_and_finishes_once() {
        let mut c = Countdown::from_secs(3);
        c.start();
        assert!(!c.tick(Duration::from_secs(1)));
        assert!(!c.tick(Duration::from_secs(1)));
        assert!(c.tick(Duration::from_secs(1)));
        assert!(c.is_finished());
        assert!(!c.tick(Duration::from_secs(1)));
        assert_eq!(c.remaining_secs(), 0);
    }

    #[test]
    fn stopped_countdown_ignores_ticks() {
        let mut c = Countdown::from_secs(30);
        assert!(!c.tick(Duration::from_secs(60)));
        assert_eq!(c.remaining_secs(), 30);
    }

    #[test]
    fn pause_freezes_remaining_time() {
        let mut c = Countdown::from_secs(300);
        c.start();
        c.tick(Duration::from_secs(100));
        assert!(c.pause());
        c.tick(Duration::from_secs(100));
        assert_eq!(c.remaining_secs(), 200);
        assert!(c.resume());
        c.tick(Duration::from_secs(50));
        assert_eq!(c.remaining_secs(), 150);
    }

    #[test]
    fn remaining_secs_rounds_up() {
        let mut c = Countdown::from_secs(10);
        c.start();
        c.tick(Duration::from_millis(9_500));
        assert_eq!(c.remaining_secs(), 1);
        assert!((c.fraction_remaining() - 0.05).abs() < 1e-9);
    }

    #[test]
    fn zero_length_countdown_finishes_on_start() {
        let mut c = Countdown::from_secs(0);
        c.start();
        assert!(c.is_finished());
    }
}
