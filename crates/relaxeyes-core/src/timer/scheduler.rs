//! Break scheduler.
//!
//! Counts down to the next mandated eye break (the 20-20-20 rule: every 20
//! minutes, look 20 feet away for 20 seconds). Like the other timers it is a
//! wall-clock-delta state machine with no thread of its own; the owner calls
//! [`BreakScheduler::tick`] on its own cadence and passes the elapsed time.
//!
//! ## Rate
//!
//! A single timer drives the countdown. `time_scale` is how many countdown
//! minutes one real minute consumes, so demos can run the schedule faster
//! without a second timer racing the first.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ValidationError;
use crate::events::Event;

/// Longest tick period any timer accepts: one day.
pub const MAX_TICK_SECS: u64 = 24 * 60 * 60;

/// Countdown values this close to zero count as zero.
const DUE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Full countdown between breaks, in minutes.
    pub interval_minutes: f64,
    /// Countdown at session start. Shorter than the interval so the first
    /// reminder arrives early.
    pub initial_minutes: f64,
    /// How often the owner is expected to call `tick`.
    pub tick_secs: u64,
    /// Countdown minutes consumed per real minute.
    pub time_scale: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_minutes: 20.0,
            initial_minutes: 18.0,
            tick_secs: 60,
            time_scale: 1.0,
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.interval_minutes.is_finite() && self.interval_minutes > 0.0) {
            return Err(ValidationError::invalid(
                "interval_minutes",
                "must be a positive number of minutes",
            ));
        }
        if !(self.initial_minutes.is_finite() && self.initial_minutes >= 0.0) {
            return Err(ValidationError::invalid(
                "initial_minutes",
                "must be zero or a positive number of minutes",
            ));
        }
        if !(1..=MAX_TICK_SECS).contains(&self.tick_secs) {
            return Err(ValidationError::invalid(
                "tick_secs",
                format!("must be between 1 and {MAX_TICK_SECS}"),
            ));
        }
        if !(self.time_scale.is_finite() && self.time_scale > 0.0) {
            return Err(ValidationError::invalid(
                "time_scale",
                "must be a positive number",
            ));
        }
        Ok(())
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_secs(self.tick_secs)
    }
}

/// Observable scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakTimerState {
    pub minutes_until_break: f64,
    pub break_due: bool,
    pub last_break_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakScheduler {
    config: SchedulerConfig,
    minutes_until_break: f64,
    break_due: bool,
    last_break_at: DateTime<Utc>,
}

impl BreakScheduler {
    /// Starts counting down from `initial_minutes`, with `now` as the last
    /// break.
    pub fn new(config: SchedulerConfig, now: DateTime<Utc>) -> Self {
        let minutes_until_break = sanitize_minutes(config.initial_minutes);
        Self {
            config,
            minutes_until_break,
            break_due: false,
            last_break_at: now,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn minutes_until_break(&self) -> f64 {
        self.minutes_until_break.max(0.0)
    }

    pub fn is_break_due(&self) -> bool {
        self.break_due
    }

    pub fn last_break_at(&self) -> DateTime<Utc> {
        self.last_break_at
    }

    pub fn state(&self) -> BreakTimerState {
        BreakTimerState {
            minutes_until_break: self.minutes_until_break(),
            break_due: self.break_due,
            last_break_at: self.last_break_at,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Consume `elapsed` real time. Returns `Some(Event::BreakDue)` on the
    /// tick that raises the due flag; a countdown that wraps while the flag
    /// is still up stays silent.
    pub fn tick(&mut self, elapsed: Duration, now: DateTime<Utc>) -> Option<Event> {
        let consumed = elapsed.as_secs_f64() / 60.0 * self.config.time_scale;
        self.minutes_until_break -= consumed;
        debug!(
            minutes_until_break = self.minutes_until_break.max(0.0),
            consumed, "break scheduler tick"
        );

        if self.minutes_until_break > DUE_EPSILON {
            return None;
        }

        self.minutes_until_break = self.config.interval_minutes;
        if self.break_due {
            return None;
        }
        self.break_due = true;
        let minutes_since_last_break = minutes_between(self.last_break_at, now);
        info!(minutes_since_last_break, "break due");
        Some(Event::BreakDue {
            minutes_since_last_break,
            at: now,
        })
    }

    /// Full interval, due flag cleared, `now` recorded as the last break.
    pub fn reset(&mut self, now: DateTime<Utc>) -> Event {
        self.minutes_until_break = self.config.interval_minutes;
        self.break_due = false;
        self.last_break_at = now;
        info!(minutes_until_break = self.minutes_until_break, "break timer reset");
        Event::BreakTimerReset {
            minutes_until_break: self.minutes_until_break,
            at: now,
        }
    }

    /// Next break in `minutes`, due flag cleared. The last-break timestamp is
    /// left alone: a snooze is not a break.
    pub fn snooze(&mut self, minutes: f64, now: DateTime<Utc>) -> Event {
        let minutes = sanitize_minutes(minutes);
        self.minutes_until_break = minutes;
        self.break_due = false;
        info!(minutes, "break snoozed");
        Event::BreakSnoozed { minutes, at: now }
    }
}

fn sanitize_minutes(minutes: f64) -> f64 {
    if minutes.is_finite() {
        minutes.max(0.0)
    } else {
        0.0
    }
}

fn minutes_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    (later - earlier).num_milliseconds().max(0) as f64 / 60_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler_at(minutes: f64) -> BreakScheduler {
        let now = Utc::now();
        let mut s = BreakScheduler::new(SchedulerConfig::default(), now);
        s.snooze(minutes, now);
        s
    }

    #[test]
    fn starts_from_initial_countdown() {
        let s = BreakScheduler::new(SchedulerConfig::default(), Utc::now());
        assert_eq!(s.minutes_until_break(), 18.0);
        assert!(!s.is_break_due());
    }

    #[test]
    fn one_minute_left_becomes_due_after_a_minute() {
        let mut s = scheduler_at(1.0);
        let event = s.tick(Duration::from_secs(60), Utc::now());
        assert!(matches!(event, Some(Event::BreakDue { .. })));
        assert!(s.is_break_due());
        assert_eq!(s.minutes_until_break(), 20.0);
    }

    #[test]
    fn due_is_raised_once_until_cleared() {
        let mut s = scheduler_at(0.5);
        assert!(s.tick(Duration::from_secs(60), Utc::now()).is_some());
        // A full extra interval elapses without anyone reacting.
        assert!(s.tick(Duration::from_secs(20 * 60), Utc::now()).is_none());
        assert!(s.is_break_due());
    }

    #[test]
    fn fine_grained_ticks_reach_zero() {
        let mut s = scheduler_at(1.0);
        let mut due = 0;
        for _ in 0..6 {
            if s.tick(Duration::from_secs(10), Utc::now()).is_some() {
                due += 1;
            }
        }
        assert_eq!(due, 1);
        assert!(s.is_break_due());
    }

    #[test]
    fn time_scale_accelerates_countdown() {
        let config = SchedulerConfig {
            time_scale: 6.0,
            ..SchedulerConfig::default()
        };
        let now = Utc::now();
        let mut s = BreakScheduler::new(config, now);
        s.snooze(1.0, now);
        assert!(s.tick(Duration::from_secs(10), now).is_some());
    }

    #[test]
    fn reset_restores_interval_and_records_break() {
        let start = Utc::now();
        let mut s = BreakScheduler::new(SchedulerConfig::default(), start);
        s.tick(Duration::from_secs(18 * 60), start);
        assert!(s.is_break_due());

        let later = start + chrono::Duration::minutes(25);
        s.reset(later);
        assert_eq!(s.minutes_until_break(), 20.0);
        assert!(!s.is_break_due());
        assert_eq!(s.last_break_at(), later);
    }

    #[test]
    fn snooze_keeps_last_break_timestamp() {
        let start = Utc::now();
        let mut s = BreakScheduler::new(SchedulerConfig::default(), start);
        s.tick(Duration::from_secs(18 * 60), start);
        s.snooze(5.0, start + chrono::Duration::minutes(18));
        assert_eq!(s.minutes_until_break(), 5.0);
        assert!(!s.is_break_due());
        assert_eq!(s.last_break_at(), start);
    }

    #[test]
    fn snooze_rejects_nonsense_minutes() {
        let mut s = scheduler_at(10.0);
        s.snooze(-3.0, Utc::now());
        assert_eq!(s.minutes_until_break(), 0.0);
        s.snooze(f64::NAN, Utc::now());
        assert_eq!(s.minutes_until_break(), 0.0);
    }

    #[test]
    fn validate_catches_zero_interval() {
        let config = SchedulerConfig {
            interval_minutes: 0.0,
            ..SchedulerConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(SchedulerConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_bounds_tick_period() {
        for tick_secs in [0, MAX_TICK_SECS + 1, u64::MAX] {
            let config = SchedulerConfig {
                tick_secs,
                ..SchedulerConfig::default()
            };
            assert!(config.validate().is_err(), "tick_secs = {tick_secs}");
        }
    }
}
