//! Synthetic eye-health metrics.
//!
//! Nothing here reads a sensor. Screen time is accumulated from wall-clock
//! deltas while the app has the user's attention; eye strain and blink rate
//! drift with bounded noise around simple rules. Every update ends in a clamp,
//! so out-of-range values cannot be observed.
//!
//! Within one tick, strain and blink rate are computed from the state as it
//! was when the tick started, never from values written earlier in the same
//! tick.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ValidationError;
use crate::events::Event;
use crate::simulation::NoiseSource;
use crate::timer::MAX_TICK_SECS;

pub const BLINK_RATE_MIN: f64 = 8.0;
pub const BLINK_RATE_MAX: f64 = 25.0;
pub const BLINK_RATE_BASELINE: f64 = 18.0;
pub const EYE_STRAIN_MIN: f64 = 0.0;
pub const EYE_STRAIN_MAX: f64 = 100.0;

/// Screen time after which strain builds faster.
const LONG_SESSION_MINUTES: f64 = 60.0;
const STRAIN_STEP: f64 = 0.2;
const STRAIN_STEP_LONG_SESSION: f64 = 0.5;
const STRAIN_NOISE_SPAN: f64 = 2.0;
const STRAIN_DECAY: f64 = 1.0;
/// Strain above which blinking slows.
const STRAINED_THRESHOLD: f64 = 50.0;
const STRAINED_BLINK_PENALTY: f64 = 2.0;
const BLINK_NOISE_SPAN: f64 = 3.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// How often the owner is expected to call `tick`.
    pub tick_secs: u64,
    pub seed_screen_minutes: f64,
    pub seed_blink_rate: f64,
    pub seed_eye_strain: f64,
    /// Gaps at least this long between updates are treated as suspend/resume
    /// and not counted as screen time.
    pub max_gap_minutes: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            tick_secs: 30,
            seed_screen_minutes: 127.0,
            seed_blink_rate: BLINK_RATE_BASELINE,
            seed_eye_strain: 35.0,
            max_gap_minutes: 2.0,
        }
    }
}

impl MetricsConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=MAX_TICK_SECS).contains(&self.tick_secs) {
            return Err(ValidationError::invalid(
                "tick_secs",
                format!("must be between 1 and {MAX_TICK_SECS}"),
            ));
        }
        if !(self.seed_screen_minutes.is_finite() && self.seed_screen_minutes >= 0.0) {
            return Err(ValidationError::invalid(
                "seed_screen_minutes",
                "must be zero or positive",
            ));
        }
        if !self.seed_blink_rate.is_finite() {
            return Err(ValidationError::invalid("seed_blink_rate", "must be a finite number"));
        }
        if !self.seed_eye_strain.is_finite() {
            return Err(ValidationError::invalid("seed_eye_strain", "must be a finite number"));
        }
        if !(self.max_gap_minutes.is_finite() && self.max_gap_minutes > 0.0) {
            return Err(ValidationError::invalid(
                "max_gap_minutes",
                "must be a positive number of minutes",
            ));
        }
        Ok(())
    }
}

/// Current simulated readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsState {
    pub screen_time_minutes: f64,
    pub blink_rate_per_minute: f64,
    pub eye_strain_percent: f64,
    pub is_active: bool,
}

impl MetricsState {
    /// Rounded values, the way they are shown to the user.
    pub fn reading(&self) -> MetricsReading {
        MetricsReading {
            screen_time_minutes: self.screen_time_minutes.round() as u32,
            blink_rate_per_minute: self.blink_rate_per_minute.round() as u32,
            eye_strain_percent: self.eye_strain_percent.round() as u32,
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsReading {
    pub screen_time_minutes: u32,
    pub blink_rate_per_minute: u32,
    pub eye_strain_percent: u32,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSimulator {
    config: MetricsConfig,
    state: MetricsState,
    has_focus: bool,
    is_visible: bool,
    /// Reference instant for the next screen-time delta.
    last_active_at: DateTime<Utc>,
}

impl MetricsSimulator {
    /// Session starts focused and visible, seeded from `config`. Seeds that
    /// are not finite fall back to the defaults.
    pub fn new(config: MetricsConfig, now: DateTime<Utc>) -> Self {
        let defaults = MetricsConfig::default();
        let seed = |value: f64, fallback: f64| if value.is_finite() { value } else { fallback };
        let state = MetricsState {
            screen_time_minutes: seed(config.seed_screen_minutes, defaults.seed_screen_minutes)
                .max(0.0),
            blink_rate_per_minute: seed(config.seed_blink_rate, defaults.seed_blink_rate)
                .clamp(BLINK_RATE_MIN, BLINK_RATE_MAX),
            eye_strain_percent: seed(config.seed_eye_strain, defaults.seed_eye_strain)
                .clamp(EYE_STRAIN_MIN, EYE_STRAIN_MAX),
            is_active: true,
        };
        Self {
            config,
            state,
            has_focus: true,
            is_visible: true,
            last_active_at: now,
        }
    }

    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }

    pub fn state(&self) -> &MetricsState {
        &self.state
    }

    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible
    }

    /// Periodic update: accumulate screen time, then evolve strain and blink
    /// rate from the state at entry.
    pub fn tick(&mut self, now: DateTime<Utc>, noise: &mut dyn NoiseSource) -> Vec<Event> {
        let entry = self.state;
        let mut events = self.track_screen_time(now);

        self.state.eye_strain_percent = if entry.is_active {
            let step = if entry.screen_time_minutes > LONG_SESSION_MINUTES {
                STRAIN_STEP_LONG_SESSION
            } else {
                STRAIN_STEP
            };
            entry.eye_strain_percent + step + noise.symmetric(STRAIN_NOISE_SPAN)
        } else {
            entry.eye_strain_percent - STRAIN_DECAY
        }
        .clamp(EYE_STRAIN_MIN, EYE_STRAIN_MAX);

        let penalty = if entry.eye_strain_percent > STRAINED_THRESHOLD {
            STRAINED_BLINK_PENALTY
        } else {
            0.0
        };
        self.state.blink_rate_per_minute = (BLINK_RATE_BASELINE - penalty
            + noise.symmetric(BLINK_NOISE_SPAN))
        .clamp(BLINK_RATE_MIN, BLINK_RATE_MAX);

        debug!(
            screen_time_minutes = self.state.screen_time_minutes,
            eye_strain_percent = self.state.eye_strain_percent,
            blink_rate_per_minute = self.state.blink_rate_per_minute,
            is_active = self.state.is_active,
            "metrics tick"
        );
        events.push(self.updated_event(now));
        events
    }

    /// Window focus gained or lost. Time up to a blur is counted; regaining
    /// focus moves the reference instant to `now` so time spent away is not.
    pub fn on_focus_change(&mut self, focused: bool, now: DateTime<Utc>) -> Vec<Event> {
        self.has_focus = focused;
        self.track_screen_time(now)
    }

    /// Document visibility changed. Runs the same accumulation as a tick but
    /// leaves strain and blink rate alone.
    pub fn on_visibility_change(&mut self, visible: bool, now: DateTime<Utc>) -> Vec<Event> {
        self.is_visible = visible;
        self.track_screen_time(now)
    }

    /// Screen time only grows across an interval that started while active.
    fn track_screen_time(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        let mut events = Vec::new();
        let was_active = self.state.is_active;
        let active = self.has_focus && self.is_visible;

        if was_active {
            let delta_minutes =
                (now - self.last_active_at).num_milliseconds() as f64 / 60_000.0;
            if delta_minutes >= self.config.max_gap_minutes {
                warn!(gap_minutes = delta_minutes, "suspend gap excluded from screen time");
                events.push(Event::SuspendGapSkipped {
                    gap_minutes: delta_minutes,
                    at: now,
                });
            } else if delta_minutes > 0.0 {
                self.state.screen_time_minutes += delta_minutes;
            }
        }
        if was_active || active {
            self.last_active_at = now;
        }

        events.extend(self.set_active(active, now));
        events
    }

    fn set_active(&mut self, active: bool, now: DateTime<Utc>) -> Option<Event> {
        if self.state.is_active == active {
            return None;
        }
        self.state.is_active = active;
        info!(is_active = active, "attention changed");
        Some(Event::ActivityChanged {
            is_active: active,
            at: now,
        })
    }

    fn updated_event(&self, now: DateTime<Utc>) -> Event {
        Event::MetricsUpdated {
            screen_time_minutes: self.state.screen_time_minutes,
            blink_rate_per_minute: self.state.blink_rate_per_minute,
            eye_strain_percent: self.state.eye_strain_percent,
            is_active: self.state.is_active,
            at: now,
        }
    }
}
