//! Quick wellness actions: hydration, posture and stretching.
//!
//! Each can be triggered on demand, and hydration and stretching also recur
//! on their own intervals while a session runs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::simulation::NoiseSource;
use crate::timer::Countdown;

/// Longest accepted recurring interval: one day.
pub const MAX_WELLNESS_MINUTES: u64 = 24 * 60;

pub const HYDRATION_MESSAGE: &str = "Time to drink some water! Stay hydrated for healthy eyes.";

pub static POSTURE_TIPS: [&str; 4] = [
    "Great posture! Keep it up!",
    "Sit up straighter - your back will thank you!",
    "Move back from the screen - maintain arm's length distance",
    "Screen should be at eye level or slightly below",
];

pub static STRETCH_ROUTINE: [&str; 4] = [
    "Roll your shoulders backward 5 times",
    "Gently turn your head left and right",
    "Stretch your arms above your head",
    "Take 3 deep breaths",
];

/// Simulated posture analysis: one tip picked at random.
pub fn posture_tip(noise: &mut dyn NoiseSource) -> &'static str {
    let index = (noise.next_unit() * POSTURE_TIPS.len() as f64) as usize;
    POSTURE_TIPS[index.min(POSTURE_TIPS.len() - 1)]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WellnessKind {
    Hydration,
    Stretch,
}

/// Recurring reminder intervals in minutes. Zero turns one off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WellnessIntervals {
    pub hydration_minutes: u64,
    pub stretch_minutes: u64,
}

impl Default for WellnessIntervals {
    fn default() -> Self {
        Self {
            hydration_minutes: 60,
            stretch_minutes: 60,
        }
    }
}

impl WellnessIntervals {
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, minutes) in [
            ("hydration_minutes", self.hydration_minutes),
            ("stretch_minutes", self.stretch_minutes),
        ] {
            if minutes > MAX_WELLNESS_MINUTES {
                return Err(ValidationError::invalid(
                    field,
                    format!("must be at most {MAX_WELLNESS_MINUTES} minutes (0 turns it off)"),
                ));
            }
        }
        Ok(())
    }
}

/// The two recurring countdowns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WellnessReminders {
    hydration: Option<Countdown>,
    stretch: Option<Countdown>,
}

impl WellnessReminders {
    pub fn new(intervals: WellnessIntervals) -> Self {
        let running = |minutes: u64| {
            (minutes > 0).then(|| {
                let mut countdown = Countdown::from_secs(minutes.saturating_mul(60));
                countdown.start();
                countdown
            })
        };
        Self {
            hydration: running(intervals.hydration_minutes),
            stretch: running(intervals.stretch_minutes),
        }
    }

    /// Whole seconds until the next reminder of `kind`; `None` when off.
    pub fn remaining_secs(&self, kind: WellnessKind) -> Option<u64> {
        self.countdown(kind).map(Countdown::remaining_secs)
    }

    /// Consume `elapsed`; returns the reminders that came due. Each restarts
    /// for its next round.
    pub fn tick(&mut self, elapsed: Duration) -> Vec<WellnessKind> {
        let mut due = Vec::new();
        for kind in [WellnessKind::Hydration, WellnessKind::Stretch] {
            if let Some(countdown) = self.countdown_mut(kind) {
                if countdown.tick(elapsed) {
                    countdown.start();
                    due.push(kind);
                }
            }
        }
        due
    }

    /// Taking the action by hand restarts its interval.
    pub fn restart(&mut self, kind: WellnessKind) {
        if let Some(countdown) = self.countdown_mut(kind) {
            countdown.start();
        }
    }

    fn countdown(&self, kind: WellnessKind) -> Option<&Countdown> {
        match kind {
            WellnessKind::Hydration => self.hydration.as_ref(),
            WellnessKind::Stretch => self.stretch.as_ref(),
        }
    }

    fn countdown_mut(&mut self, kind: WellnessKind) -> Option<&mut Countdown> {
        match kind {
            WellnessKind::Hydration => self.hydration.as_mut(),
            WellnessKind::Stretch => self.stretch.as_mut(),
        }
    }
}
