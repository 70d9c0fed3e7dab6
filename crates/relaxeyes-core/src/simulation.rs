//! Randomness seam and deterministic session simulation.
//!
//! The metrics simulator draws its noise through [`NoiseSource`] so a seeded
//! source makes whole sessions reproducible. [`SimulationHarness`] drives a
//! [`SessionController`] second by second on a [`ManualClock`], which is what
//! the CLI `simulate` command and the scenario tests use.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::{Clock, ManualClock};
use crate::events::{BreakEndReason, DismissReason, Event};
use crate::session::{SessionConfig, SessionController, SessionSnapshot};

/// Uniform samples in `[0, 1)`.
pub trait NoiseSource {
    fn next_unit(&mut self) -> f64;

    /// Noise in `[-span / 2, span / 2)`.
    fn symmetric(&mut self, span: f64) -> f64 {
        (self.next_unit() - 0.5) * span
    }
}

/// Seed for deterministic noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimulationSeed(pub u64);

impl SimulationSeed {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Generate a seed from a string (for named scenarios)
    pub fn from_string(s: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        s.hash(&mut hasher);
        Self(hasher.finish())
    }
}

impl Default for SimulationSeed {
    fn default() -> Self {
        Self(42)
    }
}

/// PCG64 noise; the same seed always yields the same sequence.
#[derive(Debug, Clone)]
pub struct SeededNoise {
    rng: Pcg64,
}

impl SeededNoise {
    pub fn new(seed: SimulationSeed) -> Self {
        Self {
            rng: Pcg64::seed_from_u64(seed.0),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self::new(SimulationSeed(seed))
    }
}

impl NoiseSource for SeededNoise {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Non-reproducible noise for live sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadNoise;

impl NoiseSource for ThreadNoise {
    fn next_unit(&mut self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Always returns the same sample. `midpoint()` makes every noise term zero.
#[derive(Debug, Clone, Copy)]
pub struct FixedNoise(f64);

impl FixedNoise {
    pub fn new(unit: f64) -> Self {
        Self(unit.clamp(0.0, 1.0 - f64::EPSILON))
    }

    pub fn midpoint() -> Self {
        Self(0.5)
    }
}

impl NoiseSource for FixedNoise {
    fn next_unit(&mut self) -> f64 {
        self.0
    }
}

/// How the simulated user answers break reminders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderResponse {
    /// Start the break right away and sit it out.
    Accept,
    /// Click "Later" right away.
    Dismiss,
    /// Never answer; the reminder times out.
    #[default]
    Ignore,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationPlan {
    pub minutes: u64,
    pub seed: SimulationSeed,
    /// Snapshot cadence; 0 means only a final snapshot.
    pub snapshot_every_minutes: u64,
    pub response: ReminderResponse,
}

impl Default for SimulationPlan {
    fn default() -> Self {
        Self {
            minutes: 60,
            seed: SimulationSeed::default(),
            snapshot_every_minutes: 10,
            response: ReminderResponse::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub reminders_shown: usize,
    pub reminders_dismissed: usize,
    pub reminders_timed_out: usize,
    pub breaks_started: usize,
    pub breaks_completed: usize,
    pub suspend_gaps: usize,
    pub hydration_reminders: usize,
    pub stretch_reminders: usize,
    pub final_screen_time_minutes: f64,
    pub max_eye_strain_percent: f64,
    pub min_blink_rate_per_minute: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub plan: SimulationPlan,
    pub snapshots: Vec<SessionSnapshot>,
    pub events: Vec<Event>,
    pub summary: SimulationSummary,
}

pub struct SimulationHarness {
    config: SessionConfig,
    start: DateTime<Utc>,
}

impl SimulationHarness {
    pub fn new(config: SessionConfig, start: DateTime<Utc>) -> Self {
        Self { config, start }
    }

    /// Run the plan one simulated second at a time.
    pub fn run(&self, plan: &SimulationPlan) -> SimulationResult {
        let clock = ManualClock::new(self.start);
        let mut noise = SeededNoise::new(plan.seed);
        let mut session = SessionController::new(self.config.clone(), clock.now());

        let metrics_every = self.config.metrics.tick_secs.max(1);
        let scheduler_every = self.config.scheduler.tick_secs.max(1);
        let scheduler_period = Duration::from_secs(scheduler_every);
        let second = Duration::from_secs(1);

        let mut events = Vec::new();
        let mut snapshots = Vec::new();
        let mut summary = SimulationSummary {
            min_blink_rate_per_minute: session.metrics().state().blink_rate_per_minute,
            max_eye_strain_percent: session.metrics().state().eye_strain_percent,
            ..SimulationSummary::default()
        };

        let total_secs = plan.minutes.saturating_mul(60);
        for t in 1..=total_secs {
            clock.advance_secs(1);
            let now = clock.now();
            // Countdowns first so anything started this second gets its full length.
            let mut step = session.tick_countdowns(second, now, &mut noise);
            if t % metrics_every == 0 {
                step.extend(session.tick_metrics(now, &mut noise));
            }
            if t % scheduler_every == 0 {
                step.extend(session.tick_scheduler(scheduler_period, now));
            }

            if step.iter().any(|e| matches!(e, Event::ReminderShown { .. })) {
                match plan.response {
                    ReminderResponse::Accept => step.extend(session.start_break(now)),
                    ReminderResponse::Dismiss => step.extend(session.dismiss_reminder(now)),
                    ReminderResponse::Ignore => {}
                }
            }

            // Nobody is around to show host notifications.
            while session.take_notification().is_some() {}

            let state = session.metrics().state();
            summary.max_eye_strain_percent =
                summary.max_eye_strain_percent.max(state.eye_strain_percent);
            summary.min_blink_rate_per_minute =
                summary.min_blink_rate_per_minute.min(state.blink_rate_per_minute);
            tally(&mut summary, &step);
            events.extend(step);

            if plan.snapshot_every_minutes > 0 && t % (plan.snapshot_every_minutes * 60) == 0 {
                snapshots.push(session.snapshot(now));
            }
        }

        if snapshots.last().map(|s| s.at) != Some(clock.now()) {
            snapshots.push(session.snapshot(clock.now()));
        }
        summary.final_screen_time_minutes = session.metrics().state().screen_time_minutes;
        debug!(?summary, minutes = plan.minutes, "simulation finished");

        SimulationResult {
            plan: plan.clone(),
            snapshots,
            events,
            summary,
        }
    }
}

fn tally(summary: &mut SimulationSummary, events: &[Event]) {
    for event in events {
        match event {
            Event::ReminderShown { .. } => summary.reminders_shown += 1,
            Event::ReminderDismissed { reason, .. } => {
                if *reason == DismissReason::TimedOut {
                    summary.reminders_timed_out += 1;
                } else {
                    summary.reminders_dismissed += 1;
                }
            }
            Event::BreakStarted { .. } => summary.breaks_started += 1,
            Event::BreakEnded {
                reason: BreakEndReason::Completed,
                ..
            } => summary.breaks_completed += 1,
            Event::SuspendGapSkipped { .. } => summary.suspend_gaps += 1,
            Event::HydrationReminder { .. } => summary.hydration_reminders += 1,
            Event::StretchRoutine { .. } => summary.stretch_reminders += 1,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap()
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SeededNoise::from_seed(7);
        let mut b = SeededNoise::from_seed(7);
        for _ in 0..100 {
            assert_eq!(a.next_unit(), b.next_unit());
        }
    }

    #[test]
    fn symmetric_noise_is_bounded() {
        let mut noise = SeededNoise::from_seed(99);
        for _ in 0..10_000 {
            let n = noise.symmetric(3.0);
            assert!((-1.5..1.5).contains(&n));
        }
    }

    #[test]
    fn named_seeds_are_stable() {
        assert_eq!(
            SimulationSeed::from_string("monday"),
            SimulationSeed::from_string("monday")
        );
    }

    #[test]
    fn ignored_reminder_times_out_every_cycle() {
        let harness = SimulationHarness::new(SessionConfig::default(), start());
        let result = harness.run(&SimulationPlan {
            minutes: 30,
            ..SimulationPlan::default()
        });
        // Due at 18:00, times out at 18:30 and snoozes 5 minutes; the
        // minute ticks make it due again at 23:00 and 28:00.
        assert_eq!(result.summary.reminders_shown, 3);
        assert_eq!(result.summary.reminders_timed_out, 3);
        assert_eq!(result.summary.breaks_started, 0);
    }

    #[test]
    fn accepted_break_completes() {
        let harness = SimulationHarness::new(SessionConfig::default(), start());
        let result = harness.run(&SimulationPlan {
            minutes: 30,
            response: ReminderResponse::Accept,
            ..SimulationPlan::default()
        });
        assert_eq!(result.summary.reminders_shown, 1);
        assert_eq!(result.summary.breaks_started, 1);
        assert_eq!(result.summary.breaks_completed, 1);
        assert_eq!(result.snapshots.len(), 3);
    }

    #[test]
    fn simulation_is_reproducible() {
        let harness = SimulationHarness::new(SessionConfig::default(), start());
        let plan = SimulationPlan {
            minutes: 20,
            seed: SimulationSeed(5),
            ..SimulationPlan::default()
        };
        let a = harness.run(&plan);
        let b = harness.run(&plan);
        assert_eq!(a.summary, b.summary);
        assert_eq!(a.snapshots, b.snapshots);
    }

    #[test]
    fn wellness_reminders_recur_through_the_run() {
        let harness = SimulationHarness::new(SessionConfig::default(), start());
        let result = harness.run(&SimulationPlan {
            minutes: 125,
            response: ReminderResponse::Accept,
            ..SimulationPlan::default()
        });
        assert_eq!(result.summary.hydration_reminders, 2);
        assert_eq!(result.summary.stretch_reminders, 2);
    }
}
