//! Session controller.
//!
//! Owns the metrics simulator and the break scheduler for one session and
//! decides what the user sees: nothing, a break reminder, or an active break.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> ReminderShown      scheduler raised "break due"
//! ReminderShown -> BreakActive   start_break
//! ReminderShown -> Idle      dismiss / snooze / reminder timed out (scheduler snoozed)
//! Idle -> BreakActive        start_break ("take a break now")
//! BreakActive -> Idle        end_break / break countdown finished (scheduler reset)
//! ```
//!
//! The reminder and the active break are one enum, so they can never be shown
//! together. While a break runs, navigation is locked to the therapy view and
//! one guided activity is on screen; it counts down and pauses with the break.
//!
//! Hydration and stretch reminders recur independently of the break cycle.

use std::collections::VecDeque;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::notification::{Notification, NotificationKind, NotificationPolicy};
use super::view::ActiveView;
use crate::activity::{
    posture_tip, ActivityKind, ActivitySettings, ActivityState, BreakActivity, ExerciseLog,
    WellnessIntervals, WellnessKind, WellnessReminders, HYDRATION_MESSAGE, STRETCH_ROUTINE,
};
use crate::error::ValidationError;
use crate::events::{BreakEndReason, DismissReason, Event};
use crate::metrics::{HealthSummary, MetricsConfig, MetricsReading, MetricsSimulator};
use crate::simulation::NoiseSource;
use crate::timer::{BreakScheduler, Countdown, SchedulerConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    ReminderShown,
    BreakActive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub scheduler: SchedulerConfig,
    pub metrics: MetricsConfig,
    /// Length of a break once started.
    pub break_duration_secs: u64,
    /// How long the reminder waits for an answer before dismissing itself.
    pub reminder_timeout_secs: u64,
    /// Snooze applied when the reminder is dismissed without an explicit
    /// snooze length.
    pub dismiss_snooze_minutes: f64,
    pub notifications: NotificationPolicy,
    pub activity: ActivitySettings,
    pub wellness: WellnessIntervals,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            scheduler: SchedulerConfig::default(),
            metrics: MetricsConfig::default(),
            break_duration_secs: 300,
            reminder_timeout_secs: 30,
            dismiss_snooze_minutes: 5.0,
            notifications: NotificationPolicy::default(),
            activity: ActivitySettings::default(),
            wellness: WellnessIntervals::default(),
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.scheduler.validate()?;
        self.metrics.validate()?;
        self.wellness.validate()?;
        if self.break_duration_secs == 0 {
            return Err(ValidationError::invalid(
                "break_duration_secs",
                "must be at least 1",
            ));
        }
        if self.reminder_timeout_secs == 0 {
            return Err(ValidationError::invalid(
                "reminder_timeout_secs",
                "must be at least 1",
            ));
        }
        if !(self.dismiss_snooze_minutes.is_finite() && self.dismiss_snooze_minutes >= 0.0) {
            return Err(ValidationError::invalid(
                "snooze_minutes",
                "must be zero or a positive number of minutes",
            ));
        }
        Ok(())
    }
}

/// Everything a view needs to render, in one serializable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub active_view: ActiveView,
    pub show_break_reminder: bool,
    pub is_break_active: bool,
    pub metrics: MetricsReading,
    pub minutes_until_break: f64,
    pub break_due: bool,
    pub last_break_at: DateTime<Utc>,
    pub reminder_remaining_secs: Option<u64>,
    pub break_remaining_secs: Option<u64>,
    pub break_paused: bool,
    /// The guided activity on screen; only during a break.
    pub activity: Option<BreakActivity>,
    pub hydration_remaining_secs: Option<u64>,
    pub stretch_remaining_secs: Option<u64>,
    pub exercises: ExerciseLog,
    pub exercise_progress_percent: u32,
    pub health: HealthSummary,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SessionController {
    config: SessionConfig,
    metrics: MetricsSimulator,
    scheduler: BreakScheduler,
    phase: SessionPhase,
    active_view: ActiveView,
    reminder: Countdown,
    break_countdown: Countdown,
    activity: Option<BreakActivity>,
    wellness: WellnessReminders,
    exercises: ExerciseLog,
    pending_notifications: VecDeque<Notification>,
}

impl SessionController {
    pub fn new(config: SessionConfig, now: DateTime<Utc>) -> Self {
        Self {
            metrics: MetricsSimulator::new(config.metrics.clone(), now),
            scheduler: BreakScheduler::new(config.scheduler.clone(), now),
            reminder: Countdown::from_secs(config.reminder_timeout_secs),
            break_countdown: Countdown::from_secs(config.break_duration_secs),
            phase: SessionPhase::Idle,
            active_view: ActiveView::Dashboard,
            activity: None,
            wellness: WellnessReminders::new(config.wellness),
            exercises: ExerciseLog::new(),
            pending_notifications: VecDeque::new(),
            config,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn active_view(&self) -> ActiveView {
        self.active_view
    }

    pub fn is_break_active(&self) -> bool {
        self.phase == SessionPhase::BreakActive
    }

    pub fn show_break_reminder(&self) -> bool {
        self.phase == SessionPhase::ReminderShown
    }

    pub fn metrics(&self) -> &MetricsSimulator {
        &self.metrics
    }

    pub fn scheduler(&self) -> &BreakScheduler {
        &self.scheduler
    }

    pub fn reminder_remaining_secs(&self) -> Option<u64> {
        self.show_break_reminder()
            .then(|| self.reminder.remaining_secs())
    }

    pub fn break_remaining_secs(&self) -> Option<u64> {
        self.is_break_active()
            .then(|| self.break_countdown.remaining_secs())
    }

    pub fn is_break_paused(&self) -> bool {
        self.is_break_active() && !self.break_countdown.is_running()
    }

    /// Views other than therapy are locked while a break runs.
    pub fn can_navigate_to(&self, view: ActiveView) -> bool {
        !self.is_break_active() || view == ActiveView::Therapy
    }

    /// The guided activity on screen during a break.
    pub fn activity(&self) -> Option<&BreakActivity> {
        self.activity.as_ref()
    }

    pub fn wellness(&self) -> &WellnessReminders {
        &self.wellness
    }

    pub fn exercises(&self) -> &ExerciseLog {
        &self.exercises
    }

    /// Oldest queued notification.
    pub fn pending_notification(&self) -> Option<&Notification> {
        self.pending_notifications.front()
    }

    /// Hand the oldest queued notification to the presentation layer.
    pub fn take_notification(&mut self) -> Option<Notification> {
        self.pending_notifications.pop_front()
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> SessionSnapshot {
        let metrics = self.metrics.state().reading();
        let timer = self.scheduler.state();
        SessionSnapshot {
            phase: self.phase,
            active_view: self.active_view,
            show_break_reminder: self.show_break_reminder(),
            is_break_active: self.is_break_active(),
            metrics,
            minutes_until_break: timer.minutes_until_break,
            break_due: timer.break_due,
            last_break_at: timer.last_break_at,
            reminder_remaining_secs: self.reminder_remaining_secs(),
            break_remaining_secs: self.break_remaining_secs(),
            break_paused: self.is_break_paused(),
            activity: self.activity.clone(),
            hydration_remaining_secs: self.wellness.remaining_secs(WellnessKind::Hydration),
            stretch_remaining_secs: self.wellness.remaining_secs(WellnessKind::Stretch),
            exercises: self.exercises.clone(),
            exercise_progress_percent: self.exercises.progress_percent(),
            health: HealthSummary::assess(&metrics),
            at: now,
        }
    }

    // ── Timers ───────────────────────────────────────────────────────

    pub fn tick_metrics(&mut self, now: DateTime<Utc>, noise: &mut dyn NoiseSource) -> Vec<Event> {
        self.metrics.tick(now, noise)
    }

    /// Advance the break countdown, then react to a newly due break.
    pub fn tick_scheduler(&mut self, elapsed: Duration, now: DateTime<Utc>) -> Vec<Event> {
        let mut events: Vec<Event> = self.scheduler.tick(elapsed, now).into_iter().collect();
        events.extend(self.observe(now));
        events
    }

    /// Advance the reminder timeout, the break activity and countdown, and
    /// the wellness reminders.
    pub fn tick_countdowns(
        &mut self,
        elapsed: Duration,
        now: DateTime<Utc>,
        noise: &mut dyn NoiseSource,
    ) -> Vec<Event> {
        let mut events = self.tick_reminder(elapsed, now);
        self.tick_activity(elapsed, noise);
        events.extend(self.tick_break(elapsed, now));
        events.extend(self.tick_wellness(elapsed, now));
        events
    }

    /// The activity only moves while the break countdown runs.
    pub fn tick_activity(&mut self, elapsed: Duration, noise: &mut dyn NoiseSource) {
        if !self.break_countdown.is_running() {
            return;
        }
        if let Some(activity) = self.activity.as_mut() {
            activity.tick(elapsed, noise);
        }
    }

    /// Recurring hydration and stretch reminders.
    pub fn tick_wellness(&mut self, elapsed: Duration, now: DateTime<Utc>) -> Vec<Event> {
        let mut events = Vec::new();
        for kind in self.wellness.tick(elapsed) {
            events.extend(match kind {
                WellnessKind::Hydration => self.hydration_events(now),
                WellnessKind::Stretch => self.stretch_events(true, now),
            });
        }
        events
    }

    /// An unanswered reminder dismisses itself when its timeout runs out.
    pub fn tick_reminder(&mut self, elapsed: Duration, now: DateTime<Utc>) -> Vec<Event> {
        if self.phase != SessionPhase::ReminderShown || !self.reminder.tick(elapsed) {
            return Vec::new();
        }
        let minutes = self.config.dismiss_snooze_minutes;
        self.hide_reminder(DismissReason::TimedOut, minutes, now)
    }

    /// The break ends itself when its countdown reaches zero.
    pub fn tick_break(&mut self, elapsed: Duration, now: DateTime<Utc>) -> Vec<Event> {
        if self.phase != SessionPhase::BreakActive || !self.break_countdown.tick(elapsed) {
            return Vec::new();
        }
        self.finish_break(BreakEndReason::Completed, now)
    }

    /// Show the reminder if the scheduler says a break is due and nothing
    /// else is on screen.
    pub fn observe(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        if self.phase != SessionPhase::Idle || !self.scheduler.is_break_due() {
            return Vec::new();
        }
        self.phase = SessionPhase::ReminderShown;
        self.reminder.start();
        info!(timeout_secs = self.config.reminder_timeout_secs, "break reminder shown");

        let mut events = vec![Event::ReminderShown {
            timeout_secs: self.config.reminder_timeout_secs,
            at: now,
        }];
        events.extend(self.notify(Notification::break_due(now)));
        events
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Accept the reminder, or take a break unprompted from `Idle`.
    pub fn start_break(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        if self.phase == SessionPhase::BreakActive {
            return Vec::new();
        }
        self.phase = SessionPhase::BreakActive;
        self.reminder.reset();
        self.drop_notifications(NotificationKind::BreakDue);
        self.break_countdown.start();
        let kind = self.config.activity.default_activity;
        self.activity = Some(BreakActivity::new(kind, &self.config.activity));
        info!(duration_secs = self.config.break_duration_secs, activity = %kind, "break started");

        let mut events = vec![Event::BreakStarted {
            duration_secs: self.config.break_duration_secs,
            at: now,
        }];
        events.extend(self.switch_view(ActiveView::Therapy, now));
        events.push(Event::ActivitySelected {
            activity: kind,
            at: now,
        });
        events
    }

    /// Leave the break early. No-op outside a break.
    pub fn end_break(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        if self.phase != SessionPhase::BreakActive {
            return Vec::new();
        }
        self.finish_break(BreakEndReason::User, now)
    }

    /// "Later": hide the reminder and snooze the default amount. No-op
    /// unless the reminder is showing.
    pub fn dismiss_reminder(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        if self.phase != SessionPhase::ReminderShown {
            return Vec::new();
        }
        let minutes = self.config.dismiss_snooze_minutes;
        self.hide_reminder(DismissReason::User, minutes, now)
    }

    /// Push the next break `minutes` out. Hides a showing reminder; ignored
    /// during a break.
    pub fn snooze(&mut self, minutes: f64, now: DateTime<Utc>) -> Vec<Event> {
        match self.phase {
            SessionPhase::ReminderShown => self.hide_reminder(DismissReason::Snoozed, minutes, now),
            SessionPhase::Idle => vec![self.scheduler.snooze(minutes, now)],
            SessionPhase::BreakActive => Vec::new(),
        }
    }

    /// Navigate. Returns `None` when already there; a rejected request leaves
    /// the view unchanged and reports `NavigationRejected`.
    pub fn set_active_view(&mut self, view: ActiveView, now: DateTime<Utc>) -> Option<Event> {
        if !self.can_navigate_to(view) {
            warn!(requested = %view, "navigation locked during break");
            return Some(Event::NavigationRejected {
                requested: view,
                at: now,
            });
        }
        self.switch_view(view, now)
    }

    /// Pause the break countdown and its activity together.
    pub fn pause_break(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if !self.is_break_active() || !self.break_countdown.pause() {
            return None;
        }
        if let Some(activity) = self.activity.as_mut() {
            activity.set_playing(false);
        }
        Some(Event::BreakPaused {
            remaining_secs: self.break_countdown.remaining_secs(),
            at: now,
        })
    }

    pub fn resume_break(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if !self.is_break_active() || !self.break_countdown.resume() {
            return None;
        }
        if let Some(activity) = self.activity.as_mut() {
            activity.set_playing(true);
        }
        Some(Event::BreakResumed {
            remaining_secs: self.break_countdown.remaining_secs(),
            at: now,
        })
    }

    /// Switch the break activity. Returns `None` outside a break or when
    /// `kind` is already on screen. A paused break keeps the new activity
    /// paused.
    pub fn select_activity(&mut self, kind: ActivityKind, now: DateTime<Utc>) -> Option<Event> {
        if !self.is_break_active() || self.activity.as_ref().map(BreakActivity::kind) == Some(kind)
        {
            return None;
        }
        let mut activity = BreakActivity::new(kind, &self.config.activity);
        activity.set_playing(self.break_countdown.is_running());
        self.activity = Some(activity);
        info!(activity = %kind, "break activity selected");
        Some(Event::ActivitySelected {
            activity: kind,
            at: now,
        })
    }

    /// The player caught the focus dot. `None` unless a focus game is
    /// running.
    pub fn hit_focus_dot(
        &mut self,
        now: DateTime<Utc>,
        noise: &mut dyn NoiseSource,
    ) -> Option<Event> {
        let activity = self.activity.as_mut()?;
        if !activity.hit(noise) {
            return None;
        }
        let ActivityState::FocusGame(game) = activity.state() else {
            return None;
        };
        Some(Event::FocusDotHit {
            score: game.score(),
            at: now,
        })
    }

    /// Mark a catalog exercise done for this session. `Ok(None)` when it
    /// was already done.
    pub fn complete_exercise(
        &mut self,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Event>, ValidationError> {
        if !self.exercises.mark_complete(id)? {
            return Ok(None);
        }
        let progress_percent = self.exercises.progress_percent();
        info!(exercise = id, progress_percent, "exercise completed");
        Ok(Some(Event::ExerciseCompleted {
            id: id.to_string(),
            progress_percent,
            at: now,
        }))
    }

    /// Quick action: remind the user to drink water now. The in-app reminder
    /// always shows; the host notification needs permission. Restarts the
    /// recurring hydration interval.
    pub fn request_hydration_reminder(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        self.wellness.restart(WellnessKind::Hydration);
        self.hydration_events(now)
    }

    /// Quick action: show the stretch routine. Restarts the recurring stretch
    /// interval.
    pub fn stretch_routine(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        self.wellness.restart(WellnessKind::Stretch);
        self.stretch_events(false, now)
    }

    /// Quick action: simulated posture check.
    pub fn posture_check(&mut self, now: DateTime<Utc>, noise: &mut dyn NoiseSource) -> Event {
        let message = posture_tip(noise);
        debug!(message, "posture check");
        Event::PostureTip {
            message: message.to_string(),
            at: now,
        }
    }

    pub fn on_focus_change(&mut self, focused: bool, now: DateTime<Utc>) -> Vec<Event> {
        self.metrics.on_focus_change(focused, now)
    }

    pub fn on_visibility_change(&mut self, visible: bool, now: DateTime<Utc>) -> Vec<Event> {
        self.metrics.on_visibility_change(visible, now)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn hide_reminder(
        &mut self,
        reason: DismissReason,
        snooze_minutes: f64,
        now: DateTime<Utc>,
    ) -> Vec<Event> {
        self.phase = SessionPhase::Idle;
        self.reminder.reset();
        self.drop_notifications(NotificationKind::BreakDue);
        info!(?reason, snooze_minutes, "break reminder dismissed");
        vec![
            Event::ReminderDismissed {
                reason,
                snooze_minutes,
                at: now,
            },
            self.scheduler.snooze(snooze_minutes, now),
        ]
    }

    fn finish_break(&mut self, reason: BreakEndReason, now: DateTime<Utc>) -> Vec<Event> {
        self.phase = SessionPhase::Idle;
        self.break_countdown.reset();
        self.activity = None;
        info!(?reason, "break ended");
        let mut events = vec![
            Event::BreakEnded { reason, at: now },
            self.scheduler.reset(now),
        ];
        events.extend(self.switch_view(ActiveView::Dashboard, now));
        events
    }

    fn hydration_events(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        info!("hydration reminder");
        let mut events = vec![Event::HydrationReminder {
            message: HYDRATION_MESSAGE.to_string(),
            at: now,
        }];
        events.extend(self.notify(Notification::hydration(now)));
        events
    }

    /// `recurring` reminders also go to the host; the on-demand routine is
    /// only shown in the app.
    fn stretch_events(&mut self, recurring: bool, now: DateTime<Utc>) -> Vec<Event> {
        info!(recurring, "stretch routine");
        let mut events = vec![Event::StretchRoutine {
            steps: STRETCH_ROUTINE.iter().map(|s| s.to_string()).collect(),
            at: now,
        }];
        if recurring {
            events.extend(self.notify(Notification::stretch(now)));
        }
        events
    }

    /// Queue a host notification if the policy allows it.
    fn notify(&mut self, notification: Notification) -> Option<Event> {
        if !self.config.notifications.allows() {
            debug!(kind = ?notification.kind, "notification suppressed");
            return None;
        }
        self.pending_notifications.push_back(notification.clone());
        Some(Event::NotificationRequested { notification })
    }

    fn drop_notifications(&mut self, kind: NotificationKind) {
        self.pending_notifications.retain(|n| n.kind != kind);
    }

    fn switch_view(&mut self, to: ActiveView, now: DateTime<Utc>) -> Option<Event> {
        if self.active_view == to {
            return None;
        }
        let from = std::mem::replace(&mut self.active_view, to);
        info!(%from, %to, "view changed");
        Some(Event::ViewChanged { from, to, at: now })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::FixedNoise;

    const SECOND: Duration = Duration::from_secs(1);

    fn due_controller() -> (SessionController, DateTime<Utc>) {
        let now = Utc::now();
        let mut c = SessionController::new(SessionConfig::default(), now);
        c.tick_scheduler(Duration::from_secs(18 * 60), now);
        (c, now)
    }

    #[test]
    fn starts_idle_on_dashboard() {
        let c = SessionController::new(SessionConfig::default(), Utc::now());
        assert_eq!(c.phase(), SessionPhase::Idle);
        assert_eq!(c.active_view(), ActiveView::Dashboard);
        assert!(!c.show_break_reminder());
        assert!(!c.is_break_active());
    }

    #[test]
    fn due_break_shows_reminder_and_queues_notification() {
        let (mut c, _) = due_controller();
        assert_eq!(c.phase(), SessionPhase::ReminderShown);
        assert_eq!(c.reminder_remaining_secs(), Some(30));
        assert!(c.take_notification().is_some());
        assert!(c.take_notification().is_none());
    }

    #[test]
    fn denied_permission_is_silent() {
        let now = Utc::now();
        let config = SessionConfig {
            notifications: NotificationPolicy {
                enabled: true,
                permission: crate::session::NotificationPermission::Denied,
            },
            ..SessionConfig::default()
        };
        let mut c = SessionController::new(config, now);
        let events = c.tick_scheduler(Duration::from_secs(18 * 60), now);
        assert_eq!(c.phase(), SessionPhase::ReminderShown);
        assert!(c.pending_notification().is_none());
        assert!(!events
            .iter()
            .any(|e| matches!(e, Event::NotificationRequested { .. })));
    }

    #[test]
    fn reminder_times_out_into_snooze() {
        let (mut c, now) = due_controller();
        let mut noise = FixedNoise::midpoint();
        for _ in 0..29 {
            assert!(c.tick_countdowns(SECOND, now, &mut noise).is_empty());
        }
        let events = c.tick_countdowns(SECOND, now, &mut noise);
        assert!(matches!(
            events[0],
            Event::ReminderDismissed {
                reason: DismissReason::TimedOut,
                ..
            }
        ));
        assert_eq!(c.phase(), SessionPhase::Idle);
        assert_eq!(c.scheduler().minutes_until_break(), 5.0);
    }

    #[test]
    fn explicit_snooze_hides_reminder() {
        let (mut c, now) = due_controller();
        c.snooze(10.0, now);
        assert_eq!(c.phase(), SessionPhase::Idle);
        assert_eq!(c.scheduler().minutes_until_break(), 10.0);
        assert!(!c.scheduler().is_break_due());
    }

    #[test]
    fn snooze_is_ignored_during_break() {
        let (mut c, now) = due_controller();
        c.start_break(now);
        assert!(c.snooze(10.0, now).is_empty());
        assert!(c.is_break_active());
    }

    #[test]
    fn break_completes_on_its_own() {
        let (mut c, now) = due_controller();
        c.start_break(now);
        assert_eq!(c.break_remaining_secs(), Some(300));
        let mut noise = FixedNoise::midpoint();
        c.tick_countdowns(Duration::from_secs(299), now, &mut noise);
        assert!(c.is_break_active());
        let events = c.tick_countdowns(SECOND, now, &mut noise);
        assert!(matches!(
            events[0],
            Event::BreakEnded {
                reason: BreakEndReason::Completed,
                ..
            }
        ));
        assert_eq!(c.phase(), SessionPhase::Idle);
        assert_eq!(c.active_view(), ActiveView::Dashboard);
        assert_eq!(c.scheduler().minutes_until_break(), 20.0);
    }

    #[test]
    fn paused_break_does_not_count_down() {
        let (mut c, now) = due_controller();
        c.start_break(now);
        assert!(c.pause_break(now).is_some());
        assert!(c.is_break_paused());
        c.tick_countdowns(Duration::from_secs(600), now, &mut FixedNoise::midpoint());
        assert!(c.is_break_active());
        assert!(c.resume_break(now).is_some());
        assert_eq!(c.break_remaining_secs(), Some(300));
    }

    #[test]
    fn navigation_locked_to_therapy_during_break() {
        let (mut c, now) = due_controller();
        c.start_break(now);
        let rejected = c.set_active_view(ActiveView::Settings, now);
        assert!(matches!(rejected, Some(Event::NavigationRejected { .. })));
        assert_eq!(c.active_view(), ActiveView::Therapy);
        assert!(c.set_active_view(ActiveView::Therapy, now).is_none());
    }

    #[test]
    fn navigation_is_free_when_idle() {
        let now = Utc::now();
        let mut c = SessionController::new(SessionConfig::default(), now);
        let event = c.set_active_view(ActiveView::Health, now);
        assert!(matches!(
            event,
            Some(Event::ViewChanged {
                from: ActiveView::Dashboard,
                to: ActiveView::Health,
                ..
            })
        ));
    }

    #[test]
    fn quick_break_from_idle() {
        let now = Utc::now();
        let mut c = SessionController::new(SessionConfig::default(), now);
        c.start_break(now);
        assert!(c.is_break_active());
        assert_eq!(c.active_view(), ActiveView::Therapy);
        assert!(c.start_break(now).is_empty());
    }

    #[test]
    fn reminder_not_shown_while_break_runs() {
        let now = Utc::now();
        let config = SessionConfig {
            scheduler: SchedulerConfig {
                time_scale: 10.0,
                ..SchedulerConfig::default()
            },
            ..SessionConfig::default()
        };
        let mut c = SessionController::new(config, now);
        c.start_break(now);
        c.tick_scheduler(Duration::from_secs(120), now);
        assert!(c.scheduler().is_break_due());
        assert_eq!(c.phase(), SessionPhase::BreakActive);

        c.end_break(now);
        assert!(!c.scheduler().is_break_due());
        assert!(c.observe(now).is_empty());
    }

    #[test]
    fn snapshot_reflects_state() {
        let (mut c, now) = due_controller();
        c.tick_metrics(now, &mut FixedNoise::midpoint());
        let snap = c.snapshot(now);
        assert!(snap.show_break_reminder);
        assert!(!snap.is_break_active);
        assert_eq!(snap.minutes_until_break, 20.0);
        assert!(snap.break_due);
        assert_eq!(snap.reminder_remaining_secs, Some(30));
        assert_eq!(snap.break_remaining_secs, None);
    }

    #[test]
    fn default_config_is_valid() {
        assert!(SessionConfig::default().validate().is_ok());
        let bad = SessionConfig {
            break_duration_secs: 0,
            ..SessionConfig::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn break_starts_with_configured_activity() {
        let now = Utc::now();
        let config = SessionConfig {
            activity: ActivitySettings {
                default_activity: ActivityKind::Breathing,
                breathing_level: crate::activity::BreathingLevel::Advanced,
                ..ActivitySettings::default()
            },
            ..SessionConfig::default()
        };
        let mut c = SessionController::new(config, now);
        assert!(c.activity().is_none());

        let events = c.start_break(now);
        assert!(events.iter().any(|e| matches!(
            e,
            Event::ActivitySelected {
                activity: ActivityKind::Breathing,
                ..
            }
        )));
        let Some(ActivityState::Breathing(guide)) = c.activity().map(BreakActivity::state) else {
            panic!("expected a breathing guide");
        };
        assert_eq!(guide.count(), 6);

        c.end_break(now);
        assert!(c.activity().is_none());
        assert!(c.snapshot(now).activity.is_none());
    }

    #[test]
    fn activity_ticks_and_pauses_with_the_break() {
        let now = Utc::now();
        let mut c = SessionController::new(SessionConfig::default(), now);
        let mut noise = FixedNoise::midpoint();
        c.start_break(now);
        assert!(c.select_activity(ActivityKind::Blinking, now).is_some());
        assert!(c.select_activity(ActivityKind::Blinking, now).is_none());

        c.tick_countdowns(Duration::from_secs(6), now, &mut noise);
        let blink_count = |c: &SessionController| match c.activity().map(BreakActivity::state) {
            Some(ActivityState::Blinking(exercise)) => exercise.blink_count(),
            other => panic!("expected blinking, got {other:?}"),
        };
        assert_eq!(blink_count(&c), 2);

        c.pause_break(now);
        assert!(!c.activity().unwrap().is_playing());
        c.tick_countdowns(Duration::from_secs(30), now, &mut noise);
        assert_eq!(blink_count(&c), 2);

        c.resume_break(now);
        assert!(c.activity().unwrap().is_playing());
        c.tick_countdowns(Duration::from_secs(3), now, &mut noise);
        assert_eq!(blink_count(&c), 3);
    }

    #[test]
    fn switching_while_paused_keeps_activity_paused() {
        let now = Utc::now();
        let mut c = SessionController::new(SessionConfig::default(), now);
        c.start_break(now);
        c.pause_break(now);
        c.select_activity(ActivityKind::FocusGame, now);
        let activity = c.activity().unwrap();
        assert_eq!(activity.kind(), ActivityKind::FocusGame);
        assert!(!activity.is_playing());
        assert!(c.hit_focus_dot(now, &mut FixedNoise::midpoint()).is_none());

        c.resume_break(now);
        let hit = c.hit_focus_dot(now, &mut FixedNoise::midpoint());
        assert!(matches!(hit, Some(Event::FocusDotHit { score: 1, .. })));
    }

    #[test]
    fn activity_selection_needs_a_break() {
        let now = Utc::now();
        let mut c = SessionController::new(SessionConfig::default(), now);
        assert!(c.select_activity(ActivityKind::Breathing, now).is_none());
        assert!(c.hit_focus_dot(now, &mut FixedNoise::midpoint()).is_none());
        assert!(c.activity().is_none());
    }

    #[test]
    fn snapshot_reports_activity() {
        let now = Utc::now();
        let mut c = SessionController::new(SessionConfig::default(), now);
        c.start_break(now);
        let snap = c.snapshot(now);
        assert_eq!(
            snap.activity.as_ref().map(BreakActivity::kind),
            Some(ActivityKind::Animations)
        );
        assert_eq!(snap.hydration_remaining_secs, Some(3600));
    }

    #[test]
    fn hydration_reminder_queues_notification_when_allowed() {
        let now = Utc::now();
        let mut c = SessionController::new(SessionConfig::default(), now);
        let events = c.request_hydration_reminder(now);
        assert!(matches!(events[0], Event::HydrationReminder { .. }));
        assert!(matches!(events[1], Event::NotificationRequested { .. }));
        let notification = c.take_notification().unwrap();
        assert_eq!(notification.kind, NotificationKind::Hydration);
    }

    #[test]
    fn hydration_reminder_without_permission_stays_in_app() {
        let now = Utc::now();
        let config = SessionConfig {
            notifications: NotificationPolicy {
                enabled: true,
                permission: crate::session::NotificationPermission::Denied,
            },
            ..SessionConfig::default()
        };
        let mut c = SessionController::new(config, now);
        let events = c.request_hydration_reminder(now);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Event::HydrationReminder { .. }));
        assert!(c.pending_notification().is_none());
    }

    #[test]
    fn wellness_reminders_recur() {
        let now = Utc::now();
        let config = SessionConfig {
            wellness: WellnessIntervals {
                hydration_minutes: 30,
                stretch_minutes: 0,
            },
            ..SessionConfig::default()
        };
        let mut c = SessionController::new(config, now);
        let mut noise = FixedNoise::midpoint();
        let mut reminders = 0;
        for _ in 0..60 {
            let events = c.tick_countdowns(Duration::from_secs(60), now, &mut noise);
            reminders += events
                .iter()
                .filter(|e| matches!(e, Event::HydrationReminder { .. }))
                .count();
        }
        assert_eq!(reminders, 2);
        assert_eq!(c.snapshot(now).stretch_remaining_secs, None);
    }

    #[test]
    fn manual_stretch_restarts_interval_without_notifying() {
        let now = Utc::now();
        let mut c = SessionController::new(SessionConfig::default(), now);
        c.tick_wellness(Duration::from_secs(50 * 60), now);
        let events = c.stretch_routine(now);
        assert_eq!(events.len(), 1);
        let Event::StretchRoutine { steps, .. } = &events[0] else {
            panic!("expected stretch routine");
        };
        assert_eq!(steps.len(), 4);
        assert!(c.pending_notification().is_none());
        assert_eq!(c.wellness().remaining_secs(WellnessKind::Stretch), Some(3600));
    }

    #[test]
    fn recurring_stretch_notifies() {
        let now = Utc::now();
        let mut c = SessionController::new(SessionConfig::default(), now);
        c.tick_wellness(Duration::from_secs(3600), now);
        let kinds: Vec<_> = std::iter::from_fn(|| c.take_notification())
            .map(|n| n.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![NotificationKind::Hydration, NotificationKind::Stretch]
        );
    }

    #[test]
    fn posture_check_picks_a_tip() {
        let now = Utc::now();
        let mut c = SessionController::new(SessionConfig::default(), now);
        let event = c.posture_check(now, &mut FixedNoise::new(0.0));
        assert!(matches!(
            event,
            Event::PostureTip { ref message, .. } if message == crate::activity::POSTURE_TIPS[0]
        ));
    }

    #[test]
    fn accepting_reminder_drops_only_the_break_notification() {
        let (mut c, now) = due_controller();
        c.request_hydration_reminder(now);
        c.start_break(now);
        let remaining: Vec<_> = std::iter::from_fn(|| c.take_notification())
            .map(|n| n.kind)
            .collect();
        assert_eq!(remaining, vec![NotificationKind::Hydration]);
    }

    #[test]
    fn completed_exercises_show_in_snapshot() {
        let now = Utc::now();
        let mut c = SessionController::new(SessionConfig::default(), now);
        let event = c.complete_exercise("palming", now).unwrap();
        assert!(matches!(
            event,
            Some(Event::ExerciseCompleted {
                progress_percent: 16,
                ..
            })
        ));
        assert!(c.complete_exercise("palming", now).unwrap().is_none());
        assert!(c.complete_exercise("cartwheel", now).is_err());

        let snap = c.snapshot(now);
        assert!(snap.exercises.is_complete("palming"));
        assert_eq!(snap.exercise_progress_percent, 16);
    }
}
