use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::ActivityKind;
use crate::session::{ActiveView, Notification, SessionSnapshot};

/// Every state change in the core produces an Event.
/// The presentation layer renders from them; the CLI prints them as JSON lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    MetricsUpdated {
        screen_time_minutes: f64,
        blink_rate_per_minute: f64,
        eye_strain_percent: f64,
        is_active: bool,
        at: DateTime<Utc>,
    },
    /// Time between two updates was too long to be real screen time
    /// (sleep, suspend, hidden tab) and was not counted.
    SuspendGapSkipped {
        gap_minutes: f64,
        at: DateTime<Utc>,
    },
    /// Focus or visibility changed whether the user is looking at the app.
    ActivityChanged {
        is_active: bool,
        at: DateTime<Utc>,
    },
    BreakDue {
        minutes_since_last_break: f64,
        at: DateTime<Utc>,
    },
    BreakTimerReset {
        minutes_until_break: f64,
        at: DateTime<Utc>,
    },
    BreakSnoozed {
        minutes: f64,
        at: DateTime<Utc>,
    },
    ReminderShown {
        timeout_secs: u64,
        at: DateTime<Utc>,
    },
    ReminderDismissed {
        reason: DismissReason,
        snooze_minutes: f64,
        at: DateTime<Utc>,
    },
    BreakStarted {
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    BreakEnded {
        reason: BreakEndReason,
        at: DateTime<Utc>,
    },
    BreakPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    BreakResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    ViewChanged {
        from: ActiveView,
        to: ActiveView,
        at: DateTime<Utc>,
    },
    /// Navigation is locked to the therapy view while a break runs.
    NavigationRejected {
        requested: ActiveView,
        at: DateTime<Utc>,
    },
    /// A break activity came on screen, at break start or by switching.
    ActivitySelected {
        activity: ActivityKind,
        at: DateTime<Utc>,
    },
    FocusDotHit {
        score: u32,
        at: DateTime<Utc>,
    },
    ExerciseCompleted {
        id: String,
        progress_percent: u32,
        at: DateTime<Utc>,
    },
    /// In-app hydration reminder, on demand or recurring.
    HydrationReminder {
        message: String,
        at: DateTime<Utc>,
    },
    StretchRoutine {
        steps: Vec<String>,
        at: DateTime<Utc>,
    },
    PostureTip {
        message: String,
        at: DateTime<Utc>,
    },
    NotificationRequested {
        notification: Notification,
    },
    StateSnapshot(SessionSnapshot),
}

/// Why a break reminder went away without a break being started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DismissReason {
    /// "Later" or the close button.
    User,
    /// Explicit "snooze N minutes".
    Snoozed,
    /// Nobody answered before the reminder timed out.
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakEndReason {
    /// The user left the break early.
    User,
    /// The break countdown ran out.
    Completed,
}

impl Event {
    /// Stable snake_case name of the variant, used for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::MetricsUpdated { .. } => "metrics_updated",
            Event::SuspendGapSkipped { .. } => "suspend_gap_skipped",
            Event::ActivityChanged { .. } => "activity_changed",
            Event::BreakDue { .. } => "break_due",
            Event::BreakTimerReset { .. } => "break_timer_reset",
            Event::BreakSnoozed { .. } => "break_snoozed",
            Event::ReminderShown { .. } => "reminder_shown",
            Event::ReminderDismissed { .. } => "reminder_dismissed",
            Event::BreakStarted { .. } => "break_started",
            Event::BreakEnded { .. } => "break_ended",
            Event::BreakPaused { .. } => "break_paused",
            Event::BreakResumed { .. } => "break_resumed",
            Event::ViewChanged { .. } => "view_changed",
            Event::NavigationRejected { .. } => "navigation_rejected",
            Event::ActivitySelected { .. } => "activity_selected",
            Event::FocusDotHit { .. } => "focus_dot_hit",
            Event::ExerciseCompleted { .. } => "exercise_completed",
            Event::HydrationReminder { .. } => "hydration_reminder",
            Event::StretchRoutine { .. } => "stretch_routine",
            Event::PostureTip { .. } => "posture_tip",
            Event::NotificationRequested { .. } => "notification_requested",
            Event::StateSnapshot(_) => "state_snapshot",
        }
    }
}
