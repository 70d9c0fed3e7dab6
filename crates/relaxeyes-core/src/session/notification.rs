//! Host notifications as declarative state.
//!
//! The core never shows anything itself. Break reminders and the wellness
//! reminders may queue a [`Notification`] for the presentation layer to pick
//! up with `take_notification`. Missing permission means nothing is queued;
//! the in-app reminder still works.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::activity::{HYDRATION_MESSAGE, STRETCH_ROUTINE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPermission {
    #[default]
    Granted,
    Denied,
    /// The user has not answered the permission prompt yet.
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPolicy {
    pub enabled: bool,
    pub permission: NotificationPermission,
}

impl Default for NotificationPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            permission: NotificationPermission::Granted,
        }
    }
}

impl NotificationPolicy {
    pub fn allows(&self) -> bool {
        self.enabled && self.permission == NotificationPermission::Granted
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    BreakDue,
    Hydration,
    Stretch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    fn new(kind: NotificationKind, title: &str, body: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            title: title.into(),
            body,
            created_at: now,
        }
    }

    pub fn break_due(now: DateTime<Utc>) -> Self {
        Self::new(
            NotificationKind::BreakDue,
            "Time for a Break!",
            "20-20-20 rule: look at something 20 feet away for 20 seconds.".into(),
            now,
        )
    }

    pub fn hydration(now: DateTime<Utc>) -> Self {
        Self::new(
            NotificationKind::Hydration,
            "Hydration Reminder",
            HYDRATION_MESSAGE.into(),
            now,
        )
    }

    pub fn stretch(now: DateTime<Utc>) -> Self {
        Self::new(
            NotificationKind::Stretch,
            "Quick Stretch Routine",
            STRETCH_ROUTINE.join("; "),
            now,
        )
    }
}
