use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Top-level screens the presentation layer can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveView {
    #[default]
    Dashboard,
    Therapy,
    Exercises,
    Health,
    Settings,
}

impl ActiveView {
    pub const ALL: [ActiveView; 5] = [
        ActiveView::Dashboard,
        ActiveView::Therapy,
        ActiveView::Exercises,
        ActiveView::Health,
        ActiveView::Settings,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActiveView::Dashboard => "dashboard",
            ActiveView::Therapy => "therapy",
            ActiveView::Exercises => "exercises",
            ActiveView::Health => "health",
            ActiveView::Settings => "settings",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ActiveView::Dashboard => "Dashboard",
            ActiveView::Therapy => "Vision Therapy",
            ActiveView::Exercises => "Eye Exercises",
            ActiveView::Health => "Health Monitor",
            ActiveView::Settings => "Settings",
        }
    }
}

impl fmt::Display for ActiveView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActiveView {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ActiveView::ALL
            .into_iter()
            .find(|v| v.as_str() == wanted)
            .ok_or_else(|| ValidationError::UnknownView(s.to_string()))
    }
}
