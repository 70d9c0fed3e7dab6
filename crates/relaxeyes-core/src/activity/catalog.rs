//! Relaxation therapies and the eye-exercise catalog with completion tracking.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Therapy {
    #[default]
    Spiral,
    Waves,
    Breathing,
    Colors,
    Focus,
}

impl Therapy {
    pub const ALL: [Therapy; 5] = [
        Therapy::Spiral,
        Therapy::Waves,
        Therapy::Breathing,
        Therapy::Colors,
        Therapy::Focus,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Therapy::Spiral => "spiral",
            Therapy::Waves => "waves",
            Therapy::Breathing => "breathing",
            Therapy::Colors => "colors",
            Therapy::Focus => "focus",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Therapy::Spiral => "Hypnotic Spiral",
            Therapy::Waves => "Ocean Waves",
            Therapy::Breathing => "Breathing Circle",
            Therapy::Colors => "Color Therapy",
            Therapy::Focus => "Focus Dot",
        }
    }
}

impl fmt::Display for Therapy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Therapy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Therapy::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| ValidationError::UnknownOption {
                kind: "therapy",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Exercise {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub duration_minutes: u32,
    pub difficulty: Difficulty,
}

pub static EXERCISES: [Exercise; 6] = [
    Exercise {
        id: "blinking",
        title: "Conscious Blinking",
        description: "Blink slowly and fully to spread tears across the eye.",
        duration_minutes: 2,
        difficulty: Difficulty::Easy,
    },
    Exercise {
        id: "figure-eight",
        title: "Figure-8 Tracking",
        description: "Trace a large sideways eight with your eyes.",
        duration_minutes: 3,
        difficulty: Difficulty::Medium,
    },
    Exercise {
        id: "focus-shift",
        title: "Near-Far Focus",
        description: "Alternate focus between a near object and a distant one.",
        duration_minutes: 5,
        difficulty: Difficulty::Easy,
    },
    Exercise {
        id: "palming",
        title: "Palming Relaxation",
        description: "Cup warm palms over closed eyes and breathe slowly.",
        duration_minutes: 5,
        difficulty: Difficulty::Easy,
    },
    Exercise {
        id: "eye-rolls",
        title: "Eye Rolling",
        description: "Roll your eyes in slow circles, both directions.",
        duration_minutes: 2,
        difficulty: Difficulty::Easy,
    },
    Exercise {
        id: "convergence",
        title: "Convergence Training",
        description: "Follow a fingertip toward your nose while keeping it single.",
        duration_minutes: 3,
        difficulty: Difficulty::Hard,
    },
];

pub fn find_exercise(id: &str) -> Result<&'static Exercise, ValidationError> {
    EXERCISES
        .iter()
        .find(|e| e.id == id)
        .ok_or_else(|| ValidationError::UnknownOption {
            kind: "exercise",
            value: id.to_string(),
        })
}

/// Exercises completed in the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseLog {
    completed: BTreeSet<String>,
}

impl ExerciseLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `Ok(false)` when the exercise was already complete.
    pub fn mark_complete(&mut self, id: &str) -> Result<bool, ValidationError> {
        let exercise = find_exercise(id)?;
        Ok(self.completed.insert(exercise.id.to_string()))
    }

    pub fn is_complete(&self, id: &str) -> bool {
        self.completed.contains(id)
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    pub fn progress_percent(&self) -> u32 {
        (self.completed.len() * 100 / EXERCISES.len()) as u32
    }

    pub fn total_minutes(&self) -> u32 {
        EXERCISES
            .iter()
            .filter(|e| self.is_complete(e.id))
            .map(|e| e.duration_minutes)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn therapy_round_trip() {
        for therapy in Therapy::ALL {
            assert_eq!(therapy.as_str().parse::<Therapy>().unwrap(), therapy);
        }
        assert_eq!(" Waves ".parse::<Therapy>().unwrap(), Therapy::Waves);
        assert!("disco".parse::<Therapy>().is_err());
    }

    #[test]
    fn catalog_is_unique() {
        let ids: BTreeSet<_> = EXERCISES.iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), EXERCISES.len());
        assert_eq!(find_exercise("palming").unwrap().duration_minutes, 5);
    }

    #[test]
    fn completion_counts_once() {
        let mut log = ExerciseLog::new();
        assert!(log.mark_complete("blinking").unwrap());
        assert!(!log.mark_complete("blinking").unwrap());
        assert_eq!(log.completed_count(), 1);
        assert_eq!(log.progress_percent(), 16);
        log.mark_complete("convergence").unwrap();
        log.mark_complete("palming").unwrap();
        assert_eq!(log.progress_percent(), 50);
        assert_eq!(log.total_minutes(), 10);
    }

    #[test]
    fn unknown_exercise_is_rejected() {
        let mut log = ExerciseLog::new();
        assert!(log.mark_complete("jumping-jacks").is_err());
        assert_eq!(log.completed_count(), 0);
    }
}
