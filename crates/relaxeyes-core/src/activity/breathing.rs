//! Guided breathing: inhale, hold, exhale, repeat.
//!
//! The owner calls [`BreathingGuide::tick`] once per second while the guide
//! is on screen. Each phase lasts exactly as many ticks as the pattern says.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BreathingPattern {
    pub inhale_secs: u32,
    pub hold_secs: u32,
    pub exhale_secs: u32,
    pub name: &'static str,
}

impl BreathingPattern {
    pub fn cycle_secs(&self) -> u32 {
        self.inhale_secs + self.hold_secs + self.exhale_secs
    }

    fn phase_secs(&self, phase: BreathPhase) -> u32 {
        match phase {
            BreathPhase::Inhale => self.inhale_secs,
            BreathPhase::Hold => self.hold_secs,
            BreathPhase::Exhale => self.exhale_secs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreathingLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl BreathingLevel {
    pub fn pattern(self) -> BreathingPattern {
        match self {
            BreathingLevel::Beginner => BreathingPattern {
                inhale_secs: 4,
                hold_secs: 4,
                exhale_secs: 4,
                name: "Box Breathing (4-4-4)",
            },
            BreathingLevel::Intermediate => BreathingPattern {
                inhale_secs: 4,
                hold_secs: 7,
                exhale_secs: 8,
                name: "4-7-8 Technique",
            },
            BreathingLevel::Advanced => BreathingPattern {
                inhale_secs: 6,
                hold_secs: 6,
                exhale_secs: 12,
                name: "Deep Relaxation (6-6-12)",
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BreathingLevel::Beginner => "beginner",
            BreathingLevel::Intermediate => "intermediate",
            BreathingLevel::Advanced => "advanced",
        }
    }
}

impl fmt::Display for BreathingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BreathingLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(BreathingLevel::Beginner),
            "intermediate" => Ok(BreathingLevel::Intermediate),
            "advanced" => Ok(BreathingLevel::Advanced),
            _ => Err(ValidationError::UnknownOption {
                kind: "breathing level",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreathPhase {
    Inhale,
    Hold,
    Exhale,
}

impl BreathPhase {
    pub fn prompt(self) -> &'static str {
        match self {
            BreathPhase::Inhale => "Breathe In",
            BreathPhase::Hold => "Hold",
            BreathPhase::Exhale => "Breathe Out",
        }
    }

    fn next(self) -> Self {
        match self {
            BreathPhase::Inhale => BreathPhase::Hold,
            BreathPhase::Hold => BreathPhase::Exhale,
            BreathPhase::Exhale => BreathPhase::Inhale,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreathingGuide {
    level: BreathingLevel,
    phase: BreathPhase,
    /// Seconds left in the current phase, as displayed.
    count: u32,
    cycles: u32,
    playing: bool,
}

impl BreathingGuide {
    pub fn new(level: BreathingLevel) -> Self {
        Self {
            level,
            phase: BreathPhase::Inhale,
            count: level.pattern().inhale_secs,
            cycles: 0,
            playing: true,
        }
    }

    pub fn level(&self) -> BreathingLevel {
        self.level
    }

    pub fn pattern(&self) -> BreathingPattern {
        self.level.pattern()
    }

    pub fn phase(&self) -> BreathPhase {
        self.phase
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    /// Switching level starts over from the first inhale.
    pub fn set_level(&mut self, level: BreathingLevel) {
        *self = Self {
            playing: self.playing,
            ..Self::new(level)
        };
    }

    /// One second. Returns the new phase when the phase changes.
    pub fn tick(&mut self) -> Option<BreathPhase> {
        if !self.playing {
            return None;
        }
        if self.count > 1 {
            self.count -= 1;
            return None;
        }
        if self.phase == BreathPhase::Exhale {
            self.cycles += 1;
        }
        self.phase = self.phase.next();
        self.count = self.pattern().phase_secs(self.phase);
        Some(self.phase)
    }
}

impl Default for BreathingGuide {
    fn default() -> Self {
        Self::new(BreathingLevel::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_breathing_phase_lengths() {
        let mut guide = BreathingGuide::new(BreathingLevel::Beginner);
        let mut changes = Vec::new();
        for second in 1..=12 {
            if let Some(phase) = guide.tick() {
                changes.push((second, phase));
            }
        }
        assert_eq!(
            changes,
            vec![
                (4, BreathPhase::Hold),
                (8, BreathPhase::Exhale),
                (12, BreathPhase::Inhale),
            ]
        );
        assert_eq!(guide.cycles(), 1);
        assert_eq!(guide.count(), 4);
    }

    #[test]
    fn one_cycle_of_478_takes_19_seconds() {
        let mut guide = BreathingGuide::new(BreathingLevel::Intermediate);
        for _ in 0..18 {
            guide.tick();
        }
        assert_eq!(guide.cycles(), 0);
        guide.tick();
        assert_eq!(guide.cycles(), 1);
        assert_eq!(guide.pattern().cycle_secs(), 19);
    }

    #[test]
    fn changing_level_resets_progress() {
        let mut guide = BreathingGuide::new(BreathingLevel::Beginner);
        for _ in 0..30 {
            guide.tick();
        }
        guide.set_level(BreathingLevel::Advanced);
        assert_eq!(guide.phase(), BreathPhase::Inhale);
        assert_eq!(guide.count(), 6);
        assert_eq!(guide.cycles(), 0);
    }

    #[test]
    fn paused_guide_holds_still() {
        let mut guide = BreathingGuide::default();
        guide.set_playing(false);
        for _ in 0..10 {
            assert!(guide.tick().is_none());
        }
        assert_eq!(guide.count(), 4);
    }

    #[test]
    fn parses_levels() {
        assert_eq!(
            "Advanced".parse::<BreathingLevel>().unwrap(),
            BreathingLevel::Advanced
        );
        assert!("expert".parse::<BreathingLevel>().is_err());
    }
}
