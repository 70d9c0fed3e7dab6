//! The activity on screen during a break.
//!
//! A break shows one activity at a time. Switching starts the new one from
//! scratch; the timed ones (focus game, blinking) start as soon as they are
//! selected. Pausing the break pauses the activity with it.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{BlinkingExercise, BreathingGuide, BreathingLevel, FocusGame, Therapy};
use crate::error::ValidationError;
use crate::simulation::NoiseSource;

const SECOND: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityKind {
    #[default]
    Animations,
    Breathing,
    FocusGame,
    Blinking,
}

impl ActivityKind {
    pub const ALL: [ActivityKind; 4] = [
        ActivityKind::Animations,
        ActivityKind::Breathing,
        ActivityKind::FocusGame,
        ActivityKind::Blinking,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityKind::Animations => "animations",
            ActivityKind::Breathing => "breathing",
            ActivityKind::FocusGame => "focus-game",
            ActivityKind::Blinking => "blinking",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        ActivityKind::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| ValidationError::UnknownOption {
                kind: "activity",
                value: s.to_string(),
            })
    }
}

/// What a new break starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActivitySettings {
    pub default_activity: ActivityKind,
    pub breathing_level: BreathingLevel,
    pub therapy: Therapy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ActivityState {
    Animations { therapy: Therapy },
    Breathing(BreathingGuide),
    FocusGame(FocusGame),
    Blinking(BlinkingExercise),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakActivity {
    state: ActivityState,
    playing: bool,
    /// Elapsed time not yet spent on a whole-second step.
    #[serde(skip)]
    carry: Duration,
}

impl BreakActivity {
    pub fn new(kind: ActivityKind, settings: &ActivitySettings) -> Self {
        let state = match kind {
            ActivityKind::Animations => ActivityState::Animations {
                therapy: settings.therapy,
            },
            ActivityKind::Breathing => {
                ActivityState::Breathing(BreathingGuide::new(settings.breathing_level))
            }
            ActivityKind::FocusGame => {
                let mut game = FocusGame::new();
                game.start();
                ActivityState::FocusGame(game)
            }
            ActivityKind::Blinking => {
                let mut exercise = BlinkingExercise::new();
                exercise.start();
                ActivityState::Blinking(exercise)
            }
        };
        Self {
            state,
            playing: true,
            carry: Duration::ZERO,
        }
    }

    pub fn kind(&self) -> ActivityKind {
        match self.state {
            ActivityState::Animations { .. } => ActivityKind::Animations,
            ActivityState::Breathing(_) => ActivityKind::Breathing,
            ActivityState::FocusGame(_) => ActivityKind::FocusGame,
            ActivityState::Blinking(_) => ActivityKind::Blinking,
        }
    }

    pub fn state(&self) -> &ActivityState {
        &self.state
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
        match &mut self.state {
            ActivityState::Breathing(guide) => guide.set_playing(playing),
            ActivityState::Blinking(exercise) => exercise.set_playing(playing),
            ActivityState::Animations { .. } | ActivityState::FocusGame(_) => {}
        }
    }

    /// Advance by `elapsed`, one whole-second step at a time. Paused
    /// activities stand still and drop the time.
    pub fn tick(&mut self, elapsed: Duration, noise: &mut dyn NoiseSource) {
        if !self.playing {
            return;
        }
        self.carry += elapsed;
        while self.carry >= SECOND {
            self.carry -= SECOND;
            match &mut self.state {
                ActivityState::Animations { .. } => {}
                ActivityState::Breathing(guide) => {
                    guide.tick();
                }
                ActivityState::FocusGame(game) => {
                    game.tick(noise);
                }
                ActivityState::Blinking(exercise) => {
                    exercise.tick();
                }
            }
        }
    }

    /// The player caught the focus dot. `false` for any other activity, or
    /// while paused.
    pub fn hit(&mut self, noise: &mut dyn NoiseSource) -> bool {
        match &mut self.state {
            ActivityState::FocusGame(game) if self.playing => game.hit(noise),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::BreathPhase;
    use crate::simulation::FixedNoise;

    fn settings() -> ActivitySettings {
        ActivitySettings {
            default_activity: ActivityKind::Breathing,
            breathing_level: BreathingLevel::Intermediate,
            therapy: Therapy::Waves,
        }
    }

    #[test]
    fn kinds_parse_with_either_separator() {
        assert_eq!(
            "focus_game".parse::<ActivityKind>().unwrap(),
            ActivityKind::FocusGame
        );
        assert_eq!(
            "Focus-Game".parse::<ActivityKind>().unwrap(),
            ActivityKind::FocusGame
        );
        for kind in ActivityKind::ALL {
            assert_eq!(kind.to_string().parse::<ActivityKind>().unwrap(), kind);
        }
        assert!("juggling".parse::<ActivityKind>().is_err());
    }

    #[test]
    fn seeded_from_settings() {
        let breathing = BreakActivity::new(ActivityKind::Breathing, &settings());
        let ActivityState::Breathing(guide) = breathing.state() else {
            panic!("expected breathing, got {:?}", breathing.state());
        };
        assert_eq!(guide.level(), BreathingLevel::Intermediate);

        let animations = BreakActivity::new(ActivityKind::Animations, &settings());
        assert_eq!(
            animations.state(),
            &ActivityState::Animations {
                therapy: Therapy::Waves
            }
        );
    }

    #[test]
    fn timed_activities_start_on_selection() {
        let game = BreakActivity::new(ActivityKind::FocusGame, &settings());
        assert!(matches!(game.state(), ActivityState::FocusGame(g) if g.is_active()));
        let blinking = BreakActivity::new(ActivityKind::Blinking, &settings());
        assert!(matches!(blinking.state(), ActivityState::Blinking(b) if b.is_active()));
    }

    #[test]
    fn sub_second_ticks_carry_over() {
        let mut activity = BreakActivity::new(ActivityKind::Blinking, &settings());
        let mut noise = FixedNoise::midpoint();
        for _ in 0..4 {
            activity.tick(Duration::from_millis(750), &mut noise);
        }
        let ActivityState::Blinking(exercise) = activity.state() else {
            unreachable!()
        };
        assert_eq!(exercise.time_left_secs(), 57);
        assert_eq!(exercise.blink_count(), 1);
    }

    #[test]
    fn paused_activity_stands_still() {
        let mut activity = BreakActivity::new(ActivityKind::Breathing, &settings());
        let mut noise = FixedNoise::midpoint();
        activity.set_playing(false);
        activity.tick(Duration::from_secs(30), &mut noise);
        let ActivityState::Breathing(guide) = activity.state() else {
            unreachable!()
        };
        assert!(!guide.is_playing());
        assert_eq!(guide.phase(), BreathPhase::Inhale);
        assert_eq!(guide.count(), 4);

        activity.set_playing(true);
        activity.tick(Duration::from_secs(4), &mut noise);
        let ActivityState::Breathing(guide) = activity.state() else {
            unreachable!()
        };
        assert_eq!(guide.phase(), BreathPhase::Hold);
    }

    #[test]
    fn hits_only_count_in_a_running_focus_game() {
        let mut noise = FixedNoise::midpoint();
        let mut breathing = BreakActivity::new(ActivityKind::Breathing, &settings());
        assert!(!breathing.hit(&mut noise));

        let mut game = BreakActivity::new(ActivityKind::FocusGame, &settings());
        assert!(game.hit(&mut noise));
        game.set_playing(false);
        assert!(!game.hit(&mut noise));
        let ActivityState::FocusGame(g) = game.state() else {
            unreachable!()
        };
        assert_eq!(g.score(), 1);
    }

    #[test]
    fn serializes_with_kind_tag() {
        let activity = BreakActivity::new(ActivityKind::Animations, &settings());
        let json = serde_json::to_value(&activity).unwrap();
        assert_eq!(json["state"]["kind"], "animations");
        assert_eq!(json["state"]["therapy"], "waves");
        assert_eq!(json["playing"], true);
    }
}
