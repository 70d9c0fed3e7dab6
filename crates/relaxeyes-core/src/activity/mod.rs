//! Guided activities shown during a break (breathing, blinking, the focus
//! dot game, calming animations), the exercise catalog, and the quick
//! wellness actions.

mod blinking;
mod break_activity;
mod breathing;
mod catalog;
mod focus_game;
mod wellness;

pub use blinking::BlinkingExercise;
pub use break_activity::{ActivityKind, ActivitySettings, ActivityState, BreakActivity};
pub use breathing::{BreathPhase, BreathingGuide, BreathingLevel, BreathingPattern};
pub use catalog::{find_exercise, Difficulty, Exercise, ExerciseLog, Therapy, EXERCISES};
pub use focus_game::{DotPosition, FocusGame};
pub use wellness::{
    posture_tip, WellnessIntervals, WellnessKind, WellnessReminders, HYDRATION_MESSAGE,
    MAX_WELLNESS_MINUTES, POSTURE_TIPS, STRETCH_ROUTINE,
};
