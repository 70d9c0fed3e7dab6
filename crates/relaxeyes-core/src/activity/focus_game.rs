//! Focus dot game: follow and hit a dot that jumps around for a minute.

use serde::{Deserialize, Serialize};

use crate::simulation::NoiseSource;

const GAME_SECS: u32 = 60;
const MOVE_EVERY_SECS: u32 = 2;
/// Dot positions stay inside [MARGIN, 100 - MARGIN] percent of the field.
const MARGIN: f64 = 10.0;

/// Position as a percentage of the play field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DotPosition {
    pub x: f64,
    pub y: f64,
}

impl DotPosition {
    pub const CENTER: DotPosition = DotPosition { x: 50.0, y: 50.0 };

    fn random(noise: &mut dyn NoiseSource) -> Self {
        let span = 100.0 - 2.0 * MARGIN;
        Self {
            x: noise.next_unit() * span + MARGIN,
            y: noise.next_unit() * span + MARGIN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusGame {
    active: bool,
    time_left_secs: u32,
    elapsed_secs: u32,
    score: u32,
    dot: DotPosition,
}

impl Default for FocusGame {
    fn default() -> Self {
        Self {
            active: false,
            time_left_secs: GAME_SECS,
            elapsed_secs: 0,
            score: 0,
            dot: DotPosition::CENTER,
        }
    }
}

impl FocusGame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_left_secs(&self) -> u32 {
        self.time_left_secs
    }

    pub fn dot(&self) -> DotPosition {
        self.dot
    }

    pub fn start(&mut self) {
        *self = Self {
            active: true,
            dot: self.dot,
            ..Self::default()
        };
    }

    pub fn reset(&mut self) {
        *self = Self {
            dot: self.dot,
            ..Self::default()
        };
    }

    /// The player caught the dot. Only counts while the game runs.
    pub fn hit(&mut self, noise: &mut dyn NoiseSource) -> bool {
        if !self.active {
            return false;
        }
        self.score += 1;
        self.dot = DotPosition::random(noise);
        true
    }

    /// One second. Returns `true` when the dot moved.
    pub fn tick(&mut self, noise: &mut dyn NoiseSource) -> bool {
        if !self.active {
            return false;
        }
        self.elapsed_secs += 1;
        let moved = self.elapsed_secs % MOVE_EVERY_SECS == 0;
        if moved {
            self.dot = DotPosition::random(noise);
        }
        self.time_left_secs = self.time_left_secs.saturating_sub(1);
        if self.time_left_secs == 0 {
            self.active = false;
        }
        moved
    }
}
