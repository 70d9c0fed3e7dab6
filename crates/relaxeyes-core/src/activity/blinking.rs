//! Timed blinking exercise: one blink cue every few seconds for a minute.

use serde::{Deserialize, Serialize};

const SESSION_SECS: u32 = 60;
const CUE_EVERY_SECS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlinkingExercise {
    active: bool,
    playing: bool,
    time_left_secs: u32,
    elapsed_secs: u32,
    blink_count: u32,
}

impl Default for BlinkingExercise {
    fn default() -> Self {
        Self {
            active: false,
            playing: true,
            time_left_secs: SESSION_SECS,
            elapsed_secs: 0,
            blink_count: 0,
        }
    }
}

impl BlinkingExercise {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn time_left_secs(&self) -> u32 {
        self.time_left_secs
    }

    pub fn blink_count(&self) -> u32 {
        self.blink_count
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    pub fn start(&mut self) {
        *self = Self {
            active: true,
            playing: self.playing,
            ..Self::default()
        };
    }

    pub fn reset(&mut self) {
        *self = Self {
            playing: self.playing,
            ..Self::default()
        };
    }

    /// One second. Returns `true` when this second carries a blink cue.
    pub fn tick(&mut self) -> bool {
        if !self.active || !self.playing {
            return false;
        }
        self.elapsed_secs += 1;
        let cue = self.elapsed_secs % CUE_EVERY_SECS == 0;
        if cue {
            self.blink_count += 1;
        }
        self.time_left_secs = self.time_left_secs.saturating_sub(1);
        if self.time_left_secs == 0 {
            self.active = false;
        }
        cue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_minute_gives_twenty_cues() {
        let mut ex = BlinkingExercise::new();
        ex.start();
        let cues = (0..60).filter(|_| ex.tick()).count();
        assert_eq!(cues, 20);
        assert_eq!(ex.blink_count(), 20);
        assert!(!ex.is_active());
        assert!(!ex.tick());
    }

    #[test]
    fn not_started_does_nothing() {
        let mut ex = BlinkingExercise::new();
        assert!(!ex.tick());
        assert_eq!(ex.time_left_secs(), 60);
    }

    #[test]
    fn reset_clears_progress() {
        let mut ex = BlinkingExercise::new();
        ex.start();
        for _ in 0..10 {
            ex.tick();
        }
        ex.reset();
        assert!(!ex.is_active());
        assert_eq!(ex.blink_count(), 0);
        assert_eq!(ex.time_left_secs(), 60);
    }
}
