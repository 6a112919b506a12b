//! Mimic Me! scoring state machine.
//!
//! A round shows one target emoji. The player scores when the detector keeps
//! reporting that emoji for longer than the configured hold duration. Any
//! other reading resets the hold timer. The game is won once the score
//! reaches `max_score`; it then ignores frames until the next `init`.
//!
//! The machine is pure: it never touches the DOM. Each `update` returns an
//! [`Update`] that the session layer turns into display changes.

mod config;
mod picker;

pub use config::{ConfigError, DEFAULT_CANDIDATES, GameConfig};
pub use picker::{EntropyPicker, ScriptedPicker, TargetPicker};

use crate::unicode::to_code_point;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Created but not initialized yet.
    Idle,
    /// Accepting detector frames.
    Playing,
    /// Score reached `max_score`; waiting for a reset.
    Won,
}

/// Result of feeding one detector reading into the game.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Update {
    /// Game is not playing; nothing changed.
    Ignored,
    /// Reading did not match the target; hold timer cleared.
    Mismatch,
    /// Timestamp was NaN or infinite; hold timer cleared, no point.
    BadTimestamp,
    /// Reading matches, but not held long enough yet.
    Holding { held_secs: f64 },
    /// A point was awarded and a new target drawn.
    Scored { target: u32, score: u32 },
    /// A point was awarded and it was the winning one.
    Won { target: u32, score: u32 },
}

/// How long the current target has been matched without interruption.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct HoldTimer {
    start: Option<f64>,
    duration: f64,
}

impl HoldTimer {
    fn reset(&mut self) {
        *self = Self::default();
    }

    fn observe(&mut self, timestamp: f64) -> f64 {
        // A clock that went backwards restarts the hold so start never lies in the future.
        let start = match self.start {
            Some(s) if s <= timestamp => s,
            _ => timestamp,
        };
        self.start = Some(start);
        self.duration = timestamp - start;
        self.duration
    }
}

#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    target: Option<u32>,
    score: u32,
    hold: HoldTimer,
    phase: Phase,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            target: None,
            score: 0,
            hold: HoldTimer::default(),
            phase: Phase::Idle,
        })
    }

    /// Start (or restart) a game: fresh random target, zero score, cleared timer.
    pub fn init<P: TargetPicker + ?Sized>(&mut self, picker: &mut P) -> u32 {
        let target = self.pick_target(picker);
        self.target = Some(target);
        self.score = 0;
        self.hold.reset();
        self.phase = Phase::Playing;
        target
    }

    /// Notification hook for a detector stop. The game state is left as is.
    pub fn stop(&self) {}

    /// Feed the dominant emoji observed at `timestamp` (seconds).
    pub fn update<P: TargetPicker + ?Sized>(
        &mut self,
        observed: &str,
        timestamp: f64,
        picker: &mut P,
    ) -> Update {
        if self.phase != Phase::Playing {
            return Update::Ignored;
        }
        let Some(target) = self.target else {
            return Update::Ignored;
        };

        if to_code_point(observed) != Some(target) {
            self.hold.reset();
            return Update::Mismatch;
        }

        if !timestamp.is_finite() {
            self.hold.reset();
            return Update::BadTimestamp;
        }

        let held_secs = self.hold.observe(timestamp);
        if held_secs > self.config.hold_duration_secs {
            self.award_point(picker)
        } else {
            Update::Holding { held_secs }
        }
    }

    fn award_point<P: TargetPicker + ?Sized>(&mut self, picker: &mut P) -> Update {
        self.score += 1;
        let next = self.pick_target(picker);
        self.target = Some(next);
        self.hold.reset();

        if self.score >= self.config.max_score {
            self.phase = Phase::Won;
            Update::Won { target: next, score: self.score }
        } else {
            Update::Scored { target: next, score: self.score }
        }
    }

    fn pick_target<P: TargetPicker + ?Sized>(&self, picker: &mut P) -> u32 {
        let pool = &self.config.candidate_emojis;
        // validated non-empty in `new`
        let idx = picker.pick_index(pool.len()).min(pool.len() - 1);
        pool[idx]
    }

    pub fn target(&self) -> Option<u32> {
        self.target
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn max_score(&self) -> u32 {
        self.config.max_score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Timestamp at which the current match started, if one is in progress.
    pub fn hold_start(&self) -> Option<f64> {
        self.hold.start
    }

    /// Seconds the current match has been held as of the last update.
    pub fn held_secs(&self) -> f64 {
        self.hold.duration
    }
}
