//! Bird Games - bird identification game logic
//!
//! Core modules:
//! - `overlay`: Seeded leaf canopy overlay (peek-through difficulty mechanic)
//! - `deck`: Flashcard deck progression and per-mode scoring
//! - `quiz`: Timed multiple-choice round and crop-reveal questions
//! - `meadow`: Meadow rescue progress
//! - `schedule`: Cancellable delayed events (staged reveals, popups)
//! - `catalog`: Bird card records and type filters
//! - `persistence`: Key/value storage with fault-swallowing JSON helpers
//! - `platform`: Browser/native platform abstraction

pub mod catalog;
pub mod deck;
pub mod highscores;
pub mod meadow;
pub mod overlay;
pub mod persistence;
pub mod platform;
pub mod quiz;
pub mod schedule;
pub mod settings;

pub use deck::{Mode, ScoringState};
pub use highscores::QuizHighScores;
pub use overlay::{LeafOverlay, OverlayParams, generate};
pub use settings::Settings;

use glam::Vec2;

/// Shared game constants
pub mod consts {
    /// Timed quiz: birds per round
    pub const ROUND_SIZE: usize = 20;
    /// Timed quiz: answer window per bird (ms)
    pub const TIME_LIMIT_MS: f64 = 5000.0;
    /// Delay before the reveal card after an answer (ms)
    pub const REVEAL_DELAY_MS: f64 = 1000.0;
    /// Delay before the reveal card after a timeout (ms)
    pub const TIMEOUT_REVEAL_DELAY_MS: f64 = 1500.0;

    /// Crop quiz: whole seconds per question
    pub const CROP_TIMER_SECONDS: u32 = 10;
    /// Crop quiz: number of labelled choices
    pub const CROP_CHOICES: usize = 5;

    /// Overlay coverage for the first bird of a quiz round
    pub const QUIZ_COVERAGE_START: f32 = 0.5;
    /// Overlay coverage for the last bird of a quiz round
    pub const QUIZ_COVERAGE_END: f32 = 0.85;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Integer percentage (0-100), rounded; 0 when there is nothing to divide by
#[inline]
pub fn percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}
