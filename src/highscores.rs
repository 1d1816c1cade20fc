//! High score records
//!
//! Persisted to LocalStorage. Only high scores survive a reload; running
//! scores and decks always start fresh.

use serde::{Deserialize, Serialize};

use crate::deck::HighScore;
use crate::persistence::{KeyValueStore, load_or_default, remove_or_log, save_or_log};

/// Flashcard high scores, one record per mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlashcardHighScores {
    #[serde(rename = "audioFirstHighScore")]
    pub audio_first: HighScore,
    #[serde(rename = "imageFirstHighScore")]
    pub image_first: HighScore,
}

impl FlashcardHighScores {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "birdFlashcardsScoring";

    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        load_or_default(store, Self::STORAGE_KEY)
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        save_or_log(store, Self::STORAGE_KEY, self);
    }

    /// Delete the stored record
    pub fn clear<S: KeyValueStore + ?Sized>(store: &mut S) {
        remove_or_log(store, Self::STORAGE_KEY);
    }
}

/// Timed quiz records across rounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuizHighScores {
    pub best_score: u32,
    pub best_streak: u32,
    pub games_played: u32,
}

impl QuizHighScores {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "birdQuizHighScores";

    /// Fold a finished round into the records. Returns true if either record
    /// improved.
    pub fn record_round(&mut self, score: u32, best_streak: u32) -> bool {
        self.games_played += 1;
        let mut improved = false;
        if score > self.best_score {
            self.best_score = score;
            improved = true;
        }
        if best_streak > self.best_streak {
            self.best_streak = best_streak;
            improved = true;
        }
        improved
    }

    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        load_or_default(store, Self::STORAGE_KEY)
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        save_or_log(store, Self::STORAGE_KEY, self);
        log::info!(
            "Quiz high scores saved (best {}, streak {}, {} games)",
            self.best_score,
            self.best_streak,
            self.games_played
        );
    }
}
