//! Flashcard decks and scoring
//!
//! Two modes (audio-first, image-first), each with its own deck, running
//! score and high score. All operations are infallible; randomness is passed
//! in explicitly so callers (and tests) control it.

pub mod score;
pub mod state;

pub use score::{HighScore, ModeScore, Verdict};
pub use state::{Deck, DeckPhase, DeckProgress, Mode, ScoringState};

/// Card identifier (the bird's species code)
pub type CardId = String;
