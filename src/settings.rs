//! Player preferences
//!
//! Persisted separately from scores in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::catalog::{BirdCard, BirdType, TypeFilter};
use crate::deck::{CardId, Mode};
use crate::persistence::{KeyValueStore, load_or_default, save_or_log};

/// Player preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Flashcard mode to open with
    pub mode: Mode,

    // === Flashcards ===
    /// Move to the next card on its own after the answer is revealed
    pub auto_advance_after_reveal: bool,

    // === Filters ===
    /// Bird types included in decks and quizzes
    pub bird_types: TypeFilter,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: Mode::AudioFirst,

            auto_advance_after_reveal: false,

            // Every type on
            bird_types: TypeFilter::all(),
        }
    }
}

impl Settings {
    /// Flip one bird type. The last selected type cannot be turned off.
    pub fn toggle_bird_type(&mut self, bird_type: BirdType) {
        if self.bird_types.contains(bird_type) && self.bird_types.selected().count() == 1 {
            return;
        }
        self.bird_types.toggle(bird_type);
    }

    /// Deck contents for the current filter
    pub fn deck_card_ids(&self, cards: &[BirdCard]) -> Vec<CardId> {
        self.bird_types.card_ids(cards)
    }

    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "birdGamesSettings";

    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        load_or_default(store, Self::STORAGE_KEY)
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        save_or_log(store, Self::STORAGE_KEY, self);
        log::info!("Settings saved");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.mode, Mode::AudioFirst);
        assert!(!s.auto_advance_after_reveal);
        assert!(s.bird_types.is_all());
    }

    #[test]
    fn test_round_trip_through_store() {
        let mut store = MemoryStore::new();
        let mut s = Settings::default();
        s.mode = Mode::ImageFirst;
        s.bird_types = TypeFilter::only(&[BirdType::Raptor, BirdType::Sparrow]);
        s.save(&mut store);
        assert_eq!(Settings::load(&store), s);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s: Settings = serde_json::from_str(r#"{"mode":"image-first"}"#).unwrap();
        assert_eq!(s.mode, Mode::ImageFirst);
        assert!(s.bird_types.is_all());
    }

    #[test]
    fn test_last_type_stays_selected() {
        let mut s = Settings::default();
        s.bird_types = TypeFilter::only(&[BirdType::Raptor]);
        s.toggle_bird_type(BirdType::Raptor);
        assert!(s.bird_types.contains(BirdType::Raptor));
        s.toggle_bird_type(BirdType::Songbird);
        assert!(s.bird_types.contains(BirdType::Raptor));
    }

    #[test]
    fn test_filtered_deck() {
        let cards = vec![
            BirdCard::new("merlin", "Merlin", BirdType::Raptor),
            BirdCard::new("mallar", "Mallard", BirdType::Waterbird),
        ];
        let mut s = Settings::default();
        s.toggle_bird_type(BirdType::Waterbird);
        assert_eq!(s.deck_card_ids(&cards), vec!["merlin".to_string()]);
    }
}
