//! Deck progression and the scoring context
//!
//! `ScoringState` is the whole flashcard session: one deck slot per mode (so a
//! paused session in the other mode survives a mode switch), the mode whose
//! deck is on screen, and per-mode scores and high scores.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::CardId;
use super::score::{HighScore, ModeScore, Verdict};
use crate::highscores::FlashcardHighScores;
use crate::persistence::KeyValueStore;

/// Flashcard presentation style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    #[default]
    AudioFirst,
    ImageFirst,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::AudioFirst, Mode::ImageFirst];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::AudioFirst => "audio-first",
            Mode::ImageFirst => "image-first",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "audio-first" | "audio" => Some(Mode::AudioFirst),
            "image-first" | "image" => Some(Mode::ImageFirst),
            _ => None,
        }
    }

    fn slot(&self) -> usize {
        match self {
            Mode::AudioFirst => 0,
            Mode::ImageFirst => 1,
        }
    }
}

/// Deck lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckPhase {
    /// No deck, or a deck with no cards
    Empty,
    Active,
    /// Showing the last card (it can still be answered)
    Complete,
}

/// 1-based position for display
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckProgress {
    pub current: usize,
    pub total: usize,
}

/// One shuffled traversal of a card set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub shuffled_order: Vec<CardId>,
    pub current_index: usize,
    pub mode: Mode,
}

impl Deck {
    /// Fisher-Yates shuffle of `card_ids`, starting at the first card
    pub fn shuffled<R: Rng + ?Sized>(card_ids: &[CardId], mode: Mode, rng: &mut R) -> Self {
        let mut shuffled_order = card_ids.to_vec();
        shuffled_order.shuffle(rng);
        Self {
            shuffled_order,
            current_index: 0,
            mode,
        }
    }

    pub fn len(&self) -> usize {
        self.shuffled_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shuffled_order.is_empty()
    }

    pub fn phase(&self) -> DeckPhase {
        if self.is_empty() {
            DeckPhase::Empty
        } else if self.current_index == self.len() - 1 {
            DeckPhase::Complete
        } else {
            DeckPhase::Active
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase() == DeckPhase::Complete
    }

    /// Move to the next card unless already on the last one
    pub fn advance(&mut self) -> bool {
        if self.current_index + 1 < self.len() {
            self.current_index += 1;
            true
        } else {
            false
        }
    }

    pub fn current_card_id(&self) -> Option<&CardId> {
        self.shuffled_order.get(self.current_index)
    }

    pub fn progress(&self) -> DeckProgress {
        DeckProgress {
            current: self.current_index + 1,
            total: self.len(),
        }
    }
}

/// Scores, high scores and decks for both modes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoringState {
    scores: [ModeScore; 2],
    high_scores: [HighScore; 2],
    decks: [Option<Deck>; 2],
    active: Option<Mode>,
}

impl ScoringState {
    /// Fresh session with no high scores
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh session with the given high scores (scores and decks never persist)
    pub fn with_high_scores(high: FlashcardHighScores) -> Self {
        Self {
            high_scores: [high.audio_first, high.image_first],
            ..Self::default()
        }
    }

    /// Fresh session with high scores loaded from `store`
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        Self::with_high_scores(FlashcardHighScores::load(store))
    }

    pub fn save_high_scores<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        self.persisted_high_scores().save(store);
    }

    pub fn persisted_high_scores(&self) -> FlashcardHighScores {
        FlashcardHighScores {
            audio_first: self.high_scores[0],
            image_first: self.high_scores[1],
        }
    }

    // === Scores ===

    pub fn current_score(&self, mode: Mode) -> &ModeScore {
        &self.scores[mode.slot()]
    }

    pub fn high_score(&self, mode: Mode) -> &HighScore {
        &self.high_scores[mode.slot()]
    }

    pub fn is_card_answered(&self, mode: Mode, card_id: &str) -> bool {
        self.card_answer(mode, card_id).is_some()
    }

    pub fn card_answer(&self, mode: Mode, card_id: &str) -> Option<Verdict> {
        self.scores[mode.slot()].verdict(card_id)
    }

    /// Record (or change) the verdict on a card. The new score and high score
    /// are computed first and committed together.
    pub fn record_answer(&mut self, mode: Mode, card_id: &str, is_correct: bool) {
        let slot = mode.slot();
        let score = self.scores[slot].with_answer(card_id, Verdict::from_correct(is_correct));
        let high = self.high_scores[slot].updated(&score);

        if high != self.high_scores[slot] {
            log::debug!("New {} high score: {:?}", mode.as_str(), high);
        }
        self.scores[slot] = score;
        self.high_scores[slot] = high;
    }

    pub fn incorrect_card_ids(&self, mode: Mode) -> Vec<CardId> {
        self.scores[mode.slot()].incorrect_card_ids()
    }

    pub fn incorrect_count(&self, mode: Mode) -> usize {
        self.scores[mode.slot()].incorrect_count()
    }

    /// Clear the running score for a mode (high score untouched)
    pub fn reset_current_score(&mut self, mode: Mode) {
        self.scores[mode.slot()] = ModeScore::default();
    }

    /// Clear everything, high scores and decks included
    pub fn reset_all_scores(&mut self) {
        log::info!("Resetting all scores");
        *self = Self::default();
    }

    // === Decks ===

    /// Mode whose deck is on screen
    pub fn active_mode(&self) -> Option<Mode> {
        self.active
    }

    /// The deck on screen
    pub fn deck(&self) -> Option<&Deck> {
        self.active.and_then(|m| self.decks[m.slot()].as_ref())
    }

    pub fn deck_for(&self, mode: Mode) -> Option<&Deck> {
        self.decks[mode.slot()].as_ref()
    }

    fn deck_mut(&mut self) -> Option<&mut Deck> {
        let slot = self.active?.slot();
        self.decks[slot].as_mut()
    }

    fn install_deck(&mut self, deck: Deck) {
        log::info!("New {} deck with {} cards", deck.mode.as_str(), deck.len());
        self.active = Some(deck.mode);
        let slot = deck.mode.slot();
        self.decks[slot] = Some(deck);
    }

    /// Show `mode`'s deck, shuffling a new one unless a non-empty deck for
    /// that mode is already in progress
    pub fn initialize<R: Rng + ?Sized>(&mut self, card_ids: &[CardId], mode: Mode, rng: &mut R) {
        self.active = Some(mode);
        if self.deck_for(mode).is_some_and(|d| !d.is_empty()) {
            return;
        }
        self.install_deck(Deck::shuffled(card_ids, mode, rng));
    }

    /// Next card; false when already on the last card or with no deck
    pub fn advance(&mut self) -> bool {
        self.deck_mut().is_some_and(|d| d.advance())
    }

    pub fn phase(&self) -> DeckPhase {
        self.deck().map_or(DeckPhase::Empty, |d| d.phase())
    }

    pub fn is_complete(&self) -> bool {
        self.phase() == DeckPhase::Complete
    }

    pub fn current_card_id(&self) -> Option<&CardId> {
        self.deck().and_then(|d| d.current_card_id())
    }

    pub fn progress(&self) -> DeckProgress {
        self.deck().map(|d| d.progress()).unwrap_or_default()
    }

    /// New order from the first card, and a fresh running score for `mode`
    pub fn reshuffle<R: Rng + ?Sized>(&mut self, card_ids: &[CardId], mode: Mode, rng: &mut R) {
        self.reset_current_score(mode);
        self.install_deck(Deck::shuffled(card_ids, mode, rng));
    }

    /// Switch to `new_mode`, resuming its deck if it has one
    pub fn switch_mode<R: Rng + ?Sized>(&mut self, card_ids: &[CardId], new_mode: Mode, rng: &mut R) {
        self.active = Some(new_mode);
        if self.deck_for(new_mode).is_some() {
            log::info!("Resuming {} deck", new_mode.as_str());
            return;
        }
        self.install_deck(Deck::shuffled(card_ids, new_mode, rng));
    }

    /// The card set changed (filter toggle): the on-screen mode gets a fresh
    /// deck over `card_ids` and any paused deck for the other mode is dropped.
    /// Scores are kept.
    pub fn replace_cards<R: Rng + ?Sized>(&mut self, card_ids: &[CardId], rng: &mut R) {
        let Some(mode) = self.active else {
            return;
        };
        self.decks = [None, None];
        self.install_deck(Deck::shuffled(card_ids, mode, rng));
    }

    /// Deck of the cards currently marked incorrect. No-op when there are none;
    /// check `incorrect_count` before offering it.
    pub fn start_review_mistakes<R: Rng + ?Sized>(&mut self, mode: Mode, rng: &mut R) {
        let incorrect = self.incorrect_card_ids(mode);
        if incorrect.is_empty() {
            return;
        }
        self.reset_current_score(mode);
        self.install_deck(Deck::shuffled(&incorrect, mode, rng));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ids(names: &[&str]) -> Vec<CardId> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn sorted(mut v: Vec<CardId>) -> Vec<CardId> {
        v.sort();
        v
    }

    #[test]
    fn test_replace_cards_rebuilds_decks() {
        let mut rng = Pcg32::seed_from_u64(40);
        let mut state = ScoringState::new();
        state.replace_cards(&ids(&["a"]), &mut rng);
        assert!(state.deck().is_none());

        state.initialize(&ids(&["a", "b", "c"]), Mode::AudioFirst, &mut rng);
        state.switch_mode(&ids(&["a", "b", "c"]), Mode::ImageFirst, &mut rng);
        state.record_answer(Mode::ImageFirst, "a", true);
        state.advance();

        state.replace_cards(&ids(&["d", "e"]), &mut rng);
        assert_eq!(state.active_mode(), Some(Mode::ImageFirst));
        assert_eq!(sorted(state.deck().unwrap().shuffled_order.clone()), ids(&["d", "e"]));
        assert_eq!(state.progress().current, 1);
        assert!(state.deck_for(Mode::AudioFirst).is_none());
        assert_eq!(state.current_score(Mode::ImageFirst).correct, 1);
    }

    #[test]
    fn test_initialize_and_advance() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = ScoringState::new();
        assert_eq!(state.phase(), DeckPhase::Empty);
        assert_eq!(state.progress(), DeckProgress { current: 0, total: 0 });
        assert!(!state.advance());

        state.initialize(&ids(&["a", "b", "c"]), Mode::AudioFirst, &mut rng);
        assert_eq!(state.phase(), DeckPhase::Active);
        assert_eq!(state.progress(), DeckProgress { current: 1, total: 3 });

        assert!(state.advance());
        assert!(!state.is_complete());
        assert!(state.advance());
        assert!(state.is_complete());

        let before = state.clone();
        assert!(!state.advance());
        assert_eq!(state, before);
    }

    #[test]
    fn test_initialize_keeps_session() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut state = ScoringState::new();
        let cards = ids(&["a", "b", "c", "d"]);
        state.initialize(&cards, Mode::ImageFirst, &mut rng);
        state.advance();
        let deck = state.deck().cloned();
        state.initialize(&cards, Mode::ImageFirst, &mut rng);
        assert_eq!(state.deck().cloned(), deck);
    }

    #[test]
    fn test_initialize_replaces_empty_deck() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut state = ScoringState::new();
        state.initialize(&[], Mode::AudioFirst, &mut rng);
        assert_eq!(state.phase(), DeckPhase::Empty);
        assert!(!state.is_complete());
        assert_eq!(state.current_card_id(), None);
        state.initialize(&ids(&["a"]), Mode::AudioFirst, &mut rng);
        // Single card deck is complete from the start
        assert!(state.is_complete());
        assert_eq!(state.current_card_id().map(String::as_str), Some("a"));
    }

    #[test]
    fn test_reshuffle_resets_score_not_high_score() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut state = ScoringState::new();
        let cards = ids(&["a", "b", "c"]);
        state.initialize(&cards, Mode::AudioFirst, &mut rng);
        state.record_answer(Mode::AudioFirst, "a", true);
        state.advance();

        state.reshuffle(&cards, Mode::AudioFirst, &mut rng);
        assert_eq!(state.deck().unwrap().current_index, 0);
        assert_eq!(state.current_score(Mode::AudioFirst), &ModeScore::default());
        assert_eq!(state.high_score(Mode::AudioFirst).best_correct, 1);
    }

    #[test]
    fn test_switch_mode_preserves_paused_deck() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut state = ScoringState::new();
        let cards = ids(&["a", "b", "c", "d"]);
        state.initialize(&cards, Mode::AudioFirst, &mut rng);
        state.advance();
        let audio_deck = state.deck().cloned();

        state.switch_mode(&cards, Mode::ImageFirst, &mut rng);
        assert_eq!(state.active_mode(), Some(Mode::ImageFirst));
        assert_eq!(state.deck().unwrap().current_index, 0);

        state.switch_mode(&cards, Mode::AudioFirst, &mut rng);
        assert_eq!(state.deck().cloned(), audio_deck);
    }

    #[test]
    fn test_review_mistakes() {
        let mut rng = Pcg32::seed_from_u64(6);
        let mut state = ScoringState::new();
        let cards = ids(&["a", "b", "c", "d"]);
        state.initialize(&cards, Mode::AudioFirst, &mut rng);

        // No mistakes yet: no-op
        let before = state.clone();
        state.start_review_mistakes(Mode::AudioFirst, &mut rng);
        assert_eq!(state, before);

        state.record_answer(Mode::AudioFirst, "a", false);
        state.record_answer(Mode::AudioFirst, "b", true);
        state.record_answer(Mode::AudioFirst, "c", false);
        assert_eq!(state.incorrect_count(Mode::AudioFirst), 2);

        state.start_review_mistakes(Mode::AudioFirst, &mut rng);
        let deck = state.deck().unwrap();
        assert_eq!(sorted(deck.shuffled_order.clone()), ids(&["a", "c"]));
        assert_eq!(deck.current_index, 0);
        assert_eq!(state.current_score(Mode::AudioFirst).attempts, 0);
        assert_eq!(state.high_score(Mode::AudioFirst).best_correct, 1);
    }

    #[test]
    fn test_modes_are_independent() {
        let mut state = ScoringState::new();
        state.record_answer(Mode::AudioFirst, "a", true);
        state.record_answer(Mode::ImageFirst, "a", false);
        assert!(state.card_answer(Mode::AudioFirst, "a").unwrap().is_correct());
        assert_eq!(state.card_answer(Mode::ImageFirst, "a"), Some(Verdict::Incorrect));
        assert_eq!(state.high_score(Mode::ImageFirst).best_correct, 0);
        assert!(!state.is_card_answered(Mode::ImageFirst, "zzz"));
    }

    #[test]
    fn test_answer_flip() {
        let mut state = ScoringState::new();
        state.record_answer(Mode::ImageFirst, "a", true);
        state.record_answer(Mode::ImageFirst, "b", true);
        let before = state.current_score(Mode::ImageFirst).clone();
        state.record_answer(Mode::ImageFirst, "b", false);
        let after = state.current_score(Mode::ImageFirst);
        assert_eq!(after.correct, before.correct - 1);
        assert_eq!(after.attempts, before.attempts);
        assert_eq!(after.current_streak, 0);
        // Records never go back down
        assert_eq!(state.high_score(Mode::ImageFirst).best_correct, 2);
        assert_eq!(state.high_score(Mode::ImageFirst).best_streak, 2);
    }

    #[test]
    fn test_reset_all() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut state = ScoringState::new();
        state.initialize(&ids(&["a", "b"]), Mode::AudioFirst, &mut rng);
        state.record_answer(Mode::AudioFirst, "a", true);
        state.reset_all_scores();
        assert_eq!(state, ScoringState::new());
    }

    #[test]
    fn test_mode_strings() {
        assert_eq!(Mode::from_str("Image-First"), Some(Mode::ImageFirst));
        assert_eq!(Mode::from_str("nope"), None);
        assert_eq!(serde_json::to_string(&Mode::AudioFirst).unwrap(), "\"audio-first\"");
        for mode in Mode::ALL {
            assert_eq!(Mode::from_str(mode.as_str()), Some(mode));
        }
    }

    #[test]
    fn test_shuffle_position_roughly_uniform() {
        let mut rng = Pcg32::seed_from_u64(8);
        let cards = ids(&["a", "b", "c", "d"]);
        let trials = 4000;
        let mut first_counts = [0usize; 4];
        for _ in 0..trials {
            let deck = Deck::shuffled(&cards, Mode::AudioFirst, &mut rng);
            let idx = cards.iter().position(|c| c == &deck.shuffled_order[0]).unwrap();
            first_counts[idx] += 1;
        }
        // Expected 1000 each
        for count in first_counts {
            assert!((850..1150).contains(&count), "count {} far from uniform", count);
        }
    }

    proptest! {
        #[test]
        fn prop_shuffle_is_permutation(
            cards in prop::collection::hash_set("[a-z]{6}", 0..40),
            seed in any::<u64>(),
        ) {
            let cards: Vec<CardId> = cards.into_iter().collect();
            let mut rng = Pcg32::seed_from_u64(seed);
            let deck = Deck::shuffled(&cards, Mode::ImageFirst, &mut rng);
            prop_assert_eq!(sorted(deck.shuffled_order), sorted(cards));
        }

        #[test]
        fn prop_high_scores_never_decrease(
            answers in prop::collection::vec((0usize..6, any::<bool>()), 0..60),
        ) {
            let mut state = ScoringState::new();
            let mut prev = *state.high_score(Mode::AudioFirst);
            for (card, correct) in answers {
                state.record_answer(Mode::AudioFirst, &format!("card{}", card), correct);
                let high = *state.high_score(Mode::AudioFirst);
                prop_assert!(high.best_correct >= prev.best_correct);
                prop_assert!(high.best_streak >= prev.best_streak);
                let score = state.current_score(Mode::AudioFirst);
                prop_assert!(score.correct <= score.attempts);
                prop_assert_eq!(score.attempts as usize, score.answered_cards.len());
                prev = high;
            }
        }

        #[test]
        fn prop_repeat_answer_is_noop(
            answers in prop::collection::vec((0usize..6, any::<bool>()), 1..30),
        ) {
            let mut state = ScoringState::new();
            for (card, correct) in &answers {
                state.record_answer(Mode::ImageFirst, &format!("card{}", card), *correct);
            }
            let (card, correct) = answers[answers.len() - 1];
            let before = state.current_score(Mode::ImageFirst).clone();
            state.record_answer(Mode::ImageFirst, &format!("card{}", card), correct);
            prop_assert_eq!(state.current_score(Mode::ImageFirst), &before);
        }
    }
}
