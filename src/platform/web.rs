//! JS bindings
//!
//! The page owns rendering and audio; it calls in here for overlay geometry
//! and flashcard bookkeeping. Structured results cross as JSON strings.

use glam::Vec2;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::deck::{CardId, Mode, ScoringState};
use crate::highscores::FlashcardHighScores;
use crate::overlay::{OverlayParams, generate};
use crate::persistence::KeyValueStore;

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn parse_mode(mode: &str) -> Mode {
    Mode::from_str(mode).unwrap_or_else(|| {
        log::warn!("Unknown mode {:?}, using audio-first", mode);
        Mode::default()
    })
}

/// Overlay for one photo as JSON (`hole.svgPath` etc. for the SVG layer)
#[wasm_bindgen]
pub fn leaf_overlay_json(coverage: f32, hole_x: f32, hole_y: f32, seed: i32) -> Result<String, JsValue> {
    let params = OverlayParams::new(coverage, Vec2::new(hole_x, hole_y), seed);
    let overlay = generate(&params);

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Out<'a> {
        overlay: &'a crate::overlay::LeafOverlay,
        hole_svg_path: String,
        canopy_svg_path: String,
    }

    to_json(&Out {
        overlay: &overlay,
        hole_svg_path: overlay.hole.svg_path(),
        canopy_svg_path: overlay.hole.canopy_svg_path(),
    })
}

/// Flashcard session backed by LocalStorage high scores
#[wasm_bindgen]
pub struct FlashcardSession {
    state: ScoringState,
    card_ids: Vec<CardId>,
    store: Box<dyn KeyValueStore>,
}

#[wasm_bindgen]
impl FlashcardSession {
    /// Session over the (already filtered) card ids
    #[wasm_bindgen(constructor)]
    pub fn new(card_ids: Vec<String>) -> FlashcardSession {
        let store = super::default_store();
        let state = ScoringState::load(store.as_ref());
        FlashcardSession {
            state,
            card_ids,
            store,
        }
    }

    /// Replace the card set (filter change). The on-screen deck is reshuffled
    /// over the new cards.
    pub fn set_cards(&mut self, card_ids: Vec<String>) {
        self.card_ids = card_ids;
        self.state.replace_cards(&self.card_ids, &mut rand::rng());
    }

    pub fn initialize(&mut self, mode: &str) {
        self.state.initialize(&self.card_ids, parse_mode(mode), &mut rand::rng());
    }

    pub fn switch_mode(&mut self, mode: &str) {
        self.state.switch_mode(&self.card_ids, parse_mode(mode), &mut rand::rng());
    }

    pub fn reshuffle(&mut self) {
        let mode = self.state.active_mode().unwrap_or_default();
        self.state.reshuffle(&self.card_ids, mode, &mut rand::rng());
    }

    pub fn start_review_mistakes(&mut self) {
        let mode = self.state.active_mode().unwrap_or_default();
        self.state.start_review_mistakes(mode, &mut rand::rng());
    }

    pub fn current_card_id(&self) -> Option<String> {
        self.state.current_card_id().cloned()
    }

    pub fn advance(&mut self) -> bool {
        self.state.advance()
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    /// Mark the card and persist the (possibly improved) high score
    pub fn record_answer(&mut self, card_id: &str, is_correct: bool) {
        let mode = self.state.active_mode().unwrap_or_default();
        self.state.record_answer(mode, card_id, is_correct);
        self.state.save_high_scores(self.store.as_mut());
    }

    /// `"correct"`, `"incorrect"` or undefined
    pub fn card_answer(&self, card_id: &str) -> Option<String> {
        let mode = self.state.active_mode().unwrap_or_default();
        self.state
            .card_answer(mode, card_id)
            .map(|v| if v.is_correct() { "correct" } else { "incorrect" }.to_string())
    }

    pub fn incorrect_count(&self) -> usize {
        let mode = self.state.active_mode().unwrap_or_default();
        self.state.incorrect_count(mode)
    }

    pub fn progress_json(&self) -> Result<String, JsValue> {
        to_json(&self.state.progress())
    }

    /// Running score and high score for the active mode
    pub fn scores_json(&self) -> Result<String, JsValue> {
        let mode = self.state.active_mode().unwrap_or_default();
        to_json(&(self.state.current_score(mode), self.state.high_score(mode)))
    }

    pub fn reset_all_scores(&mut self) {
        self.state.reset_all_scores();
        FlashcardHighScores::clear(self.store.as_mut());
    }
}
