//! Timed multiple-choice round
//!
//! A round is `ROUND_SIZE` birds. Each bird gets `TIME_LIMIT_MS` to answer;
//! the reveal card follows after a short pause, then the player moves on.
//! The host drives time: it passes its clock to every call and calls
//! `update` from its frame callback.

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::choices::{generate_choices, random_crop};
use crate::catalog::BirdCard;
use crate::consts::*;
use crate::highscores::QuizHighScores;
use crate::overlay::OverlayParams;
use crate::persistence::KeyValueStore;
use crate::schedule::Scheduler;

/// Grace period past the time limit before a timeout is declared (ms)
const TIMEOUT_GRACE_MS: f64 = 50.0;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizPhase {
    /// Start screen
    Start,
    /// Question on screen, clock running (or answered and waiting for reveal)
    Playing,
    /// Reveal card for the current bird
    Reveal,
    /// Round over
    Results,
}

/// One answered (or timed-out) question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizAnswer {
    pub bird_id: String,
    pub correct_name: String,
    pub selected_name: Option<String>,
    pub correct: bool,
    pub timed_out: bool,
}

/// What `next_bird` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStep {
    NextBird,
    /// Round finished; `improved` when a high score record was beaten
    Finished { improved: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuizEvent {
    ShowReveal,
}

/// Timed quiz state
#[derive(Debug, Clone)]
pub struct QuizGame {
    pool: Vec<BirdCard>,
    phase: QuizPhase,
    round: Vec<BirdCard>,
    current_index: usize,
    choices: Vec<String>,
    answers: Vec<QuizAnswer>,
    streak: u32,
    best_streak_this_round: u32,
    crop: Vec2,
    selected_answer: Option<String>,
    /// Set once the current bird is answered or timed out; locks input
    answered_at_ms: Option<f64>,
    question_started_ms: f64,
    round_seed: i32,
    high_scores: QuizHighScores,
    scheduler: Scheduler<QuizEvent>,
}

impl QuizGame {
    /// New game over `pool` (the quiz-eligible birds)
    pub fn new(pool: Vec<BirdCard>, high_scores: QuizHighScores) -> Self {
        Self {
            pool,
            phase: QuizPhase::Start,
            round: Vec::new(),
            current_index: 0,
            choices: Vec::new(),
            answers: Vec::new(),
            streak: 0,
            best_streak_this_round: 0,
            crop: Vec2::new(50.0, 50.0),
            selected_answer: None,
            answered_at_ms: None,
            question_started_ms: 0.0,
            round_seed: 0,
            high_scores,
            scheduler: Scheduler::new(),
        }
    }

    /// New game with high scores from `store`
    pub fn load<S: KeyValueStore + ?Sized>(pool: Vec<BirdCard>, store: &S) -> Self {
        Self::new(pool, QuizHighScores::load(store))
    }

    pub fn save_high_scores<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        self.high_scores.save(store);
    }

    // === Accessors ===

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn current_bird(&self) -> Option<&BirdCard> {
        self.round.get(self.current_index)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn round_size(&self) -> usize {
        self.round.len()
    }

    pub fn total_birds(&self) -> usize {
        self.pool.len()
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn answers(&self) -> &[QuizAnswer] {
        &self.answers
    }

    pub fn score(&self) -> u32 {
        self.answers.iter().filter(|a| a.correct).count() as u32
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn best_streak_this_round(&self) -> u32 {
        self.best_streak_this_round
    }

    pub fn crop_position(&self) -> Vec2 {
        self.crop
    }

    pub fn selected_answer(&self) -> Option<&str> {
        self.selected_answer.as_deref()
    }

    pub fn high_scores(&self) -> &QuizHighScores {
        &self.high_scores
    }

    /// A 20/20 round
    pub fn is_perfect(&self) -> bool {
        self.phase == QuizPhase::Results
            && self.answers.len() == ROUND_SIZE
            && self.score() as usize == self.answers.len()
    }

    /// Time left on the current question (frozen once answered)
    pub fn remaining_ms(&self, now_ms: f64) -> f64 {
        if self.phase == QuizPhase::Start {
            return TIME_LIMIT_MS;
        }
        let until = self.answered_at_ms.unwrap_or(now_ms);
        (TIME_LIMIT_MS - (until - self.question_started_ms)).clamp(0.0, TIME_LIMIT_MS)
    }

    fn is_answered(&self) -> bool {
        self.answered_at_ms.is_some()
    }

    /// Canopy overlay for the current bird: the hole sits on the crop point and
    /// coverage ramps up through the round
    pub fn leaf_params(&self) -> Option<OverlayParams> {
        self.current_bird()?;
        let t = if self.round.len() > 1 {
            self.current_index as f32 / (self.round.len() - 1) as f32
        } else {
            0.0
        };
        let coverage = QUIZ_COVERAGE_START + (QUIZ_COVERAGE_END - QUIZ_COVERAGE_START) * t;
        let seed = self.round_seed.wrapping_add(self.current_index as i32);
        Some(OverlayParams::new(coverage, self.crop, seed))
    }

    // === Transitions ===

    /// Start a new round from the start or results screen
    pub fn start<R: Rng + ?Sized>(&mut self, now_ms: f64, rng: &mut R) {
        self.scheduler.cancel_all();

        let mut round = self.pool.clone();
        round.shuffle(rng);
        round.truncate(ROUND_SIZE);
        if round.is_empty() {
            log::warn!("No quiz birds available");
            return;
        }

        self.round = round;
        self.current_index = 0;
        self.answers.clear();
        self.streak = 0;
        self.best_streak_this_round = 0;
        self.round_seed = rng.random();
        self.begin_question(now_ms, rng);
        log::info!("Quiz round started with {} birds", self.round.len());
    }

    fn begin_question<R: Rng + ?Sized>(&mut self, now_ms: f64, rng: &mut R) {
        // A reveal queued for the previous bird must not land on this one
        self.scheduler.cancel_all();
        let Some(bird) = self.round.get(self.current_index) else {
            return;
        };
        self.crop = random_crop(&bird.id, rng);
        self.choices = generate_choices(bird, &self.pool, rng);
        self.selected_answer = None;
        self.answered_at_ms = None;
        self.question_started_ms = now_ms;
        self.phase = QuizPhase::Playing;
    }

    /// Answer the current bird. `None` when input is locked (already answered,
    /// timed out, or not playing); otherwise whether the answer was right.
    pub fn select_answer(&mut self, name: &str, now_ms: f64) -> Option<bool> {
        if self.is_answered() || self.phase != QuizPhase::Playing {
            return None;
        }
        let bird = self.round.get(self.current_index)?;
        let correct = name == bird.common_name;
        let answer = QuizAnswer {
            bird_id: bird.id.clone(),
            correct_name: bird.common_name.clone(),
            selected_name: Some(name.to_string()),
            correct,
            timed_out: false,
        };

        self.answered_at_ms = Some(now_ms);
        self.selected_answer = Some(name.to_string());
        self.streak = if correct { self.streak + 1 } else { 0 };
        self.best_streak_this_round = self.best_streak_this_round.max(self.streak);
        self.answers.push(answer);
        self.scheduler.schedule(now_ms, REVEAL_DELAY_MS, QuizEvent::ShowReveal);
        Some(correct)
    }

    /// Time ran out on the current bird. Returns false if it was already answered.
    pub fn time_out(&mut self, now_ms: f64) -> bool {
        if self.is_answered() || self.phase != QuizPhase::Playing {
            return false;
        }
        let Some(bird) = self.round.get(self.current_index) else {
            return false;
        };
        let answer = QuizAnswer {
            bird_id: bird.id.clone(),
            correct_name: bird.common_name.clone(),
            selected_name: None,
            correct: false,
            timed_out: true,
        };

        self.answered_at_ms = Some(now_ms);
        self.streak = 0;
        self.answers.push(answer);
        self.scheduler
            .schedule(now_ms, TIMEOUT_REVEAL_DELAY_MS, QuizEvent::ShowReveal);
        true
    }

    /// Advance the clock: declare timeouts and run due transitions
    pub fn update(&mut self, now_ms: f64) {
        if self.phase == QuizPhase::Playing
            && !self.is_answered()
            && now_ms - self.question_started_ms >= TIME_LIMIT_MS + TIMEOUT_GRACE_MS
        {
            self.time_out(now_ms);
        }

        for event in self.scheduler.drain_due(now_ms) {
            match event {
                QuizEvent::ShowReveal => {
                    if self.phase == QuizPhase::Playing {
                        self.phase = QuizPhase::Reveal;
                    }
                }
            }
        }
    }

    /// From the reveal card: next bird, or finish the round. `None` (and no
    /// change) unless the reveal card is showing.
    pub fn next_bird<R: Rng + ?Sized>(&mut self, now_ms: f64, rng: &mut R) -> Option<QuizStep> {
        if self.phase != QuizPhase::Reveal {
            return None;
        }
        if self.current_index + 1 >= self.round.len() {
            return Some(QuizStep::Finished {
                improved: self.finish_round(),
            });
        }
        self.current_index += 1;
        self.begin_question(now_ms, rng);
        Some(QuizStep::NextBird)
    }

    fn finish_round(&mut self) -> bool {
        self.scheduler.cancel_all();
        let final_best = self.best_streak_this_round.max(self.streak);
        let improved = self.high_scores.record_round(self.score(), final_best);
        self.phase = QuizPhase::Results;
        log::info!(
            "Quiz round finished: {}/{} (best streak {})",
            self.score(),
            self.answers.len(),
            final_best
        );
        improved
    }

    /// Back to the start screen
    pub fn go_to_start(&mut self) {
        self.scheduler.cancel_all();
        self.phase = QuizPhase::Start;
    }

    /// Owner is going away: nothing may fire after this
    pub fn teardown(&mut self) {
        self.scheduler.cancel_all();
    }
}
