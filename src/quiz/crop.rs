//! Crop-reveal quiz: name the bird from a small crop of its photo
//!
//! Every bird in the pool is asked once, in shuffled order, with five
//! lettered choices and a whole-second countdown.

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::choices::pick_distractors;
use crate::catalog::BirdCard;
use crate::consts::{CROP_CHOICES, CROP_TIMER_SECONDS};
use crate::deck::CardId;

/// Choice labels, also the keyboard shortcuts
pub const CHOICE_LABELS: [char; CROP_CHOICES] = ['A', 'B', 'C', 'D', 'E'];

/// Choice index for a key press (`a`-`e`, any case)
pub fn choice_for_key(key: char) -> Option<usize> {
    let upper = key.to_ascii_uppercase();
    CHOICE_LABELS.iter().position(|&l| l == upper)
}

/// One crop question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropQuestion {
    pub bird_id: CardId,
    /// Card ids, the correct one at `correct_index`
    pub choices: Vec<CardId>,
    pub correct_index: usize,
    /// Crop centre, percent of the photo
    pub crop: Vec2,
}

impl CropQuestion {
    /// Up to two same-type distractors, the rest from other types, and the
    /// answer dropped into a random slot
    pub fn generate<R: Rng + ?Sized>(bird: &BirdCard, pool: &[BirdCard], rng: &mut R) -> Self {
        let mut distractors: Vec<CardId> = pick_distractors(bird, pool, 2, CROP_CHOICES - 1, rng)
            .into_iter()
            .map(|b| b.id.clone())
            .collect();
        distractors.shuffle(rng);

        let correct_index = rng.random_range(0..=distractors.len());
        let mut choices = distractors;
        choices.insert(correct_index, bird.id.clone());

        Self {
            bird_id: bird.id.clone(),
            choices,
            correct_index,
            crop: Vec2::new(rng.random::<f32>() * 100.0, rng.random::<f32>() * 100.0),
        }
    }
}

/// Crop quiz phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CropPhase {
    Start,
    Playing,
    Revealed,
    Finished,
}

/// Crop quiz state
#[derive(Debug, Clone)]
pub struct CropQuiz {
    phase: CropPhase,
    questions: Vec<CropQuestion>,
    current_index: usize,
    score: u32,
    streak: u32,
    best_streak: u32,
    time_left: u32,
    selected: Option<usize>,
}

impl Default for CropQuiz {
    fn default() -> Self {
        Self::new()
    }
}

impl CropQuiz {
    pub fn new() -> Self {
        Self {
            phase: CropPhase::Start,
            questions: Vec::new(),
            current_index: 0,
            score: 0,
            streak: 0,
            best_streak: 0,
            time_left: CROP_TIMER_SECONDS,
            selected: None,
        }
    }

    pub fn phase(&self) -> CropPhase {
        self.phase
    }

    pub fn current_question(&self) -> Option<&CropQuestion> {
        self.questions.get(self.current_index)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Final percentage
    pub fn percent(&self) -> u32 {
        crate::percent(self.score, self.questions.len() as u32)
    }

    /// Every pool bird once, shuffled
    pub fn start<R: Rng + ?Sized>(&mut self, pool: &[BirdCard], rng: &mut R) {
        let mut order: Vec<&BirdCard> = pool.iter().collect();
        order.shuffle(rng);
        self.questions = order
            .into_iter()
            .map(|bird| CropQuestion::generate(bird, pool, rng))
            .collect();
        self.current_index = 0;
        self.score = 0;
        self.streak = 0;
        self.best_streak = 0;
        self.selected = None;
        self.time_left = CROP_TIMER_SECONDS;
        self.phase = if self.questions.is_empty() {
            CropPhase::Start
        } else {
            CropPhase::Playing
        };
    }

    /// Pick a choice. `None` unless a question is open.
    pub fn choose(&mut self, index: usize) -> Option<bool> {
        if self.phase != CropPhase::Playing {
            return None;
        }
        let correct = self.current_question()?.correct_index == index;
        self.selected = Some(index);
        if correct {
            self.score += 1;
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
        } else {
            self.streak = 0;
        }
        self.phase = CropPhase::Revealed;
        Some(correct)
    }

    /// One second elapsed. At zero the answer is revealed and the streak broken.
    pub fn tick_second(&mut self) {
        if self.phase != CropPhase::Playing {
            return;
        }
        if self.time_left <= 1 {
            self.time_left = 0;
            self.streak = 0;
            self.phase = CropPhase::Revealed;
        } else {
            self.time_left -= 1;
        }
    }

    /// From the reveal: next question or finish
    pub fn next(&mut self) {
        if self.phase != CropPhase::Revealed {
            return;
        }
        if self.current_index + 1 >= self.questions.len() {
            self.phase = CropPhase::Finished;
            log::info!("Crop quiz finished: {}/{}", self.score, self.questions.len());
        } else {
            self.current_index += 1;
            self.selected = None;
            self.time_left = CROP_TIMER_SECONDS;
            self.phase = CropPhase::Playing;
        }
    }
}
