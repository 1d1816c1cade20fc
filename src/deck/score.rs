//! Per-mode running score and high-score records

use serde::{Deserialize, Serialize};

use super::CardId;
use crate::percent;

/// Latest verdict on an answered card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Correct,
    Incorrect,
}

impl Verdict {
    pub fn from_correct(is_correct: bool) -> Self {
        if is_correct {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        }
    }

    pub fn is_correct(&self) -> bool {
        *self == Verdict::Correct
    }
}

/// Running score for one mode since the last reset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeScore {
    pub correct: u32,
    pub attempts: u32,
    /// One entry per answered card, in first-answered order
    pub answered_cards: Vec<(CardId, Verdict)>,
    pub current_streak: u32,
}

impl ModeScore {
    pub fn verdict(&self, card_id: &str) -> Option<Verdict> {
        self.answered_cards
            .iter()
            .find(|(id, _)| id == card_id)
            .map(|(_, v)| *v)
    }

    /// Score after answering `card_id`. A card that was already answered is a
    /// changed answer: only `correct` and the streak move, `attempts` stays put.
    pub fn with_answer(&self, card_id: &str, verdict: Verdict) -> ModeScore {
        let mut next = self.clone();

        match self.verdict(card_id) {
            None => {
                next.attempts += 1;
                if verdict.is_correct() {
                    next.correct += 1;
                    next.current_streak += 1;
                } else {
                    next.current_streak = 0;
                }
                next.answered_cards.push((card_id.to_string(), verdict));
            }
            Some(previous) => {
                match (previous, verdict) {
                    (Verdict::Correct, Verdict::Incorrect) => {
                        next.correct = next.correct.saturating_sub(1);
                        next.current_streak = 0;
                    }
                    (Verdict::Incorrect, Verdict::Correct) => {
                        next.correct += 1;
                        next.current_streak += 1;
                    }
                    _ => {}
                }
                if let Some(entry) = next.answered_cards.iter_mut().find(|(id, _)| id == card_id) {
                    entry.1 = verdict;
                }
            }
        }

        next
    }

    /// Cards whose latest verdict is incorrect, in first-answered order
    pub fn incorrect_card_ids(&self) -> Vec<CardId> {
        self.answered_cards
            .iter()
            .filter(|(_, v)| *v == Verdict::Incorrect)
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn incorrect_count(&self) -> usize {
        self.answered_cards
            .iter()
            .filter(|(_, v)| *v == Verdict::Incorrect)
            .count()
    }

    pub fn percent(&self) -> u32 {
        percent(self.correct, self.attempts)
    }
}

/// Best results for one mode. Never decreases, persisted across sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HighScore {
    pub best_correct: u32,
    /// Attempts at the moment `best_correct` was set (not a minimum)
    pub best_attempts: u32,
    pub best_percent: u32,
    pub best_streak: u32,
}

impl HighScore {
    /// High score after `score` was reached. Correct-count and streak records
    /// advance independently.
    pub fn updated(&self, score: &ModeScore) -> HighScore {
        let mut next = *self;
        if score.correct > self.best_correct {
            next.best_correct = score.correct;
            next.best_attempts = score.attempts;
            next.best_percent = percent(score.correct, score.attempts);
        }
        if score.current_streak > self.best_streak {
            next.best_streak = score.current_streak;
        }
        next
    }
}
