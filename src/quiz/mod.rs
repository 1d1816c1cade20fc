//! Quiz games
//!
//! - `round`: timed multiple-choice round with staged reveals
//! - `crop`: crop-reveal questions with lettered choices
//! - `choices`: distractor selection and crop positions shared by both

pub mod choices;
pub mod crop;
pub mod round;

pub use choices::{generate_choices, random_crop};
pub use crop::{CropPhase, CropQuestion, CropQuiz, choice_for_key};
pub use round::{QuizAnswer, QuizGame, QuizPhase, QuizStep};
