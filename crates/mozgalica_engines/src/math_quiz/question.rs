//! Question generation.

use crate::Difficulty;
use derive_getters::Getters;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{instrument, trace};

/// Number of answer options offered per question.
const OPTION_COUNT: usize = 4;

/// Largest distance between a distractor and the correct answer.
const MAX_OFFSET: i32 = 5;

/// Arithmetic operator of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Operator {
    /// Addition.
    #[display("+")]
    Add,
    /// Subtraction.
    #[display("-")]
    Subtract,
    /// Multiplication.
    #[display("×")]
    Multiply,
}

impl Operator {
    /// Applies the operator.
    pub fn apply(self, left: i32, right: i32) -> i32 {
        match self {
            Self::Add => left + right,
            Self::Subtract => left - right,
            Self::Multiply => left * right,
        }
    }
}

/// A generated question with four distinct options, one of them correct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Question {
    left: i32,
    right: i32,
    operator: Operator,
    correct_answer: i32,
    options: [i32; OPTION_COUNT],
}

impl Question {
    /// The question as shown to the player, e.g. `"7 × 8 = ?"`.
    pub fn text(&self) -> String {
        format!("{} {} {} = ?", self.left, self.operator, self.right)
    }

    /// Whether `value` is the correct answer.
    pub fn is_correct(&self, value: i32) -> bool {
        value == self.correct_answer
    }
}

/// Generates a question whose operand ranges and operators scale with difficulty.
///
/// | difficulty | operands | operators |
/// |---|---|---|
/// | easy | 1-20 | `+` `-` |
/// | medium | 1-50, or 1-10 (60%) | `+` `-`, or `×` |
/// | hard | 10-109, or 2-16 (50%) | `+` `-`, or `×` |
#[instrument(skip(rng))]
pub fn generate_question<R: Rng + ?Sized>(difficulty: Difficulty, rng: &mut R) -> Question {
    let (low, high, operator) = match difficulty {
        Difficulty::Easy => (1, 20, add_or_subtract(rng)),
        Difficulty::Medium if rng.gen_bool(0.6) => (1, 10, Operator::Multiply),
        Difficulty::Medium => (1, 50, add_or_subtract(rng)),
        Difficulty::Hard if rng.gen_bool(0.5) => (2, 16, Operator::Multiply),
        Difficulty::Hard => (10, 109, add_or_subtract(rng)),
    };

    let left = rng.gen_range(low..=high);
    let right = rng.gen_range(low..=high);
    let correct_answer = operator.apply(left, right);

    let mut options = Vec::with_capacity(OPTION_COUNT);
    options.push(correct_answer);
    while options.len() < OPTION_COUNT {
        let offset = rng.gen_range(-MAX_OFFSET..=MAX_OFFSET);
        let candidate = correct_answer + offset;
        if offset != 0 && !options.contains(&candidate) {
            options.push(candidate);
        }
    }
    options.shuffle(rng);

    let options = [options[0], options[1], options[2], options[3]];
    trace!(left, right, %operator, correct_answer, ?options, "Question generated");

    Question {
        left,
        right,
        operator,
        correct_answer,
        options,
    }
}

fn add_or_subtract<R: Rng + ?Sized>(rng: &mut R) -> Operator {
    if rng.gen_bool(0.5) {
        Operator::Add
    } else {
        Operator::Subtract
    }
}
