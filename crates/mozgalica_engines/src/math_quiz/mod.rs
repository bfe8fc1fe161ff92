//! Math quiz: ten arithmetic questions against the clock.

mod engine;
mod question;

pub use engine::{AnswerOutcome, MathQuizEngine, QuizError, QuizPhase, TOTAL_QUESTIONS};
pub use question::{Operator, Question, generate_question};
