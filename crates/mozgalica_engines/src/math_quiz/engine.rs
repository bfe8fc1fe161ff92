//! Round state machine for the math quiz.

use super::question::{Question, generate_question};
use crate::Difficulty;
use rand::Rng;
use rand::rngs::StdRng;
use tracing::{debug, info, instrument};

/// Questions asked per round.
pub const TOTAL_QUESTIONS: u32 = 10;

/// Points per correct answer, before the time penalty.
const POINTS_PER_CORRECT: u32 = 50;

/// Where the round currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuizPhase {
    /// No difficulty chosen yet.
    SelectingDifficulty,
    /// Questions are being answered and the clock runs.
    Active,
    /// All questions answered; the clock is stopped.
    Finished,
}

/// Result of submitting an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnswerOutcome {
    /// Whether the answer was right.
    pub correct: bool,
    /// Final score, present when this answer ended the round.
    pub final_score: Option<u32>,
}

/// Reasons an answer is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum QuizError {
    /// No round is running.
    #[display("No quiz round in progress")]
    NotActive,
}

impl std::error::Error for QuizError {}

/// Math quiz engine.
///
/// The engine never reads a clock: the driver calls [`MathQuizEngine::tick`]
/// once per elapsed second while the round is active.
#[derive(Debug, Clone)]
pub struct MathQuizEngine<R = StdRng> {
    phase: QuizPhase,
    difficulty: Option<Difficulty>,
    correct: u32,
    question_number: u32,
    question: Option<Question>,
    elapsed_seconds: u32,
    rng: R,
}

impl MathQuizEngine<StdRng> {
    /// Creates an engine seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::new(rand::SeedableRng::from_entropy())
    }
}

impl<R: Rng> MathQuizEngine<R> {
    /// Creates an engine waiting for a difficulty.
    pub fn new(rng: R) -> Self {
        Self {
            phase: QuizPhase::SelectingDifficulty,
            difficulty: None,
            correct: 0,
            question_number: 0,
            question: None,
            elapsed_seconds: 0,
            rng,
        }
    }

    /// Returns the current phase.
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    /// Returns the selected difficulty.
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    /// Correct answers so far.
    pub fn correct_count(&self) -> u32 {
        self.correct
    }

    /// 1-based number of the current question.
    pub fn question_number(&self) -> u32 {
        self.question_number
    }

    /// The question awaiting an answer.
    pub fn question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    /// Seconds elapsed in the round.
    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    /// Starts a round: counters zeroed, first question generated, clock at zero.
    #[instrument(skip(self))]
    pub fn start_game(&mut self, difficulty: Difficulty) {
        info!(?difficulty, "Starting math quiz round");
        self.difficulty = Some(difficulty);
        self.correct = 0;
        self.question_number = 1;
        self.elapsed_seconds = 0;
        self.question = Some(generate_question(difficulty, &mut self.rng));
        self.phase = QuizPhase::Active;
    }

    /// Starts a new round at the same difficulty. Does nothing before the first start.
    #[instrument(skip(self))]
    pub fn reset_game(&mut self) {
        if let Some(difficulty) = self.difficulty {
            self.start_game(difficulty);
        }
    }

    /// Abandons the round and goes back to difficulty selection.
    #[instrument(skip(self))]
    pub fn return_to_menu(&mut self) {
        debug!("Returning to difficulty selection");
        self.phase = QuizPhase::SelectingDifficulty;
        self.difficulty = None;
        self.correct = 0;
        self.question_number = 0;
        self.question = None;
        self.elapsed_seconds = 0;
    }

    /// Advances the clock by one second while the round is active.
    ///
    /// Returns `false` when the tick was ignored.
    pub fn tick(&mut self) -> bool {
        if self.phase != QuizPhase::Active {
            return false;
        }
        self.elapsed_seconds += 1;
        true
    }

    /// Checks an answer and moves on; the tenth answer ends the round.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::NotActive`] when no round is running.
    #[instrument(skip(self), fields(question = self.question_number))]
    pub fn submit_answer(&mut self, selected: i32) -> Result<AnswerOutcome, QuizError> {
        let (question, difficulty) = match (self.phase, &self.question, self.difficulty) {
            (QuizPhase::Active, Some(question), Some(difficulty)) => (question, difficulty),
            _ => return Err(QuizError::NotActive),
        };

        let correct = question.is_correct(selected);
        if correct {
            self.correct += 1;
        }
        debug!(correct, total_correct = self.correct, "Answer checked");

        if self.question_number < TOTAL_QUESTIONS {
            self.question_number += 1;
            self.question = Some(generate_question(difficulty, &mut self.rng));
            return Ok(AnswerOutcome {
                correct,
                final_score: None,
            });
        }

        Ok(AnswerOutcome {
            correct,
            final_score: self.finish(),
        })
    }

    /// Stops the clock and returns `max(0, correct * 50 - elapsed_seconds)`.
    ///
    /// Returns `None` if no round was started.
    #[instrument(skip(self))]
    pub fn finish(&mut self) -> Option<u32> {
        if self.phase == QuizPhase::Active {
            self.phase = QuizPhase::Finished;
            info!(
                correct = self.correct,
                elapsed = self.elapsed_seconds,
                score = self.score(),
                "Math quiz round finished"
            );
        }
        (self.phase == QuizPhase::Finished).then(|| self.score())
    }

    /// Score for the counters as they stand.
    fn score(&self) -> u32 {
        (self.correct * POINTS_PER_CORRECT).saturating_sub(self.elapsed_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn engine() -> MathQuizEngine<ChaCha8Rng> {
        MathQuizEngine::new(ChaCha8Rng::seed_from_u64(41))
    }

    fn answer_right(quiz: &mut MathQuizEngine<ChaCha8Rng>) -> AnswerOutcome {
        let value = *quiz.question().expect("active round").correct_answer();
        quiz.submit_answer(value).expect("round active")
    }

    #[test]
    fn test_submit_before_start_rejected() {
        let mut quiz = engine();
        assert_eq!(quiz.submit_answer(1), Err(QuizError::NotActive));
        assert!(!quiz.tick());
    }

    #[test]
    fn test_perfect_round_with_thirty_seconds_scores_470() {
        let mut quiz = engine();
        quiz.start_game(Difficulty::Medium);
        for _ in 0..30 {
            assert!(quiz.tick());
        }
        for n in 1..TOTAL_QUESTIONS {
            assert_eq!(quiz.question_number(), n);
            assert_eq!(answer_right(&mut quiz).final_score, None);
        }
        let last = answer_right(&mut quiz);
        assert!(last.correct);
        assert_eq!(last.final_score, Some(470));
        assert_eq!(quiz.phase(), QuizPhase::Finished);
        assert!(!quiz.tick());
        assert_eq!(quiz.elapsed_seconds(), 30);
    }

    #[test]
    fn test_wrong_answers_do_not_count() {
        let mut quiz = engine();
        quiz.start_game(Difficulty::Easy);
        let wrong = *quiz.question().unwrap().correct_answer() + 100;
        let outcome = quiz.submit_answer(wrong).unwrap();
        assert!(!outcome.correct);
        assert_eq!(quiz.correct_count(), 0);
        assert_eq!(quiz.question_number(), 2);
    }

    #[test]
    fn test_score_floors_at_zero() {
        let mut quiz = engine();
        quiz.start_game(Difficulty::Hard);
        for _ in 0..500 {
            quiz.tick();
        }
        for _ in 0..TOTAL_QUESTIONS {
            let outcome = quiz.submit_answer(i32::MIN).unwrap();
            if let Some(score) = outcome.final_score {
                assert_eq!(score, 0);
            }
        }
        assert_eq!(quiz.finish(), Some(0));
    }

    #[test]
    fn test_reset_twice_equals_once() {
        let mut quiz = engine();
        quiz.start_game(Difficulty::Easy);
        answer_right(&mut quiz);
        quiz.tick();
        quiz.reset_game();
        quiz.reset_game();
        assert_eq!(quiz.phase(), QuizPhase::Active);
        assert_eq!(quiz.correct_count(), 0);
        assert_eq!(quiz.question_number(), 1);
        assert_eq!(quiz.elapsed_seconds(), 0);
    }
}
