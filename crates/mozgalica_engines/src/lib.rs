//! Mozgalica engines - pure game logic for the brain games.
//!
//! Three independent engines live here, each a small synchronous state machine:
//!
//! - **Tic-tac-toe**: board, turn alternation, win detection and a computer
//!   opponent with three difficulty tiers (random, heuristic, minimax)
//! - **Memory**: card grid, flip/match sequencing and move counting
//! - **Math quiz**: question generation, answer checking and a time-penalised score
//!
//! Engines never touch storage or clocks. Drivers feed them user input and timer
//! ticks, and forward final scores to a [`ScoreSink`] for the user reported by
//! a [`CurrentUser`].
//!
//! # Example
//!
//! ```
//! use mozgalica_engines::{Difficulty, TicTacToeEngine, TicTacToePhase};
//! use rand::SeedableRng;
//!
//! let mut engine = TicTacToeEngine::new(rand::rngs::StdRng::seed_from_u64(7));
//! engine.start_game(Difficulty::Hard);
//! engine.apply_human_move(4).expect("centre is free");
//! assert_eq!(engine.phase(), TicTacToePhase::ComputerTurn);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod difficulty;
mod math_quiz;
mod memory;
mod sink;
mod tictactoe;

// Crate-level exports - Shared types
pub use difficulty::Difficulty;
pub use sink::{CurrentUser, GameKey, ScoreSink, SinkError};

// Crate-level exports - Tic-tac-toe
pub use tictactoe::{
    Board, BoardStatus, MoveError, Outcome, Player, Square, TicTacToeEngine, TicTacToePhase,
    compute_computer_move, evaluate_terminal, LINES,
};

// Crate-level exports - Memory
pub use memory::{Card, FlipError, FlipOutcome, ICON_POOL, MemoryEngine, MemoryPhase, ScoredMoves};

// Crate-level exports - Math quiz
pub use math_quiz::{
    AnswerOutcome, MathQuizEngine, Operator, QuizError, QuizPhase, Question, TOTAL_QUESTIONS,
    generate_question,
};
