//! Tic-tac-toe against the computer.

mod ai;
mod engine;
mod rules;
mod types;

pub use ai::compute_computer_move;
pub use engine::{MoveError, Outcome, TicTacToeEngine, TicTacToePhase};
pub use rules::{BoardStatus, LINES, evaluate_terminal};
pub use types::{Board, Player, Square};
