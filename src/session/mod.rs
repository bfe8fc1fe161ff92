//! Game sessions: drivers that own an engine, run its timers and report scores.
//!
//! Every timer a session schedules is aborted when the session is reset, sent
//! back to the menu, or dropped, so a discarded game is never mutated late.

mod math_quiz;
mod memory;
mod reporter;
mod tictactoe;

pub use math_quiz::MathQuizSession;
pub use memory::MemorySession;
pub use reporter::ScoreReporter;
pub use tictactoe::{TicTacToeSession, TurnReport};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks a mutex, recovering the data if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
