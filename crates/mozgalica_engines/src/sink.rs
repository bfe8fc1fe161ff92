//! Narrow interfaces through which the engines reach the outside world.
//!
//! Engines compute scores; a driver asks [`CurrentUser`] who is playing and hands
//! the result to a [`ScoreSink`]. Nothing in this crate stores anything.

use async_trait::async_trait;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// Identifies which game a score belongs to.
///
/// The serialized names are the keys stored in the score history and must not
/// change once scores have been recorded.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum GameKey {
    /// Tic-tac-toe against the computer.
    #[strum(to_string = "Iks-Oks", serialize = "tictactoe")]
    #[serde(rename = "Iks-Oks")]
    TicTacToe,
    /// Memory card matching.
    #[strum(to_string = "Memorija", serialize = "memory")]
    #[serde(rename = "Memorija")]
    Memory,
    /// Arithmetic quiz.
    #[strum(to_string = "Matematika", serialize = "math-quiz")]
    #[serde(rename = "Matematika")]
    MathQuiz,
}

impl GameKey {
    /// Returns the key persisted in the score history.
    pub fn storage_key(self) -> &'static str {
        match self {
            Self::TicTacToe => "Iks-Oks",
            Self::Memory => "Memorija",
            Self::MathQuiz => "Matematika",
        }
    }
}

/// Failure reported by a score sink.
#[derive(Debug, Clone, Display, Error)]
#[display("Score sink error: {}", message)]
pub struct SinkError {
    /// What went wrong.
    pub message: String,
}

impl SinkError {
    /// Creates a new sink error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Destination for final scores.
#[async_trait]
pub trait ScoreSink: Send + Sync {
    /// Records a final score for a user.
    async fn record(&self, username: &str, game: GameKey, score: u32) -> Result<(), SinkError>;
}

/// Source of the logged-in user's name.
pub trait CurrentUser: Send + Sync {
    /// Returns the current username, or `None` when nobody is logged in.
    fn current_user(&self) -> Option<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_storage_keys_are_stable() {
        assert_eq!(GameKey::TicTacToe.storage_key(), "Iks-Oks");
        assert_eq!(GameKey::Memory.storage_key(), "Memorija");
        assert_eq!(GameKey::MathQuiz.storage_key(), "Matematika");
    }

    #[test]
    fn test_parse_from_storage_or_cli_name() {
        assert_eq!(GameKey::from_str("Memorija").unwrap(), GameKey::Memory);
        assert_eq!(GameKey::from_str("math-quiz").unwrap(), GameKey::MathQuiz);
    }
}
