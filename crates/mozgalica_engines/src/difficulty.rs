//! Difficulty tiers shared by every game.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Difficulty selected once per game session.
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    /// Random opponent, small grids, small operands.
    Easy,
    /// Heuristic opponent, medium grids, multiplication appears.
    Medium,
    /// Minimax opponent, large grids, large operands.
    Hard,
}

impl Difficulty {
    /// Points awarded for beating the computer at tic-tac-toe.
    #[instrument]
    pub fn tictactoe_win_score(self) -> u32 {
        match self {
            Self::Easy => 100,
            Self::Medium => 200,
            Self::Hard => 300,
        }
    }

    /// Number of symbol pairs laid out in a memory game.
    #[instrument]
    pub fn memory_pairs(self) -> usize {
        match self {
            Self::Easy => 6,
            Self::Medium => 8,
            Self::Hard => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Difficulty::from_str("HARD").unwrap(), Difficulty::Hard);
        assert_eq!(Difficulty::from_str("medium").unwrap(), Difficulty::Medium);
        assert!(Difficulty::from_str("impossible").is_err());
    }

    #[test]
    fn test_display_lowercase() {
        assert_eq!(Difficulty::Easy.to_string(), "easy");
    }
}
