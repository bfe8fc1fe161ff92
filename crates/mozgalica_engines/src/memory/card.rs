//! Cards and the symbol pool they are drawn from.

use serde::{Deserialize, Serialize};

/// Symbols available for pairs, used in order: a game with `n` pairs takes the first `n`.
pub const ICON_POOL: [&str; 12] = [
    "planet",
    "rocket",
    "sunny",
    "moon",
    "heart",
    "star",
    "flower",
    "musical-note",
    "car",
    "bicycle",
    "game-controller",
    "diamond",
];

/// A single card on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    id: usize,
    symbol: &'static str,
    is_flipped: bool,
    is_matched: bool,
}

impl Card {
    pub(super) fn new(id: usize, symbol: &'static str) -> Self {
        Self {
            id,
            symbol,
            is_flipped: false,
            is_matched: false,
        }
    }

    /// Position of the card on the grid.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Symbol shared with exactly one other card.
    pub fn symbol(&self) -> &'static str {
        self.symbol
    }

    /// Whether the card is face up.
    pub fn is_flipped(&self) -> bool {
        self.is_flipped
    }

    /// Whether the card's pair has been found.
    pub fn is_matched(&self) -> bool {
        self.is_matched
    }

    pub(super) fn set_flipped(&mut self, flipped: bool) {
        self.is_flipped = flipped;
    }

    pub(super) fn set_matched(&mut self) {
        self.is_matched = true;
    }
}
