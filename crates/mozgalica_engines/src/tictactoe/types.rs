//! Core domain types for tic-tac-toe.

use serde::{Deserialize, Serialize};

/// Player in the game. The human always plays X and moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// The human (goes first).
    X,
    /// The computer.
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}

/// A cell on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Square {
    /// Empty cell.
    #[default]
    Empty,
    /// Cell occupied by a player.
    Occupied(Player),
}

/// 3x3 board, cells indexed 0-8 in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Board {
    squares: [Square; 9],
}

impl Board {
    /// Number of cells on the board.
    pub const CELLS: usize = 9;

    /// Creates a new empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a board from a 9-character picture such as `"XO.X....O"`.
    ///
    /// `X` and `O` are marks, any other character is an empty cell.
    /// Returns `None` unless exactly nine characters are given.
    pub fn from_pattern(pattern: &str) -> Option<Self> {
        let chars: Vec<char> = pattern.chars().filter(|c| !c.is_whitespace()).collect();
        if chars.len() != Self::CELLS {
            return None;
        }
        let mut board = Self::new();
        for (pos, c) in chars.into_iter().enumerate() {
            board.squares[pos] = match c {
                'X' | 'x' => Square::Occupied(Player::X),
                'O' | 'o' => Square::Occupied(Player::O),
                _ => Square::Empty,
            };
        }
        Some(board)
    }

    /// Gets the cell at the given position, `None` when out of range.
    pub fn get(&self, pos: usize) -> Option<Square> {
        self.squares.get(pos).copied()
    }

    /// Marks a cell. Positions outside 0-8 are ignored and return `false`.
    pub fn set(&mut self, pos: usize, square: Square) -> bool {
        match self.squares.get_mut(pos) {
            Some(slot) => {
                *slot = square;
                true
            }
            None => false,
        }
    }

    /// Checks if a cell is empty. Out-of-range positions are never empty.
    pub fn is_empty(&self, pos: usize) -> bool {
        matches!(self.get(pos), Some(Square::Empty))
    }

    /// Indices of empty cells in ascending order.
    pub fn empty_cells(&self) -> Vec<usize> {
        (0..Self::CELLS).filter(|&pos| self.is_empty(pos)).collect()
    }

    /// Checks if every cell is occupied.
    pub fn is_full(&self) -> bool {
        self.squares.iter().all(|s| *s != Square::Empty)
    }

    /// Number of marks placed so far.
    pub fn marks(&self) -> usize {
        self.squares.iter().filter(|s| **s != Square::Empty).count()
    }

    /// Formats the board as a human-readable string.
    ///
    /// Empty cells show their 1-based number so a terminal player can pick them.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                let symbol = match self.squares[pos] {
                    Square::Empty => (pos + 1).to_string(),
                    Square::Occupied(Player::X) => "X".to_string(),
                    Square::Occupied(Player::O) => "O".to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pattern() {
        let board = Board::from_pattern("XO. ... ..X").unwrap();
        assert_eq!(board.get(0), Some(Square::Occupied(Player::X)));
        assert_eq!(board.get(1), Some(Square::Occupied(Player::O)));
        assert_eq!(board.get(8), Some(Square::Occupied(Player::X)));
        assert_eq!(board.marks(), 3);
        assert!(Board::from_pattern("XO").is_none());
    }

    #[test]
    fn test_set_out_of_bounds() {
        let mut board = Board::new();
        assert!(!board.set(9, Square::Occupied(Player::X)));
        assert!(!board.is_empty(9));
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_empty_cells_ascending() {
        let board = Board::from_pattern("X.O.X.O.X").unwrap();
        assert_eq!(board.empty_cells(), vec![1, 3, 5, 7]);
    }

    #[test]
    fn test_display_numbers_empty_cells() {
        let board = Board::from_pattern("X...O....").unwrap();
        assert_eq!(board.display(), "X|2|3\n-+-+-\n4|O|6\n-+-+-\n7|8|9");
    }
}
