//! Terminal-state detection for tic-tac-toe.

use super::types::{Board, Player, Square};
use tracing::instrument;

/// The eight winning lines: three rows, three columns, two diagonals.
#[rustfmt::skip]
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2], [3, 4, 5], [6, 7, 8], // Rows
    [0, 3, 6], [1, 4, 7], [2, 5, 8], // Columns
    [0, 4, 8], [2, 4, 6],            // Diagonals
];

/// Result of evaluating a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardStatus {
    /// No winner and at least one empty cell.
    Ongoing,
    /// A player owns a full line.
    Win(Player),
    /// Board full with no winner.
    Draw,
}

/// Returns the owner of the first complete line, scanning [`LINES`] in order.
pub(crate) fn winner(board: &Board) -> Option<Player> {
    LINES.iter().find_map(|&[a, b, c]| {
        let sq = board.get(a)?;
        match sq {
            Square::Occupied(player) if board.get(b) == Some(sq) && board.get(c) == Some(sq) => {
                Some(player)
            }
            _ => None,
        }
    })
}

/// Evaluates whether the board is won, drawn or still being played.
///
/// A win needs all three cells of a line occupied by the same player.
#[instrument(level = "trace")]
pub fn evaluate_terminal(board: &Board) -> BoardStatus {
    if let Some(player) = winner(board) {
        BoardStatus::Win(player)
    } else if board.is_full() {
        BoardStatus::Draw
    } else {
        BoardStatus::Ongoing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_ongoing() {
        assert_eq!(evaluate_terminal(&Board::new()), BoardStatus::Ongoing);
    }

    #[test]
    fn test_every_line_wins_for_both_players() {
        for player in [Player::X, Player::O] {
            for line in LINES {
                let mut board = Board::new();
                for pos in line {
                    board.set(pos, Square::Occupied(player));
                }
                assert_eq!(evaluate_terminal(&board), BoardStatus::Win(player), "line {line:?}");
            }
        }
    }

    #[test]
    fn test_mixed_line_is_not_a_win() {
        let board = Board::from_pattern("XXO......").unwrap();
        assert_eq!(evaluate_terminal(&board), BoardStatus::Ongoing);
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        // X O X / O X X / O X O
        let board = Board::from_pattern("XOXOXXOXO").unwrap();
        assert_eq!(evaluate_terminal(&board), BoardStatus::Draw);
    }

    #[test]
    fn test_win_on_full_board_beats_draw() {
        let board = Board::from_pattern("XXXOOXXOO").unwrap();
        assert_eq!(evaluate_terminal(&board), BoardStatus::Win(Player::X));
    }
}
