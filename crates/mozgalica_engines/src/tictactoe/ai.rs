//! Computer opponent strategies.
//!
//! The computer always plays O. Each tier is a pure function of the board and
//! the random source, so a seeded RNG reproduces a game exactly.

use super::rules::winner;
use super::types::{Board, Player, Square};
use crate::Difficulty;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{instrument, trace};

/// Chance that the medium opponent blocks an immediate human win.
const BLOCK_PROBABILITY: f64 = 0.65;

/// Centre cell, preferred by the medium opponent.
const CENTER: usize = 4;

/// Corner cells, the medium opponent's next preference after the centre.
const CORNERS: [usize; 4] = [0, 2, 6, 8];

/// Picks the computer's move for the given difficulty.
///
/// Returns `None` only when the board has no empty cell.
#[instrument(skip(board, rng), fields(marks = board.marks()))]
pub fn compute_computer_move<R: Rng + ?Sized>(
    board: &Board,
    difficulty: Difficulty,
    rng: &mut R,
) -> Option<usize> {
    let choice = match difficulty {
        Difficulty::Easy => random_move(board, rng),
        Difficulty::Medium => heuristic_move(board, rng),
        Difficulty::Hard => minimax_move(board),
    };
    trace!(?choice, ?difficulty, "Computer move chosen");
    choice
}

/// Uniform choice among the empty cells.
fn random_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<usize> {
    board.empty_cells().choose(rng).copied()
}

/// First empty cell (in index order) that completes a line for `player`.
fn winning_cell(board: &Board, player: Player) -> Option<usize> {
    board.empty_cells().into_iter().find(|&pos| {
        let mut probe = *board;
        probe.set(pos, Square::Occupied(player));
        winner(&probe) == Some(player)
    })
}

/// Win if possible, usually block, then centre, corner, anything.
fn heuristic_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<usize> {
    if let Some(pos) = winning_cell(board, Player::O) {
        return Some(pos);
    }

    if rng.gen_bool(BLOCK_PROBABILITY)
        && let Some(pos) = winning_cell(board, Player::X)
    {
        return Some(pos);
    }

    if board.is_empty(CENTER) {
        return Some(CENTER);
    }

    let corners: Vec<usize> = CORNERS.into_iter().filter(|&pos| board.is_empty(pos)).collect();
    if let Some(&pos) = corners.choose(rng) {
        return Some(pos);
    }

    random_move(board, rng)
}

/// Exhaustive minimax; ties go to the lowest index.
fn minimax_move(board: &Board) -> Option<usize> {
    let mut scratch = *board;
    let mut best: Option<(usize, i32)> = None;

    for pos in board.empty_cells() {
        scratch.set(pos, Square::Occupied(Player::O));
        let score = minimax(&mut scratch, 0, false);
        scratch.set(pos, Square::Empty);

        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((pos, score));
        }
    }

    best.map(|(pos, _)| pos)
}

/// Scores a position from O's point of view: `10 - depth` for an O win,
/// `depth - 10` for an X win, `0` for a draw.
fn minimax(board: &mut Board, depth: i32, maximizing: bool) -> i32 {
    match winner(board) {
        Some(Player::O) => return 10 - depth,
        Some(Player::X) => return depth - 10,
        None if board.is_full() => return 0,
        None => {}
    }

    let (mark, mut best) = if maximizing {
        (Player::O, i32::MIN)
    } else {
        (Player::X, i32::MAX)
    };

    for pos in 0..Board::CELLS {
        if !board.is_empty(pos) {
            continue;
        }
        board.set(pos, Square::Occupied(mark));
        let score = minimax(board, depth + 1, !maximizing);
        board.set(pos, Square::Empty);

        best = if maximizing {
            best.max(score)
        } else {
            best.min(score)
        };
    }

    best
}
