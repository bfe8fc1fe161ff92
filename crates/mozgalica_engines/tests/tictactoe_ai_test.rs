//! Tests for the tic-tac-toe opponent and terminal detection.

use mozgalica_engines::{
    Board, BoardStatus, Difficulty, LINES, Outcome, Player, Square, TicTacToeEngine,
    TicTacToePhase, compute_computer_move, evaluate_terminal,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Plays every possible human line against the hard opponent from `game`'s
/// position and records each final outcome.
fn explore(game: &TicTacToeEngine<ChaCha8Rng>, outcomes: &mut Vec<Outcome>) {
    for cell in game.board().empty_cells() {
        let mut branch = game.clone();
        match branch.apply_human_move(cell).expect("empty cell") {
            TicTacToePhase::Finished(outcome) => outcomes.push(outcome),
            TicTacToePhase::ComputerTurn => {
                branch.play_computer_move().expect("computer has a move");
                match branch.phase() {
                    TicTacToePhase::Finished(outcome) => outcomes.push(outcome),
                    TicTacToePhase::HumanTurn => explore(&branch, outcomes),
                    other => panic!("unexpected phase {other:?}"),
                }
            }
            other => panic!("unexpected phase {other:?}"),
        }
    }
}

#[test]
fn test_hard_never_loses_any_human_line() {
    let mut game = TicTacToeEngine::new(ChaCha8Rng::seed_from_u64(0));
    game.start_game(Difficulty::Hard);
    let mut outcomes = Vec::new();
    explore(&game, &mut outcomes);

    assert!(!outcomes.is_empty());
    assert!(
        outcomes.iter().all(|o| *o != Outcome::Won),
        "human found a winning line against the hard opponent"
    );
}

#[test]
fn test_hard_after_human_center_never_loses() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    for _ in 0..200 {
        let mut game = TicTacToeEngine::new(ChaCha8Rng::seed_from_u64(1));
        game.start_game(Difficulty::Hard);
        game.apply_human_move(4).unwrap();

        while game.outcome().is_none() {
            game.play_computer_move().unwrap();
            if game.outcome().is_some() {
                break;
            }
            let cell = compute_computer_move(game.board(), Difficulty::Easy, &mut rng).unwrap();
            game.apply_human_move(cell).unwrap();
        }

        assert_ne!(game.outcome(), Some(Outcome::Won));
        assert!(matches!(game.outcome(), Some(Outcome::Lost | Outcome::Draw)));
    }
}

#[test]
fn test_medium_blocks_often_but_not_always() {
    // X threatens 2; O has no win of its own; the centre is taken.
    let board = Board::from_pattern("XX..O....").unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let trials = 2_000;

    let blocks = (0..trials)
        .filter(|_| compute_computer_move(&board, Difficulty::Medium, &mut rng) == Some(2))
        .count();

    assert!(blocks * 100 >= trials * 60, "blocked only {blocks} of {trials}");
    assert!(blocks < trials, "medium should not be a perfect blocker");
}

#[test]
fn test_medium_prefers_own_win_over_block() {
    // X threatens 2 (top row), O completes the middle row at 5.
    let board = Board::from_pattern("XX.OO..X.").unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    for _ in 0..500 {
        assert_eq!(compute_computer_move(&board, Difficulty::Medium, &mut rng), Some(5));
    }
}

/// Independent line check used to cross-examine [`evaluate_terminal`].
fn has_line(board: &Board, player: Player) -> bool {
    LINES
        .iter()
        .any(|line| line.iter().all(|&p| board.get(p) == Some(Square::Occupied(player))))
}

fn walk(board: Board, to_move: Player, visited: &mut usize) {
    *visited += 1;
    let status = evaluate_terminal(&board);
    match status {
        BoardStatus::Win(player) => {
            assert!(has_line(&board, player), "reported win without a line:\n{}", board.display());
            return;
        }
        BoardStatus::Draw => {
            assert!(board.is_full());
            assert!(!has_line(&board, Player::X) && !has_line(&board, Player::O));
            return;
        }
        BoardStatus::Ongoing => {
            assert!(!has_line(&board, Player::X) && !has_line(&board, Player::O));
        }
    }
    for cell in board.empty_cells() {
        let mut next = board;
        next.set(cell, Square::Occupied(to_move));
        walk(next, to_move.opponent(), visited);
    }
}

#[test]
fn test_evaluate_terminal_on_every_reachable_board() {
    let mut visited = 0;
    walk(Board::new(), Player::X, &mut visited);
    assert!(visited > 500_000, "walked only {visited} boards");
}
