//! Session state machine for a human-versus-computer game.

use super::ai::compute_computer_move;
use super::rules::{BoardStatus, evaluate_terminal};
use super::types::{Board, Player, Square};
use crate::Difficulty;
use rand::Rng;
use rand::rngs::StdRng;
use tracing::{debug, error, info, instrument};

/// How a finished game ended, from the human's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The human completed a line.
    Won,
    /// The computer completed a line.
    Lost,
    /// Board filled with no line.
    Draw,
}

/// Where the game currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicTacToePhase {
    /// No difficulty chosen yet.
    SelectingDifficulty,
    /// Waiting for the human (X).
    HumanTurn,
    /// Waiting for the computer (O).
    ComputerTurn,
    /// Game over.
    Finished(Outcome),
}

/// Reasons a move is refused. A refused move never changes the game.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The cell index is not 0-8.
    #[display("Cell {} is out of bounds (must be 0-8)", _0)]
    OutOfBounds(usize),

    /// The cell already holds a mark.
    #[display("Cell {} is already occupied", _0)]
    CellOccupied(usize),

    /// No game is running.
    #[display("No game in progress")]
    GameInactive,

    /// The other side is to move.
    #[display("It's not {:?}'s turn", _0)]
    NotYourTurn(Player),

    /// An internal invariant was broken.
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for MoveError {}

/// Tic-tac-toe engine: the human plays X and always opens.
///
/// The random source drives the easy and medium opponents; seed it to make
/// games reproducible.
#[derive(Debug, Clone)]
pub struct TicTacToeEngine<R = StdRng> {
    board: Board,
    phase: TicTacToePhase,
    difficulty: Option<Difficulty>,
    rng: R,
}

impl TicTacToeEngine<StdRng> {
    /// Creates an engine seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::new(rand::SeedableRng::from_entropy())
    }
}

impl<R: Rng> TicTacToeEngine<R> {
    /// Creates an engine waiting for a difficulty.
    pub fn new(rng: R) -> Self {
        Self {
            board: Board::new(),
            phase: TicTacToePhase::SelectingDifficulty,
            difficulty: None,
            rng,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the current phase.
    pub fn phase(&self) -> TicTacToePhase {
        self.phase
    }

    /// Returns the selected difficulty.
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    /// Returns the outcome once the game has finished.
    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            TicTacToePhase::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Points earned by the human: only a win scores.
    pub fn final_score(&self) -> Option<u32> {
        match (self.phase, self.difficulty) {
            (TicTacToePhase::Finished(Outcome::Won), Some(difficulty)) => {
                Some(difficulty.tictactoe_win_score())
            }
            _ => None,
        }
    }

    /// Starts a fresh game at the given difficulty with the human to move.
    #[instrument(skip(self))]
    pub fn start_game(&mut self, difficulty: Difficulty) {
        info!(?difficulty, "Starting tic-tac-toe game");
        self.difficulty = Some(difficulty);
        self.board = Board::new();
        self.phase = TicTacToePhase::HumanTurn;
    }

    /// Clears the board and replays at the same difficulty.
    ///
    /// Does nothing while no difficulty is selected.
    #[instrument(skip(self))]
    pub fn reset_game(&mut self) {
        if let Some(difficulty) = self.difficulty {
            debug!("Replaying tic-tac-toe game");
            self.start_game(difficulty);
        }
    }

    /// Abandons the game and goes back to difficulty selection.
    #[instrument(skip(self))]
    pub fn return_to_menu(&mut self) {
        debug!("Returning to difficulty selection");
        self.difficulty = None;
        self.board = Board::new();
        self.phase = TicTacToePhase::SelectingDifficulty;
    }

    /// Places the human's X.
    ///
    /// Returns the phase after the move: the computer's turn, or a finished game.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError`] when no game is running, it is the computer's turn,
    /// or the cell is out of range or occupied.
    #[instrument(skip(self), fields(phase = ?self.phase))]
    pub fn apply_human_move(&mut self, cell: usize) -> Result<TicTacToePhase, MoveError> {
        match self.phase {
            TicTacToePhase::HumanTurn => {}
            TicTacToePhase::ComputerTurn => return Err(MoveError::NotYourTurn(Player::X)),
            TicTacToePhase::SelectingDifficulty | TicTacToePhase::Finished(_) => {
                return Err(MoveError::GameInactive);
            }
        }

        self.place(cell, Player::X)?;
        debug!(cell, "Human placed X");
        Ok(self.phase)
    }

    /// Lets the computer choose and place its O.
    ///
    /// Returns the cell played.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError`] when it is not the computer's turn, or
    /// [`MoveError::InvariantViolation`] if the computer finds no empty cell
    /// on a board that is not finished.
    #[instrument(skip(self), fields(phase = ?self.phase))]
    pub fn play_computer_move(&mut self) -> Result<usize, MoveError> {
        let difficulty = match (self.phase, self.difficulty) {
            (TicTacToePhase::ComputerTurn, Some(difficulty)) => difficulty,
            (TicTacToePhase::HumanTurn, _) => return Err(MoveError::NotYourTurn(Player::O)),
            _ => return Err(MoveError::GameInactive),
        };

        let cell = compute_computer_move(&self.board, difficulty, &mut self.rng).ok_or_else(|| {
            error!(board = ?self.board, "Computer found no legal move on an unfinished board");
            MoveError::InvariantViolation("no empty cell for computer move".to_string())
        })?;

        self.place(cell, Player::O)?;
        debug!(cell, "Computer placed O");
        Ok(cell)
    }

    /// Marks a cell and advances the phase.
    fn place(&mut self, cell: usize, player: Player) -> Result<(), MoveError> {
        match self.board.get(cell) {
            None => return Err(MoveError::OutOfBounds(cell)),
            Some(Square::Occupied(_)) => return Err(MoveError::CellOccupied(cell)),
            Some(Square::Empty) => {}
        }

        self.board.set(cell, Square::Occupied(player));

        self.phase = match evaluate_terminal(&self.board) {
            BoardStatus::Win(Player::X) => TicTacToePhase::Finished(Outcome::Won),
            BoardStatus::Win(Player::O) => TicTacToePhase::Finished(Outcome::Lost),
            BoardStatus::Draw => TicTacToePhase::Finished(Outcome::Draw),
            BoardStatus::Ongoing => match player {
                Player::X => TicTacToePhase::ComputerTurn,
                Player::O => TicTacToePhase::HumanTurn,
            },
        };

        if let TicTacToePhase::Finished(outcome) = self.phase {
            info!(?outcome, score = ?self.final_score(), "Tic-tac-toe game finished");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn engine() -> TicTacToeEngine<ChaCha8Rng> {
        TicTacToeEngine::new(ChaCha8Rng::seed_from_u64(11))
    }

    #[test]
    fn test_moves_rejected_before_start() {
        let mut game = engine();
        assert_eq!(game.apply_human_move(0), Err(MoveError::GameInactive));
        assert_eq!(game.play_computer_move(), Err(MoveError::GameInactive));
    }

    #[test]
    fn test_turns_alternate() {
        let mut game = engine();
        game.start_game(Difficulty::Easy);
        assert_eq!(game.apply_human_move(4), Ok(TicTacToePhase::ComputerTurn));
        assert_eq!(game.apply_human_move(0), Err(MoveError::NotYourTurn(Player::X)));

        let cell = game.play_computer_move().unwrap();
        assert_ne!(cell, 4);
        assert_eq!(game.phase(), TicTacToePhase::HumanTurn);
        assert_eq!(game.play_computer_move(), Err(MoveError::NotYourTurn(Player::O)));
    }

    #[test]
    fn test_occupied_and_out_of_range_leave_board_untouched() {
        let mut game = engine();
        game.start_game(Difficulty::Hard);
        game.apply_human_move(0).unwrap();
        let o = game.play_computer_move().unwrap();
        let before = *game.board();

        assert_eq!(game.apply_human_move(o), Err(MoveError::CellOccupied(o)));
        assert_eq!(game.apply_human_move(9), Err(MoveError::OutOfBounds(9)));
        assert_eq!(game.board(), &before);
        assert_eq!(game.phase(), TicTacToePhase::HumanTurn);
    }

    #[test]
    fn test_win_scores_by_difficulty() {
        for (difficulty, expected) in [(Difficulty::Easy, 100), (Difficulty::Medium, 200)] {
            let mut game = engine();
            game.difficulty = Some(difficulty);
            game.board = Board::from_pattern("XX.OO....").unwrap();
            game.phase = TicTacToePhase::HumanTurn;
            game.apply_human_move(2).unwrap();
            assert_eq!(game.outcome(), Some(Outcome::Won));
            assert_eq!(game.final_score(), Some(expected));
        }
    }

    #[test]
    fn test_loss_and_draw_score_nothing() {
        let mut game = engine();
        game.start_game(Difficulty::Hard);
        game.board = Board::from_pattern("XX.OO.X..").unwrap();
        game.phase = TicTacToePhase::ComputerTurn;
        assert_eq!(game.play_computer_move(), Ok(5));
        assert_eq!(game.outcome(), Some(Outcome::Lost));
        assert_eq!(game.final_score(), None);
    }

    #[test]
    fn test_reset_twice_equals_once() {
        let mut game = engine();
        game.start_game(Difficulty::Medium);
        game.apply_human_move(4).unwrap();

        game.reset_game();
        let once = (*game.board(), game.phase(), game.difficulty());
        game.reset_game();
        let twice = (*game.board(), game.phase(), game.difficulty());

        assert_eq!(once, twice);
        assert_eq!(once, (Board::new(), TicTacToePhase::HumanTurn, Some(Difficulty::Medium)));
    }

    #[test]
    fn test_return_to_menu_clears_difficulty() {
        let mut game = engine();
        game.start_game(Difficulty::Easy);
        game.return_to_menu();
        assert_eq!(game.phase(), TicTacToePhase::SelectingDifficulty);
        assert_eq!(game.difficulty(), None);
        game.reset_game();
        assert_eq!(game.phase(), TicTacToePhase::SelectingDifficulty);
    }
}
