//! Tic-tac-toe session: human move, a short pause, the computer's reply.

use std::time::Duration;

use mozgalica_engines::{Difficulty, GameKey, MoveError, Outcome, TicTacToeEngine, TicTacToePhase};
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

use super::ScoreReporter;

/// What happened during one human turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnReport {
    /// Cell the computer answered with, if the game went on.
    pub computer_cell: Option<usize>,
    /// Phase once the turn is over.
    pub phase: TicTacToePhase,
}

/// Drives a [`TicTacToeEngine`] for one player.
#[derive(Debug)]
pub struct TicTacToeSession {
    engine: TicTacToeEngine,
    reporter: ScoreReporter,
    thinking: Duration,
    pending_report: Option<JoinHandle<()>>,
}

impl TicTacToeSession {
    /// Creates a session; the computer pauses for `thinking` before each reply.
    pub fn new(engine: TicTacToeEngine, reporter: ScoreReporter, thinking: Duration) -> Self {
        Self {
            engine,
            reporter,
            thinking,
            pending_report: None,
        }
    }

    /// Read access to the engine.
    pub fn engine(&self) -> &TicTacToeEngine {
        &self.engine
    }

    /// Starts a game at the given difficulty.
    pub fn start_game(&mut self, difficulty: Difficulty) {
        self.engine.start_game(difficulty);
    }

    /// Replays at the same difficulty.
    pub fn reset_game(&mut self) {
        self.engine.reset_game();
    }

    /// Goes back to difficulty selection.
    pub fn return_to_menu(&mut self) {
        self.engine.return_to_menu();
    }

    /// Plays the human's move and, if the game goes on, the computer's reply.
    ///
    /// Dropping the returned future during the pause leaves the computer to
    /// move; [`TicTacToeSession::finish_computer_turn`] picks it up again.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError`] when the move is refused; the board is unchanged.
    #[instrument(skip(self))]
    pub async fn human_move(&mut self, cell: usize) -> Result<TurnReport, MoveError> {
        let phase = self.engine.apply_human_move(cell)?;
        if phase != TicTacToePhase::ComputerTurn {
            self.report_if_won();
            return Ok(TurnReport {
                computer_cell: None,
                phase,
            });
        }

        let computer_cell = self.finish_computer_turn().await?;
        Ok(TurnReport {
            computer_cell,
            phase: self.engine.phase(),
        })
    }

    /// Lets the computer move if it is its turn, after the thinking pause.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::InvariantViolation`] if the computer has no move.
    #[instrument(skip(self))]
    pub async fn finish_computer_turn(&mut self) -> Result<Option<usize>, MoveError> {
        if self.engine.phase() != TicTacToePhase::ComputerTurn {
            return Ok(None);
        }
        tokio::time::sleep(self.thinking).await;
        let cell = self.engine.play_computer_move()?;
        debug!(cell, "Computer replied");
        self.report_if_won();
        Ok(Some(cell))
    }

    /// Waits until the last reported score has been handed to the sink.
    pub async fn flush_reports(&mut self) {
        if let Some(handle) = self.pending_report.take() {
            let _ = handle.await;
        }
    }

    fn report_if_won(&mut self) {
        if self.engine.outcome() == Some(Outcome::Won)
            && let Some(score) = self.engine.final_score()
        {
            self.pending_report = self.reporter.report(GameKey::TicTacToe, score);
        }
    }
}
