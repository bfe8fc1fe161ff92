//! Math quiz session: runs the one-second clock.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use mozgalica_engines::{AnswerOutcome, Difficulty, GameKey, MathQuizEngine, QuizError};
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

use super::{ScoreReporter, lock};

/// Clock period.
const TICK: Duration = Duration::from_secs(1);

/// Drives a [`MathQuizEngine`] for one player.
#[derive(Debug)]
pub struct MathQuizSession {
    engine: Arc<Mutex<MathQuizEngine>>,
    reporter: ScoreReporter,
    clock: Option<JoinHandle<()>>,
    pending_report: Option<JoinHandle<()>>,
}

impl MathQuizSession {
    /// Creates a session around an engine.
    pub fn new(engine: MathQuizEngine, reporter: ScoreReporter) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            reporter,
            clock: None,
            pending_report: None,
        }
    }

    /// Runs `f` against the engine.
    pub fn inspect<T>(&self, f: impl FnOnce(&MathQuizEngine) -> T) -> T {
        f(&lock(&self.engine))
    }

    /// Starts a round and its clock.
    #[instrument(skip(self))]
    pub fn start_game(&mut self, difficulty: Difficulty) {
        self.stop_clock();
        lock(&self.engine).start_game(difficulty);
        self.start_clock();
    }

    /// Restarts the round at the same difficulty.
    #[instrument(skip(self))]
    pub fn reset_game(&mut self) {
        self.stop_clock();
        let mut engine = lock(&self.engine);
        engine.reset_game();
        let restarted = engine.difficulty().is_some();
        drop(engine);
        if restarted {
            self.start_clock();
        }
    }

    /// Abandons the round and goes back to difficulty selection.
    #[instrument(skip(self))]
    pub fn return_to_menu(&mut self) {
        self.stop_clock();
        lock(&self.engine).return_to_menu();
    }

    /// Submits an answer; the last one stops the clock and reports the score.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::NotActive`] when no round is running.
    #[instrument(skip(self))]
    pub fn submit_answer(&mut self, selected: i32) -> Result<AnswerOutcome, QuizError> {
        let outcome = lock(&self.engine).submit_answer(selected)?;
        if let Some(score) = outcome.final_score {
            self.stop_clock();
            self.pending_report = self.reporter.report(GameKey::MathQuiz, score);
        }
        Ok(outcome)
    }

    /// Waits until the last reported score has been handed to the sink.
    pub async fn flush_reports(&mut self) {
        if let Some(handle) = self.pending_report.take() {
            let _ = handle.await;
        }
    }

    fn start_clock(&mut self) {
        let engine = Arc::clone(&self.engine);
        self.clock = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + TICK, TICK);
            loop {
                interval.tick().await;
                if !lock(&engine).tick() {
                    debug!("Quiz clock stopped");
                    break;
                }
            }
        }));
    }

    fn stop_clock(&mut self) {
        if let Some(clock) = self.clock.take() {
            clock.abort();
        }
    }
}

impl Drop for MathQuizSession {
    fn drop(&mut self) {
        self.stop_clock();
    }
}
