//! Memory session: runs the mismatch reveal timer.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use mozgalica_engines::{Difficulty, FlipError, FlipOutcome, GameKey, MemoryEngine};
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

use super::{ScoreReporter, lock};

/// Engine plus a counter bumped whenever the grid is replaced, so a timer
/// scheduled for an older grid recognises itself as stale.
#[derive(Debug)]
struct Shared {
    engine: MemoryEngine,
    generation: u64,
}

/// Drives a [`MemoryEngine`] for one player.
///
/// A mismatched pair stays face up for the reveal delay; a background timer then
/// turns it back. Flips are refused until it has.
#[derive(Debug)]
pub struct MemorySession {
    shared: Arc<Mutex<Shared>>,
    reporter: ScoreReporter,
    reveal: Duration,
    timer: Option<JoinHandle<()>>,
    pending_report: Option<JoinHandle<()>>,
}

impl MemorySession {
    /// Creates a session; mismatches stay visible for `reveal`.
    pub fn new(engine: MemoryEngine, reporter: ScoreReporter, reveal: Duration) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                engine,
                generation: 0,
            })),
            reporter,
            reveal,
            timer: None,
            pending_report: None,
        }
    }

    /// Runs `f` against the engine.
    pub fn inspect<T>(&self, f: impl FnOnce(&MemoryEngine) -> T) -> T {
        f(&lock(&self.shared).engine)
    }

    /// Deals a grid for the difficulty.
    #[instrument(skip(self))]
    pub fn start_game(&mut self, difficulty: Difficulty) {
        self.cancel_timer();
        let mut shared = lock(&self.shared);
        shared.generation += 1;
        shared.engine.setup(difficulty);
    }

    /// Deals a new grid at the same difficulty.
    #[instrument(skip(self))]
    pub fn reset_game(&mut self) {
        self.cancel_timer();
        let mut shared = lock(&self.shared);
        shared.generation += 1;
        shared.engine.reset_game();
    }

    /// Goes back to difficulty selection.
    #[instrument(skip(self))]
    pub fn return_to_menu(&mut self) {
        self.cancel_timer();
        let mut shared = lock(&self.shared);
        shared.generation += 1;
        shared.engine.return_to_menu();
    }

    /// Flips a card; a mismatch schedules the pair to turn back after the delay,
    /// a win reports the score.
    ///
    /// # Errors
    ///
    /// Returns [`FlipError`] when the flip is refused; nothing changes.
    #[instrument(skip(self))]
    pub fn flip(&mut self, card_id: usize) -> Result<FlipOutcome, FlipError> {
        let (outcome, generation, score) = {
            let mut shared = lock(&self.shared);
            let outcome = shared.engine.flip(card_id)?;
            (outcome, shared.generation, shared.engine.final_score())
        };

        match outcome {
            FlipOutcome::Mismatched => self.schedule_reset(generation),
            FlipOutcome::Won => {
                if let Some(score) = score {
                    self.pending_report = self.reporter.report(GameKey::Memory, score);
                }
            }
            FlipOutcome::Revealed | FlipOutcome::Matched => {}
        }
        Ok(outcome)
    }

    /// Waits for an outstanding mismatch timer to turn its pair back.
    pub async fn settle(&mut self) {
        if let Some(timer) = self.timer.take() {
            let _ = timer.await;
        }
    }

    /// Waits until the last reported score has been handed to the sink.
    pub async fn flush_reports(&mut self) {
        if let Some(handle) = self.pending_report.take() {
            let _ = handle.await;
        }
    }

    fn schedule_reset(&mut self, generation: u64) {
        self.cancel_timer();
        let shared = Arc::clone(&self.shared);
        let reveal = self.reveal;
        debug!(?reveal, "Scheduling mismatch reset");

        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(reveal).await;
            let mut shared = lock(&shared);
            if shared.generation == generation {
                shared.engine.resolve_mismatch();
            } else {
                debug!("Stale mismatch timer ignored");
            }
        }));
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for MemorySession {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
