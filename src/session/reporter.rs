//! Fire-and-forget score reporting.

use std::sync::Arc;

use mozgalica_engines::{CurrentUser, GameKey, ScoreSink};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Sends final scores for the logged-in user to a sink without blocking play.
#[derive(Clone)]
pub struct ScoreReporter {
    sink: Arc<dyn ScoreSink>,
    user: Arc<dyn CurrentUser>,
}

impl std::fmt::Debug for ScoreReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreReporter")
            .field("user", &self.user.current_user())
            .finish_non_exhaustive()
    }
}

impl ScoreReporter {
    /// Creates a reporter writing to `sink` on behalf of `user`.
    pub fn new(sink: Arc<dyn ScoreSink>, user: Arc<dyn CurrentUser>) -> Self {
        Self { sink, user }
    }

    /// Records a score in the background.
    ///
    /// Returns `None` without recording when nobody is logged in. Failures are
    /// logged and never reach the game.
    #[instrument(skip(self))]
    pub fn report(&self, game: GameKey, score: u32) -> Option<JoinHandle<()>> {
        let Some(username) = self.user.current_user() else {
            debug!("No user logged in, score not recorded");
            return None;
        };

        let sink = Arc::clone(&self.sink);
        Some(tokio::spawn(async move {
            match sink.record(&username, game, score).await {
                Ok(()) => info!(username = %username, %game, score, "Score recorded"),
                Err(e) => {
                    warn!(username = %username, %game, score, error = %e, "Failed to record score")
                }
            }
        }))
    }
}
