//! Mozgalica - three small brain games with a local score history
//!
//! The game rules live in [`mozgalica_engines`]; this crate adds persistence,
//! player profiles, configuration and the async sessions that run timers and
//! report scores.
//!
//! # Architecture
//!
//! - **Engines**: pure tic-tac-toe, memory and math quiz state machines
//! - **Sessions**: tokio drivers for computer pauses, reveal timers and the quiz clock
//! - **Database**: SQLite score history through diesel
//! - **Profiles**: login and per-user summaries
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use mozgalica::engines::{Difficulty, TicTacToeEngine};
//! use mozgalica::{ProfileService, ScoreReporter, ScoreRepository, TicTacToeSession};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let repository = ScoreRepository::open("scores.db".to_string())?;
//! let profiles = Arc::new(ProfileService::new(repository.clone()));
//! profiles.login("ana")?;
//!
//! let reporter = ScoreReporter::new(Arc::new(repository), profiles);
//! let mut session = TicTacToeSession::new(
//!     TicTacToeEngine::from_entropy(),
//!     reporter,
//!     Duration::from_millis(600),
//! );
//! session.start_game(Difficulty::Hard);
//! let turn = session.human_move(4).await?;
//! println!("computer answered {:?}", turn.computer_cell);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod db;
mod profile_service;
mod session;

pub use mozgalica_engines as engines;

pub use config::{AppConfig, ConfigError, DATABASE_ENV};

pub use db::{
    DbError, DbErrorKind, GameSummary, HistoryFilter, NewScore, NewUser, Score, ScoreEntry,
    ScoreRepository, User,
};

pub use profile_service::{MIN_USERNAME_LEN, ProfileError, ProfileService};

pub use session::{MathQuizSession, MemorySession, ScoreReporter, TicTacToeSession, TurnReport};
