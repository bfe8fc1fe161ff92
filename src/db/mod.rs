//! Score history persistence: users and the scores they earned.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use error::{DbError, DbErrorKind};
pub use models::{GameSummary, HistoryFilter, NewScore, NewUser, Score, ScoreEntry, User};
pub use repository::ScoreRepository;
