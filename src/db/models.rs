//! Database models and domain types.

use std::str::FromStr;

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use derive_setters::Setters;
use diesel::prelude::*;
use mozgalica_engines::GameKey;
use serde::Serialize;
use tracing::instrument;

use crate::db::{DbError, DbErrorKind, schema};

/// User database model.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::users)]
pub struct User {
    id: i32,
    username: String,
    created_at: NaiveDateTime,
}

/// Insertable user model.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::users)]
pub struct NewUser {
    username: String,
}

/// Score row as stored.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable, Getters)]
#[diesel(table_name = schema::scores)]
#[diesel(belongs_to(User))]
pub struct Score {
    id: i32,
    user_id: i32,
    game_key: String,
    score: i32,
    played_at: NaiveDateTime,
}

impl Score {
    /// Parses the stored game key.
    #[instrument(skip(self), fields(game_key = %self.game_key))]
    pub fn parse_game_key(&self) -> Result<GameKey, DbError> {
        parse_game_key(&self.game_key)
    }
}

/// Insertable score model.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::scores)]
pub struct NewScore {
    user_id: i32,
    game_key: String,
    score: i32,
}

/// A history row: a score joined with the name of the user who earned it.
#[derive(Debug, Clone, Queryable, Getters, Serialize)]
pub struct ScoreEntry {
    id: i32,
    username: String,
    game_key: String,
    score: i32,
    played_at: NaiveDateTime,
}

impl ScoreEntry {
    /// Parses the stored game key.
    #[instrument(skip(self), fields(game_key = %self.game_key))]
    pub fn parse_game_key(&self) -> Result<GameKey, DbError> {
        parse_game_key(&self.game_key)
    }
}

/// Narrows a history query. Empty filters match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Setters)]
#[setters(strip_option)]
pub struct HistoryFilter {
    /// Case-insensitive substring of the username.
    username: Option<String>,
    /// Exact game.
    game: Option<GameKey>,
}

impl HistoryFilter {
    /// Filter matching every score.
    pub fn all() -> Self {
        Self::default()
    }

    /// The username substring, if any.
    pub fn username_filter(&self) -> Option<&str> {
        self.username.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// True when `username` contains the substring, ignoring case. Always true
    /// without a substring.
    pub fn matches_username(&self, username: &str) -> bool {
        self.username_filter().is_none_or(|needle| {
            username
                .to_lowercase()
                .contains(&needle.trim().to_lowercase())
        })
    }

    /// The game, if any.
    pub fn game_filter(&self) -> Option<GameKey> {
        self.game
    }
}

/// Best score and play count for one game.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new, Serialize)]
pub struct GameSummary {
    game: GameKey,
    best_score: i32,
    games_played: usize,
}

#[instrument]
fn parse_game_key(s: &str) -> Result<GameKey, DbError> {
    GameKey::from_str(s).map_err(|_| {
        DbError::new(
            DbErrorKind::UnknownGameKey,
            format!("Invalid game key: '{}'", s),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_match_folds_non_ascii_case() {
        let filter = HistoryFilter::all().username("đorđe".to_string());
        assert!(filter.matches_username("Đorđe"));
        assert!(HistoryFilter::all().username("ČEDA".to_string()).matches_username("čeda"));
        assert!(!filter.matches_username("Dorde"));
    }

    #[test]
    fn test_username_match_is_literal() {
        assert!(!HistoryFilter::all().username("_".to_string()).matches_username("ana"));
        assert!(!HistoryFilter::all().username("%".to_string()).matches_username("ana"));
        assert!(HistoryFilter::all().username("a_b".to_string()).matches_username("xa_by"));
    }

    #[test]
    fn test_blank_filter_matches_everyone() {
        assert!(HistoryFilter::all().matches_username("ana"));
        assert!(HistoryFilter::all().username("  ".to_string()).matches_username("ana"));
    }

    #[test]
    fn test_unknown_game_key_kind() {
        let err = parse_game_key("Šah").expect_err("not a game");
        assert_eq!(err.kind(), DbErrorKind::UnknownGameKey);
    }
}
