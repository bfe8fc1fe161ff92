//! Database repository for users and their scores.

use std::collections::BTreeMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use mozgalica_engines::{GameKey, ScoreSink, SinkError};
use tracing::{debug, info, instrument, warn};

use crate::db::{
    DbError, DbErrorKind, GameSummary, HistoryFilter, NewScore, NewUser, Score, ScoreEntry, User,
    schema,
};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Database repository for users and scores.
///
/// Each operation opens its own connection, so the repository is cheap to clone
/// and safe to move into blocking tasks.
#[derive(Debug, Clone)]
pub struct ScoreRepository {
    db_path: String,
}

impl ScoreRepository {
    /// Opens (creating if needed) the database at the given path and applies
    /// pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String) -> Result<Self, DbError> {
        info!(path = %db_path, "Opening ScoreRepository");
        let repository = Self { db_path };
        let mut conn = repository.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(DbErrorKind::Migration, e.to_string()))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(repository)
    }

    /// Path of the database file.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path).map_err(|e| {
            DbError::new(
                DbErrorKind::Connection,
                format!("Failed to open '{}': {}", self.db_path, e),
            )
        })
    }

    /// Gets a user by name. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_user_by_name(&self, username: &str) -> Result<Option<User>, DbError> {
        debug!(username = %username, "Looking up user by name");
        let mut conn = self.connection()?;

        let user = schema::users::table
            .filter(schema::users::username.eq(username))
            .first::<User>(&mut conn)
            .optional()?;

        Ok(user)
    }

    /// Returns the user with this name, creating it first if needed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_or_create_user(&self, username: &str) -> Result<User, DbError> {
        let mut conn = self.connection()?;

        conn.transaction::<_, DbError, _>(|conn| {
            let existing = schema::users::table
                .filter(schema::users::username.eq(username))
                .first::<User>(conn)
                .optional()?;

            if let Some(user) = existing {
                debug!(user_id = user.id(), "Existing user found");
                return Ok(user);
            }

            let user = diesel::insert_into(schema::users::table)
                .values(&NewUser::new(username.to_string()))
                .returning(User::as_returning())
                .get_result(conn)?;

            info!(user_id = user.id(), username = %user.username(), "User created");
            Ok(user)
        })
    }

    /// Lists all users, ordered by creation.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list_users(&self) -> Result<Vec<User>, DbError> {
        let mut conn = self.connection()?;

        let users = schema::users::table
            .order((schema::users::created_at.asc(), schema::users::id.asc()))
            .load::<User>(&mut conn)?;

        debug!(count = users.len(), "Users loaded");
        Ok(users)
    }

    /// Stores a score for a user, creating the user if needed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs or the score does not fit.
    #[instrument(skip(self))]
    pub fn save_score(&self, username: &str, game: GameKey, score: u32) -> Result<Score, DbError> {
        let score = i32::try_from(score).map_err(|_| {
            DbError::new(
                DbErrorKind::ScoreOutOfRange,
                format!("Score {} out of range", score),
            )
        })?;
        let user = self.get_or_create_user(username)?;
        let mut conn = self.connection()?;

        let stored = diesel::insert_into(schema::scores::table)
            .values(&NewScore::new(*user.id(), game.storage_key().to_string(), score))
            .returning(Score::as_returning())
            .get_result(&mut conn)?;

        info!(
            score_id = stored.id(),
            user_id = stored.user_id(),
            game = %stored.game_key(),
            score = stored.score(),
            "Score saved"
        );
        Ok(stored)
    }

    /// Lists scores matching the filter, newest first.
    ///
    /// The game narrows the query; the username substring is matched on the
    /// loaded rows with Unicode case folding, taking `%` and `_` literally.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn score_history(&self, filter: &HistoryFilter) -> Result<Vec<ScoreEntry>, DbError> {
        let mut conn = self.connection()?;

        let mut query = schema::scores::table
            .inner_join(schema::users::table)
            .select((
                schema::scores::id,
                schema::users::username,
                schema::scores::game_key,
                schema::scores::score,
                schema::scores::played_at,
            ))
            .into_boxed();

        if let Some(game) = filter.game_filter() {
            query = query.filter(schema::scores::game_key.eq(game.storage_key()));
        }

        let entries = query
            .order((schema::scores::played_at.desc(), schema::scores::id.desc()))
            .load::<ScoreEntry>(&mut conn)?
            .into_iter()
            .filter(|entry| filter.matches_username(entry.username()))
            .collect::<Vec<_>>();

        info!(count = entries.len(), "Score history loaded");
        Ok(entries)
    }

    /// Best score and number of games for each game the user has played.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn summaries(&self, username: &str) -> Result<Vec<GameSummary>, DbError> {
        let mut conn = self.connection()?;

        let scores = schema::scores::table
            .inner_join(schema::users::table)
            .filter(schema::users::username.eq(username))
            .select(Score::as_select())
            .load::<Score>(&mut conn)?;

        let mut by_game: BTreeMap<&str, (GameKey, i32, usize)> = BTreeMap::new();
        for score in &scores {
            let game = match score.parse_game_key() {
                Ok(game) => game,
                Err(e) => {
                    warn!(score_id = score.id(), error = %e, "Skipping score with unknown game");
                    continue;
                }
            };
            let entry = by_game
                .entry(game.storage_key())
                .or_insert((game, *score.score(), 0));
            entry.1 = entry.1.max(*score.score());
            entry.2 += 1;
        }

        let summaries: Vec<GameSummary> = by_game
            .into_values()
            .map(|(game, best, played)| GameSummary::new(game, best, played))
            .collect();

        info!(username = %username, games = summaries.len(), "Summaries computed");
        Ok(summaries)
    }

    /// Deletes every score. Users are kept.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn clear_history(&self) -> Result<usize, DbError> {
        let mut conn = self.connection()?;
        let deleted = diesel::delete(schema::scores::table).execute(&mut conn)?;
        info!(deleted, "Score history cleared");
        Ok(deleted)
    }
}

#[async_trait]
impl ScoreSink for ScoreRepository {
    #[instrument(skip(self))]
    async fn record(&self, username: &str, game: GameKey, score: u32) -> Result<(), SinkError> {
        let repository = self.clone();
        let username = username.to_string();

        tokio::task::spawn_blocking(move || repository.save_score(&username, game, score))
            .await
            .map_err(|e| SinkError::new(format!("Score task failed: {}", e)))?
            .map(|_| ())
            .map_err(|e| SinkError::new(e.to_string()))
    }
}
