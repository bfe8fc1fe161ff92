//! Login and per-user score summaries.

use std::sync::{Arc, PoisonError, RwLock};

use derive_more::{Display, Error, From};
use mozgalica_engines::CurrentUser;
use tracing::{debug, info, instrument};

use crate::{DbError, GameSummary, ScoreRepository, User};

/// Shortest accepted username, counted in characters after trimming.
pub const MIN_USERNAME_LEN: usize = 3;

/// Why a login failed.
#[derive(Debug, Clone, Display, Error, From)]
pub enum ProfileError {
    /// The trimmed name is too short.
    #[display("Username must be at least {} characters", MIN_USERNAME_LEN)]
    #[from(ignore)]
    NameTooShort,
    /// The user could not be loaded or created.
    #[display("{}", _0)]
    Db(DbError),
}

/// Service layer for user profile operations.
///
/// Wraps [`ScoreRepository`] with login semantics and remembers who is logged
/// in, which is what games consult before recording a score.
#[derive(Debug, Clone)]
pub struct ProfileService {
    repository: ScoreRepository,
    current: Arc<RwLock<Option<String>>>,
}

impl ProfileService {
    /// Creates a new profile service backed by the given repository.
    #[instrument(skip(repository))]
    pub fn new(repository: ScoreRepository) -> Self {
        info!("Creating ProfileService");
        Self {
            repository,
            current: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &ScoreRepository {
        &self.repository
    }

    /// Logs a user in, creating the profile on first login.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::NameTooShort`] for names under
    /// [`MIN_USERNAME_LEN`] characters, or a database error.
    #[instrument(skip(self))]
    pub fn login(&self, name: &str) -> Result<User, ProfileError> {
        let name = name.trim();
        if name.chars().count() < MIN_USERNAME_LEN {
            debug!(name = %name, "Rejected short username");
            return Err(ProfileError::NameTooShort);
        }

        let user = self.repository.get_or_create_user(name)?;
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(name.to_string());
        info!(user_id = user.id(), username = %name, "User logged in");
        Ok(user)
    }

    /// Forgets the logged-in user.
    #[instrument(skip(self))]
    pub fn logout(&self) {
        let previous = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        info!(username = ?previous, "User logged out");
    }

    /// Best score and play count per game for a user.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn summaries(&self, username: &str) -> Result<Vec<GameSummary>, DbError> {
        self.repository.summaries(username)
    }
}

impl CurrentUser for ProfileService {
    fn current_user(&self) -> Option<String> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
