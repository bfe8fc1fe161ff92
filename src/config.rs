//! Application configuration.
//!
//! Values come from a TOML file when one is given, otherwise defaults apply.
//! `MOZGALICA_DB` (also read from `.env`) overrides the database path.

use std::path::Path;
use std::time::Duration;

use derive_getters::Getters;
use derive_more::{Display, Error};
use mozgalica_engines::ScoredMoves;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Environment variable overriding [`AppConfig::database_path`].
pub const DATABASE_ENV: &str = "MOZGALICA_DB";

/// Configuration error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new config error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file holding the score history.
    database_path: String,

    /// Pause before the computer answers a tic-tac-toe move.
    computer_delay_ms: u64,

    /// How long a mismatched memory pair stays face up.
    mismatch_delay_ms: u64,

    /// Count the closing pair when computing the memory score.
    memory_score_includes_closing_pair: bool,

    /// Seed for every game's random source; entropy when absent.
    seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: "mozgalica.db".to_string(),
            computer_delay_ms: 600,
            mismatch_delay_ms: 1_000,
            memory_score_includes_closing_pair: false,
            seed: None,
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file. Missing keys take defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(database = %config.database_path, "Config loaded successfully");
        Ok(config)
    }

    /// Loads the file if given, then applies environment overrides.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides())
    }

    /// Applies `MOZGALICA_DB` if set.
    #[instrument(skip(self))]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(path) = std::env::var(DATABASE_ENV)
            && !path.trim().is_empty()
        {
            debug!(path = %path, "Database path overridden from environment");
            self.database_path = path;
        }
        self
    }

    /// Replaces the database path.
    pub fn with_database_path(mut self, path: impl Into<String>) -> Self {
        self.database_path = path.into();
        self
    }

    /// Computer thinking pause as a [`Duration`].
    pub fn computer_delay(&self) -> Duration {
        Duration::from_millis(self.computer_delay_ms)
    }

    /// Mismatch reveal time as a [`Duration`].
    pub fn mismatch_delay(&self) -> Duration {
        Duration::from_millis(self.mismatch_delay_ms)
    }

    /// Random source for a new game: seeded when configured, entropy otherwise.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Move count convention for memory scores.
    pub fn scored_moves(&self) -> ScoredMoves {
        if self.memory_score_includes_closing_pair {
            ScoredMoves::IncludingClosingPair
        } else {
            ScoredMoves::BeforeClosingPair
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: AppConfig = toml::from_str("mismatch_delay_ms = 250\nseed = 9").unwrap();
        assert_eq!(*config.mismatch_delay_ms(), 250);
        assert_eq!(*config.seed(), Some(9));
        assert_eq!(config.database_path(), "mozgalica.db");
        assert_eq!(config.computer_delay(), Duration::from_millis(600));
    }

    #[test]
    fn test_scored_moves_flag() {
        let config: AppConfig =
            toml::from_str("memory_score_includes_closing_pair = true").unwrap();
        assert_eq!(config.scored_moves(), ScoredMoves::IncludingClosingPair);
        assert_eq!(AppConfig::default().scored_moves(), ScoredMoves::BeforeClosingPair);
    }

    #[test]
    fn test_unknown_file_is_an_error() {
        let err = AppConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(err.message.contains("Failed to read"));
    }
}
