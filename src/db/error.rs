//! Score store failures.

use derive_more::{Display, Error};

/// What part of the score store failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum DbErrorKind {
    /// The SQLite file could not be opened.
    #[display("connection")]
    Connection,
    /// Embedded migrations did not apply.
    #[display("migration")]
    Migration,
    /// A statement failed.
    #[display("query")]
    Query,
    /// A score does not fit the `INTEGER` column.
    #[display("score out of range")]
    ScoreOutOfRange,
    /// A stored game key names no known game.
    #[display("unknown game key")]
    UnknownGameKey,
}

/// Score store error, tagged with its kind and the line that raised it.
#[derive(Debug, Clone, Display, Error)]
#[display("Score store {} error: {} at {}:{}", kind, message, file, line)]
pub struct DbError {
    /// Failure category.
    pub kind: DbErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl DbError {
    /// Creates an error of the given kind at the caller's location.
    #[track_caller]
    pub fn new(kind: DbErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Failure category.
    pub fn kind(&self) -> DbErrorKind {
        self.kind
    }
}

impl From<diesel::result::Error> for DbError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::new(DbErrorKind::Query, err.to_string())
    }
}

impl From<diesel::ConnectionError> for DbError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(DbErrorKind::Connection, err.to_string())
    }
}
