//! Failures of the sender store.

use thiserror::Error;

/// Anything that can go wrong while reading or writing sender preferences.
#[derive(Debug, Error)]
pub enum Error {
    /// The SQLite layer failed: open, schema, query or commit.
    #[error("sender database: {0}")]
    Database(#[from] sqlx::Error),

    /// A row written moments ago could not be read back.
    #[error("sender {0} vanished from the store")]
    MissingSender(String),

    /// The secret store or password command failed.
    #[error(transparent)]
    Credential(#[from] crate::credentials::CredentialError),
}

impl Error {
    /// True when SQLite reported the database as locked or busy, which
    /// usually means another process holds a write transaction.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        match self {
            Self::Database(sqlx::Error::Database(db)) => {
                db.code().is_some_and(|code| code == "5" || code == "6")
            }
            _ => false,
        }
    }
}

/// Shorthand for results carrying a store [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
