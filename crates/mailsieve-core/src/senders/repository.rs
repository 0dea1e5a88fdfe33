//! Sender repository for persistent storage of importance flags.

use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use tracing::debug;

use super::model::SenderRecord;
use crate::{Error, Result};

/// Repository for sender preference records.
#[derive(Debug, Clone)]
pub struct SenderRepository {
    pool: SqlitePool,
}

impl SenderRepository {
    /// Opens (or creates) the database at `database_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn new(database_path: &str) -> Result<Self> {
        let url = format!("sqlite:{database_path}?mode=rwc");
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        let repo = Self { pool };
        repo.initialize().await?;
        Ok(repo)
    }

    /// Creates an in-memory repository for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let repo = Self { pool };
        repo.initialize().await?;
        Ok(repo)
    }

    async fn initialize(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS senders (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE,
                important INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Looks up a sender by address.
    ///
    /// Addresses are compared exactly; no case folding is applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get(&self, email: &str) -> Result<Option<SenderRecord>> {
        let row = sqlx::query(
            r"
            SELECT id, email, important, created_at, updated_at
            FROM senders
            WHERE email = ?
            ",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| row_to_sender(&r)))
    }

    /// Returns the sender's record, creating an unimportant one if absent.
    ///
    /// The flag tells whether the record was created by this call.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn get_or_create(&self, email: &str) -> Result<(SenderRecord, bool)> {
        let inserted = sqlx::query(
            r"
            INSERT INTO senders (email, important) VALUES (?, 0)
            ON CONFLICT(email) DO NOTHING
            ",
        )
        .bind(email)
        .execute(&self.pool)
        .await?;

        let created = inserted.rows_affected() == 1;
        if created {
            debug!(email, "new sender recorded");
        }

        let record = self
            .get(email)
            .await?
            .ok_or_else(|| Error::MissingSender(email.to_string()))?;
        Ok((record, created))
    }

    /// Sets the sender's flag, creating the record first if needed.
    ///
    /// Returns the updated record and whether it was created.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn set_importance(&self, email: &str, important: bool) -> Result<(SenderRecord, bool)> {
        let (_, created) = self.get_or_create(email).await?;

        sqlx::query(
            r"
            UPDATE senders
            SET important = ?,
                updated_at = CURRENT_TIMESTAMP
            WHERE email = ?
            ",
        )
        .bind(important)
        .bind(email)
        .execute(&self.pool)
        .await?;

        let record = self
            .get(email)
            .await?
            .ok_or_else(|| Error::MissingSender(email.to_string()))?;
        Ok((record, created))
    }

    /// True only if the sender has a record flagged important.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn is_important(&self, email: &str) -> Result<bool> {
        Ok(self.get(email).await?.is_some_and(|s| s.important))
    }

    /// Deletes every record whose flag equals `important`.
    ///
    /// Returns the number of records removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn delete_where(&self, important: bool) -> Result<u64> {
        let result = sqlx::query("DELETE FROM senders WHERE important = ?")
            .bind(important)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Sets the flag on every address in one transaction, creating records
    /// that don't exist yet.
    ///
    /// Returns the number of records written.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails; nothing is committed in that case.
    pub async fn mark_bulk(&self, emails: &[String], important: bool) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0;

        for email in emails {
            let result = sqlx::query(
                r"
                INSERT INTO senders (email, important) VALUES (?, ?)
                ON CONFLICT(email) DO UPDATE
                SET important = excluded.important,
                    updated_at = CURRENT_TIMESTAMP
                ",
            )
            .bind(email)
            .bind(important)
            .execute(&mut *tx)
            .await?;
            written += result.rows_affected();
        }

        tx.commit().await?;
        debug!(count = written, important, "bulk marked senders");
        Ok(written)
    }

    /// Lists stored senders ordered by address, optionally only those whose
    /// flag equals `important`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, important: Option<bool>) -> Result<Vec<SenderRecord>> {
        let rows = sqlx::query(
            r"
            SELECT id, email, important, created_at, updated_at
            FROM senders
            WHERE ?1 IS NULL OR important = ?1
            ORDER BY email
            ",
        )
        .bind(important)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_sender).collect())
    }
}

fn row_to_sender(row: &SqliteRow) -> SenderRecord {
    SenderRecord {
        id: row.get("id"),
        email: row.get("email"),
        important: row.get("important"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
