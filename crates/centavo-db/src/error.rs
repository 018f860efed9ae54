//! # Database Errors
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sqlx::Error / MigrateError                                             │
//! │       │  From impls below                                               │
//! │       ▼                                                                 │
//! │  DbError  ──►  repository / backfill caller                             │
//! │                                                                         │
//! │  Amount parsing never shows up here: a malformed legacy value resolves  │
//! │  to zero in centavo-core instead of failing the read.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Failures of the storage layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// No row with the given id.
    #[error("no {entity} with id {id}")]
    NotFound { entity: String, id: String },

    /// A UNIQUE constraint rejected the write, e.g. a reused record id.
    #[error("{field} must be unique: {detail}")]
    UniqueViolation { field: String, detail: String },

    /// The database file could not be opened or the pool is closed.
    #[error("cannot connect to database: {0}")]
    ConnectionFailed(String),

    #[error("migration error: {0}")]
    MigrationFailed(String),

    /// SQLite rejected a statement.
    #[error("query error: {0}")]
    QueryFailed(String),

    /// Begin or commit failed; the batch was rolled back.
    #[error("transaction error: {0}")]
    TransactionFailed(String),

    #[error("timed out waiting for a pooled connection")]
    PoolExhausted,

    #[error("database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            // Only reachable through fetch_one; lookups use fetch_optional
            sqlx::Error::RowNotFound => DbError::not_found("row", "?"),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                let detail = db_err.message().to_string();
                // SQLite: "UNIQUE constraint failed: amount_records.id"
                let field = detail
                    .rsplit(": ")
                    .next()
                    .unwrap_or("unknown")
                    .to_string();
                DbError::UniqueViolation { field, detail }
            }
            sqlx::Error::Database(db_err) => DbError::QueryFailed(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool closed".to_string()),
            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = DbError::not_found("AmountRecord", "abc");
        assert_eq!(err.to_string(), "no AmountRecord with id abc");
    }

    #[test]
    fn test_sqlx_error_mapping() {
        assert!(matches!(
            DbError::from(sqlx::Error::RowNotFound),
            DbError::NotFound { .. }
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::PoolTimedOut),
            DbError::PoolExhausted
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::PoolClosed),
            DbError::ConnectionFailed(_)
        ));
    }
}
