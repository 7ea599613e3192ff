//! # Storage Errors
//!
//! Everything a repository, the recorder or the pool can fail with.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Where a DbError goes                                 │
//! │                                                                         │
//! │  sqlx::Error / MigrateError                                            │
//! │       │  From                                                           │
//! │       ▼                                                                 │
//! │  DbError ── NotFound ─────────────► 404 { "message" }                  │
//! │       │                                                                 │
//! │       └──── any other variant ────► 500 { "message" }, logged          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories report a missing row as `Ok(None)` / `Ok(false)`, so
//! `NotFound` only appears when a caller builds it with [`DbError::not_found`]
//! or sqlx reports `RowNotFound`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// A row the caller required is absent.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A `sale_items.sale_id` pointing at no sale.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// CHECK or NOT NULL rejected the row, e.g. an unknown `payment_status`.
    #[error("Constraint violation: {message}")]
    ConstraintViolation { message: String },

    /// The database file could not be opened or created.
    #[error("Cannot open database: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// SQLite rejected a statement for any other reason.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// No connection became free within the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound { .. })
    }
}

/// SQLite only names the violated constraint in its message text
/// ("FOREIGN KEY constraint failed", "CHECK constraint failed: ...").
fn classify_sqlite_message(msg: &str) -> DbError {
    let message = msg.to_string();
    if msg.contains("FOREIGN KEY constraint failed") {
        DbError::ForeignKeyViolation { message }
    } else if msg.contains("CHECK constraint failed") || msg.contains("NOT NULL constraint failed") {
        DbError::ConstraintViolation { message }
    } else {
        DbError::QueryFailed(message)
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Row", "unknown"),
            sqlx::Error::Database(db_err) => classify_sqlite_message(db_err.message()),
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),
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
    fn test_row_not_found_maps_to_not_found() {
        let err: DbError = sqlx::Error::RowNotFound.into();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_pool_errors() {
        let err: DbError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, DbError::PoolExhausted));
        assert_eq!(err.to_string(), "Connection pool exhausted");

        let err: DbError = sqlx::Error::PoolClosed.into();
        assert!(matches!(err, DbError::ConnectionFailed(_)));
    }

    #[test]
    fn test_constraint_messages() {
        assert!(matches!(
            classify_sqlite_message("FOREIGN KEY constraint failed"),
            DbError::ForeignKeyViolation { .. }
        ));
        assert!(matches!(
            classify_sqlite_message("CHECK constraint failed: payment_status"),
            DbError::ConstraintViolation { .. }
        ));
        assert!(matches!(
            classify_sqlite_message("no such table: sales"),
            DbError::QueryFailed(_)
        ));
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(
            DbError::not_found("Customer", "abc").to_string(),
            "Customer not found: abc"
        );
    }
}
