//! # Database Errors
//!
//! Every sqlx and migration failure is folded into [`DbError`] before it
//! leaves this crate.
//!
//! ```text
//! sqlx::Error / MigrateError ──► DbError ──► StateError::Storage
//!                                             (cart store keeps memory as-is)
//! ```

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// A row that had to exist did not (see `StorageSlotRepository::require`).
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The database file could not be opened or the pool is gone.
    ///
    /// A read-only data dir or a closed pool both end up here. The cart
    /// store surfaces it as a storage error and keeps the in-memory cart.
    #[error("Cannot reach database: {0}")]
    ConnectionFailed(String),

    #[error("Schema migration failed: {0}")]
    MigrationFailed(String),

    /// SQLite rejected the statement.
    #[error("SQLite rejected query: {0}")]
    QueryFailed(String),

    /// Every pooled connection stayed busy past the acquire timeout.
    #[error("No free database connection")]
    PoolExhausted,

    #[error("Unexpected database error: {0}")]
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

/// ```text
/// sqlx::Error::RowNotFound        → DbError::NotFound
/// sqlx::Error::Database           → DbError::QueryFailed  (message + SQLite code)
/// sqlx::Error::PoolTimedOut       → DbError::PoolExhausted
/// sqlx::Error::PoolClosed         → DbError::ConnectionFailed
/// sqlx::Error::Io / Configuration → DbError::ConnectionFailed
/// Other                           → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Row", "unknown"),
            sqlx::Error::Database(db_err) => match db_err.code() {
                Some(code) => DbError::QueryFailed(format!("{} (code {})", db_err.message(), code)),
                None => DbError::QueryFailed(db_err.message().to_string()),
            },
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool closed".to_string()),
            sqlx::Error::Io(io) => DbError::ConnectionFailed(io.to_string()),
            sqlx::Error::Configuration(cfg) => DbError::ConnectionFailed(cfg.to_string()),
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
