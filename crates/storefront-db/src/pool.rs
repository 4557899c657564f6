//! # Connection Pool
//!
//! Opens the SQLite file that backs the storefront's saved state.
//!
//! ```text
//! DbConfig::new(path) ──► Database::new(config) ──► db.slots()
//!   pool size, timeouts      create dir, connect,      StorageSlotRepository
//!                            migrate
//! ```
//!
//! A file database is opened in WAL mode with `synchronous = NORMAL`. The
//! `:memory:` database is pinned to one connection that never idles out,
//! since each SQLite connection to `:memory:` sees a separate database.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::slot::StorageSlotRepository;

const MEMORY_PATH: &str = ":memory:";

fn connection_failed(err: impl std::fmt::Display) -> DbError {
    DbError::ConnectionFailed(err.to_string())
}

// =============================================================================
// DbConfig
// =============================================================================

/// Where the database lives and how the pool around it behaves.
///
/// ```rust
/// use storefront_db::DbConfig;
///
/// let config = DbConfig::new("/tmp/storefront.db").max_connections(2);
/// assert_eq!(config.max_connections, 2);
/// assert!(config.run_migrations);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_path: PathBuf,
    pub max_connections: u32,
    pub min_connections: u32,
    /// How long to wait for a free connection.
    pub connect_timeout: Duration,
    /// `None` keeps idle connections open forever.
    pub idle_timeout: Option<Duration>,
    pub run_migrations: bool,
}

impl DbConfig {
    /// A file-backed database at `path`. Missing parent directories are
    /// created when the pool opens.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 4,
            min_connections: 1,
            connect_timeout: Duration::from_secs(10),
            idle_timeout: Some(Duration::from_secs(300)),
            run_migrations: true,
        }
    }

    /// A private in-memory database, gone once the pool closes.
    pub fn in_memory() -> Self {
        DbConfig {
            max_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: None,
            ..DbConfig::new(MEMORY_PATH)
        }
    }

    pub fn max_connections(self, max_connections: u32) -> Self {
        DbConfig { max_connections, ..self }
    }

    pub fn min_connections(self, min_connections: u32) -> Self {
        DbConfig { min_connections, ..self }
    }

    pub fn connect_timeout(self, connect_timeout: Duration) -> Self {
        DbConfig { connect_timeout, ..self }
    }

    pub fn run_migrations(self, run_migrations: bool) -> Self {
        DbConfig { run_migrations, ..self }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path == Path::new(MEMORY_PATH)
    }

    fn ensure_parent_dir(&self) -> DbResult<()> {
        match self.database_path.parent() {
            Some(dir) if !self.is_in_memory() && !dir.as_os_str().is_empty() => {
                std::fs::create_dir_all(dir).map_err(connection_failed)
            }
            _ => Ok(()),
        }
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        if self.is_in_memory() {
            return SqliteConnectOptions::from_str("sqlite::memory:").map_err(connection_failed);
        }

        Ok(SqliteConnectOptions::new()
            .filename(&self.database_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal))
    }

    fn pool_options(&self) -> SqlitePoolOptions {
        let options = SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections.min(self.max_connections))
            .acquire_timeout(self.connect_timeout)
            .idle_timeout(self.idle_timeout);

        if self.is_in_memory() {
            options.max_lifetime(None)
        } else {
            options
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// An open pool. Clones share it.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connects and, unless `config.run_migrations` is off, migrates.
    ///
    /// ```rust,ignore
    /// let db = Database::new(DbConfig::new("./storefront.db")).await?;
    /// let raw = db.slots().get("cart-storage").await?;
    /// ```
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(path = %config.database_path.display(), "Opening storefront database");

        config.ensure_parent_dir()?;
        let pool = config
            .pool_options()
            .connect_with(config.connect_options()?)
            .await
            .map_err(connection_failed)?;
        debug!(
            max_connections = config.max_connections,
            in_memory = config.is_in_memory(),
            "Pool ready"
        );

        let db = Database { pool };
        if config.run_migrations {
            db.run_migrations().await?;
        }
        Ok(db)
    }

    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// Raw pool access for queries outside the repositories.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn slots(&self) -> StorageSlotRepository {
        StorageSlotRepository::new(self.pool.clone())
    }

    /// Closes every connection; later queries fail.
    pub async fn close(&self) {
        info!("Closing storefront database");
        self.pool.close().await;
    }

    pub async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}
