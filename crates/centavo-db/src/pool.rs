//! # Connection Pool
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DbConfig::new(path) / from_env_or(path) / in_memory()                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await   opens a WAL SqlitePool, migrates         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.amounts()                  repository sharing the pool              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! WAL lets readers keep resolving amounts while `backfill` holds the write
//! lock. `busy_timeout` makes a second writer wait instead of failing.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations::{self, MigrationStatus};
use crate::repository::amount::AmountRepository;

/// Environment variable holding the database path for binaries.
pub const DB_PATH_ENV: &str = "CENTAVO_DB_PATH";

// =============================================================================
// Configuration
// =============================================================================

/// Where the database lives and how the pool behaves.
///
/// ```rust,ignore
/// let config = DbConfig::new("./centavo.db")
///     .max_connections(4)
///     .busy_timeout(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite file, created when missing. `None` means a private in-memory
    /// database.
    pub database_path: Option<PathBuf>,

    /// Pool size. In-memory databases always use 1: each connection would
    /// otherwise see its own empty database.
    pub max_connections: u32,

    /// How long `acquire` waits for a free connection.
    pub acquire_timeout: Duration,

    /// How long a statement waits on SQLite's write lock.
    pub busy_timeout: Duration,

    /// Apply embedded migrations in [`Database::new`].
    pub run_migrations: bool,
}

impl DbConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: Some(path.into()),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    /// Uses `CENTAVO_DB_PATH` when set and non-empty, `default_path` otherwise.
    pub fn from_env_or(default_path: impl Into<PathBuf>) -> Self {
        match std::env::var(DB_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => DbConfig::new(path),
            _ => DbConfig::new(default_path),
        }
    }

    /// A fresh database that disappears with the pool. For tests.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: None,
            max_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max.max(1);
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    fn connect_options(&self) -> SqliteConnectOptions {
        let options = match &self.database_path {
            Some(path) => SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal),
            None => SqliteConnectOptions::new()
                .in_memory(true)
                .journal_mode(SqliteJournalMode::Memory),
        };

        options
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(self.busy_timeout)
    }

    fn describe(&self) -> String {
        match &self.database_path {
            Some(path) => path.display().to_string(),
            None => ":memory:".to_string(),
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle to an open, migrated database. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool and, unless disabled, applies migrations.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(database = %config.describe(), "Opening database");

        let in_memory = config.database_path.is_none();
        let max_connections = if in_memory { 1 } else { config.max_connections };

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(config.acquire_timeout);

        if in_memory {
            // Dropping the only connection would drop the data with it
            pool_options = pool_options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(config.connect_options())
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!(max_connections, in_memory, "Pool ready");

        let db = Database { pool };
        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies pending migrations. A no-op when the schema is current.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    pub async fn migration_status(&self) -> DbResult<MigrationStatus> {
        migrations::migration_status(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Amount records, read and written through both amount columns.
    pub fn amounts(&self) -> AmountRepository {
        AmountRepository::new(self.pool.clone())
    }

    /// `true` when a trivial query succeeds.
    pub async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }

    /// Waits for in-flight queries, then closes every connection.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database closed");
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);
    }

    #[tokio::test]
    async fn test_migrations_are_current_and_rerunnable() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let status = db.migration_status().await.unwrap();
        assert!(status.embedded >= 1);
        assert!(status.is_current());

        db.run_migrations().await.unwrap();
        assert_eq!(db.migration_status().await.unwrap(), status);
    }

    #[tokio::test]
    async fn test_unmigrated_database_reports_zero_applied() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();

        let status = db.migration_status().await.unwrap();
        assert_eq!(status.applied, 0);
        assert!(!status.is_current());
    }

    #[tokio::test]
    async fn test_closed_pool_fails_health_check() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        assert!(!db.health_check().await);
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/centavo-test.db")
            .max_connections(0)
            .busy_timeout(Duration::from_secs(1))
            .run_migrations(false);

        assert_eq!(config.max_connections, 1);
        assert_eq!(config.busy_timeout, Duration::from_secs(1));
        assert!(!config.run_migrations);
        assert_eq!(config.describe(), "/tmp/centavo-test.db");
        assert_eq!(DbConfig::in_memory().describe(), ":memory:");
    }

    // The only test in this crate that touches the process environment
    #[test]
    fn test_from_env_or_prefers_nonblank_variable() {
        std::env::set_var(DB_PATH_ENV, "/tmp/centavo-from-env.db");
        let config = DbConfig::from_env_or("./centavo.db");
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/centavo-from-env.db")));

        std::env::set_var(DB_PATH_ENV, "   ");
        let config = DbConfig::from_env_or("./centavo.db");
        assert_eq!(config.database_path, Some(PathBuf::from("./centavo.db")));

        std::env::remove_var(DB_PATH_ENV);
        let config = DbConfig::from_env_or("./centavo.db");
        assert_eq!(config.database_path, Some(PathBuf::from("./centavo.db")));
        assert!(config.run_migrations);
    }
}
