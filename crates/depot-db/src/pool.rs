//! # Database Pool Management
//!
//! Connection pool creation and configuration for SQLite.
//!
//! ## Connection Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DbConfig::new("./depot.db")          DbConfig::in_memory()             │
//! │        │                                    │  (tests)                  │
//! │        └──────────────┬─────────────────────┘                           │
//! │                       ▼                                                 │
//! │              Database::new(config).await                                │
//! │                       │                                                 │
//! │                       ├── open / create the SQLite file                 │
//! │                       ├── WAL journal, NORMAL sync, FKs on              │
//! │                       ├── build the SqlitePool                          │
//! │                       └── run embedded migrations                       │
//! │                       ▼                                                 │
//! │              db.warehouses() / db.associations() / ...                  │
//! │              (repositories cloned per call, pool shared)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! The pool opens SQLite in WAL (Write-Ahead Logging) mode so the engines'
//! read-heavy precondition checks never queue behind a writer. Writes still
//! serialize inside SQLite; `busy_timeout` covers the moments two pool
//! connections want the write lock at once.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::association::AssociationRepository;
use crate::repository::product::ProductRepository;
use crate::repository::store::StoreRepository;
use crate::repository::warehouse::WarehouseRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Pool settings, consumed by [`Database::new`].
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("./data/depot.db").max_connections(8);
/// let db = Database::new(config).await?;
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path of the SQLite file. Created on first connect when missing.
    pub database_path: PathBuf,

    /// Upper bound on pooled connections. Default: 5.
    pub max_connections: u32,

    /// Connections kept open even when idle. Default: 1.
    pub min_connections: u32,

    /// How long an acquire may wait for a free connection. Default: 30s.
    pub connect_timeout: Duration,

    /// Idle time after which a surplus connection is closed. Default: 10 min.
    pub idle_timeout: Duration,

    /// How long SQLite retries when the write lock is held elsewhere.
    /// Default: 5s.
    pub busy_timeout: Duration,

    /// Apply pending migrations during [`Database::new`]. Default: true.
    pub run_migrations: bool,
}

impl DbConfig {
    /// File-backed configuration with the defaults above.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    /// Configuration for an isolated in-memory database.
    ///
    /// Every test gets a private database this way; nothing to clean up
    /// afterwards. The pool is pinned to one connection because each new
    /// `:memory:` connection would otherwise open a fresh empty database.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            busy_timeout: Duration::from_secs(1),
            run_migrations: true,
        }
    }

    /// Sets the upper bound on pooled connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the number of connections kept open when idle.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the acquire timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the SQLite busy timeout.
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Enables or disables migrations during connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Builds the sqlx connection options for this configuration.
    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        // mode=rwc: read-write, create the file when missing. The same URL
        // shape covers :memory:, which SQLite resolves before touching disk.
        let url = format!("sqlite://{}?mode=rwc", self.database_path.display());

        let options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(self.busy_timeout)
            .foreign_keys(true)
            .create_if_missing(true);

        Ok(options)
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle over the connection pool, the root object the engines hold.
///
/// Cloning is cheap and shares the pool; the repository accessors hand out
/// lightweight views over the same connections.
///
/// ## Usage in Engines
/// ```rust,ignore
/// let active = db.warehouses().count_active_by_location("ZWOLLE-001").await?;
/// let linked = db.associations().is_warehouse_linked_to_store("MWH.001", store_id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (or creates) the database and prepares it for the engines.
    ///
    /// Connects with WAL journaling, NORMAL synchronous and foreign keys
    /// enabled, sizes the pool from `config`, then applies pending
    /// migrations unless `config.run_migrations` is off.
    ///
    /// ## Returns
    /// * `Ok(Database)` - Pool connected, schema up to date
    /// * `Err(DbError::ConnectionFailed)` - File could not be opened/created
    /// * `Err(DbError::MigrationFailed)` - A pending migration did not apply
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening SQLite database"
        );

        let options = config.connect_options()?;
        debug!("Connect options ready, building pool");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "SQLite pool ready"
        );

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies pending migrations.
    ///
    /// Idempotent; `new()` already calls this unless the config disabled it.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// The raw pool, for queries no repository covers.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Warehouse generations: inserts, lookups, counts, replacement.
    pub fn warehouses(&self) -> WarehouseRepository {
        WarehouseRepository::new(self.pool.clone())
    }

    /// Associations: composite-key CRUD and the ceiling counts.
    pub fn associations(&self) -> AssociationRepository {
        AssociationRepository::new(self.pool.clone())
    }

    /// Products referenced by associations.
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    /// Stores referenced by associations.
    pub fn stores(&self) -> StoreRepository {
        StoreRepository::new(self.pool.clone())
    }

    /// Closes the pool. Repository calls fail after this.
    pub async fn close(&self) {
        info!("Closing SQLite pool");
        self.pool.close().await;
    }

    /// Whether the database answers queries right now.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
