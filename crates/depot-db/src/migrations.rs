//! # Database Migrations
//!
//! Schema management via sqlx's embedded migrator.
//!
//! The SQL files under `migrations/sqlite/` are compiled into the binary by
//! `sqlx::migrate!`, so a deployment is the executable plus its database
//! file and nothing else. On connect the migrator compares the embedded
//! list against the `_sqlx_migrations` bookkeeping table and applies
//! whatever is missing, in filename order, each inside its own transaction.
//!
//! ## Adding a Migration
//! 1. Add `migrations/sqlite/NNN_description.sql` with the next number
//! 2. Never edit an applied migration; correct mistakes with a new file

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

/// All SQL files under `migrations/sqlite`, embedded at compile time.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies pending migrations. Idempotent.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("Applying pending migrations");

    MIGRATOR.run(pool).await?;

    info!("All migrations applied");
    Ok(())
}

/// Reports `(embedded, applied)` migration counts, for health output.
///
/// A fresh file that has never connected has no bookkeeping table yet;
/// that reads as zero applied rather than an error.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
        .unwrap_or(0);

    Ok((total, applied as usize))
}
