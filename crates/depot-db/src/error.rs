//! # Database Error Types
//!
//! What SQLite failures look like by the time an engine sees them.
//!
//! ## Classification
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sqlx::Error                          DbError                           │
//! │  ───────────────────────────────────  ────────────────────────────────  │
//! │  RowNotFound                        → NotFound                          │
//! │  Database, kind UniqueViolation     → UniqueViolation (engines remap)   │
//! │  Database, kind ForeignKeyViolation → ForeignKeyViolation               │
//! │  Database, other kinds              → QueryFailed                       │
//! │  PoolTimedOut                       → PoolExhausted                     │
//! │  PoolClosed                         → ConnectionFailed                  │
//! │  everything else                    → Internal                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Constraint violations get their own variants because the engines turn
//! them back into domain answers: a uniqueness race lost at INSERT time
//! reports exactly like the precondition check it slipped past.

use sqlx::error::ErrorKind;
use thiserror::Error;

/// Errors surfaced by the repositories and the pool.
#[derive(Debug, Error)]
pub enum DbError {
    /// No row matched a lookup, or an UPDATE/DELETE touched zero rows.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A UNIQUE index rejected the write.
    ///
    /// `constraint` carries the column list SQLite names in its message,
    /// e.g. `warehouses.business_unit_code`.
    #[error("Duplicate {constraint}: already exists")]
    UniqueViolation { constraint: String },

    /// A FOREIGN KEY constraint rejected the write.
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// The database file could not be opened or the pool could not be built.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// An embedded migration failed to apply.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// SQLite rejected the statement for a non-constraint reason.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// No free connection became available within the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Driver failures outside the cases above.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Builds a [`DbError::NotFound`] for the given entity and id.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Whether a UNIQUE index rejected the write.
    ///
    /// Callers that guarded the insert with a precondition check use this
    /// to report the lost race the same way the check would have.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DbError::UniqueViolation { .. })
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            // The driver classifies SQLite's extended result codes for us;
            // only the column list for the message needs parsing out.
            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::UniqueViolation => DbError::UniqueViolation {
                    constraint: constraint_from_message(db_err.message()),
                },
                ErrorKind::ForeignKeyViolation => {
                    DbError::ForeignKeyViolation(db_err.message().to_string())
                }
                _ => DbError::QueryFailed(db_err.message().to_string()),
            },

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

/// Extracts the column list from an SQLite constraint message.
///
/// SQLite reports `UNIQUE constraint failed: warehouses.business_unit_code`;
/// everything after the colon names the colliding columns. Unrecognized
/// messages pass through whole.
fn constraint_from_message(message: &str) -> String {
    message
        .rsplit("constraint failed: ")
        .next()
        .unwrap_or(message)
        .to_string()
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Unit Tests
// =============================================================================
