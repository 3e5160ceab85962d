//! # Engine Error Types
//!
//! One error enum for everything an engine operation can return.
//!
//! ## Layering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Layering                                  │
//! │                                                                         │
//! │  depot-core DomainError ──┐                                             │
//! │    (rule violations)      ├──► EngineError ──► status_code()           │
//! │  depot-db DbError ────────┘         │                                   │
//! │    (storage failures)               │                                   │
//! │                                     ▼                                   │
//! │          Domain errors keep their REST mapping (400/404/409),          │
//! │          storage failures surface as 500.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use depot_core::{CeilingError, DomainError, ValidationError};
use depot_db::DbError;

/// Errors produced by engine operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A business rule rejected the operation.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The storage layer failed.
    #[error("storage error: {0}")]
    Storage(#[from] DbError),
}

impl EngineError {
    /// Maps the error to the HTTP status a REST handler would return.
    ///
    /// ## Returns
    /// * Domain errors keep their own mapping (400, 404, 409)
    /// * Storage errors are internal faults (500)
    pub fn status_code(&self) -> u16 {
        match self {
            EngineError::Domain(e) => e.status_code(),
            EngineError::Storage(_) => 500,
        }
    }
}

// Rule helpers in depot-core return the narrow payload enums. Lift them
// through DomainError so engine code can use `?` directly.
impl From<CeilingError> for EngineError {
    fn from(err: CeilingError) -> Self {
        EngineError::Domain(err.into())
    }
}

impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        EngineError::Domain(err.into())
    }
}

/// Convenience Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

// =============================================================================
// Unit Tests
// =============================================================================
