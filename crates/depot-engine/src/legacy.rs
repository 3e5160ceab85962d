//! # Legacy Sink
//!
//! Outbound notification seam towards the old warehouse management system.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Legacy Notification Flow                           │
//! │                                                                         │
//! │  StoreService.create ──► insert row ──► sink.store_created(&store)     │
//! │  StoreService.update ──► update row ──► sink.store_updated(&store)     │
//! │  StoreService.remove ──► delete row ──► (nothing - removals stay here) │
//! │                                                                         │
//! │  Notifications run AFTER the write commits and are fire-and-forget:    │
//! │  a sink failure is logged and never rolls back or fails the operation. │
//! │  The legacy side catches up from the next event.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The default [`LoggingLegacySink`] only logs the event it would have
//! delivered. A real transport (HTTP, queue) plugs in behind the same
//! trait without touching the store service.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use depot_core::Store;

/// Errors a sink implementation can report.
///
/// The store service logs these at WARN; they never propagate to callers.
#[derive(Error, Debug)]
pub enum SinkError {
    /// The event payload could not be encoded.
    #[error("failed to encode event payload: {0}")]
    Encode(#[from] serde_json::Error),

    /// The legacy endpoint refused or failed to take the event.
    #[error("legacy endpoint rejected event: {0}")]
    Rejected(String),
}

/// Receiver for store change events.
///
/// ## Implementing
/// ```rust,ignore
/// struct HttpSink { client: reqwest::Client, url: String }
///
/// #[async_trait]
/// impl LegacySink for HttpSink {
///     async fn store_created(&self, store: &Store) -> Result<(), SinkError> {
///         // POST the payload; map transport failures to SinkError::Rejected
///     }
///     ...
/// }
/// ```
#[async_trait]
pub trait LegacySink: Send + Sync {
    /// Delivers a store-created event.
    async fn store_created(&self, store: &Store) -> Result<(), SinkError>;

    /// Delivers a store-updated event.
    async fn store_updated(&self, store: &Store) -> Result<(), SinkError>;
}

/// Default sink: logs each event instead of delivering it anywhere.
///
/// Every event gets a fresh id so log lines can be correlated with the
/// legacy side once a real transport exists.
#[derive(Debug, Clone, Default)]
pub struct LoggingLegacySink;

#[async_trait]
impl LegacySink for LoggingLegacySink {
    async fn store_created(&self, store: &Store) -> Result<(), SinkError> {
        let payload = serde_json::to_string(store)?;
        info!(
            event_id = %Uuid::new_v4(),
            event = "store.created",
            payload = %payload,
            "Legacy notification"
        );
        Ok(())
    }

    async fn store_updated(&self, store: &Store) -> Result<(), SinkError> {
        let payload = serde_json::to_string(store)?;
        info!(
            event_id = %Uuid::new_v4(),
            event = "store.updated",
            payload = %payload,
            "Legacy notification"
        );
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn store() -> Store {
        Store {
            id: 1,
            name: "Amsterdam Centrum".to_string(),
            quantity_products_in_stock: 12,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_logging_sink_accepts_events() {
        let sink = LoggingLegacySink;

        sink.store_created(&store()).await.unwrap();
        sink.store_updated(&store()).await.unwrap();
    }

    #[test]
    fn test_sink_error_messages() {
        let err = SinkError::Rejected("connection refused".to_string());
        assert_eq!(
            err.to_string(),
            "legacy endpoint rejected event: connection refused"
        );
    }
}
