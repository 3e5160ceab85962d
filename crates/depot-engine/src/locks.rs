//! # Scoped Advisory Locks
//!
//! In-process lock registry that serializes check-then-write sequences on
//! the state they actually touch.
//!
//! ## Why Scopes Instead Of A Global Lock
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Scoped Serialization                                │
//! │                                                                         │
//! │  Ceilings are enforced by reading a count, then writing a row. Two     │
//! │  concurrent writers can both read "2 of 3 used" and both insert.       │
//! │                                                                         │
//! │  A single global mutex fixes that but serializes EVERYTHING:           │
//! │                                                                         │
//! │    create MWH.001 @ ZWOLLE-001   ──┐                                   │
//! │    create MWH.099 @ VETSBY-001   ──┤── needlessly queued               │
//! │    link   MWH.050 → store 7      ──┘                                   │
//! │                                                                         │
//! │  Scoped locks only collide operations that share an invariant:         │
//! │                                                                         │
//! │    Scope::Location("ZWOLLE-001")  │ active-count-per-location          │
//! │    Scope::Warehouse("MWH.001")    │ code uniqueness, products ceiling  │
//! │    Scope::Store(7)                │ warehouses-per-store ceiling       │
//! │    Scope::ProductStore(3, 7)      │ per-(product, store) ceiling       │
//! │                                                                         │
//! │  Deadlock freedom: every acquire sorts its scopes into one canonical   │
//! │  order first, so no two operations ever hold locks in opposite order.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Single-Process Assumption
//! These are advisory locks inside one process. The UNIQUE indexes in the
//! schema remain the backstop for anything that slips past (for example a
//! second process writing the same database file).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::trace;

/// Registry entries older than this many scopes get swept opportunistically.
const SWEEP_THRESHOLD: usize = 1024;

/// A unit of state that an engine operation reads and then writes.
///
/// The derived `Ord` (variant order, then payload) is the canonical
/// acquisition order used by [`ScopeLocks::acquire`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    /// Active-warehouse count at a location.
    Location(String),
    /// One business unit code: uniqueness, lifecycle state, its product ceiling.
    Warehouse(String),
    /// Distinct-warehouse ceiling of a store.
    Store(i64),
    /// The two-warehouse ceiling of one (product, store) pair.
    ProductStore(i64, i64),
}

/// Named async mutexes, created on demand.
///
/// ## Thread Safety
/// The registry itself is guarded by a std `Mutex` (held only for map
/// lookups, never across `.await`). The per-scope locks are tokio mutexes
/// whose guards are held across repository calls.
///
/// ## Usage
/// ```rust,ignore
/// let _guards = locks
///     .acquire(vec![
///         Scope::Warehouse(code.clone()),
///         Scope::Store(store_id),
///     ])
///     .await;
/// // read counts, decide, write - serialized per scope
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScopeLocks {
    entries: Arc<Mutex<HashMap<Scope, Arc<AsyncMutex<()>>>>>,
}

impl ScopeLocks {
    /// Creates an empty lock registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires every given scope in canonical order and returns the guards.
    ///
    /// ## Ordering
    /// Scopes are sorted (and deduplicated) before any lock is taken, so
    /// concurrent operations requesting overlapping scope sets cannot
    /// deadlock regardless of the order callers list them in.
    ///
    /// ## Returns
    /// Guards for all requested scopes. Dropping the vector releases them.
    pub async fn acquire(&self, mut scopes: Vec<Scope>) -> Vec<OwnedMutexGuard<()>> {
        scopes.sort();
        scopes.dedup();

        let mut guards = Vec::with_capacity(scopes.len());
        for scope in scopes {
            trace!(scope = ?scope, "Acquiring scope lock");
            let lock = self.lock_for(scope);
            guards.push(lock.lock_owned().await);
        }

        guards
    }

    /// Returns the shared mutex for a scope, creating it on first use.
    fn lock_for(&self, scope: Scope) -> Arc<AsyncMutex<()>> {
        let mut entries = self.entries.lock().expect("Scope registry mutex poisoned");

        // Drop entries nobody holds once the map has grown past the
        // threshold. Entries appear one per distinct code/id ever locked.
        if entries.len() > SWEEP_THRESHOLD {
            entries.retain(|_, lock| Arc::strong_count(lock) > 1);
        }

        entries
            .entry(scope)
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    #[cfg(test)]
    fn registry_len(&self) -> usize {
        self.entries
            .lock()
            .expect("Scope registry mutex poisoned")
            .len()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
