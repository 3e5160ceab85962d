//! # Location Catalog
//!
//! The immutable table of locations a warehouse can be hosted at.
//!
//! ## Why a Fixed Table?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Location Catalog                                  │
//! │                                                                         │
//! │  Locations are physical sites under long-term lease. They change on    │
//! │  the timescale of releases, not requests, so the catalog ships as      │
//! │  code: no table to migrate, no cache to invalidate, nothing to seed.   │
//! │                                                                         │
//! │  resolve_by_identifier("ZWOLLE-001")                                   │
//! │       │                                                                 │
//! │       ├── blank?            → InvalidArgument (location is required)   │
//! │       ├── exact match?      → Location { max warehouses, max capacity }│
//! │       └── anything else     → NotFound (case-sensitive, no fuzzing)    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult, Entity, ValidationError};

// =============================================================================
// Location
// =============================================================================

/// A physical site that can host warehouses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Catalog identifier, e.g. "AMSTERDAM-001".
    pub identification: String,

    /// How many active warehouses the site can host at once.
    pub max_number_of_warehouses: i64,

    /// Largest capacity a single warehouse at this site may declare.
    pub max_capacity: i64,
}

// =============================================================================
// Catalog
// =============================================================================

/// The built-in location table: (identifier, max warehouses, max capacity).
const BUILTIN_LOCATIONS: &[(&str, i64, i64)] = &[
    ("ZWOLLE-001", 1, 40),
    ("ZWOLLE-002", 2, 50),
    ("AMSTERDAM-001", 5, 100),
    ("AMSTERDAM-002", 3, 75),
    ("TILBURG-001", 2, 60),
    ("HELMOND-001", 1, 45),
    ("EINDHOVEN-001", 2, 70),
    ("VETSBY-001", 4, 90),
];

/// Immutable lookup table of hosting locations.
///
/// ## Usage
/// ```rust
/// use depot_core::LocationCatalog;
///
/// let catalog = LocationCatalog::builtin();
/// let location = catalog.resolve_by_identifier("AMSTERDAM-001").unwrap();
/// assert_eq!(location.max_capacity, 100);
/// ```
#[derive(Debug, Clone)]
pub struct LocationCatalog {
    locations: Vec<Location>,
}

impl LocationCatalog {
    /// Returns the catalog of built-in locations.
    pub fn builtin() -> Self {
        let locations = BUILTIN_LOCATIONS
            .iter()
            .map(|&(identification, max_number_of_warehouses, max_capacity)| Location {
                identification: identification.to_string(),
                max_number_of_warehouses,
                max_capacity,
            })
            .collect();

        LocationCatalog { locations }
    }

    /// Resolves a location by its exact identifier.
    ///
    /// ## Rules
    /// - Blank identifier is an argument error, not a lookup miss
    /// - Matching is exact and case-sensitive ("zwolle-001" does not resolve)
    ///
    /// ## Returns
    /// * `Ok(Location)` - Identifier found in the catalog
    /// * `Err(DomainError::InvalidArgument)` - Identifier blank
    /// * `Err(DomainError::NotFound)` - Identifier unknown
    pub fn resolve_by_identifier(&self, identifier: &str) -> DomainResult<Location> {
        if identifier.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "location".to_string(),
            }
            .into());
        }

        self.locations
            .iter()
            .find(|location| location.identification == identifier)
            .cloned()
            .ok_or_else(|| DomainError::not_found(Entity::Location, identifier))
    }

    /// Checks whether an identifier resolves without consuming the result.
    pub fn contains(&self, identifier: &str) -> bool {
        self.locations
            .iter()
            .any(|location| location.identification == identifier)
    }

    /// Iterates over all catalog entries.
    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter()
    }

    /// Number of catalog entries.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Whether the catalog is empty (never true for the built-in table).
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

impl Default for LocationCatalog {
    fn default() -> Self {
        LocationCatalog::builtin()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_values() {
        let catalog = LocationCatalog::builtin();
        assert_eq!(catalog.len(), 8);

        let zwolle = catalog.resolve_by_identifier("ZWOLLE-001").unwrap();
        assert_eq!(zwolle.max_number_of_warehouses, 1);
        assert_eq!(zwolle.max_capacity, 40);

        let amsterdam = catalog.resolve_by_identifier("AMSTERDAM-001").unwrap();
        assert_eq!(amsterdam.max_number_of_warehouses, 5);
        assert_eq!(amsterdam.max_capacity, 100);
    }

    #[test]
    fn test_every_builtin_identifier_resolves() {
        let catalog = LocationCatalog::builtin();
        for identifier in [
            "ZWOLLE-001",
            "ZWOLLE-002",
            "AMSTERDAM-001",
            "AMSTERDAM-002",
            "TILBURG-001",
            "HELMOND-001",
            "EINDHOVEN-001",
            "VETSBY-001",
        ] {
            assert!(
                catalog.resolve_by_identifier(identifier).is_ok(),
                "{identifier} should resolve"
            );
        }
    }

    #[test]
    fn test_blank_identifier_is_invalid_argument() {
        let catalog = LocationCatalog::builtin();

        for blank in ["", "   ", "\t"] {
            let err = catalog.resolve_by_identifier(blank).unwrap_err();
            assert!(matches!(err, DomainError::InvalidArgument(_)));
            assert_eq!(err.status_code(), 400);
        }
    }

    #[test]
    fn test_unknown_identifier_is_not_found() {
        let catalog = LocationCatalog::builtin();

        let err = catalog.resolve_by_identifier("NOWHERE-001").unwrap_err();
        assert!(matches!(
            err,
            DomainError::NotFound {
                entity: Entity::Location,
                ..
            }
        ));
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let catalog = LocationCatalog::builtin();

        assert!(catalog.contains("ZWOLLE-001"));
        assert!(!catalog.contains("zwolle-001"));
        assert!(catalog.resolve_by_identifier("Zwolle-001").is_err());
    }
}
