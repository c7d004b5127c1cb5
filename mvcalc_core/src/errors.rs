//! # Error Types
//!
//! Structured error types for mvcalc_core. Every failure here is
//! deterministic: the same input against the same catalog fails the same way,
//! so none of these are worth retrying. They fall into two groups:
//!
//! - **Configuration errors** (catalog missing, malformed, wrong version):
//!   the operator has to fix the catalog file.
//! - **Request errors** (bad input, unknown conductor, no data for a phase):
//!   the caller has to fix the request.
//!
//! ## Example
//!
//! ```rust
//! use mvcalc_core::errors::{CalcError, CalcResult};
//!
//! fn validate_length(length_m: f64) -> CalcResult<()> {
//!     if length_m < 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "length_m",
//!             length_m.to_string(),
//!             "Length cannot be negative",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for mvcalc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for catalog and calculation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is out of range
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Catalog file absent or unreadable
    #[error("Catalog not available at '{path}': {reason}")]
    ConfigurationMissing { path: String, reason: String },

    /// Requested catalog item does not exist
    #[error("Unknown {kind}: '{name}' is not in the catalog")]
    InvalidSelection { kind: String, name: String },

    /// Transformer sizing has no capacities to search
    #[error("No transformer catalog data for {phase}")]
    NoCatalogDataForPhase { phase: String },

    /// A cost entry required by the fail-fast policy is absent
    #[error("Catalog entry missing: {entry}")]
    CatalogEntryMissing { entry: String },

    /// Catalog parsed as JSON but its contents are inconsistent
    #[error("Malformed catalog: {reason}")]
    MalformedCatalog { reason: String },

    /// Catalog schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a ConfigurationMissing error
    pub fn configuration_missing(path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::ConfigurationMissing {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidSelection error
    pub fn invalid_selection(kind: impl Into<String>, name: impl Into<String>) -> Self {
        CalcError::InvalidSelection {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Create a NoCatalogDataForPhase error
    pub fn no_catalog_data(phase: impl Into<String>) -> Self {
        CalcError::NoCatalogDataForPhase {
            phase: phase.into(),
        }
    }

    /// Create a CatalogEntryMissing error
    pub fn catalog_entry_missing(entry: impl Into<String>) -> Self {
        CalcError::CatalogEntryMissing {
            entry: entry.into(),
        }
    }

    /// Create a MalformedCatalog error
    pub fn malformed(reason: impl Into<String>) -> Self {
        CalcError::MalformedCatalog {
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True when the operator must fix the catalog rather than the request.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            CalcError::ConfigurationMissing { .. }
                | CalcError::MalformedCatalog { .. }
                | CalcError::VersionMismatch { .. }
                | CalcError::CatalogEntryMissing { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::ConfigurationMissing { .. } => "CONFIGURATION_MISSING",
            CalcError::InvalidSelection { .. } => "INVALID_SELECTION",
            CalcError::NoCatalogDataForPhase { .. } => "NO_CATALOG_DATA_FOR_PHASE",
            CalcError::CatalogEntryMissing { .. } => "CATALOG_ENTRY_MISSING",
            CalcError::MalformedCatalog { .. } => "MALFORMED_CATALOG",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_selection("conductor", "ACSR 4/0");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidSelection\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::no_catalog_data("three-phase").error_code(), "NO_CATALOG_DATA_FOR_PHASE");
        assert_eq!(
            CalcError::configuration_missing("catalog.json", "not found").error_code(),
            "CONFIGURATION_MISSING"
        );
    }

    #[test]
    fn test_configuration_classification() {
        assert!(CalcError::configuration_missing("catalog.json", "not found").is_configuration_error());
        assert!(CalcError::malformed("duplicate conductor").is_configuration_error());
        assert!(!CalcError::invalid_input("length_m", "-1", "negative").is_configuration_error());
        assert!(!CalcError::invalid_selection("conductor", "X").is_configuration_error());
    }

    #[test]
    fn test_display_message() {
        let error = CalcError::invalid_selection("conductor", "XLPE 50");
        assert_eq!(error.to_string(), "Unknown conductor: 'XLPE 50' is not in the catalog");
    }
}
