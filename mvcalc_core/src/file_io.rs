//! # File I/O Module
//!
//! Reads and writes catalog files.
//!
//! - **Strict load**: [`load_catalog`] returns the catalog or a typed error.
//! - **Degraded load**: [`load_catalog_or_empty`] never fails; on any problem
//!   it hands back an empty catalog together with the error, so callers can
//!   disable dependent calculations and tell the operator what to fix.
//! - **Atomic save**: [`write_catalog`] writes to a `.tmp` sibling, syncs, and
//!   renames into place.
//!
//! Loading is not retried: a missing or malformed catalog is a configuration
//! problem, not a transient one.
//!
//! ## Example
//!
//! ```rust,no_run
//! use mvcalc_core::file_io::load_catalog_or_empty;
//! use std::path::Path;
//!
//! let loaded = load_catalog_or_empty(Path::new("catalog.json"));
//! if let Some(problem) = &loaded.problem {
//!     eprintln!("catalog unavailable: {}", problem);
//! }
//! println!("{} conductors", loaded.catalog.conductors().len());
//! ```

use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::errors::{CalcError, CalcResult};

/// Result of a degraded-mode load.
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    /// The loaded catalog, or an empty one if loading failed
    pub catalog: Catalog,
    /// Why loading failed, if it did
    pub problem: Option<CalcError>,
}

impl LoadedCatalog {
    /// True when the catalog is a stand-in for one that could not be loaded
    pub fn is_degraded(&self) -> bool {
        self.problem.is_some()
    }
}

/// Load and validate a catalog file.
///
/// # Returns
///
/// * `Ok(Catalog)` - Successfully loaded catalog
/// * `Err(CalcError::ConfigurationMissing)` - File absent or unreadable
/// * `Err(CalcError::MalformedCatalog)` - Invalid JSON, inconsistent entries,
///   or a file with neither conductors nor transformers
/// * `Err(CalcError::VersionMismatch)` - File version is incompatible
pub fn load_catalog(path: &Path) -> CalcResult<Catalog> {
    let mut file = File::open(path).map_err(|e| {
        let reason = match e.kind() {
            ErrorKind::NotFound => "file not found".to_string(),
            _ => e.to_string(),
        };
        CalcError::configuration_missing(path.display().to_string(), reason)
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        CalcError::configuration_missing(path.display().to_string(), e.to_string())
    })?;

    let catalog = Catalog::from_json_str(&contents).map_err(|e| match e {
        CalcError::MalformedCatalog { reason } => {
            CalcError::malformed(format!("{}: {}", path.display(), reason))
        }
        other => other,
    })?;

    if catalog.is_empty() {
        return Err(CalcError::malformed(format!(
            "{}: catalog lists no conductors and no transformers",
            path.display()
        )));
    }

    info!(
        path = %path.display(),
        conductors = catalog.conductors().len(),
        single_phase_sizes = catalog.transformers().single_phase.len(),
        three_phase_sizes = catalog.transformers().three_phase.len(),
        "catalog loaded"
    );
    Ok(catalog)
}

/// Load a catalog, falling back to an empty one on any error.
pub fn load_catalog_or_empty(path: &Path) -> LoadedCatalog {
    match load_catalog(path) {
        Ok(catalog) => LoadedCatalog {
            catalog,
            problem: None,
        },
        Err(problem) => {
            warn!(
                path = %path.display(),
                code = problem.error_code(),
                "catalog unavailable, continuing with an empty catalog: {}",
                problem
            );
            LoadedCatalog {
                catalog: Catalog::empty(),
                problem: Some(problem),
            }
        }
    }
}

/// Write a catalog to a file with atomic write semantics.
///
/// 1. Serialize catalog to JSON
/// 2. Write to a temporary file (.tmp)
/// 3. Sync to disk (fsync)
/// 4. Rename over the target
pub fn write_catalog(catalog: &Catalog, path: &Path) -> CalcResult<()> {
    let json = catalog.to_json_string()?;

    let tmp_path = path.with_extension("json.tmp");

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    info!(path = %path.display(), "catalog written");
    Ok(())
}
