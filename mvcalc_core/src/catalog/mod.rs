//! # Equipment Catalog
//!
//! Static conductor and transformer data the engines look things up in.
//! A catalog is loaded once (see [`crate::file_io`]) and never mutated
//! afterwards, so a single instance can be shared read-only between any
//! number of calculations.
//!
//! ## File Format
//!
//! ```json
//! {
//!   "version": "0.1.0",
//!   "conductors": [
//!     { "type_name": "ACSR 2/0 Quail", "resistance_ohm_per_km": 0.425,
//!       "reactance_ohm_per_km": 0.39, "cost_per_meter": 31000.0 }
//!   ],
//!   "transformer_costs": {
//!     "single_phase": { "10": 9500000, "25": 14500000 },
//!     "three_phase": { "25": 32000000, "50": 45000000, "75": 58000000 }
//!   },
//!   "tariffs": { "connection_fee_fixed": 2500000, "connection_fee_per_kva": 28000 },
//!   "installation_defaults": { "labor": 3000000, "pole_and_mounting": 8000000,
//!                              "minor_materials": 2000000, "permits": 1500000 },
//!   "settings": { "energy_tariff_per_kwh": 450 }
//! }
//! ```
//!
//! Every section except `version` may be omitted, but unknown keys are
//! rejected at every level, so a misspelled section name fails to parse
//! instead of silently reading as empty. An omitted `tariffs` section is
//! remembered as absent, so sizing can apply the configured
//! [`MissingCostPolicy`](crate::settings::MissingCostPolicy).

pub mod conductors;
pub mod transformers;

pub use conductors::ConductorSpec;
pub use transformers::{
    CapacitySelection, CapacityTable, InstallationCosts, TariffSchedule, TransformerCatalog,
    TransformerRating,
};

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::phase::PhaseConfig;
use crate::settings::EngineSettings;

/// Current schema version for catalog files
pub const CATALOG_SCHEMA_VERSION: &str = "0.1.0";

fn default_version() -> String {
    CATALOG_SCHEMA_VERSION.to_string()
}

/// On-disk shape of a catalog, before cross-entry validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogFile {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub conductors: Vec<ConductorSpec>,
    #[serde(default)]
    pub transformer_costs: TransformerCatalog,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tariffs: Option<TariffSchedule>,
    #[serde(default)]
    pub installation_defaults: InstallationCosts,
    #[serde(default)]
    pub settings: EngineSettings,
}

/// Validated, immutable catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    version: String,
    conductors: Vec<ConductorSpec>,
    transformers: TransformerCatalog,
    tariffs: Option<TariffSchedule>,
    installation_defaults: InstallationCosts,
    settings: EngineSettings,
}

impl Catalog {
    /// A catalog with no conductors, no transformers and no tariff.
    ///
    /// This is what callers run against when the catalog file could not be
    /// loaded: every lookup fails with a typed error instead of panicking.
    pub fn empty() -> Self {
        Catalog {
            version: default_version(),
            conductors: Vec::new(),
            transformers: TransformerCatalog::default(),
            tariffs: None,
            installation_defaults: InstallationCosts::default(),
            settings: EngineSettings::default(),
        }
    }

    /// Parse and validate a catalog from JSON text.
    pub fn from_json_str(json: &str) -> CalcResult<Self> {
        let file: CatalogFile = serde_json::from_str(json)
            .map_err(|e| CalcError::malformed(format!("invalid catalog JSON: {}", e)))?;
        Catalog::try_from(file)
    }

    /// Serialize back to the on-disk shape.
    pub fn to_json_string(&self) -> CalcResult<String> {
        serde_json::to_string_pretty(&CatalogFile::from(self.clone())).map_err(|e| {
            CalcError::SerializationError {
                reason: e.to_string(),
            }
        })
    }

    /// A representative catalog, used to bootstrap a catalog file.
    pub fn sample() -> Self {
        let conductors = [
            ("ACSR 1/0 Raven", 0.536, 0.40, 25_000.0),
            ("ACSR 2/0 Quail", 0.425, 0.39, 31_000.0),
            ("ACSR 4/0 Penguin", 0.267, 0.37, 45_000.0),
            ("AAAC 95 mm2", 0.348, 0.36, 38_000.0),
        ]
        .into_iter()
        .map(|(name, r, x, cost)| ConductorSpec {
            type_name: name.to_string(),
            resistance_ohm_per_km: r,
            reactance_ohm_per_km: x,
            cost_per_meter: cost,
        })
        .collect();

        let single_phase = CapacityTable::from_ratings([
            (10.0, 9_500_000.0),
            (15.0, 11_000_000.0),
            (25.0, 14_500_000.0),
            (37.5, 18_000_000.0),
            (50.0, 22_000_000.0),
        ])
        .unwrap_or_default();
        let three_phase = CapacityTable::from_ratings([
            (25.0, 32_000_000.0),
            (50.0, 45_000_000.0),
            (75.0, 58_000_000.0),
            (100.0, 70_000_000.0),
            (150.0, 92_000_000.0),
            (225.0, 120_000_000.0),
            (300.0, 150_000_000.0),
        ])
        .unwrap_or_default();

        Catalog {
            version: default_version(),
            conductors,
            transformers: TransformerCatalog {
                single_phase,
                three_phase,
            },
            tariffs: Some(TariffSchedule {
                connection_fee_fixed: 2_500_000.0,
                connection_fee_per_kva: 28_000.0,
                threshold_kva: transformers::DEFAULT_TARIFF_THRESHOLD_KVA,
            }),
            installation_defaults: InstallationCosts::default(),
            settings: EngineSettings::default(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Conductors in catalog file order
    pub fn conductors(&self) -> &[ConductorSpec] {
        &self.conductors
    }

    /// Conductor names in catalog file order
    pub fn conductor_names(&self) -> impl Iterator<Item = &str> {
        self.conductors.iter().map(|c| c.type_name.as_str())
    }

    /// Look up a conductor by its type name.
    ///
    /// Returns `InvalidSelection` when the name is not listed.
    pub fn conductor(&self, type_name: &str) -> CalcResult<&ConductorSpec> {
        self.conductors
            .iter()
            .find(|c| c.type_name == type_name)
            .ok_or_else(|| CalcError::invalid_selection("conductor", type_name))
    }

    pub fn transformers(&self) -> &TransformerCatalog {
        &self.transformers
    }

    /// Transformer capacity table for a phase configuration
    pub fn capacity_table(&self, phase: PhaseConfig) -> &CapacityTable {
        self.transformers.table(phase)
    }

    pub fn tariffs(&self) -> Option<&TariffSchedule> {
        self.tariffs.as_ref()
    }

    pub fn installation_defaults(&self) -> &InstallationCosts {
        &self.installation_defaults
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// True when there is nothing for either engine to look up
    pub fn is_empty(&self) -> bool {
        self.conductors.is_empty() && self.transformers.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::empty()
    }
}

impl TryFrom<CatalogFile> for Catalog {
    type Error = CalcError;

    fn try_from(file: CatalogFile) -> Result<Self, Self::Error> {
        validate_version(&file.version)?;

        let mut seen = HashSet::new();
        for conductor in &file.conductors {
            conductor.validate()?;
            if !seen.insert(conductor.type_name.as_str()) {
                return Err(CalcError::malformed(format!(
                    "conductor '{}' listed more than once",
                    conductor.type_name
                )));
            }
        }

        if let Some(tariffs) = &file.tariffs {
            tariffs.validate()?;
        }
        file.installation_defaults
            .validate("installation_defaults")
            .map_err(|e| CalcError::malformed(e.to_string()))?;
        file.settings.validate()?;

        Ok(Catalog {
            version: file.version,
            conductors: file.conductors,
            transformers: file.transformer_costs,
            tariffs: file.tariffs,
            installation_defaults: file.installation_defaults,
            settings: file.settings,
        })
    }
}

impl From<Catalog> for CatalogFile {
    fn from(catalog: Catalog) -> Self {
        CatalogFile {
            version: catalog.version,
            conductors: catalog.conductors,
            transformer_costs: catalog.transformers,
            tariffs: catalog.tariffs,
            installation_defaults: catalog.installation_defaults,
            settings: catalog.settings,
        }
    }
}

/// Validate that a file version is compatible with the current schema.
///
/// Major versions must match. While the schema is 0.x, a file with a newer
/// minor version is rejected too.
pub fn validate_version(file_version: &str) -> CalcResult<()> {
    let file_parts: Vec<u32> = file_version
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();
    let current_parts: Vec<u32> = CATALOG_SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: CATALOG_SCHEMA_VERSION.to_string(),
    };

    let (Some(file_major), Some(current_major)) = (file_parts.first(), current_parts.first()) else {
        return Err(mismatch());
    };
    if file_major != current_major {
        return Err(mismatch());
    }
    if *current_major == 0 {
        if let (Some(file_minor), Some(current_minor)) = (file_parts.get(1), current_parts.get(1)) {
            if file_minor > current_minor {
                return Err(mismatch());
            }
        }
    }

    Ok(())
}
