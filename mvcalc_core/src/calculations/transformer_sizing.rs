//! # Transformer Sizing
//!
//! Picks a commercial transformer size for a load and estimates the project
//! cost: equipment, utility connection fee and installation.
//!
//! ## Selection Rule
//!
//! Capacities for the requested phase configuration are searched in ascending
//! order and the first one ≥ the required kVA wins, so an exact match is
//! taken as-is. If the load is larger than every listed size, the largest is
//! returned and `exceeds_catalog` is set; the result is not re-checked.
//!
//! ## Example
//!
//! ```rust
//! use mvcalc_core::calculations::transformer_sizing::{calculate, TransformerSizingInput};
//! use mvcalc_core::catalog::Catalog;
//! use mvcalc_core::phase::PhaseConfig;
//!
//! let input = TransformerSizingInput {
//!     label: "Pump station".to_string(),
//!     phase: PhaseConfig::ThreePhase,
//!     required_kva: 60.0,
//!     power_factor: 0.92,
//!     installation: None,
//! };
//!
//! let result = calculate(&input, &Catalog::sample()).unwrap();
//! assert_eq!(result.suggested_kva, 75.0);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::{Catalog, InstallationCosts};
use crate::errors::{CalcError, CalcResult};
use crate::phase::PhaseConfig;
use crate::settings::MissingCostPolicy;
use crate::units::Kilowatts;

/// Lowest load power factor accepted for sizing
pub const MIN_POWER_FACTOR: f64 = 0.70;

/// Input parameters for transformer sizing.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Pump station",
///   "phase": "three_phase",
///   "required_kva": 60.0,
///   "power_factor": 0.92,
///   "installation": {
///     "labor": 3000000,
///     "pole_and_mounting": 8000000,
///     "minor_materials": 2000000,
///     "permits": 1500000
///   }
/// }
/// ```
///
/// Omit `installation` to use the catalog's installation defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformerSizingInput {
    /// User label
    #[serde(default)]
    pub label: String,

    /// Which catalog table to search
    pub phase: PhaseConfig,

    /// Load apparent power (kVA)
    pub required_kva: f64,

    /// Load power factor, in [0.70, 1.00]
    pub power_factor: f64,

    /// Fixed installation costs; catalog defaults when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation: Option<InstallationCosts>,
}

impl TransformerSizingInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if !self.required_kva.is_finite() || self.required_kva <= 0.0 {
            return Err(CalcError::invalid_input(
                "required_kva",
                self.required_kva.to_string(),
                "Required power must be positive",
            ));
        }
        if !(self.power_factor >= MIN_POWER_FACTOR && self.power_factor <= 1.0) {
            return Err(CalcError::invalid_input(
                "power_factor",
                self.power_factor.to_string(),
                "Power factor must be between 0.70 and 1.00",
            ));
        }
        if let Some(installation) = &self.installation {
            installation.validate("installation")?;
        }
        Ok(())
    }

    /// Active power P = S · cos φ
    pub fn active_power(&self) -> Kilowatts {
        Kilowatts(self.required_kva * self.power_factor)
    }
}

/// Results from transformer sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformerSizingResult {
    /// Table searched
    pub phase: PhaseConfig,

    /// Load apparent power as requested (kVA)
    pub required_kva: f64,

    /// Load active power (kW), informational
    pub active_power_kw: f64,

    /// Selected commercial capacity (kVA)
    pub suggested_kva: f64,

    /// Load exceeds every listed capacity; `suggested_kva` is the largest
    pub exceeds_catalog: bool,

    /// Transformer equipment price
    pub equipment_cost: f64,

    /// Utility connection-right fee
    pub connection_fee: f64,

    /// Installation cost components used
    pub installation: InstallationCosts,

    /// Equipment + connection + installation
    pub total_cost: f64,
}

impl TransformerSizingResult {
    /// Load as a fraction of the suggested capacity
    pub fn loading_ratio(&self) -> f64 {
        self.required_kva / self.suggested_kva
    }
}

/// Size a transformer and estimate project cost.
///
/// # Returns
///
/// * `Ok(TransformerSizingResult)` - Selection and cost breakdown
/// * `Err(CalcError::InvalidInput)` - Out-of-range input
/// * `Err(CalcError::NoCatalogDataForPhase)` - Nothing listed for the phase
/// * `Err(CalcError::CatalogEntryMissing)` - No tariff schedule under the
///   `fail` cost policy
pub fn calculate(input: &TransformerSizingInput, catalog: &Catalog) -> CalcResult<TransformerSizingResult> {
    input.validate()?;

    let table = catalog.capacity_table(input.phase);
    let selection = table
        .select(input.required_kva)
        .ok_or_else(|| CalcError::no_catalog_data(input.phase.to_string()))?;
    let suggested_kva = selection.rating.capacity_kva;

    if selection.exceeds_catalog {
        warn!(
            label = %input.label,
            phase = %input.phase,
            "required {:.1} kVA exceeds largest listed capacity, using {:.1} kVA",
            input.required_kva,
            suggested_kva
        );
    }

    let connection_fee = match catalog.tariffs() {
        Some(tariffs) => tariffs.connection_fee(suggested_kva),
        None => match catalog.settings().missing_cost_policy {
            MissingCostPolicy::Fail => {
                return Err(CalcError::catalog_entry_missing("tariffs (connection fee schedule)"));
            }
            MissingCostPolicy::Zero => {
                warn!(label = %input.label, "no tariff schedule in catalog, connection fee counted as 0");
                0.0
            }
        },
    };

    let installation = input
        .installation
        .unwrap_or_else(|| *catalog.installation_defaults());
    let equipment_cost = selection.rating.unit_cost;
    let total_cost = equipment_cost + connection_fee + installation.total();

    debug!(
        label = %input.label,
        phase = %input.phase,
        required_kva = input.required_kva,
        suggested_kva,
        total_cost,
        "transformer sized"
    );

    Ok(TransformerSizingResult {
        phase: input.phase,
        required_kva: input.required_kva,
        active_power_kw: input.active_power().0,
        suggested_kva,
        exceeds_catalog: selection.exceeds_catalog,
        equipment_cost,
        connection_fee,
        installation,
        total_cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CapacityTable, CatalogFile, TariffSchedule, TransformerCatalog};
    use crate::settings::EngineSettings;

    fn test_catalog(tariffs: Option<TariffSchedule>, policy: MissingCostPolicy) -> Catalog {
        let file = CatalogFile {
            version: crate::catalog::CATALOG_SCHEMA_VERSION.to_string(),
            conductors: Vec::new(),
            transformer_costs: TransformerCatalog {
                single_phase: CapacityTable::default(),
                three_phase: CapacityTable::from_ratings([
                    (25.0, 32_000_000.0),
                    (50.0, 45_000_000.0),
                    (75.0, 58_000_000.0),
                    (100.0, 70_000_000.0),
                ])
                .unwrap(),
            },
            tariffs,
            installation_defaults: InstallationCosts::default(),
            settings: EngineSettings {
                missing_cost_policy: policy,
                ..EngineSettings::default()
            },
        };
        Catalog::try_from(file).unwrap()
    }

    fn tariff() -> TariffSchedule {
        TariffSchedule {
            connection_fee_fixed: 2_500_000.0,
            connection_fee_per_kva: 28_000.0,
            threshold_kva: 100.0,
        }
    }

    fn test_request(required_kva: f64) -> TransformerSizingInput {
        TransformerSizingInput {
            label: "Test Transformer".to_string(),
            phase: PhaseConfig::ThreePhase,
            required_kva,
            power_factor: 0.92,
            installation: Some(InstallationCosts {
                labor: 3_000_000.0,
                pole_and_mounting: 8_000_000.0,
                minor_materials: 2_000_000.0,
                permits: 1_500_000.0,
            }),
        }
    }

    #[test]
    fn test_reference_sizing_case() {
        let catalog = test_catalog(Some(tariff()), MissingCostPolicy::Fail);
        let result = calculate(&test_request(60.0), &catalog).unwrap();

        assert_eq!(result.suggested_kva, 75.0);
        assert!(!result.exceeds_catalog);
        assert_eq!(result.equipment_cost, 58_000_000.0);
        assert_eq!(result.connection_fee, 2_500_000.0);
        assert!((result.active_power_kw - 55.2).abs() < 1e-9);
        assert_eq!(
            result.total_cost,
            58_000_000.0 + 2_500_000.0 + 3_000_000.0 + 8_000_000.0 + 2_000_000.0 + 1_500_000.0
        );
    }

    #[test]
    fn test_single_phase_sizing() {
        let catalog = Catalog::sample();
        let input = TransformerSizingInput {
            phase: PhaseConfig::SinglePhase,
            ..test_request(20.0)
        };
        let result = calculate(&input, &catalog).unwrap();

        assert_eq!(result.phase, PhaseConfig::SinglePhase);
        assert_eq!(result.suggested_kva, 25.0);
        assert!(!result.exceeds_catalog);
        assert_eq!(result.equipment_cost, 14_500_000.0);
        assert_eq!(result.connection_fee, 2_500_000.0);
        assert_eq!(result.total_cost, 14_500_000.0 + 2_500_000.0 + 14_500_000.0);

        let fractional = TransformerSizingInput {
            required_kva: 30.0,
            ..input
        };
        let result = calculate(&fractional, &catalog).unwrap();
        assert_eq!(result.suggested_kva, 37.5);
        assert_eq!(result.equipment_cost, 18_000_000.0);
    }

    #[test]
    fn test_exact_capacity_not_oversized() {
        let catalog = test_catalog(Some(tariff()), MissingCostPolicy::Fail);
        let result = calculate(&test_request(50.0), &catalog).unwrap();
        assert_eq!(result.suggested_kva, 50.0);
        assert_eq!(result.loading_ratio(), 1.0);
    }

    #[test]
    fn test_oversized_load_falls_back_to_largest() {
        let catalog = test_catalog(Some(tariff()), MissingCostPolicy::Fail);
        let result = calculate(&test_request(400.0), &catalog).unwrap();
        assert_eq!(result.suggested_kva, 100.0);
        assert!(result.exceeds_catalog);
        assert_eq!(result.equipment_cost, 70_000_000.0);
    }

    #[test]
    fn test_variable_fee_above_threshold() {
        let mut catalog_tariff = tariff();
        catalog_tariff.threshold_kva = 50.0;
        let catalog = test_catalog(Some(catalog_tariff), MissingCostPolicy::Fail);
        let result = calculate(&test_request(60.0), &catalog).unwrap();
        assert_eq!(result.connection_fee, 28_000.0 * 75.0);
    }

    #[test]
    fn test_empty_phase_table_fails() {
        let catalog = test_catalog(Some(tariff()), MissingCostPolicy::Fail);
        let mut request = test_request(10.0);
        request.phase = PhaseConfig::SinglePhase;
        let err = calculate(&request, &catalog).unwrap_err();
        assert_eq!(err, CalcError::no_catalog_data("single-phase"));
    }

    #[test]
    fn test_empty_catalog_fails() {
        let err = calculate(&test_request(60.0), &Catalog::empty()).unwrap_err();
        assert_eq!(err.error_code(), "NO_CATALOG_DATA_FOR_PHASE");
    }

    #[test]
    fn test_missing_tariff_fails_by_default() {
        let catalog = test_catalog(None, MissingCostPolicy::Fail);
        let err = calculate(&test_request(60.0), &catalog).unwrap_err();
        assert_eq!(err.error_code(), "CATALOG_ENTRY_MISSING");
    }

    #[test]
    fn test_missing_tariff_zero_policy() {
        let catalog = test_catalog(None, MissingCostPolicy::Zero);
        let result = calculate(&test_request(60.0), &catalog).unwrap();
        assert_eq!(result.connection_fee, 0.0);
        assert_eq!(result.total_cost, 58_000_000.0 + 14_500_000.0);
    }

    #[test]
    fn test_installation_defaults_from_catalog() {
        let catalog = test_catalog(Some(tariff()), MissingCostPolicy::Fail);
        let mut request = test_request(60.0);
        request.installation = None;
        let result = calculate(&request, &catalog).unwrap();
        assert_eq!(result.installation, *catalog.installation_defaults());
    }

    #[test]
    fn test_input_validation() {
        let catalog = test_catalog(Some(tariff()), MissingCostPolicy::Fail);

        assert!(calculate(&test_request(0.0), &catalog).is_err());

        let mut low_pf = test_request(60.0);
        low_pf.power_factor = 0.65;
        assert!(calculate(&low_pf, &catalog).is_err());

        let mut boundary_pf = test_request(60.0);
        boundary_pf.power_factor = MIN_POWER_FACTOR;
        assert!(calculate(&boundary_pf, &catalog).is_ok());

        let mut negative_cost = test_request(60.0);
        if let Some(costs) = negative_cost.installation.as_mut() {
            costs.permits = -1.0;
        }
        let err = calculate(&negative_cost, &catalog).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_installation_omitted_in_json() {
        let json = r#"{ "phase": "single_phase", "required_kva": 20.0, "power_factor": 0.9 }"#;
        let request: TransformerSizingInput = serde_json::from_str(json).unwrap();
        assert!(request.installation.is_none());
        assert_eq!(request.label, "");
    }
}
