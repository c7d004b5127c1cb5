//! # Engine Settings
//!
//! Economic and policy constants the engines read from the catalog's
//! `settings` section. Every field has a default, so a catalog may omit the
//! section entirely or override only what it needs:
//!
//! ```json
//! { "settings": { "energy_tariff_per_kwh": 520.0 } }
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Default energy price used to value line losses (currency per kWh)
pub const DEFAULT_ENERGY_TARIFF_PER_KWH: f64 = 450.0;

/// Continuous operation, 24 h × 365 d
pub const DEFAULT_OPERATING_HOURS_PER_YEAR: f64 = 8760.0;

/// Voltage drop above this percentage is classified excessive
pub const DEFAULT_VOLTAGE_DROP_LIMIT_PERCENT: f64 = 5.0;

/// What to do when a cost the estimate needs is absent from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingCostPolicy {
    /// Reject the request with `CatalogEntryMissing`
    #[default]
    Fail,
    /// Count the missing cost as zero and log a warning
    Zero,
}

/// Settings shared by both engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSettings {
    /// Price of energy lost in the line (currency per kWh)
    pub energy_tariff_per_kwh: f64,

    /// Hours per year the line is assumed loaded
    pub operating_hours_per_year: f64,

    /// Acceptance threshold for voltage drop (%)
    pub voltage_drop_limit_percent: f64,

    /// Handling of absent cost entries during transformer sizing
    pub missing_cost_policy: MissingCostPolicy,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            energy_tariff_per_kwh: DEFAULT_ENERGY_TARIFF_PER_KWH,
            operating_hours_per_year: DEFAULT_OPERATING_HOURS_PER_YEAR,
            voltage_drop_limit_percent: DEFAULT_VOLTAGE_DROP_LIMIT_PERCENT,
            missing_cost_policy: MissingCostPolicy::Fail,
        }
    }
}

impl EngineSettings {
    /// Reject negative or non-finite settings.
    pub fn validate(&self) -> CalcResult<()> {
        let fields = [
            ("settings.energy_tariff_per_kwh", self.energy_tariff_per_kwh),
            ("settings.operating_hours_per_year", self.operating_hours_per_year),
            ("settings.voltage_drop_limit_percent", self.voltage_drop_limit_percent),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(CalcError::malformed(format!(
                    "{} must be a non-negative number, got {}",
                    field, value
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = EngineSettings::default();
        assert_eq!(settings.energy_tariff_per_kwh, 450.0);
        assert_eq!(settings.operating_hours_per_year, 8760.0);
        assert_eq!(settings.voltage_drop_limit_percent, 5.0);
        assert_eq!(settings.missing_cost_policy, MissingCostPolicy::Fail);
    }

    #[test]
    fn test_partial_override() {
        let settings: EngineSettings =
            serde_json::from_str(r#"{ "energy_tariff_per_kwh": 520.0, "missing_cost_policy": "zero" }"#).unwrap();
        assert_eq!(settings.energy_tariff_per_kwh, 520.0);
        assert_eq!(settings.operating_hours_per_year, 8760.0);
        assert_eq!(settings.missing_cost_policy, MissingCostPolicy::Zero);
    }

    #[test]
    fn test_negative_tariff_rejected() {
        let settings = EngineSettings {
            energy_tariff_per_kwh: -1.0,
            ..EngineSettings::default()
        };
        assert_eq!(settings.validate().unwrap_err().error_code(), "MALFORMED_CATALOG");
    }
}
