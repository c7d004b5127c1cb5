//! Medium-voltage conductor specifications.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::units::{Kilometers, Ohms};

/// One conductor entry from the catalog.
///
/// ## JSON Example
///
/// ```json
/// {
///   "type_name": "ACSR 2/0 Quail",
///   "resistance_ohm_per_km": 0.425,
///   "reactance_ohm_per_km": 0.39,
///   "cost_per_meter": 31000.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConductorSpec {
    /// Catalog key, unique within a catalog
    pub type_name: String,

    /// AC resistance per kilometer (Ω/km)
    pub resistance_ohm_per_km: f64,

    /// Inductive reactance per kilometer (Ω/km)
    pub reactance_ohm_per_km: f64,

    /// Installed cost of one conductor per meter
    pub cost_per_meter: f64,
}

impl ConductorSpec {
    /// Total resistance of one phase conductor over `length`
    pub fn resistance(&self, length: Kilometers) -> Ohms {
        Ohms(self.resistance_ohm_per_km * length.0)
    }

    /// Total reactance of one phase conductor over `length`
    pub fn reactance(&self, length: Kilometers) -> Ohms {
        Ohms(self.reactance_ohm_per_km * length.0)
    }

    pub(crate) fn validate(&self) -> CalcResult<()> {
        if self.type_name.trim().is_empty() {
            return Err(CalcError::malformed("conductor with empty type_name"));
        }
        let fields = [
            ("resistance_ohm_per_km", self.resistance_ohm_per_km),
            ("reactance_ohm_per_km", self.reactance_ohm_per_km),
            ("cost_per_meter", self.cost_per_meter),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(CalcError::malformed(format!(
                    "conductor '{}': {} must be a non-negative number, got {}",
                    self.type_name, field, value
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quail() -> ConductorSpec {
        ConductorSpec {
            type_name: "ACSR 2/0 Quail".to_string(),
            resistance_ohm_per_km: 0.425,
            reactance_ohm_per_km: 0.39,
            cost_per_meter: 31_000.0,
        }
    }

    #[test]
    fn test_impedance_scales_with_length() {
        let c = quail();
        assert!((c.resistance(Kilometers(2.0)).0 - 0.85).abs() < 1e-12);
        assert!((c.reactance(Kilometers(0.5)).0 - 0.195).abs() < 1e-12);
    }

    #[test]
    fn test_negative_resistance_rejected() {
        let mut c = quail();
        c.resistance_ohm_per_km = -0.1;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut c = quail();
        c.type_name = "  ".to_string();
        assert!(c.validate().is_err());
    }
}
