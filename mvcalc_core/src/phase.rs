//! # Phase Configuration
//!
//! Both engines branch on single-phase vs three-phase supply. The branch lives
//! here once: each variant supplies its own √3 factor, loss multiplier and
//! costed conductor count.
//!
//! | Quantity                | ThreePhase       | SinglePhase |
//! |-------------------------|------------------|-------------|
//! | phase voltage           | V_LL / √3        | V_LN        |
//! | line current            | S / (V_LL · √3)  | S / V_LN    |
//! | loss multiplier         | 3                | 2           |
//! | costed conductors       | 3                | 1           |
//! | default line voltage    | 23 kV            | 13.2 kV     |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::units::{Amperes, KiloVoltAmperes, Kilovolts, Volts};

/// Supply phase configuration.
///
/// Serializes as `"three_phase"` / `"single_phase"`, which are also the keys
/// of the transformer cost tables in the catalog file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseConfig {
    ThreePhase,
    SinglePhase,
}

impl PhaseConfig {
    pub const ALL: [PhaseConfig; 2] = [PhaseConfig::ThreePhase, PhaseConfig::SinglePhase];

    /// Ratio between the quoted line voltage and the per-phase voltage.
    pub fn voltage_factor(self) -> f64 {
        match self {
            PhaseConfig::ThreePhase => 3f64.sqrt(),
            PhaseConfig::SinglePhase => 1.0,
        }
    }

    /// Multiplier applied to I²R to get total line loss.
    ///
    /// Single-phase counts the return conductor, hence 2.
    pub fn loss_multiplier(self) -> f64 {
        match self {
            PhaseConfig::ThreePhase => 3.0,
            PhaseConfig::SinglePhase => 2.0,
        }
    }

    /// Number of phase conductors included in the conductor cost.
    pub fn costed_conductors(self) -> u32 {
        match self {
            PhaseConfig::ThreePhase => 3,
            PhaseConfig::SinglePhase => 1,
        }
    }

    /// Per-phase voltage for a quoted line voltage.
    pub fn phase_voltage(self, line: Volts) -> Volts {
        line / self.voltage_factor()
    }

    /// Quoted line voltage for a per-phase voltage magnitude.
    pub fn line_voltage(self, phase: Volts) -> Volts {
        phase * self.voltage_factor()
    }

    /// Line current drawn by an apparent power at a quoted line voltage.
    pub fn line_current(self, apparent: KiloVoltAmperes, line: Volts) -> Amperes {
        Amperes(apparent.volt_amperes() / (line.0 * self.voltage_factor()))
    }

    /// Nominal line voltage offered as a default for new analyses.
    pub fn default_line_voltage(self) -> Kilovolts {
        match self {
            PhaseConfig::ThreePhase => Kilovolts(23.0),
            PhaseConfig::SinglePhase => Kilovolts(13.2),
        }
    }

    /// "L-L" for three-phase, "L-N" for single-phase.
    pub fn voltage_label(self) -> &'static str {
        match self {
            PhaseConfig::ThreePhase => "L-L",
            PhaseConfig::SinglePhase => "L-N",
        }
    }

    /// Key of this configuration's table in the catalog file.
    pub fn catalog_key(self) -> &'static str {
        match self {
            PhaseConfig::ThreePhase => "three_phase",
            PhaseConfig::SinglePhase => "single_phase",
        }
    }
}

impl fmt::Display for PhaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseConfig::ThreePhase => write!(f, "three-phase"),
            PhaseConfig::SinglePhase => write!(f, "single-phase"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_phase_factors() {
        let p = PhaseConfig::ThreePhase;
        assert!((p.voltage_factor() - 1.7320508).abs() < 1e-6);
        assert_eq!(p.loss_multiplier(), 3.0);
        assert_eq!(p.costed_conductors(), 3);
    }

    #[test]
    fn test_single_phase_factors() {
        let p = PhaseConfig::SinglePhase;
        assert_eq!(p.voltage_factor(), 1.0);
        assert_eq!(p.loss_multiplier(), 2.0);
        assert_eq!(p.costed_conductors(), 1);
        assert_eq!(p.phase_voltage(Volts(13_200.0)), Volts(13_200.0));
    }

    #[test]
    fn test_phase_voltage_roundtrip() {
        let p = PhaseConfig::ThreePhase;
        let phase = p.phase_voltage(Volts(23_000.0));
        assert!((phase.0 - 13_279.056).abs() < 0.01);
        assert!((p.line_voltage(phase).0 - 23_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_line_current() {
        let i = PhaseConfig::ThreePhase.line_current(KiloVoltAmperes(500.0), Volts(23_000.0));
        assert!((i.0 - 12.551).abs() < 0.01);

        let i = PhaseConfig::SinglePhase.line_current(KiloVoltAmperes(132.0), Volts(13_200.0));
        assert!((i.0 - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_serialization_keys() {
        for phase in PhaseConfig::ALL {
            let json = serde_json::to_string(&phase).unwrap();
            assert_eq!(json, format!("\"{}\"", phase.catalog_key()));
        }
    }
}
