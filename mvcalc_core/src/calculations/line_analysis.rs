//! # Line Analysis
//!
//! Voltage drop, losses and cost of a radial medium-voltage line feeding a
//! single lumped load at its far end.
//!
//! ## Method
//!
//! 1. S = P / cos φ
//! 2. Per-phase source voltage and line current from the [`PhaseConfig`]
//! 3. I as a phasor lagging by φ = acos(cos φ)
//! 4. Z = (r + jx) · length, for one phase conductor
//! 5. V_load = V_source∠0 − I·Z, then back to line quantities
//! 6. Loss = k · I² · R, with k = 3 (three-phase) or 2 (single-phase)
//!
//! The drop is a difference of magnitudes, not the magnitude of I·Z.
//!
//! ## Example
//!
//! ```rust
//! use mvcalc_core::calculations::line_analysis::{calculate, LineAnalysisInput};
//! use mvcalc_core::catalog::Catalog;
//! use mvcalc_core::phase::PhaseConfig;
//!
//! let catalog = Catalog::sample();
//! let input = LineAnalysisInput {
//!     label: "Feeder 3".to_string(),
//!     phase: PhaseConfig::ThreePhase,
//!     line_voltage_kv: 23.0,
//!     active_power_kw: 475.0,
//!     power_factor: 0.95,
//!     length_m: 100.0,
//!     conductor: "ACSR 2/0 Quail".to_string(),
//! };
//!
//! let result = calculate(&input, &catalog).unwrap();
//! assert!(result.within_limits);
//! ```

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::{Catalog, ConductorSpec};
use crate::errors::{CalcError, CalcResult};
use crate::phase::PhaseConfig;
use crate::settings::EngineSettings;
use crate::units::{KiloVoltAmperes, Kilometers, Kilovolts, Kilowatts, Meters, Volts};

/// Added to the power factor before dividing by it.
pub const POWER_FACTOR_EPSILON: f64 = 1e-9;

/// Input parameters for a line analysis.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Feeder 3",
///   "phase": "three_phase",
///   "line_voltage_kv": 23.0,
///   "active_power_kw": 475.0,
///   "power_factor": 0.95,
///   "length_m": 100.0,
///   "conductor": "ACSR 2/0 Quail"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineAnalysisInput {
    /// User label (e.g., "Feeder 3")
    #[serde(default)]
    pub label: String,

    /// Supply configuration
    pub phase: PhaseConfig,

    /// Source voltage in kV: line-to-line for three-phase, line-to-neutral
    /// for single-phase
    pub line_voltage_kv: f64,

    /// Load active power in kW
    pub active_power_kw: f64,

    /// Load power factor cos φ, lagging, in (0, 1]
    pub power_factor: f64,

    /// Route length in meters
    pub length_m: f64,

    /// Conductor type name as listed in the catalog
    pub conductor: String,
}

impl LineAnalysisInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if !self.line_voltage_kv.is_finite() || self.line_voltage_kv <= 0.0 {
            return Err(CalcError::invalid_input(
                "line_voltage_kv",
                self.line_voltage_kv.to_string(),
                "Line voltage must be positive",
            ));
        }
        if !self.active_power_kw.is_finite() || self.active_power_kw < 0.0 {
            return Err(CalcError::invalid_input(
                "active_power_kw",
                self.active_power_kw.to_string(),
                "Active power cannot be negative",
            ));
        }
        if !(self.power_factor > 0.0 && self.power_factor <= 1.0) {
            return Err(CalcError::invalid_input(
                "power_factor",
                self.power_factor.to_string(),
                "Power factor must be in (0, 1]",
            ));
        }
        if !self.length_m.is_finite() || self.length_m < 0.0 {
            return Err(CalcError::invalid_input(
                "length_m",
                self.length_m.to_string(),
                "Length cannot be negative",
            ));
        }
        Ok(())
    }

    /// Route length in kilometers
    pub fn length_km(&self) -> Kilometers {
        Meters(self.length_m).into()
    }

    /// Apparent power S = P / cos φ
    pub fn apparent_power(&self) -> KiloVoltAmperes {
        KiloVoltAmperes(self.active_power_kw / (self.power_factor + POWER_FACTOR_EPSILON))
    }
}

/// Classification of the voltage drop against the configured limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoltageDropStatus {
    /// Drop at or below the limit
    Acceptable,
    /// Drop above the limit
    Excessive,
}

impl VoltageDropStatus {
    pub fn classify(drop_percent: f64, limit_percent: f64) -> Self {
        if drop_percent <= limit_percent {
            VoltageDropStatus::Acceptable
        } else {
            VoltageDropStatus::Excessive
        }
    }
}

/// Results from a line analysis.
///
/// Voltages are line-to-line for three-phase and line-to-neutral for
/// single-phase, matching the quoted input voltage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineAnalysisResult {
    /// Supply configuration analysed
    pub phase: PhaseConfig,

    /// Conductor used
    pub conductor: String,

    /// Route length (m)
    pub length_m: f64,

    /// Apparent power S (kVA)
    pub apparent_power_kva: f64,

    /// Line current (A)
    pub line_current_a: f64,

    /// Power factor angle φ (rad), current lagging
    pub power_factor_angle_rad: f64,

    /// Voltage at the source (V)
    pub source_voltage_v: f64,

    /// Voltage at the load (V)
    pub load_voltage_v: f64,

    /// Source minus load voltage magnitude (V)
    pub voltage_drop_v: f64,

    /// Voltage drop as a percentage of the source voltage
    pub voltage_drop_percent: f64,

    /// Total I²R loss in the line (kW)
    pub power_loss_kw: f64,

    /// Cost of the costed phase conductors over the route
    pub conductor_cost: f64,

    /// Yearly cost of the energy lost in the line
    pub annual_loss_cost: f64,

    /// Drop classification against the limit
    pub status: VoltageDropStatus,

    /// Same as `status == Acceptable`
    pub within_limits: bool,
}

impl LineAnalysisResult {
    /// Check if the drop is within limits
    pub fn passes(&self) -> bool {
        self.within_limits
    }

    /// "L-L" or "L-N" for labelling voltages
    pub fn voltage_label(&self) -> &'static str {
        self.phase.voltage_label()
    }
}

/// Drop as a percentage of source voltage; 0 when the source voltage is 0.
pub fn voltage_drop_percent(drop: Volts, source: Volts) -> f64 {
    if source.0 != 0.0 {
        drop.0 / source.0 * 100.0
    } else {
        0.0
    }
}

/// Analyse a line using a conductor from the catalog.
///
/// # Returns
///
/// * `Ok(LineAnalysisResult)` - Calculation results
/// * `Err(CalcError::InvalidInput)` - Out-of-range input
/// * `Err(CalcError::InvalidSelection)` - Conductor not in the catalog
pub fn calculate(input: &LineAnalysisInput, catalog: &Catalog) -> CalcResult<LineAnalysisResult> {
    input.validate()?;
    let conductor = catalog.conductor(&input.conductor)?;
    analyze(input, conductor, catalog.settings())
}

/// Analyse a line with an explicit conductor, bypassing catalog lookup.
///
/// `input.conductor` is ignored; the result carries `conductor.type_name`.
pub fn analyze(
    input: &LineAnalysisInput,
    conductor: &ConductorSpec,
    settings: &EngineSettings,
) -> CalcResult<LineAnalysisResult> {
    input.validate()?;

    let phase = input.phase;
    let length_km = input.length_km();
    let apparent = input.apparent_power();

    let source_line: Volts = Kilovolts(input.line_voltage_kv).into();
    let source_phase = phase.phase_voltage(source_line);
    let current = phase.line_current(apparent, source_line);

    let angle = input.power_factor.acos();
    let current_phasor = Complex64::from_polar(current.0, -angle);

    let resistance = conductor.resistance(length_km);
    let reactance = conductor.reactance(length_km);
    let impedance = Complex64::new(resistance.0, reactance.0);

    let load_phasor = Complex64::new(source_phase.0, 0.0) - current_phasor * impedance;
    let load_phase = Volts(load_phasor.norm());

    // Reconstructing the drop from phase quantities keeps a zero-length line
    // at exactly zero drop.
    let drop = phase.line_voltage(source_phase - load_phase);
    let load_line = source_line - drop;
    let drop_percent = voltage_drop_percent(drop, source_line);

    let power_loss = Kilowatts(phase.loss_multiplier() * current.0.powi(2) * resistance.0 / 1000.0);
    let conductor_cost =
        conductor.cost_per_meter * input.length_m * f64::from(phase.costed_conductors());
    let annual_loss_cost =
        power_loss.0 * settings.operating_hours_per_year * settings.energy_tariff_per_kwh;

    let status = VoltageDropStatus::classify(drop_percent, settings.voltage_drop_limit_percent);

    debug!(
        label = %input.label,
        %phase,
        apparent_kva = apparent.0,
        current_a = current.0,
        impedance_ohm = %impedance,
        load_voltage_v = load_line.0,
        "line analysed"
    );
    if status == VoltageDropStatus::Excessive {
        warn!(
            label = %input.label,
            conductor = %conductor.type_name,
            "voltage drop {:.2}% exceeds {:.2}% limit",
            drop_percent,
            settings.voltage_drop_limit_percent
        );
    }

    Ok(LineAnalysisResult {
        phase,
        conductor: conductor.type_name.clone(),
        length_m: input.length_m,
        apparent_power_kva: apparent.0,
        line_current_a: current.0,
        power_factor_angle_rad: angle,
        source_voltage_v: source_line.0,
        load_voltage_v: load_line.0,
        voltage_drop_v: drop.0,
        voltage_drop_percent: drop_percent,
        power_loss_kw: power_loss.0,
        conductor_cost,
        annual_loss_cost,
        status,
        within_limits: status == VoltageDropStatus::Acceptable,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_conductor() -> ConductorSpec {
        ConductorSpec {
            type_name: "Test 0.3+j0.2".to_string(),
            resistance_ohm_per_km: 0.3,
            reactance_ohm_per_km: 0.2,
            cost_per_meter: 10_000.0,
        }
    }

    fn test_line() -> LineAnalysisInput {
        LineAnalysisInput {
            label: "Test Line".to_string(),
            phase: PhaseConfig::ThreePhase,
            line_voltage_kv: 23.0,
            active_power_kw: 475.0,
            power_factor: 0.95,
            length_m: 100.0,
            conductor: "Test 0.3+j0.2".to_string(),
        }
    }

    fn run(input: &LineAnalysisInput) -> LineAnalysisResult {
        analyze(input, &test_conductor(), &EngineSettings::default()).unwrap()
    }

    #[test]
    fn test_reference_three_phase_case() {
        let result = run(&test_line());

        // S = 475 / 0.95 = 500 kVA
        assert!((result.apparent_power_kva - 500.0).abs() < 0.01);
        // I = 500 000 / (23 000 · √3) = 12.55 A
        assert!((result.line_current_a - 12.55).abs() < 0.01);

        assert!(result.voltage_drop_percent > 0.0);
        assert!(result.voltage_drop_percent < 0.1);
        assert_eq!(result.status, VoltageDropStatus::Acceptable);
        assert!(result.passes());
    }

    #[test]
    fn test_reference_case_losses_and_costs() {
        let result = run(&test_line());

        // R = 0.3 · 0.1 = 0.03 Ω; loss = 3 · 12.551² · 0.03 / 1000
        let expected_loss = 3.0 * result.line_current_a.powi(2) * 0.03 / 1000.0;
        assert!((result.power_loss_kw - expected_loss).abs() < 1e-12);
        assert!((result.power_loss_kw - 0.01418).abs() < 1e-4);

        // 10 000 /m · 100 m · 3 conductors
        assert_eq!(result.conductor_cost, 3_000_000.0);
        assert!((result.annual_loss_cost - result.power_loss_kw * 8760.0 * 450.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_length_has_no_drop() {
        let mut line = test_line();
        line.length_m = 0.0;
        let result = run(&line);
        assert_eq!(result.voltage_drop_percent, 0.0);
        assert_eq!(result.load_voltage_v, result.source_voltage_v);
        assert_eq!(result.power_loss_kw, 0.0);
    }

    #[test]
    fn test_drop_and_loss_grow_with_length() {
        let mut previous: Option<LineAnalysisResult> = None;
        for length_m in [10.0, 100.0, 1_000.0, 5_000.0, 20_000.0] {
            let mut line = test_line();
            line.length_m = length_m;
            let result = run(&line);
            if let Some(prev) = &previous {
                assert!(result.voltage_drop_percent > prev.voltage_drop_percent);
                assert!(result.power_loss_kw > prev.power_loss_kw);
            }
            previous = Some(result);
        }
    }

    #[test]
    fn test_apparent_power_is_p_over_pf() {
        for pf in [0.7, 0.8, 0.92, 1.0] {
            let mut line = test_line();
            line.power_factor = pf;
            let result = run(&line);
            assert!((result.apparent_power_kva - 475.0 / pf).abs() < 1e-5);
        }
    }

    #[test]
    fn test_single_phase_branch() {
        let line = LineAnalysisInput {
            phase: PhaseConfig::SinglePhase,
            line_voltage_kv: 13.2,
            active_power_kw: 132.0,
            power_factor: 1.0,
            ..test_line()
        };
        let result = run(&line);

        // I = 132 000 / 13 200 = 10 A
        assert!((result.line_current_a - 10.0).abs() < 1e-6);
        // loss = 2 · 10² · 0.03 / 1000
        assert!((result.power_loss_kw - 0.006).abs() < 1e-9);
        // one costed conductor
        assert_eq!(result.conductor_cost, 1_000_000.0);
        assert_eq!(result.voltage_label(), "L-N");
    }

    #[test]
    fn test_unity_power_factor_drop_is_resistive() {
        let line = LineAnalysisInput {
            phase: PhaseConfig::SinglePhase,
            line_voltage_kv: 13.2,
            active_power_kw: 132.0,
            power_factor: 1.0,
            ..test_line()
        };
        let result = run(&line);
        // V_load = |13 200 − 10·(0.03 + j0.02)| ≈ 13 199.7
        assert!((result.voltage_drop_v - 0.3).abs() < 1e-3);
    }

    #[test]
    fn test_long_line_is_excessive() {
        let mut line = test_line();
        line.line_voltage_kv = 13.2;
        line.active_power_kw = 3_000.0;
        line.power_factor = 0.8;
        line.length_m = 30_000.0;
        let result = run(&line);
        assert!(result.voltage_drop_percent > 5.0);
        assert_eq!(result.status, VoltageDropStatus::Excessive);
        assert!(!result.within_limits);
    }

    #[test]
    fn test_limit_comes_from_settings() {
        let settings = EngineSettings {
            voltage_drop_limit_percent: 0.0,
            ..EngineSettings::default()
        };
        let result = analyze(&test_line(), &test_conductor(), &settings).unwrap();
        assert_eq!(result.status, VoltageDropStatus::Excessive);
    }

    #[test]
    fn test_drop_percent_guards_zero_source() {
        assert_eq!(voltage_drop_percent(Volts(10.0), Volts(0.0)), 0.0);
        assert!((voltage_drop_percent(Volts(115.0), Volts(23_000.0)) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_power_factor() {
        for pf in [0.0, -0.5, 1.01, f64::NAN] {
            let mut line = test_line();
            line.power_factor = pf;
            let err = analyze(&line, &test_conductor(), &EngineSettings::default()).unwrap_err();
            assert_eq!(err.error_code(), "INVALID_INPUT");
        }
    }

    #[test]
    fn test_negative_length_rejected() {
        let mut line = test_line();
        line.length_m = -1.0;
        assert!(analyze(&line, &test_conductor(), &EngineSettings::default()).is_err());
    }

    #[test]
    fn test_unknown_conductor_rejected() {
        let mut line = test_line();
        line.conductor = "Does Not Exist".to_string();
        let err = calculate(&line, &Catalog::sample()).unwrap_err();
        assert_eq!(err, CalcError::invalid_selection("conductor", "Does Not Exist"));
    }

    #[test]
    fn test_catalog_lookup() {
        let mut line = test_line();
        line.conductor = "ACSR 4/0 Penguin".to_string();
        let result = calculate(&line, &Catalog::sample()).unwrap();
        assert_eq!(result.conductor, "ACSR 4/0 Penguin");
        assert_eq!(result.conductor_cost, 45_000.0 * 100.0 * 3.0);
    }

    #[test]
    fn test_serialization() {
        let line = test_line();
        let json = serde_json::to_string_pretty(&line).unwrap();
        assert!(json.contains("\"three_phase\""));
        let roundtrip: LineAnalysisInput = serde_json::from_str(&json).unwrap();
        assert_eq!(line, roundtrip);
    }
}
