//! # Unit Types
//!
//! Type-safe wrappers for the electrical units the engines juggle. These are
//! plain f64 newtypes with `#[serde(transparent)]`, so JSON stays just numbers.
//!
//! ## Units in Use
//!
//! - Voltage: volts (V), kilovolts (kV)
//! - Current: amperes (A)
//! - Power: kilowatts (kW, active), kilovolt-amperes (kVA, apparent)
//! - Length: meters (m), kilometers (km)
//! - Impedance: ohms (Ω)
//!
//! ## Example
//!
//! ```rust
//! use mvcalc_core::units::{Kilometers, Kilovolts, Meters, Volts};
//!
//! let length_km: Kilometers = Meters(250.0).into();
//! assert_eq!(length_km.0, 0.25);
//!
//! let v: Volts = Kilovolts(23.0).into();
//! assert_eq!(v.0, 23_000.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Div, Mul, Sub};

// ============================================================================
// Voltage
// ============================================================================

/// Voltage in volts
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Volts(pub f64);

/// Voltage in kilovolts
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilovolts(pub f64);

impl From<Kilovolts> for Volts {
    fn from(kv: Kilovolts) -> Self {
        Volts(kv.0 * 1000.0)
    }
}

impl From<Volts> for Kilovolts {
    fn from(v: Volts) -> Self {
        Kilovolts(v.0 / 1000.0)
    }
}

// ============================================================================
// Current
// ============================================================================

/// Current in amperes
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amperes(pub f64);

// ============================================================================
// Power
// ============================================================================

/// Active power in kilowatts
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilowatts(pub f64);

/// Apparent power in kilovolt-amperes
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloVoltAmperes(pub f64);

impl KiloVoltAmperes {
    /// Apparent power in volt-amperes
    pub fn volt_amperes(self) -> f64 {
        self.0 * 1000.0
    }
}

// ============================================================================
// Length
// ============================================================================

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in kilometers
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilometers(pub f64);

impl From<Meters> for Kilometers {
    fn from(m: Meters) -> Self {
        Kilometers(m.0 / 1000.0)
    }
}

impl From<Kilometers> for Meters {
    fn from(km: Kilometers) -> Self {
        Meters(km.0 * 1000.0)
    }
}

// ============================================================================
// Impedance
// ============================================================================

/// Resistance or reactance in ohms
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ohms(pub f64);

// ============================================================================
// Arithmetic
// ============================================================================

// Voltages are subtracted (drop) and scaled by √3 (phase vs line).

impl Sub for Volts {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Volts(self.0 - rhs.0)
    }
}

impl Mul<f64> for Volts {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        Volts(self.0 * rhs)
    }
}

impl Div<f64> for Volts {
    type Output = Self;
    fn div(self, rhs: f64) -> Self::Output {
        Volts(self.0 / rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meters_to_kilometers() {
        let km: Kilometers = Meters(100.0).into();
        assert_eq!(km.0, 0.1);
        let back: Meters = km.into();
        assert_eq!(back.0, 100.0);
    }

    #[test]
    fn test_kilovolts_to_volts() {
        let v: Volts = Kilovolts(13.2).into();
        assert!((v.0 - 13_200.0).abs() < 1e-9);
    }

    #[test]
    fn test_volts_arithmetic() {
        let source = Volts(23_000.0);
        let load = Volts(22_885.0);
        assert_eq!(source - load, Volts(115.0));
        assert_eq!(Volts(100.0) * 2.0, Volts(200.0));
        assert_eq!(Volts(300.0) / 3.0, Volts(100.0));
    }

    #[test]
    fn test_serialization() {
        let kva = KiloVoltAmperes(75.0);
        let json = serde_json::to_string(&kva).unwrap();
        assert_eq!(json, "75.0");
        assert_eq!(kva.volt_amperes(), 75_000.0);
    }
}
