//! # Transformer Cost Tables
//!
//! Commercial transformer sizes and their prices, plus the connection tariff
//! and installation cost defaults used by the sizing engine.
//!
//! In the catalog file each phase table is a JSON object keyed by capacity:
//!
//! ```json
//! { "25": 32000000, "37.5": 41000000, "50": 45000000 }
//! ```
//!
//! Keys are parsed to numbers once, at load time, and held as an ascending
//! sequence. Lookups never go back through string formatting. A capacity may
//! appear only once per table, whether repeated verbatim (`"75"` twice) or
//! spelled two ways (`"75"` and `"75.0"`).

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::phase::PhaseConfig;

/// A commercial transformer size and its unit price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformerRating {
    /// Nameplate capacity (kVA)
    pub capacity_kva: f64,
    /// Equipment price
    pub unit_cost: f64,
}

/// Outcome of first-fit capacity selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacitySelection {
    /// Chosen rating
    pub rating: TransformerRating,
    /// True when nothing in the table covered the requirement and the
    /// largest capacity was taken instead
    pub exceeds_catalog: bool,
}

/// Capacities for one phase configuration, strictly ascending.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(into = "BTreeMap<String, f64>")]
pub struct CapacityTable {
    ratings: Vec<TransformerRating>,
}

impl CapacityTable {
    /// Build a table from (capacity, cost) pairs in any order.
    ///
    /// Fails on non-positive capacities, negative costs, or the same capacity
    /// listed twice.
    pub fn from_ratings(ratings: impl IntoIterator<Item = (f64, f64)>) -> CalcResult<Self> {
        let mut ratings: Vec<TransformerRating> = ratings
            .into_iter()
            .map(|(capacity_kva, unit_cost)| TransformerRating { capacity_kva, unit_cost })
            .collect();

        for r in &ratings {
            if !r.capacity_kva.is_finite() || r.capacity_kva <= 0.0 {
                return Err(CalcError::malformed(format!(
                    "transformer capacity must be positive, got {}",
                    r.capacity_kva
                )));
            }
            if !r.unit_cost.is_finite() || r.unit_cost < 0.0 {
                return Err(CalcError::malformed(format!(
                    "transformer cost at {} kVA must be non-negative, got {}",
                    r.capacity_kva, r.unit_cost
                )));
            }
        }

        ratings.sort_by(|a, b| a.capacity_kva.total_cmp(&b.capacity_kva));
        if let Some(pair) = ratings.windows(2).find(|w| w[0].capacity_kva == w[1].capacity_kva) {
            return Err(CalcError::malformed(format!(
                "transformer capacity {} kVA listed more than once",
                pair[0].capacity_kva
            )));
        }

        Ok(CapacityTable { ratings })
    }

    /// Ratings in ascending capacity order
    pub fn ratings(&self) -> &[TransformerRating] {
        &self.ratings
    }

    /// Capacities in ascending order
    pub fn capacities(&self) -> Vec<f64> {
        self.ratings.iter().map(|r| r.capacity_kva).collect()
    }

    /// Price at an exact capacity, if listed
    pub fn price_at(&self, capacity_kva: f64) -> Option<f64> {
        self.ratings
            .iter()
            .find(|r| r.capacity_kva == capacity_kva)
            .map(|r| r.unit_cost)
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    /// First capacity ≥ `required_kva`, or the largest capacity when none is.
    ///
    /// Returns `None` only for an empty table.
    pub fn select(&self, required_kva: f64) -> Option<CapacitySelection> {
        match self.ratings.iter().find(|r| r.capacity_kva >= required_kva) {
            Some(rating) => Some(CapacitySelection {
                rating: *rating,
                exceeds_catalog: false,
            }),
            None => self.ratings.last().map(|rating| CapacitySelection {
                rating: *rating,
                exceeds_catalog: true,
            }),
        }
    }
}

fn parse_capacity_key(key: &str) -> CalcResult<f64> {
    key.trim().parse().map_err(|_| {
        CalcError::malformed(format!("transformer capacity key '{}' is not a number", key))
    })
}

fn to_de_error<E: de::Error>(err: CalcError) -> E {
    match err {
        CalcError::MalformedCatalog { reason } => E::custom(reason),
        other => E::custom(other),
    }
}

struct CapacityTableVisitor;

impl<'de> Visitor<'de> for CapacityTableVisitor {
    type Value = CapacityTable;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map from capacity (kVA) to unit cost")
    }

    // Entries are collected in file order, repeats included, so that
    // `from_ratings` sees every one of them.
    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut ratings = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, cost)) = map.next_entry::<String, f64>()? {
            let capacity = parse_capacity_key(&key).map_err(to_de_error)?;
            ratings.push((capacity, cost));
        }
        CapacityTable::from_ratings(ratings).map_err(to_de_error)
    }
}

impl<'de> Deserialize<'de> for CapacityTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(CapacityTableVisitor)
    }
}

impl From<CapacityTable> for BTreeMap<String, f64> {
    fn from(table: CapacityTable) -> Self {
        table
            .ratings
            .into_iter()
            .map(|r| (r.capacity_kva.to_string(), r.unit_cost))
            .collect()
    }
}

/// Transformer price tables per phase configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformerCatalog {
    pub single_phase: CapacityTable,
    pub three_phase: CapacityTable,
}

impl TransformerCatalog {
    /// Table searched for a given phase configuration
    pub fn table(&self, phase: PhaseConfig) -> &CapacityTable {
        match phase {
            PhaseConfig::ThreePhase => &self.three_phase,
            PhaseConfig::SinglePhase => &self.single_phase,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.single_phase.is_empty() && self.three_phase.is_empty()
    }
}

/// Default connection-fee threshold (kVA)
pub const DEFAULT_TARIFF_THRESHOLD_KVA: f64 = 100.0;

fn default_threshold_kva() -> f64 {
    DEFAULT_TARIFF_THRESHOLD_KVA
}

/// Utility connection-right tariff.
///
/// Capacities up to and including `threshold_kva` pay the fixed fee; larger
/// ones pay `connection_fee_per_kva` × capacity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TariffSchedule {
    pub connection_fee_fixed: f64,
    pub connection_fee_per_kva: f64,
    #[serde(default = "default_threshold_kva")]
    pub threshold_kva: f64,
}

impl TariffSchedule {
    /// Connection fee owed for a transformer of `capacity_kva`
    pub fn connection_fee(&self, capacity_kva: f64) -> f64 {
        if capacity_kva <= self.threshold_kva {
            self.connection_fee_fixed
        } else {
            self.connection_fee_per_kva * capacity_kva
        }
    }

    pub(crate) fn validate(&self) -> CalcResult<()> {
        let fields = [
            ("tariffs.connection_fee_fixed", self.connection_fee_fixed),
            ("tariffs.connection_fee_per_kva", self.connection_fee_per_kva),
            ("tariffs.threshold_kva", self.threshold_kva),
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

/// The four fixed installation cost components of a transformer project.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstallationCosts {
    /// Crew labor
    pub labor: f64,
    /// Pole, platform and mounting hardware
    pub pole_and_mounting: f64,
    /// Low-voltage minor materials
    pub minor_materials: f64,
    /// Paperwork and permits
    pub permits: f64,
}

impl Default for InstallationCosts {
    fn default() -> Self {
        InstallationCosts {
            labor: 3_000_000.0,
            pole_and_mounting: 8_000_000.0,
            minor_materials: 2_000_000.0,
            permits: 1_500_000.0,
        }
    }
}

impl InstallationCosts {
    /// Sum of all four components
    pub fn total(&self) -> f64 {
        self.labor + self.pole_and_mounting + self.minor_materials + self.permits
    }

    /// Components paired with display names, in presentation order
    pub fn items(&self) -> [(&'static str, f64); 4] {
        [
            ("Labor", self.labor),
            ("Pole and mounting", self.pole_and_mounting),
            ("Minor materials", self.minor_materials),
            ("Permits", self.permits),
        ]
    }

    pub fn validate(&self, field_prefix: &str) -> CalcResult<()> {
        let fields = [
            ("labor", self.labor),
            ("pole_and_mounting", self.pole_and_mounting),
            ("minor_materials", self.minor_materials),
            ("permits", self.permits),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(CalcError::invalid_input(
                    format!("{}.{}", field_prefix, field),
                    value.to_string(),
                    "Installation cost must be a non-negative number",
                ));
            }
        }
        Ok(())
    }
}
