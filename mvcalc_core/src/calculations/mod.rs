//! # Calculations
//!
//! Each calculation follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - `calculate(input, catalog) -> CalcResult<*Result>` - Pure function
//!
//! Nothing is cached between calls. A caller that wants to remember the last
//! result keeps it itself.
//!
//! ## Available Calculations
//!
//! - [`line_analysis`] - Voltage drop, losses and cost of a MV line
//! - [`transformer_sizing`] - Transformer selection and project cost

pub mod line_analysis;
pub mod transformer_sizing;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::errors::{CalcError, CalcResult};

// Re-export commonly used types
pub use line_analysis::{LineAnalysisInput, LineAnalysisResult, VoltageDropStatus};
pub use transformer_sizing::{TransformerSizingInput, TransformerSizingResult};

/// A calculation request of any kind.
///
/// ```json
/// { "type": "TransformerSizing", "phase": "three_phase",
///   "required_kva": 60.0, "power_factor": 0.92 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationRequest {
    /// Line voltage drop and loss analysis
    LineAnalysis(LineAnalysisInput),
    /// Transformer selection and cost estimate
    TransformerSizing(TransformerSizingInput),
}

/// The result matching a [`CalculationRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationOutput {
    LineAnalysis(LineAnalysisResult),
    TransformerSizing(TransformerSizingResult),
}

impl CalculationRequest {
    /// Get the user-provided label for this calculation
    pub fn label(&self) -> &str {
        match self {
            CalculationRequest::LineAnalysis(l) => &l.label,
            CalculationRequest::TransformerSizing(t) => &t.label,
        }
    }

    /// Get the calculation type as a string
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationRequest::LineAnalysis(_) => "LineAnalysis",
            CalculationRequest::TransformerSizing(_) => "TransformerSizing",
        }
    }

    /// Run this request against a catalog.
    pub fn run(&self, catalog: &Catalog) -> CalcResult<CalculationOutput> {
        match self {
            CalculationRequest::LineAnalysis(input) => {
                line_analysis::calculate(input, catalog).map(CalculationOutput::LineAnalysis)
            }
            CalculationRequest::TransformerSizing(input) => {
                transformer_sizing::calculate(input, catalog).map(CalculationOutput::TransformerSizing)
            }
        }
    }
}

/// Per-request outcome of a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CalculationOutcome {
    Completed {
        label: String,
        output: CalculationOutput,
    },
    Rejected {
        label: String,
        calc_type: String,
        error: CalcError,
    },
}

impl CalculationOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, CalculationOutcome::Completed { .. })
    }
}

/// Run every request independently; one failure does not affect the others.
pub fn run_batch(requests: &[CalculationRequest], catalog: &Catalog) -> Vec<CalculationOutcome> {
    requests
        .iter()
        .map(|request| match request.run(catalog) {
            Ok(output) => CalculationOutcome::Completed {
                label: request.label().to_string(),
                output,
            },
            Err(error) => CalculationOutcome::Rejected {
                label: request.label().to_string(),
                calc_type: request.calc_type().to_string(),
                error,
            },
        })
        .collect()
}
