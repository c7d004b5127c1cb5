//! # mvcalc_core - Medium-Voltage Estimation Engine
//!
//! `mvcalc_core` turns a handful of electrical parameters plus a static
//! equipment catalog into line-sizing and transformer-procurement estimates.
//! All inputs and outputs are JSON-serializable so any front end (CLI, web
//! form, spreadsheet export) can drive it.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions of (input, catalog); no retained results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Degrades, never panics**: a missing catalog yields typed errors
//!
//! ## Quick Start
//!
//! ```rust
//! use mvcalc_core::calculations::transformer_sizing::{calculate, TransformerSizingInput};
//! use mvcalc_core::{Catalog, PhaseConfig};
//!
//! let catalog = Catalog::sample();
//! let input = TransformerSizingInput {
//!     label: "T-1".to_string(),
//!     phase: PhaseConfig::ThreePhase,
//!     required_kva: 60.0,
//!     power_factor: 0.92,
//!     installation: None,
//! };
//! let result = calculate(&input, &catalog).unwrap();
//!
//! let json = serde_json::to_string_pretty(&result).unwrap();
//! assert!(json.contains("\"suggested_kva\": 75.0"));
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Line analysis and transformer sizing engines
//! - [`catalog`] - Conductor and transformer catalog model
//! - [`file_io`] - Catalog loading (strict and degraded) and atomic writes
//! - [`phase`] - Three-phase / single-phase strategy
//! - [`settings`] - Tariffs, limits and cost policy
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod catalog;
pub mod errors;
pub mod file_io;
pub mod phase;
pub mod settings;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{CalculationOutcome, CalculationOutput, CalculationRequest};
pub use catalog::{Catalog, ConductorSpec};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_catalog, load_catalog_or_empty, write_catalog, LoadedCatalog};
pub use phase::PhaseConfig;
pub use settings::{EngineSettings, MissingCostPolicy};
