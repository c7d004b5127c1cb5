use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use mvcalc_core::PhaseConfig;

#[derive(Parser, Debug)]
#[command(name = "mvcalc", author, version, about = "Medium-voltage line and transformer estimates", long_about = None)]
pub struct Cli {
    /// Catalog file with conductors, transformer prices and tariffs
    #[arg(long, env = "MVCALC_CATALOG", default_value = "catalog.json", global = true)]
    pub catalog: PathBuf,

    /// Set the logging level (RUST_LOG overrides)
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: tracing::Level,

    /// Print results as JSON instead of a report
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Voltage drop, losses and cost of a MV line
    Line(LineArgs),
    /// Transformer size and project cost estimate
    Transformer(TransformerArgs),
    /// List catalog conductors
    Conductors,
    /// List transformer capacities for a phase configuration
    Capacities {
        #[arg(long, value_enum, default_value_t = PhaseArg::Three)]
        phase: PhaseArg,
    },
    /// Run a JSON array of calculation requests
    Run {
        /// Path to the requests file
        requests: PathBuf,
    },
    /// Write a sample catalog to start from
    InitCatalog {
        /// Where to write the catalog
        out: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseArg {
    Three,
    Single,
}

impl From<PhaseArg> for PhaseConfig {
    fn from(arg: PhaseArg) -> Self {
        match arg {
            PhaseArg::Three => PhaseConfig::ThreePhase,
            PhaseArg::Single => PhaseConfig::SinglePhase,
        }
    }
}

#[derive(Args, Debug)]
pub struct LineArgs {
    #[arg(long, value_enum, default_value_t = PhaseArg::Three)]
    pub phase: PhaseArg,

    /// Source line voltage in kV [default: 23 three-phase, 13.2 single-phase]
    #[arg(long)]
    pub voltage_kv: Option<f64>,

    /// Load active power in kW
    #[arg(long, default_value_t = 475.0)]
    pub power_kw: f64,

    /// Load power factor (cos φ)
    #[arg(long, default_value_t = 0.95)]
    pub power_factor: f64,

    /// Line length in meters
    #[arg(long, default_value_t = 100.0)]
    pub length_m: f64,

    /// Conductor type name [default: first catalog conductor]
    #[arg(long)]
    pub conductor: Option<String>,

    #[arg(long, default_value = "")]
    pub label: String,
}

#[derive(Args, Debug)]
pub struct TransformerArgs {
    #[arg(long, value_enum, default_value_t = PhaseArg::Three)]
    pub phase: PhaseArg,

    /// Load apparent power in kVA
    #[arg(long, default_value_t = 60.0)]
    pub kva: f64,

    /// Load power factor (cos φ)
    #[arg(long, default_value_t = 0.92)]
    pub power_factor: f64,

    /// Labor cost [default: catalog]
    #[arg(long)]
    pub labor: Option<f64>,

    /// Pole and mounting cost [default: catalog]
    #[arg(long)]
    pub pole_and_mounting: Option<f64>,

    /// Minor materials cost [default: catalog]
    #[arg(long)]
    pub minor_materials: Option<f64>,

    /// Permits cost [default: catalog]
    #[arg(long)]
    pub permits: Option<f64>,

    #[arg(long, default_value = "")]
    pub label: String,
}

impl TransformerArgs {
    pub fn has_installation_overrides(&self) -> bool {
        self.labor.is_some()
            || self.pole_and_mounting.is_some()
            || self.minor_materials.is_some()
            || self.permits.is_some()
    }
}
