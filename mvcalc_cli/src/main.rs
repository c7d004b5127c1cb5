//! # MVCalc CLI Application
//!
//! Terminal front end for the medium-voltage estimation engine. Loads the
//! catalog once per invocation, runs one calculation (or a batch from a JSON
//! file) and prints a report or JSON.
//!
//! Exit codes: 0 success, 1 calculation rejected, 2 catalog unavailable.

mod cli;
mod report;

use std::fs;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use mvcalc_core::calculations::line_analysis::{self, LineAnalysisInput};
use mvcalc_core::calculations::transformer_sizing::{self, TransformerSizingInput};
use mvcalc_core::calculations::{run_batch, CalculationRequest};
use mvcalc_core::catalog::InstallationCosts;
use mvcalc_core::{load_catalog_or_empty, write_catalog, Catalog, PhaseConfig};

use cli::{Cli, Commands, LineArgs, TransformerArgs};

const EXIT_REJECTED: u8 = 1;
const EXIT_CATALOG_UNAVAILABLE: u8 = 2;

fn init_tracing(level: tracing::Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level);

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    match &cli.command {
        Commands::InitCatalog { out, force } => {
            if out.exists() && !*force {
                bail!("{} already exists (use --force to overwrite)", out.display());
            }
            write_catalog(&Catalog::sample(), out)?;
            println!("Sample catalog written to {}", out.display());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Line(args) => with_catalog(cli, |catalog| {
            let input = line_input(args, catalog);
            match line_analysis::calculate(&input, catalog) {
                Ok(result) => {
                    report::print_line_result(&input.label, &result, cli.json);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    report::print_error(&e, cli.json);
                    Ok(ExitCode::from(EXIT_REJECTED))
                }
            }
        }),
        Commands::Transformer(args) => with_catalog(cli, |catalog| {
            let input = transformer_input(args, catalog);
            match transformer_sizing::calculate(&input, catalog) {
                Ok(result) => {
                    report::print_transformer_result(&input.label, &result, cli.json);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    report::print_error(&e, cli.json);
                    Ok(ExitCode::from(EXIT_REJECTED))
                }
            }
        }),
        Commands::Conductors => with_catalog(cli, |catalog| {
            report::print_conductors(catalog, cli.json);
            Ok(ExitCode::SUCCESS)
        }),
        Commands::Capacities { phase } => with_catalog(cli, |catalog| {
            report::print_capacities(catalog, PhaseConfig::from(*phase), cli.json);
            Ok(ExitCode::SUCCESS)
        }),
        Commands::Run { requests: path } => with_catalog(cli, |catalog| {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading requests from {}", path.display()))?;
            let requests: Vec<CalculationRequest> = serde_json::from_str(&text)
                .with_context(|| format!("parsing requests in {}", path.display()))?;
            info!(count = requests.len(), "running batch");

            let outcomes = run_batch(&requests, catalog);
            report::print_outcomes(&outcomes, cli.json);
            if outcomes.iter().any(|o| !o.is_completed()) {
                Ok(ExitCode::from(EXIT_REJECTED))
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }),
    }
}

/// Load the catalog and hand it to `f`, or report why it is unusable and
/// exit with `EXIT_CATALOG_UNAVAILABLE`.
fn with_catalog<F>(cli: &Cli, f: F) -> anyhow::Result<ExitCode>
where
    F: FnOnce(&Catalog) -> anyhow::Result<ExitCode>,
{
    let loaded = load_catalog_or_empty(&cli.catalog);
    if let Some(problem) = &loaded.problem {
        report::print_configuration_error(problem, cli.json);
        return Ok(ExitCode::from(EXIT_CATALOG_UNAVAILABLE));
    }
    f(&loaded.catalog)
}

fn line_input(args: &LineArgs, catalog: &Catalog) -> LineAnalysisInput {
    let phase = PhaseConfig::from(args.phase);
    let conductor = args
        .conductor
        .clone()
        .or_else(|| catalog.conductor_names().next().map(str::to_string))
        .unwrap_or_default();

    LineAnalysisInput {
        label: args.label.clone(),
        phase,
        line_voltage_kv: args.voltage_kv.unwrap_or(phase.default_line_voltage().0),
        active_power_kw: args.power_kw,
        power_factor: args.power_factor,
        length_m: args.length_m,
        conductor,
    }
}

fn transformer_input(args: &TransformerArgs, catalog: &Catalog) -> TransformerSizingInput {
    let installation = args.has_installation_overrides().then(|| {
        let defaults = catalog.installation_defaults();
        InstallationCosts {
            labor: args.labor.unwrap_or(defaults.labor),
            pole_and_mounting: args.pole_and_mounting.unwrap_or(defaults.pole_and_mounting),
            minor_materials: args.minor_materials.unwrap_or(defaults.minor_materials),
            permits: args.permits.unwrap_or(defaults.permits),
        }
    });

    TransformerSizingInput {
        label: args.label.clone(),
        phase: PhaseConfig::from(args.phase),
        required_kva: args.kva,
        power_factor: args.power_factor,
        installation,
    }
}
