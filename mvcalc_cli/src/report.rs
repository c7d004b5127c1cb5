//! Human-readable and JSON rendering of results.

use mvcalc_core::calculations::{
    CalculationOutcome, CalculationOutput, LineAnalysisResult, TransformerSizingResult,
};
use mvcalc_core::{CalcError, Catalog, PhaseConfig};
use serde::Serialize;

const RULE: &str = "═══════════════════════════════════════";

pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: could not serialize output: {}", e),
    }
}

fn banner(title: &str) {
    println!("{}", RULE);
    println!("  {}", title);
    println!("{}", RULE);
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[FAIL]" }
}

/// Whole currency units with thousands separators, e.g. `14,500,000`.
pub fn format_amount(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

pub fn print_line_result(label: &str, result: &LineAnalysisResult, json: bool) {
    if json {
        print_json(result);
        return;
    }
    let vl = result.voltage_label();

    banner("LINE ANALYSIS RESULTS");
    println!();
    if !label.is_empty() {
        println!("Label:      {}", label);
    }
    println!("System:     {}", result.phase);
    println!("Conductor:  {}", result.conductor);
    println!("Length:     {:.0} m", result.length_m);
    println!();
    println!("Electrical:");
    println!("  S       = {:.2} kVA", result.apparent_power_kva);
    println!("  I       = {:.2} A", result.line_current_a);
    println!("  V_src   = {:.1} V ({})", result.source_voltage_v, vl);
    println!("  V_load  = {:.1} V ({})", result.load_voltage_v, vl);
    println!(
        "  ΔV      = {:.2} V ({:.2} %) {}",
        result.voltage_drop_v,
        result.voltage_drop_percent,
        status_icon(result.passes())
    );
    println!("  P_loss  = {:.3} kW", result.power_loss_kw);
    println!();
    println!("Economics:");
    println!("  Conductor cost:      {}", format_amount(result.conductor_cost));
    println!("  Annual loss cost:    {}", format_amount(result.annual_loss_cost));
    println!();
    println!("{}", RULE);
    println!(
        "  RESULT: {}",
        if result.passes() { "ACCEPTABLE" } else { "EXCESSIVE DROP" }
    );
    println!("{}", RULE);
}

pub fn print_transformer_result(label: &str, result: &TransformerSizingResult, json: bool) {
    if json {
        print_json(result);
        return;
    }

    banner("TRANSFORMER ESTIMATE");
    println!();
    if !label.is_empty() {
        println!("Label:      {}", label);
    }
    println!("System:     {}", result.phase);
    println!("Load:       {:.2} kVA / {:.2} kW", result.required_kva, result.active_power_kw);
    println!(
        "Suggested:  {} kVA {}",
        result.suggested_kva,
        if result.exceeds_catalog {
            "(largest listed, load exceeds catalog)"
        } else {
            ""
        }
    );
    println!();
    println!("Cost breakdown:");
    println!("  {:<22} {:>16}", "Transformer", format_amount(result.equipment_cost));
    println!("  {:<22} {:>16}", "Connection fee", format_amount(result.connection_fee));
    for (name, amount) in result.installation.items() {
        println!("  {:<22} {:>16}", name, format_amount(amount));
    }
    println!();
    println!("{}", RULE);
    println!("  TOTAL: {}", format_amount(result.total_cost));
    println!("{}", RULE);
}

pub fn print_output(label: &str, output: &CalculationOutput, json: bool) {
    match output {
        CalculationOutput::LineAnalysis(result) => print_line_result(label, result, json),
        CalculationOutput::TransformerSizing(result) => print_transformer_result(label, result, json),
    }
}

pub fn print_outcomes(outcomes: &[CalculationOutcome], json: bool) {
    if json {
        print_json(&outcomes);
        return;
    }
    for outcome in outcomes {
        match outcome {
            CalculationOutcome::Completed { label, output } => print_output(label, output, false),
            CalculationOutcome::Rejected {
                label,
                calc_type,
                error,
            } => {
                println!("{} '{}' rejected: {}", calc_type, label, error);
            }
        }
        println!();
    }
}

pub fn print_error(error: &CalcError, json: bool) {
    eprintln!("Error: {}", error);
    if json {
        if let Ok(json) = serde_json::to_string_pretty(error) {
            eprintln!();
            eprintln!("Error JSON:");
            eprintln!("{}", json);
        }
    }
}

pub fn print_configuration_error(error: &CalcError, json: bool) {
    print_error(error, json);
    eprintln!();
    eprintln!("Calculations are disabled until the catalog is fixed.");
    eprintln!("Run `mvcalc init-catalog <path>` to write a sample catalog.");
}

pub fn print_conductors(catalog: &Catalog, json: bool) {
    if json {
        print_json(&catalog.conductors());
        return;
    }
    println!("Catalog version {}", catalog.version());
    println!("{:<24} {:>10} {:>10} {:>14}", "Conductor", "R (Ω/km)", "X (Ω/km)", "Cost / m");
    for c in catalog.conductors() {
        println!(
            "{:<24} {:>10.4} {:>10.4} {:>14}",
            c.type_name,
            c.resistance_ohm_per_km,
            c.reactance_ohm_per_km,
            format_amount(c.cost_per_meter)
        );
    }
}

pub fn print_capacities(catalog: &Catalog, phase: PhaseConfig, json: bool) {
    let table = catalog.capacity_table(phase);
    if json {
        print_json(&table.ratings());
        return;
    }
    if table.is_empty() {
        println!("No {} transformers in catalog.", phase);
        return;
    }
    println!("{} transformers:", phase);
    println!("{:>10} {:>16}", "kVA", "Price");
    for rating in table.ratings() {
        println!("{:>10} {:>16}", rating.capacity_kva, format_amount(rating.unit_cost));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(999.4), "999");
        assert_eq!(format_amount(1_000.0), "1,000");
        assert_eq!(format_amount(14_500_000.0), "14,500,000");
        assert_eq!(format_amount(-2_500_000.0), "-2,500,000");
    }
}
