//! Text and JSON renderings of a finished batch.

use serde_json::{json, Value};

use crate::error::Result;
use crate::models::{
    analytic_percentiles, expected_terminal_price, BatchResult, SimulationParameters,
};

/// Multi-line statistical summary of the terminal prices.
///
/// Also appends the closed-form log-normal reference values for the same
/// parameters, so sampling error is visible at a glance.
pub fn format_summary(batch: &BatchResult, params: &SimulationParameters) -> Result<String> {
    let s = &batch.summary;
    let p = &s.percentiles;

    let heading = if batch.iterations() > 1 {
        format!(
            "Statistical Summary of Final Prices ({} Iterations):",
            batch.iterations()
        )
    } else {
        "Statistical Summary of Final Prices:".to_string()
    };

    let mut lines = vec![
        heading,
        format!(
            "Mean: ${:.2}    Median: ${:.2}    Std Dev: ${:.2}",
            s.mean, s.median, s.std_dev
        ),
        format!(
            "Min: ${:.2}    Max: ${:.2}    Range: ${:.2}",
            s.min,
            s.max,
            s.range()
        ),
        String::new(),
        "Percentile Distribution:".to_string(),
        format!(
            "5th: ${:.2}    10th: ${:.2}    25th: ${:.2}    50th: ${:.2}",
            p.p5, p.p10, p.p25, p.p50
        ),
        format!(
            "75th: ${:.2}    90th: ${:.2}    95th: ${:.2}",
            p.p75, p.p90, p.p95
        ),
        String::new(),
    ];

    if batch.iterations() > 1 {
        lines.push(format!(
            "Total Paths: {} ({} iterations x {} paths each)",
            batch.total_paths(),
            batch.iterations(),
            params.path_count
        ));
    }
    lines.push(format!(
        "Initial Price: ${:.2}    Expected Return: {:.1}%    Volatility: {:.1}%",
        params.initial_price,
        params.drift * 100.0,
        params.volatility * 100.0
    ));

    let reference = analytic_percentiles(params)?;
    lines.push(format!(
        "Log-normal reference: Mean ${:.2}    5th ${:.2}    50th ${:.2}    95th ${:.2}",
        expected_terminal_price(params)?,
        reference.p5,
        reference.p50,
        reference.p95
    ));

    Ok(lines.join("\n"))
}

/// JSON document with the inputs and the summary statistics.
pub fn to_json(batch: &BatchResult, params: &SimulationParameters) -> Result<Value> {
    Ok(json!({
        "parameters": params,
        "iterations": batch.iterations(),
        "total_paths": batch.total_paths(),
        "summary": batch.summary,
        "range": batch.summary.range(),
        "analytic": {
            "mean": expected_terminal_price(params)?,
            "percentiles": analytic_percentiles(params)?,
        },
    }))
}
