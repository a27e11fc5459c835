use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;
use tracing::info;

use crate::models::{BatchResult, SimulationParameters};

const CHART_SIZE: (u32, u32) = (1200, 800);
const HISTOGRAM_BINS: usize = 50;

/// Pads a value range by 10% on each side, widening a degenerate one.
fn padded(min: f64, max: f64) -> Range<f64> {
    let span = max - min;
    let margin = if span > 0.0 {
        span * 0.1
    } else {
        (min.abs() * 0.05).max(1.0)
    };
    (min - margin)..(max + margin)
}

/// Draws every path of every run against the time-step index.
pub fn plot_price_paths(
    batch: &BatchResult,
    params: &SimulationParameters,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(output, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut min_price = params.initial_price;
    let mut max_price = params.initial_price;
    for run in &batch.runs {
        let (lo, hi) = run.bounds();
        min_price = min_price.min(lo);
        max_price = max_price.max(hi);
    }

    let last_step = params.steps.saturating_sub(1).max(1) as f64;
    let caption = if batch.iterations() > 1 {
        format!(
            "Monte Carlo Simulation: {} Iterations x {} Paths = {} Total Paths",
            batch.iterations(),
            params.path_count,
            batch.total_paths()
        )
    } else {
        format!(
            "Monte Carlo Simulation of Stock Price ({} Paths)",
            params.path_count
        )
    };
    let opacity = if batch.iterations() > 1 { 0.3 } else { 0.8 };

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 26))
        .margin(40)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..last_step, padded(min_price, max_price))?;

    chart
        .configure_mesh()
        .x_desc("Time Step (Days)")
        .y_desc("Price ($)")
        .draw()?;

    let mut series = 0;
    for run in &batch.runs {
        for path in run.paths() {
            let color = Palette99::pick(series).mix(opacity);
            let points: Vec<(f64, f64)> = path
                .iter()
                .enumerate()
                .map(|(step, &price)| (step as f64, price))
                .collect();
            chart.draw_series(LineSeries::new(points, color.stroke_width(1)))?;
            series += 1;
        }
    }

    root.present()?;
    info!(path = %output.display(), "price path chart saved");
    Ok(())
}

/// Histogram of terminal prices with the mean, median, 5th and 95th percentiles marked.
pub fn plot_terminal_histogram(
    batch: &BatchResult,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(output, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let summary = &batch.summary;
    let prices = batch.terminal_prices.as_slice();
    let x_range = padded(summary.min, summary.max);

    let span = summary.range();
    let num_bins = if span > 0.0 { HISTOGRAM_BINS } else { 1 };
    let bin_width = if span > 0.0 {
        span / num_bins as f64
    } else {
        x_range.end - x_range.start
    };
    let bin_start = if span > 0.0 { summary.min } else { x_range.start };

    let mut histogram = vec![0u32; num_bins];
    for price in prices {
        let bin = ((price - bin_start) / bin_width).floor() as usize;
        histogram[bin.min(num_bins - 1)] += 1;
    }
    let peak = histogram.iter().copied().max().unwrap_or(0);

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Distribution of Final Prices ({} Paths)", batch.total_paths()),
            ("sans-serif", 30),
        )
        .margin(40)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, 0..(peak + 1))?;

    chart
        .configure_mesh()
        .x_desc("Final Price ($)")
        .y_desc("Frequency")
        .draw()?;

    chart.draw_series(histogram.iter().enumerate().map(|(i, &count)| {
        let left = bin_start + i as f64 * bin_width;
        Rectangle::new([(left, 0), (left + bin_width, count)], BLUE.mix(0.6).filled())
    }))?;

    let markers = [
        ("Mean", summary.mean, BLACK),
        ("Median", summary.median, GREEN),
        ("5th percentile", summary.percentiles.p5, RED),
        ("95th percentile", summary.percentiles.p95, RED),
    ];
    for (label, value, color) in markers {
        chart
            .draw_series(LineSeries::new(
                vec![(value, 0), (value, peak)],
                color.stroke_width(2),
            ))?
            .label(format!("{}: ${:.2}", label, value))
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    info!(path = %output.display(), "terminal price histogram saved");
    Ok(())
}
