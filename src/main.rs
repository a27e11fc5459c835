use clap::Parser;
use driftwalk::config::{parse_log_level, SimulationConfig, StreamMode};
use driftwalk::models::{run_batch, run_batch_partitioned, SeededNormals};
use driftwalk::{report, visualisations};
use rand::Rng;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Geometric Brownian Motion Monte Carlo simulator
#[derive(Parser, Debug)]
#[command(name = "driftwalk")]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (TOML format)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Starting asset price
    #[arg(long)]
    initial_price: Option<f64>,

    /// Expected annual return (decimal)
    #[arg(long, allow_negative_numbers = true)]
    drift: Option<f64>,

    /// Annual volatility (decimal)
    #[arg(long)]
    volatility: Option<f64>,

    /// Time horizon in years
    #[arg(long)]
    horizon: Option<f64>,

    /// Time steps spanning the horizon
    #[arg(long)]
    steps: Option<usize>,

    /// Paths per simulation run
    #[arg(short, long)]
    paths: Option<usize>,

    /// Number of simulation runs (1 = single run)
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Seed for reproducible runs
    #[arg(long, env = "DRIFTWALK_SEED")]
    seed: Option<u64>,

    /// Give every run its own random stream derived from the seed
    #[arg(long)]
    per_run_streams: bool,

    /// Write a PNG chart of all price paths
    #[arg(long, value_name = "FILE")]
    paths_chart: Option<PathBuf>,

    /// Write a PNG histogram of terminal prices
    #[arg(long, value_name = "FILE")]
    histogram_chart: Option<PathBuf>,

    /// Write the summary as JSON
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "DRIFTWALK_LOG_LEVEL")]
    log_level: Option<String>,
}

fn build_config(args: Args) -> Result<SimulationConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::from_file(path)?,
        None => SimulationConfig::default(),
    };

    if let Some(v) = args.initial_price {
        config.initial_price = v;
    }
    if let Some(v) = args.drift {
        config.drift = v;
    }
    if let Some(v) = args.volatility {
        config.volatility = v;
    }
    if let Some(v) = args.horizon {
        config.horizon_years = v;
    }
    if let Some(v) = args.steps {
        config.steps = v;
    }
    if let Some(v) = args.paths {
        config.path_count = v;
    }
    if let Some(v) = args.iterations {
        config.iterations = v;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.per_run_streams {
        config.stream = StreamMode::PerRun;
    }
    if args.paths_chart.is_some() {
        config.output.paths_chart = args.paths_chart;
    }
    if args.histogram_chart.is_some() {
        config.output.histogram_chart = args.histogram_chart;
    }
    if args.json.is_some() {
        config.output.json = args.json;
    }
    if let Some(level) = args.log_level {
        config.log_level = parse_log_level(&level)?;
    }
    Ok(config)
}

fn init_tracing(log_level: tracing::Level) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(log_level.as_str().to_ascii_lowercase())
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(Args::parse())?;
    init_tracing(config.log_level);

    let params = config.parameters();
    let seed = config.seed.unwrap_or_else(|| rand::rng().random());
    tracing::info!(
        initial_price = params.initial_price,
        drift = params.drift,
        volatility = params.volatility,
        horizon_years = params.horizon_years,
        steps = params.steps,
        paths = params.path_count,
        iterations = config.iterations,
        seed,
        stream = %config.stream,
        "Running GBM simulation"
    );

    let batch = match config.stream {
        StreamMode::Continuous => {
            let mut normals = SeededNormals::from_seed(seed);
            run_batch(&params, config.iterations, &mut normals)?
        }
        StreamMode::PerRun => run_batch_partitioned(&params, config.iterations, seed)?,
    };

    println!("{}", report::format_summary(&batch, &params)?);

    if let Some(path) = &config.output.json {
        let doc = report::to_json(&batch, &params)?;
        std::fs::write(path, serde_json::to_string_pretty(&doc)?)?;
        tracing::info!(path = %path.display(), "summary written");
    }
    if let Some(path) = &config.output.paths_chart {
        visualisations::plot_price_paths(&batch, &params, path)?;
    }
    if let Some(path) = &config.output.histogram_chart {
        visualisations::plot_terminal_histogram(&batch, path)?;
    }

    Ok(())
}
