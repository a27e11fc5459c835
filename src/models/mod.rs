//! Simulation core: parameters, random draws, path generation and statistics.

pub mod brownian;
pub mod monte_carlo;
pub mod params;
pub mod paths;
pub mod rng;
pub mod summary;

pub use brownian::{analytic_percentiles, expected_terminal_price, gbm_price, GbmIncrement};
pub use monte_carlo::{run_batch, run_batch_partitioned, BatchResult};
pub use params::SimulationParameters;
pub use paths::{simulate_paths, PriceMatrix};
pub use rng::{NormalStream, ReplayNormals, SeededNormals};
pub use summary::{percentile, Percentiles, SummaryStatistics, TerminalPriceSet, PERCENTILE_RANKS};
