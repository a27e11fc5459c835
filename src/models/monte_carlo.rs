//! Batch aggregation over repeated path simulations.
//!
//! `iterations = 1` is a single run; larger values repeat the run with the
//! same parameters and pool every terminal price before summarising.

use tracing::{debug, info, warn};

use super::params::SimulationParameters;
use super::paths::{simulate_validated, PriceMatrix};
use super::rng::{NormalStream, SeededNormals};
use super::summary::{SummaryStatistics, TerminalPriceSet};
use crate::error::{Result, SimulationError};

/// Everything one batch produces.
#[derive(Clone, Debug)]
pub struct BatchResult {
    /// One matrix per run, in run order.
    pub runs: Vec<PriceMatrix>,
    /// Final-row prices of every run, runs in order and paths in order within a run.
    pub terminal_prices: TerminalPriceSet,
    pub summary: SummaryStatistics,
}

impl BatchResult {
    pub fn iterations(&self) -> usize {
        self.runs.len()
    }

    pub fn total_paths(&self) -> usize {
        self.terminal_prices.len()
    }
}

/// Runs the simulator `iterations` times on one continuous random stream.
///
/// Run `k` starts exactly where run `k - 1` stopped drawing, so a batch of
/// one run matches a direct [`simulate_paths`](super::simulate_paths) call.
pub fn run_batch<S>(
    params: &SimulationParameters,
    iterations: usize,
    stream: &mut S,
) -> Result<BatchResult>
where
    S: NormalStream + ?Sized,
{
    aggregate(params, iterations, |_| simulate_validated(params, &mut *stream))
}

/// Runs the simulator `iterations` times, run `k` drawing from
/// [`SeededNormals::for_run`]`(seed, k)`.
///
/// The draws of a run do not depend on how many runs precede it.
pub fn run_batch_partitioned(
    params: &SimulationParameters,
    iterations: usize,
    seed: u64,
) -> Result<BatchResult> {
    aggregate(params, iterations, |run| {
        let mut stream = SeededNormals::for_run(seed, run);
        simulate_validated(params, &mut stream)
    })
}

fn aggregate<F>(
    params: &SimulationParameters,
    iterations: usize,
    mut simulate: F,
) -> Result<BatchResult>
where
    F: FnMut(usize) -> PriceMatrix,
{
    if iterations == 0 {
        return Err(SimulationError::invalid(
            "iterations",
            "must be at least 1, got 0",
        ));
    }
    params.validate()?;

    if params.volatility == 0.0 {
        warn!("volatility is zero; every path follows the same deterministic trajectory");
    }

    let total = iterations.saturating_mul(params.path_count);
    let progress_every = (iterations / 5).max(1);
    let mut runs = Vec::with_capacity(iterations);
    let mut terminal_prices = TerminalPriceSet::with_capacity(total);

    for run in 0..iterations {
        let matrix = simulate(run);
        terminal_prices.extend_from_slice(&matrix.terminal_prices())?;
        runs.push(matrix);
        debug!(run, "run complete");

        if iterations > 1 && (run + 1) % progress_every == 0 {
            info!("Completed {}/{} iterations", run + 1, iterations);
        }
    }

    info!(
        "Total simulations completed: {} iterations x {} paths = {} total paths",
        iterations,
        params.path_count,
        terminal_prices.len()
    );

    let summary = terminal_prices.summary()?;
    Ok(BatchResult {
        runs,
        terminal_prices,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::paths::simulate_paths;
    use crate::models::rng::ReplayNormals;

    fn params() -> SimulationParameters {
        SimulationParameters {
            steps: 20,
            path_count: 8,
            ..Default::default()
        }
    }

    #[test]
    fn test_sizes() {
        let mut rng = SeededNormals::from_seed(3);
        let batch = run_batch(&params(), 5, &mut rng).unwrap();
        assert_eq!(batch.iterations(), 5);
        assert_eq!(batch.total_paths(), 40);
        assert_eq!(batch.summary.count, 40);
    }

    #[test]
    fn test_single_iteration_matches_direct_simulation() {
        let p = params();
        let direct = simulate_paths(&p, &mut SeededNormals::from_seed(11)).unwrap();
        let batch = run_batch(&p, 1, &mut SeededNormals::from_seed(11)).unwrap();
        assert_eq!(batch.runs[0], direct);
        assert_eq!(batch.terminal_prices.as_slice(), direct.terminal_prices().as_slice());
    }

    #[test]
    fn test_continuous_stream_across_runs() {
        let p = params();
        let mut shared = SeededNormals::from_seed(21);
        let first = simulate_paths(&p, &mut shared).unwrap();
        let second = simulate_paths(&p, &mut shared).unwrap();

        let batch = run_batch(&p, 2, &mut SeededNormals::from_seed(21)).unwrap();
        assert_eq!(batch.runs[0], first);
        assert_eq!(batch.runs[1], second);

        let mut expected = first.terminal_prices();
        expected.extend(second.terminal_prices());
        assert_eq!(batch.terminal_prices.as_slice(), expected.as_slice());
    }

    #[test]
    fn test_partitioned_runs_independent_of_batch_size() {
        let p = params();
        let small = run_batch_partitioned(&p, 2, 77).unwrap();
        let large = run_batch_partitioned(&p, 4, 77).unwrap();
        assert_eq!(small.runs[0], large.runs[0]);
        assert_eq!(small.runs[1], large.runs[1]);
        assert_ne!(large.runs[0], large.runs[1]);
    }

    #[test]
    fn test_zero_iterations_rejected_before_drawing() {
        let mut replay = ReplayNormals::new(vec![0.1]).unwrap();
        let err = run_batch(&params(), 0, &mut replay).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::InvalidParameter {
                name: "iterations",
                ..
            }
        ));
        assert_eq!(replay.consumed(), 0);
    }

    #[test]
    fn test_unrepresentable_parameters_rejected_before_drawing() {
        let p = SimulationParameters {
            initial_price: 100.0,
            drift: 5e5,
            volatility: 1000.0,
            horizon_years: 2.0,
            steps: 3,
            path_count: 200,
        };
        let mut replay = ReplayNormals::new(vec![0.4, -0.9]).unwrap();
        let err = run_batch(&p, 1, &mut replay).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::InvalidParameter {
                name: "volatility",
                ..
            }
        ));
        assert_eq!(replay.consumed(), 0);
    }

    #[test]
    fn test_overflowing_draws_fail_instead_of_summarising() {
        let mut replay = ReplayNormals::new(vec![1e308]).unwrap();
        let err = run_batch(&params(), 2, &mut replay).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::InvalidParameter {
                name: "terminal_prices",
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_parameters_propagate() {
        let p = SimulationParameters {
            initial_price: -1.0,
            ..params()
        };
        let err = run_batch_partitioned(&p, 3, 1).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::InvalidParameter {
                name: "initial_price",
                ..
            }
        ));
    }
}
