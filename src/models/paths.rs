//! Path simulator: one batch of independent GBM price paths.
//!
//! Row `t` of the result holds every path's price after `t` increments.
//! Draws are consumed row by row, in path order within a row.

use nalgebra::{DMatrix, DVectorView, RowDVector};
use tracing::debug;

use super::brownian::GbmIncrement;
use super::params::SimulationParameters;
use super::rng::NormalStream;
use crate::error::Result;

/// Simulated prices, `steps` rows by `path_count` columns.
///
/// Read-only once produced: there is no mutable access to the prices.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceMatrix {
    prices: DMatrix<f64>,
}

impl PriceMatrix {
    /// Number of time rows (including the initial row).
    #[inline]
    pub fn steps(&self) -> usize {
        self.prices.nrows()
    }

    #[inline]
    pub fn path_count(&self) -> usize {
        self.prices.ncols()
    }

    /// Price of path `path` after `step` increments.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    #[inline]
    pub fn price(&self, step: usize, path: usize) -> f64 {
        self.prices[(step, path)]
    }

    /// All paths at time row `step`, in path order.
    pub fn row(&self, step: usize) -> RowDVector<f64> {
        self.prices.row(step).into_owned()
    }

    /// One full trajectory, from the initial price to the terminal price.
    pub fn path(&self, path: usize) -> DVectorView<'_, f64> {
        self.prices.column(path)
    }

    /// Iterates over trajectories in path order.
    pub fn paths(&self) -> impl Iterator<Item = DVectorView<'_, f64>> + '_ {
        (0..self.path_count()).map(move |p| self.path(p))
    }

    /// Final row, in path order.
    pub fn terminal_prices(&self) -> Vec<f64> {
        self.prices.row(self.steps() - 1).iter().copied().collect()
    }

    pub fn initial_price(&self) -> f64 {
        self.prices[(0, 0)]
    }

    /// Smallest and largest price anywhere in the matrix.
    pub fn bounds(&self) -> (f64, f64) {
        (self.prices.min(), self.prices.max())
    }

    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.prices
    }
}

/// Simulates `params.path_count` GBM paths over `params.steps` rows.
///
/// Fails with [`SimulationError::InvalidParameter`](crate::SimulationError)
/// before drawing anything if the parameters are invalid.
pub fn simulate_paths<S>(params: &SimulationParameters, stream: &mut S) -> Result<PriceMatrix>
where
    S: NormalStream + ?Sized,
{
    params.validate()?;
    Ok(simulate_validated(params, stream))
}

pub(crate) fn simulate_validated<S>(params: &SimulationParameters, stream: &mut S) -> PriceMatrix
where
    S: NormalStream + ?Sized,
{
    let increment = GbmIncrement::from_params(params);
    let mut prices = DMatrix::from_element(params.steps, params.path_count, params.initial_price);
    let mut draws = vec![0.0; params.path_count];

    for t in 1..params.steps {
        stream.fill_normal(&mut draws);
        for (p, &z) in draws.iter().enumerate() {
            prices[(t, p)] = increment.apply(prices[(t - 1, p)], z);
        }
    }

    debug!(
        steps = params.steps,
        paths = params.path_count,
        "simulated price matrix"
    );
    PriceMatrix { prices }
}
