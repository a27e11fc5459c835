//! Terminal price collection and its statistical summary.
//!
//! Percentiles use linear interpolation between order statistics: for a
//! sorted sample `x[0..n]` and rank `r`, `h = (n - 1)·r/100` and the result
//! is `x[⌊h⌋] + (h - ⌊h⌋)·(x[⌊h⌋+1] - x[⌊h⌋])`. The median is the same
//! computation at rank 50.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::error::{Result, SimulationError};

/// Ranks reported in every [`SummaryStatistics`].
pub const PERCENTILE_RANKS: [u8; 7] = [5, 10, 25, 50, 75, 90, 95];

/// Terminal prices of every path of every run in a batch.
///
/// Order carries no meaning for the statistics. The set only grows while a
/// batch is running and is frozen once handed back to the caller.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TerminalPriceSet {
    values: Vec<f64>,
}

impl TerminalPriceSet {
    /// Builds a set from arbitrary prices.
    ///
    /// Rejects an empty input or any value that is not positive and finite.
    pub fn from_prices(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(SimulationError::invalid(
                "terminal_prices",
                "at least one price is required",
            ));
        }
        check_prices(&values)?;
        Ok(Self { values })
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    /// Appends one run's prices, leaving the set untouched if any is invalid.
    pub(crate) fn extend_from_slice(&mut self, prices: &[f64]) -> Result<()> {
        check_prices(prices)?;
        self.values.extend_from_slice(prices);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Values in ascending order.
    pub fn sorted(&self) -> Vec<f64> {
        let mut sorted = self.values.clone();
        sorted.sort_by(f64::total_cmp);
        sorted
    }

    /// Summary statistics of the set.
    ///
    /// Fails only for an empty set.
    pub fn summary(&self) -> Result<SummaryStatistics> {
        SummaryStatistics::from_terminal_prices(self)
    }
}

fn check_prices(values: &[f64]) -> Result<()> {
    match values.iter().find(|v| !(v.is_finite() && **v > 0.0)) {
        Some(bad) => Err(SimulationError::invalid(
            "terminal_prices",
            format!("prices must be positive and finite, got {}", bad),
        )),
        None => Ok(()),
    }
}

/// Percentile of an ascending, non-empty sample by linear interpolation.
///
/// Returns `None` for an empty sample or a rank outside `[0, 100]`.
pub fn percentile(sorted: &[f64], rank: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=100.0).contains(&rank) {
        return None;
    }
    let h = (sorted.len() - 1) as f64 * rank / 100.0;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let frac = h - lo as f64;
    let (below, above) = (sorted[lo], sorted[hi]);
    // Result stays inside [below, above] under rounding; max/min ignore NaN.
    Some((below + frac * (above - below)).max(below).min(above))
}

/// Values at each of [`PERCENTILE_RANKS`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    pub p5: f64,
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
}

impl Percentiles {
    pub(crate) fn try_from_fn<E>(
        mut f: impl FnMut(u8) -> std::result::Result<f64, E>,
    ) -> std::result::Result<Self, E> {
        Ok(Self {
            p5: f(5)?,
            p10: f(10)?,
            p25: f(25)?,
            p50: f(50)?,
            p75: f(75)?,
            p90: f(90)?,
            p95: f(95)?,
        })
    }

    /// Value for one of [`PERCENTILE_RANKS`], `None` for any other rank.
    pub fn get(&self, rank: u8) -> Option<f64> {
        self.iter().find(|(r, _)| *r == rank).map(|(_, v)| v)
    }

    /// `(rank, value)` pairs in ascending rank order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, f64)> {
        PERCENTILE_RANKS.into_iter().zip(self.to_array())
    }

    pub fn to_array(&self) -> [f64; 7] {
        [
            self.p5, self.p10, self.p25, self.p50, self.p75, self.p90, self.p95,
        ]
    }
}

/// Fixed summary of a [`TerminalPriceSet`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation (divides by N).
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub percentiles: Percentiles,
}

impl SummaryStatistics {
    pub fn from_terminal_prices(set: &TerminalPriceSet) -> Result<Self> {
        let sorted = set.sorted();
        let pct = |rank: u8| {
            percentile(&sorted, f64::from(rank)).ok_or_else(|| {
                SimulationError::invalid("terminal_prices", "at least one price is required")
            })
        };
        let percentiles = Percentiles::try_from_fn(pct)?;

        let values = set.as_slice();
        Ok(Self {
            count: values.len(),
            mean: values.mean(),
            median: percentiles.p50,
            std_dev: values.population_std_dev(),
            min: Statistics::min(values),
            max: Statistics::max(values),
            percentiles,
        })
    }

    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Looks up one of the reported percentiles.
    pub fn percentile(&self, rank: u8) -> Option<f64> {
        self.percentiles.get(rank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_percentile_linear_interpolation() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&sorted, 0.0), Some(1.0));
        assert_eq!(percentile(&sorted, 100.0), Some(4.0));
        assert_relative_eq!(percentile(&sorted, 50.0).unwrap(), 2.5);
        // h = 3 * 0.25 = 0.75
        assert_relative_eq!(percentile(&sorted, 25.0).unwrap(), 1.75);
        assert_relative_eq!(percentile(&sorted, 95.0).unwrap(), 3.85, epsilon = 1e-12);
    }

    #[test]
    fn test_percentile_single_value() {
        assert_eq!(percentile(&[7.0], 5.0), Some(7.0));
        assert_eq!(percentile(&[7.0], 95.0), Some(7.0));
    }

    #[test]
    fn test_percentile_rejects_bad_input() {
        assert_eq!(percentile(&[], 50.0), None);
        assert_eq!(percentile(&[1.0], -1.0), None);
        assert_eq!(percentile(&[1.0], 100.5), None);
    }

    #[test]
    fn test_summary_known_sample() {
        let set = TerminalPriceSet::from_prices(vec![4.0, 1.0, 3.0, 2.0, 5.0]).unwrap();
        let s = set.summary().unwrap();
        assert_eq!(s.count, 5);
        assert_relative_eq!(s.mean, 3.0, epsilon = 1e-12);
        assert_relative_eq!(s.median, 3.0);
        assert_relative_eq!(s.std_dev, 2.0_f64.sqrt(), epsilon = 1e-12);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 5.0);
        assert_eq!(s.range(), 4.0);
        assert_relative_eq!(s.percentiles.p10, 1.4, epsilon = 1e-12);
        assert_relative_eq!(s.percentiles.p75, 4.0);
        assert_eq!(s.percentile(50), Some(s.median));
        assert_eq!(s.percentile(42), None);
    }

    #[test]
    fn test_summary_constant_sample() {
        let set = TerminalPriceSet::from_prices(vec![100.0; 10]).unwrap();
        let s = set.summary().unwrap();
        assert_eq!(s.mean, 100.0);
        assert_eq!(s.std_dev, 0.0);
        assert!(s.percentiles.iter().all(|(_, v)| v == 100.0));
    }

    #[test]
    fn test_from_prices_validation() {
        assert!(TerminalPriceSet::from_prices(Vec::new()).is_err());
        assert!(TerminalPriceSet::from_prices(vec![1.0, f64::NAN]).is_err());
        assert!(TerminalPriceSet::from_prices(vec![1.0, f64::INFINITY]).is_err());
        assert!(TerminalPriceSet::from_prices(vec![1.0, 0.0]).is_err());
        assert!(TerminalPriceSet::default().summary().is_err());
    }

    #[test]
    fn test_extend_rejects_invalid_prices() {
        let mut set = TerminalPriceSet::with_capacity(4);
        set.extend_from_slice(&[1.0, 2.0]).unwrap();
        assert!(set.extend_from_slice(&[3.0, f64::NAN]).is_err());
        assert!(set.extend_from_slice(&[0.0]).is_err());
        assert_eq!(set.as_slice(), &[1.0, 2.0]);
    }

    #[test]
    fn test_percentile_with_nan_does_not_panic() {
        let sorted = [1.0, 2.0, f64::NAN];
        assert_eq!(percentile(&sorted, 0.0), Some(1.0));
        assert!(percentile(&sorted, 75.0).is_some());
        assert!(percentile(&[f64::NAN, f64::NAN], 50.0).is_some());
    }

    #[test]
    fn test_percentiles_iter_order() {
        let set = TerminalPriceSet::from_prices((1..=100).map(f64::from).collect()).unwrap();
        let s = set.summary().unwrap();
        let ranks: Vec<u8> = s.percentiles.iter().map(|(r, _)| r).collect();
        assert_eq!(ranks, PERCENTILE_RANKS.to_vec());
        assert!(s.percentiles.to_array().windows(2).all(|w| w[0] <= w[1]));
    }
}
