use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};

/// Standard deviations of cumulative driving noise the log-price check covers.
const NOISE_SIGMAS: f64 = 40.0;

/// Inputs of one GBM simulation run.
///
/// Fields are public so callers can build the value directly; every entry
/// point of the core calls [`SimulationParameters::validate`] before it
/// touches the random stream.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Starting asset value.
    pub initial_price: f64,
    /// Annualised expected return (decimal).
    pub drift: f64,
    /// Annualised volatility (decimal).
    pub volatility: f64,
    /// Time horizon in years.
    pub horizon_years: f64,
    /// Number of rows in each price matrix.
    pub steps: usize,
    /// Independent paths per run.
    pub path_count: usize,
}

impl SimulationParameters {
    /// Length of one time increment, `horizon_years / steps`.
    #[inline]
    pub fn time_step(&self) -> f64 {
        self.horizon_years / self.steps as f64
    }

    /// Time of the last matrix row.
    ///
    /// Row 0 sits at t = 0 and each of the remaining `steps - 1` rows adds one
    /// increment, so this is `horizon_years · (steps - 1) / steps`.
    #[inline]
    pub fn terminal_time(&self) -> f64 {
        self.time_step() * self.steps.saturating_sub(1) as f64
    }

    /// Checks every invariant, reporting the first one violated.
    pub fn validate(&self) -> Result<()> {
        if !(self.initial_price.is_finite() && self.initial_price > 0.0) {
            return Err(SimulationError::invalid(
                "initial_price",
                format!("must be positive and finite, got {}", self.initial_price),
            ));
        }
        if !self.drift.is_finite() {
            return Err(SimulationError::invalid(
                "drift",
                format!("must be finite, got {}", self.drift),
            ));
        }
        if !(self.volatility.is_finite() && self.volatility >= 0.0) {
            return Err(SimulationError::invalid(
                "volatility",
                format!("must be non-negative and finite, got {}", self.volatility),
            ));
        }
        if !(self.horizon_years.is_finite() && self.horizon_years > 0.0) {
            return Err(SimulationError::invalid(
                "horizon_years",
                format!("must be positive and finite, got {}", self.horizon_years),
            ));
        }
        if self.steps == 0 {
            return Err(SimulationError::invalid("steps", "must be at least 1, got 0"));
        }
        if self.path_count == 0 {
            return Err(SimulationError::invalid(
                "path_count",
                "must be at least 1, got 0",
            ));
        }
        self.check_log_price_range()
    }

    /// Rejects inputs whose prices could leave the positive, finite `f64` range.
    ///
    /// The last row has the widest log-price spread: `|μ - σ²/2|·t` from the
    /// drift plus `σ·√t` per standard deviation of noise. The closed-form mean
    /// `S₀·e^{μt}` must also stay finite.
    fn check_log_price_range(&self) -> Result<()> {
        if self.steps == 1 {
            return Ok(());
        }
        let t = self.terminal_time();
        let drift_spread = ((self.drift - 0.5 * self.volatility * self.volatility) * t).abs();
        let noise_spread = NOISE_SIGMAS * self.volatility * t.sqrt();
        let spread = drift_spread + noise_spread;
        let log_price = self.initial_price.ln();

        let upper = log_price + spread.max(self.drift * t);
        let lower = log_price - spread;
        if upper <= f64::MAX.ln() && lower >= f64::MIN_POSITIVE.ln() {
            return Ok(());
        }
        let name = if noise_spread >= drift_spread {
            "volatility"
        } else {
            "drift"
        };
        Err(SimulationError::invalid(
            name,
            format!(
                "log-price range [{:.1}, {:.1}] over {} years leaves the representable range",
                lower, upper, t
            ),
        ))
    }
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            initial_price: 100.0,
            drift: 0.08,
            volatility: 0.2,
            horizon_years: 1.0,
            steps: 252,
            path_count: 50,
        }
    }
}
