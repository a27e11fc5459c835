use statrs::distribution::{ContinuousCDF, Normal};

use super::params::SimulationParameters;
use super::summary::Percentiles;
use crate::error::{Result, SimulationError};

/// Precomputed log-normal increment `exp((μ - σ²/2)Δt + σ√Δt·z)`.
///
/// This is the exact solution of the GBM SDE over one step, so it carries no
/// discretisation bias whatever the step size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GbmIncrement {
    drift_dt: f64,
    vol_sqrt_dt: f64,
}

impl GbmIncrement {
    pub fn new(drift: f64, volatility: f64, time_step: f64) -> Self {
        Self {
            drift_dt: (drift - 0.5 * volatility * volatility) * time_step,
            vol_sqrt_dt: volatility * time_step.sqrt(),
        }
    }

    pub fn from_params(params: &SimulationParameters) -> Self {
        Self::new(params.drift, params.volatility, params.time_step())
    }

    /// Multiplicative factor for a standard-normal draw `z`.
    #[inline]
    pub fn factor(&self, z: f64) -> f64 {
        (self.drift_dt + self.vol_sqrt_dt * z).exp()
    }

    #[inline]
    pub fn apply(&self, price: f64, z: f64) -> f64 {
        price * self.factor(z)
    }
}

/// Closed-form GBM price at time `t` for the given quantile of the driving normal.
pub fn gbm_price(s0: f64, mu: f64, sigma: f64, t: f64, quantile: f64) -> Result<f64> {
    if !(quantile > 0.0 && quantile < 1.0) {
        return Err(SimulationError::Distribution(format!(
            "quantile must lie in (0, 1), got {}",
            quantile
        )));
    }
    let normal =
        Normal::new(0.0, 1.0).map_err(|e| SimulationError::Distribution(e.to_string()))?;
    let z = normal.inverse_cdf(quantile);
    Ok(s0 * ((mu - 0.5 * sigma * sigma) * t + sigma * t.sqrt() * z).exp())
}

/// Percentiles of the exact log-normal terminal distribution.
///
/// Uses [`SimulationParameters::terminal_time`], the time of the last
/// matrix row, so the values line up with simulated terminal prices.
pub fn analytic_percentiles(params: &SimulationParameters) -> Result<Percentiles> {
    params.validate()?;
    let t = params.terminal_time();
    Percentiles::try_from_fn(|rank| {
        gbm_price(
            params.initial_price,
            params.drift,
            params.volatility,
            t,
            f64::from(rank) / 100.0,
        )
    })
}

/// Mean of the terminal distribution, `S₀·e^{μt}`.
pub fn expected_terminal_price(params: &SimulationParameters) -> Result<f64> {
    params.validate()?;
    Ok(params.initial_price * (params.drift * params.terminal_time()).exp())
}
