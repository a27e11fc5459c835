//! Error types for the simulation core.

use thiserror::Error;

/// Errors raised by path simulation, batch aggregation and the analytic helpers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// A simulation input violated its precondition.
    ///
    /// Raised before any random draw is consumed or any matrix is allocated.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the violation.
        reason: String,
    },

    /// The closed-form distribution helpers could not be evaluated.
    #[error("Distribution error: {0}")]
    Distribution(String),
}

impl SimulationError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;
