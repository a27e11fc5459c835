//! Geometric Brownian Motion price-path simulation with terminal price statistics.
//!
//! The library is split into the simulation core under [`models`] and the
//! pieces that feed it or consume its output ([`config`], [`report`],
//! [`visualisations`]).
//!
//! ```rust
//! use driftwalk::models::{run_batch, SeededNormals, SimulationParameters};
//!
//! let params = SimulationParameters {
//!     initial_price: 100.0,
//!     drift: 0.08,
//!     volatility: 0.2,
//!     horizon_years: 1.0,
//!     steps: 252,
//!     path_count: 50,
//! };
//! let mut normals = SeededNormals::from_seed(7);
//! let batch = run_batch(&params, 4, &mut normals).unwrap();
//!
//! assert_eq!(batch.runs.len(), 4);
//! assert_eq!(batch.terminal_prices.len(), 200);
//! assert!(batch.summary.min <= batch.summary.percentiles.p5);
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod visualisations;

pub use error::SimulationError;
