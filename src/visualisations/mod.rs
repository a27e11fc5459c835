//! PNG charts of a finished batch.

mod charts;

pub use charts::{plot_price_paths, plot_terminal_histogram};
