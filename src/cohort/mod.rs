//! Per-individual simulation inputs and batch loading

mod data;
pub mod loader;

pub use data::{Sex, SimulationParameters, QUANTILE_KEYS, MEDIAN_QUANTILE, MIN_OPTIMISM, MAX_OPTIMISM};
pub use loader::{load_parameters, load_parameters_from_reader};
