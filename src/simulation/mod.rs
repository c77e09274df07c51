//! Monte Carlo simulation of plausible future trajectories.
//!
//! Combines a curve model's deterministic mean forecast with residual noise
//! sampled from a fitted [`ResidualForecaster`](crate::residuals::ResidualForecaster).

mod config;
mod engine;
mod source;

pub use config::{SimulationConfig, ZeroMeanPolicy, DEFAULT_STD_FLOOR};
pub use engine::{apply_std_floor, Simulation, SimulationDraw, SimulationEngine};
pub use source::MeanForecastSource;
