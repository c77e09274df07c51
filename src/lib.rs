//! # anofox-curvefit
//!
//! Residual forecasting and trajectory simulation for fitted curve models.
//!
//! Given the empirical residuals of a curve model (how far off it was, by how
//! far into the future it predicted and how much data it had seen), this
//! library regresses residual mean and spread on those two quantities and
//! uses the result to draw Monte Carlo trajectories around the model's mean
//! forecast.
//!
//! Logging goes through `tracing`; install a subscriber to see it.

// Allow some clippy warnings for cleaner code in specific cases
#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod error;
pub mod models;
pub mod residuals;
pub mod simulation;
pub mod transform;

pub use error::{ErrorKind, ForecastError, Result};

pub mod prelude {
    pub use crate::core::{Forecast, ObservationData, Table};
    pub use crate::error::{ErrorKind, ForecastError, Result};
    pub use crate::models::{ResidualModel, ResidualModelType};
    pub use crate::residuals::{
        summarize_residuals, PredictionGrid, RawResidual, ResidualForecaster, AMOUNT_COLUMN,
        DISTANCE_COLUMN,
    };
    pub use crate::simulation::{
        MeanForecastSource, Simulation, SimulationConfig, SimulationDraw, SimulationEngine,
        ZeroMeanPolicy,
    };
    pub use crate::transform::{PowerTranslator, Space, SpaceTranslator};
}
