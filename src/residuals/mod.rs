//! Residual statistics and their forecasting.
//!
//! # Example
//!
//! ```
//! use anofox_curvefit::core::Table;
//! use anofox_curvefit::residuals::{ResidualForecaster, AMOUNT_COLUMN, DISTANCE_COLUMN};
//!
//! let residuals = Table::from_columns(vec![
//!     (DISTANCE_COLUMN, vec![1.0, 2.0, 1.0, 2.0]),
//!     (AMOUNT_COLUMN, vec![5.0, 5.0, 10.0, 10.0]),
//!     ("residual_mean", vec![0.1, 0.3, 0.5, 0.7]),
//!     ("residual_std", vec![0.2, 0.4, 0.6, 0.8]),
//! ])
//! .unwrap();
//!
//! let mut forecaster = ResidualForecaster::new();
//! forecaster
//!     .fit_residuals(
//!         &residuals,
//!         "residual_mean",
//!         "residual_std",
//!         &[DISTANCE_COLUMN.to_string(), AMOUNT_COLUMN.to_string()],
//!         "linear",
//!     )
//!     .unwrap();
//!
//! let grid = forecaster.predict(&[1.0, 2.0, 3.0], &[10.0]).unwrap();
//! assert_eq!(grid.len(), 3);
//! ```

mod forecaster;
mod summary;

pub use forecaster::{PredictionGrid, ResidualForecaster};
pub use summary::{summarize_residuals, RawResidual};

/// Column holding the number of steps beyond the last observation.
pub const DISTANCE_COLUMN: &str = "distance_into_future";

/// Column holding the number of observations seen when forecasting.
pub const AMOUNT_COLUMN: &str = "amount_of_data_seen";
