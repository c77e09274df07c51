//! Interface to the curve model that supplies the deterministic mean forecast.

use crate::core::ObservationData;
use crate::error::Result;
use crate::transform::Space;

/// A fitted curve model able to forecast the mean trajectory of a group.
///
/// The residual simulation only needs the model's historical data and its
/// point predictions; how the curve is fit is up to the implementor.
pub trait MeanForecastSource {
    /// Historical observations, one row per (group, time).
    fn data(&self) -> &ObservationData;

    /// Mean trajectory for `group` at `times`, expressed in `space`.
    fn predict(&self, times: &[f64], space: Space, group: &str) -> Result<Vec<f64>>;

    /// Space the model natively predicts in.
    fn predict_space(&self) -> Space;

    /// Space the model is fit in.
    fn fit_space(&self) -> Space;

    /// Space observations are compared in.
    fn compare_space(&self) -> Space;
}
