//! Forecast result structure for holding predictions and bands.

/// A univariate forecast over a set of future times.
///
/// Point predictions are always present; lower/upper bands are only set when
/// the forecast was summarised from simulated draws.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forecast {
    times: Vec<f64>,
    point: Vec<f64>,
    lower: Option<Vec<f64>>,
    upper: Option<Vec<f64>>,
    level: Option<f64>,
}

impl Forecast {
    /// Create an empty forecast.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a forecast from point predictions.
    pub fn from_values(times: Vec<f64>, values: Vec<f64>) -> Self {
        Self {
            times,
            point: values,
            ..Default::default()
        }
    }

    /// Create a forecast with bands at the given coverage level.
    pub fn from_values_with_intervals(
        times: Vec<f64>,
        values: Vec<f64>,
        lower: Vec<f64>,
        upper: Vec<f64>,
        level: f64,
    ) -> Self {
        Self {
            times,
            point: values,
            lower: Some(lower),
            upper: Some(upper),
            level: Some(level),
        }
    }

    /// Get the forecast horizon (number of steps).
    pub fn horizon(&self) -> usize {
        self.point.len()
    }

    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Point predictions.
    pub fn primary(&self) -> &[f64] {
        &self.point
    }

    pub fn has_lower(&self) -> bool {
        self.lower.is_some()
    }

    pub fn has_upper(&self) -> bool {
        self.upper.is_some()
    }

    pub fn lower(&self) -> Option<&[f64]> {
        self.lower.as_deref()
    }

    pub fn upper(&self) -> Option<&[f64]> {
        self.upper.as_deref()
    }

    /// Coverage level of the bands, if any.
    pub fn level(&self) -> Option<f64> {
        self.level
    }
}
