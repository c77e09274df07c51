//! ResidualModel trait defining the common interface for residual regressions.

use crate::core::Table;
use crate::error::{ForecastError, Result};
use crate::models::linear::{FittedRegression, LinearResidualModel};
use std::fmt;
use std::str::FromStr;

/// Common interface for regressions fit to residual statistics.
///
/// A model is constructed around its training table, outcome column and
/// covariate columns, and learns its coefficients on [`fit`](Self::fit).
/// This trait is object-safe and can be used with `Box<dyn ResidualModel>`.
pub trait ResidualModel {
    /// Fit the model to its stored training data.
    fn fit(&mut self) -> Result<()>;

    /// Predict the outcome for each row of `rows`.
    ///
    /// `rows` must contain every covariate column the model was built with.
    fn predict(&self, rows: &Table) -> Result<Vec<f64>>;

    /// Name of the outcome column.
    fn outcome(&self) -> &str;

    /// Covariate column names in design-matrix order.
    fn covariates(&self) -> &[String];

    /// The fitted coefficients, if [`fit`](Self::fit) has succeeded.
    fn fitted(&self) -> Option<&FittedRegression>;

    /// Get the model name.
    fn name(&self) -> &str;

    /// Check if the model has been fitted.
    fn is_fitted(&self) -> bool {
        self.fitted().is_some()
    }
}

/// Type alias for boxed residual model trait objects.
pub type BoxedResidualModel = Box<dyn ResidualModel>;

/// Named residual regression strategies.
///
/// # Example
///
/// ```
/// use anofox_curvefit::models::ResidualModelType;
///
/// let kind: ResidualModelType = "linear".parse().unwrap();
/// assert_eq!(kind, ResidualModelType::Linear);
/// assert!("robust".parse::<ResidualModelType>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResidualModelType {
    /// Ordinary least squares with an intercept.
    #[default]
    Linear,
}

impl ResidualModelType {
    /// Construct an unfitted model of this type.
    pub fn build(
        &self,
        data: Table,
        outcome: &str,
        covariates: &[String],
    ) -> Result<BoxedResidualModel> {
        match self {
            ResidualModelType::Linear => Ok(Box::new(LinearResidualModel::new(
                data, outcome, covariates,
            )?)),
        }
    }
}

impl FromStr for ResidualModelType {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "linear" => Ok(ResidualModelType::Linear),
            other => Err(ForecastError::UnsupportedModel(other.to_string())),
        }
    }
}

impl fmt::Display for ResidualModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResidualModelType::Linear => write!(f, "linear"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::from_columns(vec![("x", vec![1.0, 2.0, 3.0]), ("y", vec![3.0, 5.0, 7.0])])
            .unwrap()
    }

    #[test]
    fn parse_known_and_unknown_types() {
        assert_eq!(
            "linear".parse::<ResidualModelType>(),
            Ok(ResidualModelType::Linear)
        );
        assert_eq!(
            "unsupported".parse::<ResidualModelType>(),
            Err(ForecastError::UnsupportedModel("unsupported".to_string()))
        );
        assert_eq!(ResidualModelType::Linear.to_string(), "linear");
    }

    #[test]
    fn boxed_model_starts_unfitted() {
        let model = ResidualModelType::Linear
            .build(table(), "y", &["x".to_string()])
            .unwrap();
        assert_eq!(model.name(), "Linear");
        assert_eq!(model.outcome(), "y");
        assert_eq!(model.covariates(), &["x".to_string()]);
        assert!(!model.is_fitted());
    }

    #[test]
    fn boxed_model_fits_and_predicts() {
        let mut model: BoxedResidualModel = ResidualModelType::Linear
            .build(table(), "y", &["x".to_string()])
            .unwrap();
        model.fit().unwrap();
        assert!(model.is_fitted());

        let rows = Table::from_columns(vec![("x", vec![10.0])]).unwrap();
        let pred = model.predict(&rows).unwrap();
        assert!((pred[0] - 21.0).abs() < 1e-9);
    }
}
