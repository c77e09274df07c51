//! Regression of residual mean and spread on forecast distance and data volume.
//!
//! The residual forecaster learns how far off a curve model tends to be as a
//! function of how far into the future it predicts and how many observations it
//! had seen, then evaluates that relationship over a grid of both.

use crate::core::Table;
use crate::error::{ForecastError, Result};
use crate::models::{BoxedResidualModel, ResidualModel, ResidualModelType};
use crate::residuals::{AMOUNT_COLUMN, DISTANCE_COLUMN};
use std::fmt;
use tracing::debug;

/// Predicted residual statistics for every combination of forecast distance
/// and amount of data.
///
/// Rows follow Cartesian-product order: distances vary slowest, amounts
/// fastest. No sorting is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionGrid {
    pub distance_into_future: Vec<f64>,
    pub amount_of_data_seen: Vec<f64>,
    pub residual_mean: Vec<f64>,
    pub residual_std: Vec<f64>,
}

impl PredictionGrid {
    /// Number of grid rows.
    pub fn len(&self) -> usize {
        self.distance_into_future.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distance_into_future.is_empty()
    }

    /// Grid as a table with the input and predicted columns.
    pub fn to_table(&self) -> Result<Table> {
        Table::from_columns(vec![
            (DISTANCE_COLUMN, self.distance_into_future.clone()),
            (AMOUNT_COLUMN, self.amount_of_data_seen.clone()),
            ("residual_mean", self.residual_mean.clone()),
            ("residual_std", self.residual_std.clone()),
        ])
    }
}

/// Forecasts residual mean and standard deviation out into the future.
#[derive(Default)]
pub struct ResidualForecaster {
    mean_residual_model: Option<BoxedResidualModel>,
    std_residual_model: Option<BoxedResidualModel>,
}

impl ResidualForecaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit one regression for the residual mean and one for the residual std.
    ///
    /// Both regressions share `covariates` and `residual_data`. `model_type` is
    /// resolved before anything is built, and the forecaster is only updated
    /// once both fits have succeeded.
    pub fn fit_residuals(
        &mut self,
        residual_data: &Table,
        mean_column: &str,
        std_column: &str,
        covariates: &[String],
        model_type: &str,
    ) -> Result<()> {
        let model_type: ResidualModelType = model_type.parse()?;

        let std_values = residual_data.column(std_column)?;
        if std_values.iter().any(|&s| s < 0.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "column '{}' contains negative standard deviations",
                std_column
            )));
        }

        let mut mean_model = model_type.build(residual_data.clone(), mean_column, covariates)?;
        let mut std_model = model_type.build(residual_data.clone(), std_column, covariates)?;

        mean_model.fit()?;
        std_model.fit()?;

        debug!(
            model = %model_type,
            rows = residual_data.nrows(),
            covariates = ?covariates,
            "fitted residual mean and std models"
        );

        self.mean_residual_model = Some(mean_model);
        self.std_residual_model = Some(std_model);
        Ok(())
    }

    /// Predict residual mean and std for all combinations of
    /// `distances_into_future` and `amounts_of_data`.
    pub fn predict(
        &self,
        distances_into_future: &[f64],
        amounts_of_data: &[f64],
    ) -> Result<PredictionGrid> {
        let (mean_model, std_model) = self.models()?;

        if distances_into_future.is_empty() || amounts_of_data.is_empty() {
            return Err(ForecastError::EmptyData);
        }

        let n = distances_into_future.len() * amounts_of_data.len();
        let mut distance = Vec::with_capacity(n);
        let mut amount = Vec::with_capacity(n);
        for &d in distances_into_future {
            for &a in amounts_of_data {
                distance.push(d);
                amount.push(a);
            }
        }

        let rows = Table::from_columns(vec![
            (DISTANCE_COLUMN, distance),
            (AMOUNT_COLUMN, amount),
        ])?;

        let residual_mean = mean_model.predict(&rows)?;
        let residual_std = std_model.predict(&rows)?;

        debug!(rows = n, "predicted residual grid");

        Ok(PredictionGrid {
            distance_into_future: rows.column(DISTANCE_COLUMN)?.to_vec(),
            amount_of_data_seen: rows.column(AMOUNT_COLUMN)?.to_vec(),
            residual_mean,
            residual_std,
        })
    }

    /// Check if both residual regressions have been fitted.
    pub fn is_fitted(&self) -> bool {
        self.mean_residual_model.is_some() && self.std_residual_model.is_some()
    }

    /// Regression for the residual mean.
    pub fn mean_model(&self) -> Option<&dyn ResidualModel> {
        self.mean_residual_model.as_deref()
    }

    /// Regression for the residual standard deviation.
    pub fn std_model(&self) -> Option<&dyn ResidualModel> {
        self.std_residual_model.as_deref()
    }

    fn models(&self) -> Result<(&dyn ResidualModel, &dyn ResidualModel)> {
        match (self.mean_model(), self.std_model()) {
            (Some(mean), Some(std)) => Ok((mean, std)),
            _ => Err(ForecastError::FitRequired),
        }
    }
}

impl fmt::Debug for ResidualForecaster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResidualForecaster")
            .field("mean_residual_model", &self.mean_model().and_then(|m| m.fitted()))
            .field("std_residual_model", &self.std_model().and_then(|m| m.fitted()))
            .finish()
    }
}
