//! Ordinary least squares residual model.
//!
//! Fits `outcome = b0 + b1*x1 + ... + bk*xk` by solving the normal equations
//! `(X'X) b = X'y` on the design matrix `[1, covariates...]`.

use crate::core::Table;
use crate::error::{ForecastError, Result};
use crate::models::ResidualModel;
use tracing::debug;

/// Relative pivot size below which X'X is treated as singular.
const PIVOT_TOLERANCE: f64 = 1e-10;

/// Coefficients of a fitted linear regression.
///
/// `coefficients[0]` is the intercept; `coefficients[i + 1]` belongs to
/// `covariates[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedRegression {
    coefficients: Vec<f64>,
    covariates: Vec<String>,
}

impl FittedRegression {
    /// Full coefficient vector aligned to `[intercept] + covariates`.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.coefficients[0]
    }

    /// Coefficient for a named covariate.
    pub fn coefficient(&self, covariate: &str) -> Option<f64> {
        self.covariates
            .iter()
            .position(|c| c == covariate)
            .map(|i| self.coefficients[i + 1])
    }

    pub fn covariates(&self) -> &[String] {
        &self.covariates
    }

    /// Evaluate the regression on every row of `rows`.
    pub fn predict(&self, rows: &Table) -> Result<Vec<f64>> {
        let cols: Vec<&[f64]> = self
            .covariates
            .iter()
            .map(|name| rows.column(name))
            .collect::<Result<_>>()?;

        let mut predictions = vec![self.intercept(); rows.nrows()];
        for (col, &beta) in cols.iter().zip(&self.coefficients[1..]) {
            for (pred, &x) in predictions.iter_mut().zip(col.iter()) {
                *pred += beta * x;
            }
        }
        Ok(predictions)
    }
}

/// A basic linear regression for residual statistics.
#[derive(Debug, Clone)]
pub struct LinearResidualModel {
    data: Table,
    outcome: String,
    covariates: Vec<String>,
    fitted: Option<FittedRegression>,
}

impl LinearResidualModel {
    /// Create an unfitted model.
    ///
    /// The outcome must be a single non-empty column name, covariates a
    /// non-empty list, and all of them must be present in `data`.
    pub fn new(data: Table, outcome: &str, covariates: &[String]) -> Result<Self> {
        if outcome.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "outcome column name must not be empty".into(),
            ));
        }
        if covariates.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "at least one covariate is required".into(),
            ));
        }
        if covariates.iter().any(|c| c == outcome) {
            return Err(ForecastError::InvalidParameter(format!(
                "outcome '{}' cannot also be a covariate",
                outcome
            )));
        }

        let mut required = vec![outcome.to_string()];
        required.extend_from_slice(covariates);
        data.require_columns(&required)?;

        Ok(Self {
            data,
            outcome: outcome.to_string(),
            covariates: covariates.to_vec(),
            fitted: None,
        })
    }

    /// Training data as supplied.
    pub fn data(&self) -> &Table {
        &self.data
    }
}

impl ResidualModel for LinearResidualModel {
    fn fit(&mut self) -> Result<()> {
        let mut used = vec![self.outcome.clone()];
        used.extend(self.covariates.iter().cloned());
        let clean = self.data.drop_missing(&used)?;

        let n = clean.nrows();
        if n == 0 {
            return Err(ForecastError::EmptyData);
        }

        let y = clean.column(&self.outcome)?;
        let x_cols: Vec<&[f64]> = self
            .covariates
            .iter()
            .map(|name| clean.column(name))
            .collect::<Result<_>>()?;

        let k = x_cols.len();
        let num_params = k + 1;

        // X'X and X'y with a leading column of ones
        let mut xtx = vec![vec![0.0; num_params]; num_params];
        let mut xty = vec![0.0; num_params];
        let mut row = vec![1.0; num_params];

        for obs in 0..n {
            for j in 0..k {
                row[j + 1] = x_cols[j][obs];
            }
            for i in 0..num_params {
                xty[i] += row[i] * y[obs];
                for j in 0..=i {
                    xtx[i][j] += row[i] * row[j];
                }
            }
        }
        for i in 0..num_params {
            for j in (i + 1)..num_params {
                xtx[i][j] = xtx[j][i];
            }
        }

        let coefficients = solve_symmetric(&xtx, &xty).ok_or(ForecastError::SingularMatrix)?;

        debug!(
            outcome = %self.outcome,
            rows = n,
            dropped = self.data.nrows() - n,
            coefficients = ?coefficients,
            "fitted linear residual model"
        );

        self.fitted = Some(FittedRegression {
            coefficients,
            covariates: self.covariates.clone(),
        });
        Ok(())
    }

    fn predict(&self, rows: &Table) -> Result<Vec<f64>> {
        self.fitted
            .as_ref()
            .ok_or(ForecastError::FitRequired)?
            .predict(rows)
    }

    fn outcome(&self) -> &str {
        &self.outcome
    }

    fn covariates(&self) -> &[String] {
        &self.covariates
    }

    fn fitted(&self) -> Option<&FittedRegression> {
        self.fitted.as_ref()
    }

    fn name(&self) -> &str {
        "Linear"
    }
}

/// Solve a symmetric positive definite system using Cholesky decomposition.
///
/// Returns `None` when a pivot collapses relative to its diagonal entry,
/// i.e. when `a` is singular up to rounding.
fn solve_symmetric(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n {
        return None;
    }

    // A = L @ L'
    let mut l = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }

            if i == j {
                if !sum.is_finite() || sum <= PIVOT_TOLERANCE * a[i][i].abs() {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    // L @ y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    // L' @ x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    Some(x)
}
