//! Translation between the fit space and the comparison space of a quantity.
//!
//! A curve model is usually fit on a transformed scale (e.g. log) while its
//! outputs are reported on the raw scale. Every [`Space`] here is a Box-Cox
//! power transform of the linear scale, so any pair can be bridged by
//! inverting the source transform and applying the target one.

use crate::error::{ForecastError, Result};
use std::fmt;

const LAMBDA_TOLERANCE: f64 = 1e-10;

/// Representation of a modelled quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Space {
    /// Raw scale.
    Linear,
    /// Natural log of the raw scale.
    Log,
    /// Box-Cox transform of the raw scale with the given lambda.
    BoxCox { lambda: f64 },
}

impl Space {
    /// Map a raw-scale value into this space.
    ///
    /// Values outside the transform's domain map to NaN.
    pub fn forward(&self, x: f64) -> f64 {
        match *self {
            Space::Linear => x,
            Space::Log => boxcox_value(x, 0.0),
            Space::BoxCox { lambda } => boxcox_value(x, lambda),
        }
    }

    /// Map a value in this space back to the raw scale.
    pub fn inverse(&self, y: f64) -> f64 {
        match *self {
            Space::Linear => y,
            Space::Log => inv_boxcox_value(y, 0.0),
            Space::BoxCox { lambda } => inv_boxcox_value(y, lambda),
        }
    }

    fn validate(&self) -> Result<()> {
        match *self {
            Space::BoxCox { lambda } if !lambda.is_finite() => Err(ForecastError::InvalidParameter(
                format!("Box-Cox lambda must be finite, got {}", lambda),
            )),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Space::Linear => write!(f, "linear"),
            Space::Log => write!(f, "log"),
            Space::BoxCox { lambda } => write!(f, "boxcox({})", lambda),
        }
    }
}

/// Elementwise mapping of values between two spaces.
pub trait SpaceTranslator {
    /// Translate `values` from `source` into `target`.
    fn translate(&self, values: &[f64], source: Space, target: Space) -> Result<Vec<f64>>;
}

/// Translator built on the Box-Cox power family.
#[derive(Debug, Clone, Copy, Default)]
pub struct PowerTranslator;

impl PowerTranslator {
    pub fn new() -> Self {
        Self
    }
}

impl SpaceTranslator for PowerTranslator {
    fn translate(&self, values: &[f64], source: Space, target: Space) -> Result<Vec<f64>> {
        source.validate()?;
        target.validate()?;

        if source == target {
            return Ok(values.to_vec());
        }

        Ok(values
            .iter()
            .map(|&v| target.forward(source.inverse(v)))
            .collect())
    }
}

/// Box-Cox transform of a single value.
///
/// For lambda != 0: y = (x^lambda - 1) / lambda
/// For lambda == 0: y = ln(x)
fn boxcox_value(x: f64, lambda: f64) -> f64 {
    if x <= 0.0 {
        f64::NAN
    } else if lambda.abs() < LAMBDA_TOLERANCE {
        x.ln()
    } else {
        (x.powf(lambda) - 1.0) / lambda
    }
}

/// Inverse Box-Cox transform of a single value.
///
/// For lambda != 0: x = (lambda * y + 1)^(1/lambda)
/// For lambda == 0: x = exp(y)
fn inv_boxcox_value(y: f64, lambda: f64) -> f64 {
    if lambda.abs() < LAMBDA_TOLERANCE {
        y.exp()
    } else {
        let val = lambda * y + 1.0;
        if val <= 0.0 {
            f64::NAN
        } else {
            val.powf(1.0 / lambda)
        }
    }
}
