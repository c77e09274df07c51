//! Regression models fit to residual statistics.

mod traits;

pub mod linear;

pub use linear::{FittedRegression, LinearResidualModel};
pub use traits::{BoxedResidualModel, ResidualModel, ResidualModelType};
