//! Error types for the anofox-curvefit library.

use thiserror::Error;

/// Result type alias for residual forecasting operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Broad classification of a [`ForecastError`].
///
/// None of these are retried inside the library; each is a deterministic
/// function of the inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad inputs or settings supplied by the caller.
    Configuration,
    /// Ill-posed numerical problem (e.g. a singular design matrix).
    Numerical,
    /// A requested entity is absent from the data.
    NotFound,
}

/// Errors that can occur during residual fitting and simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Requested residual model type is not implemented.
    #[error("unknown residual model type: {0}")]
    UnsupportedModel(String),

    /// A required column is not present in a table.
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Model has not been fitted yet.
    #[error("model must be fitted before prediction")]
    FitRequired,

    /// Normal equations cannot be solved.
    #[error("design matrix is singular or nearly singular")]
    SingularMatrix,

    /// Group is absent from the historical data.
    #[error("group not found: {0}")]
    GroupNotFound(String),

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    ComputationError(String),
}

impl ForecastError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ForecastError::SingularMatrix | ForecastError::ComputationError(_) => {
                ErrorKind::Numerical
            }
            ForecastError::GroupNotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::Configuration,
        }
    }

    /// Whether this is a configuration error.
    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }
}
