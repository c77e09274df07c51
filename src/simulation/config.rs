//! Configuration for Monte Carlo trajectory simulation.

use crate::error::{ForecastError, Result};

/// Default minimum standard deviation used when sampling residual noise.
pub const DEFAULT_STD_FLOOR: f64 = 1e-3;

/// How to combine noise with a mean forecast that is exactly zero.
///
/// The relative combination `mean + mean * noise` collapses to zero whenever
/// the mean is zero, so such points need an explicit policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroMeanPolicy {
    /// Reject the simulation with a computation error.
    #[default]
    Error,
    /// Use the sampled noise as an absolute value at zero-mean points.
    Additive,
}

/// Configuration for [`SimulationEngine`](crate::simulation::SimulationEngine).
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Number of steps to simulate beyond the last observation.
    pub horizon: usize,
    /// Number of simulated trajectories.
    pub n_simulations: usize,
    /// Floor applied to the predicted residual standard deviation.
    pub std_floor: f64,
    /// Random seed for reproducibility (None for random).
    pub seed: Option<u64>,
    pub zero_mean_policy: ZeroMeanPolicy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            horizon: 1,
            n_simulations: 1000,
            std_floor: DEFAULT_STD_FLOOR,
            seed: None,
            zero_mean_policy: ZeroMeanPolicy::default(),
        }
    }
}

impl SimulationConfig {
    /// Create a config for `n_simulations` trajectories `horizon` steps out.
    pub fn new(horizon: usize, n_simulations: usize) -> Self {
        Self {
            horizon,
            n_simulations,
            ..Default::default()
        }
    }

    pub fn with_std_floor(mut self, std_floor: f64) -> Self {
        self.std_floor = std_floor;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_zero_mean_policy(mut self, policy: ZeroMeanPolicy) -> Self {
        self.zero_mean_policy = policy;
        self
    }

    /// Reject settings that cannot produce a simulation.
    pub fn validate(&self) -> Result<()> {
        if self.horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "forecast horizon must be positive".into(),
            ));
        }
        if self.n_simulations == 0 {
            return Err(ForecastError::InvalidParameter(
                "number of simulations must be positive".into(),
            ));
        }
        if !self.std_floor.is_finite() || self.std_floor < 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "std floor must be finite and non-negative, got {}",
                self.std_floor
            )));
        }
        Ok(())
    }
}
