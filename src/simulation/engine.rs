//! Monte Carlo simulation of future trajectories from forecast residuals.
//!
//! A simulated trajectory is the deterministic mean forecast of the curve
//! model perturbed by relative noise drawn from the residual forecaster:
//!
//! ```text
//! value[h] = mean[h] + mean[h] * e[h],   e[h] ~ N(mu[h], max(sigma[h], floor))
//! ```
//!
//! where `mu` and `sigma` are the residual mean and std predicted for
//! distance `h` given the amount of data the group currently has.

use crate::core::Forecast;
use crate::error::{ForecastError, Result};
use crate::residuals::{PredictionGrid, ResidualForecaster};
use crate::simulation::{MeanForecastSource, SimulationConfig, ZeroMeanPolicy};
use crate::transform::{PowerTranslator, SpaceTranslator};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use statrs::statistics::{Data, OrderStatistics};
use tracing::{info, warn};

/// One simulated trajectory: observed history followed by simulated points.
///
/// All vectors have the same length. `simulated[i]` is false for history rows
/// and true for forecast rows.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationDraw {
    pub group: String,
    pub times: Vec<f64>,
    /// Values in comparison space.
    pub compare_values: Vec<f64>,
    /// The same values translated into fit space.
    pub fit_values: Vec<f64>,
    pub simulated: Vec<bool>,
}

impl SimulationDraw {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Simulated flags as integers (0 = observed, 1 = simulated).
    pub fn simulated_flags(&self) -> Vec<u8> {
        self.simulated.iter().map(|&s| u8::from(s)).collect()
    }

    /// Number of simulated rows.
    pub fn num_simulated(&self) -> usize {
        self.simulated.iter().filter(|&&s| s).count()
    }

    /// Comparison-space values of the simulated rows only.
    pub fn simulated_values(&self) -> Vec<f64> {
        self.compare_values
            .iter()
            .zip(&self.simulated)
            .filter(|(_, s)| **s)
            .map(|(&v, _)| v)
            .collect()
    }
}

/// Result of [`SimulationEngine::simulate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    pub group: String,
    /// Times the simulation extends to, one per horizon step.
    pub forecast_times: Vec<f64>,
    /// Deterministic mean forecast in the source's predict space.
    pub mean_forecast: Vec<f64>,
    /// Residual mean/std predicted for each horizon step.
    pub residuals: PredictionGrid,
    /// Standard deviation actually used for sampling, after the floor.
    pub effective_std: Vec<f64>,
    pub draws: Vec<SimulationDraw>,
}

impl Simulation {
    pub fn n_simulations(&self) -> usize {
        self.draws.len()
    }

    pub fn horizon(&self) -> usize {
        self.forecast_times.len()
    }

    /// Simulated comparison values as `draws x horizon`.
    pub fn forecast_matrix(&self) -> Vec<Vec<f64>> {
        self.draws.iter().map(|d| d.simulated_values()).collect()
    }

    /// Median and empirical quantile band of the simulated values per step.
    ///
    /// Non-finite simulated values are ignored; a step with no finite values
    /// yields NaN.
    pub fn intervals(&self, level: f64) -> Result<Forecast> {
        if !(level > 0.0 && level < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "interval level must be in (0, 1), got {}",
                level
            )));
        }

        let alpha = (1.0 - level) / 2.0;
        let matrix = self.forecast_matrix();
        let mut point = Vec::with_capacity(self.horizon());
        let mut lower = Vec::with_capacity(self.horizon());
        let mut upper = Vec::with_capacity(self.horizon());

        for h in 0..self.horizon() {
            let samples: Vec<f64> = matrix
                .iter()
                .map(|row| row[h])
                .filter(|v| v.is_finite())
                .collect();

            if samples.is_empty() {
                point.push(f64::NAN);
                lower.push(f64::NAN);
                upper.push(f64::NAN);
                continue;
            }

            let mut data = Data::new(samples);
            point.push(data.quantile(0.5));
            lower.push(data.quantile(alpha));
            upper.push(data.quantile(1.0 - alpha));
        }

        Ok(Forecast::from_values_with_intervals(
            self.forecast_times.clone(),
            point,
            lower,
            upper,
            level,
        ))
    }
}

/// Simulates future trajectories for a group from a fitted residual forecaster.
///
/// The engine borrows the forecaster and holds no model state of its own;
/// every call produces independently owned output.
///
/// # Example
/// ```ignore
/// use anofox_curvefit::simulation::{SimulationConfig, SimulationEngine};
///
/// let engine = SimulationEngine::new(&forecaster);
/// let config = SimulationConfig::new(14, 500).with_seed(42);
/// let simulation = engine.simulate(&curve_model, "Utah", &config)?;
/// let bands = simulation.intervals(0.95)?;
/// ```
#[derive(Debug)]
pub struct SimulationEngine<'a, T = PowerTranslator> {
    forecaster: &'a ResidualForecaster,
    translator: T,
}

impl<'a> SimulationEngine<'a, PowerTranslator> {
    /// Create an engine translating spaces with [`PowerTranslator`].
    pub fn new(forecaster: &'a ResidualForecaster) -> Self {
        Self::with_translator(forecaster, PowerTranslator)
    }
}

impl<'a, T: SpaceTranslator> SimulationEngine<'a, T> {
    pub fn with_translator(forecaster: &'a ResidualForecaster, translator: T) -> Self {
        Self {
            forecaster,
            translator,
        }
    }

    /// Simulate with a generator seeded from `config.seed`, or from entropy
    /// when no seed is set.
    pub fn simulate<S>(
        &self,
        source: &S,
        group: &str,
        config: &SimulationConfig,
    ) -> Result<Simulation>
    where
        S: MeanForecastSource + ?Sized,
    {
        let mut rng: StdRng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.simulate_with_rng(source, group, config, &mut rng)
    }

    /// Simulate drawing from `rng`.
    ///
    /// Successive calls with the same generator continue its stream; pass
    /// a freshly seeded generator to reproduce a result.
    pub fn simulate_with_rng<S, R>(
        &self,
        source: &S,
        group: &str,
        config: &SimulationConfig,
        rng: &mut R,
    ) -> Result<Simulation>
    where
        S: MeanForecastSource + ?Sized,
        R: Rng + ?Sized,
    {
        config.validate()?;

        let history = source.data().group(group)?;
        let max_time = history
            .max_observed_time()
            .ok_or_else(|| ForecastError::GroupNotFound(group.to_string()))?;
        let num_observed = history.num_observed();
        let (obs_times, obs_values) = history.observed();

        info!(
            group,
            horizon = config.horizon,
            simulations = config.n_simulations,
            observed = num_observed,
            "simulating residual trajectories"
        );

        let offsets: Vec<f64> = (1..=config.horizon).map(|h| h as f64).collect();
        let forecast_times: Vec<f64> = offsets.iter().map(|h| max_time + h).collect();

        let residuals = self
            .forecaster
            .predict(&offsets, &[num_observed as f64])?;

        let mean_forecast = source.predict(&forecast_times, source.predict_space(), group)?;
        if mean_forecast.len() != config.horizon {
            return Err(ForecastError::DimensionMismatch {
                expected: config.horizon,
                got: mean_forecast.len(),
            });
        }
        let mean_compare = self.translator.translate(
            &mean_forecast,
            source.predict_space(),
            source.compare_space(),
        )?;

        if let Some(bad) = mean_compare.iter().find(|m| !m.is_finite()) {
            return Err(ForecastError::ComputationError(format!(
                "mean forecast for group '{}' is not finite: {}",
                group, bad
            )));
        }
        if config.zero_mean_policy == ZeroMeanPolicy::Error && mean_compare.contains(&0.0) {
            return Err(ForecastError::ComputationError(format!(
                "mean forecast for group '{}' is zero; relative noise is undefined",
                group
            )));
        }

        let effective_std = apply_std_floor(&residuals.residual_std, config.std_floor);
        let floored = residuals
            .residual_std
            .iter()
            .filter(|s| s.is_nan() || **s < config.std_floor)
            .count();
        if floored > 0 {
            warn!(
                group,
                floored,
                floor = config.std_floor,
                "residual std raised to floor"
            );
        }

        let noise: Vec<Normal<f64>> = residuals
            .residual_mean
            .iter()
            .zip(&effective_std)
            .map(|(&mu, &sigma)| {
                if !mu.is_finite() || !sigma.is_finite() {
                    return Err(ForecastError::ComputationError(format!(
                        "residual distribution N({}, {}) is not finite",
                        mu, sigma
                    )));
                }
                Normal::new(mu, sigma).map_err(|e| ForecastError::ComputationError(e.to_string()))
            })
            .collect::<Result<_>>()?;

        let mut times = obs_times;
        times.extend_from_slice(&forecast_times);
        let mut simulated = vec![false; obs_values.len()];
        simulated.extend(std::iter::repeat(true).take(config.horizon));

        let mut draws = Vec::with_capacity(config.n_simulations);
        let mut non_finite = 0;

        for _ in 0..config.n_simulations {
            let mut compare_values = obs_values.clone();
            compare_values.extend(mean_compare.iter().zip(&noise).map(|(&mean, dist)| {
                let e = dist.sample(&mut *rng);
                if mean == 0.0 {
                    e
                } else {
                    mean + mean * e
                }
            }));

            let fit_values = self.translator.translate(
                &compare_values,
                source.compare_space(),
                source.fit_space(),
            )?;
            non_finite += fit_values.iter().filter(|v| !v.is_finite()).count();

            draws.push(SimulationDraw {
                group: group.to_string(),
                times: times.clone(),
                compare_values,
                fit_values,
                simulated: simulated.clone(),
            });
        }

        if non_finite > 0 {
            warn!(
                group,
                non_finite,
                space = %source.fit_space(),
                "simulated values fall outside the fit space"
            );
        }

        Ok(Simulation {
            group: group.to_string(),
            forecast_times,
            mean_forecast,
            residuals,
            effective_std,
            draws,
        })
    }
}

/// Elementwise `max(std, floor)`. NaN predictions fall back to the floor.
pub fn apply_std_floor(predicted_std: &[f64], floor: f64) -> Vec<f64> {
    predicted_std.iter().map(|&s| s.max(floor)).collect()
}
