//! Integration tests for residual forecasting and trajectory simulation.
//!
//! A logistic curve model stands in for the external curve fit. It predicts
//! in log space and compares in linear space, so every simulation crosses
//! the space translation twice.

use anofox_curvefit::core::{ObservationData, Table};
use anofox_curvefit::error::{ErrorKind, ForecastError, Result};
use anofox_curvefit::residuals::{
    summarize_residuals, RawResidual, ResidualForecaster, AMOUNT_COLUMN, DISTANCE_COLUMN,
};
use anofox_curvefit::simulation::{MeanForecastSource, SimulationConfig, SimulationEngine};
use anofox_curvefit::transform::{PowerTranslator, Space, SpaceTranslator};
use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Logistic curve `cap / (1 + exp(-rate * (t - mid)))` per group.
struct LogisticCurve {
    data: ObservationData,
    params: Vec<(String, f64, f64, f64)>,
}

impl LogisticCurve {
    fn value(&self, group: &str, t: f64) -> Result<f64> {
        let (_, cap, rate, mid) = self
            .params
            .iter()
            .find(|(g, ..)| g == group)
            .ok_or_else(|| ForecastError::GroupNotFound(group.to_string()))?;
        Ok(cap / (1.0 + (-rate * (t - mid)).exp()))
    }
}

impl MeanForecastSource for LogisticCurve {
    fn data(&self) -> &ObservationData {
        &self.data
    }

    fn predict(&self, times: &[f64], space: Space, group: &str) -> Result<Vec<f64>> {
        times
            .iter()
            .map(|&t| Ok(space.forward(self.value(group, t)?)))
            .collect()
    }

    fn predict_space(&self) -> Space {
        Space::Log
    }

    fn fit_space(&self) -> Space {
        Space::Log
    }

    fn compare_space(&self) -> Space {
        Space::Linear
    }
}

fn make_curve() -> LogisticCurve {
    let params = vec![
        ("north".to_string(), 1000.0, 0.3, 20.0),
        ("south".to_string(), 400.0, 0.2, 15.0),
    ];

    let mut times = Vec::new();
    let mut groups = Vec::new();
    let mut compare = Vec::new();
    for (group, cap, rate, mid, n_obs) in [
        ("north", 1000.0, 0.3, 20.0, 12),
        ("south", 400.0, 0.2, 15.0, 8),
    ] {
        // Two trailing rows are not observed yet
        for t in 0..(n_obs + 2) {
            let t = t as f64;
            times.push(t);
            groups.push(group);
            let truth: f64 = cap / (1.0 + (-rate * (t - mid)).exp());
            compare.push(if t < n_obs as f64 {
                truth * (1.0 + 0.02 * (t * 1.3).sin())
            } else {
                f64::NAN
            });
        }
    }
    let observations = PowerTranslator
        .translate(&compare, Space::Linear, Space::Log)
        .unwrap();

    let data = ObservationData::builder()
        .times(times)
        .groups(groups)
        .observations(observations)
        .compare(compare)
        .build()
        .unwrap();

    LogisticCurve { data, params }
}

/// Residual statistics where spread grows with distance and shrinks with data.
fn residual_table() -> Table {
    let mut raw = Vec::new();
    for distance in 1..=5 {
        for amount in [5.0, 10.0, 15.0] {
            for k in 0..4 {
                let spread = 0.02 * distance as f64 + 0.3 / amount;
                let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
                raw.push(RawResidual::new(
                    distance as f64,
                    amount,
                    0.01 + sign * spread * (1.0 + 0.1 * k as f64),
                ));
            }
        }
    }
    summarize_residuals(&raw).unwrap()
}

fn fitted_forecaster() -> ResidualForecaster {
    let mut forecaster = ResidualForecaster::new();
    forecaster
        .fit_residuals(
            &residual_table(),
            "residual_mean",
            "residual_std",
            &[DISTANCE_COLUMN.to_string(), AMOUNT_COLUMN.to_string()],
            "linear",
        )
        .unwrap();
    forecaster
}

#[test]
fn simulate_five_draws_four_steps_out() {
    let curve = make_curve();
    let forecaster = fitted_forecaster();
    let engine = SimulationEngine::new(&forecaster);

    let config = SimulationConfig::new(4, 5).with_seed(42);
    let sim = engine.simulate(&curve, "north", &config).unwrap();

    assert_eq!(sim.draws.len(), 5);
    assert_eq!(sim.forecast_times, vec![12.0, 13.0, 14.0, 15.0]);

    for draw in &sim.draws {
        assert_eq!(draw.group, "north");
        assert_eq!(draw.len(), 12 + 4);
        assert_eq!(draw.num_simulated(), 4);
        let flags = draw.simulated_flags();
        assert!(flags[..12].iter().all(|&f| f == 0));
        assert!(flags[12..].iter().all(|&f| f == 1));
        assert_eq!(draw.times.len(), draw.compare_values.len());
        assert_eq!(draw.times.len(), draw.fit_values.len());
    }

    // All draws share time points and history, and differ in simulated values
    let first = &sim.draws[0];
    for draw in &sim.draws[1..] {
        assert_eq!(draw.times, first.times);
        assert_eq!(draw.compare_values[..12], first.compare_values[..12]);
        assert_ne!(draw.compare_values[12..], first.compare_values[12..]);
    }
}

#[test]
fn mean_forecast_stays_in_predict_space() {
    let curve = make_curve();
    let forecaster = fitted_forecaster();
    let engine = SimulationEngine::new(&forecaster);

    let sim = engine
        .simulate(&curve, "south", &SimulationConfig::new(3, 400).with_seed(11))
        .unwrap();

    for (i, &t) in sim.forecast_times.iter().enumerate() {
        let expected = curve.value("south", t).unwrap();
        assert_relative_eq!(sim.mean_forecast[i], expected.ln(), epsilon = 1e-12);

        // Simulated values scatter around the linear-space mean
        let column: Vec<f64> = sim.forecast_matrix().iter().map(|r| r[i]).collect();
        let avg = column.iter().sum::<f64>() / column.len() as f64;
        let relative_bias = sim.residuals.residual_mean[i];
        assert_relative_eq!(avg, expected * (1.0 + relative_bias), max_relative = 0.05);
    }
}

#[test]
fn fit_space_round_trips_to_compare_space() {
    let curve = make_curve();
    let forecaster = fitted_forecaster();
    let engine = SimulationEngine::new(&forecaster);

    let sim = engine
        .simulate(&curve, "north", &SimulationConfig::new(6, 10).with_seed(3))
        .unwrap();

    for draw in &sim.draws {
        let back = PowerTranslator
            .translate(&draw.fit_values, Space::Log, Space::Linear)
            .unwrap();
        for (b, c) in back.iter().zip(&draw.compare_values) {
            assert_relative_eq!(*b, *c, max_relative = 1e-12);
        }
    }
}

#[test]
fn residual_grid_is_conditioned_on_group_data() {
    let curve = make_curve();
    let forecaster = fitted_forecaster();
    let engine = SimulationEngine::new(&forecaster);
    let config = SimulationConfig::new(3, 2).with_seed(1);

    let north = engine.simulate(&curve, "north", &config).unwrap();
    let south = engine.simulate(&curve, "south", &config).unwrap();

    assert!(north.residuals.amount_of_data_seen.iter().all(|&a| a == 12.0));
    assert!(south.residuals.amount_of_data_seen.iter().all(|&a| a == 8.0));

    // Less data means wider residual spread
    for h in 0..3 {
        assert!(south.residuals.residual_std[h] > north.residuals.residual_std[h]);
    }
}

#[test]
fn large_floor_dominates_predicted_spread() {
    let curve = make_curve();
    let forecaster = fitted_forecaster();
    let engine = SimulationEngine::new(&forecaster);

    let config = SimulationConfig::new(3, 2).with_seed(1).with_std_floor(0.5);
    let sim = engine.simulate(&curve, "north", &config).unwrap();
    assert!(sim.effective_std.iter().all(|&s| s == 0.5));
}

#[test]
fn explicit_generator_matches_seeded_config() {
    let curve = make_curve();
    let forecaster = fitted_forecaster();
    let engine = SimulationEngine::new(&forecaster);

    let seeded = engine
        .simulate(&curve, "north", &SimulationConfig::new(4, 3).with_seed(2024))
        .unwrap();

    let mut rng = StdRng::seed_from_u64(2024);
    let explicit = engine
        .simulate_with_rng(&curve, "north", &SimulationConfig::new(4, 3), &mut rng)
        .unwrap();

    assert_eq!(seeded.draws, explicit.draws);
}

#[test]
fn missing_group_is_a_not_found_error() {
    let curve = make_curve();
    let forecaster = fitted_forecaster();
    let engine = SimulationEngine::new(&forecaster);

    let err = engine
        .simulate(&curve, "east", &SimulationConfig::new(4, 3))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn regression_on_covariate_missing_from_grid_is_configuration_error() {
    let curve = make_curve();
    let residuals = residual_table()
        .with_column(
            "population",
            (0..15).map(|i| 100.0 + (i * i) as f64).collect(),
        )
        .unwrap();
    let mut forecaster = ResidualForecaster::new();
    forecaster
        .fit_residuals(
            &residuals,
            "residual_mean",
            "residual_std",
            &[DISTANCE_COLUMN.to_string(), "population".to_string()],
            "linear",
        )
        .unwrap();

    let engine = SimulationEngine::new(&forecaster);
    let err = engine
        .simulate(&curve, "north", &SimulationConfig::new(4, 3))
        .unwrap_err();
    assert_eq!(err, ForecastError::MissingColumn("population".to_string()));
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn interval_summary_covers_the_mean_forecast() {
    let curve = make_curve();
    let forecaster = fitted_forecaster();
    let engine = SimulationEngine::new(&forecaster);

    let sim = engine
        .simulate(&curve, "north", &SimulationConfig::new(5, 500).with_seed(8))
        .unwrap();
    let bands = sim.intervals(0.95).unwrap();

    assert_eq!(bands.level(), Some(0.95));
    for (h, &t) in sim.forecast_times.iter().enumerate() {
        let mean = curve.value("north", t).unwrap();
        assert!(bands.lower().unwrap()[h] < mean);
        assert!(mean < bands.upper().unwrap()[h]);
    }
}
