//! Aggregation of raw forecast errors into residual statistics.

use crate::core::Table;
use crate::error::{ForecastError, Result};
use crate::residuals::{AMOUNT_COLUMN, DISTANCE_COLUMN};
use statrs::statistics::Statistics;

/// A single observed forecast error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawResidual {
    /// Steps beyond the last observation the prediction was made for.
    pub distance_into_future: f64,
    /// Observations available when the prediction was made.
    pub amount_of_data_seen: f64,
    pub residual: f64,
}

impl RawResidual {
    pub fn new(distance_into_future: f64, amount_of_data_seen: f64, residual: f64) -> Self {
        Self {
            distance_into_future,
            amount_of_data_seen,
            residual,
        }
    }
}

/// Summarise raw residuals into one row per (distance, amount) cell.
///
/// The returned table has the distance and amount columns plus
/// `residual_mean` and `residual_std` (sample standard deviation, 0 for
/// single-observation cells). Cells appear in order of first appearance.
/// Residuals that are NaN are ignored.
pub fn summarize_residuals(raw: &[RawResidual]) -> Result<Table> {
    let mut keys: Vec<(f64, f64)> = Vec::new();
    let mut cells: Vec<Vec<f64>> = Vec::new();

    for r in raw.iter().filter(|r| !r.residual.is_nan()) {
        if !r.distance_into_future.is_finite() || !r.amount_of_data_seen.is_finite() {
            return Err(ForecastError::InvalidParameter(
                "residual cell coordinates must be finite".into(),
            ));
        }
        let key = (r.distance_into_future, r.amount_of_data_seen);
        match keys.iter().position(|k| *k == key) {
            Some(i) => cells[i].push(r.residual),
            None => {
                keys.push(key);
                cells.push(vec![r.residual]);
            }
        }
    }

    if keys.is_empty() {
        return Err(ForecastError::EmptyData);
    }

    let means: Vec<f64> = cells.iter().map(|c| c.iter().mean()).collect();
    let stds: Vec<f64> = cells
        .iter()
        .map(|c| if c.len() < 2 { 0.0 } else { c.iter().std_dev() })
        .collect();

    Table::from_columns(vec![
        (DISTANCE_COLUMN, keys.iter().map(|k| k.0).collect()),
        (AMOUNT_COLUMN, keys.iter().map(|k| k.1).collect()),
        ("residual_mean", means),
        ("residual_std", stds),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cells_are_summarised_in_first_appearance_order() {
        let raw = vec![
            RawResidual::new(2.0, 5.0, 0.4),
            RawResidual::new(1.0, 5.0, 0.1),
            RawResidual::new(2.0, 5.0, 0.6),
            RawResidual::new(1.0, 5.0, f64::NAN),
        ];
        let table = summarize_residuals(&raw).unwrap();

        assert_eq!(table.nrows(), 2);
        assert_eq!(table.column(DISTANCE_COLUMN).unwrap(), &[2.0, 1.0]);
        assert_eq!(table.column(AMOUNT_COLUMN).unwrap(), &[5.0, 5.0]);

        let means = table.column("residual_mean").unwrap();
        assert_relative_eq!(means[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(means[1], 0.1, epsilon = 1e-12);

        let stds = table.column("residual_std").unwrap();
        assert_relative_eq!(stds[0], 0.02_f64.sqrt(), epsilon = 1e-12);
        assert_eq!(stds[1], 0.0);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(summarize_residuals(&[]), Err(ForecastError::EmptyData));
        assert_eq!(
            summarize_residuals(&[RawResidual::new(1.0, 1.0, f64::NAN)]),
            Err(ForecastError::EmptyData)
        );
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        let raw = [RawResidual::new(f64::INFINITY, 1.0, 0.1)];
        assert!(matches!(
            summarize_residuals(&raw),
            Err(ForecastError::InvalidParameter(_))
        ));
    }
}
