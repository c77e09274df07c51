//! Grouped historical observations held by a mean-forecast source.

use crate::error::{ForecastError, Result};
use std::collections::{BTreeMap, HashMap};

/// Historical observations for a set of groups.
///
/// Rows are stored column-wise. `observations` are in fit space and `compare`
/// holds the same quantity in comparison space; either may be NaN for rows
/// that have not been observed yet.
#[derive(Debug, Clone, Default)]
pub struct ObservationData {
    times: Vec<f64>,
    groups: Vec<String>,
    observations: Vec<f64>,
    compare: Vec<f64>,
    covariates: HashMap<String, Vec<f64>>,
}

/// Builder for constructing [`ObservationData`].
#[derive(Debug, Clone, Default)]
pub struct ObservationDataBuilder {
    times: Vec<f64>,
    groups: Vec<String>,
    observations: Option<Vec<f64>>,
    compare: Vec<f64>,
    covariates: HashMap<String, Vec<f64>>,
}

impl ObservationDataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn times(mut self, times: Vec<f64>) -> Self {
        self.times = times;
        self
    }

    pub fn groups<S: Into<String>>(mut self, groups: Vec<S>) -> Self {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    /// Fit-space observations. Defaults to all-missing when not set.
    pub fn observations(mut self, observations: Vec<f64>) -> Self {
        self.observations = Some(observations);
        self
    }

    /// Comparison-space observations.
    pub fn compare(mut self, compare: Vec<f64>) -> Self {
        self.compare = compare;
        self
    }

    /// Add a group-level covariate column.
    pub fn covariate(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.covariates.insert(name.into(), values);
        self
    }

    pub fn build(self) -> Result<ObservationData> {
        let n = self.times.len();
        if n == 0 {
            return Err(ForecastError::EmptyData);
        }

        let observations = self.observations.unwrap_or_else(|| vec![f64::NAN; n]);

        for len in [self.groups.len(), observations.len(), self.compare.len()] {
            if len != n {
                return Err(ForecastError::DimensionMismatch {
                    expected: n,
                    got: len,
                });
            }
        }
        for values in self.covariates.values() {
            if values.len() != n {
                return Err(ForecastError::DimensionMismatch {
                    expected: n,
                    got: values.len(),
                });
            }
        }
        if self.times.iter().any(|t| !t.is_finite()) {
            return Err(ForecastError::InvalidParameter(
                "time values must be finite".into(),
            ));
        }

        Ok(ObservationData {
            times: self.times,
            groups: self.groups,
            observations,
            compare: self.compare,
            covariates: self.covariates,
        })
    }
}

/// Rows of [`ObservationData`] belonging to a single group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupHistory {
    pub group: String,
    pub times: Vec<f64>,
    pub observations: Vec<f64>,
    pub compare: Vec<f64>,
}

impl GroupHistory {
    /// Number of rows with a non-missing comparison-space observation.
    pub fn num_observed(&self) -> usize {
        self.compare.iter().filter(|v| !v.is_nan()).count()
    }

    /// Latest time among rows with a non-missing comparison observation.
    pub fn max_observed_time(&self) -> Option<f64> {
        self.times
            .iter()
            .zip(&self.compare)
            .filter(|(_, v)| !v.is_nan())
            .map(|(&t, _)| t)
            .fold(None, |acc: Option<f64>, t| {
                Some(acc.map_or(t, |m| m.max(t)))
            })
    }

    /// Times and comparison values of the observed rows, in data order.
    pub fn observed(&self) -> (Vec<f64>, Vec<f64>) {
        self.times
            .iter()
            .zip(&self.compare)
            .filter(|(_, v)| !v.is_nan())
            .map(|(&t, &v)| (t, v))
            .unzip()
    }
}

impl ObservationData {
    pub fn builder() -> ObservationDataBuilder {
        ObservationDataBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn observations(&self) -> &[f64] {
        &self.observations
    }

    pub fn compare(&self) -> &[f64] {
        &self.compare
    }

    pub fn covariate(&self, name: &str) -> Result<&[f64]> {
        self.covariates
            .get(name)
            .map(|v| v.as_slice())
            .ok_or_else(|| ForecastError::MissingColumn(name.to_string()))
    }

    /// Covariate names in sorted order.
    pub fn covariate_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.covariates.keys().cloned().collect();
        names.sort();
        names
    }

    /// Distinct group names in order of first appearance.
    pub fn group_names(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for g in &self.groups {
            if !seen.contains(g) {
                seen.push(g.clone());
            }
        }
        seen
    }

    /// Select the rows of a group.
    ///
    /// Fails with [`ForecastError::GroupNotFound`] when the group has no rows or
    /// none of its rows carries a comparison-space observation.
    pub fn group(&self, group: &str) -> Result<GroupHistory> {
        let rows: Vec<usize> = (0..self.len()).filter(|&i| self.groups[i] == group).collect();

        let history = GroupHistory {
            group: group.to_string(),
            times: rows.iter().map(|&i| self.times[i]).collect(),
            observations: rows.iter().map(|&i| self.observations[i]).collect(),
            compare: rows.iter().map(|&i| self.compare[i]).collect(),
        };

        if history.num_observed() == 0 {
            return Err(ForecastError::GroupNotFound(group.to_string()));
        }
        Ok(history)
    }

    /// Count of non-missing comparison observations per group.
    pub fn num_obs_per_group(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for (g, v) in self.groups.iter().zip(&self.compare) {
            if !v.is_nan() {
                *counts.entry(g.clone()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Latest observed time per group.
    pub fn max_time_per_group(&self) -> BTreeMap<String, f64> {
        let mut max_t: BTreeMap<String, f64> = BTreeMap::new();
        for ((g, v), &t) in self.groups.iter().zip(&self.compare).zip(&self.times) {
            if v.is_nan() {
                continue;
            }
            max_t
                .entry(g.clone())
                .and_modify(|m| *m = m.max(t))
                .or_insert(t);
        }
        max_t
    }

    /// Covariate values keyed by covariate name then group.
    ///
    /// Every group must carry a single value for each covariate.
    pub fn covariates_by_group(&self) -> Result<BTreeMap<String, BTreeMap<String, f64>>> {
        let mut out = BTreeMap::new();
        for name in self.covariate_names() {
            let values = &self.covariates[&name];
            let mut per_group: BTreeMap<String, f64> = BTreeMap::new();
            for (g, &v) in self.groups.iter().zip(values) {
                match per_group.get(g) {
                    Some(&existing) if !same_value(existing, v) => {
                        return Err(ForecastError::InvalidParameter(format!(
                            "covariate '{}' is not unique within group '{}'",
                            name, g
                        )));
                    }
                    Some(_) => {}
                    None => {
                        per_group.insert(g.clone(), v);
                    }
                }
            }
            out.insert(name, per_group);
        }
        Ok(out)
    }
}

fn same_value(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}
