//! Column-major numeric table used for residual statistics and prediction grids.

use crate::error::{ForecastError, Result};

/// A table of named `f64` columns of equal length.
///
/// Missing values are represented as NaN.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    names: Vec<String>,
    /// Values stored in column-major format: columns[column][row]
    columns: Vec<Vec<f64>>,
}

impl Table {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table from `(name, values)` pairs.
    ///
    /// All columns must have the same length and names must be unique.
    pub fn from_columns<S: Into<String>>(columns: Vec<(S, Vec<f64>)>) -> Result<Self> {
        let mut table = Self::new();
        for (name, values) in columns {
            table = table.with_column(name, values)?;
        }
        Ok(table)
    }

    /// Append a column, consuming and returning the table.
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        self.push_column(name, values)?;
        Ok(self)
    }

    /// Append a column in place.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<()> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(ForecastError::InvalidParameter(format!(
                "duplicate column '{}'",
                name
            )));
        }
        if !self.columns.is_empty() && values.len() != self.nrows() {
            return Err(ForecastError::DimensionMismatch {
                expected: self.nrows(),
                got: values.len(),
            });
        }
        self.names.push(name);
        self.columns.push(values);
        Ok(())
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.nrows() == 0
    }

    /// Column names in insertion order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Result<&[f64]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.columns[i].as_slice())
            .ok_or_else(|| ForecastError::MissingColumn(name.to_string()))
    }

    /// Check that every named column exists.
    pub fn require_columns(&self, names: &[String]) -> Result<()> {
        for name in names {
            if !self.has_column(name) {
                return Err(ForecastError::MissingColumn(name.clone()));
            }
        }
        Ok(())
    }

    /// Keep only rows where every listed column holds a finite value.
    pub fn drop_missing(&self, columns: &[String]) -> Result<Table> {
        let checked: Vec<&[f64]> = columns
            .iter()
            .map(|name| self.column(name))
            .collect::<Result<_>>()?;

        let keep: Vec<usize> = (0..self.nrows())
            .filter(|&row| checked.iter().all(|col| col[row].is_finite()))
            .collect();

        Ok(Table {
            names: self.names.clone(),
            columns: self
                .columns
                .iter()
                .map(|col| keep.iter().map(|&row| col[row]).collect())
                .collect(),
        })
    }
}
