//! Tabular input for plots.
//!
//! Provides a simple columnar data frame, named series, and [`DataSource`],
//! which tells a plot where its x and y values come from.

use crate::error::{Error, Result};

/// A value in a data frame.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    /// A numeric value.
    Number(f32),
    /// A text value.
    Text(String),
    /// A missing value.
    Null,
}

impl DataValue {
    /// Get as f32, or None if not a number.
    #[must_use]
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            DataValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Render as a category label. Numbers are formatted, nulls yield `None`.
    #[must_use]
    pub fn as_label(&self) -> Option<String> {
        match self {
            DataValue::Number(n) => Some(n.to_string()),
            DataValue::Text(s) => Some(s.clone()),
            DataValue::Null => None,
        }
    }
}

impl From<f32> for DataValue {
    fn from(v: f32) -> Self {
        DataValue::Number(v)
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::Text(s.to_string())
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::Text(s)
    }
}

/// A simple columnar data frame. Columns keep insertion order.
#[derive(Debug, Clone, Default)]
pub struct DataFrame {
    columns: Vec<(String, Vec<DataValue>)>,
    n_rows: usize,
}

impl DataFrame {
    /// Create a new empty data frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a numeric column.
    #[must_use]
    pub fn with_f32(mut self, name: &str, data: &[f32]) -> Self {
        self.add_column_f32(name, data);
        self
    }

    /// Add (or replace) a text column.
    #[must_use]
    pub fn with_str(mut self, name: &str, data: &[&str]) -> Self {
        self.add_column_str(name, data);
        self
    }

    /// Add a numeric column.
    pub fn add_column_f32(&mut self, name: &str, data: &[f32]) {
        self.insert(name, data.iter().map(|&v| DataValue::Number(v)).collect());
    }

    /// Add a text column.
    pub fn add_column_str(&mut self, name: &str, data: &[&str]) {
        self.insert(name, data.iter().map(|&s| DataValue::Text(s.to_string())).collect());
    }

    fn insert(&mut self, name: &str, values: Vec<DataValue>) {
        self.n_rows = self.n_rows.max(values.len());
        if let Some(slot) = self.columns.iter_mut().find(|(n, _)| n == name) {
            slot.1 = values;
        } else {
            self.columns.push((name.to_string(), values));
        }
    }

    /// Get a column.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[DataValue]> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_slice())
    }

    /// Get a numeric column, keeping row alignment. Missing values become NaN.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is absent or holds text.
    pub fn numeric(&self, name: &str) -> Result<Vec<f32>> {
        let column = self.get(name).ok_or_else(|| Error::UnknownColumn(name.to_string()))?;
        column
            .iter()
            .map(|v| match v {
                DataValue::Number(n) => Ok(*n),
                DataValue::Null => Ok(f32::NAN),
                DataValue::Text(_) => Err(Error::NonNumericColumn(name.to_string())),
            })
            .collect()
    }

    /// Get a column as category labels, keeping row alignment.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is absent.
    pub fn labels(&self, name: &str) -> Result<Vec<Option<String>>> {
        let column = self.get(name).ok_or_else(|| Error::UnknownColumn(name.to_string()))?;
        Ok(column.iter().map(DataValue::as_label).collect())
    }

    /// Get number of rows.
    #[must_use]
    pub fn nrow(&self) -> usize {
        self.n_rows
    }

    /// Get number of columns.
    #[must_use]
    pub fn ncol(&self) -> usize {
        self.columns.len()
    }

    /// Check if a column exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Get column names in insertion order.
    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }
}

/// A numeric sequence with an optional name used as an axis label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    /// Display name.
    pub name: Option<String>,
    /// Values.
    pub values: Vec<f32>,
}

impl Series {
    /// Create an unnamed series.
    #[must_use]
    pub fn new(values: &[f32]) -> Self {
        Self { name: None, values: values.to_vec() }
    }

    /// Create a named series.
    #[must_use]
    pub fn named(name: &str, values: &[f32]) -> Self {
        Self { name: Some(name.to_string()), values: values.to_vec() }
    }
}

/// Where a plot reads its x and y values from.
#[derive(Debug, Clone, Copy)]
pub enum DataSource<'a> {
    /// Two columns of a data frame.
    Frame {
        /// The frame.
        df: &'a DataFrame,
        /// X column name.
        x: &'a str,
        /// Y column name.
        y: &'a str,
    },
    /// Two standalone series.
    Series {
        /// X values.
        x: &'a Series,
        /// Y values.
        y: &'a Series,
    },
}

impl<'a> DataSource<'a> {
    /// Read from two frame columns.
    #[must_use]
    pub fn frame(df: &'a DataFrame, x: &'a str, y: &'a str) -> Self {
        DataSource::Frame { df, x, y }
    }

    /// Read from two series.
    #[must_use]
    pub fn series(x: &'a Series, y: &'a Series) -> Self {
        DataSource::Series { x, y }
    }

    /// Axis labels: column names, series names, or "Actual"/"Predicted".
    #[must_use]
    pub fn labels(&self) -> (String, String) {
        match self {
            DataSource::Frame { x, y, .. } => ((*x).to_string(), (*y).to_string()),
            DataSource::Series { x, y } => (
                x.name.clone().unwrap_or_else(|| "Actual".to_string()),
                y.name.clone().unwrap_or_else(|| "Predicted".to_string()),
            ),
        }
    }

    /// Raw x and y values, row aligned.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown or non-numeric columns and length mismatches.
    pub fn xy(&self) -> Result<(Vec<f32>, Vec<f32>)> {
        let (x, y) = match self {
            DataSource::Frame { df, x, y } => (df.numeric(x)?, df.numeric(y)?),
            DataSource::Series { x, y } => (x.values.clone(), y.values.clone()),
        };
        if x.len() != y.len() {
            return Err(Error::DataLengthMismatch { x_len: x.len(), y_len: y.len() });
        }
        Ok((x, y))
    }

    /// The backing frame, if any.
    #[must_use]
    pub fn frame_ref(&self) -> Option<&'a DataFrame> {
        match self {
            DataSource::Frame { df, .. } => Some(df),
            DataSource::Series { .. } => None,
        }
    }

    /// Read an extra numeric column (sizes, error bars) aligned with x/y.
    ///
    /// # Errors
    ///
    /// Returns an error when the source has no frame or the column is unusable.
    pub fn column(&self, name: &str) -> Result<Vec<f32>> {
        self.frame_ref().ok_or_else(|| Error::UnknownColumn(name.to_string()))?.numeric(name)
    }
}
