//! Error types for density-viz operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller supplied data that cannot be analyzed.
    InvalidInput,
    /// An option or configuration value has the wrong type or value.
    InvalidConfiguration,
    /// File system failure.
    Io,
    /// Image encoding failure.
    Encoding,
    /// Rasterization failure.
    Rendering,
}

/// Errors that can occur in density-viz operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (file operations, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// YAML options could not be parsed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON options could not be parsed or a figure could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Fewer than two usable points were supplied.
    #[error("input should have multiple elements")]
    TooFewPoints {
        /// Number of usable points found.
        found: usize,
    },

    /// Data length mismatch between x and y arrays.
    #[error("Data length mismatch: x has {x_len} elements, y has {y_len} elements")]
    DataLengthMismatch {
        /// Length of x data.
        x_len: usize,
        /// Length of y data.
        y_len: usize,
    },

    /// A referenced column does not exist.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// A column was expected to hold numbers.
    #[error("Column {0} is not numeric")]
    NonNumericColumn(String),

    /// A line cannot be fitted (all x values identical).
    #[error("Cannot fit a line: x values have zero variance")]
    DegenerateFit,

    /// The stats option had an unsupported type.
    #[error("stats must be bool or dict, got {type_name} instead.")]
    InvalidStatsType {
        /// Name of the offending type.
        type_name: String,
    },

    /// Unknown density estimation method.
    #[error("Unknown density method: {0} (expected kde or empirical)")]
    UnknownDensityMethod(String),

    /// Unknown named color scale.
    #[error("Unknown color scale: {0}")]
    UnknownColorScale(String),

    /// Unknown named color.
    #[error("Invalid color: {0}")]
    UnknownColor(String),

    /// An option value is out of range or malformed.
    #[error("Invalid option {name}: {reason}")]
    InvalidOption {
        /// Option name.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Invalid dimensions for framebuffer or plot.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Scale domain error (e.g., log of non-positive value).
    #[error("Scale domain error: {0}")]
    ScaleDomain(String),
}

impl Error {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::TooFewPoints { .. }
            | Error::DataLengthMismatch { .. }
            | Error::UnknownColumn(_)
            | Error::NonNumericColumn(_)
            | Error::DegenerateFit => ErrorKind::InvalidInput,
            Error::InvalidStatsType { .. }
            | Error::UnknownDensityMethod(_)
            | Error::UnknownColorScale(_)
            | Error::UnknownColor(_)
            | Error::InvalidOption { .. }
            | Error::Yaml(_)
            | Error::Json(_) => ErrorKind::InvalidConfiguration,
            Error::Io(_) => ErrorKind::Io,
            Error::PngEncoding(_) => ErrorKind::Encoding,
            Error::InvalidDimensions { .. } | Error::ScaleDomain(_) => ErrorKind::Rendering,
        }
    }

    pub(crate) fn invalid_option(name: &str, reason: impl Into<String>) -> Self {
        Error::InvalidOption { name: name.to_string(), reason: reason.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_few_points_message() {
        let err = Error::TooFewPoints { found: 0 };
        assert_eq!(err.to_string(), "input should have multiple elements");
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_invalid_stats_type_message() {
        let err = Error::InvalidStatsType { type_name: "int".to_string() };
        assert_eq!(err.to_string(), "stats must be bool or dict, got int instead.");
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    }

    #[test]
    fn test_data_length_mismatch() {
        let err = Error::DataLengthMismatch { x_len: 10, y_len: 20 };
        assert!(err.to_string().contains("10"));
        assert!(err.to_string().contains("20"));
    }

    #[test]
    fn test_raster_failures_classified_as_rendering() {
        let err = crate::framebuffer::Framebuffer::new(0, 10).unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { width: 0, height: 10 }));
        assert_eq!(err.kind(), ErrorKind::Rendering);
    }

    #[test]
    fn test_invalid_option() {
        let err = Error::invalid_option("n_bins", "must be positive");
        assert_eq!(err.to_string(), "Invalid option n_bins: must be positive");
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    }
}
