use std::path::PathBuf;

use thiserror::Error;
use tracing::error;

/// Error types for the compute module
#[derive(Error, Debug)]
pub enum ComputeError {
    /// An input file could not be found or opened
    #[error("Input file not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// Error from Polars DataFrame operations
    #[error("DataFrame error: {0}")]
    DataFrame(String),

    /// Error from Polars Series operations
    #[error("Series error: {0}")]
    Series(String),

    /// A required column is absent
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// A timestamp could not be derived or parsed
    #[error("Timestamp error: {0}")]
    Timestamp(String),

    /// The inputs have no numeric columns to analyze
    #[error("No numeric columns shared by {0}")]
    NoNumericColumns(String),

    /// The requested attribute is not a numeric column of the dataset
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    /// Error while generating the synthetic dataset
    #[error("Synthetic data error: {0}")]
    Synthetic(String),
}

impl From<polars::error::PolarsError> for ComputeError {
    fn from(error: polars::error::PolarsError) -> Self {
        match error {
            polars::error::PolarsError::ColumnNotFound(_) => {
                let err = ComputeError::MissingColumn(error.to_string());
                error!(?err, "DataFrame error: Column not found");
                err
            }
            polars::error::PolarsError::NoData(_) => {
                let err = ComputeError::DataFrame(format!("No data: {}", error));
                error!(?err, "DataFrame error: No data");
                err
            }
            polars::error::PolarsError::ShapeMismatch(_) => {
                let err = ComputeError::DataFrame(format!("Shape mismatch: {}", error));
                error!(?err, "DataFrame error: Shape mismatch");
                err
            }
            polars::error::PolarsError::SchemaMismatch(_) => {
                let err = ComputeError::DataFrame(format!("Schema mismatch: {}", error));
                error!(?err, "DataFrame error: Schema mismatch");
                err
            }
            polars::error::PolarsError::ComputeError(_) => {
                let err = ComputeError::DataFrame(format!("Compute error: {}", error));
                error!(?err, "DataFrame error: Compute error");
                err
            }
            _ => {
                let err = ComputeError::Series(format!("Series error: {}", error));
                error!(?err, "Series error");
                err
            }
        }
    }
}

/// Type alias for Result with ComputeError
pub type Result<T> = std::result::Result<T, ComputeError>;
