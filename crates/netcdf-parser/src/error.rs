//! Error types for NetCDF loading operations.

use scenario_selector::DatasetError;
use thiserror::Error;

/// Result type for NetCDF parser operations.
pub type NetCdfResult<T> = Result<T, NetCdfError>;

/// Error types for NetCDF loading.
#[derive(Error, Debug)]
pub enum NetCdfError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Dataset file does not exist
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Missing required variable, dimension or attribute
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Error reported by the netcdf library
    #[error("NetCDF library error: {0}")]
    Library(#[from] netcdf::Error),
}

impl From<DatasetError> for NetCdfError {
    fn from(err: DatasetError) -> Self {
        NetCdfError::InvalidFormat(err.to_string())
    }
}
