//! Error types for scenario selection.

use thiserror::Error;

use crate::Scenario;

/// Result type alias using SelectionError.
pub type SelectResult<T> = Result<T, SelectionError>;

/// Structured failures of a scenario/year selection.
///
/// None of these are transient: a request that fails once fails every time
/// against the same dataset.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectionError {
    // === Input Errors ===
    #[error("Unknown GWL scenario '{0}': expected one of 1.0, 1.5, 2.0, 2.5, 3.0, 4.0")]
    UnknownScenario(String),

    #[error(
        "Year {year} is out of range for GWL {scenario}: valid years are {first_year} to {last_year}"
    )]
    OutOfRange {
        scenario: Scenario,
        year: i32,
        first_year: i32,
        last_year: i32,
    },

    // === Data Errors ===
    #[error("No '{variable}' data for GWL {scenario} at year index {time_index}")]
    MissingSlice {
        scenario: Scenario,
        time_index: usize,
        variable: String,
    },

    #[error("Humidex field for GWL {scenario} at year index {time_index} has no valid cells")]
    EmptySlice { scenario: Scenario, time_index: usize },
}

impl SelectionError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            SelectionError::UnknownScenario(_) => "UnknownScenario",
            SelectionError::OutOfRange { .. } => "OutOfRange",
            SelectionError::MissingSlice { .. } => "MissingSlice",
            SelectionError::EmptySlice { .. } => "EmptySlice",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            SelectionError::UnknownScenario(_) | SelectionError::OutOfRange { .. } => 400,
            SelectionError::MissingSlice { .. } => 404,
            SelectionError::EmptySlice { .. } => 422,
        }
    }

    /// True for errors caused by the request rather than the dataset.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SelectionError::UnknownScenario(_) | SelectionError::OutOfRange { .. }
        )
    }
}
