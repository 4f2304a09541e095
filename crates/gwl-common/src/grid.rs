//! Grid types for humidex fields.

use serde::{Deserialize, Serialize};

/// A geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A 2-D grid of values for one scenario and time index.
///
/// Values are stored row-major (`y` outer, `x` inner). Missing cells are NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Number of columns (x dimension).
    pub width: usize,
    /// Number of rows (y dimension).
    pub height: usize,
    /// Cell values, `height * width` long.
    pub values: Vec<f32>,
}

impl Field {
    /// Create a field from row-major values.
    ///
    /// Returns `None` if `values.len() != width * height`.
    pub fn new(width: usize, height: usize, values: Vec<f32>) -> Option<Self> {
        if values.len() != width * height {
            return None;
        }
        Some(Self {
            width,
            height,
            values,
        })
    }

    /// Create a field from nested rows. Returns `None` for ragged input.
    pub fn from_rows(rows: &[Vec<f32>]) -> Option<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != width) {
            return None;
        }
        Self::new(width, height, rows.concat())
    }

    /// Get the value at a grid position.
    pub fn get(&self, col: usize, row: usize) -> Option<f32> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.values.get(row * self.width + col).copied()
    }

    /// Iterate over non-missing cell values.
    pub fn valid_values(&self) -> impl Iterator<Item = f32> + '_ {
        self.values.iter().copied().filter(|v| !v.is_nan())
    }

    /// Number of non-missing cells.
    pub fn valid_count(&self) -> usize {
        self.valid_values().count()
    }

    /// Maximum over non-missing cells, `None` when every cell is missing.
    pub fn max_valid(&self) -> Option<f32> {
        self.valid_values().reduce(f32::max)
    }

    /// Minimum over non-missing cells, `None` when every cell is missing.
    pub fn min_valid(&self) -> Option<f32> {
        self.valid_values().reduce(f32::min)
    }

    /// Total number of cells, missing included.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the field has no cells.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
