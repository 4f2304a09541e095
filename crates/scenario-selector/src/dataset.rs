//! Read-only access to a loaded GWL humidex dataset.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use gwl_common::{Field, Scenario};

/// Variable names used by the selector.
pub mod variables {
    /// Gridded humidex maximum, `[gwl, year, y, x]`.
    pub const HUMIDEX_MAX: &str = "humidex_max";
    /// Latitude of the 99.9th-percentile occurrence, `[gwl, year]`.
    pub const LAT_PERCENTILE: &str = "lat_percentile";
    /// Longitude of the 99.9th-percentile occurrence, `[gwl, year]`.
    pub const LON_PERCENTILE: &str = "lon_percentile";
    /// Latitude of the absolute maximum, `[gwl, year]`.
    pub const LAT_ABS_MAX: &str = "lat_abs_max";
    /// Longitude of the absolute maximum, `[gwl, year]`.
    pub const LON_ABS_MAX: &str = "lon_abs_max";
    /// Date of the maximum, `[gwl, year]`. Optional.
    pub const DATE_OF_MAX: &str = "date_of_max_percentile";

    /// Scalar variables every `(scenario, year)` must carry.
    pub const REQUIRED_SCALARS: [&str; 4] = [LAT_PERCENTILE, LON_PERCENTILE, LAT_ABS_MAX, LON_ABS_MAX];
}

/// Read access to a climate dataset keyed by `(scenario, time_index)`.
///
/// Implementations are immutable for the lifetime of a session; every
/// accessor returns `None` when the combination has no backing data.
pub trait ClimateDataset {
    /// The 2-D grid of `variable` for one scenario and time index.
    fn slice(&self, scenario: Scenario, time_index: usize, variable: &str) -> Option<Field>;

    /// A scalar value of `variable`. Missing (fill) values are `None`.
    fn scalar(&self, scenario: Scenario, time_index: usize, variable: &str) -> Option<f64>;

    /// A calendar date stored in `variable`.
    fn date(&self, _scenario: Scenario, _time_index: usize, _variable: &str) -> Option<NaiveDate> {
        None
    }

    /// Longitude and latitude arrays for the grid.
    fn coordinates(&self) -> &CoordinateArrays;
}

/// Longitude/latitude arrays, either 1-D axes or 2-D per-cell grids (flattened row-major).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoordinateArrays {
    pub longitude: Vec<f64>,
    pub latitude: Vec<f64>,
    /// True when both arrays hold one value per grid cell.
    pub two_dimensional: bool,
}

impl CoordinateArrays {
    /// 1-D axes: `longitude.len() == width`, `latitude.len() == height`.
    pub fn axes(longitude: Vec<f64>, latitude: Vec<f64>) -> Self {
        Self {
            longitude,
            latitude,
            two_dimensional: false,
        }
    }

    /// 2-D grids with one value per cell.
    pub fn grids(longitude: Vec<f64>, latitude: Vec<f64>) -> Self {
        Self {
            longitude,
            latitude,
            two_dimensional: true,
        }
    }

    fn matches_shape(&self, width: usize, height: usize) -> bool {
        if self.two_dimensional {
            self.longitude.len() == width * height && self.latitude.len() == width * height
        } else {
            self.longitude.len() == width && self.latitude.len() == height
        }
    }
}

/// Errors raised while assembling an in-memory dataset.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DatasetError {
    #[error("'{variable}' has {actual} values, expected {expected}")]
    ShapeMismatch {
        variable: String,
        expected: usize,
        actual: usize,
    },

    #[error("coordinate arrays ({lon} lon, {lat} lat) do not fit a {width}x{height} grid")]
    CoordinateMismatch {
        lon: usize,
        lat: usize,
        width: usize,
        height: usize,
    },
}

type SliceKey = (Scenario, usize);

/// Fully loaded, in-memory humidex dataset.
///
/// Built once by a loader and then shared read-only.
#[derive(Debug, Clone)]
pub struct HumidexDataset {
    width: usize,
    height: usize,
    coordinates: CoordinateArrays,
    grids: HashMap<String, HashMap<SliceKey, Vec<f32>>>,
    scalars: HashMap<String, HashMap<SliceKey, f64>>,
    dates: HashMap<String, HashMap<SliceKey, NaiveDate>>,
}

impl HumidexDataset {
    /// Create an empty dataset for a `width` x `height` grid.
    pub fn new(
        width: usize,
        height: usize,
        coordinates: CoordinateArrays,
    ) -> Result<Self, DatasetError> {
        if !coordinates.matches_shape(width, height) {
            return Err(DatasetError::CoordinateMismatch {
                lon: coordinates.longitude.len(),
                lat: coordinates.latitude.len(),
                width,
                height,
            });
        }

        Ok(Self {
            width,
            height,
            coordinates,
            grids: HashMap::new(),
            scalars: HashMap::new(),
            dates: HashMap::new(),
        })
    }

    /// Grid dimensions `(width, height)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Store a row-major grid for `(scenario, time_index)`.
    pub fn insert_grid(
        &mut self,
        variable: &str,
        scenario: Scenario,
        time_index: usize,
        values: Vec<f32>,
    ) -> Result<(), DatasetError> {
        let expected = self.width * self.height;
        if values.len() != expected {
            return Err(DatasetError::ShapeMismatch {
                variable: variable.to_string(),
                expected,
                actual: values.len(),
            });
        }
        self.grids
            .entry(variable.to_string())
            .or_default()
            .insert((scenario, time_index), values);
        Ok(())
    }

    /// Store a scalar for `(scenario, time_index)`. NaN is kept and read back as missing.
    pub fn insert_scalar(&mut self, variable: &str, scenario: Scenario, time_index: usize, value: f64) {
        self.scalars
            .entry(variable.to_string())
            .or_default()
            .insert((scenario, time_index), value);
    }

    /// Store a date for `(scenario, time_index)`.
    pub fn insert_date(&mut self, variable: &str, scenario: Scenario, time_index: usize, date: NaiveDate) {
        self.dates
            .entry(variable.to_string())
            .or_default()
            .insert((scenario, time_index), date);
    }

    /// Scenarios with at least one stored grid, in ascending order.
    pub fn scenarios(&self) -> Vec<Scenario> {
        self.grids
            .values()
            .flat_map(|slices| slices.keys().map(|(scenario, _)| *scenario))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Time indices with a stored `variable` grid for `scenario`, ascending.
    pub fn time_indices(&self, scenario: Scenario, variable: &str) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .grids
            .get(variable)
            .map(|slices| {
                slices
                    .keys()
                    .filter(|(s, _)| *s == scenario)
                    .map(|(_, t)| *t)
                    .collect()
            })
            .unwrap_or_default();
        indices.sort_unstable();
        indices
    }

    /// Number of stored grids across all variables.
    pub fn grid_count(&self) -> usize {
        self.grids.values().map(HashMap::len).sum()
    }
}

impl ClimateDataset for HumidexDataset {
    fn slice(&self, scenario: Scenario, time_index: usize, variable: &str) -> Option<Field> {
        let values = self.grids.get(variable)?.get(&(scenario, time_index))?;
        Field::new(self.width, self.height, values.clone())
    }

    fn scalar(&self, scenario: Scenario, time_index: usize, variable: &str) -> Option<f64> {
        self.scalars
            .get(variable)?
            .get(&(scenario, time_index))
            .copied()
            .filter(|v| !v.is_nan())
    }

    fn date(&self, scenario: Scenario, time_index: usize, variable: &str) -> Option<NaiveDate> {
        self.dates.get(variable)?.get(&(scenario, time_index)).copied()
    }

    fn coordinates(&self) -> &CoordinateArrays {
        &self.coordinates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_dataset() -> HumidexDataset {
        HumidexDataset::new(2, 2, CoordinateArrays::axes(vec![-80.0, -79.0], vec![43.0, 44.0]))
            .unwrap()
    }

    #[test]
    fn test_insert_and_read_grid() {
        let mut ds = small_dataset();
        ds.insert_grid(variables::HUMIDEX_MAX, Scenario::Gwl2_0, 3, vec![1.0, 2.0, 3.0, 4.0])
            .unwrap();

        let field = ds.slice(Scenario::Gwl2_0, 3, variables::HUMIDEX_MAX).unwrap();
        assert_eq!(field.width, 2);
        assert_eq!(field.get(1, 1), Some(4.0));
        assert!(ds.slice(Scenario::Gwl2_0, 4, variables::HUMIDEX_MAX).is_none());
        assert!(ds.slice(Scenario::Gwl1_5, 3, variables::HUMIDEX_MAX).is_none());
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let mut ds = small_dataset();
        let err = ds
            .insert_grid(variables::HUMIDEX_MAX, Scenario::Gwl2_0, 0, vec![1.0, 2.0, 3.0])
            .unwrap_err();
        assert_eq!(
            err,
            DatasetError::ShapeMismatch {
                variable: variables::HUMIDEX_MAX.to_string(),
                expected: 4,
                actual: 3,
            }
        );
    }

    #[test]
    fn test_coordinate_mismatch_rejected() {
        let result = HumidexDataset::new(3, 2, CoordinateArrays::axes(vec![0.0], vec![0.0, 1.0]));
        assert!(matches!(result, Err(DatasetError::CoordinateMismatch { .. })));
    }

    #[test]
    fn test_nan_scalar_reads_as_missing() {
        let mut ds = small_dataset();
        ds.insert_scalar(variables::LAT_ABS_MAX, Scenario::Gwl1_0, 0, f64::NAN);
        ds.insert_scalar(variables::LON_ABS_MAX, Scenario::Gwl1_0, 0, -79.5);
        assert_eq!(ds.scalar(Scenario::Gwl1_0, 0, variables::LAT_ABS_MAX), None);
        assert_eq!(ds.scalar(Scenario::Gwl1_0, 0, variables::LON_ABS_MAX), Some(-79.5));
    }

    #[test]
    fn test_scenarios_and_indices_sorted() {
        let mut ds = small_dataset();
        for (scenario, t) in [(Scenario::Gwl4_0, 5), (Scenario::Gwl1_0, 2), (Scenario::Gwl1_0, 0)] {
            ds.insert_grid(variables::HUMIDEX_MAX, scenario, t, vec![0.0; 4]).unwrap();
        }
        assert_eq!(ds.scenarios(), vec![Scenario::Gwl1_0, Scenario::Gwl4_0]);
        assert_eq!(ds.time_indices(Scenario::Gwl1_0, variables::HUMIDEX_MAX), vec![0, 2]);
        assert_eq!(ds.grid_count(), 3);
    }
}
