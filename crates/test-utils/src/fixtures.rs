//! Common test fixtures for humidex GWL viewer tests.
//!
//! This module provides pre-defined grids and fully populated synthetic
//! datasets covering every scenario and year.

use chrono::NaiveDate;
use gwl_common::{Scenario, SCENARIO_WINDOW_YEARS};
use scenario_selector::{variables, CoordinateArrays, HumidexDataset};

use crate::generators::{argmax_cell, create_humidex_grid};

/// Common grid specifications for testing.
pub mod grid {
    /// Regular lat/lon grid specification.
    #[derive(Debug, Clone, Copy)]
    pub struct GridSpec {
        pub width: usize,
        pub height: usize,
        pub min_lon: f64,
        pub max_lon: f64,
        pub min_lat: f64,
        pub max_lat: f64,
    }

    /// Southern Ontario at roughly 0.5 degree spacing
    pub const SOUTHERN_ONTARIO: GridSpec = GridSpec {
        width: 16,
        height: 10,
        min_lon: -83.0,
        max_lon: -75.5,
        min_lat: 42.0,
        max_lat: 46.5,
    };

    /// Simple 4x3 test grid
    pub const TINY_4X3: GridSpec = GridSpec {
        width: 4,
        height: 3,
        min_lon: -80.0,
        max_lon: -77.0,
        min_lat: 43.0,
        max_lat: 45.0,
    };

    impl GridSpec {
        /// Returns the total number of grid cells.
        pub fn size(&self) -> usize {
            self.width * self.height
        }

        /// Cell-centre longitudes, west to east.
        pub fn longitudes(&self) -> Vec<f64> {
            axis(self.min_lon, self.max_lon, self.width)
        }

        /// Cell-centre latitudes, south to north.
        pub fn latitudes(&self) -> Vec<f64> {
            axis(self.min_lat, self.max_lat, self.height)
        }
    }

    fn axis(min: f64, max: f64, n: usize) -> Vec<f64> {
        if n <= 1 {
            return vec![min];
        }
        let step = (max - min) / (n - 1) as f64;
        (0..n).map(|i| min + step * i as f64).collect()
    }
}

/// Deterministic seed for one scenario/time index pair.
pub fn slice_seed(scenario: Scenario, time_index: usize) -> u32 {
    (scenario.warming_degrees() * 10.0) as u32 * 100 + time_index as u32
}

/// Creates an empty dataset shaped for `spec`.
pub fn empty_dataset(spec: grid::GridSpec) -> HumidexDataset {
    HumidexDataset::new(
        spec.width,
        spec.height,
        CoordinateArrays::axes(spec.longitudes(), spec.latitudes()),
    )
    .expect("fixture grid spec is consistent")
}

/// Stores `values` as the humidex slice for `(scenario, time_index)` along with
/// marker scalars derived from the data.
///
/// The absolute-max location is the argmax cell; the percentile location is
/// the cell south-west of it (clamped to the grid).
pub fn insert_slice(
    dataset: &mut HumidexDataset,
    spec: grid::GridSpec,
    scenario: Scenario,
    time_index: usize,
    values: Vec<f32>,
) {
    let lons = spec.longitudes();
    let lats = spec.latitudes();
    let (col, row) = argmax_cell(&values, spec.width).unwrap_or((0, 0));

    dataset
        .insert_grid(variables::HUMIDEX_MAX, scenario, time_index, values)
        .expect("fixture slice matches grid spec");
    dataset.insert_scalar(variables::LAT_ABS_MAX, scenario, time_index, lats[row]);
    dataset.insert_scalar(variables::LON_ABS_MAX, scenario, time_index, lons[col]);
    dataset.insert_scalar(
        variables::LAT_PERCENTILE,
        scenario,
        time_index,
        lats[row.saturating_sub(1)],
    );
    dataset.insert_scalar(
        variables::LON_PERCENTILE,
        scenario,
        time_index,
        lons[col.saturating_sub(1)],
    );
}

/// Creates a dataset with every scenario and all 20 years populated.
///
/// Each slice is a deterministic humidex grid shifted up by the scenario's
/// warming level. Dates of max fall in July of the slice's calendar year.
pub fn synthetic_dataset(spec: grid::GridSpec) -> HumidexDataset {
    let mut dataset = empty_dataset(spec);

    for scenario in Scenario::ALL {
        for time_index in 0..SCENARIO_WINDOW_YEARS as usize {
            let values: Vec<f32> = create_humidex_grid(spec.width, spec.height, slice_seed(scenario, time_index))
                .into_iter()
                .map(|v| v + scenario.warming_degrees() as f32)
                .collect();
            insert_slice(&mut dataset, spec, scenario, time_index, values);

            let year = scenario.base_year() + time_index as i32;
            if let Some(date) = NaiveDate::from_ymd_opt(year, 7, 1 + (time_index as u32 % 28)) {
                dataset.insert_date(variables::DATE_OF_MAX, scenario, time_index, date);
            }
        }
    }

    dataset
}

/// Common calendar years for testing.
pub mod years {
    /// First year of every scenario except GWL 4.0
    pub const EARLY_BASE: i32 = 1995;

    /// First year of GWL 4.0
    pub const GWL4_BASE: i32 = 2052;

    /// A year valid for every scenario except GWL 4.0
    pub const MID_WINDOW: i32 = 2004;
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenario_selector::ClimateDataset;

    #[test]
    fn test_grid_spec_axes() {
        let spec = grid::TINY_4X3;
        assert_eq!(spec.size(), 12);
        assert_eq!(spec.longitudes(), vec![-80.0, -79.0, -78.0, -77.0]);
        assert_eq!(spec.latitudes(), vec![43.0, 44.0, 45.0]);
    }

    #[test]
    fn test_synthetic_dataset_is_complete() {
        let ds = synthetic_dataset(grid::TINY_4X3);
        assert_eq!(ds.scenarios(), Scenario::ALL.to_vec());
        for scenario in Scenario::ALL {
            assert_eq!(
                ds.time_indices(scenario, variables::HUMIDEX_MAX),
                (0..20).collect::<Vec<_>>()
            );
            assert!(ds.date(scenario, 0, variables::DATE_OF_MAX).is_some());
        }
    }

    #[test]
    fn test_slice_seeds_are_distinct() {
        assert_ne!(slice_seed(Scenario::Gwl1_0, 5), slice_seed(Scenario::Gwl1_5, 5));
        assert_ne!(slice_seed(Scenario::Gwl2_0, 0), slice_seed(Scenario::Gwl2_0, 1));
    }
}
