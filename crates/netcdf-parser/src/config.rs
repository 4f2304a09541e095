//! Variable and dimension names expected in a humidex file.

use serde::{Deserialize, Serialize};

/// Names of the dimensions and variables read from the file.
///
/// Defaults match the files produced by the humidex post-processing
/// pipeline; override individual names when reading a renamed copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Scenario dimension, also the name of its label coordinate.
    pub scenario_dim: String,
    /// Relative-year dimension.
    pub year_dim: String,
    /// Gridded humidex variable `[scenario, year, y, x]`.
    pub humidex_var: String,
    pub lat_percentile_var: String,
    pub lon_percentile_var: String,
    pub lat_abs_max_var: String,
    pub lon_abs_max_var: String,
    /// Optional date-of-maximum variable.
    pub date_of_max_var: String,
    /// Longitude candidates, tried in order.
    pub longitude_vars: Vec<String>,
    /// Latitude candidates, tried in order.
    pub latitude_vars: Vec<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            scenario_dim: "gwl".to_string(),
            year_dim: "year".to_string(),
            humidex_var: "humidex_max".to_string(),
            lat_percentile_var: "lat_percentile".to_string(),
            lon_percentile_var: "lon_percentile".to_string(),
            lat_abs_max_var: "lat_abs_max".to_string(),
            lon_abs_max_var: "lon_abs_max".to_string(),
            date_of_max_var: "date_of_max_percentile".to_string(),
            longitude_vars: vec![
                "longitude".to_string(),
                "lon".to_string(),
                "projection_x_coordinate".to_string(),
            ],
            latitude_vars: vec![
                "latitude".to_string(),
                "lat".to_string(),
                "projection_y_coordinate".to_string(),
            ],
        }
    }
}

impl LoaderConfig {
    /// Pairs of (file variable, canonical variable) for the required location scalars.
    pub fn scalar_mappings(&self) -> [(&str, &'static str); 4] {
        use scenario_selector::variables;
        [
            (self.lat_percentile_var.as_str(), variables::LAT_PERCENTILE),
            (self.lon_percentile_var.as_str(), variables::LON_PERCENTILE),
            (self.lat_abs_max_var.as_str(), variables::LAT_ABS_MAX),
            (self.lon_abs_max_var.as_str(), variables::LON_ABS_MAX),
        ]
    }
}
