//! Presentation-ready selection summary.

use std::fmt::Write;

use chrono::NaiveDate;
use serde::Serialize;

use gwl_common::{Field, GeoPoint, Scenario};

/// Summary of one humidex slice, built fresh per request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionResult {
    pub scenario: Scenario,
    /// Calendar year as requested.
    pub year: i32,
    /// Offset of `year` from the scenario's base year.
    pub time_index: usize,
    /// Humidex values for the slice; NaN marks missing cells.
    pub field: Field,
    /// Stored location of the 99.9th-percentile occurrence.
    pub percentile_location: GeoPoint,
    /// Stored location of the grid-wide maximum.
    pub absolute_max_location: GeoPoint,
    /// 99.9th percentile of the non-missing cells, °C.
    pub percentile_value: f64,
    /// Maximum of the non-missing cells, °C.
    pub absolute_max_value: f64,
    pub date_of_max: Option<NaiveDate>,
}

impl SelectionResult {
    /// Plot title, e.g. `GWL 2.0, Year: 2004`.
    pub fn title(&self) -> String {
        format!("GWL {}, Year: {}", self.scenario, self.year)
    }

    /// Multi-line text summary shown under the map.
    pub fn caption(&self) -> String {
        let mut caption = format!("{}\n\n", self.title());

        // Writing to a String cannot fail
        let _ = writeln!(caption, "99.9th Percentile Max: {:.2}°C", self.percentile_value);
        let _ = writeln!(caption, "Absolute Max: {:.2}°C", self.absolute_max_value);
        let _ = writeln!(
            caption,
            "99.9th Percentile Location: ({:.2}, {:.2})",
            self.percentile_location.lat, self.percentile_location.lon
        );
        let _ = write!(
            caption,
            "Absolute Max Location: ({:.2}, {:.2})",
            self.absolute_max_location.lat, self.absolute_max_location.lon
        );
        if let Some(date) = self.date_of_max {
            let _ = write!(caption, "\nDate of Max: {}", date.format("%Y-%m-%d"));
        }

        caption
    }
}
