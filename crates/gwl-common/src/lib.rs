//! Common types shared across the humidex GWL viewer crates.

pub mod error;
pub mod grid;
pub mod scenario;
pub mod time;

pub use error::{SelectResult, SelectionError};
pub use grid::{Field, GeoPoint};
pub use scenario::{Scenario, SCENARIO_WINDOW_YEARS};
pub use time::{parse_date_label, CfCalendar, CfTimeUnits, CfUnit, TimeParseError};
