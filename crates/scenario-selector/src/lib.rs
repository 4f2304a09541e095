//! Scenario/Year Selection for GWL Humidex Datasets
//!
//! This crate turns a user's choice of Global Warming Level and calendar year
//! into a presentation-ready summary of one humidex slice:
//!
//! - **Year resolution**: map a calendar year onto the scenario's 20-year
//!   window, rejecting anything outside it before touching data
//! - **Slice extraction**: fetch the 2-D field and the precomputed marker
//!   locations for the resolved `(scenario, time_index)`
//! - **Summary values**: grid-wide maximum and the 99.9th percentile of the
//!   non-missing cells
//!
//! # Architecture
//!
//! ```text
//! select(dataset, scenario, year)
//!      │
//!      ├─► resolve_year_index(scenario, year) ──► OutOfRange
//!      │
//!      ├─► dataset.slice("humidex_max") ────────► MissingSlice
//!      │
//!      ├─► field.max_valid() ───────────────────► EmptySlice
//!      │
//!      ├─► dataset.scalar(lat/lon percentile, lat/lon abs max)
//!      │
//!      ├─► percentile_linear(valid cells, 99.9)
//!      │
//!      └─► SelectionResult
//! ```
//!
//! # Example
//!
//! ```ignore
//! use scenario_selector::{select, Scenario};
//!
//! let result = select(&dataset, Scenario::Gwl2_0, 2004)?;
//! println!("{}", result.caption());
//! ```

pub mod dataset;
pub mod percentile;
pub mod result;
pub mod select;

// Re-export commonly used types at crate root
pub use dataset::{
    variables, ClimateDataset, CoordinateArrays, DatasetError, HumidexDataset,
};
pub use gwl_common::{Field, GeoPoint, Scenario, SelectResult, SelectionError};
pub use percentile::{percentile_linear, HUMIDEX_PERCENTILE};
pub use result::SelectionResult;
pub use select::{resolve_year_index, select, year_for_index};
