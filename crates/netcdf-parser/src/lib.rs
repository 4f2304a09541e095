//! NetCDF loader for gridded GWL humidex files.
//!
//! Reads the humidex maxima, precomputed marker locations and optional dates
//! of maximum for every global-warming-level scenario into an in-memory
//! [`HumidexDataset`](scenario_selector::HumidexDataset).
//!
//! # Example
//!
//! ```no_run
//! use netcdf_parser::{load_humidex_dataset, LoaderConfig};
//! use scenario_selector::{select, Scenario};
//!
//! let dataset = load_humidex_dataset("all_gwl_humidex_max_with_dates.nc", &LoaderConfig::default())?;
//! let result = select(&dataset, Scenario::Gwl2_0, 2004)?;
//! println!("{}", result.caption());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod native;

pub use config::LoaderConfig;
pub use error::{NetCdfError, NetCdfResult};
pub use native::{load_humidex_dataset, silence_hdf5_errors};
