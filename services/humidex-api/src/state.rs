//! Application state for the humidex API.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use netcdf_parser::{load_humidex_dataset, LoaderConfig};
use scenario_selector::HumidexDataset;

/// Shared application state.
pub struct AppState {
    /// Dataset loaded once at startup, read-only afterwards.
    pub dataset: Arc<HumidexDataset>,

    /// Where the dataset came from, for readiness reporting.
    pub source: String,

    /// When the dataset finished loading.
    pub loaded_at: DateTime<Utc>,

    /// Prometheus recorder handle; absent when no recorder is installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Load the dataset from a NetCDF file.
    pub fn load(path: &Path, config: &LoaderConfig) -> Result<Self> {
        let dataset = load_humidex_dataset(path, config)
            .with_context(|| format!("Failed to load dataset from {:?}", path))?;

        Ok(Self::from_dataset(dataset, path.display().to_string()))
    }

    /// Wrap an already built dataset.
    pub fn from_dataset(dataset: HumidexDataset, source: impl Into<String>) -> Self {
        Self {
            dataset: Arc::new(dataset),
            source: source.into(),
            loaded_at: Utc::now(),
            prometheus: None,
        }
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }
}
