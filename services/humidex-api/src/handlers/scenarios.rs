//! Scenario listing and grid coordinates.

use std::sync::Arc;

use axum::{extract::Extension, Json};
use scenario_selector::{variables, Scenario};
use serde::Serialize;

use crate::state::AppState;

/// One entry of the scenario list.
#[derive(Debug, Serialize)]
pub struct ScenarioInfo {
    pub id: &'static str,
    pub base_year: i32,
    pub first_year: i32,
    pub last_year: i32,
    /// Whether the loaded dataset has any humidex slice for this scenario.
    pub available: bool,
}

#[derive(Debug, Serialize)]
pub struct CoordinatesResponse {
    pub width: usize,
    pub height: usize,
    pub two_dimensional: bool,
    pub longitude: Vec<f64>,
    pub latitude: Vec<f64>,
}

/// GET /api/scenarios
pub async fn scenarios_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<Vec<ScenarioInfo>> {
    let scenarios = Scenario::ALL
        .into_iter()
        .map(|scenario| {
            let years = scenario.years();
            ScenarioInfo {
                id: scenario.label(),
                base_year: scenario.base_year(),
                first_year: *years.start(),
                last_year: *years.end(),
                available: !state
                    .dataset
                    .time_indices(scenario, variables::HUMIDEX_MAX)
                    .is_empty(),
            }
        })
        .collect();

    Json(scenarios)
}

/// GET /api/coordinates
pub async fn coordinates_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<CoordinatesResponse> {
    use scenario_selector::ClimateDataset;

    let (width, height) = state.dataset.shape();
    let coords = state.dataset.coordinates();

    Json(CoordinatesResponse {
        width,
        height,
        two_dimensional: coords.two_dimensional,
        longitude: coords.longitude.clone(),
        latitude: coords.latitude.clone(),
    })
}
