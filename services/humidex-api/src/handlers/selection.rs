//! Humidex selection for one scenario and calendar year.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Extension, Query},
    Json,
};
use scenario_selector::{select, Scenario, SelectionResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::ApiError;
use crate::metrics::{record_rejected, record_selection, OUTCOME_OK};
use crate::state::AppState;

/// Query parameters for `/api/selection`.
///
/// Both are optional at the extractor level so a missing value yields the
/// service's own JSON error rather than the framework's plain-text rejection.
#[derive(Debug, Default, Deserialize)]
pub struct SelectionQuery {
    pub gwl: Option<String>,
    pub year: Option<String>,
}

/// Selection result with its display strings.
#[derive(Debug, Serialize)]
pub struct SelectionResponse {
    #[serde(flatten)]
    pub result: SelectionResult,
    pub title: String,
    pub caption: String,
}

impl SelectionQuery {
    /// Validate and parse both parameters.
    pub fn parse(&self) -> Result<(Scenario, i32), ApiError> {
        let gwl = self
            .gwl
            .as_deref()
            .ok_or_else(|| ApiError::missing_parameter("gwl"))?;
        let year = self
            .year
            .as_deref()
            .ok_or_else(|| ApiError::missing_parameter("year"))?;

        let scenario: Scenario = gwl.parse()?;
        let year: i32 = year
            .trim()
            .parse()
            .map_err(|_| ApiError::invalid_parameter("year", year))?;

        Ok((scenario, year))
    }
}

/// GET /api/selection?gwl=2.0&year=2004
pub async fn selection_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<SelectionQuery>,
) -> Result<Json<SelectionResponse>, ApiError> {
    let (scenario, year) = query.parse().inspect_err(|e| record_rejected(e.code))?;

    let dataset = Arc::clone(&state.dataset);
    let start = Instant::now();

    // Slice copy and percentile sort are CPU-bound
    let outcome = tokio::task::spawn_blocking(move || select(dataset.as_ref(), scenario, year))
        .await
        .map_err(|e| ApiError::internal(format!("Selection task failed: {}", e)))?;

    let elapsed = start.elapsed();

    match outcome {
        Ok(result) => {
            record_selection(OUTCOME_OK, elapsed);
            debug!(
                gwl = %scenario,
                year,
                elapsed_ms = elapsed.as_millis() as u64,
                "Selection complete"
            );
            Ok(Json(SelectionResponse {
                title: result.title(),
                caption: result.caption(),
                result,
            }))
        }
        Err(err) => {
            record_selection(err.code(), elapsed);
            if !err.is_input_error() {
                warn!(gwl = %scenario, year, error = %err, "Selection failed on dataset content");
            }
            Err(err.into())
        }
    }
}
