//! Router-level tests against a synthetic dataset.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use humidex_api::{build_router, state::AppState};
use serde_json::Value;
use test_utils::{create_linspace_grid, empty_dataset, grid, insert_slice, synthetic_dataset};
use tower::ServiceExt;

use gwl_common::Scenario;

fn app() -> Router {
    let state = AppState::from_dataset(synthetic_dataset(grid::TINY_4X3), "synthetic");
    build_router(Arc::new(state))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health() {
    let (status, json) = get(app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_ready_reports_dataset() {
    let (status, json) = get(app(), "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ready"], true);
    assert_eq!(json["source"], "synthetic");
    assert_eq!(json["scenarios"].as_array().unwrap().len(), 6);
    assert_eq!(json["grids"], 6 * 20);
}

#[tokio::test]
async fn test_ready_unavailable_when_empty() {
    let state = AppState::from_dataset(empty_dataset(grid::TINY_4X3), "empty");
    let (status, json) = get(build_router(Arc::new(state)), "/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["ready"], false);
}

#[tokio::test]
async fn test_metrics_endpoint_responds() {
    let response = app()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================================
// Scenarios and coordinates
// ============================================================================

#[tokio::test]
async fn test_scenarios_list() {
    let spec = grid::TINY_4X3;
    let mut ds = empty_dataset(spec);
    insert_slice(&mut ds, spec, Scenario::Gwl4_0, 0, vec![30.0; spec.size()]);
    let app = build_router(Arc::new(AppState::from_dataset(ds, "one")));

    let (status, json) = get(app, "/api/scenarios").await;
    assert_eq!(status, StatusCode::OK);

    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 6);
    assert_eq!(list[0]["id"], "1.0");
    assert_eq!(list[0]["first_year"], 1995);
    assert_eq!(list[0]["last_year"], 2014);
    assert_eq!(list[0]["available"], false);

    let gwl4 = &list[5];
    assert_eq!(gwl4["id"], "4.0");
    assert_eq!(gwl4["base_year"], 2052);
    assert_eq!(gwl4["last_year"], 2071);
    assert_eq!(gwl4["available"], true);
}

#[tokio::test]
async fn test_coordinates() {
    let (status, json) = get(app(), "/api/coordinates").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["width"], 4);
    assert_eq!(json["height"], 3);
    assert_eq!(json["two_dimensional"], false);
    assert_eq!(json["longitude"].as_array().unwrap().len(), 4);
    assert_eq!(json["latitude"][2], 45.0);
}

// ============================================================================
// Selection
// ============================================================================

#[tokio::test]
async fn test_selection_ok() {
    let (status, json) = get(app(), "/api/selection?gwl=2.0&year=2004").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(json["scenario"], "2.0");
    assert_eq!(json["year"], 2004);
    assert_eq!(json["time_index"], 9);
    assert_eq!(json["title"], "GWL 2.0, Year: 2004");
    assert!(json["caption"]
        .as_str()
        .unwrap()
        .contains("99.9th Percentile Max:"));
    assert_eq!(json["field"]["values"].as_array().unwrap().len(), 12);

    let max = json["absolute_max_value"].as_f64().unwrap();
    let pct = json["percentile_value"].as_f64().unwrap();
    assert!(max >= pct);
}

#[tokio::test]
async fn test_selection_missing_cells_are_null() {
    let spec = grid::TINY_4X3;
    let mut ds = empty_dataset(spec);
    let mut values = create_linspace_grid(spec.width, spec.height, 20.0, 31.0);
    values[0] = f32::NAN;
    insert_slice(&mut ds, spec, Scenario::Gwl1_0, 0, values);
    let app = build_router(Arc::new(AppState::from_dataset(ds, "nan")));

    let (status, json) = get(app, "/api/selection?gwl=1.0&year=1995").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["field"]["values"][0].is_null());
    assert_eq!(json["absolute_max_value"], 31.0);
}

#[tokio::test]
async fn test_selection_out_of_range_is_bad_request() {
    let (status, json) = get(app(), "/api/selection?gwl=4.0&year=2051").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "OutOfRange");
    let description = json["description"].as_str().unwrap();
    assert!(description.contains("2052") && description.contains("2071"));
}

#[tokio::test]
async fn test_selection_unknown_scenario_is_bad_request() {
    let (status, json) = get(app(), "/api/selection?gwl=5.0&year=2000").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "UnknownScenario");
}

#[tokio::test]
async fn test_selection_missing_parameter_is_bad_request() {
    let (status, json) = get(app(), "/api/selection?gwl=2.0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "MissingParameterValue");
}

#[tokio::test]
async fn test_selection_missing_slice_is_not_found() {
    let state = AppState::from_dataset(empty_dataset(grid::TINY_4X3), "empty");
    let app = build_router(Arc::new(state));

    let (status, json) = get(app, "/api/selection?gwl=1.5&year=2000").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "MissingSlice");
}

#[tokio::test]
async fn test_selection_empty_slice_is_unprocessable() {
    let spec = grid::TINY_4X3;
    let mut ds = empty_dataset(spec);
    insert_slice(&mut ds, spec, Scenario::Gwl3_0, 0, vec![f32::NAN; spec.size()]);
    let app = build_router(Arc::new(AppState::from_dataset(ds, "nan")));

    let (status, json) = get(app, "/api/selection?gwl=3.0&year=1995").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "EmptySlice");
}
