//! Selection metrics reported through the `metrics` facade.

use std::time::Duration;

use metrics::{counter, histogram};

/// Outcome label for a successful selection.
pub const OUTCOME_OK: &str = "ok";

/// Record one selection request and how long it took.
///
/// `outcome` is [`OUTCOME_OK`] or the error code of the failure.
pub fn record_selection(outcome: &'static str, elapsed: Duration) {
    counter!("humidex_selections_total", "outcome" => outcome).increment(1);
    histogram!("humidex_selection_duration_seconds").record(elapsed.as_secs_f64());
}

/// Record a request rejected before selection ran.
pub fn record_rejected(code: &'static str) {
    counter!("humidex_selections_total", "outcome" => code).increment(1);
}
