//! Percentile computation over grid cells.

/// Percentile reported alongside the absolute maximum.
pub const HUMIDEX_PERCENTILE: f64 = 99.9;

/// Percentile of `values` using linear interpolation between order statistics.
///
/// The rank of percentile `pct` is `pct / 100 * (n - 1)`; the result lies
/// between the two order statistics surrounding that rank. Returns `None`
/// for empty input or `pct` outside `[0, 100]`. Callers must strip NaN first.
pub fn percentile_linear(mut values: Vec<f64>, pct: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=100.0).contains(&pct) {
        return None;
    }

    let rank = pct / 100.0 * (values.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let frac = rank - lo as f64;

    let (_, lo_val, upper) = values.select_nth_unstable_by(lo, f64::total_cmp);
    let lo_val = *lo_val;

    if frac == 0.0 || upper.is_empty() {
        return Some(lo_val);
    }

    // Next order statistic is the smallest value above the partition point
    let hi_val = upper.iter().copied().fold(f64::INFINITY, f64::min);

    Some((lo_val + (hi_val - lo_val) * frac).min(hi_val))
}
