//! Test data generators for creating synthetic humidex grids.
//!
//! These generators create predictable, verifiable test data patterns
//! that can be used across the test suite. All grids are row-major.

/// Creates a grid of evenly spaced values from `start` to `end` inclusive.
///
/// The first cell holds `start`, the last cell holds `end`.
///
/// # Example
///
/// ```
/// use test_utils::create_linspace_grid;
///
/// let grid = create_linspace_grid(1000, 1, 20.0, 50.0);
/// assert_eq!(grid.len(), 1000);
/// assert_eq!(grid[0], 20.0);
/// assert_eq!(grid[999], 50.0);
/// ```
pub fn create_linspace_grid(width: usize, height: usize, start: f32, end: f32) -> Vec<f32> {
    let n = width * height;
    if n == 1 {
        return vec![start];
    }
    let step = (f64::from(end) - f64::from(start)) / (n - 1) as f64;
    (0..n)
        .map(|i| {
            if i == n - 1 {
                end
            } else {
                (f64::from(start) + step * i as f64) as f32
            }
        })
        .collect()
}

/// Creates a grid with humidex-like values in °C.
///
/// Values are deterministic for a given seed and fall in `[20, 50)`,
/// with a mild south-to-north cooling so rows differ.
pub fn create_humidex_grid(width: usize, height: usize, seed: u32) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let hash = simple_hash(col as u32, row as u32, seed);
            let noise = (hash % 1000) as f32 / 1000.0; // 0 to 1
            let y_factor = 1.0 - row as f32 / height.max(1) as f32;
            data.push(20.0 + noise * 20.0 + y_factor * 9.99);
        }
    }
    data
}

/// Simple deterministic hash for reproducible test data.
fn simple_hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = seed;
    h = h.wrapping_mul(31).wrapping_add(x);
    h = h.wrapping_mul(31).wrapping_add(y);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^= h >> 16;
    h
}

/// Creates a grid filled with a constant value.
pub fn create_constant_grid(width: usize, height: usize, value: f32) -> Vec<f32> {
    vec![value; width * height]
}

/// Replaces the cells at `nan_positions` (col, row) with NaN.
///
/// Positions outside the grid are ignored.
pub fn with_missing_cells(mut data: Vec<f32>, width: usize, nan_positions: &[(usize, usize)]) -> Vec<f32> {
    let height = if width == 0 { 0 } else { data.len() / width };
    for &(col, row) in nan_positions {
        if col < width && row < height {
            data[row * width + col] = f32::NAN;
        }
    }
    data
}

/// Row-major position of the largest non-NaN value, as (col, row).
pub fn argmax_cell(data: &[f32], width: usize) -> Option<(usize, usize)> {
    data.iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| (i % width, i / width))
}
