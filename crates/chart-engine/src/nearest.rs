// File: crates/chart-engine/src/nearest.rs
// Summary: Nearest-point lookup per series for tooltips (binary search, center rounding).

use crate::error::{contract_violation, Result};
use crate::series::{to_millis, Series, Timestamp};

/// The point of one series closest to a query x.
#[derive(Clone, Debug, PartialEq)]
pub struct NearestPoint {
    pub id: String,
    pub x: Timestamp,
    pub y: f64,
    pub index: usize,
}

/// Index of the value closest to `x` in ascending `xs`.
///
/// Out-of-range queries clamp to the first or last index; an exact midpoint
/// resolves to the later index.
pub fn nearest_index(xs: impl Fn(usize) -> f64, len: usize, x: f64) -> Option<usize> {
    if len == 0 {
        return None;
    }
    // bisect-left over [0, len - 1)
    let (mut lo, mut hi) = (0usize, len - 1);
    while lo < hi {
        let mid = (lo + hi) / 2;
        if xs(mid) < x {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    let i = lo;
    if i > 0 && xs(i - 1) - x > -(xs(i) - x) {
        Some(i - 1)
    } else {
        Some(i)
    }
}

/// Nearest point of `series` to `x`, in O(log n).
///
/// An empty series is a contract violation: callers validate first.
pub fn nearest_point(series: &Series, x: Timestamp) -> Result<NearestPoint> {
    let values = series.values();
    let q = to_millis(x);
    let index = nearest_index(|i| values[i].x_ms(), values.len(), q)
        .ok_or_else(|| contract_violation(format!("nearest-point query on empty series '{}'", series.id())))?;
    let p = values[index];
    Ok(NearestPoint { id: series.id().to_string(), x: p.x(), y: p.y(), index })
}

/// [`nearest_point`] for every series, in list order. Empty series are
/// logged and skipped so a pointer move never fails.
pub fn query(series: &[Series], x: Timestamp) -> Vec<NearestPoint> {
    series.iter().filter_map(|s| nearest_point(s, x).ok()).collect()
}
