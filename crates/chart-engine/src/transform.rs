// File: crates/chart-engine/src/transform.rs
// Summary: Series rewrites ahead of scale construction: percentage normalization and stacking.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::series::{validate_series, ChartMode, Point, Series, Timestamp};

/// Rewrite a series for display in `mode`.
///
/// `Absolute` returns the series unchanged. `Percentage` maps every value to
/// its change relative to the first point, `(y - base) / base * 100`. A
/// zero base has no defined change; the series is reported flat at 0%.
pub fn normalize(series: &Series, mode: ChartMode) -> Series {
    match mode {
        ChartMode::Absolute => series.clone(),
        ChartMode::Percentage => {
            let base = series.first().map_or(1.0, Point::y);
            if base == 0.0 {
                tracing::warn!(id = series.id(), "percentage base is zero; series shown as flat 0%");
                let values = series.values().iter().map(|p| Point::new(p.x(), 0.0)).collect();
                return Series::new(series.id(), values);
            }
            let values = series
                .values()
                .iter()
                .map(|p| Point::new(p.x(), (p.y() - base) / base * 100.0))
                .collect();
            Series::new(series.id(), values)
        }
    }
}

/// Validate, then [`normalize`] each series.
pub fn normalize_all(series: &[Series], mode: ChartMode) -> Result<Vec<Series>> {
    validate_series(series)?;
    Ok(series.iter().map(|s| normalize(s, mode)).collect())
}

/// One series' slice of a stacked frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Band {
    pub id: String,
    pub start: f64,
    pub end: f64,
}

impl Band {
    pub fn value(&self) -> f64 {
        self.end - self.start
    }
}

/// Cumulative bands at one timestamp, in series-list order.
#[derive(Clone, Debug, PartialEq)]
pub struct StackedFrame {
    pub x: Timestamp,
    pub bands: Vec<Band>,
}

impl StackedFrame {
    pub fn band(&self, id: &str) -> Option<&Band> {
        self.bands.iter().find(|b| b.id == id)
    }

    /// End of the last band, or 0 for an empty frame.
    pub fn total(&self) -> f64 {
        self.bands.last().map_or(0.0, |b| b.end)
    }
}

/// Stack `series` over the sorted union of their timestamps.
///
/// Order is the caller's array order; a series with no point at a timestamp
/// contributes a zero-height band there.
pub fn stack(series: &[Series]) -> Vec<StackedFrame> {
    let xs: BTreeSet<Timestamp> = series
        .iter()
        .flat_map(|s| s.values().iter().map(Point::x))
        .collect();

    let frames: Vec<StackedFrame> = xs
        .into_iter()
        .map(|x| {
            let mut cumulative = 0.0;
            let bands = series
                .iter()
                .map(|s| {
                    let v = s.value_at(x).unwrap_or(0.0);
                    let band = Band { id: s.id().to_string(), start: cumulative, end: cumulative + v };
                    cumulative += v;
                    band
                })
                .collect();
            StackedFrame { x, bands }
        })
        .collect();
    tracing::trace!(series = series.len(), frames = frames.len(), "stacked");
    frames
}

/// Highest top-band end across `frames`; 0 when there are none.
pub fn max_stacked_total(frames: &[StackedFrame]) -> f64 {
    frames.iter().map(StackedFrame::total).fold(0.0, f64::max)
}
