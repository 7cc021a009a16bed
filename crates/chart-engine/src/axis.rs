// File: crates/chart-engine/src/axis.rs
// Summary: Axis tick sets with formatted labels, plus the number/currency/date formatters.

use crate::geometry::TextAnchor;
use crate::scale::{BandScale, LinearScale, PointScale, TimeScale};
use crate::series::{ChartMode, Timestamp};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisSide {
    Bottom,
    Left,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    /// Pixel position along the axis.
    pub position: f64,
    pub label: String,
}

/// A laid-out axis: where it sits, what it spans, and its ticks.
#[derive(Clone, Debug, PartialEq)]
pub struct Axis {
    pub side: AxisSide,
    /// y of a bottom axis, x of a left axis.
    pub offset: f64,
    pub range: [f64; 2],
    pub ticks: Vec<Tick>,
    /// Degrees.
    pub label_rotation: f64,
    pub label_anchor: TextAnchor,
}

/// Rotation for categorical labels, which tend to be long.
const CATEGORY_LABEL_ROTATION: f64 = -45.0;

impl Axis {
    fn new(side: AxisSide, offset: f64, range: [f64; 2], ticks: Vec<Tick>) -> Self {
        let anchor = match side {
            AxisSide::Bottom => TextAnchor::Middle,
            AxisSide::Left => TextAnchor::End,
        };
        Self { side, offset, range, ticks, label_rotation: 0.0, label_anchor: anchor }
    }

    fn rotated(mut self) -> Self {
        self.label_rotation = CATEGORY_LABEL_ROTATION;
        self.label_anchor = TextAnchor::End;
        self
    }

    /// Bottom axis for a time scale, labelled `%b %d`.
    pub fn time(scale: &TimeScale, count: usize, offset: f64) -> Self {
        let ticks = scale
            .ticks(count)
            .into_iter()
            .map(|t| Tick { position: scale.map(t), label: format_short_date(t) })
            .collect();
        Self::new(AxisSide::Bottom, offset, scale.range(), ticks)
    }

    /// Left axis for a linear scale.
    pub fn value(scale: &LinearScale, count: usize, offset: f64, format: impl Fn(f64) -> String) -> Self {
        let ticks = scale
            .ticks(count)
            .into_iter()
            .map(|v| Tick { position: scale.map(v), label: format(v) })
            .collect();
        Self::new(AxisSide::Left, offset, scale.range(), ticks)
    }

    /// Bottom axis with one tick centered under each band.
    pub fn band(scale: &BandScale, offset: f64) -> Self {
        let ticks = scale
            .labels()
            .iter()
            .filter_map(|l| scale.center(l).map(|position| Tick { position, label: l.clone() }))
            .collect();
        Self::new(AxisSide::Bottom, offset, scale.range(), ticks).rotated()
    }

    /// Bottom axis with one tick per point.
    pub fn point(scale: &PointScale, offset: f64) -> Self {
        let ticks = scale
            .labels()
            .iter()
            .filter_map(|l| scale.map(l).map(|position| Tick { position, label: l.clone() }))
            .collect();
        Self::new(AxisSide::Bottom, offset, scale.range(), ticks).rotated()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.ticks.iter().map(|t| t.label.as_str()).collect()
    }
}

// ---- formatting -------------------------------------------------------------

/// Percent with one decimal in percentage mode, two decimals otherwise.
pub fn format_number(v: f64, mode: ChartMode) -> String {
    match mode {
        ChartMode::Percentage => format!("{v:.1}%"),
        ChartMode::Absolute => format!("{v:.2}"),
    }
}

/// Whole thousands of dollars: `84_500.0` -> `$85k`.
pub fn format_currency(v: f64) -> String {
    let k = (v / 1000.0 + 0.5).floor();
    format!("${k}k")
}

pub fn format_date(t: Timestamp) -> String {
    t.format("%Y-%m-%d").to_string()
}

pub fn format_short_date(t: Timestamp) -> String {
    t.format("%b %d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::{categorical_band, continuous, temporal};
    use chrono::{TimeZone, Utc};

    #[test]
    fn number_formats_follow_mode() {
        assert_eq!(format_number(12.346, ChartMode::Absolute), "12.35");
        assert_eq!(format_number(12.346, ChartMode::Percentage), "12.3%");
        assert_eq!(format_number(-3.0, ChartMode::Percentage), "-3.0%");
    }

    #[test]
    fn currency_rounds_to_thousands() {
        assert_eq!(format_currency(84_500.0), "$85k");
        assert_eq!(format_currency(120_000.0), "$120k");
        assert_eq!(format_currency(0.0), "$0k");
    }

    #[test]
    fn dates() {
        let t = Utc.with_ymd_and_hms(2025, 3, 7, 15, 0, 0).unwrap();
        assert_eq!(format_date(t), "2025-03-07");
        assert_eq!(format_short_date(t), "Mar 07");
    }

    #[test]
    fn value_axis_positions_ticks_on_the_scale() {
        let y = continuous([0.0, 100.0], [324.0, 20.0], true).unwrap();
        let axis = Axis::value(&y, 5, 48.0, |v| format_number(v, ChartMode::Absolute));
        assert_eq!(axis.side, AxisSide::Left);
        assert_eq!(axis.ticks.first().map(|t| t.position), Some(324.0));
        assert_eq!(axis.ticks.last().map(|t| t.label.as_str()), Some("100.00"));
    }

    #[test]
    fn band_axis_is_rotated_and_centered() {
        let x = categorical_band(&["Rust", "Go"], [0.0, 200.0], 0.0, 0.0);
        let axis = Axis::band(&x, 324.0);
        assert_eq!(axis.labels(), vec!["Rust", "Go"]);
        assert_eq!(axis.ticks[0].position, 50.0);
        assert_eq!(axis.label_rotation, -45.0);
        assert_eq!(axis.label_anchor, TextAnchor::End);
    }

    #[test]
    fn time_axis_labels_are_short_dates() {
        let t0 = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2025, 7, 15, 0, 0, 0).unwrap();
        let x = temporal([t0, t1], [48.0, 1076.0]).unwrap();
        let axis = Axis::time(&x, 6, 324.0);
        assert_eq!(axis.labels().first().copied(), Some("Feb 01"));
        assert!(axis.ticks.iter().all(|t| (48.0..=1076.0).contains(&t.position)));
    }
}
