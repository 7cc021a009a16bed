// File: crates/chart-engine/src/chart/line.rs
// Summary: Multi-series line chart layout: normalized data, scales, monotone paths and nearest-point tooltips.

use crate::axis::{format_number, Axis};
use crate::config::ChartConfig;
use crate::error::{InvalidData, Result};
use crate::geometry::{monotone_line, Paint, Shape};
use crate::nearest;
use crate::scale::{continuous_or_widened, extent, temporal_or_widened, LinearScale, TimeScale};
use crate::series::{time_extent, ChartMode, Series};
use crate::theme::{Palette, Theme};
use crate::transform::normalize_all;
use crate::types::Dimensions;

use super::{ChartFrame, ChartKind, Legend, NearestValue, TimeSeriesLayout, TooltipState};

/// Everything derived from one dataset for a line chart. Rebuilt whenever
/// the series, mode or dimensions change.
#[derive(Clone, Debug)]
pub struct LineLayout {
    series: Vec<Series>,
    mode: ChartMode,
    dims: Dimensions,
    theme: Theme,
    palette: Palette,
    config: ChartConfig,
    x: TimeScale,
    y: LinearScale,
}

impl LineLayout {
    /// Validate, normalize for `config.mode`, then derive scales from the
    /// union of all points.
    pub fn new(series: &[Series], config: &ChartConfig) -> Result<Self> {
        let dims = config.dimensions;
        dims.validate()?;
        let series = normalize_all(series, config.mode)?;

        let span = time_extent(&series).ok_or(InvalidData::EmptySeriesList)?;
        let x = temporal_or_widened(span, dims.x_range());

        let [y0, y1] = extent(series.iter().flat_map(|s| s.values().iter().map(|p| p.y()))).unwrap_or([0.0, 1.0]);
        let y = continuous_or_widened([y0, y1], dims.y_range(), true);

        let palette = Palette::with_ids(series.iter().map(Series::id));
        tracing::debug!(
            series = series.len(),
            points = series.iter().map(Series::len).sum::<usize>(),
            mode = ?config.mode,
            "line layout built"
        );
        Ok(Self {
            series,
            mode: config.mode,
            dims,
            theme: config.theme(),
            palette,
            config: config.clone(),
            x,
            y,
        })
    }

    /// Series after normalization.
    pub fn series(&self) -> &[Series] { &self.series }
    pub fn y(&self) -> &LinearScale { &self.y }
    pub fn palette(&self) -> &Palette { &self.palette }
}

impl TimeSeriesLayout for LineLayout {
    fn kind(&self) -> ChartKind { ChartKind::Line }
    fn dimensions(&self) -> &Dimensions { &self.dims }
    fn mode(&self) -> ChartMode { self.mode }
    fn base_x(&self) -> &TimeScale { &self.x }

    fn render(&self, x: &TimeScale) -> ChartFrame {
        let dims = &self.dims;
        let mode = self.mode;
        let x_axis = Axis::time(x, self.config.axis.time_ticks, dims.y_range()[0]);
        let y_axis = Axis::value(&self.y, self.config.axis.value_ticks, dims.margin.left, |v| format_number(v, mode));
        let mut frame = ChartFrame::new(ChartKind::Line, dims, self.theme, x_axis, y_axis);

        for s in &self.series {
            let pts: Vec<(f64, f64)> = s.values().iter().map(|p| (x.map(p.x()), self.y.map(p.y()))).collect();
            frame.shapes.push(Shape::Path {
                path: monotone_line(&pts),
                paint: Paint::stroke(self.palette.get(s.id()), self.theme.line_width),
                label: Some(format!("{} data series", s.id())),
            });
        }
        frame.legend = Some(Legend::new(self.series.iter().map(Series::id), &self.palette, dims, &self.config.legend));
        frame
    }

    fn tooltip(&self, x: &TimeScale, cursor_x: f64) -> TooltipState {
        let query = x.invert(cursor_x);
        let nearest = nearest::query(&self.series, query)
            .into_iter()
            .map(|n| NearestValue { id: n.id, y: n.y })
            .collect();
        TooltipState { cursor_x, query, nearest }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChartError;
    use crate::geometry::PathCommand;
    use crate::series::Timestamp;
    use chrono::{TimeZone, Utc};

    fn day(d: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2025, 8, d, 0, 0, 0).unwrap()
    }

    fn stocks() -> Vec<Series> {
        vec![
            Series::from_pairs("AAPL", [(day(1), 100.0), (day(2), 150.0), (day(3), 120.0)]),
            Series::from_pairs("MSFT", [(day(1), 200.0), (day(3), 210.0)]),
        ]
    }

    #[test]
    fn scales_cover_the_union_of_points() {
        let layout = LineLayout::new(&stocks(), &ChartConfig::default()).unwrap();
        assert_eq!(layout.base_x().domain(), [day(1), day(3)]);
        let [y0, y1] = layout.y().domain();
        assert!(y0 <= 100.0 && y1 >= 210.0);
    }

    #[test]
    fn percentage_mode_normalizes_before_scaling() {
        let config = ChartConfig { mode: ChartMode::Percentage, ..Default::default() };
        let layout = LineLayout::new(&stocks(), &config).unwrap();
        assert_eq!(layout.series()[0].values()[1].y(), 50.0);
        assert_eq!(layout.y().domain(), [0.0, 50.0]);
    }

    #[test]
    fn one_labelled_path_per_series() {
        let layout = LineLayout::new(&stocks(), &ChartConfig::default()).unwrap();
        let frame = layout.render(layout.base_x());
        assert_eq!(frame.shape_labels(), vec!["AAPL data series", "MSFT data series"]);
        let legend = frame.legend.as_ref().unwrap();
        assert_eq!(legend.entries.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(), vec!["AAPL", "MSFT"]);
        if let Shape::Path { path, .. } = &frame.shapes[0] {
            assert_eq!(path.commands()[0], PathCommand::MoveTo(48.0, layout.y().map(100.0)));
        }
    }

    #[test]
    fn tooltip_reports_nearest_values() {
        let layout = LineLayout::new(&stocks(), &ChartConfig::default()).unwrap();
        let x = layout.base_x();
        let tip = layout.tooltip(x, x.map(day(2)) + 1.0);
        assert_eq!(tip.nearest.len(), 2);
        assert_eq!(tip.nearest[0], NearestValue { id: "AAPL".into(), y: 150.0 });
        // MSFT has no day 2; just right of the midpoint the later point wins
        assert_eq!(tip.nearest[1].y, 210.0);
    }

    #[test]
    fn invalid_data_aborts_before_layout() {
        let err = LineLayout::new(&[], &ChartConfig::default()).unwrap_err();
        assert_eq!(err, ChartError::InvalidData(InvalidData::EmptySeriesList));
    }

    #[test]
    fn single_point_gets_a_widened_domain() {
        let s = vec![Series::from_pairs("solo", [(day(5), 42.0)])];
        let layout = LineLayout::new(&s, &ChartConfig::default()).unwrap();
        let frame = layout.render(layout.base_x());
        assert_eq!(frame.shapes.len(), 1);
        let [y0, y1] = layout.y().domain();
        assert!(y0 < 42.0 && y1 > 42.0);
    }
}
