// File: crates/chart-engine/src/chart/stacked.rs
// Summary: Stacked area chart layout: cumulative bands, monotone areas and nearest-frame tooltips.

use crate::axis::{format_number, Axis};
use crate::config::ChartConfig;
use crate::error::{InvalidData, Result};
use crate::geometry::{monotone_area, Paint, Shape};
use crate::nearest::nearest_index;
use crate::scale::{continuous, temporal_or_widened, LinearScale, TimeScale};
use crate::series::{to_millis, validate_series, ChartMode, Series};
use crate::theme::{Palette, Theme};
use crate::transform::{max_stacked_total, stack, StackedFrame};
use crate::types::Dimensions;

use super::{ChartFrame, ChartKind, Legend, NearestValue, TimeSeriesLayout, TooltipState};

#[derive(Clone, Debug)]
pub struct StackedLayout {
    ids: Vec<String>,
    frames: Vec<StackedFrame>,
    dims: Dimensions,
    theme: Theme,
    palette: Palette,
    config: ChartConfig,
    x: TimeScale,
    y: LinearScale,
}

impl StackedLayout {
    /// Stack in `series` order; y runs from 0 to the tallest stack.
    pub fn new(series: &[Series], config: &ChartConfig) -> Result<Self> {
        let dims = config.dimensions;
        dims.validate()?;
        validate_series(series)?;

        let frames = stack(series);
        let (Some(first), Some(last)) = (frames.first(), frames.last()) else {
            return Err(InvalidData::EmptySeriesList.into());
        };
        let x = temporal_or_widened([first.x, last.x], dims.x_range());

        let total = max_stacked_total(&frames);
        let top = if total > 0.0 { total } else { 1.0 };
        let y = continuous([0.0, top], dims.y_range(), true)?;

        let ids: Vec<String> = series.iter().map(|s| s.id().to_string()).collect();
        let palette = Palette::with_ids(ids.iter().map(String::as_str));
        tracing::debug!(series = ids.len(), frames = frames.len(), total, "stacked layout built");
        Ok(Self { ids, frames, dims, theme: config.theme(), palette, config: config.clone(), x, y })
    }

    pub fn frames(&self) -> &[StackedFrame] { &self.frames }
    pub fn y(&self) -> &LinearScale { &self.y }
}

impl TimeSeriesLayout for StackedLayout {
    fn kind(&self) -> ChartKind { ChartKind::Stacked }
    fn dimensions(&self) -> &Dimensions { &self.dims }
    fn mode(&self) -> ChartMode { ChartMode::Absolute }
    fn base_x(&self) -> &TimeScale { &self.x }

    fn render(&self, x: &TimeScale) -> ChartFrame {
        let dims = &self.dims;
        let x_axis = Axis::time(x, self.config.axis.time_ticks, dims.y_range()[0]);
        let y_axis = Axis::value(&self.y, self.config.axis.value_ticks, dims.margin.left, |v| {
            format_number(v, ChartMode::Absolute)
        });
        let mut frame = ChartFrame::new(ChartKind::Stacked, dims, self.theme, x_axis, y_axis);

        for (i, id) in self.ids.iter().enumerate() {
            let mut upper = Vec::with_capacity(self.frames.len());
            let mut lower = Vec::with_capacity(self.frames.len());
            for f in &self.frames {
                let px = x.map(f.x);
                let band = &f.bands[i];
                upper.push((px, self.y.map(band.end)));
                lower.push((px, self.y.map(band.start)));
            }
            let color = self.palette.get(id);
            frame.shapes.push(Shape::Path {
                path: monotone_area(&upper, &lower),
                paint: Paint::fill(color)
                    .with_fill_opacity(self.theme.area_fill_opacity)
                    .with_stroke(color, 1.0)
                    .with_stroke_opacity(self.theme.area_stroke_opacity),
                label: Some(format!("{id} area series")),
            });
        }
        frame.legend = Some(Legend::new(self.ids.iter().map(String::as_str), &self.palette, dims, &self.config.legend));
        frame
    }

    /// Band heights at the frame nearest the cursor; empty bands are left out.
    fn tooltip(&self, x: &TimeScale, cursor_x: f64) -> TooltipState {
        let query = x.invert(cursor_x);
        let nearest = nearest_index(|i| to_millis(self.frames[i].x), self.frames.len(), to_millis(query))
            .map(|i| {
                self.frames[i]
                    .bands
                    .iter()
                    .filter(|b| b.value() > 0.0)
                    .map(|b| NearestValue { id: b.id.clone(), y: b.value() })
                    .collect()
            })
            .unwrap_or_default();
        TooltipState { cursor_x, query, nearest }
    }
}
