// File: crates/chart-engine/src/chart.rs
// Summary: Chart frames (axes, shapes, legend, overlay), tooltip payloads and the time-series layout seam.

use crate::axis::{format_date, format_number, Axis};
use crate::config::LegendSettings;
use crate::geometry::{Paint, Rect, Shape, TextAnchor};
use crate::scale::{Scale, TimeScale};
use crate::series::{ChartMode, Timestamp};
use crate::theme::{Color, Palette, Theme};
use crate::types::Dimensions;

mod categorical;
mod line;
mod stacked;

pub use categorical::{BarLayout, BubbleLayout, CategoryHit};
pub use line::LineLayout;
pub use stacked::StackedLayout;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Stacked,
    Bar,
    Bubble,
}

impl ChartKind {
    pub fn description(&self) -> &'static str {
        match self {
            Self::Line => "Interactive line chart showing data trends over time",
            Self::Stacked => "Interactive stacked area chart showing data composition over time",
            Self::Bar => "Interactive bar chart showing values by category",
            Self::Bubble => "Interactive bubble chart showing values by category",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
    pub id: String,
    pub color: Color,
}

/// Swatch list anchored near the top-right corner.
#[derive(Clone, Debug, PartialEq)]
pub struct Legend {
    pub x: f64,
    pub y: f64,
    pub row_height: f64,
    pub entries: Vec<LegendEntry>,
}

const SWATCH: f64 = 10.0;

impl Legend {
    pub const LABEL: &'static str = "Legend";

    pub(crate) fn new<'a>(
        ids: impl IntoIterator<Item = &'a str>,
        palette: &Palette,
        dims: &Dimensions,
        settings: &LegendSettings,
    ) -> Self {
        Self {
            x: dims.width - settings.offset_from_right,
            y: dims.margin.top,
            row_height: settings.row_height,
            entries: ids.into_iter().map(|id| LegendEntry { id: id.to_string(), color: palette.get(id) }).collect(),
        }
    }

    pub fn shapes(&self, theme: &Theme) -> Vec<Shape> {
        let mut out = Vec::with_capacity(self.entries.len() * 2);
        for (i, e) in self.entries.iter().enumerate() {
            let top = self.y + i as f64 * self.row_height;
            out.push(Shape::Rect {
                rect: Rect::new(self.x, top, SWATCH, SWATCH),
                paint: Paint::fill(e.color),
                label: Some(format!("{} series", e.id)),
            });
            out.push(Shape::Text {
                x: self.x + 16.0,
                y: top + SWATCH,
                text: e.id.clone(),
                anchor: TextAnchor::Start,
                rotate: 0.0,
                size: 12.0,
                color: theme.legend_label,
            });
        }
        out
    }
}

/// One series' value under the cursor.
#[derive(Clone, Debug, PartialEq)]
pub struct NearestValue {
    pub id: String,
    pub y: f64,
}

/// What a time-series tooltip shows.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipState {
    pub cursor_x: f64,
    pub query: Timestamp,
    pub nearest: Vec<NearestValue>,
}

impl TooltipState {
    /// Header date, then one `id: value` row per series (at most `max_items`).
    pub fn lines(&self, mode: ChartMode, max_items: usize) -> Vec<String> {
        std::iter::once(format_date(self.query))
            .chain(self.nearest.iter().take(max_items).map(|n| format!("{}: {}", n.id, format_number(n.y, mode))))
            .collect()
    }
}

/// Everything needed to draw one chart, in pixel space.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartFrame {
    pub kind: ChartKind,
    pub width: f64,
    pub height: f64,
    /// Accessible description of the whole chart.
    pub label: String,
    pub theme: Theme,
    /// Drawable area; data shapes are clipped to it.
    pub clip: Rect,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub shapes: Vec<Shape>,
    /// Unclipped text drawn over data (bar values, bubble names).
    pub annotations: Vec<Shape>,
    pub legend: Option<Legend>,
    /// Hover decorations (crosshair, tooltip text).
    pub overlay: Vec<Shape>,
}

impl ChartFrame {
    pub(crate) fn new(kind: ChartKind, dims: &Dimensions, theme: Theme, x_axis: Axis, y_axis: Axis) -> Self {
        Self {
            kind,
            width: dims.width,
            height: dims.height,
            label: kind.description().to_string(),
            theme,
            clip: dims.plot_rect(),
            x_axis,
            y_axis,
            shapes: Vec::new(),
            annotations: Vec::new(),
            legend: None,
            overlay: Vec::new(),
        }
    }

    /// Add the crosshair and tooltip text for `tip`.
    pub fn with_tooltip(mut self, tip: &TooltipState, mode: ChartMode, max_items: usize) -> Self {
        let clip = self.clip;
        self.overlay.push(Shape::Line {
            x1: tip.cursor_x,
            y1: clip.y,
            x2: tip.cursor_x,
            y2: clip.bottom(),
            paint: Paint::stroke(self.theme.crosshair, 1.0).with_opacity(self.theme.crosshair_opacity),
        });
        for (i, text) in tip.lines(mode, max_items).into_iter().enumerate() {
            self.overlay.push(Shape::Text {
                x: tip.cursor_x + 8.0,
                y: clip.y + 20.0 + i as f64 * 16.0,
                text,
                anchor: TextAnchor::Start,
                rotate: 0.0,
                size: 12.0,
                color: self.theme.axis_label,
            });
        }
        self
    }

    /// Index of the topmost rect or circle under `(x, y)`.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<usize> {
        self.shapes.iter().enumerate().rev().find_map(|(i, s)| {
            let hit = match s {
                Shape::Rect { rect, .. } => rect.contains(x, y),
                Shape::Circle { cx, cy, r, .. } => (x - cx).hypot(y - cy) <= *r,
                _ => false,
            };
            hit.then_some(i)
        })
    }

    /// Semantic labels of all data shapes, in draw order.
    pub fn shape_labels(&self) -> Vec<&str> {
        self.shapes.iter().filter_map(Shape::label).collect()
    }
}

/// A chart laid out over time: it can be re-rendered against a zoomed
/// x-scale and answer tooltip queries at a cursor position.
pub trait TimeSeriesLayout: Send {
    fn kind(&self) -> ChartKind;
    fn dimensions(&self) -> &Dimensions;
    fn mode(&self) -> ChartMode;

    /// The unzoomed x-scale.
    fn base_x(&self) -> &TimeScale;

    fn render(&self, x: &TimeScale) -> ChartFrame;

    fn tooltip(&self, x: &TimeScale, cursor_x: f64) -> TooltipState;

    fn base_scale(&self) -> Scale {
        Scale::Temporal(*self.base_x())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn legend_rows_stack_from_the_top_right() {
        let palette = Palette::with_ids(["A", "B"]);
        let legend = Legend::new(["A", "B"], &palette, &Dimensions::default(), &LegendSettings::default());
        assert_eq!((legend.x, legend.y), (950.0, 20.0));
        let shapes = legend.shapes(&Theme::dark());
        assert_eq!(shapes.len(), 4);
        match &shapes[2] {
            Shape::Rect { rect, label, .. } => {
                assert_eq!(rect.y, 38.0);
                assert_eq!(label.as_deref(), Some("B series"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn tooltip_lines_truncate() {
        let tip = TooltipState {
            cursor_x: 100.0,
            query: Utc.with_ymd_and_hms(2025, 8, 3, 0, 0, 0).unwrap(),
            nearest: (0..10).map(|i| NearestValue { id: format!("s{i}"), y: i as f64 }).collect(),
        };
        let lines = tip.lines(ChartMode::Percentage, 8);
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "2025-08-03");
        assert_eq!(lines[2], "s1: 1.0%");
    }
}
