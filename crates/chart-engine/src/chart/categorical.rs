// File: crates/chart-engine/src/chart/categorical.rs
// Summary: Bar and bubble layouts over categorical rows, with per-shape hit testing.

use std::collections::BTreeMap;

use crate::axis::{format_currency, Axis};
use crate::config::{ChartConfig, TooltipSettings};
use crate::error::Result;
use crate::geometry::{Paint, Rect, Shape, TextAnchor};
use crate::scale::{
    categorical_band, categorical_point, continuous, continuous_or_widened, extent, sqrt_scale, BandScale,
    LinearScale, PointScale, SqrtScale,
};
use crate::series::{validate_rows, CategoryRow, FieldValue};
use crate::theme::{Palette, Theme};
use crate::types::Dimensions;

use super::{ChartFrame, ChartKind, Legend};

/// The row under the pointer and where its tooltip should sit.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryHit {
    pub index: usize,
    pub category: String,
    pub value: f64,
    pub extra: BTreeMap<String, FieldValue>,
    /// Pixel anchor for the tooltip box.
    pub anchor: (f64, f64),
}

impl CategoryHit {
    fn new(index: usize, row: &CategoryRow, anchor: (f64, f64)) -> Self {
        Self { index, category: row.category.clone(), value: row.value, extra: row.extra.clone(), anchor }
    }

    /// Title, then the main value, then every extra field.
    pub fn lines(&self, settings: &TooltipSettings) -> Vec<String> {
        let mut out = vec![self.category.clone(), format!("{}: {}", settings.value_label, self.value)];
        out.extend(self.extra.iter().map(|(k, v)| format!("{}: {}", k, format_field(k, v, settings))));
        out
    }
}

fn format_field(name: &str, value: &FieldValue, settings: &TooltipSettings) -> String {
    match value {
        FieldValue::Number(v) if settings.currency_fields.iter().any(|f| f == name) => format_currency(*v),
        other => other.to_string(),
    }
}

/// Accessible description of one row's shape.
fn row_label(row: &CategoryRow, settings: &TooltipSettings) -> String {
    let mut label = format!("{}: {} {}", row.category, row.value, settings.value_label.to_lowercase());
    for (k, v) in &row.extra {
        label.push_str(&format!(", {} {}", k, format_field(k, v, settings)));
    }
    label
}

fn positive_or_one(v: f64) -> f64 {
    if v > 0.0 { v } else { 1.0 }
}

// ---- bar ----------------------------------------------------------------------

/// One bar per row, x by category band, y from 0 to the largest value.
#[derive(Clone, Debug)]
pub struct BarLayout {
    rows: Vec<CategoryRow>,
    dims: Dimensions,
    theme: Theme,
    palette: Palette,
    config: ChartConfig,
    x: BandScale,
    y: LinearScale,
}

impl BarLayout {
    pub fn new(rows: &[CategoryRow], config: &ChartConfig) -> Result<Self> {
        let dims = config.dimensions;
        dims.validate()?;
        validate_rows(rows, None)?;

        let labels: Vec<&str> = rows.iter().map(|r| r.category.as_str()).collect();
        let x = categorical_band(&labels, dims.x_range(), config.bar.padding_inner, config.bar.padding_outer);
        let max = rows.iter().map(|r| r.value).fold(f64::NEG_INFINITY, f64::max);
        let y = continuous([0.0, positive_or_one(max)], dims.y_range(), true)?;
        let palette = Palette::with_ids(labels.iter().copied());
        tracing::debug!(rows = rows.len(), max, "bar layout built");
        Ok(Self { rows: rows.to_vec(), dims, theme: config.theme(), palette, config: config.clone(), x, y })
    }

    pub fn x(&self) -> &BandScale { &self.x }
    pub fn y(&self) -> &LinearScale { &self.y }

    fn bar_rect(&self, row: &CategoryRow) -> Option<Rect> {
        let left = self.x.map(&row.category)?;
        let (base, top) = (self.y.map(0.0), self.y.map(row.value));
        Some(Rect::new(left, base.min(top), self.x.bandwidth(), (base - top).abs()))
    }

    pub fn render(&self) -> ChartFrame {
        let dims = &self.dims;
        let x_axis = Axis::band(&self.x, dims.y_range()[0]);
        let y_axis = Axis::value(&self.y, self.config.axis.value_ticks, dims.margin.left, |v| v.to_string());
        let mut frame = ChartFrame::new(ChartKind::Bar, dims, self.theme, x_axis, y_axis);
        let theme = &self.theme;

        for row in &self.rows {
            let Some(rect) = self.bar_rect(row) else { continue };
            frame.shapes.push(Shape::Rect {
                rect,
                paint: Paint::fill(self.palette.get(&row.category))
                    .with_fill_opacity(theme.shape_fill_opacity)
                    .with_stroke(theme.shape_stroke, 1.0)
                    .with_stroke_opacity(theme.shape_stroke_opacity),
                label: Some(row_label(row, &self.config.tooltip)),
            });
            frame.annotations.push(Shape::Text {
                x: rect.x + rect.width / 2.0,
                y: self.y.map(row.value) - 5.0,
                text: row.value.to_string(),
                anchor: TextAnchor::Middle,
                rotate: 0.0,
                size: 11.0,
                color: theme.shape_label,
            });
        }
        frame.legend = Some(self.legend());
        frame
    }

    fn legend(&self) -> Legend {
        Legend::new(self.x.labels().iter().map(String::as_str), &self.palette, &self.dims, &self.config.legend)
    }

    /// Topmost bar containing `(x, y)`; the tooltip anchors above the bar's center.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<CategoryHit> {
        self.rows.iter().enumerate().rev().find_map(|(i, row)| {
            let rect = self.bar_rect(row)?;
            rect.contains(x, y)
                .then(|| CategoryHit::new(i, row, (rect.x + rect.width / 2.0, rect.y - 10.0)))
        })
    }
}

// ---- bubble -------------------------------------------------------------------

/// One circle per row: x by category point, y by a numeric extra field,
/// radius by value on a square-root scale.
#[derive(Clone, Debug)]
pub struct BubbleLayout {
    rows: Vec<CategoryRow>,
    dims: Dimensions,
    theme: Theme,
    palette: Palette,
    config: ChartConfig,
    x: PointScale,
    y: LinearScale,
    r: SqrtScale,
}

impl BubbleLayout {
    /// `x_labels` fixes the x order (and may list categories with no row);
    /// `None` uses row order.
    pub fn new(rows: &[CategoryRow], x_labels: Option<&[String]>, config: &ChartConfig) -> Result<Self> {
        let dims = config.bubble_dimensions;
        dims.validate()?;
        let y_field = config.bubble.y_field.as_str();
        validate_rows(rows, Some(y_field))?;

        let labels: Vec<&str> = match x_labels {
            Some(labels) => labels.iter().map(String::as_str).collect(),
            None => rows.iter().map(|r| r.category.as_str()).collect(),
        };
        let x = categorical_point(&labels, dims.x_range(), config.bubble.point_padding);
        let [y0, y1] = extent(rows.iter().filter_map(|r| r.number(y_field))).unwrap_or([0.0, 1.0]);
        let y = continuous_or_widened([y0, y1], dims.y_range(), true);
        let max = rows.iter().map(|r| r.value).fold(f64::NEG_INFINITY, f64::max);
        let r = sqrt_scale([0.0, positive_or_one(max)], config.bubble.radius_range)?;
        let palette = Palette::with_ids(labels.iter().copied());
        tracing::debug!(rows = rows.len(), y_field, "bubble layout built");
        Ok(Self { rows: rows.to_vec(), dims, theme: config.theme(), palette, config: config.clone(), x, y, r })
    }

    pub fn x(&self) -> &PointScale { &self.x }
    pub fn y(&self) -> &LinearScale { &self.y }
    pub fn r(&self) -> &SqrtScale { &self.r }

    fn circle(&self, row: &CategoryRow) -> Option<(f64, f64, f64)> {
        let cx = self.x.map(&row.category)?;
        let cy = self.y.map(row.number(&self.config.bubble.y_field)?);
        Some((cx, cy, self.r.map(row.value.max(0.0))))
    }

    pub fn render(&self) -> ChartFrame {
        let dims = &self.dims;
        let x_axis = Axis::point(&self.x, dims.y_range()[0]);
        let y_axis = Axis::value(&self.y, self.config.axis.value_ticks, dims.margin.left, format_currency);
        let mut frame = ChartFrame::new(ChartKind::Bubble, dims, self.theme, x_axis, y_axis);
        let theme = &self.theme;

        for row in &self.rows {
            let Some((cx, cy, r)) = self.circle(row) else { continue };
            frame.shapes.push(Shape::Circle {
                cx,
                cy,
                r,
                paint: Paint::fill(self.palette.get(&row.category))
                    .with_fill_opacity(theme.shape_fill_opacity)
                    .with_stroke(theme.shape_stroke, 1.0)
                    .with_stroke_opacity(theme.shape_stroke_opacity),
                label: Some(row_label(row, &self.config.tooltip)),
            });
            frame.annotations.push(Shape::Text {
                x: cx,
                y: cy + 4.0,
                text: short_name(&row.category).to_string(),
                anchor: TextAnchor::Middle,
                rotate: 0.0,
                size: 11.0,
                color: theme.shape_label,
            });
        }
        frame.legend = Some(Legend::new(
            self.x.labels().iter().map(String::as_str),
            &self.palette,
            dims,
            &self.config.legend,
        ));
        frame
    }

    /// Topmost bubble whose disc contains `(x, y)`.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<CategoryHit> {
        self.rows.iter().enumerate().rev().find_map(|(i, row)| {
            let (cx, cy, r) = self.circle(row)?;
            ((x - cx).hypot(y - cy) <= r).then(|| CategoryHit::new(i, row, (cx + 10.0, cy - 10.0)))
        })
    }
}

/// `"Austin, TX"` -> `"Austin"`.
pub fn short_name(category: &str) -> &str {
    category.split(", ").next().unwrap_or(category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ChartError, InvalidData};

    fn skills() -> Vec<CategoryRow> {
        vec![
            CategoryRow::new("Rust", 120.0)
                .with_field("avgSalary", FieldValue::Number(150_000.0))
                .with_field("topCity", FieldValue::Text("Seattle, WA".into())),
            CategoryRow::new("Go", 80.0).with_field("avgSalary", FieldValue::Number(140_000.0)),
            CategoryRow::new("TypeScript", 300.0).with_field("avgSalary", FieldValue::Number(125_000.0)),
        ]
    }

    #[test]
    fn bars_rise_from_zero() {
        let layout = BarLayout::new(&skills(), &ChartConfig::default()).unwrap();
        assert_eq!(layout.y().domain(), [0.0, 300.0]);
        let frame = layout.render();
        assert_eq!(frame.shapes.len(), 3);
        match &frame.shapes[2] {
            Shape::Rect { rect, .. } => {
                assert!((rect.y - 20.0).abs() < 1e-9);
                assert!((rect.bottom() - 324.0).abs() < 1e-9);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(frame.x_axis.labels(), vec!["Rust", "Go", "TypeScript"]);
        assert_eq!(frame.annotations.len(), 3);
    }

    #[test]
    fn bar_labels_describe_the_row() {
        let layout = BarLayout::new(&skills(), &ChartConfig::default()).unwrap();
        let frame = layout.render();
        assert_eq!(
            frame.shape_labels()[0],
            "Rust: 120 postings, avgSalary $150k, topCity Seattle, WA"
        );
    }

    #[test]
    fn bar_hit_test_finds_the_row() {
        let layout = BarLayout::new(&skills(), &ChartConfig::default()).unwrap();
        let center = layout.x().center("Go").unwrap();
        let hit = layout.hit_test(center, 320.0).unwrap();
        assert_eq!(hit.category, "Go");
        assert_eq!(hit.lines(&TooltipSettings::default())[1], "Postings: 80");
        // above a short bar is empty space
        assert!(layout.hit_test(center, 30.0).is_none());
        let frame = layout.render();
        assert_eq!(frame.hit_test(center, 320.0), Some(1));
    }

    #[test]
    fn bubbles_follow_point_sqrt_and_value_scales() {
        let layout = BubbleLayout::new(&skills(), None, &ChartConfig::default()).unwrap();
        assert_eq!(layout.r().map(300.0), 48.0);
        let frame = layout.render();
        assert_eq!(frame.kind, ChartKind::Bubble);
        assert_eq!(frame.height, 380.0);
        match &frame.shapes[2] {
            Shape::Circle { r, .. } => assert_eq!(*r, 48.0),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(frame.y_axis.labels().first().copied(), Some("$125k"));
    }

    #[test]
    fn bubble_hit_uses_the_disc() {
        let layout = BubbleLayout::new(&skills(), None, &ChartConfig::default()).unwrap();
        let cx = layout.x().map("TypeScript").unwrap();
        let cy = layout.y().map(125_000.0);
        let hit = layout.hit_test(cx + 40.0, cy).unwrap();
        assert_eq!(hit.category, "TypeScript");
        assert_eq!(hit.lines(&TooltipSettings::default())[2], "avgSalary: $125k");
        assert!(layout.hit_test(cx + 60.0, cy).is_none());
    }

    #[test]
    fn bubble_rows_need_a_y_field() {
        let rows = vec![CategoryRow::new("Denver, CO", 12.0)];
        let err = BubbleLayout::new(&rows, None, &ChartConfig::default()).unwrap_err();
        assert!(matches!(err, ChartError::InvalidData(InvalidData::MissingField { .. })));
    }

    #[test]
    fn short_names_drop_the_region() {
        assert_eq!(short_name("Austin, TX"), "Austin");
        assert_eq!(short_name("Remote"), "Remote");
    }
}
