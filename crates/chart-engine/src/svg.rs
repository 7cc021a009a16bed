// File: crates/chart-engine/src/svg.rs
// Summary: Serializes a ChartFrame to a standalone SVG document.

use std::fmt::{self, Display, Formatter};

use crate::axis::{Axis, AxisSide};
use crate::chart::{ChartFrame, Legend};
use crate::geometry::{fmt as num, Paint, Shape, TextAnchor};
use crate::theme::{Color, Theme};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const CLIP_ID: &str = "plot-area";
const TICK_SIZE: f64 = 6.0;
const AXIS_FONT_SIZE: f64 = 11.0;

/// SVG markup for `frame`.
pub fn to_svg(frame: &ChartFrame) -> String {
    Svg(frame).to_string()
}

/// Display adapter writing a frame as SVG.
pub struct Svg<'a>(pub &'a ChartFrame);

impl Display for Svg<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let frame = self.0;
        let (w, h) = (num(frame.width), num(frame.height));
        writeln!(
            f,
            r#"<svg xmlns="{SVG_NS}" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img" aria-label="{}">"#,
            Escaped(&frame.label)
        )?;
        writeln!(f, r#"<rect width="{w}" height="{h}" fill="{}"/>"#, frame.theme.background.to_hex())?;
        let c = frame.clip;
        writeln!(
            f,
            r#"<defs><clipPath id="{CLIP_ID}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath></defs>"#,
            num(c.x),
            num(c.y),
            num(c.width),
            num(c.height)
        )?;

        write_axis(f, "x-axis", &frame.x_axis, &frame.theme)?;
        write_axis(f, "y-axis", &frame.y_axis, &frame.theme)?;

        writeln!(f, r#"<g class="data" clip-path="url(#{CLIP_ID})">"#)?;
        for shape in &frame.shapes {
            write_shape(f, shape)?;
        }
        writeln!(f, "</g>")?;

        if !frame.annotations.is_empty() {
            writeln!(f, r#"<g class="annotations">"#)?;
            for shape in &frame.annotations {
                write_shape(f, shape)?;
            }
            writeln!(f, "</g>")?;
        }
        if let Some(legend) = &frame.legend {
            write_legend(f, legend, &frame.theme)?;
        }
        if !frame.overlay.is_empty() {
            writeln!(f, r#"<g class="overlay" pointer-events="none">"#)?;
            for shape in &frame.overlay {
                write_shape(f, shape)?;
            }
            writeln!(f, "</g>")?;
        }
        writeln!(f, "</svg>")
    }
}

fn write_axis(f: &mut Formatter<'_>, class: &str, axis: &Axis, theme: &Theme) -> fmt::Result {
    let line = theme.axis_line.to_hex();
    let [r0, r1] = axis.range;
    let o = axis.offset;
    writeln!(f, r#"<g class="{class}" font-size="{}" fill="{}">"#, num(AXIS_FONT_SIZE), theme.axis_label.to_hex())?;
    match axis.side {
        AxisSide::Bottom => {
            writeln!(f, r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{line}"/>"#, num(r0), num(o), num(r1), num(o))?;
            for tick in &axis.ticks {
                let x = num(tick.position);
                writeln!(f, r#"<line x1="{x}" y1="{}" x2="{x}" y2="{}" stroke="{line}"/>"#, num(o), num(o + TICK_SIZE))?;
                let y = num(o + TICK_SIZE + 12.0);
                write!(f, r#"<text x="{x}" y="{y}" text-anchor="{}""#, axis.label_anchor.as_str())?;
                if axis.label_rotation != 0.0 {
                    write!(f, r#" transform="rotate({} {x} {y})""#, num(axis.label_rotation))?;
                }
                writeln!(f, ">{}</text>", Escaped(&tick.label))?;
            }
        }
        AxisSide::Left => {
            writeln!(f, r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{line}"/>"#, num(o), num(r0), num(o), num(r1))?;
            for tick in &axis.ticks {
                let y = num(tick.position);
                writeln!(f, r#"<line x1="{}" y1="{y}" x2="{}" y2="{y}" stroke="{line}"/>"#, num(o - TICK_SIZE), num(o))?;
                writeln!(
                    f,
                    r#"<text x="{}" y="{}" text-anchor="{}">{}</text>"#,
                    num(o - TICK_SIZE - 3.0),
                    num(tick.position + 4.0),
                    axis.label_anchor.as_str(),
                    Escaped(&tick.label)
                )?;
            }
        }
    }
    writeln!(f, "</g>")
}

fn write_legend(f: &mut Formatter<'_>, legend: &Legend, theme: &Theme) -> fmt::Result {
    writeln!(f, r#"<g class="legend" role="list" aria-label="{}">"#, Legend::LABEL)?;
    for shape in legend.shapes(theme) {
        write_shape(f, &shape)?;
    }
    writeln!(f, "</g>")
}

fn write_shape(f: &mut Formatter<'_>, shape: &Shape) -> fmt::Result {
    match shape {
        Shape::Path { path, paint, label } => {
            write!(f, r#"<path d="{}""#, path.to_svg_data())?;
            write_paint(f, paint)?;
            write_label(f, label.as_deref())?;
            writeln!(f, "/>")
        }
        Shape::Rect { rect, paint, label } => {
            write!(
                f,
                r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                num(rect.x),
                num(rect.y),
                num(rect.width),
                num(rect.height)
            )?;
            write_paint(f, paint)?;
            write_label(f, label.as_deref())?;
            writeln!(f, "/>")
        }
        Shape::Circle { cx, cy, r, paint, label } => {
            write!(f, r#"<circle cx="{}" cy="{}" r="{}""#, num(*cx), num(*cy), num(*r))?;
            write_paint(f, paint)?;
            write_label(f, label.as_deref())?;
            writeln!(f, "/>")
        }
        Shape::Line { x1, y1, x2, y2, paint } => {
            write!(f, r#"<line x1="{}" y1="{}" x2="{}" y2="{}""#, num(*x1), num(*y1), num(*x2), num(*y2))?;
            write_paint(f, paint)?;
            writeln!(f, "/>")
        }
        Shape::Text { x, y, text, anchor, rotate, size, color } => {
            let (x, y) = (num(*x), num(*y));
            write!(f, r#"<text x="{x}" y="{y}" font-size="{}" fill="{}""#, num(*size), color.to_hex())?;
            if *anchor != TextAnchor::Start {
                write!(f, r#" text-anchor="{}""#, anchor.as_str())?;
            }
            if *rotate != 0.0 {
                write!(f, r#" transform="rotate({} {x} {y})""#, num(*rotate))?;
            }
            writeln!(f, ">{}</text>", Escaped(text))
        }
    }
}

fn write_paint(f: &mut Formatter<'_>, paint: &Paint) -> fmt::Result {
    write!(f, r#" fill="{}""#, color_or_none(paint.fill))?;
    let fill_alpha = paint.fill_opacity * paint.fill.map_or(1.0, |c| c.alpha_f());
    if paint.fill.is_some() && fill_alpha < 1.0 {
        write!(f, r#" fill-opacity="{}""#, num(fill_alpha))?;
    }
    if let Some(stroke) = paint.stroke {
        write!(f, r#" stroke="{}" stroke-width="{}""#, stroke.to_hex(), num(paint.stroke_width))?;
        let alpha = paint.stroke_opacity * stroke.alpha_f();
        if alpha < 1.0 {
            write!(f, r#" stroke-opacity="{}""#, num(alpha))?;
        }
    }
    Ok(())
}

fn write_label(f: &mut Formatter<'_>, label: Option<&str>) -> fmt::Result {
    match label {
        Some(l) => write!(f, r#" role="img" aria-label="{}""#, Escaped(l)),
        None => Ok(()),
    }
}

fn color_or_none(c: Option<Color>) -> String {
    c.map_or_else(|| "none".to_string(), |c| c.to_hex())
}

/// XML-escaped text or attribute value.
struct Escaped<'a>(&'a str);

impl Display for Escaped<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for ch in self.0.chars() {
            match ch {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                '\'' => f.write_str("&apos;")?,
                c => write!(f, "{c}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{BarLayout, LineLayout, TimeSeriesLayout};
    use crate::config::ChartConfig;
    use crate::series::{CategoryRow, Series};
    use chrono::{TimeZone, Utc};

    fn line_svg() -> String {
        let day = |d| Utc.with_ymd_and_hms(2025, 8, d, 0, 0, 0).unwrap();
        let series = vec![Series::from_pairs("AAPL", [(day(1), 100.0), (day(2), 150.0), (day(3), 120.0)])];
        let layout = LineLayout::new(&series, &ChartConfig::default()).unwrap();
        to_svg(&layout.render(layout.base_x()))
    }

    #[test]
    fn document_is_labelled_and_clipped() {
        let svg = line_svg();
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"1100\" height=\"360\""));
        assert!(svg.contains("aria-label=\"Interactive line chart showing data trends over time\""));
        assert!(svg.contains("<clipPath id=\"plot-area\"><rect x=\"48\" y=\"20\" width=\"1028\" height=\"304\"/>"));
        assert!(svg.contains("clip-path=\"url(#plot-area)\""));
        assert!(svg.contains("aria-label=\"AAPL data series\""));
        assert!(svg.contains("aria-label=\"Legend\""));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn line_paths_are_unfilled() {
        let svg = line_svg();
        let path = svg.lines().find(|l| l.starts_with("<path")).unwrap();
        assert!(path.contains("fill=\"none\""));
        assert!(path.contains("stroke-width=\"2\""));
        assert!(path.contains("d=\"M48,"));
    }

    #[test]
    fn text_is_escaped() {
        let rows = vec![CategoryRow::new("C & C++ <legacy>", 3.0)];
        let layout = BarLayout::new(&rows, &ChartConfig::default()).unwrap();
        let svg = to_svg(&layout.render());
        assert!(svg.contains("C &amp; C++ &lt;legacy&gt;"));
        assert!(!svg.contains("<legacy>"));
        assert!(svg.contains("transform=\"rotate(-45 "));
    }

    #[test]
    fn translucent_paint_writes_opacity() {
        let mut out = String::new();
        let paint = Paint::fill(Color::from_rgb(1, 2, 3)).with_fill_opacity(0.9);
        struct P(Paint);
        impl Display for P {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                write_paint(f, &self.0)
            }
        }
        use std::fmt::Write;
        write!(out, "{}", P(paint)).unwrap();
        assert_eq!(out, " fill=\"#010203\" fill-opacity=\"0.9\"");
    }
}
