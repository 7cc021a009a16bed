// File: crates/chart-engine/src/geometry.rs
// Summary: Pixel-space primitives: rects, path commands, monotone-X curves and drawable shapes.

use std::fmt::Write as _;

use crate::theme::Color;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
    pub fn right(&self) -> f64 { self.x + self.width }
    pub fn bottom(&self) -> f64 { self.y + self.height }

    /// Closed on all four edges.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }
}

#[inline]
pub fn clamp<T: PartialOrd>(v: T, lo: T, hi: T) -> T {
    if v < lo { lo } else if v > hi { hi } else { v }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    /// Cubic bezier: two control points, then the end point.
    CurveTo(f64, f64, f64, f64, f64, f64),
    Close,
}

/// A sequence of drawing commands in pixel space.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    pub fn new() -> Self { Self::default() }
    pub fn commands(&self) -> &[PathCommand] { &self.commands }
    pub fn is_empty(&self) -> bool { self.commands.is_empty() }

    pub fn move_to(&mut self, x: f64, y: f64) { self.commands.push(PathCommand::MoveTo(x, y)); }
    pub fn line_to(&mut self, x: f64, y: f64) { self.commands.push(PathCommand::LineTo(x, y)); }
    pub fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        self.commands.push(PathCommand::CurveTo(x1, y1, x2, y2, x, y));
    }
    pub fn close(&mut self) { self.commands.push(PathCommand::Close); }

    /// SVG path data (`d` attribute), coordinates rounded to 3 decimals.
    pub fn to_svg_data(&self) -> String {
        let mut out = String::with_capacity(self.commands.len() * 24);
        for cmd in &self.commands {
            // Writing into a String cannot fail.
            let _ = match *cmd {
                PathCommand::MoveTo(x, y) => write!(out, "M{},{}", fmt(x), fmt(y)),
                PathCommand::LineTo(x, y) => write!(out, "L{},{}", fmt(x), fmt(y)),
                PathCommand::CurveTo(x1, y1, x2, y2, x, y) => write!(
                    out,
                    "C{},{},{},{},{},{}",
                    fmt(x1), fmt(y1), fmt(x2), fmt(y2), fmt(x), fmt(y)
                ),
                PathCommand::Close => write!(out, "Z"),
            };
        }
        out
    }
}

/// Number formatting for SVG output: at most 3 decimals, no trailing zeros.
pub(crate) fn fmt(v: f64) -> String {
    let r = (v * 1000.0).round() / 1000.0;
    let r = if r == 0.0 { 0.0 } else { r };
    let s = format!("{r:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    s.to_string()
}

// ---- monotone X -------------------------------------------------------------

#[inline]
fn sign(v: f64) -> f64 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

/// Walks points and emits a monotone cubic interpolation (Fritsch-Carlson),
/// which never overshoots between samples when x is increasing.
struct MonotoneX<'a> {
    path: &'a mut Path,
    /// First point becomes a line-to instead of a move-to (area bottom edge).
    continue_line: bool,
    state: u8,
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    t0: f64,
}

impl<'a> MonotoneX<'a> {
    fn new(path: &'a mut Path, continue_line: bool) -> Self {
        Self { path, continue_line, state: 0, x0: f64::NAN, y0: f64::NAN, x1: f64::NAN, y1: f64::NAN, t0: f64::NAN }
    }

    fn slope3(&self, x2: f64, y2: f64) -> f64 {
        let h0 = self.x1 - self.x0;
        let h1 = x2 - self.x1;
        let d0 = if h0 != 0.0 { h0 } else if h1 < 0.0 { -0.0 } else { 0.0 };
        let d1 = if h1 != 0.0 { h1 } else if h0 < 0.0 { -0.0 } else { 0.0 };
        let s0 = (self.y1 - self.y0) / d0;
        let s1 = (y2 - self.y1) / d1;
        let p = (s0 * h1 + s1 * h0) / (h0 + h1);
        if s0.is_nan() || s1.is_nan() || p.is_nan() {
            return 0.0;
        }
        let t = (sign(s0) + sign(s1)) * s0.abs().min(s1.abs()).min(0.5 * p.abs());
        if t.is_nan() { 0.0 } else { t }
    }

    fn slope2(&self, t: f64) -> f64 {
        let h = self.x1 - self.x0;
        if h != 0.0 { (3.0 * (self.y1 - self.y0) / h - t) / 2.0 } else { t }
    }

    fn bezier(&mut self, t0: f64, t1: f64) {
        let dx = (self.x1 - self.x0) / 3.0;
        self.path.curve_to(
            self.x0 + dx,
            self.y0 + dx * t0,
            self.x1 - dx,
            self.y1 - dx * t1,
            self.x1,
            self.y1,
        );
    }

    fn point(&mut self, x: f64, y: f64) {
        if x == self.x1 && y == self.y1 {
            return;
        }
        let mut t1 = f64::NAN;
        match self.state {
            0 => {
                self.state = 1;
                if self.continue_line { self.path.line_to(x, y) } else { self.path.move_to(x, y) }
            }
            1 => self.state = 2,
            2 => {
                self.state = 3;
                t1 = self.slope3(x, y);
                let t0 = self.slope2(t1);
                self.bezier(t0, t1);
            }
            _ => {
                t1 = self.slope3(x, y);
                self.bezier(self.t0, t1);
            }
        }
        self.x0 = self.x1;
        self.x1 = x;
        self.y0 = self.y1;
        self.y1 = y;
        self.t0 = t1;
    }

    /// Returns how many distinct points were seen (capped at 3).
    fn end(mut self) -> u8 {
        match self.state {
            2 => self.path.line_to(self.x1, self.y1),
            3 => {
                let t1 = self.slope2(self.t0);
                self.bezier(self.t0, t1);
            }
            _ => {}
        }
        self.state
    }
}

/// Smooth line through `points` (pixel space, x ascending).
pub fn monotone_line(points: &[(f64, f64)]) -> Path {
    let mut path = Path::new();
    let mut curve = MonotoneX::new(&mut path, false);
    for &(x, y) in points {
        curve.point(x, y);
    }
    if curve.end() == 1 {
        path.close();
    }
    path
}

/// Closed band between `upper` and `lower` (same x positions), both edges smoothed.
pub fn monotone_area(upper: &[(f64, f64)], lower: &[(f64, f64)]) -> Path {
    let mut path = Path::new();
    if upper.is_empty() {
        return path;
    }
    let mut top = MonotoneX::new(&mut path, false);
    for &(x, y) in upper {
        top.point(x, y);
    }
    top.end();
    let mut bottom = MonotoneX::new(&mut path, true);
    for &(x, y) in lower.iter().rev() {
        bottom.point(x, y);
    }
    bottom.end();
    path.close();
    path
}

// ---- shapes -----------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// Styling shared by drawable shapes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paint {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    pub fill_opacity: f64,
    pub stroke_opacity: f64,
}

impl Paint {
    pub fn fill(color: Color) -> Self {
        Self { fill: Some(color), stroke: None, stroke_width: 0.0, fill_opacity: 1.0, stroke_opacity: 1.0 }
    }
    pub fn stroke(color: Color, width: f64) -> Self {
        Self { fill: None, stroke: Some(color), stroke_width: width, fill_opacity: 1.0, stroke_opacity: 1.0 }
    }
    pub fn with_stroke(mut self, color: Color, width: f64) -> Self {
        self.stroke = Some(color);
        self.stroke_width = width;
        self
    }
    pub fn with_fill_opacity(mut self, opacity: f64) -> Self {
        self.fill_opacity = opacity;
        self
    }
    pub fn with_stroke_opacity(mut self, opacity: f64) -> Self {
        self.stroke_opacity = opacity;
        self
    }
    pub fn with_opacity(self, opacity: f64) -> Self {
        self.with_fill_opacity(opacity).with_stroke_opacity(opacity)
    }
}

/// One drawable element. `label` is the accessible description, if any.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Path { path: Path, paint: Paint, label: Option<String> },
    Rect { rect: Rect, paint: Paint, label: Option<String> },
    Circle { cx: f64, cy: f64, r: f64, paint: Paint, label: Option<String> },
    Line { x1: f64, y1: f64, x2: f64, y2: f64, paint: Paint },
    Text {
        x: f64,
        y: f64,
        text: String,
        anchor: TextAnchor,
        /// Degrees, around (x, y).
        rotate: f64,
        size: f64,
        color: Color,
    },
}

impl Shape {
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Path { label, .. } | Self::Rect { label, .. } | Self::Circle { label, .. } => {
                label.as_deref()
            }
            Self::Line { .. } | Self::Text { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_points_give_a_straight_segment() {
        let p = monotone_line(&[(0.0, 0.0), (10.0, 5.0)]);
        assert_eq!(p.to_svg_data(), "M0,0L10,5");
    }

    #[test]
    fn single_point_closes() {
        let p = monotone_line(&[(3.0, 4.0)]);
        assert_eq!(p.to_svg_data(), "M3,4Z");
    }

    #[test]
    fn curve_passes_through_every_sample() {
        let pts = [(0.0, 10.0), (10.0, 0.0), (20.0, 10.0), (30.0, 5.0)];
        let p = monotone_line(&pts);
        let ends: Vec<(f64, f64)> = p
            .commands()
            .iter()
            .filter_map(|c| match *c {
                PathCommand::MoveTo(x, y) | PathCommand::LineTo(x, y) => Some((x, y)),
                PathCommand::CurveTo(_, _, _, _, x, y) => Some((x, y)),
                PathCommand::Close => None,
            })
            .collect();
        assert_eq!(ends, pts.to_vec());
    }

    #[test]
    fn monotone_data_does_not_overshoot() {
        let pts = [(0.0, 0.0), (10.0, 1.0), (20.0, 100.0), (30.0, 101.0)];
        let p = monotone_line(&pts);
        for c in p.commands() {
            if let PathCommand::CurveTo(_, y1, _, y2, _, _) = *c {
                assert!((0.0..=101.0).contains(&y1));
                assert!((0.0..=101.0).contains(&y2));
            }
        }
    }

    #[test]
    fn area_is_closed() {
        let upper = [(0.0, 1.0), (5.0, 2.0)];
        let lower = [(0.0, 10.0), (5.0, 10.0)];
        let d = monotone_area(&upper, &lower).to_svg_data();
        assert_eq!(d, "M0,1L5,2L5,10L0,10Z");
    }

    #[test]
    fn svg_numbers_are_compact() {
        assert_eq!(fmt(1.0), "1");
        assert_eq!(fmt(1.23456), "1.235");
        assert_eq!(fmt(-0.0001), "0");
    }
}
