// File: crates/chart-engine/src/theme.rs
// Summary: Colors, light/dark themes and the categorical series palette.

use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a }
    }
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_argb(255, r, g, b)
    }
    pub const fn from_hex(hex: u32) -> Self {
        Self::from_rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// `#rrggbb`; alpha is carried separately as opacity.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn alpha_f(&self) -> f64 {
        self.a as f64 / 255.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    pub background: Color,
    pub axis_line: Color,
    pub axis_label: Color,
    pub legend_label: Color,
    pub crosshair: Color,
    pub crosshair_opacity: f64,
    /// Value labels above bars and inside bubbles.
    pub shape_label: Color,
    /// Outline around bars and bubbles.
    pub shape_stroke: Color,
    pub shape_stroke_opacity: f64,
    pub shape_fill_opacity: f64,
    pub area_fill_opacity: f64,
    pub area_stroke_opacity: f64,
    pub line_width: f64,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark",
            background: Color::from_rgb(10, 10, 10),
            axis_line: Color::from_rgb(163, 163, 163),
            axis_label: Color::from_rgb(212, 212, 212),
            legend_label: Color::from_rgb(212, 212, 212),
            crosshair: Color::from_rgb(255, 255, 255),
            crosshair_opacity: 0.2,
            shape_label: Color::from_rgb(255, 255, 255),
            shape_stroke: Color::from_rgb(255, 255, 255),
            shape_stroke_opacity: 0.15,
            shape_fill_opacity: 0.9,
            area_fill_opacity: 0.7,
            area_stroke_opacity: 0.8,
            line_width: 2.0,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light",
            background: Color::from_rgb(250, 250, 252),
            axis_line: Color::from_rgb(60, 60, 70),
            axis_label: Color::from_rgb(20, 20, 30),
            legend_label: Color::from_rgb(40, 40, 50),
            crosshair: Color::from_rgb(30, 30, 40),
            crosshair_opacity: 0.25,
            shape_label: Color::from_rgb(20, 20, 30),
            shape_stroke: Color::from_rgb(20, 20, 30),
            shape_stroke_opacity: 0.2,
            shape_fill_opacity: 0.9,
            area_fill_opacity: 0.7,
            area_stroke_opacity: 0.8,
            line_width: 2.0,
        }
    }

    /// Look a preset up by name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "light" => Some(Self::light()),
            "dark" => Some(Self::dark()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

/// Tableau 10.
pub const TABLEAU10: [Color; 10] = [
    Color::from_hex(0x4e79a7),
    Color::from_hex(0xf28e2c),
    Color::from_hex(0xe15759),
    Color::from_hex(0x76b7b2),
    Color::from_hex(0x59a14f),
    Color::from_hex(0xedc949),
    Color::from_hex(0xaf7aa1),
    Color::from_hex(0xff9da7),
    Color::from_hex(0x9c755f),
    Color::from_hex(0xbab0ab),
];

/// Ordinal color assignment: ids get palette entries in first-seen order,
/// wrapping after ten.
#[derive(Clone, Debug, Default)]
pub struct Palette {
    assigned: HashMap<String, usize>,
}

impl Palette {
    pub fn new() -> Self { Self::default() }

    /// Pre-assign colors for `ids` in order.
    pub fn with_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        let mut p = Self::new();
        for id in ids {
            p.color(id);
        }
        p
    }

    pub fn color(&mut self, id: &str) -> Color {
        let next = self.assigned.len();
        let i = *self.assigned.entry(id.to_string()).or_insert(next);
        TABLEAU10[i % TABLEAU10.len()]
    }

    /// Color for an id seen before; falls back to the first entry.
    pub fn get(&self, id: &str) -> Color {
        self.assigned.get(id).map_or(TABLEAU10[0], |&i| TABLEAU10[i % TABLEAU10.len()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_is_stable_per_id() {
        let mut p = Palette::new();
        let a = p.color("AAPL");
        let b = p.color("MSFT");
        assert_eq!(a.to_hex(), "#4e79a7");
        assert_eq!(b.to_hex(), "#f28e2c");
        assert_eq!(p.color("AAPL"), a);
        assert_eq!(p.get("MSFT"), b);
    }

    #[test]
    fn palette_wraps_after_ten() {
        let ids: Vec<String> = (0..11).map(|i| format!("s{i}")).collect();
        let p = Palette::with_ids(ids.iter().map(String::as_str));
        assert_eq!(p.get("s10"), p.get("s0"));
    }

    #[test]
    fn themes_resolve_by_name() {
        assert_eq!(Theme::by_name("DARK").map(|t| t.name), Some("dark"));
        assert!(Theme::by_name("neon").is_none());
    }
}
