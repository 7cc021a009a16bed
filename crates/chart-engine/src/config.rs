// File: crates/chart-engine/src/config.rs
// Summary: Chart configuration (sizes, zoom bounds, coalescing, axis/bar/bubble/legend settings) loaded from JSON5.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ChartError, Result};
use crate::series::ChartMode;
use crate::theme::Theme;
use crate::types::{Dimensions, Margin};
use crate::zoom::ZoomConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomSettings {
    /// `[min, max]` zoom factor.
    pub scale_extent: [f64; 2],
}

impl Default for ZoomSettings {
    fn default() -> Self {
        Self { scale_extent: [1.0, 8.0] }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Coalescing window for pointer and zoom events.
    pub coalesce_window_ms: u64,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self { coalesce_window_ms: 16 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisSettings {
    pub time_ticks: usize,
    pub value_ticks: usize,
}

impl Default for AxisSettings {
    fn default() -> Self {
        Self { time_ticks: 6, value_ticks: 5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarSettings {
    pub padding_inner: f64,
    pub padding_outer: f64,
}

impl Default for BarSettings {
    fn default() -> Self {
        Self { padding_inner: 0.2, padding_outer: 0.1 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BubbleSettings {
    pub point_padding: f64,
    pub radius_range: [f64; 2],
    /// Extra field holding each row's y value.
    pub y_field: String,
}

impl Default for BubbleSettings {
    fn default() -> Self {
        Self { point_padding: 0.5, radius_range: [6.0, 48.0], y_field: "avgSalary".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendSettings {
    /// Legend's left edge, measured from the chart's right edge.
    pub offset_from_right: f64,
    pub row_height: f64,
}

impl Default for LegendSettings {
    fn default() -> Self {
        Self { offset_from_right: 150.0, row_height: 18.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipSettings {
    /// Rows shown in a time-series tooltip before truncating.
    pub max_items: usize,
    /// Caption for a categorical row's main value.
    pub value_label: String,
    /// Extra fields shown as `$NNk`.
    pub currency_fields: Vec<String>,
}

impl Default for TooltipSettings {
    fn default() -> Self {
        Self {
            max_items: 8,
            value_label: "Postings".to_string(),
            currency_fields: vec!["avgSalary".to_string()],
        }
    }
}

/// Everything a chart needs besides its data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub dimensions: Dimensions,
    /// Fields left out keep the bubble chart's own defaults.
    #[serde(deserialize_with = "bubble_dimensions")]
    pub bubble_dimensions: Dimensions,
    pub mode: ChartMode,
    /// `"dark"` or `"light"`.
    pub theme: String,
    pub zoom: ZoomSettings,
    pub interaction: InteractionSettings,
    pub axis: AxisSettings,
    pub bar: BarSettings,
    pub bubble: BubbleSettings,
    pub legend: LegendSettings,
    pub tooltip: TooltipSettings,
}

#[derive(Deserialize)]
struct PartialMargin {
    top: Option<f64>,
    right: Option<f64>,
    bottom: Option<f64>,
    left: Option<f64>,
}

#[derive(Deserialize)]
struct PartialDimensions {
    width: Option<f64>,
    height: Option<f64>,
    margin: Option<PartialMargin>,
}

fn bubble_dimensions<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<Dimensions, D::Error> {
    let p = PartialDimensions::deserialize(de)?;
    let d = Dimensions::bubble();
    let m = p.margin.map_or(d.margin, |m| Margin {
        top: m.top.unwrap_or(d.margin.top),
        right: m.right.unwrap_or(d.margin.right),
        bottom: m.bottom.unwrap_or(d.margin.bottom),
        left: m.left.unwrap_or(d.margin.left),
    });
    Ok(Dimensions::new(p.width.unwrap_or(d.width), p.height.unwrap_or(d.height), m))
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            dimensions: Dimensions::default(),
            bubble_dimensions: Dimensions::bubble(),
            mode: ChartMode::default(),
            theme: "dark".to_string(),
            zoom: ZoomSettings::default(),
            interaction: InteractionSettings::default(),
            axis: AxisSettings::default(),
            bar: BarSettings::default(),
            bubble: BubbleSettings::default(),
            legend: LegendSettings::default(),
            tooltip: TooltipSettings::default(),
        }
    }
}

impl ChartConfig {
    /// Load a JSON5 configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ChartError::Config(format!("failed to read config file '{}': {}", path.display(), e))
        })?;
        json5::from_str(&content).map_err(|e| {
            ChartError::Config(format!("failed to parse config file '{}': {}", path.display(), e))
        })
    }

    /// Parse a JSON5 configuration string.
    pub fn parse(content: &str) -> Result<Self> {
        json5::from_str(content).map_err(|e| ChartError::Config(format!("failed to parse config: {e}")))
    }

    /// Unknown theme names fall back to the default theme.
    pub fn theme(&self) -> Theme {
        Theme::by_name(&self.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %self.theme, "unknown theme; using default");
            Theme::default()
        })
    }

    pub fn coalesce_window(&self) -> Duration {
        Duration::from_millis(self.interaction.coalesce_window_ms)
    }

    pub fn zoom_config(&self, dims: &Dimensions) -> ZoomConfig {
        ZoomConfig::for_dimensions(dims, self.zoom.scale_extent)
    }

    /// Reject settings no chart could be drawn with.
    pub fn validate(&self) -> Result<()> {
        self.dimensions.validate()?;
        self.bubble_dimensions.validate()?;
        let [lo, hi] = self.zoom.scale_extent;
        if !(lo > 0.0 && lo <= hi) {
            return Err(ChartError::Config(format!("zoom.scale_extent must satisfy 0 < min <= max (got [{lo}, {hi}])")));
        }
        let [r0, r1] = self.bubble.radius_range;
        if r0 < 0.0 || r1 < r0 {
            return Err(ChartError::Config(format!("bubble.radius_range must be ascending and non-negative (got [{r0}, {r1}])")));
        }
        Ok(())
    }
}
