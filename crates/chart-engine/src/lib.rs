// File: crates/chart-engine/src/lib.rs
// Summary: Headless charting engine entry point; exports scales, transforms, layouts, interaction and SVG output.

pub mod error;
pub mod types;
pub mod series;
pub mod scale;
pub mod transform;
pub mod nearest;
pub mod zoom;
pub mod coalesce;
pub mod axis;
pub mod geometry;
pub mod theme;
pub mod chart;
pub mod interaction;
pub mod svg;
pub mod config;

pub use error::{ChartError, InvalidData, Result};
pub use types::{Dimensions, Margin};
pub use series::{CategoryRow, ChartMode, FieldValue, Point, Series, Timestamp};
pub use scale::{DomainValue, Scale, ScaleKind};
pub use transform::{max_stacked_total, normalize, stack, StackedFrame};
pub use nearest::{nearest_point, NearestPoint};
pub use zoom::{ZoomController, ZoomGesture, ZoomTransform};
pub use coalesce::EventCoalescer;
pub use chart::{BarLayout, BubbleLayout, ChartFrame, ChartKind, LineLayout, StackedLayout, TimeSeriesLayout, TooltipState};
pub use interaction::{ChartEvent, Intent, InteractiveChart};
pub use theme::{Color, Palette, Theme};
pub use svg::to_svg;
pub use config::ChartConfig;
