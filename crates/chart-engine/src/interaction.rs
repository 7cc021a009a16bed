// File: crates/chart-engine/src/interaction.rs
// Summary: One interactive time-series chart: pointer and zoom input, coalesced hover/view events, current frame.

use std::time::{Duration, Instant};

use crate::chart::{ChartFrame, ChartKind, LineLayout, StackedLayout, TimeSeriesLayout, TooltipState};
use crate::coalesce::EventCoalescer;
use crate::config::ChartConfig;
use crate::error::{contract_violation, Result};
use crate::geometry::clamp;
use crate::scale::{Pixel, Scale, TimeScale};
use crate::series::{ChartMode, Series, Timestamp};
use crate::types::Dimensions;
use crate::zoom::{ZoomController, ZoomGesture, ZoomTransform};

/// Coalescing keys. Each intent keeps its own trailing-edge window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    Tooltip,
    ViewTransform,
}

/// What the host hears back from [`InteractiveChart`].
#[derive(Clone, Debug, PartialEq)]
pub enum ChartEvent {
    /// Tooltip contents, or `None` when it should close.
    Hover(Option<TooltipState>),
    /// Time window now in view.
    ViewChange([Timestamp; 2]),
}

#[derive(Clone, Copy, Debug)]
enum Payload {
    Cursor(Pixel),
    Transform,
}

/// A line or stacked chart plus its view state.
///
/// The host forwards input with the current time and calls [`poll`](Self::poll)
/// once the earliest [`next_deadline`](Self::next_deadline) has passed.
pub struct InteractiveChart {
    series: Vec<Series>,
    config: ChartConfig,
    layout: Box<dyn TimeSeriesLayout>,
    zoom: ZoomController,
    coalescer: EventCoalescer<Intent, Payload>,
    window: Duration,
    x: TimeScale,
    hover: Option<TooltipState>,
    destroyed: bool,
}

fn build_layout(kind: ChartKind, series: &[Series], config: &ChartConfig) -> Result<Box<dyn TimeSeriesLayout>> {
    Ok(match kind {
        ChartKind::Line => Box::new(LineLayout::new(series, config)?),
        ChartKind::Stacked => Box::new(StackedLayout::new(series, config)?),
        other => return Err(contract_violation(format!("{other:?} is not a time-series chart"))),
    })
}

impl InteractiveChart {
    pub fn line(series: &[Series], config: &ChartConfig) -> Result<Self> {
        Self::new(ChartKind::Line, series, config)
    }

    pub fn stacked(series: &[Series], config: &ChartConfig) -> Result<Self> {
        Self::new(ChartKind::Stacked, series, config)
    }

    pub fn new(kind: ChartKind, series: &[Series], config: &ChartConfig) -> Result<Self> {
        config.validate()?;
        let layout = build_layout(kind, series, config)?;
        let zoom = ZoomController::new(config.zoom_config(layout.dimensions()));
        let x = *layout.base_x();
        Ok(Self {
            series: series.to_vec(),
            config: config.clone(),
            layout,
            zoom,
            coalescer: EventCoalescer::new(),
            window: config.coalesce_window(),
            x,
            hover: None,
            destroyed: false,
        })
    }

    pub fn kind(&self) -> ChartKind { self.layout.kind() }
    pub fn layout(&self) -> &dyn TimeSeriesLayout { self.layout.as_ref() }
    pub fn transform(&self) -> ZoomTransform { self.zoom.transform() }
    /// The x-scale the last view update produced.
    pub fn x_scale(&self) -> &TimeScale { &self.x }
    pub fn hover(&self) -> Option<&TooltipState> { self.hover.as_ref() }
    pub fn is_destroyed(&self) -> bool { self.destroyed }

    /// When the host should call [`poll`](Self::poll) next.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.coalescer.next_deadline()
    }

    /// Pointer moved to `x` (pixels); clamped to the drawable area.
    pub fn pointer_move(&mut self, x: Pixel, now: Instant) {
        if self.destroyed || !x.is_finite() {
            return;
        }
        let [lo, hi] = self.layout.dimensions().x_range();
        let x = clamp(x, lo, hi);
        self.coalescer.schedule(Intent::Tooltip, Payload::Cursor(x), self.window, now);
    }

    /// Pointer left the chart: the tooltip closes now and any pending
    /// tooltip update is dropped.
    pub fn pointer_leave(&mut self) -> ChartEvent {
        self.coalescer.cancel(Intent::Tooltip);
        self.hover = None;
        ChartEvent::Hover(None)
    }

    /// Apply a pan/zoom gesture. The transform changes immediately; the
    /// rescaled view is published on a later [`poll`](Self::poll).
    pub fn gesture(&mut self, gesture: ZoomGesture, now: Instant) -> ZoomTransform {
        if self.destroyed {
            return self.zoom.transform();
        }
        let t = self.zoom.apply_gesture(gesture);
        self.coalescer.schedule(Intent::ViewTransform, Payload::Transform, self.window, now);
        t
    }

    /// Run every update whose window has closed.
    pub fn poll(&mut self, now: Instant) -> Vec<ChartEvent> {
        let mut due = Vec::new();
        self.coalescer.poll(now, |intent, payload| due.push((intent, payload)));

        let mut events = Vec::with_capacity(due.len());
        for (intent, payload) in due {
            match (intent, payload) {
                (Intent::Tooltip, Payload::Cursor(x)) => {
                    let tip = self.layout.tooltip(&self.x, x);
                    self.hover = Some(tip.clone());
                    events.push(ChartEvent::Hover(Some(tip)));
                }
                (Intent::ViewTransform, _) => match self.zoomed_x() {
                    Ok(x) => {
                        self.x = x;
                        events.push(ChartEvent::ViewChange(x.domain()));
                    }
                    Err(e) => tracing::warn!(error = %e, "view update skipped"),
                },
                (intent, payload) => tracing::warn!(?intent, ?payload, "mismatched coalesced payload"),
            }
        }
        events
    }

    fn zoomed_x(&self) -> Result<TimeScale> {
        match self.zoom.rescale(&self.layout.base_scale())? {
            Scale::Temporal(x) => Ok(x),
            other => Err(contract_violation(format!("zoomed a {:?} scale", other.kind()))),
        }
    }

    /// The chart as it should look now, tooltip included.
    pub fn frame(&self) -> ChartFrame {
        let frame = self.layout.render(&self.x);
        match &self.hover {
            Some(tip) => frame.with_tooltip(tip, self.layout.mode(), self.config.tooltip.max_items),
            None => frame,
        }
    }

    /// Replace the data. The zoom transform is kept and re-applied to the
    /// new base scale; an open tooltip is closed.
    pub fn set_data(&mut self, series: &[Series]) -> Result<()> {
        let config = self.config.clone();
        self.rebuild(series, &config)?;
        self.series = series.to_vec();
        Ok(())
    }

    pub fn set_mode(&mut self, mode: ChartMode) -> Result<()> {
        let config = ChartConfig { mode, ..self.config.clone() };
        let series = std::mem::take(&mut self.series);
        let rebuilt = self.rebuild(&series, &config);
        self.series = series;
        rebuilt?;
        self.config = config;
        Ok(())
    }

    /// New outer size; the zoom extents follow it.
    pub fn resize(&mut self, dimensions: Dimensions) -> Result<()> {
        let config = ChartConfig { dimensions, ..self.config.clone() };
        let series = std::mem::take(&mut self.series);
        let rebuilt = self.rebuild(&series, &config);
        self.series = series;
        rebuilt?;
        self.zoom.set_config(config.zoom_config(&dimensions));
        self.config = config;
        self.x = self.zoomed_x()?;
        Ok(())
    }

    fn rebuild(&mut self, series: &[Series], config: &ChartConfig) -> Result<()> {
        if self.destroyed {
            return Err(contract_violation("chart used after destroy()"));
        }
        self.layout = build_layout(self.layout.kind(), series, config)?;
        self.coalescer.cancel(Intent::Tooltip);
        self.hover = None;
        self.x = self.zoomed_x()?;
        Ok(())
    }

    /// Tear down: pending updates are cancelled and later input is ignored.
    pub fn destroy(&mut self) {
        self.coalescer.cancel_all();
        self.hover = None;
        self.destroyed = true;
        tracing::debug!(kind = ?self.layout.kind(), "chart destroyed");
    }
}

impl Drop for InteractiveChart {
    fn drop(&mut self) {
        self.coalescer.cancel_all();
    }
}

impl std::fmt::Debug for InteractiveChart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractiveChart")
            .field("kind", &self.layout.kind())
            .field("transform", &self.zoom.transform())
            .field("hover", &self.hover)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}
