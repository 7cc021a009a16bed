// File: crates/demo/src/main.rs
// Summary: Demo renders one chart kind to SVG from CSV or bundled sample data, then replays a scripted interaction session.

mod load;
mod sample;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chart_engine::geometry::Shape;
use chart_engine::{
    to_svg, BarLayout, BubbleLayout, ChartConfig, ChartEvent, ChartFrame, ChartMode, InteractiveChart, Series,
    ZoomGesture,
};
use clap::{Parser, ValueEnum};
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Kind {
    Line,
    Stacked,
    Bar,
    Bubble,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    Absolute,
    Percentage,
}

/// Render a chart to SVG.
#[derive(Parser, Debug)]
#[command(name = "chart-demo")]
#[command(version)]
struct Args {
    /// Chart to draw.
    #[arg(value_enum)]
    kind: Kind,

    /// CSV input: `date,id,value` for line/stacked, `category,value[,field...]` for bar/bubble.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Value mode for line charts (overrides config).
    #[arg(short, long, value_enum)]
    mode: Option<Mode>,

    /// Path to configuration file (JSON5 format).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output SVG path; defaults to target/out/chart_<kind>.svg.
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Skill shown by the bubble chart when using sample data.
    #[arg(long, default_value = "React")]
    skill: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = args.log_level.parse().unwrap_or(Level::INFO);
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("chart_demo={log_level}").parse()?)
        .add_directive(format!("chart_engine={log_level}").parse()?);
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = match &args.config {
        Some(path) => ChartConfig::load(path)?,
        None => ChartConfig::default(),
    };
    if let Some(mode) = args.mode {
        config.mode = match mode {
            Mode::Absolute => ChartMode::Absolute,
            Mode::Percentage => ChartMode::Percentage,
        };
    }
    config.validate()?;

    let frame = match args.kind {
        Kind::Line | Kind::Stacked => {
            let series = match &args.input {
                Some(path) => load::load_series(path)
                    .with_context(|| format!("failed to load CSV '{}'", path.display()))?,
                None if matches!(args.kind, Kind::Line) => sample::stocks(),
                None => sample::frameworks(),
            };
            info!(
                series = series.len(),
                points = series.iter().map(Series::len).sum::<usize>(),
                "Loaded time series"
            );
            let mut chart = match args.kind {
                Kind::Line => InteractiveChart::line(&series, &config)?,
                _ => InteractiveChart::stacked(&series, &config)?,
            };
            run_session(&mut chart);
            chart.frame()
        }
        Kind::Bar => {
            let rows = match &args.input {
                Some(path) => load::load_rows(path)?,
                None => sample::skills(),
            };
            info!(rows = rows.len(), "Loaded categories");
            let layout = BarLayout::new(&rows, &config)?;
            report_hit(layout.render(), |x, y| layout.hit_test(x, y).map(|h| h.lines(&config.tooltip)))
        }
        Kind::Bubble => {
            let (rows, labels) = match &args.input {
                Some(path) => (load::load_rows(path)?, None),
                None => (sample::jobs_for(&args.skill), Some(sample::cities())),
            };
            info!(rows = rows.len(), "Loaded categories");
            let layout = BubbleLayout::new(&rows, labels.as_deref(), &config)?;
            report_hit(layout.render(), |x, y| layout.hit_test(x, y).map(|h| h.lines(&config.tooltip)))
        }
    };

    let out = args.out.unwrap_or_else(|| default_out(args.kind));
    write_svg(&frame, &out)?;
    info!(path = %out.display(), "Wrote chart");
    Ok(())
}

/// Hover across the plot, zoom in twice, pan, then rest the pointer in the middle.
fn run_session(chart: &mut InteractiveChart) {
    let dims = *chart.layout().dimensions();
    let [left, right] = dims.x_range();
    let mid = (left + right) / 2.0;
    let frame_time = Duration::from_millis(4);
    let mut now = Instant::now();

    let mut script: Vec<Step> = (0..12).map(|i| Step::Move(left + (right - left) * i as f64 / 11.0)).collect();
    script.extend([
        Step::Zoom(ZoomGesture::Wheel { delta_y: -300.0, anchor_x: mid }),
        Step::Zoom(ZoomGesture::Scale { factor: 1.5, anchor_x: mid }),
        Step::Zoom(ZoomGesture::Pan { dx: -120.0 }),
        Step::Move(mid),
    ]);

    for step in script {
        match step {
            Step::Move(x) => chart.pointer_move(x, now),
            Step::Zoom(g) => {
                let t = chart.gesture(g, now);
                info!(k = t.scale_factor, tx = t.translate_x, "gesture");
            }
        }
        now += frame_time;
        drain(chart, now);
    }
    // let the last windows close
    if let Some(deadline) = chart.next_deadline() {
        drain(chart, deadline);
    }
}

enum Step {
    Move(f64),
    Zoom(ZoomGesture),
}

fn drain(chart: &mut InteractiveChart, now: Instant) {
    for event in chart.poll(now) {
        match event {
            ChartEvent::Hover(Some(tip)) => {
                let lines = tip.lines(chart.layout().mode(), 3);
                info!(x = tip.cursor_x, tooltip = ?lines, "hover");
            }
            ChartEvent::Hover(None) => info!("hover cleared"),
            ChartEvent::ViewChange([from, to]) => info!(%from, %to, "view changed"),
        }
    }
}

/// Probe each category shape and log what its tooltip would say.
fn report_hit(frame: ChartFrame, hit: impl Fn(f64, f64) -> Option<Vec<String>>) -> ChartFrame {
    for shape in &frame.shapes {
        let (x, y) = match shape {
            Shape::Rect { rect, .. } => (rect.x + rect.width / 2.0, rect.bottom() - 1.0),
            Shape::Circle { cx, cy, .. } => (*cx, *cy),
            _ => continue,
        };
        match hit(x, y) {
            Some(lines) => info!(tooltip = ?lines, "hit"),
            None => warn!(x, y, "no shape under probe"),
        }
    }
    frame
}

fn default_out(kind: Kind) -> PathBuf {
    let name = format!("{kind:?}").to_lowercase();
    PathBuf::from("target/out").join(format!("chart_{name}.svg"))
}

fn write_svg(frame: &ChartFrame, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    std::fs::write(path, to_svg(frame)).with_context(|| format!("writing {}", path.display()))
}
