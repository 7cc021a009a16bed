// File: crates/chart-engine/tests/properties.rs
// Purpose: Behavioral properties of the transforms, nearest-point lookup, zoom clamping and coalescing.

use std::time::{Duration, Instant};

use chart_engine::coalesce::EventCoalescer;
use chart_engine::transform::normalize_all;
use chart_engine::zoom::ZoomConfig;
use chart_engine::{
    max_stacked_total, nearest_point, normalize, stack, ChartMode, Series, Timestamp, ZoomController, ZoomGesture,
};
use chrono::{Duration as Span, TimeZone, Utc};

fn t(days: f64) -> Timestamp {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Span::milliseconds((days * 86_400_000.0) as i64)
}

fn wavy(id: &str, n: usize, phase: f64) -> Series {
    Series::from_pairs(id, (0..n).map(|i| (t(i as f64), 50.0 + 40.0 * (i as f64 * 0.7 + phase).sin())))
}

#[test]
fn absolute_normalization_is_identity() {
    for s in [wavy("a", 1, 0.0), wavy("b", 12, 1.3), Series::from_pairs("z", [(t(0.0), 0.0), (t(1.0), -4.0)])] {
        assert_eq!(normalize(&s, ChartMode::Absolute), s);
    }
}

#[test]
fn bands_are_contiguous_and_sized_by_value() {
    // b is missing some timestamps; absent values contribute zero-height bands
    let a = wavy("a", 10, 0.0);
    let b = Series::from_pairs("b", (0..10).step_by(3).map(|i| (t(i as f64), i as f64 + 1.0)));
    let c = wavy("c", 7, 2.0);
    let all = [a, b, c];
    let frames = stack(&all);
    assert_eq!(frames.len(), 10);
    for frame in &frames {
        assert_eq!(frame.bands.len(), all.len());
        assert_eq!(frame.bands[0].start, 0.0);
        for (i, band) in frame.bands.iter().enumerate() {
            let expected = all[i].value_at(frame.x).unwrap_or(0.0);
            assert!((band.end - band.start - expected).abs() < 1e-9);
            if i > 0 {
                assert_eq!(band.start, frame.bands[i - 1].end);
            }
        }
    }
}

#[test]
fn nearest_point_picks_closer_and_clamps() {
    let s = Series::from_pairs("s", [(t(0.0), 10.0), (t(2.0), 30.0)]);
    assert_eq!(nearest_point(&s, t(0.4)).unwrap().y, 10.0);
    assert_eq!(nearest_point(&s, t(1.6)).unwrap().y, 30.0);
    assert_eq!(nearest_point(&s, t(-5.0)).unwrap().y, 10.0);
    assert_eq!(nearest_point(&s, t(100.0)).unwrap().y, 30.0);
}

#[test]
fn zoom_never_leaves_its_extents() {
    let mut zoom = ZoomController::new(ZoomConfig {
        scale_extent: [1.0, 8.0],
        extent: [0.0, 1000.0],
        translate_extent: [0.0, 1000.0],
    });
    let k = zoom.apply_gesture(ZoomGesture::Scale { factor: 20.0, anchor_x: 400.0 }).scale_factor;
    assert_eq!(k, 8.0);

    for dx in [-10_000.0, -333.0, 50.0, 10_000.0, -1.0] {
        let t = zoom.apply_gesture(ZoomGesture::Pan { dx });
        assert!(t.invert_x(0.0) >= -1e-9, "left edge escaped: {t:?}");
        assert!(t.invert_x(1000.0) <= 1000.0 + 1e-9, "right edge escaped: {t:?}");
    }
    let t = zoom.apply_gesture(ZoomGesture::Pan { dx: 10_000.0 });
    assert_eq!(t.translate_x, 0.0);
}

#[test]
fn five_quick_calls_fire_once_with_the_last_args() {
    let mut coalescer = EventCoalescer::new();
    let window = Duration::from_millis(16);
    let t0 = Instant::now();
    for i in 0..5u64 {
        coalescer.schedule("hover", i + 1, window, t0 + Duration::from_millis(i * 2));
    }
    let mut calls = Vec::new();
    coalescer.poll(t0 + Duration::from_millis(40), |_, args| calls.push(args));
    assert_eq!(calls, vec![5]);
}

#[test]
fn stacked_scenario_tops_out_at_25() {
    let a = Series::from_pairs("A", [(t(0.0), 10.0), (t(1.0), 20.0)]);
    let b = Series::from_pairs("B", [(t(0.0), 5.0), (t(1.0), 5.0)]);
    let frames = stack(&[a, b]);
    let spans: Vec<Vec<(f64, f64)>> =
        frames.iter().map(|f| f.bands.iter().map(|b| (b.start, b.end)).collect()).collect();
    assert_eq!(spans, vec![vec![(0.0, 10.0), (10.0, 15.0)], vec![(0.0, 20.0), (20.0, 25.0)]]);
    assert_eq!(max_stacked_total(&frames), 25.0);
}

#[test]
fn percentage_mode_is_change_from_first_point() {
    let s = Series::from_pairs("s", [(t(0.0), 100.0), (t(1.0), 150.0)]);
    let out = normalize_all(&[s], ChartMode::Percentage).unwrap();
    let ys: Vec<f64> = out[0].values().iter().map(|p| p.y()).collect();
    assert_eq!(ys, vec![0.0, 50.0]);
}
