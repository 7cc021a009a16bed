// File: crates/chart-engine/src/scale.rs
// Summary: Domain -> range scales (continuous, time, band, point, sqrt) and the factory functions building them.

use std::collections::HashMap;

use chrono::Duration;

use crate::error::{ChartError, Result};
use crate::series::{from_millis, to_millis, Timestamp};

mod ticks;

pub use ticks::{tick_increment, TimeInterval};

/// Data value on the x axis.
pub type Logical = f64;
/// Pixel coordinate.
pub type Pixel = f64;

/// Which family a [`Scale`] belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScaleKind {
    Continuous,
    Temporal,
    Band,
    Point,
    Sqrt,
}

/// A value a scale accepts, or one an invertible scale gives back.
#[derive(Clone, Debug, PartialEq)]
pub enum DomainValue {
    Number(f64),
    Time(Timestamp),
    Label(String),
}

/// Linear map between a numeric domain and a pixel range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    domain: [f64; 2],
    range: [Pixel; 2],
}

impl LinearScale {
    fn new_unchecked(domain: [f64; 2], range: [Pixel; 2]) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> [f64; 2] { self.domain }
    pub fn range(&self) -> [Pixel; 2] { self.range }

    #[inline]
    pub fn map(&self, v: f64) -> Pixel {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        let span = d1 - d0;
        if span == 0.0 {
            return (r0 + r1) * 0.5;
        }
        r0 + (v - d0) / span * (r1 - r0)
    }

    #[inline]
    pub fn invert(&self, px: Pixel) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        let span = r1 - r0;
        if span == 0.0 {
            return (d0 + d1) * 0.5;
        }
        d0 + (px - r0) / span * (d1 - d0)
    }

    /// Same range, new domain.
    pub fn with_domain(&self, domain: [f64; 2]) -> Self {
        Self::new_unchecked(domain, self.range)
    }

    /// Extend the domain outwards to round tick boundaries.
    pub fn nice(&self, count: usize) -> Self {
        self.with_domain(ticks::nice_domain(self.domain, count))
    }

    /// Round values inside the domain, roughly `count` of them, on a 1-2-5 step.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks::linear_ticks(self.domain[0], self.domain[1], count)
    }
}

/// Linear map from timestamps (as epoch milliseconds) to pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeScale {
    inner: LinearScale,
}

impl TimeScale {
    pub fn domain(&self) -> [Timestamp; 2] {
        let [t0, t1] = self.inner.domain;
        [from_millis(t0), from_millis(t1)]
    }
    pub fn domain_ms(&self) -> [f64; 2] { self.inner.domain }
    pub fn range(&self) -> [Pixel; 2] { self.inner.range }

    #[inline]
    pub fn map(&self, t: Timestamp) -> Pixel {
        self.inner.map(to_millis(t))
    }
    #[inline]
    pub fn map_ms(&self, ms: f64) -> Pixel {
        self.inner.map(ms)
    }
    pub fn invert(&self, px: Pixel) -> Timestamp {
        from_millis(self.inner.invert(px))
    }
    pub fn invert_ms(&self, px: Pixel) -> f64 {
        self.inner.invert(px)
    }

    pub(crate) fn with_domain_ms(&self, domain: [f64; 2]) -> Self {
        Self { inner: self.inner.with_domain(domain) }
    }

    /// Calendar-aligned ticks, roughly `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<Timestamp> {
        let [t0, t1] = self.inner.domain;
        ticks::time_ticks(t0, t1, count)
    }
}

/// Ordered labels laid out as equal-width bands across the range.
#[derive(Clone, Debug, PartialEq)]
pub struct BandScale {
    labels: Vec<String>,
    index: HashMap<String, usize>,
    range: [Pixel; 2],
    start: Pixel,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    fn new(labels: Vec<String>, range: [Pixel; 2], padding_inner: f64, padding_outer: f64) -> Self {
        let mut unique = Vec::with_capacity(labels.len());
        let mut index = HashMap::with_capacity(labels.len());
        for label in labels {
            if !index.contains_key(&label) {
                index.insert(label.clone(), unique.len());
                unique.push(label);
            }
        }
        let padding_inner = padding_inner.clamp(0.0, 1.0);
        let padding_outer = padding_outer.max(0.0);

        let n = unique.len() as f64;
        let reverse = range[1] < range[0];
        let (lo, hi) = if reverse { (range[1], range[0]) } else { (range[0], range[1]) };
        let step = (hi - lo) / (n - padding_inner + padding_outer * 2.0).max(1.0);
        // align = 0.5: leftover space is split evenly on both ends
        let mut start = lo + (hi - lo - step * (n - padding_inner)) * 0.5;
        let mut step = step;
        if reverse {
            start = lo + (hi - lo) - (start - lo) - step * (1.0 - padding_inner);
            step = -step;
        }
        let bandwidth = step.abs() * (1.0 - padding_inner);
        Self { labels: unique, index, range, start, step, bandwidth }
    }

    pub fn labels(&self) -> &[String] { &self.labels }
    pub fn range(&self) -> [Pixel; 2] { self.range }
    pub fn bandwidth(&self) -> f64 { self.bandwidth }
    pub fn step(&self) -> f64 { self.step.abs() }

    /// Start (leading edge) of the label's band; `None` for unknown labels.
    pub fn map(&self, label: &str) -> Option<Pixel> {
        self.index.get(label).map(|&i| self.start + self.step * i as f64)
    }

    /// Middle of the label's band.
    pub fn center(&self, label: &str) -> Option<Pixel> {
        self.map(label).map(|x| x + self.bandwidth * 0.5)
    }
}

/// Ordered labels placed at evenly spaced points.
#[derive(Clone, Debug, PartialEq)]
pub struct PointScale {
    band: BandScale,
}

impl PointScale {
    pub fn labels(&self) -> &[String] { self.band.labels() }
    pub fn range(&self) -> [Pixel; 2] { self.band.range() }
    pub fn step(&self) -> f64 { self.band.step() }
    pub fn map(&self, label: &str) -> Option<Pixel> { self.band.map(label) }
}

/// Square-root scale: area, not radius, grows linearly with the value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SqrtScale {
    domain: [f64; 2],
    range: [Pixel; 2],
}

impl SqrtScale {
    pub fn domain(&self) -> [f64; 2] { self.domain }
    pub fn range(&self) -> [Pixel; 2] { self.range }

    pub fn map(&self, v: f64) -> Pixel {
        let s0 = signed_sqrt(self.domain[0]);
        let s1 = signed_sqrt(self.domain[1]);
        let [r0, r1] = self.range;
        r0 + (signed_sqrt(v) - s0) / (s1 - s0) * (r1 - r0)
    }
}

fn signed_sqrt(v: f64) -> f64 {
    if v < 0.0 { -(-v).sqrt() } else { v.sqrt() }
}

/// Tagged scale. Every variant maps; only continuous and temporal invert.
#[derive(Clone, Debug, PartialEq)]
pub enum Scale {
    Continuous(LinearScale),
    Temporal(TimeScale),
    Band(BandScale),
    Point(PointScale),
    Sqrt(SqrtScale),
}

impl Scale {
    pub fn kind(&self) -> ScaleKind {
        match self {
            Self::Continuous(_) => ScaleKind::Continuous,
            Self::Temporal(_) => ScaleKind::Temporal,
            Self::Band(_) => ScaleKind::Band,
            Self::Point(_) => ScaleKind::Point,
            Self::Sqrt(_) => ScaleKind::Sqrt,
        }
    }

    pub fn range(&self) -> [Pixel; 2] {
        match self {
            Self::Continuous(s) => s.range(),
            Self::Temporal(s) => s.range(),
            Self::Band(s) => s.range(),
            Self::Point(s) => s.range(),
            Self::Sqrt(s) => s.range(),
        }
    }

    pub fn is_invertible(&self) -> bool {
        matches!(self, Self::Continuous(_) | Self::Temporal(_))
    }

    /// Map a domain value. `None` when the value's type does not fit the
    /// variant or a categorical label is unknown.
    pub fn map(&self, value: &DomainValue) -> Option<Pixel> {
        match (self, value) {
            (Self::Continuous(s), DomainValue::Number(v)) => Some(s.map(*v)),
            (Self::Temporal(s), DomainValue::Time(t)) => Some(s.map(*t)),
            (Self::Temporal(s), DomainValue::Number(ms)) => Some(s.map_ms(*ms)),
            (Self::Band(s), DomainValue::Label(l)) => s.map(l),
            (Self::Point(s), DomainValue::Label(l)) => s.map(l),
            (Self::Sqrt(s), DomainValue::Number(v)) => Some(s.map(*v)),
            _ => None,
        }
    }

    pub fn invert(&self, px: Pixel) -> Option<DomainValue> {
        match self {
            Self::Continuous(s) => Some(DomainValue::Number(s.invert(px))),
            Self::Temporal(s) => Some(DomainValue::Time(s.invert(px))),
            Self::Band(_) | Self::Point(_) | Self::Sqrt(_) => None,
        }
    }
}

impl From<LinearScale> for Scale {
    fn from(s: LinearScale) -> Self { Self::Continuous(s) }
}
impl From<TimeScale> for Scale {
    fn from(s: TimeScale) -> Self { Self::Temporal(s) }
}
impl From<BandScale> for Scale {
    fn from(s: BandScale) -> Self { Self::Band(s) }
}
impl From<PointScale> for Scale {
    fn from(s: PointScale) -> Self { Self::Point(s) }
}
impl From<SqrtScale> for Scale {
    fn from(s: SqrtScale) -> Self { Self::Sqrt(s) }
}

// ---- factory ----------------------------------------------------------------

/// Tick count `nice` rounds against.
const NICE_COUNT: usize = 10;

fn check_domain(lo: f64, hi: f64) -> Result<()> {
    if !lo.is_finite() || !hi.is_finite() || lo == hi {
        return Err(ChartError::DegenerateDomain { lo, hi });
    }
    Ok(())
}

/// Linear scale; with `nice` the domain is first rounded outwards.
pub fn continuous(domain: [f64; 2], range: [Pixel; 2], nice: bool) -> Result<LinearScale> {
    check_domain(domain[0], domain[1])?;
    let scale = LinearScale::new_unchecked(domain, range);
    Ok(if nice { scale.nice(NICE_COUNT) } else { scale })
}

/// [`continuous`], substituting `[v-1, v+1]` (or `[0, 1]`) for a zero-width domain.
pub fn continuous_or_widened(domain: [f64; 2], range: [Pixel; 2], nice: bool) -> LinearScale {
    match continuous(domain, range, nice) {
        Ok(s) => s,
        Err(_) => {
            let v = domain[0];
            let widened = if v.is_finite() { [v - 1.0, v + 1.0] } else { [0.0, 1.0] };
            tracing::debug!(?domain, ?widened, "widening degenerate numeric domain");
            let scale = LinearScale::new_unchecked(widened, range);
            if nice { scale.nice(NICE_COUNT) } else { scale }
        }
    }
}

/// Time scale over `[t0, t1]`.
pub fn temporal(domain: [Timestamp; 2], range: [Pixel; 2]) -> Result<TimeScale> {
    let (lo, hi) = (to_millis(domain[0]), to_millis(domain[1]));
    check_domain(lo, hi)?;
    Ok(TimeScale { inner: LinearScale::new_unchecked([lo, hi], range) })
}

/// [`temporal`], widening a single-instant domain by one day on each side.
pub fn temporal_or_widened(domain: [Timestamp; 2], range: [Pixel; 2]) -> TimeScale {
    temporal(domain, range).unwrap_or_else(|_| {
        let widened = [domain[0] - Duration::days(1), domain[0] + Duration::days(1)];
        tracing::debug!(?domain, "widening degenerate time domain");
        TimeScale { inner: LinearScale::new_unchecked([to_millis(widened[0]), to_millis(widened[1])], range) }
    })
}

/// Band scale over distinct labels (duplicates keep their first position).
pub fn categorical_band<S: AsRef<str>>(
    labels: &[S],
    range: [Pixel; 2],
    padding_inner: f64,
    padding_outer: f64,
) -> BandScale {
    let labels = labels.iter().map(|l| l.as_ref().to_string()).collect();
    BandScale::new(labels, range, padding_inner, padding_outer)
}

/// Point scale: a band scale with full inner padding and zero bandwidth.
pub fn categorical_point<S: AsRef<str>>(labels: &[S], range: [Pixel; 2], padding: f64) -> PointScale {
    PointScale { band: categorical_band(labels, range, 1.0, padding) }
}

/// Square-root scale, typically over `[0, max]`, for bubble radii.
pub fn sqrt_scale(domain: [f64; 2], range: [Pixel; 2]) -> Result<SqrtScale> {
    check_domain(domain[0], domain[1])?;
    Ok(SqrtScale { domain, range })
}

/// Min and max of the finite values, if any.
pub fn extent(values: impl IntoIterator<Item = f64>) -> Option<[f64; 2]> {
    values.into_iter().filter(|v| v.is_finite()).fold(None, |acc, v| match acc {
        None => Some([v, v]),
        Some([lo, hi]) => Some([lo.min(v), hi.max(v)]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn continuous_maps_and_inverts() {
        let s = continuous([0.0, 10.0], [0.0, 100.0], false).unwrap();
        assert_eq!(s.map(2.5), 25.0);
        assert_eq!(s.invert(75.0), 7.5);
        // y axes run bottom to top
        let y = continuous([0.0, 100.0], [324.0, 20.0], false).unwrap();
        assert_eq!(y.map(0.0), 324.0);
        assert_eq!(y.map(100.0), 20.0);
    }

    #[test]
    fn zero_width_domain_is_degenerate() {
        assert_eq!(
            continuous([3.0, 3.0], [0.0, 1.0], true),
            Err(ChartError::DegenerateDomain { lo: 3.0, hi: 3.0 })
        );
        let widened = continuous_or_widened([3.0, 3.0], [0.0, 100.0], false);
        assert_eq!(widened.domain(), [2.0, 4.0]);
        assert_eq!(widened.map(3.0), 50.0);
    }

    #[test]
    fn nice_rounds_outwards() {
        let s = continuous([0.13, 9.87], [0.0, 1.0], true).unwrap();
        assert_eq!(s.domain(), [0.0, 10.0]);
        let s = continuous([152.4, 487.9], [0.0, 1.0], true).unwrap();
        assert_eq!(s.domain(), [150.0, 500.0]);
    }

    #[test]
    fn band_layout_with_padding() {
        let s = categorical_band(&["a", "b", "c"], [0.0, 300.0], 0.2, 0.1);
        // step = 300 / (3 - 0.2 + 0.2) = 100
        assert!((s.step() - 100.0).abs() < 1e-9);
        assert!((s.bandwidth() - 80.0).abs() < 1e-9);
        assert!((s.map("a").unwrap() - 10.0).abs() < 1e-9);
        assert!((s.map("c").unwrap() - 210.0).abs() < 1e-9);
        assert!(s.map("zzz").is_none());
    }

    #[test]
    fn band_scale_deduplicates_labels() {
        let s = categorical_band(&["a", "b", "a"], [0.0, 100.0], 0.0, 0.0);
        assert_eq!(s.labels(), &["a".to_string(), "b".to_string()]);
        assert_eq!(s.bandwidth(), 50.0);
    }

    #[test]
    fn point_scale_centers_with_padding() {
        let s = categorical_point(&["x", "y"], [0.0, 200.0], 0.5);
        // step = 200 / (2 - 1 + 1) = 100, start = 50
        assert_eq!(s.map("x"), Some(50.0));
        assert_eq!(s.map("y"), Some(150.0));
        let single = categorical_point(&["only"], [0.0, 200.0], 0.5);
        assert_eq!(single.map("only"), Some(100.0));
    }

    #[test]
    fn sqrt_scale_matches_area_rule() {
        let r = sqrt_scale([0.0, 400.0], [6.0, 48.0]).unwrap();
        assert_eq!(r.map(0.0), 6.0);
        assert_eq!(r.map(400.0), 48.0);
        assert!((r.map(100.0) - (6.0 + 42.0 * 0.5)).abs() < 1e-9);
        assert!(sqrt_scale([0.0, 0.0], [6.0, 48.0]).is_err());
    }

    #[test]
    fn tagged_scale_inverts_by_variant() {
        let t0 = Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2025, 8, 31, 0, 0, 0).unwrap();
        let time: Scale = temporal([t0, t1], [0.0, 300.0]).unwrap().into();
        assert_eq!(time.kind(), ScaleKind::Temporal);
        assert_eq!(time.invert(0.0), Some(DomainValue::Time(t0)));
        assert_eq!(time.map(&DomainValue::Time(t1)), Some(300.0));

        let band: Scale = categorical_band(&["a"], [0.0, 10.0], 0.0, 0.0).into();
        assert!(!band.is_invertible());
        assert_eq!(band.invert(3.0), None);
        assert_eq!(band.map(&DomainValue::Number(1.0)), None);
    }

    #[test]
    fn single_instant_time_domain_widens_by_a_day() {
        let t = Utc.with_ymd_and_hms(2025, 8, 1, 12, 0, 0).unwrap();
        let s = temporal_or_widened([t, t], [0.0, 100.0]);
        assert_eq!(s.domain()[0], t - Duration::days(1));
        assert_eq!(s.map(t), 50.0);
    }

    #[test]
    fn extent_skips_non_finite() {
        assert_eq!(extent([3.0, f64::NAN, -1.0, 7.0]), Some([-1.0, 7.0]));
        assert_eq!(extent(std::iter::empty()), None);
    }
}
