// File: crates/chart-engine/src/scale/ticks.rs
// Summary: 1-2-5 numeric ticks, domain rounding ("nice") and calendar-aligned time ticks.

use chrono::{Datelike, NaiveDate, TimeZone, Utc, Weekday};

use crate::series::{from_millis, to_millis, Timestamp};

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

// JS-style rounding: halves go towards +inf.
#[inline]
fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// `(i1, i2, inc)`: ticks are `i * inc` for `i` in `i1..=i2`; a negative
/// `inc` means divide by `-inc` instead (keeps small steps exact).
fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let p = 10f64.powf(-power) / factor;
        i1 = round_half_up(start * p);
        i2 = round_half_up(stop * p);
        if i1 / p < start {
            i1 += 1.0;
        }
        if i2 / p > stop {
            i2 -= 1.0;
        }
        inc = -p;
    } else {
        let p = 10f64.powf(power) * factor;
        i1 = round_half_up(start / p);
        i2 = round_half_up(stop / p);
        if i1 * p < start {
            i1 += 1.0;
        }
        if i2 * p > stop {
            i2 -= 1.0;
        }
        inc = p;
    }
    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

/// Signed tick step for `[start, stop]`; negative values are inverse steps.
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    tick_spec(start, stop, count as f64).2
}

/// Absolute tick step for `[start, stop]`.
fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let reverse = stop < start;
    let inc = if reverse {
        tick_increment(stop, start, count)
    } else {
        tick_increment(start, stop, count)
    };
    let step = if inc < 0.0 { 1.0 / -inc } else { inc };
    if reverse { -step } else { step }
}

pub(crate) fn linear_ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let reverse = stop < start;
    let (i1, i2, inc) = if reverse {
        tick_spec(stop, start, count as f64)
    } else {
        tick_spec(start, stop, count as f64)
    };
    if !(i2 >= i1) {
        return Vec::new();
    }
    let n = (i2 - i1) as usize + 1;
    let at = |i: f64| if inc < 0.0 { i / -inc } else { i * inc };
    if reverse {
        (0..n).map(|k| at(i2 - k as f64)).collect()
    } else {
        (0..n).map(|k| at(i1 + k as f64)).collect()
    }
}

/// Extend `domain` so both ends fall on a tick. Gives up after ten rounds,
/// returning the domain unchanged.
pub(crate) fn nice_domain(domain: [f64; 2], count: usize) -> [f64; 2] {
    let reversed = domain[1] < domain[0];
    let (mut start, mut stop) = if reversed { (domain[1], domain[0]) } else { (domain[0], domain[1]) };
    let mut prestep: Option<f64> = None;
    for _ in 0..10 {
        let step = tick_increment(start, stop, count);
        if prestep == Some(step) {
            return if reversed { [stop, start] } else { [start, stop] };
        }
        if step > 0.0 {
            start = (start / step).floor() * step;
            stop = (stop / step).ceil() * step;
        } else if step < 0.0 {
            start = (start * step).ceil() / step;
            stop = (stop * step).floor() / step;
        } else {
            break;
        }
        prestep = Some(step);
    }
    domain
}

// ---- time -------------------------------------------------------------------

const SECOND: f64 = 1_000.0;
const MINUTE: f64 = SECOND * 60.0;
const HOUR: f64 = MINUTE * 60.0;
const DAY: f64 = HOUR * 24.0;
const WEEK: f64 = DAY * 7.0;
const MONTH: f64 = DAY * 30.0;
const YEAR: f64 = DAY * 365.0;

/// Calendar unit a time tick is aligned to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeInterval {
    Millisecond(u32),
    Second(u32),
    Minute(u32),
    Hour(u32),
    Day(u32),
    /// Sunday-based weeks.
    Week(u32),
    Month(u32),
    Year(u32),
}

impl TimeInterval {
    fn duration_ms(self) -> f64 {
        match self {
            Self::Millisecond(n) => n as f64,
            Self::Second(n) => SECOND * n as f64,
            Self::Minute(n) => MINUTE * n as f64,
            Self::Hour(n) => HOUR * n as f64,
            Self::Day(n) => DAY * n as f64,
            Self::Week(n) => WEEK * n as f64,
            Self::Month(n) => MONTH * n as f64,
            Self::Year(n) => YEAR * n as f64,
        }
    }

    /// Pick the interval producing roughly `count` ticks over `[start, stop]` ms.
    pub fn for_span(start: f64, stop: f64, count: usize) -> Self {
        use TimeInterval::*;
        const CANDIDATES: [TimeInterval; 18] = [
            Second(1), Second(5), Second(15), Second(30),
            Minute(1), Minute(5), Minute(15), Minute(30),
            Hour(1), Hour(3), Hour(6), Hour(12),
            Day(1), Day(2), Week(1), Month(1), Month(3), Year(1),
        ];
        let target = (stop - start).abs() / count.max(1) as f64;
        let i = CANDIDATES.partition_point(|c| c.duration_ms() <= target);
        if i == CANDIDATES.len() {
            let step = tick_step(start / YEAR, stop / YEAR, count).abs().max(1.0);
            return Year(step as u32);
        }
        if i == 0 {
            let step = tick_step(start, stop, count).abs().max(1.0);
            return Millisecond(step as u32);
        }
        let (lo, hi) = (CANDIDATES[i - 1], CANDIDATES[i]);
        if target / lo.duration_ms() < hi.duration_ms() / target { lo } else { hi }
    }
}

fn floor_to(ms: f64, unit: f64) -> f64 {
    (ms / unit).floor() * unit
}

fn midnight(date: NaiveDate) -> Option<Timestamp> {
    date.and_hms_opt(0, 0, 0).map(|dt| Utc.from_utc_datetime(&dt))
}

/// Cap on generated ticks, guarding against absurd spans.
const MAX_TIME_TICKS: usize = 1_000;

/// Ticks inside `[start, stop]` (ms), aligned to UTC calendar boundaries.
pub(crate) fn time_ticks(start: f64, stop: f64, count: usize) -> Vec<Timestamp> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    let (lo, hi) = if stop < start { (stop, start) } else { (start, stop) };
    let interval = TimeInterval::for_span(lo, hi, count);
    let mut out = Vec::new();
    match interval {
        TimeInterval::Millisecond(_)
        | TimeInterval::Second(_)
        | TimeInterval::Minute(_)
        | TimeInterval::Hour(_) => {
            let unit = interval.duration_ms();
            let mut t = floor_to(lo, unit);
            if t < lo {
                t += unit;
            }
            while t <= hi && out.len() < MAX_TIME_TICKS {
                out.push(from_millis(t));
                t += unit;
            }
        }
        TimeInterval::Day(n) | TimeInterval::Week(n) => {
            let first = from_millis(lo).date_naive();
            let mut date = first;
            let hi_t = from_millis(hi);
            while out.len() < MAX_TIME_TICKS {
                let Some(t) = midnight(date) else { break };
                if t > hi_t {
                    break;
                }
                let keep = match interval {
                    TimeInterval::Day(_) => (date.day() - 1) % n == 0,
                    _ => date.weekday() == Weekday::Sun,
                };
                if keep && to_millis(t) >= lo {
                    out.push(t);
                }
                date = match date.succ_opt() {
                    Some(d) => d,
                    None => break,
                };
            }
        }
        TimeInterval::Month(n) => {
            let first = from_millis(lo);
            let (mut y, mut m) = (first.year(), first.month0());
            let hi_t = from_millis(hi);
            while out.len() < MAX_TIME_TICKS {
                let Some(t) = NaiveDate::from_ymd_opt(y, m + 1, 1).and_then(midnight) else { break };
                if t > hi_t {
                    break;
                }
                if m % n == 0 && to_millis(t) >= lo {
                    out.push(t);
                }
                m += 1;
                if m == 12 {
                    m = 0;
                    y += 1;
                }
            }
        }
        TimeInterval::Year(n) => {
            let first = from_millis(lo).year();
            let n = n.max(1) as i32;
            let mut y = first.div_euclid(n) * n;
            let hi_t = from_millis(hi);
            while out.len() < MAX_TIME_TICKS {
                let Some(t) = NaiveDate::from_ymd_opt(y, 1, 1).and_then(midnight) else { break };
                if t > hi_t {
                    break;
                }
                if to_millis(t) >= lo {
                    out.push(t);
                }
                y += n;
            }
        }
    }
    if stop < start {
        out.reverse();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn linear_ticks_follow_one_two_five() {
        assert_eq!(linear_ticks(0.0, 10.0, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(linear_ticks(0.0, 1.0, 5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        assert_eq!(linear_ticks(0.0, 100.0, 10).len(), 11);
        assert_eq!(linear_ticks(3.0, 3.0, 5), vec![3.0]);
        assert!(linear_ticks(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn reversed_ticks_descend() {
        assert_eq!(linear_ticks(10.0, 0.0, 5), vec![10.0, 8.0, 6.0, 4.0, 2.0, 0.0]);
    }

    #[test]
    fn nice_domain_handles_small_and_reversed_ranges() {
        assert_eq!(nice_domain([0.201479, 0.996679], 10), [0.2, 1.0]);
        assert_eq!(nice_domain([10.0, 0.5], 10), [10.0, 0.0]);
    }

    #[test]
    fn interval_choice_tracks_span() {
        let month = 30.0 * DAY;
        assert_eq!(TimeInterval::for_span(0.0, month, 6), TimeInterval::Week(1));
        assert_eq!(TimeInterval::for_span(0.0, 12.0 * HOUR, 6), TimeInterval::Hour(3));
        assert!(matches!(TimeInterval::for_span(0.0, 50.0 * YEAR, 6), TimeInterval::Year(_)));
    }

    #[test]
    fn weekly_ticks_land_on_sundays() {
        let t0 = Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2025, 8, 31, 0, 0, 0).unwrap();
        let ticks = time_ticks(
            to_millis(t0),
            to_millis(t1),
            6,
        );
        assert!(!ticks.is_empty());
        assert!(ticks.iter().all(|t| t.weekday() == Weekday::Sun));
        assert!(ticks.iter().all(|t| *t >= t0 && *t <= t1));
    }

    #[test]
    fn monthly_ticks_start_each_month() {
        let t0 = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2025, 7, 15, 0, 0, 0).unwrap();
        let ticks = time_ticks(to_millis(t0), to_millis(t1), 6);
        assert_eq!(ticks.len(), 6);
        assert!(ticks.iter().all(|t| t.day() == 1));
    }
}
