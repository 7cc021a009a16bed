// File: crates/chart-engine/src/series.rs
// Summary: Input data model (time series points, categorical rows) and entry validation.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{InvalidData, Result};

/// Timestamps on the x axis.
pub type Timestamp = DateTime<Utc>;

/// Epoch milliseconds as a float, the unit temporal scales work in.
#[inline]
pub fn to_millis(t: Timestamp) -> f64 {
    t.timestamp_millis() as f64
}

/// Inverse of [`to_millis`]; rounds to the nearest millisecond and saturates
/// at chrono's representable bounds.
pub fn from_millis(ms: f64) -> Timestamp {
    let ms = if ms.is_finite() { ms.round() } else { 0.0 };
    let clamped = ms.clamp(
        DateTime::<Utc>::MIN_UTC.timestamp_millis() as f64,
        DateTime::<Utc>::MAX_UTC.timestamp_millis() as f64,
    );
    Utc.timestamp_millis_opt(clamped as i64)
        .single()
        .unwrap_or_default()
}

/// How series values are presented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartMode {
    #[default]
    Absolute,
    /// Change relative to the first point, in percent.
    Percentage,
}

/// One observation. Immutable once built.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    x: Timestamp,
    y: f64,
}

impl Point {
    pub const fn new(x: Timestamp, y: f64) -> Self {
        Self { x, y }
    }
    pub fn x(&self) -> Timestamp { self.x }
    pub fn y(&self) -> f64 { self.y }
    pub(crate) fn x_ms(&self) -> f64 { to_millis(self.x) }
}

/// A named, x-ordered sequence of points.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    id: String,
    values: Vec<Point>,
}

impl Series {
    pub fn new(id: impl Into<String>, values: Vec<Point>) -> Self {
        Self { id: id.into(), values }
    }

    /// Build from `(timestamp, y)` pairs.
    pub fn from_pairs(id: impl Into<String>, pairs: impl IntoIterator<Item = (Timestamp, f64)>) -> Self {
        Self::new(id, pairs.into_iter().map(|(x, y)| Point::new(x, y)).collect())
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn values(&self) -> &[Point] { &self.values }
    pub fn len(&self) -> usize { self.values.len() }
    pub fn is_empty(&self) -> bool { self.values.is_empty() }
    pub fn first(&self) -> Option<&Point> { self.values.first() }

    /// The y value at exactly `x`, if the series has a point there.
    ///
    /// Duplicate timestamps resolve to the first matching point.
    pub fn value_at(&self, x: Timestamp) -> Option<f64> {
        let i = self.values.partition_point(|p| p.x < x);
        self.values.get(i).filter(|p| p.x == x).map(|p| p.y)
    }
}

/// Earliest and latest timestamp across all series.
pub fn time_extent(series: &[Series]) -> Option<[Timestamp; 2]> {
    series
        .iter()
        .flat_map(|s| s.values.iter().map(Point::x))
        .fold(None, |acc, x| match acc {
            None => Some([x, x]),
            Some([lo, hi]) => Some([lo.min(x), hi.max(x)]),
        })
}

/// Check a series list before any scale or geometry is computed.
///
/// Rejects an empty list, empty series, duplicate ids, descending x and non-finite y.
pub fn validate_series(series: &[Series]) -> Result<()> {
    if series.is_empty() {
        return Err(InvalidData::EmptySeriesList.into());
    }
    let mut seen = HashSet::with_capacity(series.len());
    for s in series {
        if !seen.insert(s.id()) {
            return Err(InvalidData::DuplicateId { id: s.id.clone() }.into());
        }
        if s.values.is_empty() {
            return Err(InvalidData::EmptySeries { id: s.id.clone() }.into());
        }
        for (index, p) in s.values.iter().enumerate() {
            if !p.y.is_finite() {
                return Err(InvalidData::NonFinite { id: s.id.clone(), index }.into());
            }
            if index > 0 && p.x < s.values[index - 1].x {
                return Err(InvalidData::Unsorted { id: s.id.clone(), index }.into());
            }
        }
    }
    Ok(())
}

/// Extra per-row field carried through to tooltips.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Text(_) => None,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// One row of a categorical dataset (bar and bubble charts).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryRow {
    pub category: String,
    pub value: f64,
    #[serde(default)]
    pub extra: BTreeMap<String, FieldValue>,
}

impl CategoryRow {
    pub fn new(category: impl Into<String>, value: f64) -> Self {
        Self { category: category.into(), value, extra: BTreeMap::new() }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.extra.insert(name.into(), value);
        self
    }

    pub fn number(&self, field: &str) -> Option<f64> {
        self.extra.get(field).and_then(FieldValue::as_number)
    }
}

/// Check a categorical row list. `numeric_field` names an extra field that
/// every row must carry as a finite number (the bubble chart's y position).
pub fn validate_rows(rows: &[CategoryRow], numeric_field: Option<&str>) -> Result<()> {
    if rows.is_empty() {
        return Err(InvalidData::EmptyRows.into());
    }
    for row in rows {
        if !row.value.is_finite() {
            return Err(InvalidData::NonFiniteRow { category: row.category.clone() }.into());
        }
        if let Some(field) = numeric_field {
            match row.number(field) {
                Some(v) if v.is_finite() => {}
                Some(_) => {
                    return Err(InvalidData::NonFiniteRow { category: row.category.clone() }.into())
                }
                None => {
                    return Err(InvalidData::MissingField {
                        category: row.category.clone(),
                        field: field.to_string(),
                    }
                    .into())
                }
            }
        }
    }
    Ok(())
}
