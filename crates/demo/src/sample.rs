// File: crates/demo/src/sample.rs
// Summary: Deterministic sample datasets: daily stock closes, monthly framework popularity, job postings.

use std::collections::BTreeMap;

use chart_engine::{CategoryRow, FieldValue, Series, Timestamp};
use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};

fn midnight(date: NaiveDate) -> Timestamp {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

fn round_to(v: f64, places: i32) -> f64 {
    let p = 10f64.powi(places);
    (v * p).round() / p
}

/// 30 daily closes for five tickers from 2025-08-01.
pub fn stocks() -> Vec<Series> {
    let Some(start) = NaiveDate::from_ymd_opt(2025, 8, 1) else {
        return Vec::new();
    };
    ["AAPL", "NVDA", "TSLA", "MSFT", "AMZN"]
        .iter()
        .enumerate()
        .map(|(idx, sym)| {
            let base = 150.0 + idx as f64 * 100.0;
            let drift = if idx == 1 { 1.5 } else { 0.5 };
            let points = (0..30).map(|i| {
                let i = i as f64;
                let close = base + (i / 3.0 + idx as f64).sin() * 12.0 + i * drift;
                (midnight(start + Duration::days(i as i64)), round_to(close, 2))
            });
            Series::from_pairs(*sym, points)
        })
        .collect()
}

/// 36 monthly popularity scores for five frameworks from 2020-01.
pub fn frameworks() -> Vec<Series> {
    ["React", "Vue", "Angular", "Svelte", "Next.js"]
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let base = 50.0 - idx as f64 * 6.0;
            let trend = match (*name, idx) {
                ("React", _) => 0.3,
                (_, 3) => 0.2,
                _ => 0.05,
            };
            let points = (0..36u32).filter_map(move |i| {
                let date = NaiveDate::from_ymd_opt(2020 + (i / 12) as i32, i % 12 + 1, 1)?;
                let fi = i as f64;
                let v = base + (fi / (3.0 + idx as f64)).sin() * 6.0 + fi * trend;
                Some((midnight(date), round_to(v, 1).max(0.0)))
            });
            Series::from_pairs(*name, points)
        })
        .collect()
}

/// `(city, skill, postings, avg salary)`.
pub const JOBS: &[(&str, &str, f64, f64)] = &[
    ("Boston, MA", "React", 320.0, 150_000.0),
    ("Boston, MA", "Java", 210.0, 145_000.0),
    ("Boston, MA", "AI", 180.0, 170_000.0),
    ("Boston, MA", "Python", 280.0, 155_000.0),
    ("Boston, MA", "Go", 95.0, 160_000.0),
    ("New York, NY", "React", 540.0, 165_000.0),
    ("New York, NY", "Java", 380.0, 160_000.0),
    ("New York, NY", "AI", 420.0, 180_000.0),
    ("New York, NY", "Python", 480.0, 170_000.0),
    ("New York, NY", "Go", 180.0, 175_000.0),
    ("San Francisco, CA", "React", 410.0, 175_000.0),
    ("San Francisco, CA", "Java", 320.0, 170_000.0),
    ("San Francisco, CA", "AI", 360.0, 190_000.0),
    ("San Francisco, CA", "Python", 520.0, 185_000.0),
    ("San Francisco, CA", "Go", 220.0, 195_000.0),
    ("Austin, TX", "React", 260.0, 140_000.0),
    ("Austin, TX", "Java", 200.0, 138_000.0),
    ("Austin, TX", "AI", 150.0, 155_000.0),
    ("Austin, TX", "Python", 240.0, 145_000.0),
    ("Austin, TX", "Go", 120.0, 150_000.0),
    ("Raleigh, NC", "React", 160.0, 135_000.0),
    ("Raleigh, NC", "Java", 140.0, 130_000.0),
    ("Raleigh, NC", "AI", 80.0, 145_000.0),
    ("Raleigh, NC", "Python", 180.0, 140_000.0),
    ("Raleigh, NC", "Go", 60.0, 145_000.0),
    ("Seattle, WA", "React", 280.0, 160_000.0),
    ("Seattle, WA", "Java", 220.0, 155_000.0),
    ("Seattle, WA", "AI", 300.0, 185_000.0),
    ("Seattle, WA", "Python", 320.0, 180_000.0),
    ("Seattle, WA", "Go", 140.0, 185_000.0),
];

/// Every city, in first-seen order.
pub fn cities() -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for (city, ..) in JOBS {
        if !out.iter().any(|c| c == city) {
            out.push(city.to_string());
        }
    }
    out
}

/// One row per skill: total postings, mean salary and the city with the most postings.
pub fn skills() -> Vec<CategoryRow> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: BTreeMap<&str, Vec<(&str, f64, f64)>> = BTreeMap::new();
    for &(city, skill, postings, salary) in JOBS {
        if !groups.contains_key(skill) {
            order.push(skill);
        }
        groups.entry(skill).or_default().push((city, postings, salary));
    }
    order
        .into_iter()
        .filter_map(|skill| {
            let rows = groups.get(skill)?;
            let total: f64 = rows.iter().map(|r| r.1).sum();
            let avg = rows.iter().map(|r| r.2).sum::<f64>() / rows.len() as f64;
            // ties keep the first city
            let top = rows.iter().fold(None::<(&str, f64)>, |best, &(c, p, _)| match best {
                Some((_, bp)) if bp >= p => best,
                _ => Some((c, p)),
            });
            Some(
                CategoryRow::new(skill, total)
                    .with_field("avgSalary", FieldValue::Number(avg))
                    .with_field("topCity", FieldValue::Text(top.map(|t| t.0).unwrap_or_default().to_string())),
            )
        })
        .collect()
}

/// Postings per city for one skill.
pub fn jobs_for(skill: &str) -> Vec<CategoryRow> {
    JOBS.iter()
        .filter(|j| j.1 == skill)
        .map(|&(city, _, postings, salary)| {
            CategoryRow::new(city, postings).with_field("avgSalary", FieldValue::Number(salary))
        })
        .collect()
}
