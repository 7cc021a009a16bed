// File: crates/demo/src/load.rs
// Summary: Long-format CSV loaders for time series (date,id,value) and categorical rows (category,value[,field...]).

use std::path::Path;

use anyhow::{bail, Context, Result};
use chart_engine::{CategoryRow, FieldValue, Series, Timestamp};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

fn reader(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))
}

/// Rows of `date,id,value`, grouped by id in first-seen order and sorted by date.
pub fn load_series(path: &Path) -> Result<Vec<Series>> {
    let mut rdr = reader(path)?;
    let mut groups: Vec<(String, Vec<(Timestamp, f64)>)> = Vec::new();
    let mut skipped = 0usize;

    for (line, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let (Some(date), Some(id), Some(value)) = (rec.get(0), rec.get(1), rec.get(2)) else {
            skipped += 1;
            continue;
        };
        let (Some(t), Ok(v)) = (parse_time(date), value.parse::<f64>()) else {
            tracing::debug!(line = line + 2, date, value, "skipping unparseable row");
            skipped += 1;
            continue;
        };
        match groups.iter_mut().find(|(g, _)| g == id) {
            Some((_, points)) => points.push((t, v)),
            None => groups.push((id.to_string(), vec![(t, v)])),
        }
    }
    if skipped > 0 {
        tracing::warn!(skipped, path = %path.display(), "ignored malformed rows");
    }
    if groups.is_empty() {
        bail!("no rows loaded from {} (expected date,id,value)", path.display());
    }
    Ok(groups
        .into_iter()
        .map(|(id, mut points)| {
            points.sort_by_key(|p| p.0);
            Series::from_pairs(id, points)
        })
        .collect())
}

/// Rows of `category,value[,field...]`; extra columns become number or text fields by header name.
pub fn load_rows(path: &Path) -> Result<Vec<CategoryRow>> {
    let mut rdr = reader(path)?;
    let headers = rdr.headers()?.clone();
    let mut out = Vec::new();

    for rec in rdr.records() {
        let rec = rec?;
        let (Some(category), Some(value)) = (rec.get(0), rec.get(1)) else { continue };
        let value: f64 = value
            .parse()
            .with_context(|| format!("value '{value}' for '{category}' is not a number"))?;
        let row = headers.iter().zip(rec.iter()).skip(2).fold(CategoryRow::new(category, value), |row, (name, raw)| {
            let field = raw.parse::<f64>().map(FieldValue::Number).unwrap_or_else(|_| FieldValue::Text(raw.to_string()));
            row.with_field(name, field)
        });
        out.push(row);
    }
    if out.is_empty() {
        bail!("no rows loaded from {} (expected category,value[,field...])", path.display());
    }
    Ok(out)
}

/// `YYYY-MM-DD`, RFC 3339, or epoch seconds/milliseconds.
fn parse_time(s: &str) -> Option<Timestamp> {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&d.and_time(chrono::NaiveTime::MIN)));
    }
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    let n = s.parse::<i64>().ok()?;
    if n > 10_i64.pow(12) {
        Utc.timestamp_millis_opt(n).single()
    } else {
        Utc.timestamp_opt(n, 0).single()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_tmp(name: &str, body: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join("chart-demo-tests");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn series_group_by_id_and_sort() {
        let path = write_tmp(
            "series.csv",
            "date,id,value\n2025-08-02,AAPL,151\n2025-08-01,AAPL,150\n2025-08-01,MSFT,410\nbad,MSFT,1\n",
        );
        let series = load_series(&path).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].id(), "AAPL");
        assert_eq!(series[0].values()[0].y(), 150.0);
        assert_eq!(series[1].len(), 1);
    }

    #[test]
    fn rows_keep_extra_columns() {
        let path = write_tmp("rows.csv", "city,postings,avgSalary,region\nAustin, 260, 140000, south\n");
        let rows = load_rows(&path).unwrap();
        assert_eq!(rows[0].category, "Austin");
        assert_eq!(rows[0].number("avgSalary"), Some(140_000.0));
        assert_eq!(rows[0].extra.get("region"), Some(&FieldValue::Text("south".into())));
    }

    #[test]
    fn times_parse_in_several_forms() {
        let day = Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_time("2025-08-01"), Some(day));
        assert_eq!(parse_time("2025-08-01T00:00:00Z"), Some(day));
        assert_eq!(parse_time(&day.timestamp().to_string()), Some(day));
        assert_eq!(parse_time(&day.timestamp_millis().to_string()), Some(day));
        assert_eq!(parse_time("soon"), None);
    }
}
