//! CSV flow-record loader.
//!
//! # CSV format
//!
//! One row per `(day, interval, detector)`.  Column order does not matter and
//! unknown columns are ignored.
//!
//! ```csv
//! day,interval,detid,flow,occ,speed,weekday,traffic
//! 2017-09-18,08:30,DET001,212,41.5,33.2,Monday,1
//! 2017-09-18,08:30,DET002,188,,,Monday,
//! ```
//!
//! | Column     | Required | Format                                                |
//! |------------|----------|-------------------------------------------------------|
//! | `day`      | yes      | `YYYY-MM-DD` (a trailing time part is ignored)        |
//! | `interval` | yes      | `HH:MM`, `HH:MM:SS`, or seconds since midnight        |
//! | `detid`    | yes      | detector id                                           |
//! | `flow`     | yes      | vehicles per interval; may be empty                   |
//! | `occ`      | no       | occupancy                                             |
//! | `speed`    | no       | speed                                                 |
//! | `weekday`  | no       | English weekday name; derived from `day` when absent  |
//! | `traffic`  | no       | coarse state label 0/1/2                              |
//!
//! An empty `flow` cell keeps the row with no reading; the slot means skip
//! it.  Any malformed row aborts the load with [`FlowError::Parse`] naming
//! its line number.

use std::io::Read;
use std::path::Path;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Deserialize;

use ts_core::IntervalLabel;

use crate::dataset::FlowDataset;
use crate::record::FlowRecord;
use crate::{FlowError, FlowResult};

// ── CSV row ───────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct FlowRow {
    day:      String,
    interval: String,
    detid:    String,
    #[serde(default)]
    flow:     Option<f64>,
    #[serde(default)]
    occ:      Option<f64>,
    #[serde(default)]
    speed:    Option<f64>,
    #[serde(default)]
    weekday:  Option<String>,
    #[serde(default)]
    traffic:  Option<u8>,
}

impl FlowRow {
    fn into_record(self) -> Result<FlowRecord, String> {
        let day = parse_day(&self.day)?;
        let interval: IntervalLabel = self.interval.parse().map_err(|e| format!("{e}"))?;
        let weekday = match self.weekday.as_deref().map(str::trim) {
            None | Some("") => day.weekday(),
            Some(name) => name
                .parse::<Weekday>()
                .map_err(|_| format!("invalid weekday {name:?}"))?,
        };
        Ok(FlowRecord {
            day,
            interval,
            sensor: self.detid,
            weekday,
            flow: self.flow,
            occupancy: self.occ,
            speed: self.speed,
            traffic: self.traffic,
        })
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`FlowDataset`] from a CSV file.
pub fn load_dataset_csv(path: &Path) -> FlowResult<FlowDataset> {
    let file = std::fs::File::open(path)?;
    let dataset = load_dataset_reader(file)?;
    tracing::info!(
        records = dataset.len(),
        slots = dataset.slot_count(),
        path = %path.display(),
        "flow dataset loaded"
    );
    Ok(dataset)
}

/// Like [`load_dataset_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`).
pub fn load_dataset_reader<R: Read>(reader: R) -> FlowResult<FlowDataset> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let mut records = Vec::new();
    for result in csv_reader.records() {
        let row = result?;
        let line = row.position().map_or(0, |p| p.line());
        let parse_err = |message: String| FlowError::Parse { line, message };

        let parsed: FlowRow = row
            .deserialize(Some(&headers))
            .map_err(|e| parse_err(e.to_string()))?;
        records.push(parsed.into_record().map_err(parse_err)?);
    }

    Ok(FlowDataset::new(records))
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// `YYYY-MM-DD`, tolerating a trailing time part such as ` 00:00:00`.
fn parse_day(s: &str) -> Result<NaiveDate, String> {
    let s = s.trim();
    s.get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .ok_or_else(|| format!("invalid day {s:?}: expected YYYY-MM-DD"))
}
