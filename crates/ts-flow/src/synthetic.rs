//! Mock flow dataset for running without the real detector CSV.
//!
//! Generates one record per detector per interval for every day of the
//! service window.  Values are uniform random in the ranges the real Taipei
//! data roughly spans:
//!
//! | Field       | Range          |
//! |-------------|----------------|
//! | `flow`      | 50 ..  300     |
//! | `occupancy` | 10.0 .. 80.0   |
//! | `speed`     | 20.0 .. 60.0   |
//! | `traffic`   | 0 ..= 2        |
//!
//! Detector ids are `DET001`, `DET002`, …  Output is fully determined by the
//! RNG seed.

use chrono::Datelike;

use ts_core::{DataRng, IntervalLabel, ServiceWindow};

use crate::dataset::FlowDataset;
use crate::record::FlowRecord;

/// Build a mock dataset covering `window` at `bucket_minutes` resolution for
/// `sensor_count` detectors.
pub fn synthetic_dataset(
    window: &ServiceWindow,
    sensor_count: u32,
    bucket_minutes: u16,
    rng: &mut DataRng,
) -> FlowDataset {
    let step = bucket_minutes.max(1);
    let sensors: Vec<String> = (1..=sensor_count).map(|i| format!("DET{i:03}")).collect();

    let mut records = Vec::new();
    for day in window.first_day.iter_days().take_while(|d| *d <= window.last_day) {
        let weekday = day.weekday();
        for minutes in (0..IntervalLabel::MINUTES_PER_DAY).step_by(step as usize) {
            for sensor in &sensors {
                records.push(FlowRecord {
                    day,
                    interval:  IntervalLabel(minutes),
                    sensor:    sensor.clone(),
                    weekday,
                    flow:      Some(f64::from(rng.gen_range(50u32..300))),
                    occupancy: Some(rng.gen_range(10.0..80.0)),
                    speed:     Some(rng.gen_range(20.0..60.0)),
                    traffic:   Some(rng.gen_range(0..=2)),
                });
            }
        }
    }

    tracing::info!(
        records = records.len(),
        sensors = sensor_count,
        first_day = %window.first_day,
        last_day = %window.last_day,
        "generated synthetic flow dataset"
    );
    FlowDataset::new(records)
}
