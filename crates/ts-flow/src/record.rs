//! One historical detector reading.

use chrono::{NaiveDate, Weekday};

use ts_core::{IntervalLabel, TimeSlot};

/// A single `(day, interval, sensor)` observation.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowRecord {
    pub day:       NaiveDate,
    /// Start of the aggregation interval, e.g. `08:30`.
    pub interval:  IntervalLabel,
    /// Detector identifier, e.g. `"DET001"`.
    pub sensor:    String,
    pub weekday:   Weekday,
    /// Vehicles counted in the interval; `None` where the detector reported
    /// nothing.
    pub flow:      Option<f64>,
    /// Occupancy percentage, when the source reports it.
    pub occupancy: Option<f64>,
    /// Mean speed (km/h), when the source reports it.
    pub speed:     Option<f64>,
    /// Coarse traffic-state label (0 = free, 1 = busy, 2 = congested).
    pub traffic:   Option<u8>,
}

impl FlowRecord {
    /// The time-of-week slot this record is aggregated under.
    #[inline]
    pub fn slot(&self) -> TimeSlot {
        TimeSlot::new(self.weekday, self.interval)
    }
}
