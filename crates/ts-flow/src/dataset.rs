//! Immutable historical record set with a time-of-week index.
//!
//! # Index
//!
//! Every query asks for the mean flow of one `(weekday, interval)` slot.  A
//! linear filter over the records would be O(N) per request, so the slot
//! sums and counts are accumulated once here, in record order, into an
//! `FxHashMap<TimeSlot, SlotStats>`.  Summing in record order means the mean
//! is identical to what a filter-then-average over the raw rows would give.
//!
//! Records without a finite flow (blank cells, `NaN`, `inf`) stay in the
//! record set but contribute to no sum or count.

use chrono::NaiveDate;
use rustc_hash::FxHashMap;

use ts_core::TimeSlot;

use crate::record::FlowRecord;

#[derive(Debug, Clone, Copy, Default)]
struct SlotStats {
    sum:   f64,
    count: usize,
}

impl SlotStats {
    #[inline]
    fn add(&mut self, flow: f64) {
        self.sum += flow;
        self.count += 1;
    }

    #[inline]
    fn mean(self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// The full historical flow dataset.
#[derive(Debug, Default)]
pub struct FlowDataset {
    records: Vec<FlowRecord>,
    slots:   FxHashMap<TimeSlot, SlotStats>,
    overall: SlotStats,
}

impl FlowDataset {
    /// Take ownership of `records` and build the slot index.
    pub fn new(records: Vec<FlowRecord>) -> Self {
        let mut slots: FxHashMap<TimeSlot, SlotStats> = FxHashMap::default();
        let mut overall = SlotStats::default();
        for r in &records {
            let Some(flow) = r.flow.filter(|f| f.is_finite()) else { continue };
            slots.entry(r.slot()).or_default().add(flow);
            overall.add(flow);
        }
        Self { records, slots, overall }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[FlowRecord] {
        &self.records
    }

    /// Mean flow of all records in `slot`; `None` if the slot has none.
    pub fn slot_mean(&self, slot: TimeSlot) -> Option<f64> {
        self.slots.get(&slot).and_then(|s| s.mean())
    }

    /// Mean flow over every record; `None` for an empty dataset.
    pub fn overall_mean(&self) -> Option<f64> {
        self.overall.mean()
    }

    /// Number of distinct `(weekday, interval)` slots with a usable flow.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Distinct sensor identifiers, sorted.
    pub fn sensor_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.records.iter().map(|r| r.sensor.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Earliest and latest `day` present, or `None` if empty.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.iter().map(|r| r.day).min()?;
        let last = self.records.iter().map(|r| r.day).max()?;
        Some((first, last))
    }
}
