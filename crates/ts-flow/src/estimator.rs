//! Time-of-week flow estimation.
//!
//! # Lookup chain
//!
//! A request needs one representative flow scalar for its departure time.
//! The estimator tries an ordered list of [`FlowLookup`] strategies and takes
//! the first answer:
//!
//! | Order | Strategy        | Answers when                                   |
//! |-------|-----------------|------------------------------------------------|
//! | 1     | [`SlotMean`]    | at least one record shares weekday + interval  |
//! | 2     | [`DatasetMean`] | the dataset has any records at all             |
//! | 3     | [`FixedFlow`]   | always (`DEFAULT_FLOW` = 150.0)                |
//!
//! Steps 2 and 3 are degraded-mode fallbacks, not errors: routing stays
//! available with partial or no historical data.  The estimator accepts any
//! timestamp; range validation belongs to the request boundary.

use std::fmt;

use chrono::NaiveDateTime;

use ts_core::TimeSlot;

use crate::dataset::FlowDataset;

/// Flow used when no historical data can answer.
pub const DEFAULT_FLOW: f64 = 150.0;

/// Interval width of the shipped dataset, in minutes.
pub const DEFAULT_BUCKET_MINUTES: u16 = 30;

// ── FlowSource ────────────────────────────────────────────────────────────────

/// Which strategy produced an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowSource {
    SlotMean,
    DatasetMean,
    Fixed,
}

impl FlowSource {
    pub fn as_str(self) -> &'static str {
        match self {
            FlowSource::SlotMean    => "slot_mean",
            FlowSource::DatasetMean => "dataset_mean",
            FlowSource::Fixed       => "fixed",
        }
    }
}

impl fmt::Display for FlowSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estimated flow and the strategy that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowEstimate {
    pub flow:   f64,
    pub source: FlowSource,
    pub slot:   TimeSlot,
}

// ── FlowLookup strategies ─────────────────────────────────────────────────────

/// One step of the estimation chain.
///
/// `data` is `None` when no dataset was loaded at all.
pub trait FlowLookup: Send + Sync {
    fn source(&self) -> FlowSource;
    fn lookup(&self, data: Option<&FlowDataset>, slot: TimeSlot) -> Option<f64>;
}

/// Mean flow of records in the exact `(weekday, interval)` slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlotMean;

impl FlowLookup for SlotMean {
    fn source(&self) -> FlowSource {
        FlowSource::SlotMean
    }

    fn lookup(&self, data: Option<&FlowDataset>, slot: TimeSlot) -> Option<f64> {
        data?.slot_mean(slot)
    }
}

/// Mean flow over the whole dataset.
#[derive(Debug, Clone, Copy, Default)]
pub struct DatasetMean;

impl FlowLookup for DatasetMean {
    fn source(&self) -> FlowSource {
        FlowSource::DatasetMean
    }

    fn lookup(&self, data: Option<&FlowDataset>, _slot: TimeSlot) -> Option<f64> {
        data?.overall_mean()
    }
}

/// A constant.
#[derive(Debug, Clone, Copy)]
pub struct FixedFlow(pub f64);

impl Default for FixedFlow {
    fn default() -> Self {
        FixedFlow(DEFAULT_FLOW)
    }
}

impl FlowLookup for FixedFlow {
    fn source(&self) -> FlowSource {
        FlowSource::Fixed
    }

    fn lookup(&self, _data: Option<&FlowDataset>, _slot: TimeSlot) -> Option<f64> {
        Some(self.0)
    }
}

// ── FlowEstimator ─────────────────────────────────────────────────────────────

/// Runs a [`FlowLookup`] chain for a departure time.
pub struct FlowEstimator {
    bucket_minutes: u16,
    chain:          Vec<Box<dyn FlowLookup>>,
}

impl FlowEstimator {
    /// The standard chain: slot mean → dataset mean → `default_flow`.
    pub fn new(bucket_minutes: u16, default_flow: f64) -> Self {
        Self::with_chain(
            bucket_minutes,
            vec![Box::new(SlotMean), Box::new(DatasetMean), Box::new(FixedFlow(default_flow))],
        )
    }

    /// A custom chain.  If no step answers, [`DEFAULT_FLOW`] is used.
    pub fn with_chain(bucket_minutes: u16, chain: Vec<Box<dyn FlowLookup>>) -> Self {
        Self { bucket_minutes, chain }
    }

    /// Estimate the flow for a departure at `at`.  Never fails.
    pub fn estimate(&self, data: Option<&FlowDataset>, at: NaiveDateTime) -> FlowEstimate {
        let slot = TimeSlot::containing(at, self.bucket_minutes);
        let (flow, source) = self
            .chain
            .iter()
            .find_map(|step| step.lookup(data, slot).map(|f| (f, step.source())))
            .unwrap_or((DEFAULT_FLOW, FlowSource::Fixed));

        tracing::debug!(%slot, flow, %source, "flow estimated");
        FlowEstimate { flow, source, slot }
    }
}

impl Default for FlowEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_BUCKET_MINUTES, DEFAULT_FLOW)
    }
}

impl fmt::Debug for FlowEstimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let steps: Vec<FlowSource> = self.chain.iter().map(|s| s.source()).collect();
        f.debug_struct("FlowEstimator")
            .field("bucket_minutes", &self.bucket_minutes)
            .field("chain", &steps)
            .finish()
    }
}

/// Representative flow for `at` using the standard chain with 30-minute
/// buckets.
pub fn estimate_flow(data: Option<&FlowDataset>, at: NaiveDateTime) -> f64 {
    FlowEstimator::default().estimate(data, at).flow
}
