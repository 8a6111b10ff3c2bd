//! `ts-flow`: historical traffic flow and time-of-week flow estimation.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`record`]    | `FlowRecord`: one detector reading for one interval       |
//! | [`dataset`]   | `FlowDataset`: immutable record set + per-slot index      |
//! | [`loader`]    | `load_dataset_csv`, `load_dataset_reader`                  |
//! | [`estimator`] | `FlowLookup` chain, `FlowEstimator`, `estimate_flow`       |
//! | [`synthetic`] | `synthetic_dataset`: mock records for degraded mode       |
//! | [`error`]     | `FlowError`, `FlowResult<T>`                               |
//!
//! A `FlowDataset` is built once and never mutated; share it behind an `Arc`
//! and read it from any number of threads.

pub mod dataset;
pub mod error;
pub mod estimator;
pub mod loader;
pub mod record;
pub mod synthetic;


pub use dataset::FlowDataset;
pub use error::{FlowError, FlowResult};
pub use estimator::{
    estimate_flow, DatasetMean, FixedFlow, FlowEstimate, FlowEstimator, FlowLookup, FlowSource,
    SlotMean, DEFAULT_BUCKET_MINUTES, DEFAULT_FLOW,
};
pub use loader::{load_dataset_csv, load_dataset_reader};
pub use record::FlowRecord;
pub use synthetic::synthetic_dataset;
