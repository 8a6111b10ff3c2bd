//! Core error type.
//!
//! Everything here is a request-validation failure: malformed timestamps,
//! interval labels, or coordinates, and departures outside the dataset's
//! covered date range.  Downstream crates wrap `CoreError` as one variant.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid departure time {0:?}: expected ISO-8601 (e.g. 2017-09-19T08:30:00)")]
    InvalidTimestamp(String),

    #[error("invalid interval label {0:?}: expected HH:MM, HH:MM:SS, or seconds since midnight")]
    InvalidInterval(String),

    #[error("invalid coordinate ({lat}, {lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("departure time must be between {first} and {last}")]
    OutsideWindow { first: NaiveDate, last: NaiveDate },
}

pub type CoreResult<T> = Result<T, CoreError>;
