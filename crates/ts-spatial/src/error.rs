//! Spatial-subsystem error type.

use std::time::Duration;

use thiserror::Error;

use ts_core::{EdgeId, NodeId};

/// Errors produced by `ts-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("edge length {length} is not a finite non-negative number")]
    InvalidLength { length: f64 },

    #[error("weight {weight} on {edge} is not a finite non-negative number")]
    InvalidWeight { edge: EdgeId, weight: f64 },

    #[error("weight overlay has {got} entries but network has {expected} edges")]
    WeightCountMismatch { expected: usize, got: usize },

    #[error("route search exceeded its {0:?} budget")]
    SearchTimeout(Duration),

    #[cfg(feature = "osm")]
    #[error("OSM parse error: {0}")]
    Osm(String),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
