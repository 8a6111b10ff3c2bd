//! Route-planning error types.

use std::time::Duration;

use thiserror::Error;

use ts_core::{CoreError, NodeId};
use ts_flow::FlowError;
use ts_spatial::SpatialError;

/// Why a single route request failed.
///
/// Each variant is a distinct failure kind that the HTTP layer maps to its own
/// status code.  Degraded flow estimates are never errors.
#[derive(Debug, Error)]
pub enum RouteError {
    /// Malformed timestamp, out-of-range departure, or invalid coordinates.
    #[error(transparent)]
    Validation(#[from] CoreError),

    /// A required shared resource was never loaded.
    #[error("{0} not loaded")]
    Unavailable(&'static str),

    #[error("no path found between {from} and {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("route search exceeded its {0:?} budget")]
    Timeout(Duration),

    /// Anything else; `stage` names the pipeline step that failed.
    #[error("{stage} failed: {source}")]
    Internal {
        stage:  &'static str,
        #[source]
        source: SpatialError,
    },
}

impl RouteError {
    /// Classify a spatial failure raised during `stage`.
    pub fn from_spatial(stage: &'static str, err: SpatialError) -> Self {
        match err {
            SpatialError::NoRoute { from, to } => RouteError::NoRoute { from, to },
            SpatialError::SearchTimeout(budget) => RouteError::Timeout(budget),
            source => RouteError::Internal { stage, source },
        }
    }

    /// Short machine-readable kind, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            RouteError::Validation(_)   => "validation",
            RouteError::Unavailable(_)  => "unavailable",
            RouteError::NoRoute { .. }  => "no_route",
            RouteError::Timeout(_)      => "timeout",
            RouteError::Internal { .. } => "internal",
        }
    }
}

pub type RouteResult<T> = Result<T, RouteError>;

/// Failures while loading a graph or dataset at startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("graph source: {0}")]
    Graph(#[from] SpatialError),

    #[error("flow source: {0}")]
    Flow(#[from] FlowError),

    #[error("{0} does not exist")]
    Missing(std::path::PathBuf),
}
