//! Routing parameters.
//!
//! Every section has a `Default` matching the production service, and every
//! struct is `#[serde(default)]`, so a TOML file only needs the keys it
//! changes:
//!
//! ```toml
//! [routing]
//! search_timeout_ms = 2000
//!
//! [routing.weights]
//! distance_weight = 0.7
//! flow_weight     = 0.3
//!
//! [routing.window]
//! first_day = "2017-09-18"
//! last_day  = "2017-11-30"
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use ts_core::ServiceWindow;
use ts_flow::{DEFAULT_BUCKET_MINUTES, DEFAULT_FLOW};

use crate::summary::TravelModel;
use crate::weight::EdgeWeightModel;

/// Flow-estimation settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Flow used when no historical data is available.
    pub default_flow:   f64,
    /// Width of the time-of-day buckets the dataset is aggregated in.
    pub bucket_minutes: u16,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self { default_flow: DEFAULT_FLOW, bucket_minutes: DEFAULT_BUCKET_MINUTES }
    }
}

/// All parameters of the route planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub weights: EdgeWeightModel,
    pub travel:  TravelModel,
    pub flow:    FlowConfig,
    /// Departures outside this range are rejected.
    pub window:  ServiceWindow,
    /// Per-search wall-clock budget.  `None` lets searches run to completion.
    pub search_timeout_ms: Option<u64>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            weights: EdgeWeightModel::default(),
            travel:  TravelModel::default(),
            flow:    FlowConfig::default(),
            window:  ServiceWindow::default(),
            search_timeout_ms: Some(5_000),
        }
    }
}

impl RoutingConfig {
    pub fn search_budget(&self) -> Option<Duration> {
        self.search_timeout_ms.map(Duration::from_millis)
    }
}
