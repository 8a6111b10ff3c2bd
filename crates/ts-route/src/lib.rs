//! `ts-route`: traffic-aware route planning over a shared street network.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`weight`]   | `EdgeWeightModel`: length + flow → routing cost           |
//! | [`summary`]  | `TravelModel`, `RouteSummary`, GeoJSON `RouteFeature`      |
//! | [`planner`]  | `RouteRequest`, `RoutePlanner`: the per-request pipeline  |
//! | [`provider`] | `GraphProvider`/`FlowDataProvider` and their implementations |
//! | [`sensors`]  | `SensorMap`: detector → node placement                    |
//! | [`config`]   | `RoutingConfig`                                            |
//! | [`error`]    | `RouteError`, `RouteResult<T>`, `LoadError`                |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | Builds the weight overlay on Rayon's thread pool.         |
//! | `osm`      | Enables `provider::OsmGraph`.                             |

pub mod config;
pub mod error;
pub mod planner;
pub mod provider;
pub mod sensors;
pub mod summary;
pub mod weight;


pub use config::{FlowConfig, RoutingConfig};
pub use error::{LoadError, RouteError, RouteResult};
pub use planner::{RoutePlanner, RouteRequest};
pub use provider::{CsvFlowData, FlowDataProvider, GraphProvider, SyntheticFlowData, SyntheticGrid};
#[cfg(feature = "osm")]
pub use provider::OsmGraph;
pub use sensors::{SensorMap, SensorPlacement};
pub use summary::{round_to, summarize, RouteFeature, RouteSummary, TravelModel};
pub use weight::{EdgeWeightModel, FLOW_SATURATION};
