//! `ts-spatial`: street network, nearest-node snapping, and weighted routing.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`network`] | `RoadNetwork` (CSR multigraph + R-tree), `RoadNetworkBuilder` |
//! | [`weights`] | `EdgeWeights`: per-request cost overlay keyed by `EdgeId`  |
//! | [`router`]  | `Router` trait, `Route`, `DijkstraRouter`, `SearchLimit`    |
//! | [`osm`]     | `load_from_pbf` (feature = `"osm"` only)                    |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                          |
//!
//! # Sharing model
//!
//! A `RoadNetwork` is immutable once built: topology, node positions and
//! static lengths only.  Routing costs never live on the network; each
//! request builds its own [`EdgeWeights`] and hands it to the router, so any
//! number of requests can search one `Arc<RoadNetwork>` concurrently.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `osm`   | Enables OSM PBF loading via the `osmpbf` crate.             |
//! | `serde` | Derives `Serialize`/`Deserialize` on `ts-core` types.       |

pub mod error;
pub mod network;
pub mod router;
pub mod weights;

#[cfg(feature = "osm")]
pub mod osm;

#[cfg(test)]
mod tests;

pub use error::{SpatialError, SpatialResult};
pub use network::{RoadNetwork, RoadNetworkBuilder};
pub use router::{DijkstraRouter, Route, Router, SearchLimit};
pub use weights::EdgeWeights;
