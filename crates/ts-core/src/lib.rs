//! `ts-core`: foundational types for the `taipeisim` traffic-aware router.
//!
//! This crate is a dependency of every other `ts-*` crate.  It has no `ts-*`
//! dependencies and few external ones (`chrono`, `rand`, `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module    | Contents                                                     |
//! |-----------|--------------------------------------------------------------|
//! | [`ids`]   | `NodeId`, `EdgeId`                                           |
//! | [`geo`]   | `GeoPoint`, `BoundingBox`, haversine distance                |
//! | [`time`]  | `IntervalLabel`, `TimeSlot`, `DepartureTime`, `ServiceWindow`|
//! | [`rng`]   | `DataRng` (seeded generator for synthetic providers)         |
//! | [`error`] | `CoreError`, `CoreResult`                                    |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{BoundingBox, GeoPoint};
pub use ids::{EdgeId, NodeId};
pub use rng::DataRng;
pub use time::{DepartureTime, IntervalLabel, ServiceWindow, TimeSlot};
