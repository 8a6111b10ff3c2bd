//! Route summary and its GeoJSON Feature rendering.
//!
//! # Travel-time model
//!
//! ```text
//! traffic_factor = clamp(flow / reference_flow, min_factor, max_factor)
//! minutes        = distance_km / (base_speed_kmh * traffic_factor) * 60
//! ```
//!
//! With the defaults (30 km/h, reference 150, factor in `[0.5, 1.5]`) a flow
//! of 150 means 30 km/h.  As with the weight model, more flow means a higher
//! effective speed here.
//!
//! Values are kept at full precision in [`RouteSummary`]; rounding (distance
//! 2 dp, time 1 dp, flow 1 dp) happens only in [`RouteSummary::to_feature`].

use serde::{Deserialize, Serialize};

use ts_core::{DepartureTime, NodeId};
use ts_flow::FlowSource;
use ts_spatial::{RoadNetwork, Route};

// ── TravelModel ───────────────────────────────────────────────────────────────

/// Parameters of the travel-time estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelModel {
    pub base_speed_kmh: f64,
    pub reference_flow: f64,
    pub min_factor:     f64,
    pub max_factor:     f64,
}

impl Default for TravelModel {
    fn default() -> Self {
        Self { base_speed_kmh: 30.0, reference_flow: 150.0, min_factor: 0.5, max_factor: 1.5 }
    }
}

impl TravelModel {
    /// `flow / reference_flow` clamped to `[min_factor, max_factor]`.
    pub fn traffic_factor(&self, flow: f64) -> f64 {
        (flow / self.reference_flow).max(self.min_factor).min(self.max_factor)
    }

    /// Predicted minutes to cover `distance_km` under `flow`.
    pub fn travel_minutes(&self, distance_km: f64, flow: f64) -> f64 {
        distance_km / (self.base_speed_kmh * self.traffic_factor(flow)) * 60.0
    }
}

// ── RouteSummary ──────────────────────────────────────────────────────────────

/// Everything the response needs about one computed route, unrounded.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSummary {
    /// `[lon, lat]` of every path node, in order.
    pub coordinates:     Vec<[f64; 2]>,
    pub nodes:           Vec<NodeId>,
    pub distance_km:     f64,
    pub travel_time_min: f64,
    pub average_flow:    f64,
    pub flow_source:     FlowSource,
    /// The caller's original timestamp string.
    pub departure_time:  String,
}

impl RouteSummary {
    pub fn path_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Render as a GeoJSON `Feature` with a `LineString` geometry.
    pub fn to_feature(&self) -> RouteFeature {
        RouteFeature {
            kind:     "Feature",
            geometry: LineString { kind: "LineString", coordinates: self.coordinates.clone() },
            properties: RouteProperties {
                distance_km:               round_to(self.distance_km, 2),
                predicted_travel_time_min: round_to(self.travel_time_min, 1),
                average_flow:              round_to(self.average_flow, 1),
                departure_time:            self.departure_time.clone(),
                path_nodes:                self.path_nodes(),
            },
        }
    }
}

/// Assemble the summary for `route`.
///
/// Distance is the sum of the static lengths of the edges the search actually
/// selected, so parallel edges are accounted for correctly.
pub fn summarize(
    network:   &RoadNetwork,
    route:     &Route,
    flow:      f64,
    source:    FlowSource,
    departure: &DepartureTime,
    travel:    &TravelModel,
) -> RouteSummary {
    let coordinates = route
        .nodes
        .iter()
        .filter_map(|&n| network.position(n))
        .map(|p| p.lon_lat())
        .collect();
    let distance_km = route.length_m(network) / 1_000.0;

    RouteSummary {
        coordinates,
        nodes: route.nodes.clone(),
        distance_km,
        travel_time_min: travel.travel_minutes(distance_km, flow),
        average_flow: flow,
        flow_source: source,
        departure_time: departure.as_str().to_owned(),
    }
}

/// Round half away from zero to `dp` decimal places.
pub fn round_to(value: f64, dp: i32) -> f64 {
    let scale = 10f64.powi(dp);
    (value * scale).round() / scale
}

// ── GeoJSON ───────────────────────────────────────────────────────────────────

/// Wire shape of a route response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteFeature {
    #[serde(rename = "type")]
    pub kind:       &'static str,
    pub geometry:   LineString,
    pub properties: RouteProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineString {
    #[serde(rename = "type")]
    pub kind:        &'static str,
    pub coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteProperties {
    pub distance_km:               f64,
    pub predicted_travel_time_min: f64,
    pub average_flow:              f64,
    pub departure_time:            String,
    pub path_nodes:                usize,
}
