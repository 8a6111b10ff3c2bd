//! Edge weight model: fuses segment length with a flow estimate.
//!
//! ```text
//! flow_factor = max(1, 300 - flow) / 300
//! weight      = distance_weight * length + flow_weight * length * flow_factor
//! ```
//!
//! The factor shrinks as flow grows, so heavier historical flow makes a
//! segment *cheaper*.  That is the behavior the service has always had and is
//! kept as-is.  Once flow reaches 300 the factor bottoms out at `1/300`.
//!
//! One flow scalar is applied to every edge of a request, so the weights are
//! a positive multiple of the lengths and the chosen path is the
//! length-shortest one.  The flow term only matters if per-edge flows are
//! introduced later.

use serde::{Deserialize, Serialize};

use ts_spatial::{EdgeWeights, RoadNetwork, SpatialResult};

/// Flow at which the flow factor saturates.
pub const FLOW_SATURATION: f64 = 300.0;

/// Linear combination coefficients for the weight formula.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeWeightModel {
    pub distance_weight: f64,
    pub flow_weight:     f64,
}

impl Default for EdgeWeightModel {
    fn default() -> Self {
        Self { distance_weight: 0.7, flow_weight: 0.3 }
    }
}

impl EdgeWeightModel {
    /// `max(1, 300 - flow) / 300`, always in `(0, 1]` for finite flow >= 0.
    #[inline]
    pub fn flow_factor(flow: f64) -> f64 {
        (FLOW_SATURATION - flow).max(1.0) / FLOW_SATURATION
    }

    /// Routing cost of one segment of `length_m` metres under `flow`.
    #[inline]
    pub fn edge_weight(&self, length_m: f64, flow: f64) -> f64 {
        self.distance_weight * length_m + self.flow_weight * (length_m * Self::flow_factor(flow))
    }

    /// Weight every edge of `network` for one request.
    ///
    /// The result is request-local; the network is not touched.
    #[cfg(not(feature = "parallel"))]
    pub fn overlay(&self, network: &RoadNetwork, flow: f64) -> SpatialResult<EdgeWeights> {
        EdgeWeights::from_lengths(network, |len| self.edge_weight(len, flow))
    }

    /// Weight every edge of `network` for one request, on Rayon's pool.
    #[cfg(feature = "parallel")]
    pub fn overlay(&self, network: &RoadNetwork, flow: f64) -> SpatialResult<EdgeWeights> {
        use rayon::prelude::*;

        let costs: Vec<f64> = network
            .edge_length_m
            .par_iter()
            .map(|&len| self.edge_weight(len, flow))
            .collect();
        EdgeWeights::from_vec(network, costs)
    }
}
