//! Per-request routing cost overlay.
//!
//! `EdgeWeights` holds one cost per `EdgeId` of a specific [`RoadNetwork`].
//! It is built fresh for every request and owned by that request, which is
//! what keeps concurrent searches over one shared network independent: there
//! is no mutable weight state anywhere else.
//!
//! Every cost is validated on construction to be finite and non-negative,
//! so Dijkstra never sees a value that would make routes ill-defined.

use ts_core::EdgeId;

use crate::network::RoadNetwork;
use crate::{SpatialError, SpatialResult};

#[derive(Debug, Clone)]
pub struct EdgeWeights {
    costs: Vec<f64>,
}

impl EdgeWeights {
    /// Derive a cost for every edge from its static length.
    pub fn from_lengths<F>(network: &RoadNetwork, cost_of: F) -> SpatialResult<Self>
    where
        F: Fn(f64) -> f64,
    {
        let costs = network.edge_length_m.iter().map(|&len| cost_of(len)).collect();
        Self::from_vec(network, costs)
    }

    /// Adopt precomputed costs indexed by `EdgeId`.
    ///
    /// # Errors
    ///
    /// [`SpatialError::WeightCountMismatch`] if `costs` does not have exactly
    /// one entry per edge, [`SpatialError::InvalidWeight`] for the first
    /// negative or non-finite cost.
    pub fn from_vec(network: &RoadNetwork, costs: Vec<f64>) -> SpatialResult<Self> {
        if costs.len() != network.edge_count() {
            return Err(SpatialError::WeightCountMismatch {
                expected: network.edge_count(),
                got:      costs.len(),
            });
        }
        if let Some((i, &w)) = costs
            .iter()
            .enumerate()
            .find(|&(_, w)| !w.is_finite() || *w < 0.0)
        {
            return Err(SpatialError::InvalidWeight { edge: EdgeId(i as u32), weight: w });
        }
        Ok(Self { costs })
    }

    #[inline]
    pub fn cost(&self, edge: EdgeId) -> f64 {
        self.costs[edge.index()]
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.costs
    }
}
