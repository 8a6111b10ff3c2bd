//! Detector-to-node association.
//!
//! The historical dataset identifies detectors only by id, so each detector
//! is placed on a pseudo-randomly chosen graph node.  The map is informational
//! (reported by the health endpoint); routing does not read it.

use ts_core::{DataRng, GeoPoint, NodeId};
use ts_flow::FlowDataset;
use ts_spatial::RoadNetwork;

#[derive(Debug, Clone, PartialEq)]
pub struct SensorPlacement {
    pub sensor:   String,
    pub node:     NodeId,
    pub position: GeoPoint,
}

/// Sensor placements sorted by sensor id.
#[derive(Debug, Clone, Default)]
pub struct SensorMap {
    placements: Vec<SensorPlacement>,
}

impl SensorMap {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Place each distinct sensor of `dataset` on a random node of `network`.
    ///
    /// Sensors are taken in sorted id order and capped at the node count.
    /// The same seed always yields the same placement.
    pub fn assign(dataset: &FlowDataset, network: &RoadNetwork, rng: &mut DataRng) -> Self {
        let node_count = network.node_count();
        if node_count == 0 {
            return Self::empty();
        }

        let placements: Vec<SensorPlacement> = dataset
            .sensor_ids()
            .into_iter()
            .take(node_count)
            .filter_map(|sensor| {
                let node = NodeId(rng.gen_range(0..node_count as u32));
                let position = network.position(node)?;
                Some(SensorPlacement { sensor: sensor.to_owned(), node, position })
            })
            .collect();

        tracing::info!(sensors = placements.len(), nodes = node_count, "sensor map built");
        Self { placements }
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn get(&self, sensor: &str) -> Option<&SensorPlacement> {
        self.placements
            .binary_search_by(|p| p.sensor.as_str().cmp(sensor))
            .ok()
            .map(|i| &self.placements[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &SensorPlacement> {
        self.placements.iter()
    }
}
