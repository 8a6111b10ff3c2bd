//! Process startup: load shared data once and assemble the app state.
//!
//! Each input falls back to its synthetic provider on any failure, so the
//! service always comes up with a graph and a dataset:
//!
//! | Input   | Tried first             | Fallback              |
//! |---------|-------------------------|-----------------------|
//! | graph   | OSM PBF (feature `osm`) | 10 × 10 synthetic grid |
//! | dataset | detector CSV            | synthetic records     |

use std::sync::Arc;

use ts_core::DataRng;
use ts_flow::FlowDataset;
use ts_route::{
    CsvFlowData, FlowDataProvider, GraphProvider, RoutePlanner, SensorMap, SyntheticFlowData,
    SyntheticGrid,
};
use ts_spatial::RoadNetwork;

use crate::app::AppState;
use crate::config::ServerConfig;

/// Stream of the configured seed used for sensor placement.
const SENSOR_STREAM: u64 = 1;

/// Load the street network, falling back to the synthetic grid.
pub fn load_graph(config: &ServerConfig) -> RoadNetwork {
    load_osm(config).unwrap_or_else(|| {
        let grid = SyntheticGrid::default();
        grid.load_graph().unwrap_or_else(|e| {
            tracing::error!(source = %grid.describe(), error = %e, "synthetic grid failed");
            RoadNetwork::empty()
        })
    })
}

#[cfg(feature = "osm")]
fn load_osm(config: &ServerConfig) -> Option<RoadNetwork> {
    let path = config.data.osm_pbf.as_ref()?;
    let provider = ts_route::OsmGraph { path: path.clone(), bbox: Some(config.data.bbox) };
    match provider.load_graph() {
        Ok(network) => Some(network),
        Err(e) => {
            tracing::error!(
                source = %provider.describe(),
                error = %e,
                "street network load failed, using synthetic grid"
            );
            None
        }
    }
}

#[cfg(not(feature = "osm"))]
fn load_osm(config: &ServerConfig) -> Option<RoadNetwork> {
    if let Some(path) = &config.data.osm_pbf {
        tracing::warn!(
            path = %path.display(),
            "built without the `osm` feature, ignoring data.osm_pbf"
        );
    }
    None
}

/// Load the historical dataset, falling back to synthetic records.
pub fn load_flow_data(config: &ServerConfig) -> FlowDataset {
    if let Some(path) = &config.data.traffic_csv {
        let provider = CsvFlowData::new(path);
        match provider.load_flow_data() {
            Ok(dataset) => return dataset,
            Err(e) => tracing::warn!(
                source = %provider.describe(),
                error = %e,
                "traffic data unavailable, using synthetic records"
            ),
        }
    }

    let synthetic = SyntheticFlowData {
        sensor_count: config.synthetic.sensor_count,
        ..SyntheticFlowData::new(config.routing.window.clone(), config.synthetic.seed)
    };
    synthetic.load_flow_data().unwrap_or_else(|e| {
        tracing::error!(source = %synthetic.describe(), error = %e, "synthetic dataset failed");
        FlowDataset::empty()
    })
}

/// Load everything and build the shared state.  Blocking.
pub fn build_state(config: &ServerConfig) -> AppState {
    tracing::info!("loading street network and traffic data");
    let network = Arc::new(load_graph(config));
    let dataset = Arc::new(load_flow_data(config));

    let mut rng = DataRng::for_stream(config.synthetic.seed, SENSOR_STREAM);
    let sensors = SensorMap::assign(&dataset, &network, &mut rng);

    tracing::info!(
        nodes = network.node_count(),
        edges = network.edge_count(),
        records = dataset.len(),
        sensors = sensors.len(),
        "router ready"
    );

    let planner = RoutePlanner::new(&config.routing).network(network).flow_data(dataset);
    AppState::new(planner, sensors, config.listener.request_timeout())
}
