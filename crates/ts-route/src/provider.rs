//! Startup data providers.
//!
//! The planner does not care where its graph and dataset come from.  The
//! server tries the real provider first and falls back to a synthetic one:
//!
//! | Trait              | Real                    | Synthetic             |
//! |--------------------|-------------------------|-----------------------|
//! | [`GraphProvider`]  | `OsmGraph` (feat `osm`) | [`SyntheticGrid`]     |
//! | [`FlowDataProvider`] | [`CsvFlowData`]       | [`SyntheticFlowData`] |

use std::path::PathBuf;

use ts_core::{BoundingBox, DataRng, GeoPoint, ServiceWindow};
use ts_flow::{load_dataset_csv, synthetic_dataset, FlowDataset, DEFAULT_BUCKET_MINUTES};
use ts_spatial::{RoadNetwork, RoadNetworkBuilder};

use crate::LoadError;

// ── Traits ────────────────────────────────────────────────────────────────────

/// Source of the street network.
pub trait GraphProvider {
    /// Short label for logs.
    fn describe(&self) -> String;
    fn load_graph(&self) -> Result<RoadNetwork, LoadError>;
}

/// Source of the historical flow dataset.
pub trait FlowDataProvider {
    fn describe(&self) -> String;
    fn load_flow_data(&self) -> Result<FlowDataset, LoadError>;
}

// ── CSV dataset ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CsvFlowData {
    pub path: PathBuf,
}

impl CsvFlowData {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FlowDataProvider for CsvFlowData {
    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }

    fn load_flow_data(&self) -> Result<FlowDataset, LoadError> {
        if !self.path.exists() {
            return Err(LoadError::Missing(self.path.clone()));
        }
        Ok(load_dataset_csv(&self.path)?)
    }
}

// ── Synthetic dataset ─────────────────────────────────────────────────────────

/// Random detector records covering a service window.
#[derive(Debug, Clone)]
pub struct SyntheticFlowData {
    pub window:         ServiceWindow,
    pub sensor_count:   u32,
    pub bucket_minutes: u16,
    pub seed:           u64,
}

impl SyntheticFlowData {
    pub fn new(window: ServiceWindow, seed: u64) -> Self {
        Self { window, sensor_count: 20, bucket_minutes: DEFAULT_BUCKET_MINUTES, seed }
    }
}

impl FlowDataProvider for SyntheticFlowData {
    fn describe(&self) -> String {
        format!("synthetic:{} sensors, seed {}", self.sensor_count, self.seed)
    }

    fn load_flow_data(&self) -> Result<FlowDataset, LoadError> {
        let mut rng = DataRng::new(self.seed);
        Ok(synthetic_dataset(&self.window, self.sensor_count, self.bucket_minutes, &mut rng))
    }
}

// ── Synthetic grid ────────────────────────────────────────────────────────────

/// Regular `rows × cols` grid with two-way edges between 4-neighbours.
///
/// Node `r * cols + c` sits at row `r` (south → north) and column `c`
/// (west → east), evenly spaced over `bounds`.  Every edge has the same
/// nominal `segment_m` length regardless of the actual spacing.
#[derive(Debug, Clone)]
pub struct SyntheticGrid {
    pub rows:      u32,
    pub cols:      u32,
    pub bounds:    BoundingBox,
    pub segment_m: f64,
}

impl Default for SyntheticGrid {
    /// 10 × 10 nodes over central Taipei, 100 m segments.
    fn default() -> Self {
        Self {
            rows:      10,
            cols:      10,
            bounds:    BoundingBox::new(25.02, 25.05, 121.55, 121.58),
            segment_m: 100.0,
        }
    }
}

impl SyntheticGrid {
    pub fn build(&self) -> Result<RoadNetwork, LoadError> {
        let (rows, cols) = (self.rows as usize, self.cols as usize);
        let mut b = RoadNetworkBuilder::with_capacity(rows * cols, 4 * rows * cols);

        let step = |lo: f64, hi: f64, i: usize, n: usize| {
            if n > 1 { lo + (hi - lo) * i as f64 / (n - 1) as f64 } else { lo }
        };
        let mut ids = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            let lat = step(self.bounds.south, self.bounds.north, r, rows);
            for c in 0..cols {
                let lon = step(self.bounds.west, self.bounds.east, c, cols);
                ids.push(b.add_node(GeoPoint::new(lat, lon)));
            }
        }

        for r in 0..rows {
            for c in 0..cols {
                let here = ids[r * cols + c];
                if c + 1 < cols {
                    b.add_road(here, ids[r * cols + c + 1], self.segment_m)?;
                }
                if r + 1 < rows {
                    b.add_road(here, ids[(r + 1) * cols + c], self.segment_m)?;
                }
            }
        }
        Ok(b.build())
    }
}

impl GraphProvider for SyntheticGrid {
    fn describe(&self) -> String {
        format!("synthetic:{}x{} grid", self.rows, self.cols)
    }

    fn load_graph(&self) -> Result<RoadNetwork, LoadError> {
        let network = self.build()?;
        tracing::info!(
            nodes = network.node_count(),
            edges = network.edge_count(),
            "generated synthetic grid network"
        );
        Ok(network)
    }
}

// ── OSM extract ───────────────────────────────────────────────────────────────

/// Drivable roads from an OSM PBF extract, clipped to `bbox`.
#[cfg(feature = "osm")]
#[derive(Debug, Clone)]
pub struct OsmGraph {
    pub path: PathBuf,
    pub bbox: Option<BoundingBox>,
}

#[cfg(feature = "osm")]
impl GraphProvider for OsmGraph {
    fn describe(&self) -> String {
        format!("osm:{}", self.path.display())
    }

    fn load_graph(&self) -> Result<RoadNetwork, LoadError> {
        if !self.path.exists() {
            return Err(LoadError::Missing(self.path.clone()));
        }
        Ok(ts_spatial::osm::load_from_pbf(&self.path, self.bbox)?)
    }
}
