//! OSM PBF loader, enabled with the `osm` Cargo feature.
//!
//! # Usage
//!
//! ```ignore
//! use std::path::Path;
//! use ts_core::BoundingBox;
//! use ts_spatial::osm::load_from_pbf;
//!
//! let bbox = BoundingBox::new(24.95, 25.15, 121.45, 121.65);
//! let network = load_from_pbf(Path::new("taiwan-latest.osm.pbf"), Some(bbox))?;
//! ```
//!
//! # What is loaded
//!
//! Only drivable `highway=*` ways are included (see [`is_drivable`]).  When a
//! bounding box is given, nodes outside it are dropped along with every way
//! segment touching them.  One-way roads add a single directed edge; two-way
//! roads add both directions.  Edge length is the haversine distance between
//! consecutive way nodes.
//!
//! # Memory note
//!
//! The loader buffers every in-box OSM node in a `HashMap<i64, GeoPoint>` for
//! the first pass, since ways reference nodes by OSM integer ID.  The map is
//! freed before the R-tree is built.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use osmpbf::{Element, ElementReader};

use ts_core::{BoundingBox, GeoPoint, NodeId};

use crate::network::{RoadNetwork, RoadNetworkBuilder};
use crate::SpatialError;

// ── Public entry point ────────────────────────────────────────────────────────

/// Load a drivable street network from an OSM PBF file.
///
/// # Errors
///
/// Returns [`SpatialError::Osm`] if the file cannot be opened or parsed.
pub fn load_from_pbf(path: &Path, bbox: Option<BoundingBox>) -> Result<RoadNetwork, SpatialError> {
    // ── Phase 1: collect in-box OSM nodes + road ways in one pass ─────────
    let reader = ElementReader::from_path(path).map_err(|e| SpatialError::Osm(e.to_string()))?;

    let keep = |p: GeoPoint| bbox.is_none_or(|b| b.contains(p));
    let mut all_nodes: HashMap<i64, GeoPoint> = HashMap::new();
    let mut road_ways: Vec<OsmWay> = Vec::new();

    reader
        .for_each(|elem| match elem {
            Element::Node(n) => {
                let p = GeoPoint::new(n.lat(), n.lon());
                if keep(p) {
                    all_nodes.insert(n.id(), p);
                }
            }
            Element::DenseNode(n) => {
                let p = GeoPoint::new(n.lat(), n.lon());
                if keep(p) {
                    all_nodes.insert(n.id(), p);
                }
            }
            Element::Way(w) => {
                // Collect tags eagerly so &str lifetimes don't escape the closure.
                let tags: Vec<(&str, &str)> = w.tags().collect();
                let highway = tags
                    .iter()
                    .find(|(k, _)| *k == "highway")
                    .map(|(_, v)| *v);

                if let Some(highway) = highway.filter(|h| is_drivable(h)) {
                    let oneway = is_oneway(highway, &tags);
                    let refs: Vec<i64> = w.refs().collect();
                    road_ways.push(OsmWay { refs, oneway });
                }
            }
            _ => {}
        })
        .map_err(|e| SpatialError::Osm(e.to_string()))?;

    // ── Phase 2: identify road-referenced node IDs ────────────────────────
    let road_node_ids: HashSet<i64> = road_ways
        .iter()
        .flat_map(|w| w.refs.iter().copied())
        .filter(|id| all_nodes.contains_key(id))
        .collect();

    // ── Phase 3: build network ────────────────────────────────────────────
    let mut builder = RoadNetworkBuilder::with_capacity(
        road_node_ids.len(),
        road_node_ids.len() * 2,
    );

    // Sorted so NodeIds are stable across runs on the same extract.
    let mut sorted_ids: Vec<i64> = road_node_ids.into_iter().collect();
    sorted_ids.sort_unstable();

    let mut osm_to_ts: HashMap<i64, NodeId> = HashMap::with_capacity(sorted_ids.len());
    for osm_id in &sorted_ids {
        if let Some(&pos) = all_nodes.get(osm_id) {
            osm_to_ts.insert(*osm_id, builder.add_node(pos));
        }
    }

    drop(all_nodes);

    for way in &road_ways {
        for window in way.refs.windows(2) {
            if let (Some(&from), Some(&to)) = (osm_to_ts.get(&window[0]), osm_to_ts.get(&window[1])) {
                let len_m = builder.node_pos(from).distance_m(builder.node_pos(to));
                builder.add_directed_edge(from, to, len_m)?;
                if !way.oneway {
                    builder.add_directed_edge(to, from, len_m)?;
                }
            }
        }
    }

    tracing::info!(
        nodes = builder.node_count(),
        edges = builder.edge_count(),
        path = %path.display(),
        "street network loaded from OSM"
    );

    Ok(builder.build())
}

// ── Internal types ────────────────────────────────────────────────────────────

struct OsmWay {
    refs:   Vec<i64>,
    oneway: bool,
}

// ── Tag helpers ───────────────────────────────────────────────────────────────

/// `true` if a `highway` value is open to private cars.
fn is_drivable(highway: &str) -> bool {
    !matches!(
        highway,
        "footway" | "path" | "cycleway" | "pedestrian" | "steps" | "track"
            | "bridleway" | "corridor" | "elevator" | "platform" | "proposed"
            | "construction" | "abandoned" | "raceway" | "bus_guideway"
    )
}

/// Determine whether a way should be treated as one-way for car traffic.
///
/// Motorways and motorway links are implicitly one-way in OSM convention.
fn is_oneway(highway: &str, tags: &[(&str, &str)]) -> bool {
    let explicit = tags.iter().any(|(k, v)| {
        *k == "oneway" && matches!(*v, "yes" | "1" | "true")
    });
    let implicit = matches!(highway, "motorway" | "motorway_link");
    explicit || implicit
}
