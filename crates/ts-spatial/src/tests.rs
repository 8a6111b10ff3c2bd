//! Unit tests for ts-spatial.
//!
//! All tests use a hand-crafted network so they run without any OSM file.

#[cfg(test)]
mod helpers {
    use ts_core::{GeoPoint, NodeId};
    use crate::{EdgeWeights, RoadNetwork, RoadNetworkBuilder};

    /// Build a small grid network for testing.
    ///
    /// Nodes (lat, lon):
    ///   0:(0,0)  1:(0,1)  2:(0,2)
    ///   3:(1,0)           4:(1,2)
    ///
    /// Two-way segments with lengths (m):
    ///   0-1: 100, 1-2: 100, 2-4: 100, 0-3: 500, 3-4: 100
    ///
    /// By length, 0→4 is 0→1→2→4 (300 m) rather than 0→3→4 (600 m).
    pub fn grid_network() -> (RoadNetwork, [NodeId; 5]) {
        let mut b = RoadNetworkBuilder::new();

        let n0 = b.add_node(GeoPoint::new(0.0, 0.0));
        let n1 = b.add_node(GeoPoint::new(0.0, 1.0));
        let n2 = b.add_node(GeoPoint::new(0.0, 2.0));
        let n3 = b.add_node(GeoPoint::new(1.0, 0.0));
        let n4 = b.add_node(GeoPoint::new(1.0, 2.0));

        b.add_road(n0, n1, 100.0).unwrap();
        b.add_road(n1, n2, 100.0).unwrap();
        b.add_road(n2, n4, 100.0).unwrap();
        b.add_road(n0, n3, 500.0).unwrap(); // long detour
        b.add_road(n3, n4, 100.0).unwrap();

        (b.build(), [n0, n1, n2, n3, n4])
    }

    /// Cost = length.
    pub fn by_length(net: &RoadNetwork) -> EdgeWeights {
        EdgeWeights::from_lengths(net, |len| len).unwrap()
    }
}

// ── Builder & network structure ────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use ts_core::{GeoPoint, NodeId};
    use crate::{RoadNetworkBuilder, SpatialError};

    #[test]
    fn empty_build() {
        let net = RoadNetworkBuilder::new().build();
        assert_eq!(net.node_count(), 0);
        assert_eq!(net.edge_count(), 0);
        assert!(net.is_empty());
    }

    #[test]
    fn single_road() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(25.03, 121.56));
        let c = b.add_node(GeoPoint::new(25.04, 121.56));
        b.add_road(a, c, 1_000.0).unwrap();
        let net = b.build();
        assert_eq!(net.node_count(), 2);
        assert_eq!(net.edge_count(), 2); // bidirectional
    }

    #[test]
    fn csr_out_edges() {
        let (net, [n0, n1, n2, n3, n4]) = super::helpers::grid_network();

        let n1_out: Vec<_> = net.out_edges(n1).collect();
        assert_eq!(n1_out.len(), 2, "n1 should have 2 outgoing edges");

        assert_eq!(net.out_edges(n0).count(), 2); // n0→n1, n0→n3
        assert_eq!(net.out_edges(n2).count(), 2); // n2→n1, n2→n4
        assert_eq!(net.out_edges(n3).count(), 2); // n3→n0, n3→n4
        assert_eq!(net.out_edges(n4).count(), 2); // n4→n2, n4→n3
    }

    #[test]
    fn out_edges_source_correctness() {
        let (net, [n0, n1, _, _, _]) = super::helpers::grid_network();
        for e in net.out_edges(n0) {
            assert_eq!(net.edge_from[e.index()], n0);
        }
        assert!(net.out_edges(n0).any(|e| net.edge_to[e.index()] == n1));
    }

    #[test]
    fn directed_only_edge() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        b.add_directed_edge(a, c, 100.0).unwrap();
        let net = b.build();
        assert_eq!(net.edge_count(), 1);
        assert_eq!(net.out_edges(a).count(), 1);
        assert_eq!(net.out_edges(c).count(), 0); // no return edge
    }

    #[test]
    fn parallel_edges_are_kept() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        b.add_directed_edge(a, c, 300.0).unwrap();
        b.add_directed_edge(a, c, 120.0).unwrap();
        let net = b.build();
        let between: Vec<_> = net.out_edges(a).collect();
        assert_eq!(between.len(), 2);
        // Stable sort keeps insertion order among parallels.
        assert_eq!(net.edge_length_m[between[0].index()], 300.0);
        assert_eq!(net.edge_length_m[between[1].index()], 120.0);
        assert_eq!(net.out_edges(c).count(), 0);
    }

    #[test]
    fn rejects_negative_and_non_finite_length() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        assert!(matches!(
            b.add_directed_edge(a, c, -1.0),
            Err(SpatialError::InvalidLength { .. })
        ));
        assert!(b.add_directed_edge(a, c, f64::NAN).is_err());
        assert!(b.add_directed_edge(a, c, 0.0).is_ok());
        assert_eq!(b.edge_count(), 1);
    }

    #[test]
    fn rejects_unknown_endpoint() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        assert!(matches!(
            b.add_directed_edge(a, NodeId(9), 10.0),
            Err(SpatialError::NodeNotFound(NodeId(9)))
        ));
    }
}

// ── Spatial snap ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod snap {
    use ts_core::GeoPoint;
    use crate::RoadNetworkBuilder;

    #[test]
    fn snap_exact_position() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        assert_eq!(net.snap_to_node(GeoPoint::new(0.0, 0.0)), Some(n0));
    }

    #[test]
    fn snap_nearest() {
        let (net, [n0, n1, ..]) = super::helpers::grid_network();
        // 0.4 from n0 vs 0.6 from n1.
        assert_eq!(net.snap_to_node(GeoPoint::new(0.0, 0.4)), Some(n0));
        assert_eq!(net.snap_to_node(GeoPoint::new(0.0, 0.6)), Some(n1));
    }

    #[test]
    fn empty_network_returns_none() {
        let net = RoadNetworkBuilder::new().build();
        assert!(net.snap_to_node(GeoPoint::new(0.0, 0.0)).is_none());
    }
}

// ── Weight overlay ────────────────────────────────────────────────────────────

#[cfg(test)]
mod weights {
    use ts_core::EdgeId;
    use crate::{EdgeWeights, SpatialError};

    #[test]
    fn from_lengths_covers_every_edge() {
        let (net, _) = super::helpers::grid_network();
        let w = EdgeWeights::from_lengths(&net, |len| len * 2.0).unwrap();
        assert_eq!(w.len(), net.edge_count());
        for i in 0..net.edge_count() {
            let e = EdgeId(i as u32);
            assert_eq!(w.cost(e), net.edge_length_m[i] * 2.0);
        }
    }

    #[test]
    fn rejects_wrong_length() {
        let (net, _) = super::helpers::grid_network();
        assert!(matches!(
            EdgeWeights::from_vec(&net, vec![1.0; 3]),
            Err(SpatialError::WeightCountMismatch { expected: 10, got: 3 })
        ));
    }

    #[test]
    fn rejects_negative_or_nan() {
        let (net, _) = super::helpers::grid_network();
        let mut costs = vec![1.0; net.edge_count()];
        costs[4] = -0.5;
        assert!(matches!(
            EdgeWeights::from_vec(&net, costs.clone()),
            Err(SpatialError::InvalidWeight { edge: EdgeId(4), .. })
        ));
        costs[4] = f64::NAN;
        assert!(EdgeWeights::from_vec(&net, costs).is_err());
    }
}

// ── Dijkstra routing ──────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use std::time::Duration;

    use ts_core::{GeoPoint, NodeId};
    use crate::{
        DijkstraRouter, EdgeWeights, RoadNetworkBuilder, Router, SearchLimit, SpatialError,
    };

    #[test]
    fn trivial_same_node() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        let w = super::helpers::by_length(&net);
        let r = DijkstraRouter.route(&net, &w, n0, n0, &SearchLimit::unbounded()).unwrap();
        assert!(r.is_trivial());
        assert_eq!(r.nodes, vec![n0]);
        assert_eq!(r.total_cost, 0.0);
        assert_eq!(r.length_m(&net), 0.0);
    }

    #[test]
    fn shortest_path_by_length() {
        let (net, [n0, n1, n2, _, n4]) = super::helpers::grid_network();
        let w = super::helpers::by_length(&net);
        let route = DijkstraRouter.route(&net, &w, n0, n4, &SearchLimit::unbounded()).unwrap();

        assert_eq!(route.nodes, vec![n0, n1, n2, n4]);
        assert_eq!(route.edges.len(), 3);
        assert_eq!(route.total_cost, 300.0);
        assert_eq!(route.length_m(&net), 300.0);

        // Edge sequence connects the node sequence.
        for (i, e) in route.edges.iter().enumerate() {
            assert_eq!(net.edge_from[e.index()], route.nodes[i]);
            assert_eq!(net.edge_to[e.index()], route.nodes[i + 1]);
        }
    }

    #[test]
    fn weights_not_lengths_drive_selection() {
        let (net, [n0, _, _, n3, n4]) = super::helpers::grid_network();
        // Make every edge not touching n3 ten times as expensive.
        let costs = (0..net.edge_count())
            .map(|i| {
                let touches_n3 = net.edge_from[i] == n3 || net.edge_to[i] == n3;
                if touches_n3 { net.edge_length_m[i] } else { net.edge_length_m[i] * 10.0 }
            })
            .collect();
        let w = EdgeWeights::from_vec(&net, costs).unwrap();

        let route = DijkstraRouter.route(&net, &w, n0, n4, &SearchLimit::unbounded()).unwrap();
        // 0→3→4 costs 600 vs 3000 for 0→1→2→4, even though it is longer.
        assert_eq!(route.nodes, vec![n0, n3, n4]);
        assert_eq!(route.total_cost, 600.0);
        assert_eq!(route.length_m(&net), 600.0);
    }

    #[test]
    fn parallel_edges_pick_cheapest() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        b.add_directed_edge(a, c, 300.0).unwrap();
        b.add_directed_edge(a, c, 120.0).unwrap();
        b.add_directed_edge(a, c, 200.0).unwrap();
        let net = b.build();
        let w = EdgeWeights::from_lengths(&net, |len| len).unwrap();

        let route = DijkstraRouter.route(&net, &w, a, c, &SearchLimit::unbounded()).unwrap();
        assert_eq!(route.edges.len(), 1);
        assert_eq!(net.edge_length_m[route.edges[0].index()], 120.0);
        assert_eq!(route.length_m(&net), 120.0);
        assert_eq!(route.total_cost, 120.0);
    }

    #[test]
    fn no_route_disconnected() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(1.0, 0.0));
        let net = b.build();
        let w = EdgeWeights::from_lengths(&net, |len| len).unwrap();
        let result = DijkstraRouter.route(&net, &w, a, c, &SearchLimit::unbounded());
        assert!(matches!(result, Err(SpatialError::NoRoute { .. })));
    }

    #[test]
    fn directed_one_way_blocks_return() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        b.add_directed_edge(a, c, 100.0).unwrap();
        let net = b.build();
        let w = EdgeWeights::from_lengths(&net, |len| len).unwrap();
        let limit = SearchLimit::unbounded();

        assert!(DijkstraRouter.route(&net, &w, a, c, &limit).is_ok());
        assert!(matches!(
            DijkstraRouter.route(&net, &w, c, a, &limit),
            Err(SpatialError::NoRoute { .. })
        ));
    }

    #[test]
    fn expired_budget_is_a_timeout() {
        let (net, [n0, _, _, _, n4]) = super::helpers::grid_network();
        let w = super::helpers::by_length(&net);
        let limit = SearchLimit::within(Duration::ZERO);
        assert!(matches!(
            DijkstraRouter.route(&net, &w, n0, n4, &limit),
            Err(SpatialError::SearchTimeout(_))
        ));
    }

    #[test]
    fn generous_budget_completes() {
        let (net, [n0, _, _, _, n4]) = super::helpers::grid_network();
        let w = super::helpers::by_length(&net);
        let limit = SearchLimit::within(Duration::from_secs(60));
        assert!(DijkstraRouter.route(&net, &w, n0, n4, &limit).is_ok());
    }

    #[test]
    fn unknown_node_is_rejected() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        let w = super::helpers::by_length(&net);
        assert!(matches!(
            DijkstraRouter.route(&net, &w, n0, NodeId(99), &SearchLimit::unbounded()),
            Err(SpatialError::NodeNotFound(NodeId(99)))
        ));
    }

    #[test]
    fn overlay_from_other_network_is_rejected() {
        let (net, [n0, _, _, _, n4]) = super::helpers::grid_network();
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        b.add_road(a, c, 1.0).unwrap();
        let other = b.build();
        let w = EdgeWeights::from_lengths(&other, |len| len).unwrap();
        assert!(matches!(
            DijkstraRouter.route(&net, &w, n0, n4, &SearchLimit::unbounded()),
            Err(SpatialError::WeightCountMismatch { .. })
        ));
    }
}
