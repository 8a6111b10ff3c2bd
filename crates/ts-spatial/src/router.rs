//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! The planner calls routing via the [`Router`] trait, so a contraction
//! hierarchy or A* can be swapped in without touching the weighting or
//! summarizing code.  The default [`DijkstraRouter`] is a plain binary-heap
//! Dijkstra, O((V + E) log V) per query.
//!
//! # Cost units
//!
//! Costs come from the caller's [`EdgeWeights`] overlay and are opaque `f64`
//! units.  The router never reads `edge_length_m`; a [`Route`] reports the
//! exact `EdgeId`s it used so the caller can total lengths itself.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use ts_core::{EdgeId, NodeId};

use crate::network::RoadNetwork;
use crate::weights::EdgeWeights;
use crate::{SpatialError, SpatialResult};

/// How many settled nodes between deadline checks.  `Instant::now()` is cheap
/// but not free; at this interval the overshoot is well under a millisecond.
const DEADLINE_CHECK_INTERVAL: usize = 256;

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Nodes visited in order, origin and destination included.
    pub nodes: Vec<NodeId>,
    /// Edges traversed in order; `edges[i]` connects `nodes[i]` → `nodes[i+1]`.
    /// Where parallel edges exist this is the one the search selected.
    pub edges: Vec<EdgeId>,
    /// Sum of overlay costs along `edges`.
    pub total_cost: f64,
}

impl Route {
    /// `true` if the origin and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    /// Sum of the static lengths of the traversed edges, in metres.
    pub fn length_m(&self, network: &RoadNetwork) -> f64 {
        self.edges.iter().map(|e| network.edge_length_m[e.index()]).sum()
    }
}

// ── SearchLimit ───────────────────────────────────────────────────────────────

/// Optional wall-clock budget for one search.
#[derive(Debug, Clone, Copy)]
pub struct SearchLimit {
    deadline: Option<(Instant, Duration)>,
}

impl SearchLimit {
    /// No budget: the search runs to completion.
    pub fn unbounded() -> Self {
        Self { deadline: None }
    }

    /// Budget of `budget` starting now.
    pub fn within(budget: Duration) -> Self {
        Self { deadline: Some((Instant::now() + budget, budget)) }
    }

    /// `Err(SearchTimeout)` once the deadline has passed.
    #[inline]
    pub fn check(&self) -> SpatialResult<()> {
        match self.deadline {
            Some((at, budget)) if Instant::now() >= at => Err(SpatialError::SearchTimeout(budget)),
            _ => Ok(()),
        }
    }
}

impl Default for SearchLimit {
    fn default() -> Self {
        Self::unbounded()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync`: one router instance serves every
/// concurrent request.  All per-query state lives on the stack of `route`.
pub trait Router: Send + Sync {
    /// Compute the minimum-cost route from `from` to `to` under `weights`.
    ///
    /// `from == to` yields a single-node route with zero cost.
    ///
    /// # Errors
    ///
    /// [`SpatialError::NoRoute`] if `to` is unreachable,
    /// [`SpatialError::SearchTimeout`] if `limit` expires first.
    fn route(
        &self,
        network: &RoadNetwork,
        weights: &EdgeWeights,
        from: NodeId,
        to: NodeId,
        limit: &SearchLimit,
    ) -> SpatialResult<Route>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra's algorithm over the CSR multigraph.
///
/// Every outgoing edge is relaxed individually, so when parallel edges join
/// the same pair of nodes the cheapest one is recorded in `prev_edge`.  On an
/// exact cost tie the lower `EdgeId` wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(
        &self,
        network: &RoadNetwork,
        weights: &EdgeWeights,
        from: NodeId,
        to: NodeId,
        limit: &SearchLimit,
    ) -> SpatialResult<Route> {
        dijkstra(network, weights, from, to, limit)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Min-heap entry.  `BinaryHeap` is a max-heap, so the ordering is reversed;
/// `NodeId` breaks cost ties for deterministic pop order.
#[derive(Copy, Clone, Debug)]
struct HeapEntry {
    cost: f64,
    node: NodeId,
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

fn dijkstra(
    network: &RoadNetwork,
    weights: &EdgeWeights,
    from: NodeId,
    to: NodeId,
    limit: &SearchLimit,
) -> SpatialResult<Route> {
    for n in [from, to] {
        if !network.contains_node(n) {
            return Err(SpatialError::NodeNotFound(n));
        }
    }
    if weights.len() != network.edge_count() {
        return Err(SpatialError::WeightCountMismatch {
            expected: network.edge_count(),
            got:      weights.len(),
        });
    }

    if from == to {
        return Ok(Route { nodes: vec![from], edges: vec![], total_cost: 0.0 });
    }

    let n = network.node_count();
    // dist[v] = best known cost to reach v.
    let mut dist      = vec![f64::INFINITY; n];
    // prev_edge[v] = EdgeId that reached v; EdgeId::INVALID for unreached nodes.
    let mut prev_edge = vec![EdgeId::INVALID; n];

    dist[from.index()] = 0.0;

    let mut heap = BinaryHeap::new();
    heap.push(HeapEntry { cost: 0.0, node: from });

    let mut settled = 0usize;
    while let Some(HeapEntry { cost, node }) = heap.pop() {
        if settled % DEADLINE_CHECK_INTERVAL == 0 {
            limit.check()?;
        }
        settled += 1;

        if node == to {
            tracing::trace!(%from, %to, settled, cost, "route found");
            return Ok(reconstruct(network, &prev_edge, from, to, cost));
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for edge in network.out_edges(node) {
            let neighbor = network.edge_to[edge.index()];
            let new_cost = cost + weights.cost(edge);

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(HeapEntry { cost: new_cost, node: neighbor });
            }
        }
    }

    Err(SpatialError::NoRoute { from, to })
}

fn reconstruct(
    network: &RoadNetwork,
    prev_edge: &[EdgeId],
    from: NodeId,
    to: NodeId,
    total_cost: f64,
) -> Route {
    let mut edges = Vec::new();
    let mut nodes = vec![to];
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        edges.push(e);
        cur = network.edge_from[e.index()];
        nodes.push(cur);
    }
    edges.reverse();
    nodes.reverse();
    Route { nodes, edges, total_cost }
}
