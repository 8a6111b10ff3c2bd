//! The request pipeline.
//!
//! ```text
//! RouteRequest
//!   ① validate    graph present, timestamp parses, inside window, coords valid
//!   ② snap        nearest node to origin and destination
//!   ③ estimate    one flow scalar for the departure's time-of-week slot
//!   ④ weight      request-local EdgeWeights overlay
//!   ⑤ search      Router under the configured SearchLimit
//!   ⑥ summarize   geometry, distance, travel time
//! ```
//!
//! `RoutePlanner` holds only shared read-only state (`Arc`s and plain
//! parameters), so one instance serves any number of concurrent requests.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use ts_core::{DepartureTime, GeoPoint, ServiceWindow};
use ts_flow::{FlowDataset, FlowEstimator};
use ts_spatial::{DijkstraRouter, RoadNetwork, Router, SearchLimit};

use crate::config::RoutingConfig;
use crate::summary::{summarize, RouteSummary, TravelModel};
use crate::weight::EdgeWeightModel;
use crate::{RouteError, RouteResult};

/// One origin–destination query, as received over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub start_lat:      f64,
    pub start_lng:      f64,
    pub end_lat:        f64,
    pub end_lng:        f64,
    /// ISO-8601, e.g. `2017-09-19T08:30:00`.
    pub departure_time: String,
}

/// Shared route-planning service.
pub struct RoutePlanner<R: Router = DijkstraRouter> {
    network:       Option<Arc<RoadNetwork>>,
    flow_data:     Option<Arc<FlowDataset>>,
    router:        R,
    estimator:     FlowEstimator,
    weights:       EdgeWeightModel,
    travel:        TravelModel,
    window:        ServiceWindow,
    search_budget: Option<Duration>,
}

impl RoutePlanner<DijkstraRouter> {
    pub fn new(config: &RoutingConfig) -> Self {
        Self::with_router(config, DijkstraRouter)
    }
}

impl<R: Router> RoutePlanner<R> {
    /// A planner with no graph or dataset attached yet.
    pub fn with_router(config: &RoutingConfig, router: R) -> Self {
        Self {
            network:       None,
            flow_data:     None,
            router,
            estimator:     FlowEstimator::new(config.flow.bucket_minutes, config.flow.default_flow),
            weights:       config.weights,
            travel:        config.travel,
            window:        config.window.clone(),
            search_budget: config.search_budget(),
        }
    }

    pub fn network(mut self, network: Arc<RoadNetwork>) -> Self {
        self.network = Some(network);
        self
    }

    /// Attach the historical dataset.  Without one, every estimate is the
    /// configured default flow.
    pub fn flow_data(mut self, data: Arc<FlowDataset>) -> Self {
        self.flow_data = Some(data);
        self
    }

    pub fn graph(&self) -> Option<&RoadNetwork> {
        self.network.as_deref()
    }

    pub fn dataset(&self) -> Option<&FlowDataset> {
        self.flow_data.as_deref()
    }

    pub fn window(&self) -> &ServiceWindow {
        &self.window
    }

    /// Compute the traffic-aware route for `req`.
    ///
    /// # Errors
    ///
    /// - [`RouteError::Unavailable`] if no graph is attached or it is empty.
    /// - [`RouteError::Validation`] for a malformed or out-of-window
    ///   timestamp, or invalid coordinates.
    /// - [`RouteError::NoRoute`] if the destination node is unreachable.
    /// - [`RouteError::Timeout`] if the search exceeds its budget.
    /// - [`RouteError::Internal`] for anything else.
    pub fn plan(&self, req: &RouteRequest) -> RouteResult<RouteSummary> {
        // ① validate
        let network = match self.network.as_deref() {
            Some(n) if !n.is_empty() => n,
            _ => return Err(RouteError::Unavailable("street network")),
        };
        let departure = DepartureTime::parse(&req.departure_time)?;
        self.window.check(&departure)?;
        let origin = GeoPoint::checked(req.start_lat, req.start_lng)?;
        let destination = GeoPoint::checked(req.end_lat, req.end_lng)?;

        // ② snap
        let from = network
            .snap_to_node(origin)
            .ok_or(RouteError::Unavailable("street network"))?;
        let to = network
            .snap_to_node(destination)
            .ok_or(RouteError::Unavailable("street network"))?;
        tracing::debug!(%from, %to, "endpoints snapped");

        // ③ estimate
        let estimate = self.estimator.estimate(self.dataset(), departure.local());

        // ④ weight
        let weights = self
            .weights
            .overlay(network, estimate.flow)
            .map_err(|e| RouteError::from_spatial("weighting", e))?;

        // ⑤ search
        let limit = self.search_budget.map_or_else(SearchLimit::unbounded, SearchLimit::within);
        let route = self
            .router
            .route(network, &weights, from, to, &limit)
            .map_err(|e| RouteError::from_spatial("search", e))?;

        // ⑥ summarize
        let summary = summarize(network, &route, estimate.flow, estimate.source, &departure, &self.travel);
        tracing::info!(
            %from,
            %to,
            flow = estimate.flow,
            source = %estimate.source,
            path_nodes = summary.path_nodes(),
            distance_km = summary.distance_km,
            "route planned"
        );
        Ok(summary)
    }
}

impl<R: Router> std::fmt::Debug for RoutePlanner<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutePlanner")
            .field("network", &self.network)
            .field("flow_records", &self.flow_data.as_ref().map(|d| d.len()))
            .field("estimator", &self.estimator)
            .field("weights", &self.weights)
            .field("travel", &self.travel)
            .field("window", &self.window)
            .field("search_budget", &self.search_budget)
            .finish()
    }
}
