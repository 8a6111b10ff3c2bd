//! Unit tests for ts-server.

#[cfg(test)]
mod helpers {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use tower::ServiceExt;

    use ts_core::GeoPoint;
    use ts_route::{RoutePlanner, RoutingConfig, SensorMap};
    use ts_spatial::{RoadNetwork, RoadNetworkBuilder};

    use crate::{router, AppState};

    /// A(0,0) - B(0,1) - C(0,2), two-way, 100 m per segment.
    pub fn line_network() -> RoadNetwork {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let m = b.add_node(GeoPoint::new(0.0, 1.0));
        let c = b.add_node(GeoPoint::new(0.0, 2.0));
        b.add_road(a, m, 100.0).unwrap();
        b.add_road(m, c, 100.0).unwrap();
        b.build()
    }

    pub fn app(network: Option<RoadNetwork>, routing: RoutingConfig) -> Router {
        let mut planner = RoutePlanner::new(&routing);
        if let Some(n) = network {
            planner = planner.network(Arc::new(n));
        }
        router(AppState::new(planner, SensorMap::empty(), Duration::from_secs(5)))
    }

    pub fn route_body(from: (f64, f64), to: (f64, f64), when: &str) -> String {
        serde_json::json!({
            "start_lat": from.0,
            "start_lng": from.1,
            "end_lat": to.0,
            "end_lng": to.1,
            "departure_time": when,
        })
        .to_string()
    }

    pub fn post_route(body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/calculate_route")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    pub async fn send(app: Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use std::io::Write;
    use std::path::PathBuf;

    use crate::{load_config, Cli, ConfigError, ServerConfig};

    fn write_toml(text: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(text.as_bytes()).unwrap();
        f
    }

    #[test]
    fn defaults() {
        let c = ServerConfig::default();
        assert_eq!(c.listener.bind_address, "0.0.0.0:8000");
        assert_eq!(c.data.traffic_csv, Some(PathBuf::from("cleaned_traffic_data_Taipeh.csv")));
        assert_eq!(c.data.osm_pbf, None);
        assert_eq!(c.data.bbox.south, 24.95);
        assert_eq!(c.synthetic.seed, 42);
        assert_eq!(c.synthetic.sensor_count, 20);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_file_overrides() {
        let f = write_toml(
            r#"
[listener]
bind_address = "127.0.0.1:9000"

[data]
osm_pbf = "taipei.osm.pbf"
bbox = { south = 25.0, north = 25.1, west = 121.5, east = 121.6 }

[routing]
search_timeout_ms = 250

[routing.weights]
flow_weight = 0.4

[routing.window]
first_day = "2017-10-01"
last_day  = "2017-10-31"
"#,
        );
        let c = load_config(f.path()).unwrap();
        assert_eq!(c.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(c.listener.request_timeout_ms, 30_000);
        assert_eq!(c.data.osm_pbf, Some(PathBuf::from("taipei.osm.pbf")));
        assert_eq!(c.data.bbox.north, 25.1);
        assert_eq!(c.routing.search_timeout_ms, Some(250));
        assert_eq!(c.routing.weights.flow_weight, 0.4);
        assert_eq!(c.routing.weights.distance_weight, 0.7);
        assert_eq!(c.routing.window.first_day.to_string(), "2017-10-01");
        assert_eq!(c.routing.travel.base_speed_kmh, 30.0);
    }

    #[test]
    fn empty_file_is_default() {
        let f = write_toml("");
        assert_eq!(load_config(f.path()).unwrap(), ServerConfig::default());
    }

    #[test]
    fn malformed_toml() {
        let f = write_toml("[listener\nbind_address = 1");
        assert!(matches!(load_config(f.path()), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn validation_failures() {
        let cases = [
            "[routing.travel]\nmin_factor = 2.0\nmax_factor = 1.0\n",
            "[routing.weights]\nflow_weight = -0.1\n",
            "[routing.flow]\nbucket_minutes = 0\n",
            "[routing.window]\nfirst_day = \"2017-12-01\"\nlast_day = \"2017-09-18\"\n",
            "[listener]\nrequest_timeout_ms = 0\n",
        ];
        for text in cases {
            let f = write_toml(text);
            assert!(matches!(load_config(f.path()), Err(ConfigError::Invalid(_))), "{text}");
        }
    }

    #[test]
    fn cli_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli { config: Some(dir.path().join("absent.toml")), bind: Some("127.0.0.1:1".into()) };
        let c = ServerConfig::resolve(&cli).unwrap();
        assert_eq!(c.listener.bind_address, "127.0.0.1:1");
        assert_eq!(c.routing, ServerConfig::default().routing);

        let f = write_toml("[synthetic]\nseed = 7\n");
        let cli = Cli { config: Some(f.path().to_owned()), bind: None };
        let c = ServerConfig::resolve(&cli).unwrap();
        assert_eq!(c.synthetic.seed, 7);
        assert_eq!(c.listener.bind_address, "0.0.0.0:8000");
    }
}

// ── Startup ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod startup {
    use chrono::NaiveDate;
    use ts_core::ServiceWindow;

    use crate::startup::{build_state, load_flow_data, load_graph};
    use crate::ServerConfig;

    fn one_day_config() -> ServerConfig {
        let day = NaiveDate::from_ymd_opt(2017, 9, 18).unwrap();
        let mut c = ServerConfig::default();
        c.routing.window = ServiceWindow::new(day, day);
        c
    }

    #[test]
    fn missing_inputs_fall_back_to_synthetic() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = one_day_config();
        c.data.traffic_csv = Some(dir.path().join("missing.csv"));
        c.data.osm_pbf = Some(dir.path().join("missing.osm.pbf"));

        let net = load_graph(&c);
        assert_eq!(net.node_count(), 100);

        let ds = load_flow_data(&c);
        assert_eq!(ds.len(), 48 * 20);
    }

    #[test]
    fn state_reports_everything_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = one_day_config();
        c.data.traffic_csv = Some(dir.path().join("missing.csv"));
        let state = build_state(&c);
        assert_eq!(state.planner.graph().map(|g| g.edge_count()), Some(360));
        assert_eq!(state.planner.dataset().map(|d| d.len()), Some(960));
        assert_eq!(state.sensors.len(), 20);
    }

    #[test]
    fn csv_is_preferred_when_present() {
        use std::io::Write;
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "day,interval,detid,flow\n2017-09-18,08:30,DET001,120").unwrap();
        let mut c = one_day_config();
        c.data.traffic_csv = Some(f.path().to_owned());
        assert_eq!(load_flow_data(&c).len(), 1);
    }
}

// ── HTTP ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod http {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};

    use ts_core::GeoPoint;
    use ts_route::{RouteError, RoutingConfig};
    use ts_spatial::{RoadNetworkBuilder, SpatialError};

    use super::helpers::{app, get, line_network, post_route, route_body, send};
    use crate::app::status_for;

    const TUESDAY: &str = "2017-09-19T08:30:00";

    #[tokio::test]
    async fn root_reports_load_state() {
        let (status, json) = send(app(Some(line_network()), RoutingConfig::default()), get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "operational");
        assert_eq!(json["graph_loaded"], true);
        assert_eq!(json["data_loaded"], false);
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn health_counts() {
        let (status, json) = send(app(Some(line_network()), RoutingConfig::default()), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["graph_nodes"], 3);
        assert_eq!(json["graph_edges"], 4);
        assert_eq!(json["traffic_records"], 0);
        assert_eq!(json["sensors"], 0);
    }

    #[tokio::test]
    async fn route_success() {
        let app = app(Some(line_network()), RoutingConfig::default());
        let (status, json) = send(app, post_route(route_body((0.0, 0.0), (0.0, 2.0), TUESDAY))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["type"], "Feature");
        assert_eq!(json["geometry"]["type"], "LineString");
        assert_eq!(json["geometry"]["coordinates"].as_array().map(Vec::len), Some(3));
        let props = &json["properties"];
        assert_eq!(props["distance_km"], 0.2);
        assert_eq!(props["predicted_travel_time_min"], 0.4);
        assert_eq!(props["average_flow"], 150.0);
        assert_eq!(props["departure_time"], TUESDAY);
        assert_eq!(props["path_nodes"], 3);
    }

    #[tokio::test]
    async fn out_of_window_is_400() {
        let app = app(Some(line_network()), RoutingConfig::default());
        let (status, json) =
            send(app, post_route(route_body((0.0, 0.0), (0.0, 2.0), "2017-12-01T00:00:00"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let detail = json["detail"].as_str().unwrap();
        assert!(detail.contains("2017-09-18") && detail.contains("2017-11-30"), "{detail}");
    }

    #[tokio::test]
    async fn bad_coordinates_and_timestamp_are_400() {
        for body in [
            route_body((95.0, 0.0), (0.0, 2.0), TUESDAY),
            route_body((0.0, 0.0), (0.0, 2.0), "tomorrow morning"),
        ] {
            let app = app(Some(line_network()), RoutingConfig::default());
            let (status, _) = send(app, post_route(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn malformed_body_is_client_error() {
        let app = app(Some(line_network()), RoutingConfig::default());
        let (status, json) = send(app, post_route(r#"{"start_lat": 0.0}"#.to_string())).await;
        assert!(status.is_client_error(), "{status}");
        assert!(json["detail"].as_str().is_some_and(|d| d.contains("missing field")), "{json}");
    }

    #[tokio::test]
    async fn unparseable_body_uses_detail_shape() {
        let app = app(Some(line_network()), RoutingConfig::default());
        let (status, json) = send(app, post_route("not json".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["detail"].is_string(), "{json}");
    }

    #[tokio::test]
    async fn no_graph_is_503() {
        let app = app(None, RoutingConfig::default());
        let (status, json) = send(app, post_route(route_body((0.0, 0.0), (0.0, 2.0), TUESDAY))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(json["detail"].is_string());
    }

    #[tokio::test]
    async fn unreachable_is_404() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        b.add_directed_edge(a, c, 100.0).unwrap();
        let app = app(Some(b.build()), RoutingConfig::default());
        let (status, _) = send(app, post_route(route_body((0.0, 1.0), (0.0, 0.0), TUESDAY))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn search_timeout_is_504() {
        let routing = RoutingConfig { search_timeout_ms: Some(0), ..RoutingConfig::default() };
        let app = app(Some(line_network()), routing);
        let (status, _) = send(app, post_route(route_body((0.0, 0.0), (0.0, 2.0), TUESDAY))).await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn cors_preflight_allowed() {
        let app = app(Some(line_network()), RoutingConfig::default());
        let req = Request::builder()
            .method("OPTIONS")
            .uri("/calculate_route")
            .header("origin", "http://localhost:3000")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();
        let resp = tower::ServiceExt::oneshot(app, req).await.unwrap();
        assert!(resp.status().is_success());
        assert!(resp.headers().contains_key("access-control-allow-origin"));
    }

    #[test]
    fn status_mapping() {
        let internal = RouteError::Internal {
            stage:  "weighting",
            source: SpatialError::WeightCountMismatch { expected: 4, got: 0 },
        };
        assert_eq!(status_for(&internal), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status_for(&RouteError::Unavailable("street network")), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            status_for(&RouteError::Timeout(std::time::Duration::from_millis(1))),
            StatusCode::GATEWAY_TIMEOUT
        );
    }
}
