//! Server configuration: TOML file + command-line overrides.
//!
//! ```toml
//! [listener]
//! bind_address       = "0.0.0.0:8000"
//! request_timeout_ms = 30000
//!
//! [data]
//! traffic_csv = "cleaned_traffic_data_Taipeh.csv"
//! osm_pbf     = "taiwan-latest.osm.pbf"
//! bbox        = { south = 24.95, north = 25.15, west = 121.45, east = 121.65 }
//!
//! [routing.weights]
//! distance_weight = 0.7
//! flow_weight     = 0.3
//!
//! [synthetic]
//! seed = 42
//! ```
//!
//! Every section is optional.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use ts_core::BoundingBox;
use ts_route::RoutingConfig;

// ── Schema ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listener:  ListenerConfig,
    pub data:      DataConfig,
    pub routing:   RoutingConfig,
    pub synthetic: SyntheticConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    pub bind_address:       String,
    /// Hard ceiling on one `/calculate_route` call, planning included.
    pub request_timeout_ms: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self { bind_address: "0.0.0.0:8000".to_string(), request_timeout_ms: 30_000 }
    }
}

impl ListenerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Historical detector CSV.  Missing file → synthetic dataset.
    pub traffic_csv: Option<PathBuf>,
    /// OSM extract.  Unset, missing, or built without `osm` → synthetic grid.
    pub osm_pbf:     Option<PathBuf>,
    /// Area of the extract to keep.
    pub bbox:        BoundingBox,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            traffic_csv: Some(PathBuf::from("cleaned_traffic_data_Taipeh.csv")),
            osm_pbf:     None,
            bbox:        BoundingBox::new(24.95, 25.15, 121.45, 121.65),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    /// Seed for the mock dataset and the sensor placement.
    pub seed:         u64,
    pub sensor_count: u32,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self { seed: 42, sensor_count: 20 }
    }
}

// ── CLI ───────────────────────────────────────────────────────────────────────

/// Traffic-aware route planner for Taipei.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Listen address, overriding `listener.bind_address`.
    #[arg(long)]
    pub bind: Option<String>,
}

// ── Loading ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing {path}: {source}")]
    Parse {
        path:   PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Read and validate a TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Io { path: path.to_owned(), source })?;
    let config: ServerConfig = toml::from_str(&text)
        .map_err(|source| ConfigError::Parse { path: path.to_owned(), source })?;
    config.validate()?;
    Ok(config)
}

impl ServerConfig {
    /// Configuration for this process: file (if any) then CLI overrides.
    ///
    /// A `--config` path that does not exist falls back to defaults with a
    /// warning; a file that exists but is malformed is an error.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match cli.config.as_deref() {
            Some(path) if path.exists() => load_config(path)?,
            Some(path) => {
                tracing::warn!(path = %path.display(), "config file not found, using defaults");
                ServerConfig::default()
            }
            None => ServerConfig::default(),
        };
        if let Some(bind) = &cli.bind {
            config.listener.bind_address = bind.clone();
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let r = &self.routing;
        let bad = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        let non_negative = |v: f64| v.is_finite() && v >= 0.0;
        if !non_negative(r.weights.distance_weight) || !non_negative(r.weights.flow_weight) {
            return bad("routing.weights must be finite and non-negative");
        }
        if !(r.travel.base_speed_kmh > 0.0 && r.travel.reference_flow > 0.0) {
            return bad("routing.travel.base_speed_kmh and reference_flow must be positive");
        }
        if !(r.travel.min_factor > 0.0 && r.travel.min_factor <= r.travel.max_factor) {
            return bad("routing.travel needs 0 < min_factor <= max_factor");
        }
        if !(1..=1_440).contains(&r.flow.bucket_minutes) {
            return bad("routing.flow.bucket_minutes must be between 1 and 1440");
        }
        if !r.flow.default_flow.is_finite() {
            return bad("routing.flow.default_flow must be finite");
        }
        if r.window.first_day > r.window.last_day {
            return bad("routing.window.first_day is after last_day");
        }
        let b = &self.data.bbox;
        if !(b.south <= b.north && b.west <= b.east) {
            return bad("data.bbox is empty");
        }
        if self.listener.request_timeout_ms == 0 {
            return bad("listener.request_timeout_ms must be positive");
        }
        Ok(())
    }
}
