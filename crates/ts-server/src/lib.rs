//! `ts-server`: HTTP front end for the taipeisim router.
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`config`]  | `ServerConfig` (TOML), `Cli`, `load_config`               |
//! | [`startup`] | graph/dataset loading with synthetic fallback, `build_state` |
//! | [`app`]     | axum `Router`, handlers, error → status mapping           |

pub mod app;
pub mod config;
pub mod startup;

#[cfg(test)]
mod tests;

pub use app::{router, AppState};
pub use config::{load_config, Cli, ConfigError, ServerConfig};
