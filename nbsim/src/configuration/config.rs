//! Configuration types for loading the server from YAML.
//!
//! A thin, `serde`-deserializable representation of how the server runs:
//!
//! - [`ServerConfig`]     – bind address, websocket route, broadcast buffer
//! - [`ParametersConfig`] – numerical parameters and physical constants
//! - [`AppConfig`]        – top-level wrapper loaded from YAML
//!
//! Every field has a default, so an empty document (or no file at all)
//! gives a working server.
//!
//! # YAML format
//!
//! ```yaml
//! server:
//!   host: "0.0.0.0"
//!   port: 8080
//!   path: "/simulation"     # websocket route viewers connect to
//!   broadcast_capacity: 16  # snapshots buffered per viewer before it lags
//!
//! parameters:
//!   h0: 0.005               # tick length and integration step (seconds)
//!   eps2: 1.0               # softening epsilon^2
//!   G: 667.43               # gravity for a multiplier of 1.0
//!   max_bodies: 1000        # body count clamp
//!   extent: 1000.0          # bodies spawn in [-extent, extent]^2
//!   max_mass: 10.0          # masses drawn from (0, max_mass)
//!   seed: 42                # optional, omit for entropy
//! ```
//!
//! The runtime maps `parameters` into `simulation::params::Parameters`.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::simulation::params::{BASELINE_G, DEFAULT_DT, DEFAULT_EPS2, MAX_BODIES, MAX_MASS, SPAWN_EXTENT};

/// Where and how viewers connect
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String, // bind host
    pub port: u16, // bind port
    pub path: String, // websocket route
    pub broadcast_capacity: usize, // per-viewer snapshot buffer
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            path: "/simulation".to_string(),
            broadcast_capacity: 16,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Global numerical and physical parameters
#[allow(non_snake_case)]
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ParametersConfig {
    pub h0: f64, // time step size
    pub eps2: f64, // softening
    pub G: f64, // baseline gravitational constant
    pub max_bodies: usize, // body count clamp
    pub extent: f64, // spawn square half-width
    pub max_mass: f64, // spawn mass upper bound
    pub seed: Option<u64>, // deterministic seed
}

impl Default for ParametersConfig {
    fn default() -> Self {
        Self {
            h0: DEFAULT_DT,
            eps2: DEFAULT_EPS2,
            G: BASELINE_G,
            max_bodies: MAX_BODIES,
            extent: SPAWN_EXTENT,
            max_mass: MAX_MASS,
            seed: None,
        }
    }
}

/// Top-level configuration loaded from YAML
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub parameters: ParametersConfig,
}

impl AppConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        serde_yaml::from_reader(BufReader::new(file)).map_err(|source| ConfigError::Yaml {
            path: display,
            source,
        })
    }
}
