use std::path::{Path, PathBuf};

use log::{error, info};
use rocket::{
    fairing::{Fairing, Info, Kind},
    Build, Rocket,
};
use serde::Deserialize;
use thiserror::Error;

/// Backend base URL used when `ELECTION_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Blanket per-request timeout used when `ELECTION_API_TIMEOUT` is not set.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(&'static str, String),
}

/// Where the front end finds the backend, and how patient it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_url: String,
    timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Self::default()
        }
    }

    /// Load from `ELECTION_API_URL` and `ELECTION_API_TIMEOUT`, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(url) = lookup("ELECTION_API_URL").map(|url| url.trim().to_string()) {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidValue("ELECTION_API_URL", url));
            }
            config.api_url = url;
        }
        if let Some(timeout) = lookup("ELECTION_API_TIMEOUT") {
            config.timeout_secs = timeout
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("ELECTION_API_TIMEOUT", timeout))?;
        }
        Ok(config)
    }

    /// Base URL of the backend, including the `/api` prefix.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Per-request timeout in seconds.
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }
}

/// Static server configuration, derived from `Rocket.toml`, `ROCKET_*`
/// environment variables and `PORT`. This becomes managed state.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_dist_dir")]
    dist_dir: PathBuf,
}

fn default_dist_dir() -> PathBuf {
    PathBuf::from("dist")
}

impl ServerConfig {
    pub fn new(dist_dir: impl Into<PathBuf>) -> Self {
        Self {
            dist_dir: dist_dir.into(),
        }
    }

    /// Directory holding the built front end bundle.
    pub fn dist_dir(&self) -> &Path {
        &self.dist_dir
    }

    /// The single-page application's entry document.
    pub fn index_file(&self) -> PathBuf {
        self.dist_dir.join("index.html")
    }
}

/// A fairing that loads the server config and puts it in managed state.
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // A config may already be managed, e.g. by tests.
        if rocket.state::<ServerConfig>().is_some() {
            return Ok(rocket);
        }

        let config = match rocket.figment().extract::<ServerConfig>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load server config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };
        if !config.index_file().is_file() {
            error!(
                "No index.html in {}; build the front end first",
                config.dist_dir().display()
            );
            return Err(rocket);
        }
        info!("Serving bundle from {}", config.dist_dir().display());

        rocket = rocket.manage(config);
        Ok(rocket)
    }
}
