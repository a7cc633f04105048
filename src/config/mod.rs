use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::registry::{ClientPathRegistry, ClientPaths, RegistryError};

/// Environment variable consulted when no `--config` flag is given.
pub const CONFIG_ENV_VAR: &str = "SQLCHECK_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid client table: {0}")]
    Registry(#[from] RegistryError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub clients: Vec<ClientPaths>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            clients: ClientPathRegistry::new().into_clients(),
        }
    }
}

impl Config {
    /// Load the client table from `path`, or the built-in table if the file
    /// does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            log::debug!("config {} not found, using built-in client table", path.display());
            Config::default()
        };

        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }

    /// Build the immutable registry, validating every client.
    pub fn into_registry(self) -> Result<ClientPathRegistry, ConfigError> {
        Ok(ClientPathRegistry::from_clients(self.clients)?)
    }
}

/// Config path from the command line, falling back to `SQLCHECK_CONFIG`.
pub fn config_path(flag: Option<PathBuf>) -> Option<PathBuf> {
    flag.or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from))
}

/// Load the registry used for the whole run.
pub fn load_registry(path: Option<&Path>) -> Result<ClientPathRegistry, ConfigError> {
    match path {
        Some(path) => {
            log::info!("loading client table from {}", path.display());
            Config::load(path)?.into_registry()
        }
        None => Ok(ClientPathRegistry::new()),
    }
}
