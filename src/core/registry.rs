use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment selected when switching to a client that has no registered
/// environments of its own (an unknown client).
pub const DEFAULT_ENVIRONMENT: &str = "QA";

// Built-in client table: client -> [(environment, path prefix)]
const DEFAULT_CLIENTS: &[(&str, &[(&str, &str)])] = &[
    ("Bestmed", &[("QA", r"Q:\BestMed\qa\sql"), ("LIVE", r"Q:\BestMed\live")]),
    ("Ship", &[("QA", r"Q:\SHIP\qa\sql"), ("LIVE", r"Q:\SHIP\live\sql")]),
    ("ZMG", &[("QA", r"Q:\ZimGen\qa\sql"), ("LIVE", r"Q:\ZimGen\live\sql")]),
    ("HMS", &[("QA", r"Q:\Zimbabwe\qa\sql"), ("LIVE", r"Q:\Zimbabwe\live\sql")]),
    ("ZMC", &[("QA", r"Q:\CIMAS\qa\sql"), ("LIVE", r"Q:\CIMAS\live\sql")]),
    ("HIP", &[("QA", r"Q:\iThrive\qa\sql"), ("LIVE", r"Q:\iThrive\live\sql")]),
    ("MMI", &[("QA", r"Q:\MMI_Africa\qa\sql"), ("LIVE", r"Q:\MMI_Africa\live\sql")]),
    ("FML", &[("QA", r"Q:\FML\qa\sql"), ("LIVE", r"Q:\FML\live\sql")]),
    ("Test", &[("TEST", r"Q:\iThrive\test\sql")]),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("client '{0}' has no environments")]
    NoEnvironments(String),
    #[error("client '{0}' is registered more than once")]
    DuplicateClient(String),
    #[error("client '{client}' lists environment '{environment}' more than once")]
    DuplicateEnvironment { client: String, environment: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentPath {
    pub name: String,
    pub path: String,
}

/// A client and the path prefix of each of its environments, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientPaths {
    pub name: String,
    pub environments: Vec<EnvironmentPath>,
}

impl ClientPaths {
    pub fn new(name: impl Into<String>, environments: &[(&str, &str)]) -> Self {
        Self {
            name: name.into(),
            environments: environments
                .iter()
                .map(|(env, path)| EnvironmentPath {
                    name: env.to_string(),
                    path: path.to_string(),
                })
                .collect(),
        }
    }

    pub fn is_single_environment(&self) -> bool {
        self.environments.len() == 1
    }

    fn path_for(&self, environment: &str) -> Option<&str> {
        self.environments
            .iter()
            .find(|env| env.name == environment)
            .map(|env| env.path.as_str())
    }
}

/// Immutable lookup table from client to environment to path prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientPathRegistry {
    clients: Vec<ClientPaths>,
}

impl Default for ClientPathRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientPathRegistry {
    /// Registry populated with the built-in client table.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_default_clients();
        registry
    }

    pub fn empty() -> Self {
        Self { clients: Vec::new() }
    }

    pub fn from_clients(clients: Vec<ClientPaths>) -> Result<Self, RegistryError> {
        let mut registry = Self::empty();
        for client in clients {
            registry.register_client(client)?;
        }
        Ok(registry)
    }

    fn register_default_clients(&mut self) {
        self.clients = DEFAULT_CLIENTS
            .iter()
            .map(|(name, environments)| ClientPaths::new(*name, environments))
            .collect();
    }

    pub fn register_client(&mut self, client: ClientPaths) -> Result<(), RegistryError> {
        if client.environments.is_empty() {
            return Err(RegistryError::NoEnvironments(client.name));
        }
        if self.client(&client.name).is_some() {
            return Err(RegistryError::DuplicateClient(client.name));
        }
        for (idx, env) in client.environments.iter().enumerate() {
            if client.environments[..idx].iter().any(|e| e.name == env.name) {
                return Err(RegistryError::DuplicateEnvironment {
                    client: client.name.clone(),
                    environment: env.name.clone(),
                });
            }
        }

        self.clients.push(client);
        Ok(())
    }

    pub fn client(&self, name: &str) -> Option<&ClientPaths> {
        self.clients.iter().find(|client| client.name == name)
    }

    pub fn clients(&self) -> impl Iterator<Item = &ClientPaths> {
        self.clients.iter()
    }

    pub fn client_names(&self) -> Vec<&str> {
        self.clients.iter().map(|client| client.name.as_str()).collect()
    }

    pub fn first_client(&self) -> Option<&str> {
        self.clients.first().map(|client| client.name.as_str())
    }

    /// Environments registered for `client`, empty when the client is unknown.
    pub fn environments(&self, client: &str) -> Vec<&str> {
        self.client(client)
            .map(|c| c.environments.iter().map(|env| env.name.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn is_single_environment(&self, client: &str) -> bool {
        self.client(client)
            .map(ClientPaths::is_single_environment)
            .unwrap_or(false)
    }

    /// Environment a client starts on when it is selected: the sole one for
    /// single-environment clients, otherwise the first registered one.
    pub fn default_environment(&self, client: &str) -> Option<&str> {
        self.client(client)
            .and_then(|c| c.environments.first())
            .map(|env| env.name.as_str())
    }

    /// Path prefix for `(client, environment)`.
    ///
    /// For a single-environment client the environment is ignored and the
    /// sole registered path is returned.
    pub fn resolve_path(&self, client: &str, environment: &str) -> Option<&str> {
        let client = self.client(client)?;
        if client.is_single_environment() {
            return client.environments.first().map(|env| env.path.as_str());
        }
        client.path_for(environment)
    }

    pub fn into_clients(self) -> Vec<ClientPaths> {
        self.clients
    }
}
