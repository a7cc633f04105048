use std::path::{Path, PathBuf};

use crate::core::registry::{ClientPathRegistry, DEFAULT_ENVIRONMENT};
use crate::core::{extract, generate, listing};
use crate::export::{self, ClipboardSink, CopyOutcome, ExportError};

/// Input changes the session reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    TextChanged(String),
    ClientChanged(String),
    EnvironmentChanged(String),
}

/// Everything the user has entered plus the outputs derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    pub text: String,
    pub client: String,
    pub environment: String,
    pub filenames: Vec<String>,
    pub script: String,
}

impl SessionState {
    /// Empty text, first registered client on its default environment.
    pub fn new(registry: &ClientPathRegistry) -> Self {
        let client = registry.first_client().unwrap_or_default().to_string();
        let environment = environment_for(registry, &client);
        recompute(
            registry,
            Self {
                client,
                environment,
                ..Default::default()
            },
        )
    }

    pub fn listing(&self) -> String {
        listing(&self.filenames)
    }

    pub fn resolved_path<'a>(&self, registry: &'a ClientPathRegistry) -> Option<&'a str> {
        registry.resolve_path(&self.client, &self.environment)
    }
}

fn environment_for(registry: &ClientPathRegistry, client: &str) -> String {
    registry
        .default_environment(client)
        .unwrap_or(DEFAULT_ENVIRONMENT)
        .to_string()
}

// Derived fields are rebuilt from scratch on every event.
fn recompute(registry: &ClientPathRegistry, mut state: SessionState) -> SessionState {
    state.filenames = extract(&state.text);
    let path = state.resolved_path(registry);
    if path.is_none() {
        log::debug!(
            "no path registered for client '{}' environment '{}'",
            state.client,
            state.environment
        );
    }
    state.script = generate(&state.filenames, path);
    state
}

/// Apply one input change and return the fully recomputed state.
pub fn reduce(registry: &ClientPathRegistry, state: SessionState, event: SessionEvent) -> SessionState {
    let mut next = state;
    match event {
        SessionEvent::TextChanged(text) => {
            next.text = text;
        }
        SessionEvent::ClientChanged(client) => {
            next.environment = environment_for(registry, &client);
            next.client = client;
        }
        SessionEvent::EnvironmentChanged(environment) => {
            if registry.is_single_environment(&next.client) {
                log::debug!(
                    "client '{}' has a single environment, ignoring '{}'",
                    next.client,
                    environment
                );
            } else {
                next.environment = environment;
            }
        }
    }
    recompute(registry, next)
}

/// A session bound to the registry it was started with.
pub struct Session {
    registry: ClientPathRegistry,
    state: SessionState,
}

impl Session {
    pub fn new(registry: ClientPathRegistry) -> Self {
        let state = SessionState::new(&registry);
        Self { registry, state }
    }

    pub fn registry(&self) -> &ClientPathRegistry {
        &self.registry
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn apply(&mut self, event: SessionEvent) -> &SessionState {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(&self.registry, state, event);
        &self.state
    }

    pub fn resolved_path(&self) -> Option<&str> {
        self.state.resolved_path(&self.registry)
    }

    pub fn copy(&self, sink: &mut dyn ClipboardSink) -> Result<CopyOutcome, ExportError> {
        export::copy_script(&self.state.script, sink)
    }

    pub fn download(&self, dir: &Path) -> Result<Option<PathBuf>, ExportError> {
        export::write_script_file(&self.state.script, dir)
    }
}
