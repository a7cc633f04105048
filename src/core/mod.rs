pub mod extractor;
pub mod generator;
pub mod registry;

// Re-export the pipeline entry points
pub use extractor::{extract, listing};
pub use generator::generate;
pub use registry::{ClientPathRegistry, ClientPaths, EnvironmentPath, RegistryError};

/// Run the whole pipeline for one selection: extract, resolve, generate.
pub fn build_script(
    registry: &ClientPathRegistry,
    text: &str,
    client: &str,
    environment: &str,
) -> String {
    let filenames = extract(text);
    generate(&filenames, registry.resolve_path(client, environment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_for_single_environment_client() {
        let registry = ClientPathRegistry::new();
        let script = build_script(&registry, "deploy fix.sql", "Test", "LIVE");
        assert_eq!(
            script,
            "@echo off\nif exist \"Q:\\iThrive\\test\\sql\\fix.sql\" (echo fix.sql found) else (echo fix.sql missing)\n\npause"
        );
    }

    #[test]
    fn pipeline_degrades_to_empty() {
        let registry = ClientPathRegistry::new();
        assert_eq!(build_script(&registry, "deploy fix.sql", "Nobody", "QA"), "");
        assert_eq!(build_script(&registry, "nothing to deploy", "Ship", "QA"), "");
    }
}
