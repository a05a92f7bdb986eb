pub mod ask;
pub mod explore;
pub mod init;
pub mod rank;
pub mod search;
pub mod show;
pub mod tags;

use crate::GlobalArgs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use typescout_agent::{AskMode, CodebaseAgent};
use typescout_config::AppConfig;
use typescout_index::{Catalog, TypeRegistry};

/// Loaded configuration plus a registry filled from the catalog.
pub struct Session {
    pub config: AppConfig,
    pub registry: Arc<TypeRegistry>,
}

impl Session {
    pub fn open(global: &GlobalArgs) -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = global
            .config
            .clone()
            .unwrap_or_else(AppConfig::config_path);
        let config = AppConfig::load_with_env(&config_path)
            .map_err(|e| format!("Failed to load config: {e}"))?;

        let registry = Arc::new(TypeRegistry::new());
        match global.catalog.as_deref().or(config.catalog.as_deref()) {
            Some(path) => {
                load_catalog(path, &registry)?;
            }
            None => warn!("No catalog given (--catalog or `catalog` in config), registry is empty"),
        }

        Ok(Self { config, registry })
    }

    /// A question-answering agent configured from the session.
    pub fn codebase_agent(&self) -> CodebaseAgent {
        let config = &self.config;
        let mode = config.agent.mode.parse().unwrap_or(AskMode::Simple);
        let mut agent = CodebaseAgent::new(self.registry.clone())
            .with_mode(mode)
            .with_max_iterations(config.agent.max_iterations)
            .with_rank_limit(config.search.rank_limit)
            .with_max_keywords(config.search.max_keywords)
            .with_search_limit(config.search.default_limit);
        if let Some(secs) = config.agent.call_timeout_secs {
            agent = agent.with_call_timeout(Duration::from_secs(secs));
        }
        if let Some(service) = typescout_providers::reasoning_from_config(config) {
            agent = agent.with_reasoning(service);
        }
        agent
    }
}

fn load_catalog(path: &Path, registry: &TypeRegistry) -> Result<usize, Box<dyn std::error::Error>> {
    let catalog = Catalog::load(path)?;
    let count = catalog.register_all(registry)?;
    info!(path = %path.display(), types = count, "Catalog loaded");
    Ok(count)
}

/// Explain how to enable the reasoning service.
pub fn print_reasoning_help(config: &AppConfig) {
    eprintln!();
    eprintln!("  ERROR: No reasoning service available for provider '{}'.", config.provider);
    eprintln!();
    eprintln!("  Set one of these environment variables:");
    eprintln!("    TYPESCOUT_API_KEY=sk-...   (generic)");
    eprintln!("    OPENAI_API_KEY=sk-...      (OpenAI)");
    eprintln!("    OPENROUTER_API_KEY=sk-...  (OpenRouter)");
    eprintln!();
    eprintln!("  Or use a local model:  TYPESCOUT_PROVIDER=ollama");
    eprintln!();
    eprintln!("  Config file: {}", AppConfig::config_path().display());
    eprintln!();
}

/// First line of `text`, clipped to `max` characters.
pub fn first_line(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or_default();
    match line.char_indices().nth(max) {
        Some((end, _)) => format!("{}...", &line[..end]),
        None => line.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    const CATALOG: &str = r#"
[[types]]
module = "app.models"
name = "User"
docstring = "A registered user account"
tags = ["model", "database"]

[types.methods.save]
signature = "(self)"
docstring = "Persist the user"

[[types]]
module = "app.services"
name = "UserService"
docstring = "Business logic for accounts"
tags = ["service"]
"#;

    fn temp_file(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn global(config: &Path, catalog: Option<PathBuf>) -> GlobalArgs {
        GlobalArgs {
            config: Some(config.to_path_buf()),
            catalog,
            verbose: false,
        }
    }

    #[test]
    fn session_loads_catalog_from_flag() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = temp_file(".toml", CATALOG);
        let session = Session::open(&global(
            &dir.path().join("missing.toml"),
            Some(catalog.path().to_path_buf()),
        ))
        .unwrap();
        assert_eq!(session.registry.len(), 2);
        assert!(session.registry.contains("app.models.User"));
    }

    #[test]
    fn session_uses_catalog_from_config() {
        let catalog = temp_file(".toml", CATALOG);
        let config = temp_file(
            ".toml",
            &format!(
                "provider = \"ollama\"\ncatalog = {:?}\n\n[agent]\nmode = \"iterative\"\n",
                catalog.path().display().to_string()
            ),
        );
        let session = Session::open(&global(config.path(), None)).unwrap();
        assert_eq!(session.registry.len(), 2);

        let agent = session.codebase_agent();
        assert_eq!(agent.mode(), AskMode::Iterative);
        assert!(agent.has_reasoning());
    }

    #[test]
    fn bad_catalog_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = temp_file(".toml", "[[types]]\nmodule = \"m\"\nname = \"not valid\"\n");
        let result = Session::open(&global(
            &dir.path().join("missing.toml"),
            Some(catalog.path().to_path_buf()),
        ));
        assert!(result.is_err());
    }

    #[test]
    fn clipping() {
        assert_eq!(first_line("short\nsecond", 10), "short");
        assert_eq!(first_line("abcdefghij", 4), "abcd...");
        assert_eq!(first_line("", 4), "");
    }
}
