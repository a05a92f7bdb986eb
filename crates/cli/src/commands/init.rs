//! `typescout init` — write a default config file.

use crate::GlobalArgs;
use std::path::Path;
use typescout_config::AppConfig;

pub async fn run(global: &GlobalArgs, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = global
        .config
        .clone()
        .unwrap_or_else(AppConfig::config_path);

    if write_default(&path, force)? {
        println!("Created config at: {}", path.display());
        println!("\nNext steps:");
        println!("  1. Set api_key (or TYPESCOUT_API_KEY), or provider = \"ollama\"");
        println!("  2. Point `catalog` at a TOML or JSON type catalog");
        println!("  3. Run: typescout ask \"How do I create a user?\"");
    } else {
        println!("Config already exists at: {}", path.display());
        println!("Edit it manually or re-run with --force.");
    }
    Ok(())
}

/// Returns `false` when the file exists and `force` is not set.
fn write_default(path: &Path, force: bool) -> std::io::Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, AppConfig::default_toml())?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_once_unless_forced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        assert!(write_default(&path, false).unwrap());
        let written = AppConfig::load_from(&path).unwrap();
        assert_eq!(written.agent.max_iterations, 5);

        std::fs::write(&path, "model = \"custom\"\n").unwrap();
        assert!(!write_default(&path, false).unwrap());
        assert_eq!(AppConfig::load_from(&path).unwrap().model, "custom");

        assert!(write_default(&path, true).unwrap());
        assert_eq!(AppConfig::load_from(&path).unwrap().model, "gpt-4o-mini");
    }
}
