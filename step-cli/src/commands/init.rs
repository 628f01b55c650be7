//! Write a default configuration file.

use anyhow::Result;
use std::path::Path;
use twostep_client::ClientConfig;

/// Run the init command.
pub fn run(config_path: &Path, server: Option<&str>, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let mut config = ClientConfig::default();
    if let Some(server) = server {
        config.server.base_url = server.to_string();
    }
    config.save(config_path)?;

    println!("Config written to {}", config_path.display());
    println!();
    println!("  Server: {}", config.server.base_url);
    println!();
    println!("Next steps:");
    println!("  1. Start playing: twostep play --user <name>");
    println!("  2. Optional: set [weather] api_key and enabled = true");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn init_writes_config_with_server() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("twostep.toml");

        run(&path, Some("http://example.test"), false).unwrap();

        let config = ClientConfig::from_file(&path).unwrap();
        assert_eq!(config.server.base_url, "http://example.test");
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("twostep.toml");

        run(&path, None, false).unwrap();
        assert!(run(&path, None, false).is_err());
        assert!(run(&path, Some("http://other"), true).is_ok());
    }
}
