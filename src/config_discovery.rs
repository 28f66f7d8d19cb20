use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::CascConfig;
use crate::xdg;

/// Project-level configuration file name
pub const CONFIG_FILE_NAME: &str = "casc-script.toml";

/// Discovers casc-script configuration by traversing up the directory tree
pub fn discover_config(start_dir: &Path) -> Result<Option<PathBuf>> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Ok(Some(config_path));
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break,
        }
    }

    Ok(global_config())
}

/// Global configuration file in the XDG config directory, if present
pub fn global_config() -> Option<PathBuf> {
    let path = xdg::config_dir().join("config.toml");
    path.exists().then_some(path)
}

/// Loads configuration with auto-discovery support
///
/// If `explicit_path` is provided, loads config from that path.
/// Otherwise, auto-discovers config by traversing up directory tree from cwd,
/// falling back to defaults when nothing is found.
pub fn load_config_with_discovery(explicit_path: Option<&str>) -> Result<CascConfig> {
    if let Some(config_path) = explicit_path {
        return CascConfig::from_file(config_path);
    }

    let current_dir =
        std::env::current_dir().context("Failed to get current directory for config discovery")?;

    match discover_config(&current_dir)? {
        Some(path) => {
            tracing::info!("[casc] Using config: {}", path.display());
            CascConfig::from_file(&path)
        }
        None => {
            tracing::debug!("[casc] No configuration file found, using defaults");
            Ok(CascConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    #[test]
    #[serial]
    fn test_discover_in_parent_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested = temp_dir.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "").unwrap();

        std::env::set_var("XDG_CONFIG_HOME", temp_dir.path().join("xdg"));
        let found = discover_config(&nested).unwrap();
        std::env::remove_var("XDG_CONFIG_HOME");

        assert_eq!(found, Some(temp_dir.path().join(CONFIG_FILE_NAME)));
    }

    #[test]
    #[serial]
    fn test_global_config_fallback() {
        let temp_dir = tempfile::tempdir().unwrap();
        let xdg_home = temp_dir.path().join("xdg");
        fs::create_dir_all(xdg_home.join("casc-script")).unwrap();
        fs::write(xdg_home.join("casc-script/config.toml"), "").unwrap();

        std::env::set_var("XDG_CONFIG_HOME", &xdg_home);
        let found = global_config();
        std::env::remove_var("XDG_CONFIG_HOME");

        assert_eq!(found, Some(xdg_home.join("casc-script/config.toml")));
    }

    #[test]
    #[serial]
    fn test_no_global_config() {
        let temp_dir = tempfile::tempdir().unwrap();

        std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
        let found = global_config();
        std::env::remove_var("XDG_CONFIG_HOME");

        assert_eq!(found, None);
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let result = load_config_with_discovery(Some("/no/such/casc-script.toml"));
        assert!(result.is_err());
    }
}
