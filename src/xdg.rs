//! XDG Base Directory support for casc-script
//!
//! Directory structure:
//! - `$XDG_STATE_HOME/casc-script/` (default: `~/.local/state/casc-script/`) - Host state
//! - `$XDG_CONFIG_HOME/casc-script/` (default: `~/.config/casc-script/`) - Global configuration

use std::path::PathBuf;

/// Get the casc-script state directory
///
/// Respects XDG_STATE_HOME environment variable.
/// Falls back to `$HOME/.local/state/casc-script`.
pub fn state_dir() -> PathBuf {
    if let Ok(xdg_state) = std::env::var("XDG_STATE_HOME") {
        PathBuf::from(xdg_state).join("casc-script")
    } else if let Some(home) = dirs::home_dir() {
        // XDG default: $HOME/.local/state
        home.join(".local").join("state").join("casc-script")
    } else {
        PathBuf::from(".casc-state")
    }
}

/// Get the casc-script configuration directory
///
/// Respects XDG_CONFIG_HOME environment variable.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg_config).join("casc-script")
    } else if let Some(home) = dirs::home_dir() {
        home.join(".config").join("casc-script")
    } else {
        PathBuf::from(".casc-config")
    }
}

/// Default location of the persisted host state
pub fn host_state_file() -> PathBuf {
    state_dir().join("host.json")
}
