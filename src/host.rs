use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Live host state that applied scripts read and mutate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostState {
    /// System message shown by the host
    #[serde(default)]
    pub system_message: Option<String>,

    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

/// Shared handle to the live host state
///
/// Cloning the handle shares the same state. Scripts see the state as it is
/// at the moment they call a host function; nothing is snapshotted.
#[derive(Debug, Clone, Default)]
pub struct Host {
    state: Arc<RwLock<HostState>>,
}

impl Host {
    pub fn new(state: HostState) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Load host state from a JSON file; a missing file yields the default state
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read host state: {}", path.display()))?;
        let state: HostState = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse host state: {}", path.display()))?;

        Ok(Self::new(state))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create state directory: {}", parent.display())
                })?;
            }
        }

        let content = serde_json::to_string_pretty(&self.snapshot())?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write host state: {}", path.display()))
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> HostState {
        self.read().clone()
    }

    pub fn system_message(&self) -> Option<String> {
        self.read().system_message.clone()
    }

    pub fn set_system_message(&self, message: impl Into<String>) {
        self.write().system_message = Some(message.into());
    }

    pub fn property(&self, key: &str) -> Option<String> {
        self.read().properties.get(key).cloned()
    }

    pub fn set_property(&self, key: impl Into<String>, value: impl Into<String>) {
        self.write().properties.insert(key.into(), value.into());
    }

    pub fn remove_property(&self, key: &str) -> Option<String> {
        self.write().properties.remove(key)
    }

    // Every write is a single assignment, so a poisoned lock still holds valid state
    fn read(&self) -> RwLockReadGuard<'_, HostState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HostState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let host = Host::default();
        let other = host.clone();
        other.set_system_message("Hello");
        other.set_property("theme", "dark");

        assert_eq!(host.system_message(), Some("Hello".to_string()));
        assert_eq!(host.property("theme"), Some("dark".to_string()));
        assert_eq!(host.remove_property("theme"), Some("dark".to_string()));
        assert_eq!(other.property("theme"), None);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("state/host.json");

        let host = Host::default();
        host.set_system_message("Configured by script");
        host.set_property("agents", "4");
        host.save(&path).unwrap();

        let loaded = Host::load(&path).unwrap();
        assert_eq!(loaded.snapshot(), host.snapshot());
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let host = Host::load(temp_dir.path().join("nope.json")).unwrap();
        assert_eq!(host.snapshot(), HostState::default());
    }
}
