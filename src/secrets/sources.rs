use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::SecretSource;

/// Reveals secrets from the process environment
#[derive(Debug, Default, Clone)]
pub struct EnvSecretSource;

impl SecretSource for EnvSecretSource {
    fn reveal(&self, name: &str) -> Result<Option<String>> {
        Ok(std::env::var(name).ok())
    }

    fn label(&self) -> &'static str {
        "env"
    }
}

/// Reveals secrets stored one per file in a directory (`<dir>/<name>`)
///
/// This is the layout used by Docker and Kubernetes secret mounts. A single
/// trailing newline is trimmed from the file contents.
#[derive(Debug, Clone)]
pub struct DirectorySecretSource {
    dir: PathBuf,
}

impl DirectorySecretSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SecretSource for DirectorySecretSource {
    fn reveal(&self, name: &str) -> Result<Option<String>> {
        // Names that would escape the directory are never secrets
        if name.is_empty() || name.contains('/') || name.contains('\\') || name == ".." {
            return Ok(None);
        }

        let path = self.dir.join(name);
        match fs::read_to_string(&path) {
            Ok(content) => {
                let value = content
                    .strip_suffix("\r\n")
                    .or_else(|| content.strip_suffix('\n'))
                    .unwrap_or(&content);
                Ok(Some(value.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read secret file: {}", path.display())),
        }
    }

    fn label(&self) -> &'static str {
        "directory"
    }
}

/// In-memory secrets, e.g. from the `[secrets.values]` config table
#[derive(Debug, Default, Clone)]
pub struct StaticSecretSource {
    values: HashMap<String, String>,
}

impl StaticSecretSource {
    pub fn new(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

impl SecretSource for StaticSecretSource {
    fn reveal(&self, name: &str) -> Result<Option<String>> {
        Ok(self.values.get(name).cloned())
    }

    fn label(&self) -> &'static str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_env_source() {
        std::env::set_var("CASC_TEST_ENV_SECRET", "from-env");
        let source = EnvSecretSource;
        assert_eq!(
            source.reveal("CASC_TEST_ENV_SECRET").unwrap(),
            Some("from-env".to_string())
        );
        std::env::remove_var("CASC_TEST_ENV_SECRET");
        assert_eq!(source.reveal("CASC_TEST_ENV_SECRET").unwrap(), None);
    }

    #[test]
    fn test_directory_source_trims_trailing_newline() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("db_password"), "hunter2\n").unwrap();

        let source = DirectorySecretSource::new(temp_dir.path());
        assert_eq!(
            source.reveal("db_password").unwrap(),
            Some("hunter2".to_string())
        );
        assert_eq!(source.reveal("missing").unwrap(), None);
    }

    #[test]
    fn test_directory_source_rejects_traversal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = DirectorySecretSource::new(temp_dir.path().join("secrets"));
        assert_eq!(source.reveal("../etc/passwd").unwrap(), None);
        assert_eq!(source.reveal("..").unwrap(), None);
    }

    #[test]
    fn test_static_source() {
        let source = StaticSecretSource::default().with("greeting", "Hello World");
        assert_eq!(
            source.reveal("greeting").unwrap(),
            Some("Hello World".to_string())
        );
        assert_eq!(source.reveal("other").unwrap(), None);
    }
}
