use anyhow::{Context, Result};
use std::path::PathBuf;

use super::{ScriptSource, SourceKind};

/// Script text embedded in the configuration document
#[derive(Debug, Clone)]
pub struct InlineSource {
    script: String,
}

impl InlineSource {
    pub fn new(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
        }
    }
}

impl ScriptSource for InlineSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Inline
    }

    fn get_script(&self) -> Result<String> {
        Ok(self.script.clone())
    }
}

/// Script read from a local file when executed
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl ScriptSource for FileSource {
    fn kind(&self) -> SourceKind {
        SourceKind::File
    }

    fn get_script(&self) -> Result<String> {
        std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read script file: {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_source_reads_at_fetch_time() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("init.js");

        // Handle exists before the file does
        let source = FileSource::new(&path);
        assert!(source.get_script().is_err());

        std::fs::write(&path, "setMessage('from file')").unwrap();
        assert_eq!(source.get_script().unwrap(), "setMessage('from file')");
    }

    #[test]
    fn test_missing_file_error_names_path() {
        let source = FileSource::new("/no/such/script.js");
        let err = source.get_script().unwrap_err();
        assert!(format!("{:#}", err).contains("/no/such/script.js"));
    }
}
