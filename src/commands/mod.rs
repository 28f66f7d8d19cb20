pub mod apply;
pub mod check;
pub mod config;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Read a configuration document and the directory its relative sources resolve against
fn read_document(document: &str) -> Result<(String, PathBuf)> {
    let path = Path::new(document);
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration document: {}", path.display()))?;

    let base_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    Ok((content, base_dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_document_base_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("jenkins.yaml");
        fs::write(&path, "groovy: []\n").unwrap();

        let (content, base_dir) = read_document(path.to_str().unwrap()).unwrap();
        assert_eq!(content, "groovy: []\n");
        assert_eq!(base_dir, temp_dir.path());
    }

    #[test]
    fn test_read_missing_document() {
        let err = read_document("/nonexistent/jenkins.yaml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/jenkins.yaml"));
    }
}
