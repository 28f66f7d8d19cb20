// Remote script sources
//
// Handles `url:` descriptors. http(s) URLs are fetched with a blocking
// client, `file://` URLs are read from the local filesystem.

use anyhow::{Context, Result};
use std::path::PathBuf;

use super::{ScriptSource, SourceKind};
use crate::context::HttpSettings;
use crate::error::ConfiguratorError;

/// Parsed url script source
#[derive(Debug, Clone, PartialEq)]
pub struct UrlSource {
    location: Location,
    http: HttpSettings,
}

#[derive(Debug, Clone, PartialEq)]
enum Location {
    Http(String),
    File(PathBuf),
}

impl UrlSource {
    /// Parse a script URL
    ///
    /// Examples:
    /// - `https://example.com/init.js` → fetched over HTTPS
    /// - `http://config.internal:8080/init.js` → fetched over HTTP
    /// - `file:///etc/casc/init.js` → read from /etc/casc/init.js
    pub fn new(url: &str, http: HttpSettings) -> Result<Self, ConfiguratorError> {
        let url = url.trim();

        let location = if url.starts_with("http://") || url.starts_with("https://") {
            Location::Http(url.to_string())
        } else if let Some(path) = url.strip_prefix("file://") {
            if path.is_empty() {
                return Err(ConfiguratorError::format("file:// URL must name a path"));
            }
            let path = PathBuf::from(path);
            if !path.is_absolute() {
                return Err(ConfiguratorError::format(format!(
                    "file:// URL must name an absolute path, use a file source for relative paths: {}",
                    url
                )));
            }
            Location::File(path)
        } else {
            return Err(ConfiguratorError::format(format!(
                "script url must start with http://, https://, or file://: {}",
                url
            )));
        };

        Ok(Self { location, http })
    }

    pub fn url(&self) -> String {
        match &self.location {
            Location::Http(url) => url.clone(),
            Location::File(path) => format!("file://{}", path.display()),
        }
    }
}

impl ScriptSource for UrlSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Url
    }

    fn get_script(&self) -> Result<String> {
        match &self.location {
            Location::Http(url) => {
                tracing::debug!(url = %url, "fetching script");

                let client = reqwest::blocking::Client::builder()
                    .timeout(self.http.timeout)
                    .user_agent(self.http.user_agent.clone())
                    .build()
                    .context("Failed to build HTTP client")?;

                client
                    .get(url)
                    .send()
                    .and_then(|response| response.error_for_status())
                    .and_then(|response| response.text())
                    .with_context(|| format!("Failed to fetch script: {}", url))
            }
            Location::File(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read script file: {}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_https() {
        let source = UrlSource::new("https://example.com/init.js", HttpSettings::default()).unwrap();
        assert_eq!(source.url(), "https://example.com/init.js");
        assert_eq!(source.kind(), SourceKind::Url);
    }

    #[test]
    fn test_parse_file_url() {
        let source = UrlSource::new("file:///etc/casc/init.js", HttpSettings::default()).unwrap();
        assert_eq!(source.url(), "file:///etc/casc/init.js");
    }

    #[test]
    fn test_reject_unknown_scheme() {
        assert!(UrlSource::new("ftp://example.com/init.js", HttpSettings::default()).is_err());
        assert!(UrlSource::new("init.js", HttpSettings::default()).is_err());
        assert!(UrlSource::new("file://", HttpSettings::default()).is_err());
    }

    #[test]
    fn test_reject_relative_file_url() {
        let err = UrlSource::new("file://relative.js", HttpSettings::default()).unwrap_err();
        assert!(err.to_string().contains("absolute path"));
        assert!(UrlSource::new("file://scripts/init.js", HttpSettings::default()).is_err());
    }

    #[test]
    fn test_file_url_reads_local_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("remote.js");
        std::fs::write(&path, "x = 42").unwrap();

        let url = format!("file://{}", path.display());
        let source = UrlSource::new(&url, HttpSettings::default()).unwrap();
        assert_eq!(source.get_script().unwrap(), "x = 42");
    }

    #[test]
    fn test_unreachable_host_fails_at_fetch() {
        let http = HttpSettings {
            timeout: std::time::Duration::from_secs(2),
            ..Default::default()
        };
        // Port 9 (discard) is closed on loopback
        let source = UrlSource::new("http://127.0.0.1:9/init.js", http).unwrap();
        assert!(source.get_script().is_err());
    }
}
