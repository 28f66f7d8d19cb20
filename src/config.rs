use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::xdg;

/// Root key scripts are read from when none is configured
pub const DEFAULT_ROOT_KEY: &str = "groovy";

/// Complete casc-script configuration (loaded from TOML file)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CascConfig {
    #[serde(default)]
    pub apply: ApplyConfig,

    #[serde(default)]
    pub secrets: SecretsConfig,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub state: StateConfig,
}

/// Document application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyConfig {
    /// Document key holding the sequence of script sources
    #[serde(default = "default_root_key")]
    pub root_key: String,
}

impl Default for ApplyConfig {
    fn default() -> Self {
        Self {
            root_key: default_root_key(),
        }
    }
}

/// Secret sources, consulted in order: values, directory, env
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretsConfig {
    /// Resolve secrets from process environment variables
    #[serde(default = "default_true")]
    pub env: bool,

    /// Directory holding one file per secret (e.g. "/run/secrets")
    #[serde(default)]
    pub directory: Option<String>,

    /// Inline secret values
    #[serde(default)]
    pub values: HashMap<String, String>,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            env: true,
            directory: None,
            values: HashMap::new(),
        }
    }
}

/// HTTP client configuration for url script sources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout (e.g. "30s", "2m")
    #[serde(default = "default_http_timeout")]
    pub timeout: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: default_http_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Result<Duration> {
        parse_duration(&self.timeout).with_context(|| format!("Invalid http.timeout: {}", self.timeout))
    }
}

/// Host state persistence
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StateConfig {
    /// Host state file (defaults to the XDG state directory)
    #[serde(default)]
    pub path: Option<String>,
}

impl StateConfig {
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(xdg::host_state_file)
    }
}

fn default_root_key() -> String {
    DEFAULT_ROOT_KEY.to_string()
}

fn default_http_timeout() -> String {
    "30s".to_string()
}

fn default_user_agent() -> String {
    format!("casc-script/{}", env!("CARGO_PKG_VERSION"))
}

fn default_true() -> bool {
    true
}

impl CascConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: CascConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        Ok(config)
    }

    /// Generate example configuration as TOML string
    pub fn example() -> Result<String> {
        let config = CascConfig {
            secrets: SecretsConfig {
                env: true,
                directory: Some("/run/secrets".to_string()),
                values: HashMap::new(),
            },
            state: StateConfig {
                path: Some(".casc/host.json".to_string()),
            },
            ..Default::default()
        };

        Ok(toml::to_string_pretty(&config)?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.apply.root_key.trim().is_empty() {
            anyhow::bail!("apply.root_key must not be empty");
        }

        self.http.timeout()?;

        if self.http.user_agent.is_empty() {
            anyhow::bail!("http.user_agent must not be empty");
        }

        if let Some(dir) = &self.secrets.directory {
            if !Path::new(dir).is_dir() {
                anyhow::bail!("secrets.directory does not exist: {}", dir);
            }
        }

        Ok(())
    }
}

/// Parse duration string (e.g., "30s", "2m", "1h")
pub fn parse_duration(s: &str) -> Result<Duration> {
    if s.is_empty() {
        return Err(anyhow!("Empty duration string"));
    }
    if !s.is_ascii() {
        return Err(anyhow!("Invalid duration: {}", s));
    }

    let (num_str, unit) = s.split_at(s.len() - 1);
    let num: u64 = num_str
        .parse()
        .map_err(|_| anyhow!("Invalid duration: {}", s))?;

    let seconds = match unit {
        "s" => Some(num),
        "m" => num.checked_mul(60),
        "h" => num.checked_mul(3600),
        _ => return Err(anyhow!("Invalid duration unit: {}. Use: s, m, h", unit)),
    };

    let seconds = seconds.ok_or_else(|| anyhow!("Duration too large: {}", s))?;

    Ok(Duration::from_secs(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CascConfig::default();
        assert_eq!(config.apply.root_key, "groovy");
        assert!(config.secrets.env);
        assert_eq!(config.http.timeout, "30s");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("casc-script.toml");
        fs::write(
            &path,
            r#"
[apply]
root_key = "scripts"

[secrets]
env = false

[secrets.values]
greeting = "Hello World"
"#,
        )
        .unwrap();

        let config = CascConfig::from_file(&path).unwrap();
        assert_eq!(config.apply.root_key, "scripts");
        assert!(!config.secrets.env);
        assert_eq!(config.secrets.values["greeting"], "Hello World");
        assert_eq!(config.http.timeout, "30s");
    }

    #[test]
    fn test_invalid_timeout() {
        let mut config = CascConfig::default();
        config.http.timeout = "10x".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_root_key() {
        let mut config = CascConfig::default();
        config.apply.root_key = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_secrets_directory() {
        let mut config = CascConfig::default();
        config.secrets.directory = Some("/definitely/not/here".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_example_round_trips() {
        let example = CascConfig::example().unwrap();
        let parsed: CascConfig = toml::from_str(&example).unwrap();
        assert_eq!(parsed.secrets.directory.as_deref(), Some("/run/secrets"));
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("45s").unwrap(), Duration::from_secs(45));
        assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
        assert!(parse_duration("").is_err());
        assert!(parse_duration("5d").is_err());

        let err = parse_duration("5124095576030432h").unwrap_err();
        assert!(err.to_string().contains("Duration too large"));
        assert!(parse_duration("307445734561825861m").is_err());
        assert_eq!(
            parse_duration("18446744073709551615s").unwrap(),
            Duration::from_secs(u64::MAX)
        );
    }

    #[test]
    fn test_oversized_timeout_fails_validation() {
        let mut config = CascConfig::default();
        config.http.timeout = "5124095576030432h".to_string();
        assert!(config.validate().is_err());
    }
}
