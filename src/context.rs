use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::config::CascConfig;
use crate::host::Host;
use crate::interpreter::{QuickJsInterpreter, ScriptInterpreter};
use crate::secrets::{
    DirectorySecretSource, EnvSecretSource, SecretResolver, SecretSourceResolver,
    StaticSecretSource,
};
use crate::source::{ScriptSourceConfigurator, SourceConfigurator};

/// HTTP client settings for url script sources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("casc-script/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Everything a configurator needs while applying one document
///
/// The collaborators are injected as trait objects so that hosts can swap
/// the secret backend, the script source formats or the interpreter
/// without touching the apply pipeline.
#[derive(Clone)]
pub struct ConfigurationContext {
    secret_resolver: Arc<dyn SecretResolver>,
    source_configurator: Arc<dyn SourceConfigurator>,
    interpreter: Arc<dyn ScriptInterpreter>,
    host: Host,
    base_dir: PathBuf,
    http: HttpSettings,
}

impl ConfigurationContext {
    pub fn builder() -> ConfigurationContextBuilder {
        ConfigurationContextBuilder::default()
    }

    /// Build a context from the loaded tool configuration
    pub fn from_config(config: &CascConfig, host: Host, base_dir: PathBuf) -> Result<Self> {
        let mut resolver = SecretSourceResolver::new();
        if !config.secrets.values.is_empty() {
            resolver = resolver.with_source(StaticSecretSource::new(config.secrets.values.clone()));
        }
        if let Some(dir) = &config.secrets.directory {
            resolver = resolver.with_source(DirectorySecretSource::new(dir));
        }
        if config.secrets.env {
            resolver = resolver.with_source(EnvSecretSource);
        }

        tracing::debug!(sources = ?resolver.source_labels(), "secret sources configured");

        Ok(Self::builder()
            .secret_resolver(resolver)
            .host(host)
            .base_dir(base_dir)
            .http(HttpSettings {
                timeout: config.http.timeout()?,
                user_agent: config.http.user_agent.clone(),
            })
            .build())
    }

    pub fn secret_resolver(&self) -> &dyn SecretResolver {
        self.secret_resolver.as_ref()
    }

    /// Configurator that turns a resolved descriptor into a script source
    pub fn lookup_source_configurator(&self) -> &dyn SourceConfigurator {
        self.source_configurator.as_ref()
    }

    pub fn interpreter(&self) -> &dyn ScriptInterpreter {
        self.interpreter.as_ref()
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    /// Directory relative file paths are resolved against
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn http(&self) -> &HttpSettings {
        &self.http
    }
}

#[derive(Default)]
pub struct ConfigurationContextBuilder {
    secret_resolver: Option<Arc<dyn SecretResolver>>,
    source_configurator: Option<Arc<dyn SourceConfigurator>>,
    interpreter: Option<Arc<dyn ScriptInterpreter>>,
    host: Option<Host>,
    base_dir: Option<PathBuf>,
    http: Option<HttpSettings>,
}

impl ConfigurationContextBuilder {
    pub fn secret_resolver(mut self, resolver: impl SecretResolver + 'static) -> Self {
        self.secret_resolver = Some(Arc::new(resolver));
        self
    }

    pub fn source_configurator(mut self, configurator: impl SourceConfigurator + 'static) -> Self {
        self.source_configurator = Some(Arc::new(configurator));
        self
    }

    pub fn interpreter(mut self, interpreter: impl ScriptInterpreter + 'static) -> Self {
        self.interpreter = Some(Arc::new(interpreter));
        self
    }

    pub fn host(mut self, host: Host) -> Self {
        self.host = Some(host);
        self
    }

    pub fn base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    pub fn http(mut self, http: HttpSettings) -> Self {
        self.http = Some(http);
        self
    }

    pub fn build(self) -> ConfigurationContext {
        ConfigurationContext {
            secret_resolver: self
                .secret_resolver
                .unwrap_or_else(|| Arc::new(SecretSourceResolver::new().with_source(EnvSecretSource))),
            source_configurator: self
                .source_configurator
                .unwrap_or_else(|| Arc::new(ScriptSourceConfigurator)),
            interpreter: self
                .interpreter
                .unwrap_or_else(|| Arc::new(QuickJsInterpreter::default())),
            host: self.host.unwrap_or_default(),
            base_dir: self.base_dir.unwrap_or_else(|| PathBuf::from(".")),
            http: self.http.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_builder_defaults() {
        let context = ConfigurationContext::builder().build();
        assert_eq!(context.base_dir(), Path::new("."));
        assert_eq!(context.http().timeout, Duration::from_secs(30));
        assert!(context.http().user_agent.starts_with("casc-script/"));
        assert_eq!(context.host().system_message(), None);
    }

    #[test]
    fn test_from_config_wires_static_secrets() {
        let mut config = CascConfig::default();
        config.secrets.env = false;
        config.secrets.values = HashMap::from([("greeting".to_string(), "Hi".to_string())]);
        config.http.timeout = "5s".to_string();

        let context =
            ConfigurationContext::from_config(&config, Host::default(), PathBuf::from("/srv"))
                .unwrap();

        let resolved = context
            .secret_resolver()
            .resolve(&context, "${SECRET:greeting}")
            .unwrap();
        assert_eq!(resolved, "Hi");
        assert_eq!(context.http().timeout, Duration::from_secs(5));
        assert_eq!(context.base_dir(), Path::new("/srv"));
    }

    #[test]
    fn test_from_config_rejects_bad_timeout() {
        let mut config = CascConfig::default();
        config.http.timeout = "soon".to_string();
        assert!(
            ConfigurationContext::from_config(&config, Host::default(), PathBuf::from(".")).is_err()
        );
    }
}
