/// Secret resolution
///
/// Script source payloads may embed secret-reference tokens such as
/// `${SECRET:api_token}`. The [`SecretResolver`] capability replaces them
/// with concrete values looked up in a chain of [`SecretSource`]s.
pub mod resolver;
pub mod sources;

use anyhow::Result;

use crate::context::ConfigurationContext;

pub use resolver::SecretSourceResolver;
pub use sources::{DirectorySecretSource, EnvSecretSource, StaticSecretSource};

/// A backend able to reveal a named secret
pub trait SecretSource: Send + Sync {
    /// Returns `Ok(None)` when the source does not know `name`.
    fn reveal(&self, name: &str) -> Result<Option<String>>;

    /// Short label used in logs
    fn label(&self) -> &'static str;
}

/// Capability that rewrites every secret-reference token in a string
pub trait SecretResolver: Send + Sync {
    fn resolve(&self, context: &ConfigurationContext, raw: &str) -> Result<String>;
}
