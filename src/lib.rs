// Library interface for casc-script
// This allows integration tests and external code to use casc-script's modules

pub mod apply;
pub mod cli;
pub mod cli_utils;
pub mod commands;
pub mod config;
pub mod config_discovery;
pub mod configurator;
pub mod context;
pub mod error;
pub mod host;
pub mod interpreter;
pub mod logging;
pub mod node;
pub mod secrets;
pub mod source;
pub mod xdg;

// Re-export commonly used types
pub use apply::{apply_document, check_document, ApplyReport};
pub use configurator::{ExecutionFailure, RootElementConfigurator, ScriptCaller, ScriptOutcome};
pub use context::ConfigurationContext;
pub use error::ConfiguratorError;
pub use host::Host;
pub use node::CNode;
