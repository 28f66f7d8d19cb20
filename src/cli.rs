use clap::{Parser, Subcommand};

/// casc-script - Run configuration scripts declared in a configuration-as-code document
///
/// Scripts listed under the root key (default `groovy`) are fetched, have
/// their secret tokens resolved, and run once against the host state.
#[derive(Parser, Debug)]
#[command(name = "casc-script")]
#[command(author = "Tuist Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Apply configuration scripts from a configuration-as-code document", long_about = None)]
pub struct Cli {
    /// Log level (trace|debug|info|warn|error)
    #[arg(long, global = true, env = "CASC_LOG_LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run every script source of a document against the host state
    Apply(ApplyArgs),

    /// Validate a document without running any script
    Check(CheckArgs),

    /// Configuration management utilities
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
pub struct ApplyArgs {
    /// Configuration document (YAML)
    pub document: String,

    /// Config file path
    #[arg(short = 'c', long, env = "CASC_CONFIG")]
    pub config: Option<String>,

    /// Host state file (overrides [state] path)
    #[arg(long, env = "CASC_STATE")]
    pub state: Option<String>,

    /// Root key holding the script sources (overrides [apply] root_key)
    #[arg(long)]
    pub root_key: Option<String>,

    /// Exit with an error if any script source failed
    #[arg(long)]
    pub fail_on_error: bool,
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Configuration document (YAML)
    pub document: String,

    /// Config file path
    #[arg(short = 'c', long, env = "CASC_CONFIG")]
    pub config: Option<String>,

    /// Root key holding the script sources (overrides [apply] root_key)
    #[arg(long)]
    pub root_key: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Validate configuration file
    Validate {
        /// Path to config file
        path: String,
    },
    /// Generate example config file
    Generate,
    /// Show effective configuration (discovered or explicit)
    Show {
        /// Config file path
        #[arg(short = 'c', long, env = "CASC_CONFIG")]
        config: Option<String>,
    },
}
