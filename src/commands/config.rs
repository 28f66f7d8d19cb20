use anyhow::Result;
use tracing::info;

use crate::cli::ConfigCommands;
use crate::config::CascConfig;
use crate::config_discovery::load_config_with_discovery;

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Validate { path } => validate(&path),
        ConfigCommands::Generate => generate(),
        ConfigCommands::Show { config } => show(config),
    }
}

fn validate(path: &str) -> Result<()> {
    info!("Validating config file: {}", path);

    let config = CascConfig::from_file(path)?;
    config.validate()?;

    println!("✓ Configuration file is valid: {}", path);
    println!("\nSummary:");
    println!("  - Root key: {}", config.apply.root_key);
    println!("  - Environment secrets: {}", config.secrets.env);
    if let Some(dir) = &config.secrets.directory {
        println!("  - Secrets directory: {}", dir);
    }
    println!("  - Inline secrets: {}", config.secrets.values.len());
    println!("  - HTTP timeout: {}", config.http.timeout);
    println!("  - State file: {}", config.state.resolved_path().display());

    Ok(())
}

fn generate() -> Result<()> {
    info!("Generating example config");

    println!("{}", CascConfig::example()?);

    Ok(())
}

fn show(config_path: Option<String>) -> Result<()> {
    info!("Showing effective configuration");

    let mut config = load_config_with_discovery(config_path.as_deref())?;
    // Never echo inline secret values
    for value in config.secrets.values.values_mut() {
        *value = "<redacted>".to_string();
    }

    println!("Effective Configuration:\n");
    println!("{}", toml::to_string_pretty(&config)?);

    Ok(())
}
