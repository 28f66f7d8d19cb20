use anyhow::{Context, Result};

use crate::apply::check_document;
use crate::cli::CheckArgs;
use crate::config_discovery::load_config_with_discovery;
use crate::configurator::ScriptCaller;
use crate::context::ConfigurationContext;
use crate::host::Host;

/// Parses the document and runs the configurator's check; no script runs
pub fn run(args: CheckArgs) -> Result<()> {
    let config = load_config_with_discovery(args.config.as_deref())?;
    config.validate()?;

    let (content, base_dir) = super::read_document(&args.document)?;

    let caller = ScriptCaller::new(args.root_key.unwrap_or_else(|| config.apply.root_key.clone()));
    let context = ConfigurationContext::from_config(&config, Host::default(), base_dir)?;

    let result = check_document(&content, &caller, &context)
        .with_context(|| format!("Failed to check {}", args.document))?;

    println!("{}", serde_json::to_string(&result)?);

    Ok(())
}
