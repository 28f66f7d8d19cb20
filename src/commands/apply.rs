use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use crate::apply::apply_document;
use crate::cli::ApplyArgs;
use crate::cli_utils::{casc_prefix, outcome_marker};
use crate::config_discovery::load_config_with_discovery;
use crate::configurator::ScriptCaller;
use crate::context::ConfigurationContext;
use crate::host::Host;
use crate::logging::operations;

pub fn run(args: ApplyArgs) -> Result<()> {
    let config = load_config_with_discovery(args.config.as_deref())?;
    config.validate()?;

    let (content, base_dir) = super::read_document(&args.document)?;

    let state_path = args
        .state
        .map(PathBuf::from)
        .unwrap_or_else(|| config.state.resolved_path());
    let host = Host::load(&state_path)?;

    let caller = ScriptCaller::new(args.root_key.unwrap_or_else(|| config.apply.root_key.clone()));
    let context = ConfigurationContext::from_config(&config, host.clone(), base_dir)?;

    info!(
        operation = operations::APPLY,
        document = %args.document,
        state = %state_path.display(),
        "applying configuration document"
    );

    let report = apply_document(&content, &caller, &context)
        .with_context(|| format!("Failed to apply {}", args.document))?;

    host.save(&state_path)?;

    for (index, ok) in report.results().into_iter().enumerate() {
        eprintln!("{} script source {}: {}", casc_prefix(), index, outcome_marker(ok));
    }
    println!("{}", serde_json::to_string_pretty(&report.summary())?);

    if args.fail_on_error && !report.all_succeeded() {
        anyhow::bail!(
            "{} of {} script sources failed",
            report.failed(),
            report.outcomes.len()
        );
    }

    Ok(())
}
