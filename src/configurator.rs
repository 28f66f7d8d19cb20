//! Script source root configurator
//!
//! Applies the sequence of script sources found under the root key:
//!
//! 1. extract the ordered descriptor list
//! 2. resolve secret tokens in each descriptor payload
//! 3. build a script source handle for each resolved descriptor
//! 4. fetch and run each script, recording one outcome per descriptor
//!
//! Steps 1-3 are structural. They run for every descriptor before any script
//! executes, and any failure aborts the whole call. Step 4 is guarded per
//! descriptor: a failing fetch or script yields `false` and the next
//! descriptor still runs.

use std::fmt;
use tracing::{debug, info, warn};

use crate::context::ConfigurationContext;
use crate::error::{ConfiguratorError, Result};
use crate::interpreter::Binding;
use crate::logging::status;
use crate::node::CNode;
use crate::source::ScriptSource;

/// Label the interpreter reports for every configuration script
pub const SCRIPT_NAME: &str = "Configuration-as-Code-Script";

/// A configurator responsible for one root key of a configuration document
pub trait RootElementConfigurator {
    type Target;

    /// Root key handled by this configurator
    fn name(&self) -> &str;

    /// Apply `config` to the live host
    fn configure(&self, config: &CNode, context: &ConfigurationContext) -> Result<Self::Target>;

    /// Validate `config` without side effects
    fn check(&self, config: &CNode, context: &ConfigurationContext) -> Result<Self::Target>;

    /// Current value as seen by the host
    fn target_component(&self, context: &ConfigurationContext) -> Self::Target;

    /// Export `instance` back into a configuration node
    fn describe(&self, instance: &Self::Target, context: &ConfigurationContext) -> Option<CNode>;
}

/// Why a descriptor's guarded step failed
///
/// Only the kind is kept. Messages are logged, never returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionFailure {
    /// The script text could not be obtained
    Fetch,
    /// The interpreter raised an error while running the script
    Runtime,
}

impl fmt::Display for ExecutionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionFailure::Fetch => f.write_str("fetch"),
            ExecutionFailure::Runtime => f.write_str("runtime"),
        }
    }
}

/// Per-descriptor outcome; `is_ok()` is the boolean the host sees
pub type ScriptOutcome = std::result::Result<(), ExecutionFailure>;

/// Runs configuration scripts declared under the root key
#[derive(Debug, Clone)]
pub struct ScriptCaller {
    root_key: String,
}

impl Default for ScriptCaller {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_ROOT_KEY)
    }
}

impl ScriptCaller {
    pub fn new(root_key: impl Into<String>) -> Self {
        Self {
            root_key: root_key.into(),
        }
    }

    /// Like [`RootElementConfigurator::configure`] but keeps the failure kind
    pub fn configure_detailed(
        &self,
        config: &CNode,
        context: &ConfigurationContext,
    ) -> Result<Vec<ScriptOutcome>> {
        let descriptors = extract_sources(config)?;

        let sources = descriptors
            .iter()
            .enumerate()
            .map(|(index, descriptor)| {
                let resolved = resolve_descriptor(descriptor, context)
                    .map_err(|e| ConfiguratorError::invalid_source(index, e.to_string()))?;
                context
                    .lookup_source_configurator()
                    .configure(&resolved, context)
                    .map_err(|e| ConfiguratorError::invalid_source(index, e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            root_key = %self.root_key,
            entry_count = sources.len(),
            "script sources configured"
        );

        let outcomes: Vec<ScriptOutcome> = sources
            .iter()
            .enumerate()
            .map(|(index, source)| run_guarded(index, source.as_ref(), context))
            .collect();

        let failed = outcomes.iter().filter(|o| o.is_err()).count();
        info!(
            root_key = %self.root_key,
            success_count = outcomes.len() - failed,
            error_count = failed,
            "configuration scripts applied"
        );

        Ok(outcomes)
    }
}

impl RootElementConfigurator for ScriptCaller {
    type Target = Vec<bool>;

    fn name(&self) -> &str {
        &self.root_key
    }

    fn configure(&self, config: &CNode, context: &ConfigurationContext) -> Result<Vec<bool>> {
        Ok(self
            .configure_detailed(config, context)?
            .iter()
            .map(|outcome| outcome.is_ok())
            .collect())
    }

    // Scripts cannot be dry-run without their side effects
    fn check(&self, _config: &CNode, _context: &ConfigurationContext) -> Result<Vec<bool>> {
        Ok(Vec::new())
    }

    fn target_component(&self, _context: &ConfigurationContext) -> Vec<bool> {
        Vec::new()
    }

    fn describe(&self, _instance: &Vec<bool>, _context: &ConfigurationContext) -> Option<CNode> {
        None
    }
}

/// Ordered descriptors of a script source sequence
pub fn extract_sources(config: &CNode) -> Result<&[CNode]> {
    config.as_sequence()
}

/// Resolve secret tokens in a descriptor payload
///
/// A mapping descriptor is narrowed to its first entry (insertion order);
/// any further entries are ignored. The key is kept as is and the scalar
/// payload is passed through the context's secret resolver. Descriptors
/// that are not mappings, or are empty mappings, are returned unchanged.
pub fn resolve_descriptor(descriptor: &CNode, context: &ConfigurationContext) -> Result<CNode> {
    let CNode::Mapping(mapping) = descriptor else {
        return Ok(descriptor.clone());
    };

    let Some((key, value)) = mapping.first() else {
        return Ok(descriptor.clone());
    };

    if mapping.len() > 1 {
        debug!(
            source_type = key,
            ignored = mapping.len() - 1,
            "script source has extra entries, only the first is used"
        );
    }

    let raw = value.as_scalar()?;
    let resolved = context
        .secret_resolver()
        .resolve(context, raw)
        .map_err(|e| ConfiguratorError::format(format!("{:#}", e)))?;

    Ok(CNode::entry(key, CNode::Scalar(resolved)))
}

fn run_guarded(index: usize, source: &dyn ScriptSource, context: &ConfigurationContext) -> ScriptOutcome {
    let kind = source.kind();

    let script = match source.get_script() {
        Ok(script) => script,
        Err(e) => {
            warn!(
                index,
                source_kind = %kind,
                status = status::ERROR,
                failure = %ExecutionFailure::Fetch,
                "failed to fetch configuration script: {:#}",
                e
            );
            return Err(ExecutionFailure::Fetch);
        }
    };

    match context
        .interpreter()
        .run(&script, SCRIPT_NAME, &Binding::empty(), context.host())
    {
        Ok(()) => {
            debug!(
                index,
                source_kind = %kind,
                status = status::SUCCESS,
                "configuration script completed"
            );
            Ok(())
        }
        Err(e) => {
            warn!(
                index,
                source_kind = %kind,
                status = status::ERROR,
                failure = %ExecutionFailure::Runtime,
                "configuration script failed: {:#}",
                e
            );
            Err(ExecutionFailure::Runtime)
        }
    }
}
