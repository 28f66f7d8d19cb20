use serde::Serialize;
use tracing::{info, warn};

use crate::configurator::{RootElementConfigurator, ScriptCaller, ScriptOutcome};
use crate::context::ConfigurationContext;
use crate::error::Result;
use crate::logging::{operations, status};
use crate::node::CNode;

/// Result of applying one configuration document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    pub root_key: String,
    pub outcomes: Vec<ScriptOutcome>,
}

/// Serializable view of a report
#[derive(Debug, Serialize)]
pub struct ReportSummary<'a> {
    pub root_key: &'a str,
    pub results: Vec<bool>,
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<FailureSummary>,
}

#[derive(Debug, Serialize)]
pub struct FailureSummary {
    pub index: usize,
    pub kind: String,
}

impl ApplyReport {
    /// Boolean outcome per script source, in document order
    pub fn results(&self) -> Vec<bool> {
        self.outcomes.iter().map(|o| o.is_ok()).collect()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }

    pub fn summary(&self) -> ReportSummary<'_> {
        ReportSummary {
            root_key: &self.root_key,
            results: self.results(),
            succeeded: self.succeeded(),
            failed: self.failed(),
            failures: self
                .outcomes
                .iter()
                .enumerate()
                .filter_map(|(index, outcome)| {
                    outcome.err().map(|kind| FailureSummary {
                        index,
                        kind: kind.to_string(),
                    })
                })
                .collect(),
        }
    }
}

/// Apply the configurator's root key of a YAML document
///
/// A document without the root key applies nothing and yields an empty report.
pub fn apply_document(
    content: &str,
    caller: &ScriptCaller,
    context: &ConfigurationContext,
) -> Result<ApplyReport> {
    let document = parse_document(content)?;

    let outcomes = match root_node(&document, caller.name())? {
        Some(node) => caller.configure_detailed(node, context)?,
        None => {
            warn!(
                operation = operations::APPLY,
                status = status::SKIPPED,
                root_key = caller.name(),
                "document has no script sources"
            );
            Vec::new()
        }
    };

    Ok(ApplyReport {
        root_key: caller.name().to_string(),
        outcomes,
    })
}

/// Run the configurator's check on a YAML document
pub fn check_document(
    content: &str,
    caller: &ScriptCaller,
    context: &ConfigurationContext,
) -> Result<Vec<bool>> {
    let document = parse_document(content)?;

    let result = match root_node(&document, caller.name())? {
        Some(node) => caller.check(node, context)?,
        None => Vec::new(),
    };

    info!(
        operation = operations::CHECK,
        root_key = caller.name(),
        "check performed no validation"
    );

    Ok(result)
}

fn parse_document(content: &str) -> Result<CNode> {
    match CNode::from_yaml_str(content)? {
        // An empty YAML document parses as null
        CNode::Scalar(s) if s.is_empty() => Ok(CNode::Mapping(Default::default())),
        document => Ok(document),
    }
}

fn root_node<'a>(document: &'a CNode, root_key: &str) -> Result<Option<&'a CNode>> {
    Ok(document.as_mapping()?.get(root_key))
}
