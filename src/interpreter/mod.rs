/// Embedded script interpreter
///
/// Scripts run against the live [`Host`] for their side effects only. Every
/// call gets a fresh interpreter environment, so nothing a script defines is
/// visible to the next one.
pub mod quickjs;

use anyhow::Result;
use std::collections::BTreeMap;

use crate::host::Host;

pub use quickjs::QuickJsInterpreter;

/// Variables and arguments made visible to a script
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Binding {
    pub variables: BTreeMap<String, String>,
    pub args: Vec<String>,
}

impl Binding {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

/// Capability that executes literal script text
pub trait ScriptInterpreter: Send + Sync {
    /// Run `script` to completion. `script_name` labels diagnostics only.
    fn run(&self, script: &str, script_name: &str, binding: &Binding, host: &Host) -> Result<()>;
}
