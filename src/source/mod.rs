/// Script sources
///
/// A script source describes where literal script text comes from. Handles
/// are cheap to build; any I/O happens in [`ScriptSource::get_script`], which
/// the caller invokes inside the same guarded step that runs the script.
pub mod local;
pub mod remote;

use anyhow::Result;
use std::fmt;

use crate::context::ConfigurationContext;
use crate::error::ConfiguratorError;
use crate::node::CNode;

pub use local::{FileSource, InlineSource};
pub use remote::UrlSource;

/// Source variant, used for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Inline,
    File,
    Url,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Inline => "inline",
            SourceKind::File => "file",
            SourceKind::Url => "url",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle that yields literal script text on demand
pub trait ScriptSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Fetch the script text, performing any I/O the source needs
    fn get_script(&self) -> Result<String>;
}

/// Capability that turns a resolved descriptor into a script source handle
pub trait SourceConfigurator: Send + Sync {
    fn configure(
        &self,
        descriptor: &CNode,
        context: &ConfigurationContext,
    ) -> Result<Box<dyn ScriptSource>, ConfiguratorError>;
}

/// Built-in descriptor formats
///
/// | Descriptor                  | Source           |
/// |-----------------------------|------------------|
/// | `script: <text>`            | [`InlineSource`] |
/// | `inline: <text>`            | [`InlineSource`] |
/// | `file: <path>`              | [`FileSource`]   |
/// | `url: <http(s) or file url>` | [`UrlSource`]   |
/// | bare scalar `<text>`        | [`InlineSource`] |
///
/// Only the first entry of a mapping is considered.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScriptSourceConfigurator;

impl SourceConfigurator for ScriptSourceConfigurator {
    fn configure(
        &self,
        descriptor: &CNode,
        context: &ConfigurationContext,
    ) -> Result<Box<dyn ScriptSource>, ConfiguratorError> {
        match descriptor {
            CNode::Scalar(text) => Ok(Box::new(InlineSource::new(text.clone()))),
            CNode::Mapping(mapping) => {
                let (tag, payload) = mapping.first().ok_or_else(|| {
                    ConfiguratorError::format("script source mapping has no entries")
                })?;
                let payload = payload.as_scalar()?;

                match tag {
                    "script" | "inline" => Ok(Box::new(InlineSource::new(payload))),
                    "file" => Ok(Box::new(FileSource::new(context.base_dir().join(payload)))),
                    "url" => Ok(Box::new(UrlSource::new(payload, context.http().clone())?)),
                    other => Err(ConfiguratorError::format(format!(
                        "unknown script source type '{}', expected one of: script, inline, file, url",
                        other
                    ))),
                }
            }
            CNode::Sequence(_) => Err(ConfiguratorError::format(
                "a script source cannot be a sequence",
            )),
        }
    }
}
