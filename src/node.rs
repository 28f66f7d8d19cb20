//! Configuration document model
//!
//! A document is parsed from YAML into a small tree of [`CNode`] values.
//! Mappings keep their entries in insertion order, which the script source
//! adapter relies on when it picks the first entry of a descriptor.

use serde_yaml::Value;
use std::fmt;

use crate::error::{ConfiguratorError, Result};

/// A node of a configuration document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CNode {
    Scalar(String),
    Sequence(Vec<CNode>),
    Mapping(Mapping),
}

/// Ordered key to node mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    entries: Vec<(String, CNode)>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry. Replacing keeps the original position.
    pub fn insert(&mut self, key: impl Into<String>, value: CNode) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&CNode> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// First entry in insertion order
    pub fn first(&self) -> Option<(&str, &CNode)> {
        self.entries.first().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CNode)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, CNode)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, CNode)>>(iter: I) -> Self {
        let mut mapping = Mapping::new();
        for (key, value) in iter {
            mapping.insert(key, value);
        }
        mapping
    }
}

impl CNode {
    pub fn scalar(value: impl Into<String>) -> Self {
        CNode::Scalar(value.into())
    }

    /// Convenience constructor for a single-entry mapping
    pub fn entry(key: impl Into<String>, value: CNode) -> Self {
        let mut mapping = Mapping::new();
        mapping.insert(key, value);
        CNode::Mapping(mapping)
    }

    pub fn shape(&self) -> &'static str {
        match self {
            CNode::Scalar(_) => "scalar",
            CNode::Sequence(_) => "sequence",
            CNode::Mapping(_) => "mapping",
        }
    }

    pub fn as_sequence(&self) -> Result<&[CNode]> {
        match self {
            CNode::Sequence(items) => Ok(items),
            other => Err(ConfiguratorError::format(format!(
                "expected a sequence, found a {}",
                other.shape()
            ))),
        }
    }

    pub fn as_mapping(&self) -> Result<&Mapping> {
        match self {
            CNode::Mapping(mapping) => Ok(mapping),
            other => Err(ConfiguratorError::format(format!(
                "expected a mapping, found a {}",
                other.shape()
            ))),
        }
    }

    pub fn as_scalar(&self) -> Result<&str> {
        match self {
            CNode::Scalar(value) => Ok(value),
            other => Err(ConfiguratorError::format(format!(
                "expected a scalar, found a {}",
                other.shape()
            ))),
        }
    }

    /// Parse a YAML document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(content)
            .map_err(|e| ConfiguratorError::document(e.to_string()))?;
        Self::from_yaml(value)
    }

    pub fn from_yaml(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(CNode::Scalar(String::new())),
            Value::Bool(b) => Ok(CNode::Scalar(b.to_string())),
            Value::Number(n) => Ok(CNode::Scalar(n.to_string())),
            Value::String(s) => Ok(CNode::Scalar(s)),
            Value::Sequence(items) => items
                .into_iter()
                .map(Self::from_yaml)
                .collect::<Result<Vec<_>>>()
                .map(CNode::Sequence),
            Value::Mapping(map) => {
                let mut mapping = Mapping::new();
                for (key, value) in map {
                    let key = match key {
                        Value::String(s) => s,
                        Value::Bool(b) => b.to_string(),
                        Value::Number(n) => n.to_string(),
                        other => {
                            return Err(ConfiguratorError::document(format!(
                                "mapping keys must be scalars, found {:?}",
                                other
                            )))
                        }
                    };
                    mapping.insert(key, Self::from_yaml(value)?);
                }
                Ok(CNode::Mapping(mapping))
            }
            Value::Tagged(tagged) => Self::from_yaml(tagged.value),
        }
    }
}

impl fmt::Display for CNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CNode::Scalar(value) => write!(f, "{:?}", value),
            CNode::Sequence(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            CNode::Mapping(mapping) => {
                write!(f, "{{")?;
                for (i, (key, value)) in mapping.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}
