use thiserror::Error;

/// Structural errors raised while reading a script source document.
///
/// These abort the whole apply call for the root key. Failures that happen
/// while fetching or running a script are not represented here; they are
/// reduced to a per-item outcome instead.
#[derive(Debug, Error)]
pub enum ConfiguratorError {
    #[error("Invalid configuration format: {message}")]
    Format { message: String },

    #[error("Script source #{index} could not be configured: {message}")]
    Source { index: usize, message: String },

    #[error("Invalid configuration document: {message}")]
    Document { message: String },
}

impl ConfiguratorError {
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    pub fn invalid_source(index: usize, message: impl Into<String>) -> Self {
        Self::Source {
            index,
            message: message.into(),
        }
    }

    pub fn document(message: impl Into<String>) -> Self {
        Self::Document {
            message: message.into(),
        }
    }
}

pub type Result<T, E = ConfiguratorError> = std::result::Result<T, E>;
