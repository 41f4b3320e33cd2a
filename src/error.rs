// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Which upstream model provider an error or credential belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Primary,
    Secondary,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Primary => write!(f, "primary"),
            ProviderKind::Secondary => write!(f, "secondary"),
        }
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No API key configured for the {0} provider")]
    MissingCredential(ProviderKind),

    #[error("The {provider} provider rejected the API key: {message}")]
    InvalidCredential {
        provider: ProviderKind,
        message: String,
    },

    #[error("The {provider} provider returned status {status}: {message}")]
    Provider {
        provider: ProviderKind,
        status: u16,
        message: String,
    },

    #[error("Request to the {provider} provider failed: {source}")]
    Transport {
        provider: ProviderKind,
        #[source]
        source: reqwest::Error,
    },

    #[error("Document parsing error in {file}: {message}")]
    DocumentParse { file: String, message: String },

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unknown document: {0}")]
    UnknownDocument(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PipelineError {
    /// The provider this error originated from, if it came from a model call.
    pub fn provider(&self) -> Option<ProviderKind> {
        match self {
            PipelineError::MissingCredential(provider)
            | PipelineError::InvalidCredential { provider, .. }
            | PipelineError::Provider { provider, .. }
            | PipelineError::Transport { provider, .. } => Some(*provider),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::Serialization(err.to_string())
    }
}
