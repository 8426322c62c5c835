// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input path is neither a file nor a directory: {}", .0.display())]
    InputPath(PathBuf),

    #[error("File operation failed for {}: {source}", .path.display())]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Extraction failed for {}: {message}", .path.display())]
    Extraction { path: PathBuf, message: String },

    #[error("LLM transport error: {0}")]
    LlmTransport(String),

    #[error("LLM provider returned status {status}: {body}")]
    LlmProvider { status: u16, body: String },

    #[error("Invalid response from LLM: {0}")]
    InvalidResponse(String),

    #[error("LLM request failed after {attempts} attempt(s): {source}")]
    Llm {
        attempts: u32,
        source: Box<PipelineError>,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Publish error: {0}")]
    Publish(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PipelineError {
    pub fn extraction(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Extraction {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn file_operation(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileOperation {
            path: path.into(),
            source,
        }
    }

    /// Whether another attempt at the same completion call could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::LlmTransport(_) | Self::InvalidResponse(_) => true,
            Self::LlmProvider { status, .. } => {
                *status == 408 || *status == 429 || *status >= 500
            }
            _ => false,
        }
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
