use std::path::PathBuf;
use thiserror::Error;

/// PbiLink unified error type
#[derive(Error, Debug)]
pub enum PbiLinkError {
    #[error("'{binary}' is not installed or not on PATH")]
    ToolMissing { binary: String },

    #[error("Tool invocation failed: {message}")]
    ToolInvocation { message: String },

    #[error("Status output parse error: {message}")]
    Parse { message: String },

    #[error("Download failed: {message}")]
    Download { message: String },

    #[error("Install probe failed: {message}")]
    Probe { message: String },

    #[error("Path not found: {}", .path.display())]
    PathNotFound { path: PathBuf },

    #[error("Install failed: {message}")]
    Install { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Timed out waiting for '{binary}'")]
    Timeout { binary: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output error: {0}")]
    Output(String),
}

pub type PbiLinkResult<T> = Result<T, PbiLinkError>;
