use thiserror::Error;

use crate::domain::Refusal;

/// Unified error type for taggit operations
#[derive(Error, Debug)]
pub enum TaggitError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    /// A bump request rejected by the decision rules
    #[error(transparent)]
    Refused(#[from] Refusal),

    /// Listing repository tags failed
    #[error("{0}")]
    List(String),

    /// Creating the local tag failed
    #[error("{0}")]
    Tag(String),

    /// Pushing the tag to the remote failed
    #[error("{0}")]
    Remote(String),

    #[error("subprocess `{command}` failed: {output}")]
    Command { command: String, output: String },

    #[error("`{command}` timed out after {seconds}s")]
    Timeout { command: String, seconds: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in taggit
pub type Result<T> = std::result::Result<T, TaggitError>;

impl TaggitError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        TaggitError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        TaggitError::Version(msg.into())
    }

    /// Create a tag listing error with context
    pub fn list(msg: impl Into<String>) -> Self {
        TaggitError::List(msg.into())
    }

    /// Create a tag creation error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        TaggitError::Tag(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        TaggitError::Remote(msg.into())
    }

    /// True for business-rule refusals, false for system failures.
    pub fn is_refusal(&self) -> bool {
        matches!(self, TaggitError::Refused(_))
    }
}
