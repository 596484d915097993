//! Error types for node contract operations

use thiserror::Error;

use crate::types::ArtifactKind;

/// Result type alias using NodeError
pub type Result<T> = std::result::Result<T, NodeError>;

/// Errors that can occur while describing, configuring or executing a node
#[derive(Debug, Error)]
pub enum NodeError {
    /// A required input port has no bound artifact
    #[error("Missing required input: {0}")]
    MissingInput(String),

    /// An artifact bound to a port failed its own validation
    #[error("Invalid artifact on port '{port}': {reason}")]
    InvalidArtifact { port: String, reason: String },

    /// The artifact bound to a port is of a different kind than declared
    #[error("Kind mismatch on port '{port}': expected {expected}, got {actual}")]
    KindMismatch {
        port: String,
        expected: ArtifactKind,
        actual: ArtifactKind,
    },

    /// Port lookup by name failed
    #[error("Port not found: {0}")]
    PortNotFound(String),

    /// Two ports in the same list share a name
    #[error("Duplicate port name: {0}")]
    DuplicatePort(String),

    /// Artifact payload is empty
    #[error("{0} payload is empty")]
    EmptyPayload(ArtifactKind),

    /// A configuration value was rejected
    #[error("Invalid configuration for '{key}': {reason}")]
    InvalidConfig { key: String, reason: String },

    /// The node ran but could not produce outputs
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    /// The identifier was already bound by the host
    #[error("Node identifier already bound: {0}")]
    IdAlreadyBound(String),

    /// Another node is already registered under this identifier
    #[error("Node identifier already registered: {0}")]
    DuplicateId(String),

    /// A remote node completed the call and reported a business failure
    #[error("Rejected by remote node: {0}")]
    Rejected(String),

    /// The call could not be completed (unreachable, broken channel, deadline)
    #[error("Transport error: {0}")]
    Transport(String),
}

impl NodeError {
    /// Create an execution failed error with a message
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::ExecutionFailed(msg.into())
    }

    /// Create an invalid configuration error
    pub fn invalid_config(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error is a transport fault rather than a business outcome
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
