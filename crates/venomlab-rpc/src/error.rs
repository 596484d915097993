//! Error types for the RPC bridge

use thiserror::Error;
use venomlab_core::NodeError;

/// A wire value could not be turned into its native counterpart
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    /// No variant slot is populated
    #[error("'{key}' has no populated value slot")]
    Unpopulated { key: String },

    /// More than one variant slot is populated
    #[error("'{key}' has multiple populated slots: {slots}")]
    Ambiguous { key: String, slots: String },
}

/// Transport-level failures: the call itself could not be completed
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("Deadline exceeded: {0}")]
    Timeout(String),

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Wire(#[from] WireError),

    #[error("Failed to bind listener: {0}")]
    Bind(std::io::Error),
}

impl From<reqwest::Error> for BridgeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::Http(err)
        }
    }
}

impl From<BridgeError> for NodeError {
    fn from(err: BridgeError) -> Self {
        NodeError::Transport(err.to_string())
    }
}

/// Result type alias using BridgeError
pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridge_errors_become_transport_faults() {
        let err: NodeError = BridgeError::Timeout("operation timed out".into()).into();
        assert!(err.is_transport());

        let err: NodeError = BridgeError::Status {
            status: 500,
            body: "boom".into(),
        }
        .into();
        assert!(err.is_transport());
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_wire_error_messages_name_key() {
        let err = WireError::Ambiguous {
            key: "key".into(),
            slots: "int_value, bytes_value".into(),
        };
        assert!(err.to_string().contains("int_value, bytes_value"));
        let err = WireError::Unpopulated { key: "shellcode".into() };
        assert!(err.to_string().contains("'shellcode'"));
    }
}
