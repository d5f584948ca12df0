//! A2A Error types
//!
//! Defines error types for remote agent invocation.

use std::fmt;

/// Result type for A2A operations
pub type A2AResult<T> = Result<T, A2AError>;

/// A2A-specific errors
#[derive(Debug, Clone)]
pub enum A2AError {
    /// Invocation inputs rejected at construction time
    InvalidInput {
        agent_name: String,
        message: String,
    },

    /// No client registered for the agent
    AgentNotFound {
        agent_name: String,
    },

    /// Connection error
    ConnectionError {
        agent_name: String,
        message: String,
    },

    /// Authentication error
    AuthenticationError {
        agent_name: String,
        message: String,
    },

    /// Ambient credentials could not be discovered or exchanged for a token
    CredentialError {
        message: String,
    },

    /// Protocol error (invalid JSON-RPC message)
    ProtocolError {
        message: String,
    },

    /// JSON-RPC error object returned by the remote agent
    RemoteError {
        agent_name: String,
        code: i32,
        message: String,
    },

    /// Transport gave up waiting for the agent
    Timeout {
        agent_name: String,
        timeout_ms: u64,
    },

    /// The caller cancelled the request while it was in flight
    Cancelled {
        agent_name: String,
    },

    /// Configuration error
    ConfigurationError {
        message: String,
    },

    /// Serialization error
    SerializationError {
        message: String,
    },
}

impl A2AError {
    /// Whether this error came from the caller's cancellation signal
    pub fn is_cancelled(&self) -> bool {
        matches!(self, A2AError::Cancelled { .. })
    }

    /// Whether the remote side rejected our credentials
    pub fn is_authentication(&self) -> bool {
        matches!(self, A2AError::AuthenticationError { .. })
    }
}

impl fmt::Display for A2AError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            A2AError::InvalidInput {
                agent_name,
                message,
            } => {
                write!(f, "Remote agent '{}' {}", agent_name, message)
            }
            A2AError::AgentNotFound { agent_name } => {
                write!(f, "Agent not found: {}", agent_name)
            }
            A2AError::ConnectionError {
                agent_name,
                message,
            } => {
                write!(f, "Connection error to agent '{}': {}", agent_name, message)
            }
            A2AError::AuthenticationError {
                agent_name,
                message,
            } => {
                write!(
                    f,
                    "Authentication failed for agent '{}': {}",
                    agent_name, message
                )
            }
            A2AError::CredentialError { message } => {
                write!(f, "Failed to obtain credentials: {}", message)
            }
            A2AError::ProtocolError { message } => {
                write!(f, "A2A protocol error: {}", message)
            }
            A2AError::RemoteError {
                agent_name,
                code,
                message,
            } => {
                write!(
                    f,
                    "Agent '{}' returned error {}: {}",
                    agent_name, code, message
                )
            }
            A2AError::Timeout {
                agent_name,
                timeout_ms,
            } => {
                write!(
                    f,
                    "Timeout waiting for agent '{}' ({}ms)",
                    agent_name, timeout_ms
                )
            }
            A2AError::Cancelled { agent_name } => {
                write!(f, "Request to agent '{}' was cancelled", agent_name)
            }
            A2AError::ConfigurationError { message } => {
                write!(f, "A2A configuration error: {}", message)
            }
            A2AError::SerializationError { message } => {
                write!(f, "A2A serialization error: {}", message)
            }
        }
    }
}

impl std::error::Error for A2AError {}

impl From<serde_json::Error> for A2AError {
    fn from(e: serde_json::Error) -> Self {
        A2AError::SerializationError {
            message: e.to_string(),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for A2AError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        A2AError::CredentialError {
            message: format!("Failed to sign credential assertion: {}", e),
        }
    }
}
