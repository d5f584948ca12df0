//! A2A (Agent-to-Agent) remote agent invocation
//!
//! This module lets a host framework treat a remote A2A agent as a tool:
//! validate inputs, ask the user for approval, call the agent over JSON-RPC
//! and keep conversational state across repeated calls.
//!
//! # Overview
//!
//! - **Invocation**: [`RemoteAgentInvocation`] drives one logical tool call
//! - **Session**: [`SessionState`] carries `contextId`/`taskId` between sends
//! - **Credentials**: [`AdcHandler`] attaches Google Application Default
//!   Credentials and refreshes them when the remote side rejects a token
//! - **Registry**: [`A2AClientManager`] provisions one client per agent name
//! - **Extraction**: [`extract_text`] flattens a response into display text
//!
//! # Usage
//!
//! ```rust,ignore
//! use a2a_invoke::core::a2a::{
//!     A2AClientManager, RemoteAgentDefinition, RemoteAgentInvocation, ToolInvocation,
//! };
//! use tokio_util::sync::CancellationToken;
//!
//! let registry = Arc::new(A2AClientManager::new(transport));
//! let definition = Arc::new(RemoteAgentDefinition::new(
//!     "weather",
//!     "https://weather.example.com/.well-known/agent.json",
//! ));
//!
//! let mut invocation = RemoteAgentInvocation::new(definition, inputs, registry)?;
//! let result = invocation.execute(CancellationToken::new()).await;
//! println!("{}", result.return_display);
//! ```

pub mod auth;
pub mod config;
pub mod confirmation;
pub mod error;
pub mod extract;
pub mod invocation;
pub mod message;
pub mod registry;
pub mod session;
pub mod transport;

// Re-export commonly used types
pub use auth::{AdcHandler, AuthHeaders, AuthenticationHandler, FailedAttempt};
pub use config::{A2AConfig, AdcConfig, AgentKind, RemoteAgentDefinition};
pub use confirmation::ConfirmationDetails;
pub use error::{A2AError, A2AResult};
pub use extract::extract_text;
pub use invocation::{
    AgentInputs, InvocationResult, RemoteAgentInvocation, ToolError, ToolInvocation,
};
pub use message::{
    A2ARequest, A2AResponse, Message, Part, ResponseEnvelope, SendResult, Task, TaskState,
};
pub use registry::{A2AClientManager, AgentClient, ClientRegistry};
pub use session::{SendContext, SessionState, TaskClearPolicy};
pub use transport::A2ATransport;
