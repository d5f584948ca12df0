//! # a2a-invoke-rs
//!
//! Invoke remote A2A (Agent-to-Agent) agents as tools.
//!
//! ## Features
//!
//! - **Input Validation**: Rejects invocations without a string `query`
//! - **Conversation Continuity**: `contextId` and `taskId` flow between calls
//! - **Lazy Provisioning**: One client per agent name, created on first use
//! - **Ambient Credentials**: Google ADC with refresh on rejected tokens
//! - **Cancellation**: In-flight calls are abandoned when the caller cancels
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use a2a_invoke::core::a2a::{
//!     A2AClientManager, A2ATransport, RemoteAgentDefinition, RemoteAgentInvocation,
//!     ToolInvocation,
//! };
//! use serde_json::json;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! async fn ask(transport: Arc<dyn A2ATransport>) -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = Arc::new(A2AClientManager::new(transport));
//!     let definition = Arc::new(RemoteAgentDefinition::new(
//!         "weather",
//!         "https://weather.example.com/.well-known/agent.json",
//!     ));
//!
//!     let inputs = json!({"query": "Will it rain tomorrow?"});
//!     let inputs = inputs.as_object().cloned().unwrap_or_default();
//!
//!     let mut invocation = RemoteAgentInvocation::new(definition, inputs, registry)?;
//!     let result = invocation.execute(CancellationToken::new()).await;
//!     println!("{}", result.return_display);
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod utils;

// Re-export main types
pub use crate::config::Config;
pub use crate::utils::error::{Error, Result};

pub use crate::core::a2a::{
    A2AClientManager, A2AConfig, A2AError, A2AResult, A2ATransport, AdcConfig, AdcHandler,
    AuthenticationHandler, ClientRegistry, ConfirmationDetails, InvocationResult,
    RemoteAgentDefinition, RemoteAgentInvocation, SessionState, TaskClearPolicy, ToolInvocation,
};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
