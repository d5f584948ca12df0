//! A2A transport seam
//!
//! One attempt of one JSON-RPC exchange with a remote agent. Retries and
//! credential refresh are driven by the caller (see `A2AClientManager`).

use async_trait::async_trait;

use super::auth::AuthHeaders;
use super::error::A2AResult;
use super::message::{A2ARequest, A2AResponse};
use super::registry::AgentClient;

/// Trait for A2A wire implementations
#[async_trait]
pub trait A2ATransport: Send + Sync {
    /// Send `request` to `client` with `headers` attached.
    ///
    /// A rejected credential must be reported as
    /// `A2AError::AuthenticationError` so the handler gets a chance to refresh.
    async fn send(
        &self,
        client: &AgentClient,
        request: &A2ARequest,
        headers: &AuthHeaders,
    ) -> A2AResult<A2AResponse>;
}
