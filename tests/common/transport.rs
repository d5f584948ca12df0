//! Scripted A2A transport
//!
//! Answers each send from a queue and remembers the request and headers it
//! was given, so tests can check what a client manager put on the wire.

use a2a_invoke::core::a2a::{
    A2AError, A2AResponse, A2AResult, A2ARequest, A2ATransport, AgentClient, AuthHeaders,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// What one send attempt carried
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub agent: String,
    pub request: A2ARequest,
    pub headers: AuthHeaders,
}

#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<A2AResult<A2AResponse>>>,
    seen: Mutex<Vec<SeenRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_reply(&self, reply: A2AResult<A2AResponse>) {
        self.replies.lock().push_back(reply);
    }

    /// Queue a 401-style rejection
    pub fn push_unauthorized(&self, agent: &str) {
        self.push_reply(Err(A2AError::AuthenticationError {
            agent_name: agent.to_string(),
            message: "401 Unauthorized".to_string(),
        }));
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().clone()
    }

    /// `Authorization` header of every attempt, in order
    pub fn authorizations(&self) -> Vec<Option<String>> {
        self.seen
            .lock()
            .iter()
            .map(|s| s.headers.get("Authorization").cloned())
            .collect()
    }
}

#[async_trait]
impl A2ATransport for ScriptedTransport {
    async fn send(
        &self,
        client: &AgentClient,
        request: &A2ARequest,
        headers: &AuthHeaders,
    ) -> A2AResult<A2AResponse> {
        self.seen.lock().push(SeenRequest {
            agent: client.name.clone(),
            request: request.clone(),
            headers: headers.clone(),
        });
        self.replies.lock().pop_front().unwrap_or_else(|| {
            Err(A2AError::ConnectionError {
                agent_name: client.name.clone(),
                message: "No scripted reply".to_string(),
            })
        })
    }
}
