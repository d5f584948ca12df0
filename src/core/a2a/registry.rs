//! A2A Client Registry
//!
//! Process-wide cache of provisioned agent clients, keyed by agent name.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use super::auth::{AuthenticationHandler, FailedAttempt};
use super::config::A2AConfig;
use super::error::{A2AError, A2AResult};
use super::message::{A2ARequest, ResponseEnvelope};
use super::session::SendContext;
use super::transport::A2ATransport;

/// A provisioned client for one remote agent
#[derive(Debug)]
pub struct AgentClient {
    pub name: String,
    pub agent_card_url: String,
    /// Credential strategy shared by every call to this agent
    pub auth: Arc<dyn AuthenticationHandler>,
    pub loaded_at: DateTime<Utc>,
}

impl AgentClient {
    pub fn new(
        name: impl Into<String>,
        agent_card_url: impl Into<String>,
        auth: Arc<dyn AuthenticationHandler>,
    ) -> Self {
        Self {
            name: name.into(),
            agent_card_url: agent_card_url.into(),
            auth,
            loaded_at: Utc::now(),
        }
    }
}

/// The collaborator an invocation talks to
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClientRegistry: Send + Sync {
    /// Client previously provisioned for `name`
    fn get_client(&self, name: &str) -> Option<Arc<AgentClient>>;

    /// Provision and cache a client for `name`
    async fn load_agent(
        &self,
        name: &str,
        agent_card_url: &str,
        auth: Arc<dyn AuthenticationHandler>,
    ) -> A2AResult<()>;

    /// Send `query` to `name`, correlated with `context`
    async fn send_message(
        &self,
        name: &str,
        query: &str,
        context: SendContext,
    ) -> A2AResult<ResponseEnvelope>;
}

type ClientSlot = Arc<OnceCell<Arc<AgentClient>>>;

/// Default [`ClientRegistry`] backed by an [`A2ATransport`]
pub struct A2AClientManager {
    transport: Arc<dyn A2ATransport>,

    /// One slot per name so concurrent loads provision at most once
    clients: RwLock<HashMap<String, ClientSlot>>,

    max_auth_retries: u32,
}

impl A2AClientManager {
    /// Create a new manager
    pub fn new(transport: Arc<dyn A2ATransport>) -> Self {
        Self {
            transport,
            clients: RwLock::new(HashMap::new()),
            max_auth_retries: 1,
        }
    }

    /// Create a manager that follows `config`'s retry budget
    pub fn from_config(transport: Arc<dyn A2ATransport>, config: &A2AConfig) -> Self {
        Self::new(transport).with_max_auth_retries(config.max_auth_retries)
    }

    /// Set how many credential refreshes a single send may trigger
    pub fn with_max_auth_retries(mut self, max_auth_retries: u32) -> Self {
        self.max_auth_retries = max_auth_retries;
        self
    }

    /// Forget a client; the next invocation provisions it again
    pub fn unload_agent(&self, name: &str) -> bool {
        self.clients.write().remove(name).is_some()
    }

    /// Names of all provisioned agents
    pub fn list_agents(&self) -> Vec<String> {
        self.clients
            .read()
            .iter()
            .filter(|(_, slot)| slot.initialized())
            .map(|(name, _)| name.clone())
            .collect()
    }

    fn slot(&self, name: &str) -> ClientSlot {
        if let Some(slot) = self.clients.read().get(name) {
            return slot.clone();
        }
        self.clients
            .write()
            .entry(name.to_string())
            .or_default()
            .clone()
    }
}

#[async_trait]
impl ClientRegistry for A2AClientManager {
    fn get_client(&self, name: &str) -> Option<Arc<AgentClient>> {
        self.clients
            .read()
            .get(name)
            .and_then(|slot| slot.get().cloned())
    }

    async fn load_agent(
        &self,
        name: &str,
        agent_card_url: &str,
        auth: Arc<dyn AuthenticationHandler>,
    ) -> A2AResult<()> {
        if !agent_card_url.starts_with("http://") && !agent_card_url.starts_with("https://") {
            return Err(A2AError::ConfigurationError {
                message: format!(
                    "Agent card URL must start with http:// or https://, got: {}",
                    agent_card_url
                ),
            });
        }

        let slot = self.slot(name);
        if slot.initialized() {
            debug!(agent = name, "Agent already loaded");
            return Ok(());
        }

        slot.get_or_init(|| async {
            info!(
                agent = name,
                card_url = agent_card_url,
                auth = auth.scheme(),
                "Loading remote agent"
            );
            Arc::new(AgentClient::new(name, agent_card_url, auth))
        })
        .await;

        Ok(())
    }

    async fn send_message(
        &self,
        name: &str,
        query: &str,
        context: SendContext,
    ) -> A2AResult<ResponseEnvelope> {
        let client = self
            .get_client(name)
            .ok_or_else(|| A2AError::AgentNotFound {
                agent_name: name.to_string(),
            })?;

        let request = A2ARequest::send_message(query, &context);
        let mut headers = client.auth.headers().await?;
        let mut refreshes = 0;

        info!(
            agent = name,
            method = %request.method,
            context_id = ?context.context_id,
            task_id = ?context.task_id,
            "Sending A2A message"
        );

        loop {
            let err = match self.transport.send(&client, &request, &headers).await {
                Ok(response) => return response.into_envelope(name),
                Err(err) => err,
            };

            if refreshes >= self.max_auth_retries {
                return Err(err);
            }

            let failure = FailedAttempt::from_error(name, &err);
            match client.auth.should_retry_with_headers(&failure).await? {
                Some(fresh) => {
                    refreshes += 1;
                    warn!(
                        agent = name,
                        attempt = refreshes,
                        error = %err,
                        "Retrying with refreshed credentials"
                    );
                    headers = fresh;
                }
                None => return Err(err),
            }
        }
    }
}
