//! Remote agent invocation
//!
//! A [`RemoteAgentInvocation`] is created once per logical tool call and may
//! be executed repeatedly; each execution continues the conversation started
//! by the previous one.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::auth::{AdcHandler, AuthenticationHandler};
use super::config::{A2AConfig, AdcConfig, RemoteAgentDefinition};
use super::confirmation::ConfirmationDetails;
use super::error::{A2AError, A2AResult};
use super::extract::extract_text;
use super::message::ResponseEnvelope;
use super::registry::ClientRegistry;
use super::session::{SessionState, TaskClearPolicy};

/// Named inputs supplied by the caller
pub type AgentInputs = Map<String, Value>;

/// Error half of an [`InvocationResult`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    pub message: String,
}

/// Outcome of one execution, success or failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResult {
    pub return_display: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
}

impl InvocationResult {
    pub fn success(return_display: impl Into<String>) -> Self {
        Self {
            return_display: return_display.into(),
            error: None,
        }
    }

    /// Render `error` so it can be shown inline and inspected programmatically
    pub fn failure(error: &A2AError) -> Self {
        let message = error.to_string();
        Self {
            return_display: format!("Error calling remote agent: {}", message),
            error: Some(ToolError { message }),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// A tool call a host framework can confirm and run
#[async_trait]
pub trait ToolInvocation: Send {
    /// One-line summary of what the call will do
    fn description(&self) -> String;

    /// Approval prompt to show before `execute`
    async fn get_confirmation_details(&self, cancel: &CancellationToken) -> ConfirmationDetails;

    /// Run the call. Never fails; errors are reported inside the result.
    async fn execute(&mut self, cancel: CancellationToken) -> InvocationResult;
}

/// Invocation of one remote agent with one set of inputs
pub struct RemoteAgentInvocation {
    definition: Arc<RemoteAgentDefinition>,
    query: String,
    session: SessionState,
    registry: Arc<dyn ClientRegistry>,
    adc: AdcConfig,
    task_policy: TaskClearPolicy,
}

impl std::fmt::Debug for RemoteAgentInvocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteAgentInvocation")
            .field("agent", &self.definition.name)
            .field("query", &self.query)
            .field("session", &self.session)
            .field("task_policy", &self.task_policy)
            .finish()
    }
}

impl RemoteAgentInvocation {
    /// Validate `inputs` and create the invocation.
    ///
    /// `inputs` must carry a string `query`; anything else is left to the
    /// agent's declared input schema.
    pub fn new(
        definition: Arc<RemoteAgentDefinition>,
        inputs: AgentInputs,
        registry: Arc<dyn ClientRegistry>,
    ) -> A2AResult<Self> {
        let query = match inputs.get("query") {
            Some(Value::String(query)) => query.clone(),
            _ => {
                return Err(A2AError::InvalidInput {
                    agent_name: definition.name.clone(),
                    message: "requires a string 'query' input".to_string(),
                });
            }
        };

        Ok(Self {
            definition,
            query,
            session: SessionState::new(),
            registry,
            adc: AdcConfig::default(),
            task_policy: TaskClearPolicy::default(),
        })
    }

    /// Create an invocation that follows `config`'s credential and task settings
    pub fn from_config(
        definition: Arc<RemoteAgentDefinition>,
        inputs: AgentInputs,
        registry: Arc<dyn ClientRegistry>,
        config: &A2AConfig,
    ) -> A2AResult<Self> {
        Ok(Self::new(definition, inputs, registry)?
            .with_auth_config(config.adc.clone())
            .with_task_policy(config.task_clear_policy))
    }

    /// Settings for the credential handler provisioned on first use
    pub fn with_auth_config(mut self, adc: AdcConfig) -> Self {
        self.adc = adc;
        self
    }

    pub fn with_task_policy(mut self, task_policy: TaskClearPolicy) -> Self {
        self.task_policy = task_policy;
        self
    }

    pub fn definition(&self) -> &RemoteAgentDefinition {
        &self.definition
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    async fn ensure_client(&self) -> A2AResult<()> {
        let name = &self.definition.name;
        if self.registry.get_client(name).is_some() {
            return Ok(());
        }

        let auth: Arc<dyn AuthenticationHandler> = Arc::new(AdcHandler::new(self.adc.clone()));
        self.registry
            .load_agent(name, &self.definition.agent_card_url, auth)
            .await
    }

    async fn send(&self, cancel: &CancellationToken) -> A2AResult<ResponseEnvelope> {
        let exchange = async {
            self.ensure_client().await?;
            self.registry
                .send_message(&self.definition.name, &self.query, self.session.outgoing())
                .await
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(A2AError::Cancelled {
                agent_name: self.definition.name.clone(),
            }),
            result = exchange => result,
        }
    }
}

#[async_trait]
impl ToolInvocation for RemoteAgentInvocation {
    fn description(&self) -> String {
        format!("Calling remote agent {}", self.definition.display_name())
    }

    async fn get_confirmation_details(&self, _cancel: &CancellationToken) -> ConfirmationDetails {
        ConfirmationDetails::for_remote_agent(&self.definition, &self.query)
    }

    async fn execute(&mut self, cancel: CancellationToken) -> InvocationResult {
        match self.send(&cancel).await {
            Ok(envelope) => {
                self.session.apply(&envelope, self.task_policy);
                info!(
                    agent = %self.definition.name,
                    context_id = ?self.session.context_id(),
                    task_id = ?self.session.task_id(),
                    "Remote agent responded"
                );
                InvocationResult::success(extract_text(&envelope.result))
            }
            Err(err) => {
                warn!(
                    agent = %self.definition.name,
                    cancelled = err.is_cancelled(),
                    error = %err,
                    "Remote agent call failed"
                );
                InvocationResult::failure(&err)
            }
        }
    }
}
