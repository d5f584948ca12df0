//! A2A Message Types
//!
//! JSON-RPC 2.0 envelopes and the message/task result union exchanged with
//! remote agents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{A2AError, A2AResult};
use super::session::SendContext;

/// JSON-RPC 2.0 version constant
pub const JSONRPC_VERSION: &str = "2.0";

/// Method name for a blocking send
pub const METHOD_MESSAGE_SEND: &str = "message/send";

/// Message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    #[default]
    Agent,
}

/// Message content part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Part {
    /// Text content
    Text { text: String },

    /// Structured payload
    Data { data: Value },

    /// File reference or inline bytes
    File { file: Value },

    /// Any part kind this crate does not understand
    #[serde(other)]
    Unknown,
}

impl Part {
    /// Create text part
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create data part
    pub fn data(data: Value) -> Self {
        Self::Data { data }
    }

    /// Text carried by this part, if any
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text { text } => Some(text),
            Part::Data { .. } | Part::File { .. } | Part::Unknown => None,
        }
    }
}

/// A single conversational turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(default)]
    pub role: Role,

    #[serde(default)]
    pub parts: Vec<Part>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

impl Message {
    /// Create an agent message with the given parts
    pub fn agent(parts: Vec<Part>) -> Self {
        Self {
            role: Role::Agent,
            parts,
            ..Default::default()
        }
    }

    /// Create a user message carrying one text part and the session correlation ids
    pub fn user(text: impl Into<String>, context: &SendContext) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::text(text)],
            message_id: Some(uuid::Uuid::new_v4().to_string()),
            context_id: context.context_id.clone(),
            task_id: context.task_id.clone(),
        }
    }
}

/// Task lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    Submitted,
    Working,
    InputRequired,
    AuthRequired,
    Completed,
    Failed,
    Canceled,
    Rejected,
    #[default]
    #[serde(other)]
    Unknown,
}

impl TaskState {
    /// Check if task is finished in any state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Failed | TaskState::Canceled | TaskState::Rejected
        )
    }

    /// Check if task succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, TaskState::Completed)
    }
}

/// Task status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TaskStatus {
    pub state: TaskState,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl TaskStatus {
    pub fn new(state: TaskState) -> Self {
        Self {
            state,
            ..Default::default()
        }
    }
}

/// Task artifact (output)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub parts: Vec<Part>,
}

/// Long-running unit of work on the remote agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,

    #[serde(default)]
    pub status: TaskStatus,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<Part>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<Artifact>,
}

impl Task {
    /// Create a task in the given state with inline parts
    pub fn with_state(state: TaskState, parts: Vec<Part>) -> Self {
        Self {
            status: TaskStatus::new(state),
            parts,
            ..Default::default()
        }
    }
}

/// The two shapes a `message/send` result can take
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SendResult {
    Message(Message),
    Task(Task),
}

/// A send result together with the correlation ids echoed by the remote side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub result: SendResult,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

impl ResponseEnvelope {
    /// Wrap a result without echoed ids
    pub fn new(result: SendResult) -> Self {
        Self {
            result,
            context_id: None,
            task_id: None,
        }
    }

    /// Set the echoed ids
    pub fn with_ids(mut self, context_id: Option<&str>, task_id: Option<&str>) -> Self {
        self.context_id = context_id.map(str::to_string);
        self.task_id = task_id.map(str::to_string);
        self
    }

    /// Build an envelope from a result, lifting the ids the result itself carries
    pub fn from_result(result: SendResult) -> Self {
        let (context_id, task_id) = match &result {
            SendResult::Message(message) => (message.context_id.clone(), message.task_id.clone()),
            SendResult::Task(task) => (task.context_id.clone(), task.id.clone()),
        };
        Self {
            result,
            context_id,
            task_id,
        }
    }
}

/// Send configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MessageConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_output_modes: Option<Vec<String>>,

    /// Wait for the task to reach a terminal or interrupted state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocking: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_length: Option<u32>,
}

/// `message/send` parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageSendParams {
    pub message: Message,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<MessageConfiguration>,
}

/// A2A request (JSON-RPC 2.0)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct A2ARequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: MessageSendParams,
    pub id: Value,
}

impl A2ARequest {
    /// Create a `message/send` request for `query`, correlated with `context`
    pub fn send_message(query: impl Into<String>, context: &SendContext) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: METHOD_MESSAGE_SEND.to_string(),
            params: MessageSendParams {
                message: Message::user(query, context),
                configuration: Some(MessageConfiguration {
                    blocking: Some(true),
                    ..Default::default()
                }),
            },
            id: Value::String(uuid::Uuid::new_v4().to_string()),
        }
    }

    /// Set request ID
    pub fn with_id(mut self, id: impl Into<Value>) -> Self {
        self.id = id.into();
        self
    }
}

/// A2A error object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct A2AResponseError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl A2AResponseError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

/// A2A response (JSON-RPC 2.0)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct A2AResponse {
    pub jsonrpc: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<SendResult>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<A2AResponseError>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
}

impl A2AResponse {
    /// Successful response carrying `result`
    pub fn success(result: SendResult) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id: None,
        }
    }

    /// Error response
    pub fn failure(error: A2AResponseError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(error),
            id: None,
        }
    }

    /// Unwrap into an envelope, turning JSON-RPC errors into `A2AError`
    pub fn into_envelope(self, agent_name: &str) -> A2AResult<ResponseEnvelope> {
        if let Some(error) = self.error {
            return Err(A2AError::RemoteError {
                agent_name: agent_name.to_string(),
                code: error.code,
                message: error.message,
            });
        }
        self.result
            .map(ResponseEnvelope::from_result)
            .ok_or_else(|| A2AError::ProtocolError {
                message: "Empty response".to_string(),
            })
    }
}
