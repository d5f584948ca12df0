//! Conversation and task correlation carried across calls on one invocation

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::message::{ResponseEnvelope, SendResult, TaskState};

/// Which task states drop the stored task id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskClearPolicy {
    /// Only `completed` clears the task id
    #[default]
    CompletedOnly,

    /// Any terminal state (completed, failed, canceled, rejected) clears it
    AnyTerminal,
}

impl TaskClearPolicy {
    /// Whether a task in `state` can no longer be resumed by id
    pub fn clears(&self, state: TaskState) -> bool {
        match self {
            TaskClearPolicy::CompletedOnly => state == TaskState::Completed,
            TaskClearPolicy::AnyTerminal => state.is_terminal(),
        }
    }
}

impl std::str::FromStr for TaskClearPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "completed" | "completed_only" => Ok(TaskClearPolicy::CompletedOnly),
            "terminal" | "any_terminal" => Ok(TaskClearPolicy::AnyTerminal),
            _ => Err(format!("Unknown task clear policy: {}", s)),
        }
    }
}

/// Correlation ids sent with a request
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendContext {
    pub context_id: Option<String>,
    pub task_id: Option<String>,
}

/// Per-invocation correlation state, starts empty
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    context_id: Option<String>,
    task_id: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context_id(&self) -> Option<&str> {
        self.context_id.as_deref()
    }

    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }

    /// Ids to attach to the next outgoing request
    pub fn outgoing(&self) -> SendContext {
        SendContext {
            context_id: self.context_id.clone(),
            task_id: self.task_id.clone(),
        }
    }

    /// Fold a response into the state.
    ///
    /// The context id is sticky: it is replaced when the remote side echoes
    /// one and kept otherwise. The task id follows the echo verbatim, except
    /// that a task the policy considers finished is forgotten so the next
    /// call opens a new task.
    pub fn apply(&mut self, envelope: &ResponseEnvelope, policy: TaskClearPolicy) {
        if let Some(context_id) = &envelope.context_id {
            self.context_id = Some(context_id.clone());
        }

        self.task_id = match &envelope.result {
            SendResult::Task(task) if policy.clears(task.status.state) => {
                debug!(
                    state = ?task.status.state,
                    echoed_task_id = ?envelope.task_id,
                    "Task finished, dropping task id"
                );
                None
            }
            SendResult::Task(_) | SendResult::Message(_) => envelope.task_id.clone(),
        };

        debug!(
            context_id = ?self.context_id,
            task_id = ?self.task_id,
            "Session state updated"
        );
    }
}
