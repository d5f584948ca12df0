//! Human-in-the-loop approval shown before a remote agent is called

use serde::{Deserialize, Serialize};

use super::config::RemoteAgentDefinition;

/// What a calling framework renders when asking for approval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ConfirmationDetails {
    /// Informational prompt: the user approves or rejects the call as a whole
    Info { title: String, prompt: String },
}

impl ConfirmationDetails {
    /// Approval prompt for sending `query` to `definition`
    pub fn for_remote_agent(definition: &RemoteAgentDefinition, query: &str) -> Self {
        ConfirmationDetails::Info {
            title: format!("Call Remote Agent: {}", definition.display_name()),
            prompt: format!(
                "Send the following query to the remote agent at {}?\n\n{}",
                definition.agent_card_url, query
            ),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ConfirmationDetails::Info { title, .. } => title,
        }
    }

    pub fn prompt(&self) -> &str {
        match self {
            ConfirmationDetails::Info { prompt, .. } => prompt,
        }
    }
}
