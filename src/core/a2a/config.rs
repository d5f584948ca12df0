//! A2A Agent Configuration
//!
//! Remote agent definitions and the settings that govern how they are invoked.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::session::TaskClearPolicy;

/// Agent kind. Only remote agents are invoked over A2A.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    #[default]
    Remote,
}

/// Declared inputs of an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct InputConfig {
    /// Input name to JSON schema fragment
    #[serde(default)]
    pub inputs: Map<String, Value>,
}

/// Identity and metadata for a remote agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteAgentDefinition {
    /// Unique key in the client registry
    pub name: String,

    #[serde(default)]
    pub kind: AgentKind,

    /// Where the agent card is published
    pub agent_card_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub input_config: InputConfig,
}

impl RemoteAgentDefinition {
    /// Create a new definition
    pub fn new(name: impl Into<String>, agent_card_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AgentKind::Remote,
            agent_card_url: agent_card_url.into(),
            display_name: None,
            description: String::new(),
            input_config: InputConfig::default(),
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Declare an input
    pub fn with_input(mut self, name: impl Into<String>, schema: Value) -> Self {
        self.input_config.inputs.insert(name.into(), schema);
        self
    }

    /// Name shown to humans, falling back to the registry key
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    /// Validate the definition
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("Agent name cannot be empty".to_string());
        }
        if self.agent_card_url.is_empty() {
            return Err(format!("Agent '{}' has an empty agent card URL", self.name));
        }
        let url = &self.agent_card_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(format!(
                "Agent card URL must start with http:// or https://, got: {}",
                self.agent_card_url
            ));
        }
        Ok(())
    }
}

/// Google Application Default Credentials settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdcConfig {
    /// GCE/Cloud Run metadata token endpoint
    #[serde(default = "default_metadata_url")]
    pub metadata_url: String,

    /// OAuth token endpoint used to refresh `authorized_user` credentials
    #[serde(default = "default_token_url")]
    pub token_url: String,

    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,

    /// Refresh this many seconds before the token actually expires
    #[serde(default = "default_expiry_margin_secs")]
    pub expiry_margin_secs: i64,
}

fn default_metadata_url() -> String {
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token"
        .to_string()
}

fn default_token_url() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

fn default_scopes() -> Vec<String> {
    vec!["https://www.googleapis.com/auth/cloud-platform".to_string()]
}

fn default_expiry_margin_secs() -> i64 {
    300
}

impl Default for AdcConfig {
    fn default() -> Self {
        Self {
            metadata_url: default_metadata_url(),
            token_url: default_token_url(),
            scopes: default_scopes(),
            expiry_margin_secs: default_expiry_margin_secs(),
        }
    }
}

/// A2A invocation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct A2AConfig {
    /// How many times a credential-related failure is retried with fresh headers
    #[serde(default = "default_max_auth_retries")]
    pub max_auth_retries: u32,

    #[serde(default)]
    pub task_clear_policy: TaskClearPolicy,

    #[serde(default)]
    pub adc: AdcConfig,

    /// Known remote agents
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub agents: Vec<RemoteAgentDefinition>,
}

fn default_max_auth_retries() -> u32 {
    1
}

impl Default for A2AConfig {
    fn default() -> Self {
        Self {
            max_auth_retries: default_max_auth_retries(),
            task_clear_policy: TaskClearPolicy::default(),
            adc: AdcConfig::default(),
            agents: Vec::new(),
        }
    }
}

impl A2AConfig {
    /// Get an agent by name
    pub fn get_agent(&self, name: &str) -> Option<&RemoteAgentDefinition> {
        self.agents.iter().find(|a| a.name == name)
    }

    /// Validate all agent definitions
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors: Vec<String> = self
            .agents
            .iter()
            .filter_map(|a| a.validate().err())
            .collect();

        for (i, agent) in self.agents.iter().enumerate() {
            if self.agents[..i].iter().any(|other| other.name == agent.name) {
                errors.push(format!("Duplicate agent name: {}", agent.name));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
