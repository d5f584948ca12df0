//! Configuration validation integration tests
//!
//! Loads configuration files from disk and checks that invalid agent
//! definitions are rejected before any invocation is built.

#[cfg(test)]
mod tests {
    use a2a_invoke::core::a2a::{A2AConfig, RemoteAgentDefinition, TaskClearPolicy};
    use a2a_invoke::{Config, Error};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_example_config_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/a2a.yaml.example");
        let config = Config::from_file(path).await.unwrap();

        assert_eq!(config.a2a.task_clear_policy, TaskClearPolicy::CompletedOnly);
        let weather = config.a2a.get_agent("weather").unwrap();
        assert_eq!(weather.display_name(), "Weather Agent");
        assert!(weather.input_config.inputs.contains_key("query"));
    }

    #[tokio::test]
    async fn test_empty_file_uses_defaults() {
        let file = write_config("a2a: {}\n");
        let config = Config::from_file(file.path()).await.unwrap();
        assert_eq!(config.a2a, A2AConfig::default());
    }

    #[tokio::test]
    async fn test_invalid_card_url_rejected() {
        let file = write_config(
            r#"
a2a:
  agents:
    - name: "broken"
      agentCardUrl: "not-a-url"
"#,
        );

        let err = Config::from_file(file.path()).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn test_malformed_yaml_rejected() {
        let file = write_config("a2a: [unclosed");
        let err = Config::from_file(file.path()).await.unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
    }

    #[test]
    fn test_validate_reports_every_problem() {
        let config = A2AConfig {
            agents: vec![
                RemoteAgentDefinition::new("", "https://a.example.com/card"),
                RemoteAgentDefinition::new("dup", "https://b.example.com/card"),
                RemoteAgentDefinition::new("dup", "https://c.example.com/card"),
            ],
            ..Default::default()
        };

        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_yaml_round_trip_preserves_agents() {
        let mut config = Config::default();
        config.a2a.agents.push(
            RemoteAgentDefinition::new("weather", "https://weather.example.com/card")
                .with_display_name("Weather"),
        );

        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("agentCardUrl"));

        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }
}
