//! Remote invocation integration tests
//!
//! Construction, provisioning, extraction and failure reporting of a
//! `RemoteAgentInvocation` driven against a scripted registry.

#[cfg(test)]
mod tests {
    use crate::common::assertions::InvocationResultAssertions;
    use crate::common::fixtures::{self, TEST_AGENT, TEST_AGENT_URL};
    use crate::common::{ScriptedRegistry, init_tracing};
    use a2a_invoke::core::a2a::message::{Message, Part, SendResult};
    use a2a_invoke::core::a2a::{
        A2AError, ClientRegistry, ConfirmationDetails, RemoteAgentInvocation, ResponseEnvelope,
        SendContext, ToolInvocation,
    };
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    fn invocation(registry: &Arc<ScriptedRegistry>, query: &str) -> RemoteAgentInvocation {
        RemoteAgentInvocation::new(fixtures::test_agent(), fixtures::query(query), registry.clone())
            .unwrap()
    }

    // ==================== Construction ====================

    #[test]
    fn test_construction_requires_query() {
        let registry = Arc::new(ScriptedRegistry::new());
        let err = RemoteAgentInvocation::new(
            fixtures::test_agent(),
            fixtures::inputs(json!({"prompt": "hello"})),
            registry.clone(),
        )
        .unwrap_err();

        assert!(matches!(err, A2AError::InvalidInput { .. }));
        assert!(err.to_string().contains("requires a string 'query' input"));
        assert!(registry.loads().is_empty());
        assert!(registry.sends().is_empty());
    }

    #[test]
    fn test_construction_rejects_non_string_query() {
        for bad in [json!(123), json!(null), json!(["a"]), json!({"text": "a"})] {
            let result = RemoteAgentInvocation::new(
                fixtures::test_agent(),
                fixtures::inputs(json!({ "query": bad })),
                Arc::new(ScriptedRegistry::new()),
            );
            let err = result.unwrap_err();
            assert!(err.to_string().contains("requires a string 'query' input"));
        }
    }

    #[test]
    fn test_construction_ignores_other_inputs() {
        let registry = Arc::new(ScriptedRegistry::new());
        let invocation = RemoteAgentInvocation::new(
            fixtures::test_agent(),
            fixtures::inputs(json!({"query": "valid", "extra": 42})),
            registry,
        )
        .unwrap();

        assert_eq!(invocation.query(), "valid");
        assert!(invocation.session().context_id().is_none());
        assert!(invocation.session().task_id().is_none());
    }

    // ==================== Provisioning ====================

    #[tokio::test]
    async fn test_first_execute_provisions_once() {
        init_tracing();
        let registry = Arc::new(ScriptedRegistry::new());
        registry.push_response(fixtures::message_response("one", None, None));
        registry.push_response(fixtures::message_response("two", None, None));

        let mut invocation = invocation(&registry, "hi");
        invocation.execute(CancellationToken::new()).await.assert_success("one");
        invocation.execute(CancellationToken::new()).await.assert_success("two");

        let loads = registry.loads();
        assert_eq!(loads.len(), 1);
        assert_eq!(loads[0].name, TEST_AGENT);
        assert_eq!(loads[0].agent_card_url, TEST_AGENT_URL);
        assert_eq!(loads[0].scheme, "google-adc");
        assert_eq!(registry.sends().len(), 2);
    }

    #[tokio::test]
    async fn test_execute_loads_before_sending() {
        let registry = Arc::new(ScriptedRegistry::new());
        registry.push_response(fixtures::message_response("ready", None, None));

        let err = registry
            .send_message(TEST_AGENT, "early", SendContext::default())
            .await
            .unwrap_err();
        assert!(matches!(err, A2AError::AgentNotFound { .. }));
        assert!(registry.sends().is_empty());

        let mut invocation = invocation(&registry, "hi");
        invocation.execute(CancellationToken::new()).await.assert_success("ready");

        assert!(registry.get_client(TEST_AGENT).is_some());
        assert_eq!(registry.loads().len(), 1);
        assert_eq!(registry.sends().len(), 1);
    }

    #[tokio::test]
    async fn test_independent_invocations_share_registered_client() {
        let registry = Arc::new(ScriptedRegistry::new());
        registry.push_response(fixtures::message_response("a", Some("ctx-a"), None));
        registry.push_response(fixtures::message_response("b", Some("ctx-b"), None));

        let mut first = invocation(&registry, "first");
        let mut second = invocation(&registry, "second");
        first.execute(CancellationToken::new()).await.assert_success("a");
        second.execute(CancellationToken::new()).await.assert_success("b");

        assert_eq!(registry.loads().len(), 1);
        assert_eq!(first.session().context_id(), Some("ctx-a"));
        assert_eq!(second.session().context_id(), Some("ctx-b"));
    }

    #[tokio::test]
    async fn test_sends_name_and_query() {
        let registry = Arc::new(ScriptedRegistry::new());
        registry.push_response(fixtures::message_response("ok", None, None));

        let mut invocation = invocation(&registry, "What is the weather?");
        invocation.execute(CancellationToken::new()).await;

        let sends = registry.sends();
        assert_eq!(sends[0].name, TEST_AGENT);
        assert_eq!(sends[0].query, "What is the weather?");
    }

    // ==================== Extraction ====================

    #[tokio::test]
    async fn test_extracts_text_and_skips_data_parts() {
        let registry = Arc::new(ScriptedRegistry::new());
        registry.push_response(ResponseEnvelope::new(SendResult::Message(Message::agent(
            vec![Part::text("Extracted text"), Part::data(json!({"foo": "bar"}))],
        ))));

        let mut invocation = invocation(&registry, "hi");
        let result = invocation.execute(CancellationToken::new()).await;

        assert!(result.return_display.contains("Extracted text"));
        assert!(!result.return_display.contains("foo"));
        assert!(!result.return_display.contains("bar"));
    }

    #[tokio::test]
    async fn test_extracts_task_artifacts() {
        let registry = Arc::new(ScriptedRegistry::new());
        registry.push_response(fixtures::artifact_task_response("Report ready"));

        let mut invocation = invocation(&registry, "hi");
        invocation
            .execute(CancellationToken::new())
            .await
            .assert_success("Report ready");
    }

    #[tokio::test]
    async fn test_no_text_parts_yields_empty_display() {
        let registry = Arc::new(ScriptedRegistry::new());
        registry.push_response(ResponseEnvelope::new(SendResult::Message(Message::agent(
            vec![Part::data(json!({"only": "data"}))],
        ))));

        let mut invocation = invocation(&registry, "hi");
        invocation.execute(CancellationToken::new()).await.assert_success("");
    }

    // ==================== Failures ====================

    #[tokio::test]
    async fn test_send_failure_is_returned_not_raised() {
        let registry = Arc::new(ScriptedRegistry::new());
        registry.push_error(A2AError::ConnectionError {
            agent_name: TEST_AGENT.to_string(),
            message: "Network error".to_string(),
        });

        let mut invocation = invocation(&registry, "hi");
        let result = invocation.execute(CancellationToken::new()).await;

        result.assert_failure_contains("Network error");
        assert!(result.return_display.starts_with("Error calling remote agent:"));
    }

    #[tokio::test]
    async fn test_failure_leaves_session_untouched() {
        let registry = Arc::new(ScriptedRegistry::new());
        registry.push_response(fixtures::message_response("ok", Some("ctx-1"), Some("task-1")));
        registry.push_error(A2AError::RemoteError {
            agent_name: TEST_AGENT.to_string(),
            code: -32603,
            message: "Internal error".to_string(),
        });

        let mut invocation = invocation(&registry, "hi");
        invocation.execute(CancellationToken::new()).await;
        invocation
            .execute(CancellationToken::new())
            .await
            .assert_failure_contains("Internal error");

        assert_eq!(invocation.session().context_id(), Some("ctx-1"));
        assert_eq!(invocation.session().task_id(), Some("task-1"));
    }

    #[tokio::test]
    async fn test_cancellation_abandons_in_flight_send() {
        let registry = Arc::new(ScriptedRegistry::new().with_send_delay(Duration::from_secs(30)));
        registry.push_response(fixtures::message_response("late", Some("ctx-1"), None));

        let mut invocation = invocation(&registry, "hi");
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let result = tokio::time::timeout(Duration::from_secs(5), invocation.execute(cancel))
            .await
            .expect("execute should return once cancelled");

        result.assert_failure_contains("cancelled");
        assert_eq!(registry.sends().len(), 1);
        assert!(invocation.session().context_id().is_none());
    }

    #[tokio::test]
    async fn test_fresh_token_per_call_after_cancellation() {
        let registry = Arc::new(ScriptedRegistry::new());
        registry.push_response(fixtures::message_response("ok", None, None));

        let mut invocation = invocation(&registry, "hi");
        let cancelled = CancellationToken::new();
        cancelled.cancel();
        invocation.execute(cancelled).await.assert_failure_contains("cancelled");

        invocation
            .execute(CancellationToken::new())
            .await
            .assert_success("ok");
    }

    // ==================== Confirmation ====================

    #[tokio::test]
    async fn test_confirmation_is_info_with_name_and_url() {
        let registry = Arc::new(ScriptedRegistry::new());
        let invocation = invocation(&registry, "hi");

        let details = invocation
            .get_confirmation_details(&CancellationToken::new())
            .await;

        assert!(matches!(details, ConfirmationDetails::Info { .. }));
        assert!(details.title().contains("Test Agent"));
        assert!(details.prompt().contains(TEST_AGENT_URL));
        assert!(registry.sends().is_empty());
        assert!(registry.loads().is_empty());
    }
}
