//! Configuration-to-dispatcher integration tests

#[cfg(test)]
mod tests {
    use crate::common::{ChatRequestFactory, FlakyProvider};
    use litellm_dispatch::{
        ClientError, DispatchConfig, FailoverDispatcher, ProviderError, ProviderRegistry,
    };
    use std::io::Write;
    use std::time::Duration;
    use tokio_test::{assert_err, assert_ok};

    const CONFIG: &str = r#"
providers:
  - anthropic
  - openai
retry:
  max_attempts: 2
  base_delay_ms: 5
  max_delay_ms: 50
  jitter: full
"#;

    fn registry() -> ProviderRegistry {
        let registry = ProviderRegistry::new();
        registry.register(FlakyProvider::healthy("openai").into_handle().0);
        registry.register(
            FlakyProvider::broken("anthropic", |p| ProviderError::timeout(p, "read timeout"))
                .into_handle()
                .0,
        );
        registry.register(FlakyProvider::healthy("groq").into_handle().0);
        registry
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispatcher_from_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CONFIG.as_bytes()).unwrap();

        let config = assert_ok!(DispatchConfig::from_file(file.path()).await);
        let dispatcher = assert_ok!(FailoverDispatcher::from_config(&config, &registry()));

        let ids: Vec<&str> = dispatcher.providers().iter().map(|h| h.id()).collect();
        assert_eq!(ids, config.providers.iter().map(String::as_str).collect::<Vec<_>>());

        if config.providers == ["anthropic", "openai"] {
            let response = assert_ok!(dispatcher.complete(ChatRequestFactory::simple()).await);
            assert_eq!(response.content, "answer from openai");
            assert_eq!(dispatcher.policy().max_delay, Duration::from_millis(50));
        }
    }

    #[test]
    fn test_unknown_provider_in_config() {
        let config = assert_ok!(DispatchConfig::from_yaml_str(
            "providers: [openai, mistral]\n"
        ));
        let err = assert_err!(FailoverDispatcher::from_config(&config, &registry()));
        assert!(matches!(err, ClientError::UnknownProvider(ref name) if name == "mistral"));
    }

    #[test]
    fn test_invalid_config_rejected_before_resolution() {
        let config = assert_ok!(DispatchConfig::from_yaml_str(
            "providers: [openai, openai]\n"
        ));
        let err = assert_err!(FailoverDispatcher::from_config(&config, &registry()));
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispatch_error_converts_into_client_error() {
        let config = assert_ok!(DispatchConfig::from_yaml_str("providers: [anthropic]\n"));
        let dispatcher = assert_ok!(FailoverDispatcher::from_config(&config, &registry()));

        let result: Result<_, ClientError> = dispatcher
            .complete(ChatRequestFactory::simple())
            .await
            .map_err(ClientError::from);

        let err = assert_err!(result);
        assert!(err.is_dispatch());
    }
}
