//! Failover integration tests

#[cfg(test)]
mod tests {
    use crate::common::{ChatRequestFactory, FlakyProvider, PolicyFactory, TraceAssertions};
    use litellm_dispatch::{
        DispatchError, DispatchState, FailoverDispatcher, ProviderError, RequestContext,
    };
    use std::sync::atomic::Ordering;
    use tokio_test::{assert_err, assert_ok};

    fn rate_limited(provider: &'static str) -> ProviderError {
        ProviderError::rate_limit(provider, None)
    }

    fn bad_gateway(provider: &'static str) -> ProviderError {
        ProviderError::api_error(provider, 502, "Bad Gateway")
    }

    /// A provider recovering within its budget is not failed over
    #[tokio::test(start_paused = true)]
    async fn test_recovers_within_retry_budget() {
        let (primary, primary_calls) = FlakyProvider::new("openai", 2, bad_gateway).into_handle();
        let (backup, backup_calls) = FlakyProvider::healthy("anthropic").into_handle();
        let dispatcher =
            FailoverDispatcher::new(vec![primary, backup], PolicyFactory::fast(3)).unwrap();

        let outcome = assert_ok!(
            dispatcher
                .dispatch(ChatRequestFactory::with_system(), RequestContext::new())
                .await
        );

        assert_eq!(outcome.response.content, "answer from openai");
        assert_eq!(primary_calls.load(Ordering::SeqCst), 3);
        assert_eq!(backup_calls.load(Ordering::SeqCst), 0);
        outcome.trace.assert_served_by("openai");
        outcome.trace.assert_attempt_numbering();
        outcome.trace.assert_final_state(DispatchState::Succeeded);
        assert!(!outcome.trace.used_fallback());
    }

    /// Providers are tried strictly in order and the first healthy one wins
    #[tokio::test(start_paused = true)]
    async fn test_fails_over_in_configured_order() {
        let (a, a_calls) = FlakyProvider::broken("openai", rate_limited).into_handle();
        let (b, b_calls) = FlakyProvider::healthy("anthropic").into_handle();
        let (c, c_calls) = FlakyProvider::healthy("groq").into_handle();
        let dispatcher = FailoverDispatcher::new(vec![a, b, c], PolicyFactory::fast(3)).unwrap();

        let outcome = assert_ok!(
            dispatcher
                .dispatch(ChatRequestFactory::simple(), RequestContext::new())
                .await
        );

        outcome.trace.assert_served_by("anthropic");
        outcome.trace.assert_attempt_numbering();
        assert_eq!(outcome.trace.providers_tried(), vec!["openai", "anthropic"]);
        assert!(outcome.trace.used_fallback());
        assert_eq!(a_calls.load(Ordering::SeqCst), 3);
        assert_eq!(b_calls.load(Ordering::SeqCst), 1);
        assert_eq!(c_calls.load(Ordering::SeqCst), 0);
        assert!(outcome.trace.elapsed() > std::time::Duration::ZERO);
    }

    /// Total failure reports each provider once, in order
    #[tokio::test(start_paused = true)]
    async fn test_total_failure_is_aggregated() {
        let (a, _) = FlakyProvider::broken("openai", rate_limited).into_handle();
        let (b, _) = FlakyProvider::broken("anthropic", bad_gateway).into_handle();
        let dispatcher = FailoverDispatcher::new(vec![a, b], PolicyFactory::fast(2)).unwrap();

        let err = assert_err!(dispatcher.complete(ChatRequestFactory::simple()).await);

        match &err {
            DispatchError::AllProvidersFailed(failure) => {
                assert_eq!(failure.provider_ids(), vec!["openai", "anthropic"]);
                assert!(matches!(
                    failure.error_for("openai"),
                    Some(ProviderError::RateLimit { .. })
                ));
                assert!(matches!(
                    failure.error_for("anthropic"),
                    Some(ProviderError::ApiError { status: 502, .. })
                ));
            }
            other => panic!("expected aggregated failure, got {other:?}"),
        }
        err.trace().assert_final_state(DispatchState::FailedAll);
        err.trace().assert_attempt_numbering();
    }

    /// A fatal error surfaces unwrapped and stops the dispatch
    #[tokio::test(start_paused = true)]
    async fn test_fatal_error_surfaces_unwrapped() {
        let (a, _) = FlakyProvider::new("openai", 1, |p| {
            ProviderError::context_length_exceeded(p, 128_000, 200_000)
        })
        .into_handle();
        let (b, b_calls) = FlakyProvider::healthy("anthropic").into_handle();
        let dispatcher = FailoverDispatcher::new(vec![a, b], PolicyFactory::fast(3)).unwrap();

        let err = assert_err!(dispatcher.complete(ChatRequestFactory::simple()).await);

        let original = assert_ok!(err.into_fatal_error().ok_or("not fatal"));
        assert!(matches!(
            original,
            ProviderError::ContextLengthExceeded {
                max: 128_000,
                actual: 200_000,
                ..
            }
        ));
        assert_eq!(b_calls.load(Ordering::SeqCst), 0);
    }

    /// A dispatcher can be shared across tasks
    #[tokio::test(start_paused = true)]
    async fn test_shared_dispatcher_across_tasks() {
        let (a, a_calls) = FlakyProvider::healthy("openai").into_handle();
        let dispatcher = FailoverDispatcher::new(vec![a], PolicyFactory::fast(1)).unwrap();

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let dispatcher = dispatcher.clone();
                tokio::spawn(async move { dispatcher.complete(ChatRequestFactory::simple()).await })
            })
            .collect();

        for task in tasks {
            let response = assert_ok!(assert_ok!(task.await));
            assert_eq!(response.content, "answer from openai");
        }
        assert_eq!(a_calls.load(Ordering::SeqCst), 8);
    }
}
