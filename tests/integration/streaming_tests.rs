//! Streaming integration tests

#[cfg(test)]
mod tests {
    use crate::common::{
        ChatRequestFactory, ChunkedProvider, FlakyProvider, PolicyFactory, TraceAssertions,
    };
    use futures::StreamExt;
    use litellm_dispatch::{
        DispatchState, FailoverDispatcher, ProviderError, RequestContext, StreamError,
    };
    use std::sync::atomic::Ordering;
    use tokio_test::assert_ok;

    #[tokio::test(start_paused = true)]
    async fn test_stream_delivers_all_deltas() {
        let (a, _) = ChunkedProvider::new("openai", vec!["The ", "capital ", "is ", "Paris."])
            .into_handle();
        let dispatcher = FailoverDispatcher::new(vec![a], PolicyFactory::fast(2)).unwrap();

        let stream = assert_ok!(dispatcher.complete_stream(ChatRequestFactory::with_system()).await);
        assert_eq!(stream.trace().final_state(), DispatchState::Committed);

        let text: String = stream
            .map(|item| item.map(|chunk| chunk.delta))
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .collect::<Result<String, _>>()
            .unwrap();
        assert_eq!(text, "The capital is Paris.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_unopenable_stream_fails_over() {
        let (a, a_calls) = FlakyProvider::broken("openai", |p| {
            ProviderError::provider_unavailable(p, "503 Service Unavailable")
        })
        .into_handle();
        let (b, _) = ChunkedProvider::new("anthropic", vec!["Hi"]).into_handle();
        let dispatcher = FailoverDispatcher::new(vec![a, b], PolicyFactory::fast(2)).unwrap();

        let stream = assert_ok!(
            dispatcher
                .dispatch_stream(ChatRequestFactory::simple(), RequestContext::new())
                .await
        );

        assert_eq!(stream.provider_used(), Some("anthropic"));
        assert_eq!(a_calls.load(Ordering::SeqCst), 2);
    }

    /// Once a chunk is delivered, a later error ends the stream without failover
    #[tokio::test(start_paused = true)]
    async fn test_mid_stream_failure_reaches_caller() {
        let (a, a_calls) = ChunkedProvider::new("openai", vec!["one ", "two ", "three"])
            .failing_after(2)
            .into_handle();
        let (b, b_calls) = ChunkedProvider::new("anthropic", vec!["backup"]).into_handle();
        let dispatcher = FailoverDispatcher::new(vec![a, b], PolicyFactory::fast(3)).unwrap();

        let mut stream = assert_ok!(
            dispatcher
                .dispatch_stream(ChatRequestFactory::simple(), RequestContext::new())
                .await
        );
        let items: Vec<_> = stream.by_ref().collect().await;

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_ref().unwrap().delta, "one ");
        assert_eq!(items[1].as_ref().unwrap().delta, "two ");
        assert!(matches!(
            &items[2],
            Err(StreamError::PostCommit(ProviderError::Streaming {
                position: Some(2),
                ..
            }))
        ));
        assert_eq!(a_calls.load(Ordering::SeqCst), 1);
        assert_eq!(b_calls.load(Ordering::SeqCst), 0);

        let trace = stream.trace();
        trace.assert_served_by("openai");
        trace.assert_final_state(DispatchState::FailedPostCommit);
        assert!(trace.attempts()[0].error.is_some());
    }
}
