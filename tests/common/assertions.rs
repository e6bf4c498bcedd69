//! Custom test assertions

use litellm_dispatch::{DispatchState, ExecutionTrace};

/// Assertions for execution traces
pub trait TraceAssertions {
    /// Assert the call was served by `provider`
    fn assert_served_by(&self, provider: &str);

    /// Assert attempt numbers restart at 1 and increase by one per provider
    fn assert_attempt_numbering(&self);

    /// Assert the dispatch ended in `state`
    fn assert_final_state(&self, state: DispatchState);
}

impl TraceAssertions for ExecutionTrace {
    fn assert_served_by(&self, provider: &str) {
        assert_eq!(
            self.provider_used(),
            Some(provider),
            "Expected call to be served by {}, trace: {:?}",
            provider,
            self
        );
    }

    fn assert_attempt_numbering(&self) {
        for provider in self.providers_tried() {
            let numbers: Vec<u32> = self
                .attempts_for(provider)
                .map(|record| record.attempt_number)
                .collect();
            let expected: Vec<u32> = (1..=numbers.len() as u32).collect();
            assert_eq!(
                numbers, expected,
                "Attempt numbers for {} are not 1..n",
                provider
            );
        }
    }

    fn assert_final_state(&self, state: DispatchState) {
        assert_eq!(self.final_state(), state);
        assert!(state.is_terminal(), "{:?} is not terminal", state);
    }
}
