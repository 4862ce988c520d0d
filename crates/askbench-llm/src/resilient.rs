use std::sync::Arc;

use tokio::time::sleep;

use askbench_core::error::{BenchError, ModelError, Result};
use askbench_core::message::Message;
use askbench_core::model::ChatModel;

use crate::retry::RetryPolicy;

/// Wraps a [`ChatModel`] with bounded retries and the courtesy delay.
///
/// Each `invoke` is one logical exchange. Model errors are retried with
/// randomized exponential backoff up to the policy's attempt ceiling;
/// exhaustion surfaces as [`ModelError::RetriesExhausted`], which aborts
/// the run unless the caller opted into skipping.
pub struct ResilientClient {
    model: Arc<dyn ChatModel>,
    policy: RetryPolicy,
}

impl ResilientClient {
    pub fn new(model: Arc<dyn ChatModel>, policy: RetryPolicy) -> Self {
        Self { model, policy }
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn invoke(&self, messages: &[Message]) -> Result<String> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.model.generate(messages).await {
                Ok(text) => {
                    // Fixed pause after every exchange to respect endpoint
                    // rate limits.
                    sleep(self.policy.courtesy_delay).await;
                    return Ok(text);
                }
                Err(BenchError::Model(err)) if attempt < self.policy.max_attempts => {
                    let delay = self.policy.backoff_delay(attempt);
                    tracing::warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "model call failed, retrying"
                    );
                    sleep(delay).await;
                }
                Err(BenchError::Model(err)) => {
                    return Err(BenchError::Model(ModelError::RetriesExhausted {
                        attempts: attempt,
                        last_error: err.to_string(),
                    }));
                }
                Err(other) => return Err(other),
            }
        }
    }
}
