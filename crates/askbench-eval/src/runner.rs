use serde::{Deserialize, Serialize};

use askbench_core::error::{BenchError, ModelError, Result};
use askbench_llm::resilient::ResilientClient;

use crate::dataset::Dataset;
use crate::logger::{ResultAggregator, RunSummary};
use crate::matcher::classify;
use crate::prompt::{PromptBuilder, PromptVariant};
use crate::task::Task;

/// What retry exhaustion on a single example does to the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Abort the whole run (default).
    #[default]
    Abort,
    /// Log a warning and continue with the next example, recording no
    /// verdict for it.
    Skip,
}

/// One evaluation run over a dataset: prompt construction, model
/// invocation, classification, and logging, strictly in input order.
pub struct EvalRun {
    builder: PromptBuilder,
    failure_policy: FailurePolicy,
}

impl EvalRun {
    pub fn new(task: Task, variant: PromptVariant) -> Self {
        Self {
            builder: PromptBuilder::new(task, variant),
            failure_policy: FailurePolicy::default(),
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn task(&self) -> &Task {
        self.builder.task()
    }

    /// Validate the dataset, then process every example sequentially.
    /// Configuration errors surface before the first model call.
    pub async fn run(
        &self,
        dataset: &Dataset,
        client: &ResilientClient,
        mut aggregator: ResultAggregator,
    ) -> Result<RunSummary> {
        let task = self.builder.task();
        dataset.validate(task.mode, self.builder.variant())?;

        tracing::info!(
            task = %task.id,
            variant = self.builder.variant().as_str(),
            model = client.model_name(),
            examples = dataset.len(),
            "starting evaluation run"
        );

        for (index, example) in dataset.examples.iter().enumerate() {
            let messages = self.builder.build(example, index)?;
            let response = match client.invoke(&messages).await {
                Ok(response) => response,
                Err(BenchError::Model(ModelError::RetriesExhausted {
                    attempts,
                    last_error,
                })) if self.failure_policy == FailurePolicy::Skip => {
                    tracing::warn!(
                        index,
                        attempts,
                        error = %last_error,
                        "retries exhausted, skipping example"
                    );
                    continue;
                }
                Err(err) => return Err(err),
            };
            let verdict = classify(&example.gold, &response, task.mode);
            tracing::debug!(index, verdict = %verdict, "classified response");
            aggregator.record(example, &response, verdict)?;
        }

        Ok(aggregator.finish())
    }
}
