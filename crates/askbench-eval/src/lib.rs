pub mod dataset;
pub mod logger;
pub mod matcher;
pub mod prompt;
pub mod rephrase;
pub mod runner;
pub mod task;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::dataset::{Dataset, Example, Gold};
    pub use crate::logger::{EvaluationRecord, ResultAggregator, RunLogger, RunSummary};
    pub use crate::matcher::{Verdict, classify};
    pub use crate::prompt::{PromptBuilder, PromptVariant};
    pub use crate::rephrase::RephraseCache;
    pub use crate::runner::{EvalRun, FailurePolicy};
    pub use crate::task::{MatchMode, Task, TaskRegistry};
}
