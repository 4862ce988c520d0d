use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use askbench_core::error::{BenchError, Result};
use askbench_eval::dataset::Dataset;
use askbench_eval::logger::{ResultAggregator, RunLogger};
use askbench_eval::prompt::PromptVariant;
use askbench_eval::rephrase::RephraseCache;
use askbench_eval::runner::{EvalRun, FailurePolicy};
use askbench_eval::task::TaskRegistry;
use askbench_llm::openai::OpenAiChatModel;
use askbench_llm::resilient::ResilientClient;
use askbench_llm::retry::RetryPolicy;

/// Benchmark a chat model's answer robustness across prompting variants.
#[derive(Debug, Parser)]
#[command(name = "askbench")]
struct Args {
    /// Task identifier (selects the dataset, instruction suffix, and
    /// matching mode).
    #[arg(long)]
    task: String,

    /// Prompting variant to evaluate.
    #[arg(long, value_enum, default_value_t = VariantArg::Original)]
    question: VariantArg,

    /// Refresh the cached rephrasings before evaluating.
    #[arg(long)]
    new_rephrase: bool,

    /// Model identifier passed to the chat endpoint.
    #[arg(long, default_value = "gpt-4")]
    model: String,

    /// Directory holding the dataset files.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Directory receiving the run logs.
    #[arg(long, default_value = "log")]
    log_dir: PathBuf,

    /// Instruction registry file (task id -> instruction suffix).
    #[arg(long, default_value = "config.json")]
    instructions: PathBuf,

    /// What retry exhaustion on a single example does to the run.
    #[arg(long, value_enum, default_value_t = FailureArg::Abort)]
    on_failure: FailureArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VariantArg {
    Original,
    Rephrased,
    OneStep,
    ZeroShotCot,
}

impl From<VariantArg> for PromptVariant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Original => PromptVariant::Original,
            VariantArg::Rephrased => PromptVariant::Rephrased,
            VariantArg::OneStep => PromptVariant::OneStep,
            VariantArg::ZeroShotCot => PromptVariant::ZeroShotCot,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FailureArg {
    Abort,
    Skip,
}

impl From<FailureArg> for FailurePolicy {
    fn from(arg: FailureArg) -> Self {
        match arg {
            FailureArg::Abort => FailurePolicy::Abort,
            FailureArg::Skip => FailurePolicy::Skip,
        }
    }
}

fn load_instructions(path: &PathBuf) -> Result<HashMap<String, String>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "askbench=info".into()),
        )
        .init();

    let args = Args::parse();
    let variant = PromptVariant::from(args.question);

    let instructions = load_instructions(&args.instructions)?;
    let registry = TaskRegistry::builtin().with_instructions(&instructions);
    let task = registry.lookup(&args.task);

    let api_key = std::env::var("OPENAI_API_KEY")
        .map_err(|_| BenchError::Other("OPENAI_API_KEY is not set".into()))?;
    let model = OpenAiChatModel::new(api_key, args.model.clone());
    let client = ResilientClient::new(Arc::new(model), RetryPolicy::default());

    let dataset_path = args
        .data_dir
        .join(format!("{}_{}.json", task.id, args.model));
    let mut dataset = Dataset::load(&dataset_path)?;
    tracing::info!(path = %dataset_path.display(), examples = dataset.len(), "dataset loaded");

    if args.new_rephrase {
        RephraseCache::new(&client)
            .refine_and_persist(&mut dataset, &dataset_path)
            .await?;
        tracing::info!("rephrase pass persisted");
    }

    std::fs::create_dir_all(&args.log_dir)?;
    let response_path = args
        .log_dir
        .join(format!("{}_{}_response.jsonl", task.id, variant.as_str()));
    let wrong_path = args
        .log_dir
        .join(format!("{}_{}_wrong.jsonl", task.id, variant.as_str()));
    let logger = RunLogger::create(response_path, wrong_path)?;
    let aggregator = ResultAggregator::new(logger, task.mode);

    let mode = task.mode;
    let run = EvalRun::new(task, variant).with_failure_policy(args.on_failure.into());
    let summary = run.run(&dataset, &client, aggregator).await?;

    println!("{}", summary.render(mode));
    Ok(())
}
