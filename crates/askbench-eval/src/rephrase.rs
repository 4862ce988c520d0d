use std::path::Path;

use askbench_core::error::Result;
use askbench_core::message::Message;
use askbench_llm::resilient::ResilientClient;

use crate::dataset::Dataset;

const REPHRASE_INSTRUCTION: &str = "Given the above question, rephrase and expand it to help \
you do better answering. Maintain all information in the original question.";

/// Offline pass that augments each example with a model-produced
/// rephrasing of its question. The sole writer of `refined_question`.
pub struct RephraseCache<'a> {
    client: &'a ResilientClient,
}

impl<'a> RephraseCache<'a> {
    pub fn new(client: &'a ResilientClient) -> Self {
        Self { client }
    }

    /// Rephrase every question, writing the results in place. Existing
    /// refinements are overwritten with a warning.
    pub async fn refine(&self, dataset: &mut Dataset) -> Result<()> {
        if dataset
            .examples
            .iter()
            .any(|e| e.refined_question().is_some())
        {
            tracing::warn!("overwriting existing refined questions");
        }

        for example in &mut dataset.examples {
            let prompt = format!("\"{}\"\n{REPHRASE_INSTRUCTION}", example.question);
            let response = self.client.invoke(&[Message::user(prompt)]).await?;
            example.refined_question = Some(strip_wrapping_quotes(&response).to_string());
        }
        Ok(())
    }

    /// Refine, then persist the whole augmented collection in one write.
    /// A crash mid-pass loses partial progress.
    pub async fn refine_and_persist(
        &self,
        dataset: &mut Dataset,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        self.refine(dataset).await?;
        dataset.save(path)
    }
}

/// Strip exactly one leading and one trailing quote character when both
/// are present and match.
fn strip_wrapping_quotes(text: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = text
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    text
}
