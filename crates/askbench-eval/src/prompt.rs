use serde::{Deserialize, Serialize};

use askbench_core::error::{DatasetError, Result};
use askbench_core::message::Message;

use crate::dataset::Example;
use crate::task::{MatchMode, Task};

const REPHRASED_DIRECTIVE: &str =
    "Use your answer for the rephrased question to answer the original question.";
const ONE_STEP_DIRECTIVE: &str = "Rephrase and expand the question, and respond.";
const COT_DIRECTIVE: &str = "Let's think step by step.";

/// Which prompting strategy a run exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptVariant {
    Original,
    Rephrased,
    OneStep,
    ZeroShotCot,
}

impl PromptVariant {
    /// Stable name used in log file paths.
    pub fn as_str(self) -> &'static str {
        match self {
            PromptVariant::Original => "original",
            PromptVariant::Rephrased => "rephrased",
            PromptVariant::OneStep => "one_step",
            PromptVariant::ZeroShotCot => "zero_shot_cot",
        }
    }
}

/// Assembles the single user turn for one example. Pure: no I/O, no
/// state beyond the task and variant it was constructed with.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    task: Task,
    variant: PromptVariant,
}

impl PromptBuilder {
    pub fn new(task: Task, variant: PromptVariant) -> Self {
        Self { task, variant }
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    pub fn variant(&self) -> PromptVariant {
        self.variant
    }

    /// Build the message list: exactly one user-authored turn, no prior
    /// assistant turns. `index` is only used for error reporting.
    pub fn build(&self, example: &Example, index: usize) -> Result<Vec<Message>> {
        let mut segments: Vec<String> = Vec::new();

        match self.variant {
            PromptVariant::Rephrased => {
                let refined = example
                    .refined_question()
                    .ok_or(DatasetError::MissingRefinedQuestion { index })?;
                segments.push(format!(
                    "(original) {}\n(rephrased) {}",
                    example.question, refined
                ));
            }
            _ => segments.push(example.question.clone()),
        }

        if matches!(
            self.task.mode,
            MatchMode::MultipleChoice | MatchMode::TriCategory
        ) {
            if let Some(choices) = example.gold.choices() {
                segments.push(format_choices(choices));
            }
        }

        match self.variant {
            PromptVariant::Original => {}
            PromptVariant::Rephrased => segments.push(REPHRASED_DIRECTIVE.into()),
            PromptVariant::OneStep => segments.push(ONE_STEP_DIRECTIVE.into()),
            PromptVariant::ZeroShotCot => segments.push(COT_DIRECTIVE.into()),
        }

        // The step-by-step directive replaces the instruction suffix.
        if self.variant != PromptVariant::ZeroShotCot && !self.task.instruction_suffix.is_empty() {
            segments.push(self.task.instruction_suffix.clone());
        }

        Ok(vec![Message::user(segments.join("\n"))])
    }
}

/// Render the choice list as a lettered line: `Choices: A. x B. y`.
fn format_choices(choices: &[String]) -> String {
    let mut line = String::from("Choices:");
    for (i, choice) in choices.iter().enumerate() {
        line.push(' ');
        line.push((b'A' + (i as u8 % 26)) as char);
        line.push_str(". ");
        line.push_str(choice);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Gold;

    fn answer_example() -> Example {
        Example {
            question: "What is the capital of France?".into(),
            gold: Gold::Answer {
                answer: "Paris".into(),
            },
            refined_question: Some("Which city serves as the capital of France?".into()),
        }
    }

    fn choices_example() -> Example {
        Example {
            question: "Capital of France?".into(),
            gold: Gold::Choices {
                answer: "Paris".into(),
                choices: vec!["Paris".into(), "London".into(), "Berlin".into()],
            },
            refined_question: None,
        }
    }

    fn word_task() -> Task {
        Task::new("sports", MatchMode::Word)
            .with_instruction_suffix("Answer in one word.")
    }

    fn mc_task() -> Task {
        Task::new("csqa", MatchMode::MultipleChoice)
            .with_instruction_suffix("Answer with one of the choices.")
    }

    #[test]
    fn original_variant_is_question_plus_suffix() {
        let builder = PromptBuilder::new(word_task(), PromptVariant::Original);
        let messages = builder.build(&answer_example(), 0).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role(), "user");
        assert_eq!(
            messages[0].content(),
            "What is the capital of France?\nAnswer in one word."
        );
    }

    #[test]
    fn original_variant_without_suffix() {
        let task = Task::new("unknown", MatchMode::Substring);
        let builder = PromptBuilder::new(task, PromptVariant::Original);
        let messages = builder.build(&answer_example(), 0).unwrap();
        assert_eq!(messages[0].content(), "What is the capital of France?");
    }

    #[test]
    fn choices_are_lettered_in_order() {
        let builder = PromptBuilder::new(mc_task(), PromptVariant::Original);
        let messages = builder.build(&choices_example(), 0).unwrap();
        assert_eq!(
            messages[0].content(),
            "Capital of France?\nChoices: A. Paris B. London C. Berlin\nAnswer with one of the choices."
        );
    }

    #[test]
    fn word_mode_never_appends_choices() {
        // A choices-shaped example under a word task keeps choices out of
        // the prompt.
        let builder = PromptBuilder::new(word_task(), PromptVariant::Original);
        let messages = builder.build(&choices_example(), 0).unwrap();
        assert!(!messages[0].content().contains("Choices:"));
    }

    #[test]
    fn rephrased_variant_includes_both_questions_and_directive() {
        let builder = PromptBuilder::new(word_task(), PromptVariant::Rephrased);
        let messages = builder.build(&answer_example(), 0).unwrap();
        let content = messages[0].content();
        assert!(content.starts_with("(original) What is the capital of France?\n"));
        assert!(content.contains("(rephrased) Which city serves as the capital of France?"));
        assert!(content.contains(REPHRASED_DIRECTIVE));
        assert!(content.ends_with("Answer in one word."));
    }

    #[test]
    fn rephrased_variant_requires_refined_question() {
        let builder = PromptBuilder::new(mc_task(), PromptVariant::Rephrased);
        let err = builder.build(&choices_example(), 7).unwrap_err();
        assert!(matches!(
            err,
            askbench_core::error::BenchError::Dataset(
                DatasetError::MissingRefinedQuestion { index: 7 }
            )
        ));
    }

    #[test]
    fn rephrased_variant_rejects_empty_refined_question() {
        let mut example = answer_example();
        example.refined_question = Some(String::new());
        let builder = PromptBuilder::new(word_task(), PromptVariant::Rephrased);
        assert!(builder.build(&example, 0).is_err());
    }

    #[test]
    fn one_step_variant_embeds_inline_directive() {
        let builder = PromptBuilder::new(mc_task(), PromptVariant::OneStep);
        let messages = builder.build(&choices_example(), 0).unwrap();
        assert_eq!(
            messages[0].content(),
            "Capital of France?\nChoices: A. Paris B. London C. Berlin\n\
             Rephrase and expand the question, and respond.\nAnswer with one of the choices."
        );
    }

    #[test]
    fn zero_shot_cot_omits_instruction_suffix() {
        let builder = PromptBuilder::new(mc_task(), PromptVariant::ZeroShotCot);
        let messages = builder.build(&choices_example(), 0).unwrap();
        assert_eq!(
            messages[0].content(),
            "Capital of France?\nChoices: A. Paris B. London C. Berlin\nLet's think step by step."
        );
    }

    #[test]
    fn builder_is_pure() {
        let builder = PromptBuilder::new(mc_task(), PromptVariant::OneStep);
        let example = choices_example();
        let first = builder.build(&example, 0).unwrap();
        let second = builder.build(&example, 0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn variant_as_str() {
        assert_eq!(PromptVariant::Original.as_str(), "original");
        assert_eq!(PromptVariant::Rephrased.as_str(), "rephrased");
        assert_eq!(PromptVariant::OneStep.as_str(), "one_step");
        assert_eq!(PromptVariant::ZeroShotCot.as_str(), "zero_shot_cot");
    }
}
