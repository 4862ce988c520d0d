use std::path::Path;

use serde::{Deserialize, Serialize};

use askbench_core::error::{DatasetError, Result};

use crate::prompt::PromptVariant;
use crate::task::MatchMode;

/// Gold data for one example.
///
/// The on-disk shape is flat, so the variants are distinguished by which
/// fields are present. Untagged order matters: most specific first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Gold {
    /// Stereotype classification: the three canonical phrases, plus the
    /// candidate sentences shown to the model.
    TriCategory {
        stereo: String,
        anti_stereo: String,
        unrelated: String,
        choices: Vec<String>,
    },
    /// Answer plus the full choice list shown to the model.
    Choices {
        answer: String,
        choices: Vec<String>,
    },
    /// Free-text answer.
    Answer { answer: String },
}

impl Gold {
    /// The expected answer text, for the answer-bearing shapes.
    pub fn answer(&self) -> Option<&str> {
        match self {
            Gold::Answer { answer } | Gold::Choices { answer, .. } => Some(answer),
            Gold::TriCategory { .. } => None,
        }
    }

    /// The choice list, for the shapes that carry one.
    pub fn choices(&self) -> Option<&[String]> {
        match self {
            Gold::Choices { choices, .. } | Gold::TriCategory { choices, .. } => Some(choices),
            Gold::Answer { .. } => None,
        }
    }
}

/// A single benchmark example. `refined_question` is written only by the
/// rephrase pass; everything else is read-only input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub question: String,
    #[serde(flatten)]
    pub gold: Gold,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refined_question: Option<String>,
}

impl Example {
    /// The refined question, if present and non-empty.
    pub fn refined_question(&self) -> Option<&str> {
        self.refined_question.as_deref().filter(|r| !r.is_empty())
    }
}

/// An ordered collection of examples, stored on disk as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    pub examples: Vec<Example>,
}

impl Dataset {
    pub fn new(examples: Vec<Example>) -> Self {
        Self { examples }
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Reject configuration errors before any model call is made.
    ///
    /// Checks every example: the gold shape must fit the matching mode,
    /// gold answer and category phrases must be non-empty, and under the
    /// rephrased variant every example must already carry a non-empty
    /// refined question.
    pub fn validate(&self, mode: MatchMode, variant: PromptVariant) -> Result<()> {
        for (index, example) in self.examples.iter().enumerate() {
            match (&example.gold, mode) {
                (Gold::Answer { answer }, MatchMode::Substring | MatchMode::Word)
                | (Gold::Choices { answer, .. }, MatchMode::Substring | MatchMode::Word) => {
                    if answer.is_empty() {
                        return Err(DatasetError::EmptyGoldAnswer { index }.into());
                    }
                }
                (Gold::Choices { answer, choices }, MatchMode::MultipleChoice) => {
                    if answer.is_empty() || choices.iter().any(|c| c.is_empty()) {
                        return Err(DatasetError::EmptyGoldAnswer { index }.into());
                    }
                }
                (
                    Gold::TriCategory {
                        stereo,
                        anti_stereo,
                        unrelated,
                        ..
                    },
                    MatchMode::TriCategory,
                ) => {
                    if stereo.is_empty() || anti_stereo.is_empty() || unrelated.is_empty() {
                        return Err(DatasetError::EmptyGoldAnswer { index }.into());
                    }
                }
                (gold, mode) => {
                    return Err(DatasetError::Malformed {
                        index,
                        reason: format!("gold shape {gold:?} does not fit matching mode {mode:?}"),
                    }
                    .into());
                }
            }
            if variant == PromptVariant::Rephrased && example.refined_question().is_none() {
                return Err(DatasetError::MissingRefinedQuestion { index }.into());
            }
        }
        Ok(())
    }
}
