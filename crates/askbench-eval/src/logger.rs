use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use askbench_core::error::Result;

use crate::dataset::{Example, Gold};
use crate::matcher::Verdict;
use crate::task::MatchMode;

/// One line of the run logs. Created once per example per run and never
/// mutated afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub question: String,
    #[serde(flatten)]
    pub gold: Gold,
    pub response: String,
    pub verdict: Verdict,
}

/// Per-verdict counts for one run. Lives for the run and is only printed
/// at the end.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    counts: HashMap<Verdict, usize>,
}

impl RunSummary {
    pub fn increment(&mut self, verdict: Verdict) {
        *self.counts.entry(verdict).or_insert(0) += 1;
    }

    pub fn count(&self, verdict: Verdict) -> usize {
        self.counts.get(&verdict).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Fraction correct among classified binary verdicts.
    pub fn accuracy(&self) -> f64 {
        let correct = self.count(Verdict::Correct);
        let classified = correct + self.count(Verdict::Incorrect);
        if classified == 0 {
            0.0
        } else {
            correct as f64 / classified as f64
        }
    }

    /// The console summary line: accuracy for binary modes, category
    /// counts for tri-category.
    pub fn render(&self, mode: MatchMode) -> String {
        match mode {
            MatchMode::TriCategory => format!(
                "stereo: {} anti_stereo: {} unrelated: {} undetermined: {}",
                self.count(Verdict::Stereo),
                self.count(Verdict::AntiStereo),
                self.count(Verdict::Unrelated),
                self.count(Verdict::Undetermined),
            ),
            _ => format!("Accuracy: {}", self.accuracy()),
        }
    }
}

/// Append-only JSONL writers for the response log and the wrong/category
/// log. Write failures are fatal for the run and are not retried.
#[derive(Debug)]
pub struct RunLogger {
    response_log: File,
    wrong_log: File,
}

impl RunLogger {
    pub fn create(
        response_path: impl AsRef<Path>,
        wrong_path: impl AsRef<Path>,
    ) -> Result<Self> {
        Ok(Self {
            response_log: append_handle(response_path)?,
            wrong_log: append_handle(wrong_path)?,
        })
    }

    /// Append the record to the response log and, unless its verdict is
    /// the dominant one, to the wrong/category log.
    pub fn append(&mut self, record: &EvaluationRecord, dominant: Verdict) -> Result<()> {
        let line = serde_json::to_string(record)?;
        writeln!(self.response_log, "{line}")?;
        if record.verdict != dominant {
            writeln!(self.wrong_log, "{line}")?;
        }
        Ok(())
    }
}

fn append_handle(path: impl AsRef<Path>) -> Result<File> {
    Ok(OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?)
}

/// Accumulates verdicts and writes the per-example logs. Owned by the
/// single processing thread; there is no concurrent access.
pub struct ResultAggregator {
    logger: RunLogger,
    summary: RunSummary,
    mode: MatchMode,
}

impl ResultAggregator {
    pub fn new(logger: RunLogger, mode: MatchMode) -> Self {
        Self {
            logger,
            summary: RunSummary::default(),
            mode,
        }
    }

    /// The verdict that stays out of the wrong/category log.
    fn dominant(&self) -> Verdict {
        match self.mode {
            MatchMode::TriCategory => Verdict::Stereo,
            _ => Verdict::Correct,
        }
    }

    pub fn record(
        &mut self,
        example: &Example,
        response: &str,
        verdict: Verdict,
    ) -> Result<()> {
        self.summary.increment(verdict);
        let record = EvaluationRecord {
            question: example.question.clone(),
            gold: example.gold.clone(),
            response: response.into(),
            verdict,
        };
        self.logger.append(&record, self.dominant())
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    pub fn finish(self) -> RunSummary {
        self.summary
    }
}
