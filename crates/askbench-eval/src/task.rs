use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// How a response is matched against gold data. Declared once per task
/// instead of being inferred at each call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    Substring,
    Word,
    MultipleChoice,
    TriCategory,
}

/// A benchmark task: a free-text instruction suffix appended to prompts,
/// and the declared matching mode. Immutable once registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub instruction_suffix: String,
    pub mode: MatchMode,
}

impl Task {
    pub fn new(id: impl Into<String>, mode: MatchMode) -> Self {
        Self {
            id: id.into(),
            instruction_suffix: String::new(),
            mode,
        }
    }

    pub fn with_instruction_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.instruction_suffix = suffix.into();
        self
    }
}

/// Maps task identifiers to tasks. Lookup has no side effects; unknown
/// ids resolve to an empty instruction suffix and substring matching.
#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    tasks: HashMap<String, Task>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with the known task ids and their matching modes.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for id in [
            "birthdate_day",
            "birthdate_month",
            "birthdate_year",
            "birthdate_earlier",
            "coin_val",
            "last_letter_concatenation",
            "last_letter_concatenation4",
            "sports",
        ] {
            registry.register(Task::new(id, MatchMode::Word));
        }
        registry.register(Task::new("date", MatchMode::Substring));
        registry.register(Task::new("csqa", MatchMode::MultipleChoice));
        registry.register(Task::new("stereo", MatchMode::TriCategory));
        registry
    }

    pub fn register(&mut self, task: Task) {
        self.tasks.insert(task.id.clone(), task);
    }

    /// Merge instruction suffixes loaded from the instruction-registry
    /// file. Ids not already registered are added with substring matching.
    pub fn with_instructions(mut self, instructions: &HashMap<String, String>) -> Self {
        for (id, suffix) in instructions {
            match self.tasks.get_mut(id) {
                Some(task) => task.instruction_suffix = suffix.clone(),
                None => {
                    self.register(
                        Task::new(id.clone(), MatchMode::Substring)
                            .with_instruction_suffix(suffix.clone()),
                    );
                }
            }
        }
        self
    }

    pub fn lookup(&self, task_id: &str) -> Task {
        self.tasks
            .get(task_id)
            .cloned()
            .unwrap_or_else(|| Task::new(task_id, MatchMode::Substring))
    }
}
