//! Task data structure and id generation.
//!
//! A `Task` is deliberately minimal: an immutable id, a trimmed title and a
//! completion flag. The serialized field names match the stored `tasks` key.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Build a pending task. The caller is responsible for trimming `title`.
    pub fn new(id: String, title: &str) -> Self {
        Task {
            id,
            title: title.to_string(),
            completed: false,
        }
    }
}

/// Issues millisecond-timestamp ids that never repeat within a collection.
///
/// Each id is `max(now_ms, last + 1)`, so two tasks created within the same
/// millisecond still get distinct, increasing ids.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    /// Seed the generator past every numeric id already in `tasks`.
    pub fn seeded(tasks: &[Task]) -> Self {
        let last = tasks
            .iter()
            .filter_map(|t| t.id.parse::<i64>().ok())
            .max()
            .unwrap_or(0);
        IdGenerator { last }
    }

    /// Next id, skipping any value already present in `existing`.
    pub fn next_id(&mut self, existing: &[Task]) -> String {
        self.next_at(Utc::now().timestamp_millis(), existing)
    }

    fn next_at(&mut self, now_ms: i64, existing: &[Task]) -> String {
        let taken = |id: &str| existing.iter().any(|t| t.id == id);
        let mut candidate = now_ms.max(self.last.saturating_add(1));
        // Legacy ids may be numeric strings that are not ordered with ours.
        while taken(&candidate.to_string()) {
            match candidate.checked_add(1) {
                Some(next) => candidate = next,
                None => return suffixed_id(candidate, taken),
            }
        }
        self.last = candidate;
        candidate.to_string()
    }
}

/// Numeric space above `base` is exhausted; fall back to `<base>-<n>`.
fn suffixed_id(base: i64, taken: impl Fn(&str) -> bool) -> String {
    (1u64..)
        .map(|n| format!("{base}-{n}"))
        .find(|id| !taken(id))
        .unwrap_or_else(|| base.to_string())
}
