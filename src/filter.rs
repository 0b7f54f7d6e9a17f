//! Filter modes and the pure selector that derives the visible task list.

use clap::ValueEnum;

use crate::task::Task;

/// Which subset of tasks to display. Session state only, never persisted.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum FilterMode {
    #[default]
    All,
    Completed,
    Pending,
}

impl FilterMode {
    /// Every mode, in display order.
    pub const ALL: [FilterMode; 3] = [FilterMode::All, FilterMode::Completed, FilterMode::Pending];

    /// Whether `task` belongs to this mode's subset.
    pub fn matches(self, task: &Task) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::Completed => task.completed,
            FilterMode::Pending => !task.completed,
        }
    }

    /// Cycle All -> Completed -> Pending -> All.
    pub fn next(self) -> Self {
        match self {
            FilterMode::All => FilterMode::Completed,
            FilterMode::Completed => FilterMode::Pending,
            FilterMode::Pending => FilterMode::All,
        }
    }

    /// Reverse of [`FilterMode::next`].
    pub fn prev(self) -> Self {
        match self {
            FilterMode::All => FilterMode::Pending,
            FilterMode::Completed => FilterMode::All,
            FilterMode::Pending => FilterMode::Completed,
        }
    }

    /// Capitalised display name.
    pub fn label(self) -> &'static str {
        match self {
            FilterMode::All => "All",
            FilterMode::Completed => "Completed",
            FilterMode::Pending => "Pending",
        }
    }
}

/// Select the tasks matching `mode`, preserving source order.
pub fn select(tasks: &[Task], mode: FilterMode) -> Vec<&Task> {
    tasks.iter().filter(|t| mode.matches(t)).collect()
}

/// Totals shown in the status bar and CLI summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

/// Count tasks by completion state.
pub fn counts(tasks: &[Task]) -> TaskCounts {
    let completed = tasks.iter().filter(|t| t.completed).count();
    TaskCounts {
        total: tasks.len(),
        completed,
        pending: tasks.len() - completed,
    }
}
