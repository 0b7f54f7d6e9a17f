//! Session state handed to the presentation layer.
//!
//! A `Session` bundles the task store, the preference store and the current
//! filter mode. The TUI and CLI hold it by `&mut` and call its methods; none
//! of the mutations wait for persistence.

use std::sync::Arc;

use crate::filter::{counts, select, FilterMode, TaskCounts};
use crate::preferences::PreferenceStore;
use crate::storage::KeyValueStore;
use crate::task::Task;
use crate::task_store::TaskStore;

/// Owned copy of everything a view needs to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub tasks: Vec<Task>,
    pub filter: FilterMode,
    pub dark_mode: bool,
}

pub struct Session {
    tasks: TaskStore,
    prefs: PreferenceStore,
    filter: FilterMode,
}

impl Session {
    /// Load both stores from `store`. The filter always starts at `All`.
    pub fn open(store: Arc<dyn KeyValueStore>) -> Self {
        Session {
            tasks: TaskStore::load(store.clone()),
            prefs: PreferenceStore::load(store),
            filter: FilterMode::All,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            tasks: self.tasks.tasks().to_vec(),
            filter: self.filter,
            dark_mode: self.prefs.dark_mode(),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.tasks()
    }

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    pub fn dark_mode(&self) -> bool {
        self.prefs.dark_mode()
    }

    /// Tasks matching the current filter, in insertion order.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        select(self.tasks.tasks(), self.filter)
    }

    pub fn counts(&self) -> TaskCounts {
        counts(self.tasks.tasks())
    }

    pub fn add_task(&mut self, title: &str) -> Option<String> {
        self.tasks.add(title)
    }

    pub fn toggle_task(&mut self, id: &str) -> Option<bool> {
        self.tasks.toggle(id)
    }

    pub fn delete_task(&mut self, id: &str) -> Option<Task> {
        self.tasks.delete(id)
    }

    pub fn set_filter(&mut self, mode: FilterMode) {
        self.filter = mode;
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        self.prefs.toggle()
    }

    /// Wait for all queued writes of both stores.
    pub fn flush(&self) {
        self.tasks.flush();
        self.prefs.flush();
    }
}
