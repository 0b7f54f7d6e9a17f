//! In-memory task collection with write-through persistence.
//!
//! The `TaskStore` is the only writer of the collection. Every mutation
//! updates memory first and then queues the full collection for the `tasks`
//! key; persistence failures are logged and never roll memory back.

use std::sync::Arc;

use log::{error, info, warn};

use crate::storage::{KeyValueStore, TASKS_KEY};
use crate::task::{IdGenerator, Task};
use crate::writer::KeyWriter;

/// Source of truth for the task list during a session.
pub struct TaskStore {
    tasks: Vec<Task>,
    ids: IdGenerator,
    writer: KeyWriter,
}

impl TaskStore {
    /// Hydrate from `store`. Absent or unreadable data yields an empty list.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let tasks = read_tasks(store.as_ref());
        info!("event=tasks_load status=ok count={}", tasks.len());
        TaskStore {
            ids: IdGenerator::seeded(&tasks),
            tasks,
            writer: KeyWriter::spawn(store, TASKS_KEY),
        }
    }

    /// All tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Append a new pending task. Blank titles are ignored.
    ///
    /// Returns the id of the created task.
    pub fn add(&mut self, title: &str) -> Option<String> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        let id = self.ids.next_id(&self.tasks);
        self.tasks.push(Task::new(id.clone(), title));
        info!("event=task_add id={}", id);
        self.persist();
        Some(id)
    }

    /// Flip the completion flag of task `id`.
    ///
    /// Returns the new flag, or `None` when no task matches.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.completed = !task.completed;
        let completed = task.completed;
        info!("event=task_toggle id={} completed={}", id, completed);
        self.persist();
        Some(completed)
    }

    /// Remove task `id`, returning it if it existed.
    pub fn delete(&mut self, id: &str) -> Option<Task> {
        let idx = self.tasks.iter().position(|t| t.id == id)?;
        let removed = self.tasks.remove(idx);
        info!("event=task_delete id={}", id);
        self.persist();
        Some(removed)
    }

    /// Queue the full collection for writing under `tasks`.
    pub fn persist(&self) {
        match serde_json::to_string(&self.tasks) {
            Ok(json) => self.writer.submit(json),
            Err(e) => error!("event=persist status=error key={} error={}", TASKS_KEY, e),
        }
    }

    /// Wait for queued writes to finish.
    pub fn flush(&self) {
        self.writer.flush();
    }
}

fn read_tasks(store: &dyn KeyValueStore) -> Vec<Task> {
    let raw = match store.get(TASKS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            error!("event=tasks_load status=error error={}", e);
            return Vec::new();
        }
    };
    let tasks: Vec<Task> = match serde_json::from_str(&raw) {
        Ok(tasks) => tasks,
        Err(e) => {
            warn!("event=tasks_load status=corrupt error={}", e);
            return Vec::new();
        }
    };
    dedup_ids(drop_blank_titles(tasks))
}

/// Tasks always carry a non-empty title; stored entries without one are
/// discarded.
fn drop_blank_titles(tasks: Vec<Task>) -> Vec<Task> {
    let before = tasks.len();
    let kept: Vec<Task> = tasks
        .into_iter()
        .filter(|t| !t.title.trim().is_empty())
        .collect();
    if kept.len() != before {
        warn!(
            "event=tasks_load status=blank_titles dropped={}",
            before - kept.len()
        );
    }
    kept
}

/// Keep the first task for each id so the uniqueness invariant holds even for
/// hand-edited data.
fn dedup_ids(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen = std::collections::HashSet::new();
    let before = tasks.len();
    let unique: Vec<Task> = tasks
        .into_iter()
        .filter(|t| seen.insert(t.id.clone()))
        .collect();
    if unique.len() != before {
        warn!(
            "event=tasks_load status=duplicate_ids dropped={}",
            before - unique.len()
        );
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn empty_store() -> (Arc<MemoryStore>, TaskStore) {
        let backend = Arc::new(MemoryStore::new());
        let store = TaskStore::load(backend.clone());
        (backend, store)
    }

    #[test]
    fn test_load_absent_key_is_empty() {
        let (_, store) = empty_store();
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_corrupt_data_is_empty() {
        let backend = Arc::new(MemoryStore::new());
        backend.seed(TASKS_KEY, "{not json");
        let store = TaskStore::load(backend.clone());
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_drops_duplicate_ids() {
        let backend = Arc::new(MemoryStore::new());
        backend.seed(
            TASKS_KEY,
            r#"[{"id":"1","title":"a","completed":false},{"id":"1","title":"b","completed":true}]"#,
        );
        let store = TaskStore::load(backend.clone());
        assert_eq!(store.len(), 1);
        assert_eq!(store.tasks()[0].title, "a");
    }

    #[test]
    fn test_load_drops_blank_titles() {
        let backend = Arc::new(MemoryStore::new());
        backend.seed(
            TASKS_KEY,
            r#"[{"id":"1","title":"","completed":false},{"id":"2","title":"  ","completed":true},{"id":"3","title":"keep","completed":false}]"#,
        );
        let store = TaskStore::load(backend.clone());
        assert_eq!(store.len(), 1);
        assert_eq!(store.tasks()[0].id, "3");
    }

    #[test]
    fn test_load_read_failure_is_empty_and_add_still_works() {
        let backend = Arc::new(MemoryStore::new());
        backend.seed(TASKS_KEY, r#"[{"id":"1","title":"unreachable","completed":false}]"#);
        backend.set_reject_reads(true);

        let mut store = TaskStore::load(backend.clone());
        assert!(store.is_empty());

        let id = store.add("after failed read").unwrap();
        assert_eq!(store.toggle(&id), Some(true));
        store.flush();

        backend.set_reject_reads(false);
        let reloaded = TaskStore::load(backend.clone());
        assert_eq!(reloaded.tasks(), store.tasks());
    }

    #[test]
    fn test_add_appends_trimmed_pending_task() {
        let (_, mut store) = empty_store();
        for (i, title) in ["Buy milk", "  padded  ", "x"].iter().enumerate() {
            let id = store.add(title).expect("task created");
            assert_eq!(store.len(), i + 1);
            let task = store.tasks().last().unwrap();
            assert_eq!(task.id, id);
            assert_eq!(task.title, title.trim());
            assert!(!task.completed);
        }
    }

    #[test]
    fn test_add_blank_title_is_noop() {
        let (backend, mut store) = empty_store();
        assert_eq!(store.add(""), None);
        assert_eq!(store.add("   "), None);
        assert_eq!(store.add("\t\n"), None);
        store.flush();
        assert!(store.is_empty());
        assert!(backend.get(TASKS_KEY).unwrap().is_none());
    }

    #[test]
    fn test_rapid_adds_get_unique_ids() {
        let (_, mut store) = empty_store();
        for i in 0..200 {
            store.add(&format!("task {i}"));
        }
        let ids: std::collections::HashSet<&str> =
            store.tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn test_toggle_is_an_involution() {
        let (_, mut store) = empty_store();
        let id = store.add("Walk dog").unwrap();
        assert_eq!(store.toggle(&id), Some(true));
        assert_eq!(store.toggle(&id), Some(false));
        assert!(!store.get(&id).unwrap().completed);
    }

    #[test]
    fn test_toggle_keeps_order() {
        let (_, mut store) = empty_store();
        let a = store.add("a").unwrap();
        let b = store.add("b").unwrap();
        store.toggle(&a);
        let order: Vec<&str> = store.tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(order, vec![a.as_str(), b.as_str()]);
    }

    #[test]
    fn test_toggle_unknown_id_is_noop() {
        let (_, mut store) = empty_store();
        store.add("a");
        let before = store.tasks().to_vec();
        assert_eq!(store.toggle("missing"), None);
        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn test_delete_removes_exactly_one() {
        let (_, mut store) = empty_store();
        let a = store.add("a").unwrap();
        let b = store.add("b").unwrap();

        let removed = store.delete(&a).unwrap();
        assert_eq!(removed.id, a);
        assert_eq!(store.len(), 1);
        assert_eq!(store.tasks()[0].id, b);

        assert!(store.delete(&a).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_persist_then_load_round_trip() {
        let (backend, mut store) = empty_store();
        let a = store.add("first").unwrap();
        store.add("second");
        store.toggle(&a);
        store.flush();

        let reloaded = TaskStore::load(backend.clone());
        assert_eq!(reloaded.tasks(), store.tasks());
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let (backend, mut store) = empty_store();
        store.add("kept in memory");
        store.flush();

        backend.set_reject_writes(true);
        let id = store.add("not on disk").unwrap();
        store.flush();
        assert_eq!(store.len(), 2);
        assert!(store.get(&id).is_some());

        let durable = TaskStore::load(backend.clone());
        assert_eq!(durable.len(), 1);

        // The next successful write carries the full in-memory state.
        backend.set_reject_writes(false);
        store.toggle(&id);
        store.flush();
        let durable = TaskStore::load(backend.clone());
        assert_eq!(durable.tasks(), store.tasks());
    }

    #[test]
    fn test_new_ids_follow_loaded_ids() {
        let backend = Arc::new(MemoryStore::new());
        backend.seed(
            TASKS_KEY,
            r#"[{"id":"99999999999999","title":"future","completed":false}]"#,
        );
        let mut store = TaskStore::load(backend.clone());
        let id = store.add("next").unwrap();
        assert_eq!(id, "100000000000000");
    }

    #[test]
    fn test_add_after_max_numeric_id_does_not_overflow() {
        let backend = Arc::new(MemoryStore::new());
        backend.seed(
            TASKS_KEY,
            r#"[{"id":"9223372036854775807","title":"edge","completed":false}]"#,
        );
        let mut store = TaskStore::load(backend.clone());
        let a = store.add("a").unwrap();
        let b = store.add("b").unwrap();
        assert_ne!(a, b);
        assert_ne!(a, "9223372036854775807");
        assert_eq!(store.len(), 3);
    }
}
