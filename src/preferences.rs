//! Dark mode preference, persisted under its own key.

use std::sync::Arc;

use log::{error, info, warn};

use crate::storage::{KeyValueStore, DARK_MODE_KEY};
use crate::writer::KeyWriter;

pub struct PreferenceStore {
    dark_mode: bool,
    writer: KeyWriter,
}

impl PreferenceStore {
    /// Hydrate from `store`; defaults to light mode on absence or error.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let dark_mode = read_dark_mode(store.as_ref());
        info!("event=prefs_load status=ok dark_mode={}", dark_mode);
        PreferenceStore {
            dark_mode,
            writer: KeyWriter::spawn(store, DARK_MODE_KEY),
        }
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// Flip dark mode and queue the write. Returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        match serde_json::to_string(&self.dark_mode) {
            Ok(json) => self.writer.submit(json),
            Err(e) => error!("event=persist status=error key={} error={}", DARK_MODE_KEY, e),
        }
        self.dark_mode
    }

    pub fn flush(&self) {
        self.writer.flush();
    }
}

fn read_dark_mode(store: &dyn KeyValueStore) -> bool {
    match store.get(DARK_MODE_KEY) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("event=prefs_load status=corrupt error={}", e);
            false
        }),
        Ok(None) => false,
        Err(e) => {
            error!("event=prefs_load status=error error={}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_defaults_to_false() {
        let prefs = PreferenceStore::load(Arc::new(MemoryStore::new()));
        assert!(!prefs.dark_mode());
    }

    #[test]
    fn test_corrupt_value_defaults_to_false() {
        let backend = Arc::new(MemoryStore::new());
        backend.seed(DARK_MODE_KEY, "\"yes\"");
        assert!(!PreferenceStore::load(backend.clone()).dark_mode());
    }

    #[test]
    fn test_toggle_survives_reload() {
        let backend = Arc::new(MemoryStore::new());
        let mut prefs = PreferenceStore::load(backend.clone());
        assert!(prefs.toggle());
        prefs.flush();

        assert_eq!(backend.get(DARK_MODE_KEY).unwrap().as_deref(), Some("true"));
        assert!(PreferenceStore::load(backend.clone()).dark_mode());
    }

    #[test]
    fn test_read_failure_defaults_to_false_and_toggle_still_works() {
        let backend = Arc::new(MemoryStore::new());
        backend.seed(DARK_MODE_KEY, "true");
        backend.set_reject_reads(true);

        let mut prefs = PreferenceStore::load(backend.clone());
        assert!(!prefs.dark_mode());
        assert!(prefs.toggle());
        prefs.flush();

        backend.set_reject_reads(false);
        assert!(PreferenceStore::load(backend.clone()).dark_mode());
    }

    #[test]
    fn test_rejected_write_keeps_memory_value() {
        let backend = Arc::new(MemoryStore::new());
        backend.set_reject_writes(true);
        let mut prefs = PreferenceStore::load(backend.clone());
        assert!(prefs.toggle());
        prefs.flush();
        assert!(prefs.dark_mode());
        assert!(!PreferenceStore::load(backend.clone()).dark_mode());
    }
}
