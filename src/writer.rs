//! Serialized background writes for a single storage key.
//!
//! Each store owns one `KeyWriter`. Submitting a value never blocks: the value
//! is queued and a dedicated thread applies `set` calls in submission order, so
//! writes to the same key never interleave and the last submission wins.

use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, error};

use crate::storage::KeyValueStore;

enum WriteCommand {
    Write(String),
    Flush(Sender<()>),
}

/// Fire-and-forget writer for one key.
///
/// Dropping the writer drains the queue and joins the thread.
pub struct KeyWriter {
    key: &'static str,
    sender: Option<Sender<WriteCommand>>,
    handle: Option<JoinHandle<()>>,
}

impl KeyWriter {
    /// Start the writer thread for `key`.
    pub fn spawn(store: Arc<dyn KeyValueStore>, key: &'static str) -> Self {
        let (sender, receiver) = mpsc::channel::<WriteCommand>();
        let spawned = thread::Builder::new()
            .name(format!("writer-{key}"))
            .spawn(move || {
                for command in receiver {
                    match command {
                        WriteCommand::Write(value) => match store.set(key, &value) {
                            Ok(()) => debug!("event=persist status=ok key={} bytes={}", key, value.len()),
                            Err(e) => error!("event=persist status=error key={} error={}", key, e),
                        },
                        WriteCommand::Flush(ack) => {
                            let _ = ack.send(());
                        }
                    }
                }
            });

        match spawned {
            Ok(handle) => KeyWriter {
                key,
                sender: Some(sender),
                handle: Some(handle),
            },
            Err(e) => {
                error!("event=writer_start status=error key={} error={}", key, e);
                KeyWriter {
                    key,
                    sender: None,
                    handle: None,
                }
            }
        }
    }

    /// Queue `value` for writing. Returns immediately.
    pub fn submit(&self, value: String) {
        let Some(sender) = self.sender.as_ref() else {
            error!("event=persist status=dropped key={} reason=no_writer", self.key);
            return;
        };
        if sender.send(WriteCommand::Write(value)).is_err() {
            error!("event=persist status=dropped key={} reason=writer_gone", self.key);
        }
    }

    /// Block until every value submitted so far has been attempted.
    pub fn flush(&self) {
        let Some(sender) = self.sender.as_ref() else {
            return;
        };
        let (ack, done) = mpsc::channel();
        if sender.send(WriteCommand::Flush(ack)).is_ok() {
            let _ = done.recv();
        }
    }
}

impl Drop for KeyWriter {
    fn drop(&mut self) {
        // Closing the channel ends the thread's loop once the queue is empty.
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("event=writer_stop status=panicked key={}", self.key);
            }
        }
    }
}
