use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::models::{SettingsFile, Task};
use crate::storage::Storage;

/// A durability request. Mutations apply in memory first and then enqueue one
/// of these; nothing in the interaction path waits for the outcome.
#[derive(Debug, Clone)]
pub enum PersistRequest {
    SaveTask(Task),
    DeleteTask(String),
    SaveSettings(SettingsFile),
}

/// Sending half of the persistence queue. `dispatch` never blocks. A send
/// failure only means the worker is gone; that is logged and the mutation
/// stays valid in memory.
#[derive(Clone)]
pub struct PersistHandle {
    tx: UnboundedSender<PersistRequest>,
}

impl PersistHandle {
    pub fn channel() -> (Self, UnboundedReceiver<PersistRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn dispatch(&self, request: PersistRequest) {
        if self.tx.send(request).is_err() {
            log::warn!("persistence worker is gone; dropping durability request");
        }
    }
}

/// Drains the queue sequentially, applying each request to storage. Because
/// there is a single consumer, requests for the same task id apply in
/// dispatch order. Failures are logged and never fed back to the interaction
/// path. Returns once every sender is dropped.
pub async fn run_persister(storage: Storage, mut rx: UnboundedReceiver<PersistRequest>) {
    while let Some(request) = rx.recv().await {
        let outcome = match &request {
            PersistRequest::SaveTask(task) => storage.save_task(task),
            PersistRequest::DeleteTask(task_id) => storage.delete_task(task_id),
            PersistRequest::SaveSettings(file) => storage.save_settings(file),
        };
        if let Err(error) = outcome {
            log::warn!("durability request failed: {error} ({request:?})");
        }
    }
}
