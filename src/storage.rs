use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::{SettingsFile, Task};

const TASKS_DIR: &str = "tasks";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(err) => write!(f, "io error: {err}"),
            StorageError::Json(err) => write!(f, "json error: {err}"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(value: std::io::Error) -> Self {
        StorageError::Io(value)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        StorageError::Json(value)
    }
}

/// Filesystem record store: one JSON file per task under `tasks/`, keyed by
/// task id, plus a schema-versioned `settings.json`. The rest of the crate
/// treats this as an opaque collaborator.
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn ensure_dirs(&self) -> Result<(), StorageError> {
        fs::create_dir_all(self.root.join(TASKS_DIR))?;
        Ok(())
    }

    /// Loads every task record, sorted by filename so reload order matches
    /// creation order (ids are millisecond timestamps). A record that fails
    /// to read or parse is skipped with a warning rather than failing the
    /// whole load.
    pub fn load_tasks(&self) -> Result<Vec<Task>, StorageError> {
        let mut paths: Vec<_> = fs::read_dir(self.root.join(TASKS_DIR))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut tasks = Vec::new();
        for path in paths {
            match self.load_json::<Task>(path.clone()) {
                Ok(task) => tasks.push(task),
                Err(error) => {
                    log::warn!("skipping unreadable task record {}: {error}", path.display());
                }
            }
        }
        Ok(tasks)
    }

    /// Idempotent upsert keyed by `task.id`.
    pub fn save_task(&self, task: &Task) -> Result<(), StorageError> {
        self.write_atomic(self.task_path(&task.id), task)
    }

    /// Removing an already-absent record counts as success.
    pub fn delete_task(&self, task_id: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.task_path(task_id)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn load_settings(&self) -> Result<SettingsFile, StorageError> {
        self.load_json(self.root.join(SETTINGS_FILE))
    }

    pub fn save_settings(&self, data: &SettingsFile) -> Result<(), StorageError> {
        self.write_atomic(self.root.join(SETTINGS_FILE), data)
    }

    fn task_path(&self, task_id: &str) -> PathBuf {
        self.root.join(TASKS_DIR).join(format!("{task_id}.json"))
    }

    fn load_json<T: DeserializeOwned>(&self, path: PathBuf) -> Result<T, StorageError> {
        let mut file = File::open(path)?;
        let mut buf = String::new();
        file.read_to_string(&mut buf)?;
        Ok(serde_json::from_str(&buf)?)
    }

    fn write_atomic<T: Serialize>(&self, path: PathBuf, data: &T) -> Result<(), StorageError> {
        let temp_path = path.with_extension("tmp");
        let json = serde_json::to_vec_pretty(data)?;
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&json)?;
            file.sync_all()?;
        }
        fs::rename(temp_path, path)?;
        Ok(())
    }
}
