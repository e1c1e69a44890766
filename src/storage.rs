use std::{
    cell::RefCell,
    fs,
    path::{Path, PathBuf},
    rc::Rc,
};

use tracing::{debug, warn};

use crate::{error::StorageError, task::Task};

pub const DEFAULT_FILE: &str = "tasks.json";

/// Durable home of the task sequence. The whole sequence is read at startup
/// and overwritten after every mutation.
pub trait TaskStorage {
    /// Missing, unreadable or malformed documents load as no tasks.
    fn load(&self) -> Vec<Task>;

    fn save(&self, tasks: &[Task]) -> Result<(), StorageError>;
}

#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TaskStorage for JsonFileStorage {
    fn load(&self) -> Vec<Task> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no task file yet");
            return Vec::new();
        }
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "could not read task file");
                return Vec::new();
            }
        };
        serde_json::from_str(&data).unwrap_or_else(|err| {
            warn!(path = %self.path.display(), error = %err, "discarding malformed task file");
            Vec::new()
        })
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StorageError> {
        let data = serde_json::to_string_pretty(tasks)?;
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(&self.path, data).map_err(io_err)?;
        debug!(path = %self.path.display(), count = tasks.len(), "saved tasks");
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryDocument {
    tasks: Vec<Task>,
    saves: usize,
    failing: bool,
}

/// In-process document. Clones share the same contents, so a test can keep a
/// handle while the board owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    doc: Rc<RefCell<MemoryDocument>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let storage = Self::default();
        storage.doc.borrow_mut().tasks = tasks;
        storage
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.doc.borrow().tasks.clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.doc.borrow().saves
    }

    pub fn set_failing(&self, failing: bool) {
        self.doc.borrow_mut().failing = failing;
    }
}

impl TaskStorage for MemoryStorage {
    fn load(&self) -> Vec<Task> {
        self.tasks()
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StorageError> {
        let mut doc = self.doc.borrow_mut();
        if doc.failing {
            return Err(StorageError::Unavailable("storage is read-only".into()));
        }
        doc.tasks = tasks.to_vec();
        doc.saves += 1;
        Ok(())
    }
}
