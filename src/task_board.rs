use tracing::{debug, warn};

use crate::{
    error::StorageError,
    storage::TaskStorage,
    task::Task,
};

/// How new task ids are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdPolicy {
    /// One past the highest id seen this session; ids are never reused while
    /// the board is open.
    #[default]
    Monotonic,
    /// `count + 1`, matching the historical numbering. Can hand out an id
    /// that a surviving task already holds after an out-of-order delete.
    CountBased,
}

/// Result of a mutating operation. The in-memory change stands even when
/// `persisted` is an error.
#[derive(Debug)]
pub struct Applied<T> {
    pub outcome: T,
    pub persisted: Result<(), StorageError>,
}

impl<T> Applied<T> {
    fn unsaved(outcome: T) -> Self {
        Self {
            outcome,
            persisted: Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Listing<'a> {
    Empty,
    Tasks {
        tasks: &'a [Task],
        completed: usize,
        total: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum CompleteOutcome {
    NotFound,
    AlreadyCompleted,
    Completed(Task),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    NotFound,
    Deleted { description: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    NotFound,
    Updated { old: String, new: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchResult {
    NoMatches,
    Matches(Vec<Task>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Percentage rounded to one decimal.
    pub completion_rate: f64,
}

pub struct TaskBoard {
    tasks: Vec<Task>,
    storage: Box<dyn TaskStorage>,
    policy: IdPolicy,
    /// `None` once a stored id reached `u32::MAX`.
    next_id: Option<u32>,
}

impl TaskBoard {
    pub fn open(storage: impl TaskStorage + 'static, policy: IdPolicy) -> Self {
        let tasks = storage.load();
        let next_id = tasks.iter().map(|t| t.id).max().unwrap_or(0).checked_add(1);
        debug!(count = tasks.len(), ?policy, "opened task board");
        Self {
            tasks,
            storage: Box::new(storage),
            policy,
            next_id,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    fn save(&self) -> Result<(), StorageError> {
        let result = self.storage.save(&self.tasks);
        if let Err(err) = &result {
            warn!(error = %err, "failed to save tasks");
        }
        result
    }

    fn position(&self, id: u32) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    fn assign_id(&mut self) -> u32 {
        match self.policy {
            IdPolicy::Monotonic => match self.next_id {
                Some(id) => {
                    self.next_id = id.checked_add(1);
                    id
                }
                None => self.smallest_unused_id(),
            },
            IdPolicy::CountBased => (self.tasks.len() as u32).saturating_add(1),
        }
    }

    /// Fallback once the counter is exhausted.
    fn smallest_unused_id(&self) -> u32 {
        let mut used: Vec<u32> = self.tasks.iter().map(|t| t.id).collect();
        used.sort_unstable();
        used.dedup();
        let mut candidate = 1;
        for id in used {
            if id > candidate {
                break;
            }
            if id == candidate {
                candidate = candidate.saturating_add(1);
            }
        }
        warn!(id = candidate, "id counter exhausted, reusing a free id");
        candidate
    }

    /// Callers reject empty descriptions before getting here.
    pub fn add_task(&mut self, description: impl Into<String>) -> Applied<Task> {
        let id = self.assign_id();
        let task = Task::new(id, description);
        self.tasks.push(task.clone());
        debug!(id, "added task");
        Applied {
            outcome: task,
            persisted: self.save(),
        }
    }

    pub fn list(&self) -> Listing<'_> {
        if self.tasks.is_empty() {
            return Listing::Empty;
        }
        Listing::Tasks {
            tasks: &self.tasks,
            completed: self.completed_count(),
            total: self.tasks.len(),
        }
    }

    pub fn complete_task(&mut self, id: u32) -> Applied<CompleteOutcome> {
        let Some(index) = self.position(id) else {
            return Applied::unsaved(CompleteOutcome::NotFound);
        };
        let task = &mut self.tasks[index];
        if task.completed {
            return Applied::unsaved(CompleteOutcome::AlreadyCompleted);
        }
        task.completed = true;
        let task = task.clone();
        debug!(id, "completed task");
        Applied {
            outcome: CompleteOutcome::Completed(task),
            persisted: self.save(),
        }
    }

    pub fn delete_task(&mut self, id: u32) -> Applied<DeleteOutcome> {
        let Some(index) = self.position(id) else {
            return Applied::unsaved(DeleteOutcome::NotFound);
        };
        let removed = self.tasks.remove(index);
        debug!(id, "deleted task");
        Applied {
            outcome: DeleteOutcome::Deleted {
                description: removed.description,
            },
            persisted: self.save(),
        }
    }

    pub fn edit_task(&mut self, id: u32, description: impl Into<String>) -> Applied<EditOutcome> {
        let Some(index) = self.position(id) else {
            return Applied::unsaved(EditOutcome::NotFound);
        };
        let new = description.into();
        let old = std::mem::replace(&mut self.tasks[index].description, new.clone());
        debug!(id, "edited task");
        Applied {
            outcome: EditOutcome::Updated { old, new },
            persisted: self.save(),
        }
    }

    /// Returns how many tasks were removed. Nothing is written when that is zero.
    pub fn clear_completed(&mut self) -> Applied<usize> {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        let removed = before - self.tasks.len();
        if removed == 0 {
            return Applied::unsaved(0);
        }
        debug!(removed, "cleared completed tasks");
        Applied {
            outcome: removed,
            persisted: self.save(),
        }
    }

    pub fn statistics(&self) -> Statistics {
        let total = self.tasks.len();
        let completed = self.completed_count();
        Statistics {
            total,
            completed,
            pending: total - completed,
            completion_rate: completion_rate(completed, total),
        }
    }

    pub fn search(&self, keyword: &str) -> SearchResult {
        let matches: Vec<Task> = self
            .tasks
            .iter()
            .filter(|t| t.matches(keyword))
            .cloned()
            .collect();
        if matches.is_empty() {
            SearchResult::NoMatches
        } else {
            SearchResult::Matches(matches)
        }
    }

    fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }
}

/// Percentage rounded to one decimal the way `{:.1}` prints it, so the stored
/// value and the rendered one never disagree on ties.
fn completion_rate(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let rate = completed as f64 / total as f64 * 100.0;
    format!("{rate:.1}").parse().unwrap_or(rate)
}
