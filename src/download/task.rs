//! Download task tracking.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::api::MediaFormat;
use crate::view::{ProgressStatus, ProgressSurface};

/// An in-flight download, alive from click until the transfer ends.
#[derive(Debug, Clone)]
pub struct DownloadTask {
    pub task_id: Uuid,
    pub result_id: String,
    pub title: String,
    pub format: MediaFormat,
    pub progress: ProgressSurface,
    pub started_at: DateTime<Utc>,
}

/// Active tasks indexed by result id.
#[derive(Debug, Default)]
pub struct TaskArena {
    tasks: Mutex<HashMap<String, DownloadTask>>,
}

impl TaskArena {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, DownloadTask>> {
        self.tasks.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register a task unless its result already has one running.
    pub fn try_register(&self, task: DownloadTask) -> bool {
        let mut tasks = self.lock();
        if tasks.contains_key(&task.result_id) {
            return false;
        }
        tasks.insert(task.result_id.clone(), task);
        true
    }

    /// Remove a task, only if it is still the one registered for its result.
    pub fn finish(&self, result_id: &str, task_id: Uuid) -> Option<DownloadTask> {
        let mut tasks = self.lock();
        match tasks.get(result_id) {
            Some(task) if task.task_id == task_id => tasks.remove(result_id),
            _ => None,
        }
    }

    pub fn is_active(&self, result_id: &str) -> bool {
        self.lock().contains_key(result_id)
    }

    pub fn get(&self, result_id: &str) -> Option<DownloadTask> {
        self.lock().get(result_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Removes its task from the arena when dropped.
///
/// Dropping while the progress is still running means the transfer was
/// abandoned, so the indicator is hidden too.
pub(crate) struct TaskGuard {
    arena: Arc<TaskArena>,
    task: DownloadTask,
}

impl TaskGuard {
    /// Register `task`, or return `None` when its result is already downloading.
    pub(crate) fn register(arena: &Arc<TaskArena>, task: DownloadTask) -> Option<Self> {
        if !arena.try_register(task.clone()) {
            return None;
        }
        Some(Self {
            arena: Arc::clone(arena),
            task,
        })
    }

    pub(crate) fn task(&self) -> &DownloadTask {
        &self.task
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.arena.finish(&self.task.result_id, self.task.task_id);
        if self.task.progress.snapshot().status == ProgressStatus::Running {
            self.task.progress.hide();
        }

        let elapsed = Utc::now() - self.task.started_at;
        tracing::debug!(
            "Download task {} for {} \"{}\" ({}) ended after {}ms",
            self.task.task_id,
            self.task.result_id,
            self.task.title,
            self.task.format,
            elapsed.num_milliseconds()
        );
    }
}
