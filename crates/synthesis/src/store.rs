use std::path::{Path, PathBuf};

use dashmap::DashMap;

use crate::{
    error::StoreError,
    task::{TaskPatch, TaskState, TaskStatus},
};

const STATE_FILE: &str = "state.json";
const STATE_TMP_FILE: &str = "state.json.tmp";

/// In-memory task index backed by one `state.json` per task directory
///
/// Reads hit the map only; every write goes to the map first, then to disk.
pub struct TaskStore {
    tasks: DashMap<String, TaskState>,
    root: PathBuf,
}

impl TaskStore {
    /// Open the store rooted at `root`, rehydrating task records from disk
    ///
    /// Tasks found in a non-terminal state belonged to a previous process
    /// and can never finish, so they are flipped to `error` on load.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;

        let tasks = DashMap::new();
        let mut entries = tokio::fs::read_dir(&root).await?;

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }

            let state_path = entry.path().join(STATE_FILE);
            let raw = match tokio::fs::read(&state_path).await {
                Ok(raw) => raw,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => {
                    tracing::warn!("Skipping unreadable task state {}: {e}", state_path.display());
                    continue;
                }
            };

            let mut state: TaskState = match serde_json::from_slice(&raw) {
                Ok(state) => state,
                Err(e) => {
                    tracing::warn!("Skipping corrupt task state {}: {e}", state_path.display());
                    continue;
                }
            };

            if !state.status.is_terminal() {
                tracing::warn!("Task {} was interrupted, marking as failed", state.task_id);
                state.status = TaskStatus::Error;
                state.error = Some("interrupted by server restart".to_string());

                if let Err(e) = persist(&entry.path(), &state).await {
                    tracing::warn!("Failed to persist recovered task {}: {e}", state.task_id);
                }
            }

            tasks.insert(state.task_id.clone(), state);
        }

        if !tasks.is_empty() {
            tracing::info!("Restored {} task(s) from {}", tasks.len(), root.display());
        }

        Ok(Self { tasks, root })
    }

    /// Working directory of a task, `<root>/<task_id>`
    pub fn task_dir(&self, task_id: &str) -> PathBuf {
        self.root.join(task_id)
    }

    /// Register a new task and create its working directory
    pub async fn create(&self, state: TaskState) -> Result<(), StoreError> {
        if self.tasks.contains_key(&state.task_id) {
            return Err(StoreError::TaskExists(state.task_id));
        }

        let dir = self.task_dir(&state.task_id);
        tokio::fs::create_dir_all(&dir).await?;
        persist(&dir, &state).await?;

        self.tasks.insert(state.task_id.clone(), state);

        Ok(())
    }

    pub fn read(&self, task_id: &str) -> Option<TaskState> {
        self.tasks.get(task_id).map(|entry| entry.value().clone())
    }

    /// Apply a patch to a task record and persist the result
    ///
    /// Terminal records are immutable; a patch against one is dropped and
    /// the unchanged record returned. Returns `None` for unknown tasks.
    pub async fn update(&self, task_id: &str, patch: TaskPatch) -> Option<TaskState> {
        let updated = {
            let mut entry = self.tasks.get_mut(task_id)?;

            if entry.status.is_terminal() {
                tracing::debug!("Dropping update for terminal task {task_id}");
                return Some(entry.value().clone());
            }

            patch.apply(entry.value_mut());
            entry.value().clone()
        };

        if let Err(e) = persist(&self.task_dir(task_id), &updated).await {
            tracing::error!("Failed to persist state for task {task_id}: {e}");
        }

        Some(updated)
    }

    /// Drop a task record and delete its working directory
    pub async fn remove(&self, task_id: &str) -> Result<Option<TaskState>, StoreError> {
        let Some((_, state)) = self.tasks.remove(task_id) else {
            return Ok(None);
        };

        match tokio::fs::remove_dir_all(self.task_dir(task_id)).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        Ok(Some(state))
    }

    pub fn list(&self) -> Vec<TaskState> {
        self.tasks.iter().map(|entry| entry.value().clone()).collect()
    }
}

/// Atomically replace `state.json` inside an existing task directory
///
/// Never creates the directory, so a write racing a delete fails instead
/// of resurrecting the task. Rename makes concurrent readers see the old
/// or the new file, never a torn one.
async fn persist(dir: &Path, state: &TaskState) -> Result<(), StoreError> {
    let json = serde_json::to_vec_pretty(state)?;
    let tmp = dir.join(STATE_TMP_FILE);

    tokio::fs::write(&tmp, &json).await?;
    tokio::fs::rename(&tmp, dir.join(STATE_FILE)).await?;

    Ok(())
}
