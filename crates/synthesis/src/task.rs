use std::{
    fmt,
    sync::atomic::{AtomicI64, Ordering},
};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a synthesis task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Processing,
    Merging,
    Completed,
    Error,
}

impl TaskStatus {
    /// Terminal states never change again
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Processing => "processing",
            Self::Merging => "merging",
            Self::Completed => "completed",
            Self::Error => "error",
        })
    }
}

/// Full state of one synthesis task, persisted as `state.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskState {
    pub task_id: String,
    pub title: String,
    pub status: TaskStatus,
    /// 0-100, monotonically non-decreasing; 100 only together with `completed`
    pub progress: u8,
    pub total_segments: usize,
    /// Segments the pipeline has finished with, success or not
    pub attempted_segments: usize,
    /// Segments that produced audio
    pub synthesized_segments: usize,
    /// Download route for the merged audio, set on completion
    pub audio_url: Option<String>,
    pub error: Option<String>,
    /// Creation time in unix milliseconds
    pub started_at: i64,
    /// Estimated play length of the merged audio
    pub duration_secs: Option<u64>,
}

impl TaskState {
    pub fn new(task_id: String, title: String, total_segments: usize) -> Self {
        let started_at = id_timestamp(&task_id).unwrap_or_else(Timestamp::now).as_millisecond();

        Self {
            task_id,
            title,
            status: TaskStatus::Processing,
            progress: 0,
            total_segments,
            attempted_segments: 0,
            synthesized_segments: 0,
            audio_url: None,
            error: None,
            started_at,
            duration_secs: None,
        }
    }

    pub fn created_at(&self) -> Timestamp {
        Timestamp::from_millisecond(self.started_at).unwrap_or(Timestamp::UNIX_EPOCH)
    }
}

/// Generate the next task id, `tts_{unix_millis}`
///
/// The embedded millisecond value is strictly increasing within a process,
/// so ids double as creation timestamps and two rapid submits never collide.
pub fn next_task_id() -> String {
    static LAST_MILLIS: AtomicI64 = AtomicI64::new(0);

    let mut prev = LAST_MILLIS.load(Ordering::Relaxed);

    loop {
        let now = Timestamp::now().as_millisecond();
        let candidate = now.max(prev + 1);

        match LAST_MILLIS.compare_exchange_weak(prev, candidate, Ordering::Relaxed, Ordering::Relaxed)
        {
            Ok(_) => return format!("tts_{candidate}"),
            Err(actual) => prev = actual,
        }
    }
}

/// Recover the creation timestamp embedded in a task id
pub fn id_timestamp(task_id: &str) -> Option<Timestamp> {
    let millis = task_id.strip_prefix("tts_")?.parse::<i64>().ok()?;

    Timestamp::from_millisecond(millis).ok()
}

/// A partial update to a task record; absent fields are left untouched
#[derive(Debug, Default)]
pub struct TaskPatch {
    pub status: Option<TaskStatus>,
    pub progress: Option<u8>,
    pub attempted_segments: Option<usize>,
    pub synthesized_segments: Option<usize>,
    pub audio_url: Option<String>,
    pub error: Option<String>,
    pub duration_secs: Option<u64>,
}

impl TaskPatch {
    pub fn apply(self, state: &mut TaskState) {
        if let Some(status) = self.status {
            state.status = status;
        }
        if let Some(progress) = self.progress {
            state.progress = progress;
        }
        if let Some(attempted) = self.attempted_segments {
            state.attempted_segments = attempted;
        }
        if let Some(synthesized) = self.synthesized_segments {
            state.synthesized_segments = synthesized;
        }
        if let Some(audio_url) = self.audio_url {
            state.audio_url = Some(audio_url);
        }
        if let Some(error) = self.error {
            state.error = Some(error);
        }
        if let Some(duration_secs) = self.duration_secs {
            state.duration_secs = Some(duration_secs);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id_millis(id: &str) -> i64 {
        id.strip_prefix("tts_").unwrap().parse().unwrap()
    }

    #[test]
    fn task_ids_are_strictly_increasing() {
        let first = next_task_id();
        let second = next_task_id();

        assert!(id_millis(&second) > id_millis(&first));
    }

    #[test]
    fn creation_time_derives_from_id() {
        let state = TaskState::new("tts_1700000000000".to_string(), "Episode".to_string(), 3);

        assert_eq!(state.started_at, 1_700_000_000_000);
        assert_eq!(state.created_at(), Timestamp::from_millisecond(1_700_000_000_000).unwrap());
    }

    #[test]
    fn malformed_id_falls_back_to_now() {
        let before = Timestamp::now().as_millisecond();
        let state = TaskState::new("not-a-task-id".to_string(), "Episode".to_string(), 1);

        assert!(state.started_at >= before);
    }

    #[test]
    fn only_completed_and_error_are_terminal() {
        assert!(TaskStatus::Completed.is_terminal());
        assert!(TaskStatus::Error.is_terminal());
        assert!(!TaskStatus::Processing.is_terminal());
        assert!(!TaskStatus::Merging.is_terminal());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&TaskStatus::Processing).unwrap(), r#""processing""#);
        assert_eq!(serde_json::to_string(&TaskStatus::Error).unwrap(), r#""error""#);
    }

    #[test]
    fn state_round_trips_through_json() {
        let mut state = TaskState::new("tts_1700000000000".to_string(), "Episode".to_string(), 5);
        state.status = TaskStatus::Completed;
        state.progress = 100;
        state.audio_url = Some("/api/tts/download/tts_1700000000000".to_string());

        let json = serde_json::to_string(&state).unwrap();
        let restored: TaskState = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.task_id, state.task_id);
        assert_eq!(restored.status, TaskStatus::Completed);
        assert_eq!(restored.progress, 100);
        assert_eq!(restored.audio_url, state.audio_url);
    }

    #[test]
    fn patch_touches_only_present_fields() {
        let mut state = TaskState::new("tts_1700000000000".to_string(), "Episode".to_string(), 4);
        state.attempted_segments = 2;
        state.synthesized_segments = 2;

        TaskPatch {
            progress: Some(50),
            attempted_segments: Some(3),
            ..TaskPatch::default()
        }
        .apply(&mut state);

        assert_eq!(state.progress, 50);
        assert_eq!(state.attempted_segments, 3);
        assert_eq!(state.synthesized_segments, 2);
        assert_eq!(state.status, TaskStatus::Processing);
        assert_eq!(state.audio_url, None);
    }
}
