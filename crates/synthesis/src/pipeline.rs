use std::sync::Arc;

use indexmap::IndexMap;
use speech::SpeechRequest;

use crate::{
    error::SubmitError,
    merge::{self, estimated_duration_secs},
    runner::PipelineRunner,
    script::Script,
    segment::{self, SegmentArtifact, SpeechSource},
    store::TaskStore,
    task::{self, TaskPatch, TaskState, TaskStatus},
    voice::VoiceResolver,
};

/// Per-request synthesis choices carried alongside the script
#[derive(Debug, Default, Clone)]
pub struct SubmitOptions {
    /// Speaker-to-voice overrides for this request
    pub voices: IndexMap<String, String>,
    /// Default voice override for unmapped speakers
    pub default_voice: Option<String>,
    pub speed: Option<f64>,
    pub emotion_mode: Option<String>,
}

/// Accepts scripts and drives their synthesis pipelines to a terminal state
pub struct Orchestrator {
    speech: Arc<dyn SpeechSource>,
    store: Arc<TaskStore>,
    voices: VoiceResolver,
    runner: PipelineRunner,
    download_base: String,
}

impl Orchestrator {
    pub fn new(
        speech: Arc<dyn SpeechSource>,
        store: Arc<TaskStore>,
        voices: VoiceResolver,
        download_base: String,
    ) -> Self {
        Self { speech, store, voices, runner: PipelineRunner::new(), download_base }
    }

    /// Validate a script, register its task, and start the pipeline
    ///
    /// Returns the new task id as soon as the record and working directory
    /// exist; synthesis continues in the background and is observable only
    /// through the store.
    pub async fn submit(
        &self,
        script: Script,
        options: SubmitOptions,
    ) -> Result<String, SubmitError> {
        script.validate()?;

        let task_id = task::next_task_id();
        let total_segments = script.content.len();

        self.store
            .create(TaskState::new(task_id.clone(), script.title.clone(), total_segments))
            .await?;

        tracing::info!("Task {task_id}: accepted, {total_segments} segment(s)");

        let job = PipelineJob {
            speech: Arc::clone(&self.speech),
            store: Arc::clone(&self.store),
            resolver: self.voices.with_overrides(&options.voices, options.default_voice.as_deref()),
            script,
            task_id: task_id.clone(),
            speed: options.speed,
            emotion: options.emotion_mode,
            download_base: self.download_base.clone(),
        };

        self.runner.spawn(job.run());

        Ok(task_id)
    }

    /// Wait for in-flight pipelines to reach a terminal state
    pub async fn shutdown(&self) {
        self.runner.shutdown().await;
    }
}

/// Progress during the segment phase; merging and completion own 99 and 100
fn segment_progress(attempted: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }

    u8::try_from(attempted * 100 / total).map_or(99, |percent| percent.min(99))
}

/// Everything one pipeline needs, detached from the orchestrator
struct PipelineJob {
    speech: Arc<dyn SpeechSource>,
    store: Arc<TaskStore>,
    resolver: VoiceResolver,
    script: Script,
    task_id: String,
    speed: Option<f64>,
    emotion: Option<String>,
    download_base: String,
}

impl PipelineJob {
    /// Drive the task to `completed` or `error`
    ///
    /// Never returns a failure; every outcome is recorded through the store.
    async fn run(self) {
        let total = self.script.content.len();
        let work_dir = self.store.task_dir(&self.task_id);
        let mut artifacts: Vec<SegmentArtifact> = Vec::with_capacity(total);
        let mut attempted = 0;

        for (i, line) in self.script.content.iter().enumerate() {
            let index = i + 1;
            let request = SpeechRequest {
                text: line.text.clone(),
                voice: self.resolver.resolve(&line.speaker).to_string(),
                speed: self.speed,
                emotion: self.emotion.clone(),
            };

            match segment::synthesize_segment(self.speech.as_ref(), request, &work_dir, index).await
            {
                Ok(artifact) => {
                    tracing::debug!("Task {}: segment {index}/{total} synthesized", self.task_id);
                    artifacts.push(artifact);
                }
                Err(e) => {
                    tracing::warn!("Task {}: segment {index}/{total} failed: {e}", self.task_id);
                }
            }

            attempted += 1;

            if attempted < total {
                self.store
                    .update(&self.task_id, TaskPatch {
                        progress: Some(segment_progress(attempted, total)),
                        attempted_segments: Some(attempted),
                        synthesized_segments: Some(artifacts.len()),
                        ..TaskPatch::default()
                    })
                    .await;
            }
        }

        if artifacts.is_empty() {
            tracing::error!("Task {}: all {total} segment(s) failed", self.task_id);
            self.store
                .update(&self.task_id, TaskPatch {
                    status: Some(TaskStatus::Error),
                    attempted_segments: Some(attempted),
                    error: Some(format!("all {total} segments failed to synthesize")),
                    ..TaskPatch::default()
                })
                .await;

            return;
        }

        self.store
            .update(&self.task_id, TaskPatch {
                status: Some(TaskStatus::Merging),
                progress: Some(99),
                attempted_segments: Some(attempted),
                synthesized_segments: Some(artifacts.len()),
                ..TaskPatch::default()
            })
            .await;

        match merge::merge_segments(&work_dir, artifacts).await {
            Ok(output) => {
                tracing::info!(
                    "Task {}: merged {} segment(s) into {} bytes",
                    self.task_id,
                    output.merged_segments,
                    output.bytes,
                );
                self.store
                    .update(&self.task_id, TaskPatch {
                        status: Some(TaskStatus::Completed),
                        progress: Some(100),
                        audio_url: Some(format!("{}/{}", self.download_base, self.task_id)),
                        duration_secs: Some(estimated_duration_secs(output.bytes)),
                        ..TaskPatch::default()
                    })
                    .await;
            }
            Err(e) => {
                tracing::error!("Task {}: merge failed: {e}", self.task_id);
                self.store
                    .update(&self.task_id, TaskPatch {
                        status: Some(TaskStatus::Error),
                        error: Some(format!("failed to merge segments: {e}")),
                        ..TaskPatch::default()
                    })
                    .await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use async_trait::async_trait;
    use speech::SpeechClip;

    use crate::error::ScriptError;
    use crate::merge::MERGED_FILE_NAME;
    use crate::script::ScriptLine;

    use super::*;

    /// Deterministic source: clip bytes encode voice and text, listed
    /// markers fail the call
    struct ScriptedSource {
        fail_markers: Vec<String>,
    }

    #[async_trait]
    impl SpeechSource for ScriptedSource {
        async fn synthesize(&self, request: SpeechRequest) -> speech::Result<SpeechClip> {
            if self.fail_markers.iter().any(|marker| request.text.contains(marker)) {
                return Err(speech::SpeechError::ProviderApi {
                    status: 500,
                    message: "scripted failure".to_string(),
                });
            }

            Ok(SpeechClip {
                audio: format!("[{}:{}]", request.voice, request.text).into_bytes(),
                content_type: "audio/mpeg".to_string(),
            })
        }
    }

    async fn orchestrator(dir: &Path, fail_markers: &[&str]) -> (Orchestrator, Arc<TaskStore>) {
        let store = Arc::new(TaskStore::open(dir).await.unwrap());
        let speech: Arc<dyn SpeechSource> = Arc::new(ScriptedSource {
            fail_markers: fail_markers.iter().map(|m| (*m).to_string()).collect(),
        });

        let mut speakers = IndexMap::new();
        speakers.insert("Host".to_string(), "onyx".to_string());
        let voices = VoiceResolver::new(speakers, "alloy".to_string());

        let orchestrator =
            Orchestrator::new(speech, Arc::clone(&store), voices, "/api/tts/download".to_string());

        (orchestrator, store)
    }

    fn script(lines: &[(&str, &str)]) -> Script {
        Script {
            title: "Episode".to_string(),
            speakers: Vec::new(),
            content: lines
                .iter()
                .map(|(speaker, text)| ScriptLine {
                    speaker: (*speaker).to_string(),
                    text: (*text).to_string(),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn successful_pipeline_completes_with_ordered_audio() {
        let dir = tempfile::tempdir().unwrap();
        let (orchestrator, store) = orchestrator(dir.path(), &[]).await;

        let task_id = orchestrator
            .submit(
                script(&[("Host", "one"), ("Narrator", "two"), ("Host", "three")]),
                SubmitOptions::default(),
            )
            .await
            .unwrap();
        orchestrator.shutdown().await;

        let task = store.read(&task_id).unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.progress, 100);
        assert_eq!(task.attempted_segments, 3);
        assert_eq!(task.synthesized_segments, 3);
        assert_eq!(task.audio_url, Some(format!("/api/tts/download/{task_id}")));
        assert!(task.error.is_none());
        assert!(task.duration_secs.is_some());

        let merged = std::fs::read(store.task_dir(&task_id).join(MERGED_FILE_NAME)).unwrap();
        assert_eq!(merged, b"[onyx:one][alloy:two][onyx:three]");
    }

    #[tokio::test]
    async fn failed_segment_is_skipped_without_a_gap() {
        let dir = tempfile::tempdir().unwrap();
        let (orchestrator, store) = orchestrator(dir.path(), &["two"]).await;

        let task_id = orchestrator
            .submit(
                script(&[("Host", "one"), ("Host", "two"), ("Host", "three")]),
                SubmitOptions::default(),
            )
            .await
            .unwrap();
        orchestrator.shutdown().await;

        let task = store.read(&task_id).unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.attempted_segments, 3);
        assert_eq!(task.synthesized_segments, 2);

        let merged = std::fs::read(store.task_dir(&task_id).join(MERGED_FILE_NAME)).unwrap();
        assert_eq!(merged, b"[onyx:one][onyx:three]");
    }

    #[tokio::test]
    async fn all_segments_failing_ends_in_error_without_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let (orchestrator, store) = orchestrator(dir.path(), &["line"]).await;

        let task_id = orchestrator
            .submit(
                script(&[("Host", "line one"), ("Host", "line two"), ("Host", "line three")]),
                SubmitOptions::default(),
            )
            .await
            .unwrap();
        orchestrator.shutdown().await;

        let task = store.read(&task_id).unwrap();
        assert_eq!(task.status, TaskStatus::Error);
        assert!(task.progress < 100);
        assert_eq!(task.synthesized_segments, 0);
        assert_eq!(task.error.as_deref(), Some("all 3 segments failed to synthesize"));
        assert!(task.audio_url.is_none());
        assert!(!store.task_dir(&task_id).join(MERGED_FILE_NAME).exists());
    }

    #[tokio::test]
    async fn request_voice_overrides_reach_the_provider() {
        let dir = tempfile::tempdir().unwrap();
        let (orchestrator, store) = orchestrator(dir.path(), &[]).await;

        let mut voices = IndexMap::new();
        voices.insert("Host".to_string(), "echo".to_string());

        let task_id = orchestrator
            .submit(script(&[("Host", "one"), ("Guest", "two")]), SubmitOptions {
                voices,
                default_voice: Some("shimmer".to_string()),
                ..SubmitOptions::default()
            })
            .await
            .unwrap();
        orchestrator.shutdown().await;

        let merged = std::fs::read(store.task_dir(&task_id).join(MERGED_FILE_NAME)).unwrap();
        assert_eq!(merged, b"[echo:one][shimmer:two]");
    }

    #[tokio::test]
    async fn invalid_script_creates_no_task() {
        let dir = tempfile::tempdir().unwrap();
        let (orchestrator, store) = orchestrator(dir.path(), &[]).await;

        let err = orchestrator.submit(script(&[]), SubmitOptions::default()).await.unwrap_err();

        assert!(matches!(err, SubmitError::InvalidScript(ScriptError::Empty)));
        assert!(store.list().is_empty());
    }

    #[test]
    fn segment_progress_never_reaches_100() {
        assert_eq!(segment_progress(0, 4), 0);
        assert_eq!(segment_progress(1, 4), 25);
        assert_eq!(segment_progress(3, 4), 75);
        assert_eq!(segment_progress(199, 200), 99);
        assert_eq!(segment_progress(0, 0), 0);
    }
}
