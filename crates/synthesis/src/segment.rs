use std::path::{Path, PathBuf};

use async_trait::async_trait;
use speech::{SpeechClient, SpeechClip, SpeechRequest};

use crate::error::SegmentError;

/// Source of synthesized audio clips
///
/// The production implementation is the provider-routing `SpeechClient`;
/// pipeline tests substitute their own.
#[async_trait]
pub trait SpeechSource: Send + Sync {
    async fn synthesize(&self, request: SpeechRequest) -> speech::Result<SpeechClip>;
}

#[async_trait]
impl SpeechSource for SpeechClient {
    async fn synthesize(&self, request: SpeechRequest) -> speech::Result<SpeechClip> {
        SpeechClient::synthesize(self, request).await
    }
}

/// On-disk clip produced from one script line
#[derive(Debug, Clone)]
pub struct SegmentArtifact {
    /// 1-based position in the script
    pub index: usize,
    pub path: PathBuf,
}

pub fn segment_file_name(index: usize) -> String {
    format!("segment_{index}.mp3")
}

/// Synthesize one script line and write the clip into the task directory
///
/// On `Ok` the artifact file exists and holds the full, non-empty clip.
pub async fn synthesize_segment(
    speech: &dyn SpeechSource,
    request: SpeechRequest,
    work_dir: &Path,
    index: usize,
) -> Result<SegmentArtifact, SegmentError> {
    let clip = speech.synthesize(request).await?;

    if clip.audio.is_empty() {
        return Err(speech::SpeechError::EmptyAudio.into());
    }

    let path = work_dir.join(segment_file_name(index));
    tokio::fs::write(&path, &clip.audio).await.map_err(SegmentError::Write)?;

    Ok(SegmentArtifact { index, path })
}
