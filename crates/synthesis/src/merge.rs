use std::path::{Path, PathBuf};

use crate::{error::MergeError, segment::SegmentArtifact};

/// Well-known name of the merged audio inside a task directory
pub const MERGED_FILE_NAME: &str = "mixed_audio.mp3";

/// Assumed provider output bitrate, 128 kbit/s CBR
const MP3_BYTES_PER_SECOND: u64 = 16_000;

/// The merged podcast file
#[derive(Debug)]
pub struct MergedOutput {
    pub path: PathBuf,
    pub bytes: u64,
    pub merged_segments: usize,
}

/// Concatenate segment clips, in index order, into the merged audio file
///
/// Ordering follows the artifacts' index fields, so `segment_10` lands
/// after `segment_9`. A clip that can no longer be read is logged and
/// skipped; ending up with nothing to merge is an error.
pub async fn merge_segments(
    work_dir: &Path,
    mut artifacts: Vec<SegmentArtifact>,
) -> Result<MergedOutput, MergeError> {
    artifacts.sort_by_key(|artifact| artifact.index);

    let mut audio = Vec::new();
    let mut merged_segments = 0;

    for artifact in &artifacts {
        match tokio::fs::read(&artifact.path).await {
            Ok(clip) => {
                audio.extend_from_slice(&clip);
                merged_segments += 1;
            }
            Err(e) => {
                tracing::warn!("Skipping unreadable segment {}: {e}", artifact.path.display());
            }
        }
    }

    if merged_segments == 0 {
        return Err(MergeError::NoSegments);
    }

    let path = work_dir.join(MERGED_FILE_NAME);
    tokio::fs::write(&path, &audio).await.map_err(MergeError::Write)?;

    // Merged output is world-readable
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let perms = std::fs::Permissions::from_mode(0o644);
        tokio::fs::set_permissions(&path, perms).await.map_err(MergeError::Write)?;
    }

    let bytes = tokio::fs::metadata(&path).await.map_err(MergeError::Write)?.len();

    tracing::debug!("Merged {merged_segments} segment(s) into {} ({bytes} bytes)", path.display());

    Ok(MergedOutput { path, bytes, merged_segments })
}

/// Estimated play length of an MP3 of the given size
pub const fn estimated_duration_secs(bytes: u64) -> u64 {
    bytes / MP3_BYTES_PER_SECOND
}
