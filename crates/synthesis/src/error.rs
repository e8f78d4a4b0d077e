use thiserror::Error;

/// Script validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    /// Script contains no dialogue lines
    #[error("script has no segments")]
    Empty,

    /// A dialogue line has no text after trimming whitespace
    #[error("segment {index} has no text")]
    BlankSegment { index: usize },
}

/// Errors returned when a synthesis task cannot be accepted
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    InvalidScript(#[from] ScriptError),

    #[error("task '{0}' already exists")]
    TaskExists(String),

    #[error("failed to prepare task workspace: {0}")]
    Workspace(std::io::Error),
}

impl From<StoreError> for SubmitError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::TaskExists(id) => Self::TaskExists(id),
            StoreError::Io(e) => Self::Workspace(e),
            StoreError::Serialize(e) => Self::Workspace(std::io::Error::other(e)),
        }
    }
}

/// Errors from synthesizing a single script segment
#[derive(Debug, Error)]
pub enum SegmentError {
    #[error(transparent)]
    Speech(#[from] speech::SpeechError),

    #[error("failed to write segment audio: {0}")]
    Write(std::io::Error),
}

/// Errors from merging segment clips into the final audio file
#[derive(Debug, Error)]
pub enum MergeError {
    /// Every segment failed or produced unreadable audio
    #[error("no segments to merge")]
    NoSegments,

    #[error("failed to write merged audio: {0}")]
    Write(std::io::Error),
}

/// Task store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("task '{0}' already exists")]
    TaskExists(String),

    #[error("failed to serialize task state: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
