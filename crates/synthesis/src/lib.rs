//! Script-to-audio synthesis pipeline
//!
//! Turns a multi-speaker script into per-segment audio clips, merges the
//! clips into a single podcast file, and tracks task state on disk so
//! progress survives restarts.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod error;
mod merge;
mod pipeline;
mod runner;
mod script;
mod segment;
mod store;
mod task;
mod voice;

pub use error::{MergeError, ScriptError, SegmentError, StoreError, SubmitError};
pub use merge::MERGED_FILE_NAME;
pub use pipeline::{Orchestrator, SubmitOptions};
pub use runner::PipelineRunner;
pub use script::{Script, ScriptLine};
pub use segment::SpeechSource;
pub use store::TaskStore;
pub use task::{TaskPatch, TaskState, TaskStatus};
pub use voice::VoiceResolver;
