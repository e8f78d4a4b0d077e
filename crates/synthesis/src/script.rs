use serde::Deserialize;

use crate::error::ScriptError;

/// One dialogue line of a script
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptLine {
    /// Speaker label, resolved to a voice id at synthesis time
    pub speaker: String,
    /// Text to synthesize
    pub text: String,
}

/// A multi-speaker script submitted for synthesis
///
/// Unknown fields are tolerated so clients may attach their own
/// per-line metadata without breaking submission.
#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub speakers: Vec<String>,
    pub content: Vec<ScriptLine>,
}

impl Script {
    /// Check that the script is synthesizable
    ///
    /// Segment indices in errors are 1-based, matching segment file names.
    pub fn validate(&self) -> Result<(), ScriptError> {
        if self.content.is_empty() {
            return Err(ScriptError::Empty);
        }

        for (i, line) in self.content.iter().enumerate() {
            if line.text.trim().is_empty() {
                return Err(ScriptError::BlankSegment { index: i + 1 });
            }
        }

        Ok(())
    }
}
