use remix_errors::ModelError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptSection {
    pub heading: String,
    pub visual_cue: String,
    pub audio_script: String,
}

/// Generated script. Sections are in playback order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    pub title: String,
    pub thumbnail_idea: String,
    pub sections: Vec<ScriptSection>,
}

impl Script {
    pub fn validated(self) -> Result<Self, ModelError> {
        if self.title.trim().is_empty() {
            return Err(ModelError::malformed("title is blank"));
        }
        if self.sections.is_empty() {
            return Err(ModelError::malformed("sections is empty"));
        }
        Ok(self)
    }

    /// Plain-text export used for copy/paste into an editor.
    pub fn to_plain_text(&self) -> String {
        self.sections
            .iter()
            .map(|s| {
                format!(
                    "[{}]\n(Visual: {})\nAudio: {}\n",
                    s.heading, s.visual_cue, s.audio_script
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
