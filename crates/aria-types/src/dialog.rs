use serde::{Deserialize, Serialize};

/// Conversational state reported by the dialog-state tracker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogState {
    #[default]
    Idle,
    Listening,
    Recognizing,
    Thinking,
    Speaking,
    /// Waiting for a follow-up utterance after a prompt
    ExpectingSpeech,
}

impl DialogState {
    pub fn is_idle(self) -> bool {
        matches!(self, DialogState::Idle)
    }
}

impl std::fmt::Display for DialogState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DialogState::Idle => "idle",
            DialogState::Listening => "listening",
            DialogState::Recognizing => "recognizing",
            DialogState::Thinking => "thinking",
            DialogState::Speaking => "speaking",
            DialogState::ExpectingSpeech => "expecting_speech",
        };
        f.write_str(name)
    }
}
