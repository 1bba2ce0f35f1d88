//! Configuration for the background focus holder

use serde::{Deserialize, Serialize};

/// Event and directive types the holder reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusHolderConfig {
    /// Outbound event types that keep focus until sent
    #[serde(default = "default_focus_targets")]
    pub focus_targets: Vec<String>,

    /// Directive types that keep focus until an unrelated directive arrives
    #[serde(default = "default_pending_targets")]
    pub pending_targets: Vec<String>,
}

impl Default for FocusHolderConfig {
    fn default() -> Self {
        Self {
            focus_targets: default_focus_targets(),
            pending_targets: default_pending_targets(),
        }
    }
}

fn default_focus_targets() -> Vec<String> {
    vec![
        "TTS.SpeechFinished".to_string(),
        "AudioPlayer.PlaybackFinished".to_string(),
        "MediaPlayer.PlaySuspended".to_string(),
    ]
}

fn default_pending_targets() -> Vec<String> {
    vec!["ASR.NotifyResult".to_string()]
}
