use serde::{Deserialize, Serialize};

/// Focus state delivered by the focus arbiter to a channel delegate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusState {
    /// The channel holds no focus.
    #[default]
    #[serde(rename = "none")]
    Nothing,
    Background,
    Foreground,
}

/// Priority class a delegate registers with at the focus arbiter.
///
/// Ordered from most to least important; how the arbiter resolves
/// competing requests is up to the arbiter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusChannelPriority {
    Call,
    Alert,
    Recognition,
    Dialog,
    Media,
    Background,
}

impl std::fmt::Display for FocusState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FocusState::Nothing => f.write_str("none"),
            FocusState::Background => f.write_str("background"),
            FocusState::Foreground => f.write_str("foreground"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_state_wire_names() {
        assert_eq!(serde_json::to_string(&FocusState::Nothing).unwrap(), "\"none\"");
        assert_eq!(
            serde_json::from_str::<FocusState>("\"foreground\"").unwrap(),
            FocusState::Foreground
        );
    }

    #[test]
    fn background_is_lowest_priority() {
        assert!(FocusChannelPriority::Call < FocusChannelPriority::Background);
        assert!(FocusChannelPriority::Media < FocusChannelPriority::Background);
    }
}
