use serde::{Deserialize, Serialize};

/// Who contributed a context entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextType {
    /// Device/client-wide state
    Client,
    /// State owned by one capability agent
    Capability,
}

/// One provider's contribution to a context snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextInfo {
    pub context_type: ContextType,
    /// Capability namespace or client key (e.g. `"TTS"`)
    pub name: String,
    pub payload: serde_json::Value,
}

impl ContextInfo {
    pub fn new(context_type: ContextType, name: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            context_type,
            name: name.into(),
            payload,
        }
    }

    pub fn client(name: impl Into<String>, payload: serde_json::Value) -> Self {
        Self::new(ContextType::Client, name, payload)
    }

    pub fn capability(name: impl Into<String>, payload: serde_json::Value) -> Self {
        Self::new(ContextType::Capability, name, payload)
    }
}
