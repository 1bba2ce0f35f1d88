use serde::{Deserialize, Serialize};

/// Lifecycle position of a streaming exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AsyncKeyState {
    Start,
    Ongoing,
    End,
}

/// Correlation record attached to a streaming exchange.
///
/// Decoded once from the wire and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsyncKey {
    pub event_dialog_request_id: String,
    pub state: AsyncKeyState,
    pub routing: String,
}

impl AsyncKey {
    pub fn is_final(&self) -> bool {
        self.state == AsyncKeyState::End
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_wire_format() {
        let key: AsyncKey = serde_json::from_str(
            r#"{"eventDialogRequestId":"d-1","state":"ONGOING","routing":"route-a"}"#,
        )
        .unwrap();
        assert_eq!(key.event_dialog_request_id, "d-1");
        assert_eq!(key.state, AsyncKeyState::Ongoing);
        assert_eq!(key.routing, "route-a");
        assert!(!key.is_final());
    }

    #[test]
    fn rejects_unknown_state() {
        let result = serde_json::from_str::<AsyncKey>(
            r#"{"eventDialogRequestId":"d-1","state":"PAUSED","routing":"r"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn end_state_is_final() {
        let key = AsyncKey {
            event_dialog_request_id: "d-2".into(),
            state: AsyncKeyState::End,
            routing: "r".into(),
        };
        assert!(key.is_final());
    }
}
