//! Namespace-based payload redaction.
//!
//! Capabilities outside the caller's namespace only report their interface
//! version, which keeps context uploads small.

use aria_types::{ContextInfo, ContextType};
use serde_json::Value;

const VERSION_KEY: &str = "version";

/// Strip `info` down to its version unless it is client context or belongs
/// to `namespace`. Non-object payloads pass through untouched.
pub fn redact_for_namespace(info: ContextInfo, namespace: &str) -> ContextInfo {
    if info.context_type == ContextType::Client || info.name == namespace {
        return info;
    }

    let ContextInfo {
        context_type,
        name,
        payload,
    } = info;
    let payload = match payload {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(key, _)| key == VERSION_KEY)
                .collect(),
        ),
        other => other,
    };

    ContextInfo {
        context_type,
        name,
        payload,
    }
}
