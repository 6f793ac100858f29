//! Per-request context handed to every guardrail check

use std::collections::HashMap;

use serde_json::Value;

use crate::text_extractor::extract_last_user_message;

/// Immutable per-request value built once per intercepted request
#[derive(Debug, Clone)]
pub struct GuardrailContext {
    /// Decoded JSON request body, arbitrary shape
    pub body: Value,
    /// Candidate strings extracted from the body, most relevant first
    pub text_candidates: Vec<String>,
    /// Auxiliary signals from the transport (e.g. client ip)
    pub metadata: HashMap<String, String>,
}

impl GuardrailContext {
    /// Build a context from a decoded request body, extracting the newest
    /// user text as check candidates
    pub fn from_body(body: Value, metadata: HashMap<String, String>) -> Self {
        let text_candidates = extract_last_user_message(&body);
        Self {
            body,
            text_candidates,
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_body_extracts_candidates() {
        let body = json!({
            "messages": [{"role": "user", "content": "check my balance"}]
        });
        let context = GuardrailContext::from_body(body.clone(), HashMap::new());
        assert_eq!(context.text_candidates, vec!["check my balance"]);
        assert_eq!(context.body, body);
    }

    #[test]
    fn test_metadata_is_preserved() {
        let mut metadata = HashMap::new();
        metadata.insert("ip".to_string(), "127.0.0.1".to_string());
        let context = GuardrailContext::from_body(json!({}), metadata);
        assert_eq!(context.metadata.get("ip").map(String::as_str), Some("127.0.0.1"));
    }
}
