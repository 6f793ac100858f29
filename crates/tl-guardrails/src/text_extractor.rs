//! Extract inspectable text from a chat request JSON body

use serde_json::Value;

/// Keys whose string values the deep-scan fallback collects
const TEXT_KEYS: [&str; 4] = ["message", "content", "query", "text"];

/// Extract only the content of the most recent user-authored message.
///
/// Scanning stops after the first user message found from the end, so
/// guardrails never re-trigger on conversation history.
///
/// - String content yields a one-element vector
/// - Content-part arrays yield the `text` field of each part that has one
/// - A body without a `messages` array (or with an empty one) falls back to
///   [`extract_text_from_json`]
///
/// Type mismatches anywhere are treated as absence, never as errors.
pub fn extract_last_user_message(body: &Value) -> Vec<String> {
    let messages = match body.get("messages").and_then(|m| m.as_array()) {
        Some(messages) if !messages.is_empty() => messages,
        // Request shapes vary across integrations; degrade to a generic scan
        // rather than silently returning nothing.
        _ => return extract_text_from_json(body),
    };

    for msg in messages.iter().rev() {
        if msg.get("role").and_then(|r| r.as_str()) != Some("user") {
            continue;
        }
        return match msg.get("content") {
            Some(Value::String(content)) => vec![content.clone()],
            Some(Value::Array(parts)) => parts
                .iter()
                .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };
    }

    Vec::new()
}

/// Deep search for any text-like fields in a JSON value.
///
/// Collects every string value found directly under one of [`TEXT_KEYS`]
/// anywhere in the structure, in pre-order discovery sequence.
pub fn extract_text_from_json(value: &Value) -> Vec<String> {
    let mut texts = Vec::new();
    collect_text_fields(value, &mut texts);
    texts
}

fn collect_text_fields(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                match child {
                    Value::String(text) if TEXT_KEYS.contains(&key.as_str()) => {
                        out.push(text.clone());
                    }
                    _ => collect_text_fields(child, out),
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_text_fields(item, out);
            }
        }
        _ => {}
    }
}
