//! Telegram JSON structure checks and record conversion.
//!
//! Telegram Desktop exports a chat as one JSON document:
//!
//! ```json
//! {
//!   "messages": [
//!     {"id": 1, "type": "message", "date": "2024-01-15T10:30:00",
//!      "from": "Alice", "from_id": "user123", "text": "Hello"},
//!     {"id": 2, "type": "service", "date": "2024-01-15T10:31:00",
//!      "actor": "Bob", "actor_id": "user456", "text": ""}
//!   ]
//! }
//! ```
//!
//! The document is first checked against the export schema as a whole, then
//! each element is converted on its own so that one bad record never aborts
//! the parse.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use crate::Message;
use crate::error::{ChatwindowError, Result};
use crate::events::SkipReason;
use crate::parser::SourceFormat;

/// Format label used in errors and events.
pub const FORMAT: &str = SourceFormat::Telegram.label();

const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// ============================================================================
// Schema validation
// ============================================================================

/// Checks the export against the Telegram schema.
///
/// Every element of `messages` needs an integer `id`, string `date` and
/// `type`, a `text` that is a string or a list of strings and objects, and a
/// `from`/`from_id` or `actor`/`actor_id` pair. Only the first violation is
/// reported.
pub fn validate_export(doc: &Value) -> Result<&[Value]> {
    let root = doc
        .as_object()
        .ok_or_else(|| ChatwindowError::schema("$", "expected an object"))?;

    let messages = root
        .get("messages")
        .ok_or_else(|| ChatwindowError::schema("messages", "required property is missing"))?
        .as_array()
        .ok_or_else(|| ChatwindowError::schema("messages", "expected an array"))?;

    for (i, element) in messages.iter().enumerate() {
        validate_element(element, i)?;
    }
    Ok(messages.as_slice())
}

fn validate_element(element: &Value, i: usize) -> Result<()> {
    let path = format!("messages[{i}]");
    let obj = element
        .as_object()
        .ok_or_else(|| ChatwindowError::schema(&path, "expected an object"))?;

    for key in ["id", "date", "type", "text"] {
        if !obj.contains_key(key) {
            return Err(ChatwindowError::schema(
                format!("{path}.{key}"),
                "required property is missing",
            ));
        }
    }

    if !(obj["id"].is_i64() || obj["id"].is_u64()) {
        return Err(ChatwindowError::schema(format!("{path}.id"), "expected integer"));
    }
    for key in ["date", "type"] {
        if !obj[key].is_string() {
            return Err(ChatwindowError::schema(format!("{path}.{key}"), "expected string"));
        }
    }
    validate_text(&obj["text"], &path)?;

    for key in ["from", "actor"] {
        if obj.get(key).is_some_and(|v| !v.is_string()) {
            return Err(ChatwindowError::schema(format!("{path}.{key}"), "expected string"));
        }
    }
    for key in ["from_id", "actor_id"] {
        if obj.get(key).is_some_and(|v| !is_identifier(v)) {
            return Err(ChatwindowError::schema(
                format!("{path}.{key}"),
                "expected integer or string",
            ));
        }
    }

    let has_pair = |name: &str, id: &str| obj.contains_key(name) && obj.contains_key(id);
    if !has_pair("from", "from_id") && !has_pair("actor", "actor_id") {
        return Err(ChatwindowError::schema(
            path,
            "expected either from/from_id or actor/actor_id",
        ));
    }
    Ok(())
}

fn validate_text(text: &Value, path: &str) -> Result<()> {
    match text {
        Value::String(_) => Ok(()),
        Value::Array(segments) => {
            for (j, segment) in segments.iter().enumerate() {
                if !(segment.is_string() || segment.is_object()) {
                    return Err(ChatwindowError::schema(
                        format!("{path}.text[{j}]"),
                        "expected string or object",
                    ));
                }
            }
            Ok(())
        }
        _ => Err(ChatwindowError::schema(
            format!("{path}.text"),
            "expected string or array",
        )),
    }
}

fn is_identifier(value: &Value) -> bool {
    value.is_string() || value.is_i64() || value.is_u64()
}

// ============================================================================
// Record conversion
// ============================================================================

/// Result of converting one schema-valid element.
#[derive(Debug, PartialEq)]
pub enum Record {
    /// A chat message.
    Message(Message),
    /// Not a `message` entry (service notices etc.); dropped silently.
    Ignored,
    /// A message entry that cannot become a [`Message`].
    Skipped(SkipReason),
}

/// Flattens Telegram's `text` field into one string.
///
/// A list is joined with single spaces, taking strings as-is and the `text`
/// of object segments. Returns `None` if an object segment has no string
/// `text`.
///
/// # Example
///
/// ```rust
/// use chatwindow::parsing::telegram::flatten_text;
/// use serde_json::json;
///
/// let text = json!(["Check", {"type": "link", "text": "https://example.com"}]);
/// assert_eq!(flatten_text(&text).as_deref(), Some("Check https://example.com"));
/// ```
pub fn flatten_text(text: &Value) -> Option<String> {
    match text {
        Value::String(s) => Some(s.clone()),
        Value::Array(segments) => {
            let parts = segments
                .iter()
                .map(|segment| match segment {
                    Value::String(s) => Some(s.as_str()),
                    Value::Object(obj) => obj.get("text").and_then(Value::as_str),
                    _ => None,
                })
                .collect::<Option<Vec<&str>>>()?;
            Some(parts.join(" "))
        }
        _ => None,
    }
}

/// Parses Telegram's local `date` field (`YYYY-MM-DDTHH:MM:SS`, no zone).
pub fn parse_date(date: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(date, DATE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Converts one schema-valid element at position `index` of `messages`.
pub fn convert_record(element: &Value, index: usize) -> Record {
    let Some(obj) = element.as_object() else {
        return Record::Skipped(SkipReason::MalformedRecord);
    };

    if obj.get("type").and_then(Value::as_str) != Some("message") {
        return Record::Ignored;
    }

    let Some(sender) = obj
        .get("from")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
    else {
        return Record::Skipped(SkipReason::MissingSender);
    };

    let Some(content) = obj.get("text").and_then(flatten_text) else {
        return Record::Skipped(SkipReason::MalformedSegment);
    };

    let Some(timestamp) = obj.get("date").and_then(Value::as_str).and_then(parse_date) else {
        return Record::Skipped(SkipReason::InvalidDate);
    };

    let mut message = Message::new(sender, content, timestamp).with_index(index);
    if let Some(sender_id) = identifier_text(obj, "from_id") {
        message = message.with_sender_id(sender_id);
    }
    if let Some(id) = obj.get("id").and_then(Value::as_u64) {
        message = message.with_id(id);
    }
    Record::Message(message)
}

fn identifier_text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
