//! Sender anonymization.
//!
//! Every distinct sender gets an opaque code (`prefix + ordinal`) in order of
//! first appearance. The [`Codebook`] maps codes back to names and lives only
//! as long as the result it belongs to.
//!
//! # Example
//!
//! ```rust
//! use chatwindow::Message;
//! use chatwindow::core::anonymize::anonymize;
//! use chrono::{TimeZone, Utc};
//!
//! let ts = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
//! let messages = vec![
//!     Message::new("Alice", "hi", ts),
//!     Message::new("Bob", "hello", ts),
//!     Message::new("Alice!", "bye", ts),
//! ];
//!
//! let (messages, codebook) = anonymize(messages, "U");
//! assert_eq!(messages[0].sender(), "U0");
//! assert_eq!(messages[1].sender(), "U1");
//! assert_eq!(messages[2].sender(), "U0");
//! assert_eq!(codebook.name_for("U1"), Some("Bob"));
//! ```

use std::collections::HashMap;

use serde::ser::{Serialize, Serializer};

use crate::Message;
use crate::core::sanitize::normalize_name;

/// Returns the name a sender is known by after normalization.
///
/// Falls back to the trimmed raw name when normalization leaves nothing
/// (emoji-only names), so the result is never empty for a non-blank input.
pub fn canonical_name(raw: &str) -> String {
    let normalized = normalize_name(raw);
    if normalized.is_empty() {
        raw.trim().to_string()
    } else {
        normalized
    }
}

/// Bidirectional mapping between opaque codes and sender names.
///
/// Serializes as a `{code: name}` object in assignment order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Codebook {
    prefix: String,
    /// (code, name) in assignment order
    entries: Vec<(String, String)>,
    by_name: HashMap<String, usize>,
}

impl Codebook {
    /// Creates an empty codebook issuing codes with `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            entries: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Returns the code for `name`, assigning the next one if it is new.
    pub fn assign(&mut self, name: &str) -> &str {
        let position = match self.by_name.get(name).copied() {
            Some(position) => position,
            None => {
                let position = self.entries.len();
                let code = format!("{}{}", self.prefix, position);
                self.entries.push((code, name.to_string()));
                self.by_name.insert(name.to_string(), position);
                position
            }
        };
        &self.entries[position].0
    }

    /// Returns the code assigned to `name`.
    pub fn code_for(&self, name: &str) -> Option<&str> {
        self.by_name
            .get(name)
            .map(|&position| self.entries[position].0.as_str())
    }

    /// Returns the name behind `code`.
    pub fn name_for(&self, code: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, name)| name.as_str())
    }

    /// Iterates `(code, name)` pairs in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(code, name)| (code.as_str(), name.as_str()))
    }

    /// Returns the prefix used for codes.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the number of coded senders.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no sender has been coded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Codebook {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// Replaces every sender with its code.
///
/// Names are compared after [`canonical_name`], so `"Alice"` and `"Alice!"`
/// share a code. Codes follow the order of `messages`.
pub fn anonymize(messages: Vec<Message>, prefix: &str) -> (Vec<Message>, Codebook) {
    let mut codebook = Codebook::new(prefix);
    let messages = messages
        .into_iter()
        .map(|mut msg| {
            let name = canonical_name(msg.sender());
            msg.sender = codebook.assign(&name).to_string();
            msg
        })
        .collect();
    (messages, codebook)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn msg(sender: &str) -> Message {
        Message::new(sender, "text", Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_canonical_name() {
        assert_eq!(canonical_name("  Alice! "), "Alice");
        assert_eq!(canonical_name(" 🚀🚀 "), "🚀🚀");
        assert_eq!(canonical_name("Иван   Петров"), "Иван Петров");
    }

    #[test]
    fn test_codebook_assign_is_stable() {
        let mut codebook = Codebook::new("У");
        assert_eq!(codebook.assign("Alice"), "У0");
        assert_eq!(codebook.assign("Bob"), "У1");
        assert_eq!(codebook.assign("Alice"), "У0");
        assert_eq!(codebook.len(), 2);
        assert_eq!(codebook.code_for("Bob"), Some("У1"));
        assert_eq!(codebook.name_for("У0"), Some("Alice"));
        assert_eq!(codebook.name_for("У9"), None);
    }

    #[test]
    fn test_anonymize_first_appearance_order() {
        let (messages, codebook) =
            anonymize(vec![msg("Carol"), msg("Alice"), msg("Carol"), msg("Bob")], "У");

        let senders: Vec<_> = messages.iter().map(Message::sender).collect();
        assert_eq!(senders, vec!["У0", "У1", "У0", "У2"]);

        let pairs: Vec<_> = codebook.iter().collect();
        assert_eq!(pairs, vec![("У0", "Carol"), ("У1", "Alice"), ("У2", "Bob")]);
    }

    #[test]
    fn test_anonymize_merges_normalized_names() {
        let (messages, codebook) = anonymize(vec![msg("Alice"), msg("Alice :)")], "P");
        assert_eq!(messages[0].sender(), messages[1].sender());
        assert_eq!(codebook.len(), 1);
    }

    #[test]
    fn test_anonymize_empty() {
        let (messages, codebook) = anonymize(Vec::new(), "У");
        assert!(messages.is_empty());
        assert!(codebook.is_empty());
    }

    #[test]
    fn test_codebook_serialize_in_order() {
        let mut codebook = Codebook::new("U");
        codebook.assign("Zed");
        codebook.assign("Amy");
        let json = serde_json::to_string(&codebook).unwrap();
        assert_eq!(json, r#"{"U0":"Zed","U1":"Amy"}"#);
    }
}
