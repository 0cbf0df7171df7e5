//! Whole-chat summary, computed before any window is built.
//!
//! Callers use it to show who took part in a chat and how large it is, so a
//! user can pick senders to exclude and a sensible budget.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::Message;
use crate::core::anonymize::canonical_name;
use crate::core::sanitize::sanitize;
use crate::core::tokens::TokenCounter;
use crate::core::window::render_line;

/// Summary of a parsed chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatOverview {
    /// Normalized participant names in order of first appearance.
    pub participants: Vec<String>,
    /// Earliest message time, `None` for an empty chat.
    pub first_timestamp: Option<DateTime<Utc>>,
    /// Latest message time, `None` for an empty chat.
    pub last_timestamp: Option<DateTime<Utc>>,
    /// Number of parsed messages, empty ones included.
    pub message_count: usize,
    /// Token cost of rendering every non-empty message with plain names.
    pub token_count: usize,
}

/// Summarizes `messages` without filtering or truncating them.
///
/// # Example
///
/// ```rust
/// use chatwindow::Message;
/// use chatwindow::core::overview::overview;
/// use chatwindow::core::tokens::HeuristicCounter;
/// use chrono::{TimeZone, Utc};
///
/// let ts = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
/// let messages = vec![
///     Message::new("Bob!", "hi", ts),
///     Message::new("Alice", "hello", ts),
///     Message::new("Bob", "bye", ts),
/// ];
///
/// let summary = overview(&messages, &HeuristicCounter);
/// assert_eq!(summary.participants, vec!["Bob", "Alice"]);
/// assert_eq!(summary.message_count, 3);
/// ```
pub fn overview(messages: &[Message], counter: &dyn TokenCounter) -> ChatOverview {
    let mut participants: Vec<String> = Vec::new();
    let mut token_count = 0;

    for msg in messages {
        let name = canonical_name(msg.sender());
        let text = sanitize(msg.content());
        if !text.is_empty() {
            token_count += counter.count(&render_line(&name, &text, msg.timestamp(), false));
        }
        if !participants.contains(&name) {
            participants.push(name);
        }
    }

    ChatOverview {
        participants,
        first_timestamp: messages.iter().map(Message::timestamp).min(),
        last_timestamp: messages.iter().map(Message::timestamp).max(),
        message_count: messages.len(),
        token_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tokens::HeuristicCounter;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 8, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_overview_span_and_participants() {
        let messages = vec![
            Message::new("Карина", "утро", at(9)),
            Message::new("Oleg", "later", at(18)),
            Message::new("Карина", "earlier but later in file", at(7)),
        ];
        let summary = overview(&messages, &HeuristicCounter);

        assert_eq!(summary.participants, vec!["Карина", "Oleg"]);
        assert_eq!(summary.first_timestamp, Some(at(7)));
        assert_eq!(summary.last_timestamp, Some(at(18)));
        assert_eq!(summary.message_count, 3);
    }

    #[test]
    fn test_overview_token_count_skips_empty() {
        let messages = vec![
            Message::new("Al", "abcd", at(1)), // "Al: abcd\n" = 9 chars -> 3
            Message::new("Al", "<br>", at(2)),
        ];
        let summary = overview(&messages, &HeuristicCounter);
        assert_eq!(summary.token_count, 3);
    }

    #[test]
    fn test_overview_empty() {
        let summary = overview(&[], &HeuristicCounter);
        assert!(summary.participants.is_empty());
        assert_eq!(summary.first_timestamp, None);
        assert_eq!(summary.token_count, 0);
    }
}
