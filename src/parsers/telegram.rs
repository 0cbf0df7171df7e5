//! Telegram JSON export parser.

use crate::Message;
use crate::config::{Encoding, TelegramConfig};
use crate::error::{ChatwindowError, Result};
use crate::events::EventSink;
use crate::parser::{Parser, SourceFormat};
use crate::parsing::SkipLog;
use crate::parsing::telegram::{FORMAT, Record, convert_record, validate_export};

/// Parser for Telegram JSON exports.
///
/// The whole document is checked against the export schema before any
/// message is read; a violation fails the parse. Afterwards each element is
/// handled on its own: entries whose `type` is not `"message"` are ignored,
/// and message entries without a sender, with an unreadable date or with a
/// broken text segment are skipped and reported.
///
/// # Example
///
/// ```rust
/// use chatwindow::events::NullSink;
/// use chatwindow::parser::Parser;
/// use chatwindow::parsers::TelegramParser;
///
/// let json = r#"{"messages": [
///     {"id": 1, "type": "message", "date": "2024-01-15T10:30:00",
///      "from": "Alice", "from_id": "user1", "text": "Hello"}
/// ]}"#;
///
/// let messages = TelegramParser::new().parse_str(json, &NullSink)?;
/// assert_eq!(messages[0].sender(), "Alice");
/// # Ok::<(), chatwindow::ChatwindowError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct TelegramParser {
    config: TelegramConfig,
}

impl TelegramParser {
    /// Creates a new parser with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with custom configuration.
    pub fn with_config(config: TelegramConfig) -> Self {
        Self { config }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &TelegramConfig {
        &self.config
    }
}

impl Parser for TelegramParser {
    fn name(&self) -> &'static str {
        "Telegram"
    }

    fn format(&self) -> SourceFormat {
        SourceFormat::Telegram
    }

    fn encoding(&self) -> Encoding {
        self.config.encoding
    }

    fn parse_str(&self, content: &str, sink: &dyn EventSink) -> Result<Vec<Message>> {
        let doc: serde_json::Value =
            serde_json::from_str(content).map_err(ChatwindowError::telegram_parse)?;
        let elements = validate_export(&doc)?;

        let mut log = SkipLog::new(FORMAT, sink, self.config.skip_invalid);
        let mut messages = Vec::with_capacity(elements.len());

        for (index, element) in elements.iter().enumerate() {
            match convert_record(element, index) {
                Record::Message(message) => messages.push(message),
                Record::Ignored => {}
                Record::Skipped(reason) => log.skip(index, reason)?,
            }
        }

        log.finish(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::testing::RecordingSink;
    use crate::events::{Event, NullSink, SkipReason};

    const EXPORT: &str = r#"{
        "name": "Test chat",
        "messages": [
            {"id": 1, "type": "service", "date": "2024-01-15T10:00:00",
             "actor": "Alice", "actor_id": "user1", "action": "create_group", "text": ""},
            {"id": 2, "type": "message", "date": "2024-01-15T10:30:00",
             "from": "Alice", "from_id": "user1", "text": "Hello"},
            {"id": 3, "type": "message", "date": "2024-01-15T10:31:00",
             "from": "Bob", "from_id": 42,
             "text": ["See ", {"type": "link", "text": "https://example.com"}]},
            {"id": 4, "type": "message", "date": "not a date",
             "from": "Bob", "from_id": 42, "text": "lost"}
        ]
    }"#;

    #[test]
    fn test_parser_name() {
        let parser = TelegramParser::new();
        assert_eq!(parser.name(), "Telegram");
        assert_eq!(parser.format(), SourceFormat::Telegram);
        assert_eq!(parser.encoding(), Encoding::Utf8);
    }

    #[test]
    fn test_parse_export() {
        let sink = RecordingSink::default();
        let messages = TelegramParser::new().parse_str(EXPORT, &sink).unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender(), "Alice");
        assert_eq!(messages[0].index(), 1);
        assert_eq!(messages[1].sender_id(), Some("42"));
        assert_eq!(messages[1].content(), "See  https://example.com");

        let events = sink.events();
        assert!(events.contains(&Event::RecordSkipped {
            format: FORMAT,
            record: 3,
            reason: SkipReason::InvalidDate,
        }));
        assert!(events.contains(&Event::MessagesParsed {
            format: FORMAT,
            parsed: 2,
            skipped: 1,
        }));
    }

    #[test]
    fn test_parse_strict_mode() {
        let parser = TelegramParser::with_config(TelegramConfig::new().with_skip_invalid(false));
        let err = parser.parse_str(EXPORT, &NullSink).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = TelegramParser::new()
            .parse_str("{ not json", &NullSink)
            .unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_parse_schema_violation() {
        let err = TelegramParser::new()
            .parse_str(r#"{"chats": []}"#, &NullSink)
            .unwrap_err();
        assert!(err.is_schema());
    }

    #[test]
    fn test_parse_no_messages() {
        let err = TelegramParser::new()
            .parse_str(r#"{"messages": []}"#, &NullSink)
            .unwrap_err();
        assert!(matches!(
            err,
            ChatwindowError::NoValidMessages { skipped: 0, .. }
        ));
    }

    #[test]
    fn test_parse_bytes_utf16() {
        let bytes: Vec<u8> = EXPORT.encode_utf16().flat_map(u16::to_le_bytes).collect();
        let parser = TelegramParser::with_config(
            TelegramConfig::new().with_encoding(Encoding::Utf16Le),
        );
        let messages = parser.parse_bytes(&bytes, &NullSink).unwrap();
        assert_eq!(messages.len(), 2);
    }

    #[test]
    fn test_parse_bytes_wrong_encoding() {
        let err = TelegramParser::new()
            .parse_bytes(&[b'{', 0xC3, 0x28], &NullSink)
            .unwrap_err();
        assert!(err.is_encoding());
    }
}
