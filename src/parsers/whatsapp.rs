//! WhatsApp TXT export parser.
//!
//! Handles the `DD.MM.YYYY, HH:MM - Sender: Message` export layout. Lines
//! that do not start a new dated record are continuation lines of the
//! previous message.

use crate::Message;
use crate::config::{Encoding, WhatsAppConfig};
use crate::error::{ChatwindowError, Result};
use crate::events::{EventSink, SkipReason};
use crate::parser::{Parser, SourceFormat};
use crate::parsing::SkipLog;
use crate::parsing::whatsapp::{FORMAT, convert_record, is_valid_record, split_records};

/// Parser for WhatsApp TXT exports.
///
/// # Example
///
/// ```rust
/// use chatwindow::events::NullSink;
/// use chatwindow::parser::Parser;
/// use chatwindow::parsers::WhatsAppParser;
///
/// let text = "01.01.2024, 10:00 - Alice: hi\n01.01.2024, 10:01 - Bob: hello";
/// let messages = WhatsAppParser::new().parse_str(text, &NullSink)?;
/// assert_eq!(messages.len(), 2);
/// # Ok::<(), chatwindow::ChatwindowError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct WhatsAppParser {
    config: WhatsAppConfig,
}

impl WhatsAppParser {
    /// Creates a new parser with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with custom configuration.
    pub fn with_config(config: WhatsAppConfig) -> Self {
        Self { config }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &WhatsAppConfig {
        &self.config
    }
}

impl Parser for WhatsAppParser {
    fn name(&self) -> &'static str {
        "WhatsApp"
    }

    fn format(&self) -> SourceFormat {
        SourceFormat::WhatsApp
    }

    fn encoding(&self) -> Encoding {
        self.config.encoding
    }

    fn parse_str(&self, content: &str, sink: &dyn EventSink) -> Result<Vec<Message>> {
        if content.is_empty() {
            return Err(ChatwindowError::EmptyInput { format: FORMAT });
        }

        let mut log = SkipLog::new(FORMAT, sink, self.config.skip_invalid);
        let mut messages = Vec::new();

        for (index, record) in split_records(content).iter().enumerate() {
            if record.is_empty() {
                continue;
            }
            if self.config.skip_system_messages && record.contains(self.config.system_marker) {
                log.skip(index, SkipReason::SystemMarker)?;
                continue;
            }
            if !is_valid_record(record) {
                log.skip(index, SkipReason::MalformedRecord)?;
                continue;
            }
            match convert_record(record, index) {
                Ok(message) => messages.push(message),
                Err(reason) => log.skip(index, reason)?,
            }
        }

        log.finish(messages)
    }
}
