//! Unified parser trait for chat exports.
//!
//! This module provides a single entry point for turning raw export bytes
//! into canonical [`Message`]s.
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "whatsapp")]
//! # fn main() -> chatwindow::Result<()> {
//! use chatwindow::events::NullSink;
//! use chatwindow::parser::{Parser, SourceFormat, create_parser};
//!
//! let parser = create_parser(SourceFormat::WhatsApp)?;
//! let messages = parser.parse_bytes(b"01.01.2024, 10:00 - Alice: hi", &NullSink)?;
//! assert_eq!(messages[0].sender(), "Alice");
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "whatsapp"))]
//! # fn main() {}
//! ```
//!
//! # Format Selection
//!
//! Use [`SourceFormat`] to select parsers dynamically, or
//! [`SourceFormat::detect`] to sniff the format from the content:
//!
//! ```rust
//! use chatwindow::parser::SourceFormat;
//!
//! assert_eq!(SourceFormat::detect(b"{\"messages\": []}"), Some(SourceFormat::Telegram));
//! assert_eq!(SourceFormat::detect(b"01.01.2024, 10:00 - A: b"), Some(SourceFormat::WhatsApp));
//! assert_eq!(SourceFormat::detect(b"<html><body>"), None);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Message;
use crate::config::Encoding;
use crate::error::{ChatwindowError, Result};
use crate::events::EventSink;

/// Supported export formats.
///
/// # Example
///
/// ```rust
/// use chatwindow::parser::SourceFormat;
/// use std::str::FromStr;
///
/// assert_eq!(SourceFormat::from_str("telegram").unwrap(), SourceFormat::Telegram);
///
/// // Aliases are supported
/// assert_eq!(SourceFormat::from_str("wa").unwrap(), SourceFormat::WhatsApp);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Telegram Desktop JSON export
    #[serde(alias = "tg")]
    Telegram,

    /// WhatsApp plain-text export
    #[serde(alias = "wa")]
    WhatsApp,
}

impl SourceFormat {
    /// Returns the label used in errors and events.
    pub const fn label(self) -> &'static str {
        match self {
            SourceFormat::Telegram => "Telegram JSON",
            SourceFormat::WhatsApp => "WhatsApp TXT",
        }
    }

    /// Returns the default file extension of this export format.
    pub fn default_extension(self) -> &'static str {
        match self {
            SourceFormat::Telegram => "json",
            SourceFormat::WhatsApp => "txt",
        }
    }

    /// Guesses the format from the content.
    ///
    /// Content starting with `{` or `[` is Telegram JSON, HTML exports are
    /// unsupported, anything else is treated as WhatsApp text. Returns `None`
    /// for HTML and for bytes that are not UTF-8.
    pub fn detect(bytes: &[u8]) -> Option<SourceFormat> {
        let text = std::str::from_utf8(bytes).ok()?;
        let text = text.trim_start_matches('\u{FEFF}').trim_start();

        if text.starts_with('{') || text.starts_with('[') {
            return Some(SourceFormat::Telegram);
        }
        if text.to_ascii_lowercase().contains("<html") {
            return None;
        }
        Some(SourceFormat::WhatsApp)
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::Telegram => write!(f, "Telegram"),
            SourceFormat::WhatsApp => write!(f, "WhatsApp"),
        }
    }
}

impl std::str::FromStr for SourceFormat {
    type Err = ChatwindowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "telegram" | "tg" => Ok(SourceFormat::Telegram),
            "whatsapp" | "wa" => Ok(SourceFormat::WhatsApp),
            _ => Err(ChatwindowError::unsupported_format(s)),
        }
    }
}

/// Unified trait for parsing chat exports.
///
/// # Implementation Notes
///
/// Parsers must implement:
/// - [`name`](Parser::name) - Parser identifier
/// - [`format`](Parser::format) - Format this parser handles
/// - [`encoding`](Parser::encoding) - Encoding used to decode raw bytes
/// - [`parse_str`](Parser::parse_str) - Parse already-decoded text
///
/// [`parse_bytes`](Parser::parse_bytes) and [`parse`](Parser::parse) are
/// provided on top of those.
///
/// Messages come back in file order. Recoverable per-record problems are
/// reported to the sink; only terminal failures become errors.
pub trait Parser: Send + Sync {
    /// Returns the human-readable name of this parser.
    ///
    /// # Example
    ///
    /// ```rust
    /// # #[cfg(feature = "telegram")]
    /// # fn main() {
    /// use chatwindow::parser::Parser;
    /// use chatwindow::parsers::TelegramParser;
    ///
    /// let parser = TelegramParser::new();
    /// assert_eq!(parser.name(), "Telegram");
    /// # }
    /// # #[cfg(not(feature = "telegram"))]
    /// # fn main() {}
    /// ```
    fn name(&self) -> &'static str;

    /// Returns the format this parser handles.
    fn format(&self) -> SourceFormat;

    /// Returns the encoding used by [`parse_bytes`](Parser::parse_bytes).
    fn encoding(&self) -> Encoding;

    /// Parses decoded export text.
    ///
    /// # Errors
    ///
    /// Returns the format's terminal errors: [`ChatwindowError::MalformedInput`],
    /// [`ChatwindowError::SchemaValidation`], [`ChatwindowError::EmptyInput`]
    /// or [`ChatwindowError::NoValidMessages`].
    fn parse_str(&self, content: &str, sink: &dyn EventSink) -> Result<Vec<Message>>;

    /// Decodes raw bytes with [`encoding`](Parser::encoding) and parses them.
    ///
    /// # Errors
    ///
    /// Returns [`ChatwindowError::Encoding`] on invalid byte sequences, plus
    /// anything [`parse_str`](Parser::parse_str) returns.
    fn parse_bytes(&self, bytes: &[u8], sink: &dyn EventSink) -> Result<Vec<Message>> {
        let content = crate::parsing::decode(bytes, self.encoding())?;
        self.parse_str(&content, sink)
    }

    /// Reads and parses an export file.
    fn parse(&self, path: &Path, sink: &dyn EventSink) -> Result<Vec<Message>> {
        let bytes = fs::read(path)?;
        self.parse_bytes(&bytes, sink)
    }
}

/// Creates a parser with default configuration for the given format.
///
/// # Example
///
/// ```rust
/// # #[cfg(feature = "telegram")]
/// # fn main() {
/// use chatwindow::parser::{SourceFormat, create_parser};
///
/// let parser = create_parser(SourceFormat::Telegram).unwrap();
/// assert_eq!(parser.name(), "Telegram");
/// # }
/// # #[cfg(not(feature = "telegram"))]
/// # fn main() {}
/// ```
///
/// # Errors
///
/// Returns [`ChatwindowError::UnsupportedFormat`] if the format's feature is
/// not enabled.
pub fn create_parser(format: SourceFormat) -> Result<Box<dyn Parser>> {
    match format {
        #[cfg(feature = "telegram")]
        SourceFormat::Telegram => Ok(Box::new(crate::parsers::TelegramParser::new())),
        #[cfg(feature = "whatsapp")]
        SourceFormat::WhatsApp => Ok(Box::new(crate::parsers::WhatsAppParser::new())),
        #[allow(unreachable_patterns)]
        _ => Err(ChatwindowError::unsupported_format(format.to_string())),
    }
}
