//! Unified error types for chatwindow.
//!
//! This module provides a single [`ChatwindowError`] enum that covers every
//! terminal failure of a pipeline invocation. The set is closed: each failure
//! path of the library maps to exactly one named variant, and none of them is
//! retried internally.
//!
//! # Error Handling Philosophy
//!
//! - **Library users** get typed errors they can match on
//! - **Application users** get clear, actionable error messages
//! - **Per-record problems** (one bad line, one bad date) never show up here;
//!   parsers skip those records and report them through
//!   [`EventSink`](crate::events::EventSink)

use std::io;

use thiserror::Error;

/// A specialized [`Result`] type for chatwindow operations.
///
/// # Example
///
/// ```rust
/// use chatwindow::error::Result;
/// use chatwindow::Message;
///
/// fn my_function() -> Result<Vec<Message>> {
///     // ... operations that may fail
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatwindowError>;

/// The error type for all chatwindow operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatwindowError {
    /// The input bytes are not valid in the requested text encoding.
    #[error("Input is not valid {encoding}: {message}")]
    Encoding {
        /// Label of the encoding that was used for decoding
        encoding: &'static str,
        /// Decoder diagnostic (byte offset, etc.)
        message: String,
    },

    /// The input could not be parsed at all (JSON syntax error), or a record
    /// was malformed while per-record recovery was disabled.
    #[error("Malformed {format} input: {source}")]
    MalformedInput {
        /// The format being parsed (e.g., "Telegram JSON", "WhatsApp TXT")
        format: &'static str,
        /// The underlying parse error
        #[source]
        source: ParseErrorKind,
    },

    /// The parsed document does not match the export's structural schema.
    ///
    /// Only the first violation is reported.
    #[error("Schema validation failed at {path}: {message}")]
    SchemaValidation {
        /// JSON path of the offending value (e.g. `messages[3].date`)
        path: String,
        /// What was expected at that path
        message: String,
    },

    /// The decoded input is empty.
    #[error("{format} input is empty")]
    EmptyInput {
        /// The format being parsed
        format: &'static str,
    },

    /// Every record of the input was skipped.
    #[error("No valid messages found in {format} input ({skipped} records skipped)")]
    NoValidMessages {
        /// The format being parsed
        format: &'static str,
        /// Number of records that were skipped
        skipped: usize,
    },

    /// The requested source format is unknown or not compiled in.
    #[error("Unsupported source format: '{format}'. Expected one of: telegram, whatsapp")]
    UnsupportedFormat {
        /// The format that was requested
        format: String,
    },

    /// No message survived the sender and date filters.
    #[error("No messages left after filtering")]
    EmptyResult,

    /// The most recent surviving message alone exceeds the token budget.
    #[error("Token budget of {budget} is too small: the most recent message needs {required} tokens")]
    BudgetTooSmall {
        /// The budget the caller asked for
        budget: usize,
        /// The cost of the most recent renderable message
        required: usize,
    },

    /// An I/O error occurred while reading the export.
    ///
    /// Only the byte-read helpers ([`Parser::parse`](crate::parser::Parser::parse)
    /// and the CLI) produce this; the pipeline itself works on bytes in memory.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Invalid date string in caller-supplied options.
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// The tokenizer table could not be loaded.
    #[error("Failed to load tokenizer: {0}")]
    Tokenizer(String),
}

/// Kinds of parse errors that can occur.
#[derive(Debug, Error)]
pub enum ParseErrorKind {
    /// JSON syntax error
    #[cfg(feature = "telegram")]
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    /// Record-level pattern mismatch
    #[error("{0}")]
    Pattern(String),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatwindowError {
    /// Creates an encoding error.
    pub fn encoding(encoding: &'static str, message: impl Into<String>) -> Self {
        ChatwindowError::Encoding {
            encoding,
            message: message.into(),
        }
    }

    /// Creates a malformed-input error for Telegram JSON syntax errors.
    #[cfg(feature = "telegram")]
    pub fn telegram_parse(source: serde_json::Error) -> Self {
        ChatwindowError::MalformedInput {
            format: "Telegram JSON",
            source: ParseErrorKind::Json(source),
        }
    }

    /// Creates a malformed-input error for a record that failed its pattern.
    pub fn malformed_record(format: &'static str, message: impl Into<String>) -> Self {
        ChatwindowError::MalformedInput {
            format,
            source: ParseErrorKind::Pattern(message.into()),
        }
    }

    /// Creates a schema validation error.
    pub fn schema(path: impl Into<String>, message: impl Into<String>) -> Self {
        ChatwindowError::SchemaValidation {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates an unsupported format error.
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        ChatwindowError::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        ChatwindowError::InvalidDate {
            input: input.into(),
            expected: "YYYY-MM-DD",
        }
    }

    /// Returns `true` if this is an encoding error.
    pub fn is_encoding(&self) -> bool {
        matches!(self, ChatwindowError::Encoding { .. })
    }

    /// Returns `true` if this is a malformed-input error.
    pub fn is_malformed(&self) -> bool {
        matches!(self, ChatwindowError::MalformedInput { .. })
    }

    /// Returns `true` if this is a schema validation error.
    pub fn is_schema(&self) -> bool {
        matches!(self, ChatwindowError::SchemaValidation { .. })
    }

    /// Returns `true` if the input was empty or contained no usable message.
    pub fn is_no_input(&self) -> bool {
        matches!(
            self,
            ChatwindowError::EmptyInput { .. } | ChatwindowError::NoValidMessages { .. }
        )
    }

    /// Returns `true` if the budget could not fit a single message.
    pub fn is_budget_too_small(&self) -> bool {
        matches!(self, ChatwindowError::BudgetTooSmall { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_display() {
        let err = ChatwindowError::encoding("UTF-8", "invalid byte at offset 3");
        let display = err.to_string();
        assert!(display.contains("UTF-8"));
        assert!(display.contains("offset 3"));
        assert!(err.is_encoding());
    }

    #[cfg(feature = "telegram")]
    #[test]
    fn test_telegram_parse_constructor() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid").unwrap_err();
        let err = ChatwindowError::telegram_parse(json_err);
        assert!(err.is_malformed());
        assert!(err.to_string().contains("Telegram JSON"));
    }

    #[test]
    fn test_malformed_record_constructor() {
        let err = ChatwindowError::malformed_record("WhatsApp TXT", "record 4 does not match");
        assert!(err.is_malformed());
        let display = err.to_string();
        assert!(display.contains("WhatsApp TXT"));
        assert!(display.contains("record 4"));
    }

    #[test]
    fn test_schema_display() {
        let err = ChatwindowError::schema("messages[2].id", "expected integer");
        assert!(err.is_schema());
        let display = err.to_string();
        assert!(display.contains("messages[2].id"));
        assert!(display.contains("expected integer"));
    }

    #[test]
    fn test_no_input_predicates() {
        let empty = ChatwindowError::EmptyInput {
            format: "WhatsApp TXT",
        };
        assert!(empty.is_no_input());
        assert!(empty.to_string().contains("empty"));

        let none = ChatwindowError::NoValidMessages {
            format: "WhatsApp TXT",
            skipped: 7,
        };
        assert!(none.is_no_input());
        assert!(none.to_string().contains('7'));
    }

    #[test]
    fn test_budget_too_small_display() {
        let err = ChatwindowError::BudgetTooSmall {
            budget: 5,
            required: 12,
        };
        assert!(err.is_budget_too_small());
        let display = err.to_string();
        assert!(display.contains('5'));
        assert!(display.contains("12"));
    }

    #[test]
    fn test_unsupported_format_display() {
        let err = ChatwindowError::unsupported_format("instagram");
        assert!(err.to_string().contains("instagram"));
    }

    #[test]
    fn test_invalid_date_display() {
        let err = ChatwindowError::invalid_date("not-a-date");
        let display = err.to_string();
        assert!(display.contains("not-a-date"));
        assert!(display.contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_from_io_error() {
        use std::error::Error;
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: ChatwindowError = io_err.into();
        assert!(err.to_string().contains("IO error"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_parse_error_kind_source_chain() {
        use std::error::Error;
        let err = ChatwindowError::malformed_record("WhatsApp TXT", "bad");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_error_debug() {
        let err = ChatwindowError::EmptyResult;
        let debug = format!("{:?}", err);
        assert!(debug.contains("EmptyResult"));
    }
}
