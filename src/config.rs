//! Configuration types for parsers and the window builder.
//!
//! This module provides clean configuration structs for library usage,
//! without any CLI framework dependencies.
//!
//! - [`Encoding`] - Text encoding of the raw export bytes
//! - [`TelegramConfig`] - Telegram JSON export settings
//! - [`WhatsAppConfig`] - WhatsApp TXT export settings
//! - [`WindowOptions`] - Budget, anonymization and filter settings
//!
//! # Example
//!
//! ```rust
//! use chatwindow::config::WindowOptions;
//!
//! # fn main() -> chatwindow::Result<()> {
//! let options = WindowOptions::new(4000)
//!     .with_keep_dates(true)
//!     .with_excluded_sender("Bot")
//!     .with_start_date_str("2024-01-01")?;
//!
//! assert_eq!(options.token_budget, 4000);
//! assert!(options.anonymize);
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ChatwindowError;

/// Text encoding of an export file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Encoding {
    /// UTF-8 (Telegram Desktop and WhatsApp default)
    #[default]
    #[serde(alias = "utf-8")]
    Utf8,
    /// UTF-16, little endian
    #[serde(alias = "utf-16le")]
    Utf16Le,
    /// UTF-16, big endian
    #[serde(alias = "utf-16be")]
    Utf16Be,
}

impl Encoding {
    /// Returns the canonical label of this encoding.
    pub fn label(self) -> &'static str {
        match self {
            Encoding::Utf8 => "UTF-8",
            Encoding::Utf16Le => "UTF-16LE",
            Encoding::Utf16Be => "UTF-16BE",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "utf8" | "utf-8" => Ok(Encoding::Utf8),
            "utf16le" | "utf-16le" | "utf-16" => Ok(Encoding::Utf16Le),
            "utf16be" | "utf-16be" => Ok(Encoding::Utf16Be),
            _ => Err(format!(
                "Unknown encoding: '{}'. Expected one of: utf-8, utf-16le, utf-16be",
                s
            )),
        }
    }
}

/// Configuration for Telegram export parsing.
///
/// # Example
///
/// ```rust
/// use chatwindow::config::{Encoding, TelegramConfig};
///
/// let config = TelegramConfig::new()
///     .with_encoding(Encoding::Utf8)
///     .with_skip_invalid(false);
/// assert!(!config.skip_invalid);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Encoding of the raw bytes (default: UTF-8)
    pub encoding: Encoding,

    /// Skip invalid messages instead of returning errors (default: true)
    pub skip_invalid: bool,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            encoding: Encoding::Utf8,
            skip_invalid: true,
        }
    }
}

impl TelegramConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the text encoding.
    #[must_use]
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Sets whether to skip invalid messages.
    #[must_use]
    pub fn with_skip_invalid(mut self, skip: bool) -> Self {
        self.skip_invalid = skip;
        self
    }
}

/// Configuration for WhatsApp export parsing.
///
/// WhatsApp marks system notices and media placeholders with an invisible
/// LEFT-TO-RIGHT MARK; records containing [`system_marker`](Self::system_marker)
/// are dropped when [`skip_system_messages`](Self::skip_system_messages) is set.
///
/// # Example
///
/// ```rust
/// use chatwindow::config::WhatsAppConfig;
///
/// let config = WhatsAppConfig::new()
///     .with_skip_system_messages(true);
/// assert_eq!(config.system_marker, '\u{200E}');
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WhatsAppConfig {
    /// Encoding of the raw bytes (default: UTF-8)
    pub encoding: Encoding,

    /// Skip system and media records (default: true)
    pub skip_system_messages: bool,

    /// Character that flags a system record (default: U+200E)
    pub system_marker: char,

    /// Skip invalid records instead of returning errors (default: true)
    pub skip_invalid: bool,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            encoding: Encoding::Utf8,
            skip_system_messages: true,
            system_marker: '\u{200E}',
            skip_invalid: true,
        }
    }
}

impl WhatsAppConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the text encoding.
    #[must_use]
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Sets whether to skip system messages.
    #[must_use]
    pub fn with_skip_system_messages(mut self, skip: bool) -> Self {
        self.skip_system_messages = skip;
        self
    }

    /// Sets the marker character of system records.
    #[must_use]
    pub fn with_system_marker(mut self, marker: char) -> Self {
        self.system_marker = marker;
        self
    }

    /// Sets whether to skip invalid records.
    #[must_use]
    pub fn with_skip_invalid(mut self, skip: bool) -> Self {
        self.skip_invalid = skip;
        self
    }
}

/// Default prefix of anonymized sender codes ("участник").
pub const DEFAULT_CODE_PREFIX: &str = "У";

/// Options for assembling the token-budgeted window.
///
/// A `token_budget` of zero is accepted but can never fit a message, so the
/// window builder reports [`BudgetTooSmall`](ChatwindowError::BudgetTooSmall).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowOptions {
    /// Maximum combined token cost of the rendered lines.
    pub token_budget: usize,

    /// Replace sender names with opaque codes (default: true)
    pub anonymize: bool,

    /// Prefix rendered lines with the message date (default: false)
    pub keep_dates: bool,

    /// Drop messages strictly before this instant.
    pub start_date: Option<DateTime<Utc>>,

    /// Senders (names or ids) whose messages are dropped before anything else.
    pub excluded_senders: BTreeSet<String>,

    /// Keep only messages from the last N hours of the chat.
    pub lookback_hours: Option<u32>,

    /// Prefix of anonymized codes (default: "У")
    pub code_prefix: String,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            token_budget: 3000,
            anonymize: true,
            keep_dates: false,
            start_date: None,
            excluded_senders: BTreeSet::new(),
            lookback_hours: None,
            code_prefix: DEFAULT_CODE_PREFIX.to_string(),
        }
    }
}

impl WindowOptions {
    /// Creates options with the given budget and default settings.
    pub fn new(token_budget: usize) -> Self {
        Self {
            token_budget,
            ..Self::default()
        }
    }

    /// Sets the token budget.
    #[must_use]
    pub fn with_token_budget(mut self, budget: usize) -> Self {
        self.token_budget = budget;
        self
    }

    /// Enables or disables anonymization.
    #[must_use]
    pub fn with_anonymize(mut self, anonymize: bool) -> Self {
        self.anonymize = anonymize;
        self
    }

    /// Enables or disables date prefixes on rendered lines.
    #[must_use]
    pub fn with_keep_dates(mut self, keep: bool) -> Self {
        self.keep_dates = keep;
        self
    }

    /// Sets the inclusive lower bound on message timestamps.
    #[must_use]
    pub fn with_start_date(mut self, start: DateTime<Utc>) -> Self {
        self.start_date = Some(start);
        self
    }

    /// Sets the lower bound from a `YYYY-MM-DD` string (start of that day).
    ///
    /// # Errors
    ///
    /// Returns [`ChatwindowError::InvalidDate`] if the format is invalid.
    pub fn with_start_date_str(mut self, date_str: &str) -> Result<Self, ChatwindowError> {
        let naive = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .map_err(|_| ChatwindowError::invalid_date(date_str))?;
        let start = naive
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| ChatwindowError::invalid_date(date_str))?;
        self.start_date = Some(start.and_utc());
        Ok(self)
    }

    /// Adds one sender to the exclusion set.
    #[must_use]
    pub fn with_excluded_sender(mut self, sender: impl Into<String>) -> Self {
        self.excluded_senders.insert(sender.into());
        self
    }

    /// Adds several senders to the exclusion set.
    #[must_use]
    pub fn with_excluded_senders<I, S>(mut self, senders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_senders
            .extend(senders.into_iter().map(Into::into));
        self
    }

    /// Keeps only the last `hours` hours of the chat.
    #[must_use]
    pub fn with_lookback_hours(mut self, hours: u32) -> Self {
        self.lookback_hours = Some(hours);
        self
    }

    /// Sets the prefix of anonymized codes.
    #[must_use]
    pub fn with_code_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.code_prefix = prefix.into();
        self
    }
}
