//! Canonical message type shared by every parser.
//!
//! This module provides [`Message`], the format-independent representation of
//! one chat entry. Parsers convert their native records into this structure;
//! the filter, anonymizer and window builder only ever see `Message`s.
//!
//! # Overview
//!
//! A message consists of:
//! - **Required**: `sender`, `content`, `timestamp`, `index`
//! - **Optional**: `sender_id`, `id`
//!
//! A parser that cannot fill `sender` and `timestamp` for a record skips the
//! record instead of emitting a partial message.
//!
//! # Examples
//!
//! ```
//! use chatwindow::Message;
//! use chrono::{TimeZone, Utc};
//!
//! let ts = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
//! let msg = Message::new("Alice", "Hello, world!", ts)
//!     .with_index(3)
//!     .with_sender_id("user42");
//!
//! assert_eq!(msg.sender(), "Alice");
//! assert_eq!(msg.sender_id(), Some("user42"));
//! assert_eq!(msg.index(), 3);
//! ```

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized chat message from any supported source.
///
/// # Fields
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `sender` | `String` | Display name as found in the export |
/// | `sender_id` | `Option<String>` | Stable author identifier (Telegram `from_id`) |
/// | `content` | `String` | Message body, flattened to one string |
/// | `timestamp` | `DateTime<Utc>` | When the message was sent |
/// | `index` | `usize` | Position in the original export |
/// | `id` | `Option<u64>` | Platform message identifier (Telegram `id`) |
///
/// Exports carry no time zone, so timestamps are taken as UTC wall-clock time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Display name of the author.
    ///
    /// Raw until the window builder normalizes or anonymizes it.
    pub sender: String,

    /// Stable author identifier, distinct from the display name.
    ///
    /// Present in Telegram exports, absent in WhatsApp text exports.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub sender_id: Option<String>,

    /// Text content of the message.
    pub content: String,

    /// When the message was sent.
    pub timestamp: DateTime<Utc>,

    /// Position of the record in the source export.
    ///
    /// Used as the tie-break when two messages share a timestamp.
    #[serde(default)]
    pub index: usize,

    /// Platform-specific message identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub id: Option<u64>,
}

impl Message {
    /// Creates a new message with the required fields.
    ///
    /// `index` starts at 0 and the optional identifiers are `None`.
    pub fn new(
        sender: impl Into<String>,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            sender: sender.into(),
            sender_id: None,
            content: content.into(),
            timestamp,
            index: 0,
            id: None,
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Builder method to set the position in the source export.
    #[must_use]
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    /// Builder method to set the stable sender identifier.
    #[must_use]
    pub fn with_sender_id(mut self, sender_id: impl Into<String>) -> Self {
        self.sender_id = Some(sender_id.into());
        self
    }

    /// Builder method to set the platform message ID.
    #[must_use]
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    // =========================================================================
    // Accessor methods
    // =========================================================================

    /// Returns the sender name.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Returns the sender identifier, if available.
    pub fn sender_id(&self) -> Option<&str> {
        self.sender_id.as_deref()
    }

    /// Returns the message content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the timestamp.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the position in the source export.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the message ID, if available.
    pub fn id(&self) -> Option<u64> {
        self.id
    }

    // =========================================================================
    // Utility methods
    // =========================================================================

    /// Returns `true` if this message's content is empty or whitespace-only.
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Chronological order: timestamp first, then position in the export.
    pub fn chronological_cmp(&self, other: &Self) -> Ordering {
        self.timestamp
            .cmp(&other.timestamp)
            .then(self.index.cmp(&other.index))
    }
}
