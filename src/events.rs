//! Diagnostic events emitted while parsing and windowing.
//!
//! Parsers and the window builder never log on their own. They report
//! recoverable problems and summaries to an [`EventSink`] handed in by the
//! caller, and their results never depend on what the sink does with them.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Mutex;
//! use chatwindow::events::{Event, EventSink};
//!
//! #[derive(Default)]
//! struct Collect(Mutex<Vec<String>>);
//!
//! impl EventSink for Collect {
//!     fn emit(&self, event: &Event) {
//!         if let Ok(mut seen) = self.0.lock() {
//!             seen.push(event.to_string());
//!         }
//!     }
//! }
//! ```

use std::fmt;

use serde::Serialize;

/// Why a record was skipped by a parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The record does not match the expected line or object pattern.
    MalformedRecord,
    /// The record carries the system/media marker.
    SystemMarker,
    /// The record's date could not be parsed.
    InvalidDate,
    /// The record has no sender (e.g. a Telegram `actor` entry).
    MissingSender,
    /// A Telegram text segment has no string `text`.
    MalformedSegment,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkipReason::MalformedRecord => "malformed record",
            SkipReason::SystemMarker => "system message",
            SkipReason::InvalidDate => "invalid date",
            SkipReason::MissingSender => "missing sender",
            SkipReason::MalformedSegment => "malformed text segment",
        };
        f.write_str(s)
    }
}

/// A diagnostic notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
#[non_exhaustive]
pub enum Event {
    /// A parser dropped one record and kept going.
    RecordSkipped {
        /// Format label ("Telegram JSON", "WhatsApp TXT")
        format: &'static str,
        /// Zero-based position of the record in the export
        record: usize,
        /// Why it was dropped
        reason: SkipReason,
    },
    /// A parser finished.
    MessagesParsed {
        /// Label of the parsed format
        format: &'static str,
        /// Messages produced
        parsed: usize,
        /// Records left out
        skipped: usize,
    },
    /// A message sanitized to nothing and was left out of the window.
    EmptyMessageDropped {
        /// Position of the message in the export
        index: usize,
    },
    /// The window builder finished.
    WindowAssembled {
        /// Messages handed to the builder
        total: usize,
        /// Messages left after filtering
        filtered: usize,
        /// Lines placed in the window
        included: usize,
        /// Token cost of the window
        tokens: usize,
    },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::RecordSkipped {
                format,
                record,
                reason,
            } => write!(f, "{format}: skipped record {record} ({reason})"),
            Event::MessagesParsed {
                format,
                parsed,
                skipped,
            } => write!(f, "{format}: parsed {parsed} messages, skipped {skipped}"),
            Event::EmptyMessageDropped { index } => {
                write!(f, "message {index} is empty after cleaning")
            }
            Event::WindowAssembled {
                total,
                filtered,
                included,
                tokens,
            } => write!(
                f,
                "window: {included}/{filtered} messages ({total} parsed), {tokens} tokens"
            ),
        }
    }
}

/// Receiver of diagnostic events.
///
/// Implementations must be cheap and must not panic; emitting is
/// fire-and-forget.
pub trait EventSink: Send + Sync {
    /// Handles one event.
    fn emit(&self, event: &Event);
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &Event) {
        match event {
            Event::RecordSkipped {
                format,
                record,
                reason,
            } => {
                tracing::warn!(format, record, reason = %reason, "Skipped record");
            }
            Event::MessagesParsed {
                format,
                parsed,
                skipped,
            } => {
                tracing::debug!(format, parsed, skipped, "Parsed export");
            }
            Event::EmptyMessageDropped { index } => {
                tracing::debug!(index, "Dropped empty message");
            }
            Event::WindowAssembled {
                total,
                filtered,
                included,
                tokens,
            } => {
                tracing::info!(total, filtered, included, tokens, "Window assembled");
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &Event) {}
}
