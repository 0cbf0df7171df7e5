//! WhatsApp TXT record splitting and validation.
//!
//! A WhatsApp export is plain text with one record per message:
//!
//! ```text
//! 26.10.2025, 20:40 - Alice: See you
//! tomorrow then
//! 26.10.2025, 20:41 - Bob: ok
//! ```
//!
//! A record starts at every line beginning with a `DD.MM.YYYY` date and runs
//! until the next such line, so multi-line messages stay together.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;

use crate::Message;
use crate::events::SkipReason;
use crate::parser::SourceFormat;

/// Format label used in errors and events.
pub const FORMAT: &str = SourceFormat::WhatsApp.label();

const DATE_FORMAT: &str = "%d.%m.%Y, %H:%M";

// DD.MM.YYYY at the start of a line
static RECORD_START: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\d{2}\.\d{2}\.\d{4}").ok());

// DD.MM.YYYY, HH:MM - <name>: <text>
static RECORD_LINE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\d{2}\.\d{2}\.\d{4}, \d{2}:\d{2} - [^:]+: .+$").ok());

/// Splits export text into raw records.
///
/// Lines before the first dated line form a record of their own, which later
/// fails validation. Continuation lines are joined with single spaces.
///
/// # Example
///
/// ```rust
/// use chatwindow::parsing::whatsapp::split_records;
///
/// let records = split_records("01.01.2024, 10:00 - Alice: one\ntwo\n01.01.2024, 10:01 - Bob: x");
/// assert_eq!(records, vec![
///     "01.01.2024, 10:00 - Alice: one two".to_string(),
///     "01.01.2024, 10:01 - Bob: x".to_string(),
/// ]);
/// ```
pub fn split_records(text: &str) -> Vec<String> {
    let mut records: Vec<Vec<&str>> = Vec::new();

    for line in text.lines() {
        match records.last_mut() {
            Some(current) if !starts_record(line) => current.push(line),
            _ => records.push(vec![line]),
        }
    }

    records
        .into_iter()
        .map(|lines| lines.join(" ").trim().to_string())
        .collect()
}

fn starts_record(line: &str) -> bool {
    RECORD_START
        .as_ref()
        .is_some_and(|re| re.is_match(line))
}

/// Returns `true` if a joined record has the `date, time - name: text` shape.
pub fn is_valid_record(record: &str) -> bool {
    RECORD_LINE
        .as_ref()
        .is_some_and(|re| re.is_match(record))
}

/// Parses `DD.MM.YYYY, HH:MM` as UTC wall-clock time.
pub fn parse_date(date: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(date, DATE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Converts one validated record at position `index` into a [`Message`].
///
/// The record is split at the first `" - "` and then the first `": "`;
/// everything after that is the message text, colons included.
pub fn convert_record(record: &str, index: usize) -> Result<Message, SkipReason> {
    let (date, rest) = record
        .split_once(" - ")
        .ok_or(SkipReason::MalformedRecord)?;
    let (sender, text) = rest
        .split_once(": ")
        .ok_or(SkipReason::MalformedRecord)?;

    let sender = sender.trim();
    if sender.is_empty() {
        return Err(SkipReason::MissingSender);
    }
    let timestamp = parse_date(date).ok_or(SkipReason::InvalidDate)?;

    Ok(Message::new(sender, text.trim(), timestamp).with_index(index))
}
