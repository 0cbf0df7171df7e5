//! Filter messages by sender and date.
//!
//! This module provides [`FilterConfig`] for defining filter criteria and
//! [`apply_filters`] for filtering message collections.
//!
//! # Filter Types
//!
//! | Filter | Method | Description |
//! |--------|--------|-------------|
//! | Exclusion | [`with_excluded_sender`](FilterConfig::with_excluded_sender) | Drop a participant entirely |
//! | Date from | [`with_date_from`](FilterConfig::with_date_from) | Messages on or after date |
//! | Lookback | [`with_lookback_hours`](FilterConfig::with_lookback_hours) | Last N hours of the chat |
//!
//! Filters run in that order. The lookback window is measured from the
//! newest message that survived the first two.
//!
//! # Examples
//!
//! ```
//! use chatwindow::core::filter::{FilterConfig, apply_filters};
//! use chatwindow::Message;
//! use chrono::{TimeZone, Utc};
//!
//! let ts = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
//! let messages = vec![
//!     Message::new("Alice", "Hello", ts),
//!     Message::new("Bob", "Hi there", ts),
//!     Message::new("bob!", "How are you?", ts),
//! ];
//!
//! // Raw and normalized names match, ignoring ASCII case
//! let config = FilterConfig::new().with_excluded_sender("Bob");
//! let filtered = apply_filters(messages, &config);
//!
//! assert_eq!(filtered.len(), 1);
//! assert_eq!(filtered[0].sender(), "Alice");
//! ```

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::Message;
use crate::config::WindowOptions;
use crate::core::sanitize::normalize_name;
use crate::error::{ChatwindowError, Result};

/// Configuration for filtering messages by sender and date.
///
/// A message must pass every active filter to be kept.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    /// Names or sender ids whose messages are dropped.
    pub excluded: BTreeSet<String>,

    /// Keep only messages on or after this timestamp.
    pub after: Option<DateTime<Utc>>,

    /// Keep only the last N hours before the newest message.
    pub lookback_hours: Option<u32>,
}

impl FilterConfig {
    /// Creates a new empty filter configuration.
    ///
    /// No filters are active by default; all messages pass through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a participant to exclude, by display name or sender id.
    #[must_use]
    pub fn with_excluded_sender(mut self, sender: impl Into<String>) -> Self {
        self.excluded.insert(sender.into());
        self
    }

    /// Sets the start date filter (inclusive). Date format: `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatwindowError::InvalidDate`] if the format is invalid.
    pub fn with_date_from(mut self, date_str: &str) -> Result<Self> {
        let naive = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .map_err(|_| ChatwindowError::invalid_date(date_str))?;
        self.after = naive.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        Ok(self)
    }

    /// Sets the start timestamp directly.
    #[must_use]
    pub fn with_after(mut self, dt: DateTime<Utc>) -> Self {
        self.after = Some(dt);
        self
    }

    /// Keeps only messages from the last `hours` hours of the chat.
    #[must_use]
    pub fn with_lookback_hours(mut self, hours: u32) -> Self {
        self.lookback_hours = Some(hours);
        self
    }

    /// Returns `true` if any filter is active.
    pub fn is_active(&self) -> bool {
        !self.excluded.is_empty() || self.has_date_filter()
    }

    /// Returns `true` if a date or lookback filter is active.
    pub fn has_date_filter(&self) -> bool {
        self.after.is_some() || self.lookback_hours.is_some()
    }
}

impl From<&WindowOptions> for FilterConfig {
    fn from(options: &WindowOptions) -> Self {
        Self {
            excluded: options.excluded_senders.clone(),
            after: options.start_date,
            lookback_hours: options.lookback_hours,
        }
    }
}

/// Precomputed exclusion set.
struct Exclusions<'a> {
    raw: &'a BTreeSet<String>,
    normalized: Vec<String>,
}

impl<'a> Exclusions<'a> {
    fn new(raw: &'a BTreeSet<String>) -> Self {
        let normalized = raw
            .iter()
            .map(|name| normalize_name(name))
            .filter(|name| !name.is_empty())
            .collect();
        Self { raw, normalized }
    }

    fn matches(&self, msg: &Message) -> bool {
        if msg.sender_id().is_some_and(|id| self.raw.contains(id)) {
            return true;
        }
        if self
            .raw
            .iter()
            .any(|name| msg.sender().eq_ignore_ascii_case(name))
        {
            return true;
        }

        let normalized = normalize_name(msg.sender());
        !normalized.is_empty()
            && self
                .normalized
                .iter()
                .any(|name| normalized.eq_ignore_ascii_case(name))
    }
}

/// Returns `true` if the message's sender is in the exclusion set.
///
/// A sender matches by id, by raw name or by normalized name; names are
/// compared ignoring ASCII case.
pub fn is_excluded(msg: &Message, excluded: &BTreeSet<String>) -> bool {
    Exclusions::new(excluded).matches(msg)
}

/// Filters a collection of messages based on the provided configuration.
///
/// Returns the messages that pass every active filter, in their input order.
/// If no filters are active, returns the original messages unchanged.
pub fn apply_filters(messages: Vec<Message>, config: &FilterConfig) -> Vec<Message> {
    if !config.is_active() {
        return messages;
    }

    let exclusions = Exclusions::new(&config.excluded);
    let mut kept: Vec<Message> = messages
        .into_iter()
        .filter(|msg| config.excluded.is_empty() || !exclusions.matches(msg))
        .filter(|msg| config.after.is_none_or(|after| msg.timestamp() >= after))
        .collect();

    if let Some(hours) = config.lookback_hours {
        if let Some(latest) = kept.iter().map(Message::timestamp).max() {
            let cutoff = latest - Duration::hours(i64::from(hours));
            kept.retain(|msg| msg.timestamp() >= cutoff);
        }
    }

    kept
}
