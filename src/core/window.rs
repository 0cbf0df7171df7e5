//! Token-budgeted window assembly.
//!
//! [`build_window`] keeps the most recent stretch of a conversation that fits
//! a token budget:
//!
//! 1. Drop excluded senders, then messages before `start_date`, then
//!    messages outside the lookback window.
//! 2. Anonymize (or just normalize) sender names over what is left, in file
//!    order, so codes do not depend on how much of the head is cut later.
//! 3. Sort by `(timestamp, index)` and walk from the newest message back,
//!    sanitizing and rendering each line and adding its token cost.
//! 4. Stop at the first line that would overflow the budget. Smaller, older
//!    lines are not packed in after it.
//! 5. Emit the selected lines oldest first.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::Message;
use crate::config::WindowOptions;
use crate::core::anonymize::{Codebook, anonymize, canonical_name};
use crate::core::filter::{FilterConfig, apply_filters};
use crate::core::sanitize::sanitize;
use crate::core::tokens::TokenCounter;
use crate::error::{ChatwindowError, Result};
use crate::events::{Event, EventSink};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The assembled window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowResult {
    /// One `"name: text\n"` line per included message, oldest first.
    pub content: String,
    /// Codes used in `content`; empty when anonymization is off.
    pub codebook: Codebook,
    /// Combined token cost of the lines in `content`.
    pub token_count: usize,
    /// Messages handed to the builder.
    pub messages_total: usize,
    /// Messages left after sender and date filters.
    pub messages_filtered: usize,
    /// Messages rendered into `content`.
    pub messages_included: usize,
    /// Timestamp of the oldest included message.
    pub first_timestamp: Option<DateTime<Utc>>,
    /// Timestamp of the newest included message.
    pub last_timestamp: Option<DateTime<Utc>>,
}

/// Renders one message as an output line, newline included.
///
/// `text` must already be sanitized.
pub fn render_line(sender: &str, text: &str, timestamp: DateTime<Utc>, keep_dates: bool) -> String {
    if keep_dates {
        format!("{} {}: {}\n", timestamp.format(DATE_FORMAT), sender, text)
    } else {
        format!("{sender}: {text}\n")
    }
}

/// Builds the window for `messages` under `options`.
///
/// # Errors
///
/// - [`ChatwindowError::EmptyResult`] if no message survives the filters, or
///   every survivor is empty once sanitized
/// - [`ChatwindowError::BudgetTooSmall`] if the newest renderable message
///   alone exceeds the budget
///
/// # Example
///
/// ```rust
/// use chatwindow::Message;
/// use chatwindow::config::WindowOptions;
/// use chatwindow::core::tokens::HeuristicCounter;
/// use chatwindow::core::window::build_window;
/// use chatwindow::events::NullSink;
/// use chrono::{TimeZone, Utc};
///
/// let messages = vec![
///     Message::new("Alice", "hi", Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()),
///     Message::new("Bob", "hello", Utc.with_ymd_and_hms(2024, 1, 1, 10, 1, 0).unwrap()).with_index(1),
/// ];
///
/// let result = build_window(messages, &WindowOptions::new(100), &HeuristicCounter, &NullSink)?;
/// assert_eq!(result.content, "У0: hi\nУ1: hello\n");
/// # Ok::<(), chatwindow::ChatwindowError>(())
/// ```
pub fn build_window(
    messages: Vec<Message>,
    options: &WindowOptions,
    counter: &dyn TokenCounter,
    sink: &dyn EventSink,
) -> Result<WindowResult> {
    let messages_total = messages.len();

    let filtered = apply_filters(messages, &FilterConfig::from(options));
    if filtered.is_empty() {
        return Err(ChatwindowError::EmptyResult);
    }
    let messages_filtered = filtered.len();

    let (mut named, codebook) = if options.anonymize {
        anonymize(filtered, &options.code_prefix)
    } else {
        let named = filtered
            .into_iter()
            .map(|mut msg| {
                msg.sender = canonical_name(msg.sender());
                msg
            })
            .collect();
        (named, Codebook::new(&options.code_prefix))
    };

    named.sort_by(Message::chronological_cmp);

    let mut selected: Vec<(String, DateTime<Utc>)> = Vec::new();
    let mut token_count = 0usize;
    let mut renderable = false;

    for msg in named.iter().rev() {
        let text = sanitize(msg.content());
        if text.is_empty() {
            sink.emit(&Event::EmptyMessageDropped { index: msg.index() });
            continue;
        }

        let line = render_line(msg.sender(), &text, msg.timestamp(), options.keep_dates);
        let cost = counter.count(&line);

        if !renderable && cost > options.token_budget {
            return Err(ChatwindowError::BudgetTooSmall {
                budget: options.token_budget,
                required: cost,
            });
        }
        renderable = true;

        if token_count + cost > options.token_budget {
            break;
        }
        token_count += cost;
        selected.push((line, msg.timestamp()));
    }

    if !renderable {
        return Err(ChatwindowError::EmptyResult);
    }

    selected.reverse();
    let first_timestamp = selected.first().map(|(_, ts)| *ts);
    let last_timestamp = selected.last().map(|(_, ts)| *ts);
    let content: String = selected.iter().map(|(line, _)| line.as_str()).collect();

    sink.emit(&Event::WindowAssembled {
        total: messages_total,
        filtered: messages_filtered,
        included: selected.len(),
        tokens: token_count,
    });

    Ok(WindowResult {
        content,
        codebook,
        token_count,
        messages_total,
        messages_filtered,
        messages_included: selected.len(),
        first_timestamp,
        last_timestamp,
    })
}
