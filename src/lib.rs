//! # Chatwindow
//!
//! Turn personal chat exports into a cleaned, anonymized, token-budgeted
//! block of text for a language model, plus the codebook that maps the
//! anonymized sender codes back to names.
//!
//! ## Overview
//!
//! Supported exports:
//! - **Telegram** - JSON exports from Telegram Desktop
//! - **WhatsApp** - `DD.MM.YYYY, HH:MM - Name: text` exports
//!
//! A run parses the export into canonical [`Message`]s, drops excluded
//! senders and old messages, replaces names with codes, cleans the text and
//! keeps the most recent messages that fit the token budget.
//!
//! ## Quick Start
//!
//! ```rust
//! # #[cfg(feature = "whatsapp")]
//! # fn main() -> chatwindow::Result<()> {
//! use chatwindow::prelude::*;
//!
//! let export = "01.01.2024, 10:00 - Alice: hi\n01.01.2024, 10:01 - Bob: hello";
//! let options = WindowOptions::new(2000).with_excluded_sender("Bob");
//!
//! let result = Pipeline::new()?.run(export.as_bytes(), SourceFormat::WhatsApp, &options)?;
//! assert_eq!(result.content, "У0: hi\n");
//! assert_eq!(result.codebook.name_for("У0"), Some("Alice"));
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "whatsapp"))]
//! # fn main() {}
//! ```
//!
//! ## Module Structure
//!
//! - [`pipeline`] - [`Pipeline`](pipeline::Pipeline), the single entry point
//! - [`parser`] - [`Parser`](parser::Parser) trait, [`SourceFormat`](parser::SourceFormat)
//! - [`parsers`] - `TelegramParser`, `WhatsAppParser`
//! - [`parsing`] - Byte decoding and per-format record logic
//! - [`core`] - Sanitizer, token counting, filters, anonymizer, window builder
//! - [`config`] - Parser and window options
//! - [`events`] - Diagnostic events and sinks
//! - [`error`] - [`ChatwindowError`], [`Result`]
//! - [`prelude`] - Convenient re-exports
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `telegram` | Telegram JSON parser (pulls in `serde_json`) |
//! | `whatsapp` | WhatsApp TXT parser |
//! | `cli` | The `chatwindow` binary |
//! | `full` | All of the above (default) |

pub mod config;
pub mod core;
pub mod error;
pub mod events;
pub mod message;
pub mod parser;
pub mod parsers;
pub mod parsing;
pub mod pipeline;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export the main types at the crate root for convenience
pub use error::{ChatwindowError, Result};
pub use message::Message;

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chatwindow::prelude::*;
/// ```
pub mod prelude {
    pub use crate::Message;

    pub use crate::error::{ChatwindowError, Result};

    pub use crate::parser::{Parser, SourceFormat, create_parser};

    pub use crate::config::{Encoding, TelegramConfig, WhatsAppConfig, WindowOptions};

    pub use crate::core::{
        ChatOverview, Cl100kCounter, Codebook, HeuristicCounter, TokenCounter, WindowResult,
        build_window, normalize_name, sanitize,
    };

    pub use crate::events::{Event, EventSink, NullSink, SkipReason, TracingSink};

    pub use crate::pipeline::{Pipeline, run};

    #[cfg(feature = "telegram")]
    pub use crate::parsers::TelegramParser;
    #[cfg(feature = "whatsapp")]
    pub use crate::parsers::WhatsAppParser;
}
