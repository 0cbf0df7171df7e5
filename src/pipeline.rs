//! Single entry point: raw export bytes in, window out.
//!
//! A [`Pipeline`] holds the read-only collaborators of a run (token counter,
//! event sink, parser settings) and can be shared between threads; every
//! call allocates its own messages, codebook and result.
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "whatsapp")]
//! # fn main() -> chatwindow::Result<()> {
//! use chatwindow::config::WindowOptions;
//! use chatwindow::parser::SourceFormat;
//! use chatwindow::pipeline::Pipeline;
//!
//! let input = b"01.01.2024, 10:00 - Alice: hi\n01.01.2024, 10:01 - Bob: hello";
//! let result = Pipeline::new()?.run(input, SourceFormat::WhatsApp, &WindowOptions::new(100))?;
//!
//! assert_eq!(result.content, "У0: hi\nУ1: hello\n");
//! assert_eq!(result.codebook.name_for("У1"), Some("Bob"));
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "whatsapp"))]
//! # fn main() {}
//! ```

use std::sync::Arc;

use crate::Message;
use crate::config::{Encoding, TelegramConfig, WhatsAppConfig, WindowOptions};
use crate::core::overview::{ChatOverview, overview};
use crate::core::tokens::{Cl100kCounter, TokenCounter};
use crate::core::window::{WindowResult, build_window};
use crate::error::{ChatwindowError, Result};
use crate::events::{EventSink, TracingSink};
use crate::parser::{Parser, SourceFormat};

/// Parses, filters, anonymizes and windows chat exports.
#[derive(Clone)]
pub struct Pipeline {
    counter: Arc<dyn TokenCounter>,
    sink: Arc<dyn EventSink>,
    telegram: TelegramConfig,
    whatsapp: WhatsAppConfig,
}

impl Pipeline {
    /// Creates a pipeline counting with `cl100k_base` and logging through
    /// `tracing`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatwindowError::Tokenizer`] if the token table cannot be
    /// loaded.
    pub fn new() -> Result<Self> {
        Ok(Self::with_counter(Arc::new(Cl100kCounter::new()?)))
    }

    /// Creates a pipeline with a custom token counter.
    pub fn with_counter(counter: Arc<dyn TokenCounter>) -> Self {
        Self {
            counter,
            sink: Arc::new(TracingSink),
            telegram: TelegramConfig::default(),
            whatsapp: WhatsAppConfig::default(),
        }
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Sets the Telegram parser configuration.
    #[must_use]
    pub fn with_telegram_config(mut self, config: TelegramConfig) -> Self {
        self.telegram = config;
        self
    }

    /// Sets the WhatsApp parser configuration.
    #[must_use]
    pub fn with_whatsapp_config(mut self, config: WhatsAppConfig) -> Self {
        self.whatsapp = config;
        self
    }

    /// Sets the input encoding for both formats.
    #[must_use]
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.telegram.encoding = encoding;
        self.whatsapp.encoding = encoding;
        self
    }

    /// Returns the token counter.
    pub fn counter(&self) -> &dyn TokenCounter {
        self.counter.as_ref()
    }

    fn parser_for(&self, format: SourceFormat) -> Result<Box<dyn Parser>> {
        match format {
            #[cfg(feature = "telegram")]
            SourceFormat::Telegram => Ok(Box::new(crate::parsers::TelegramParser::with_config(
                self.telegram.clone(),
            ))),
            #[cfg(feature = "whatsapp")]
            SourceFormat::WhatsApp => Ok(Box::new(crate::parsers::WhatsAppParser::with_config(
                self.whatsapp.clone(),
            ))),
            #[allow(unreachable_patterns)]
            _ => Err(ChatwindowError::unsupported_format(format.to_string())),
        }
    }

    /// Parses `input` as `format` without building a window.
    ///
    /// # Errors
    ///
    /// Returns the parser's errors unchanged.
    pub fn parse(&self, input: &[u8], format: SourceFormat) -> Result<Vec<Message>> {
        self.parser_for(format)?
            .parse_bytes(input, self.sink.as_ref())
    }

    /// Runs the whole pipeline on one export.
    ///
    /// # Errors
    ///
    /// Returns the first terminal error of parsing or windowing unchanged;
    /// nothing is retried.
    pub fn run(
        &self,
        input: &[u8],
        format: SourceFormat,
        options: &WindowOptions,
    ) -> Result<WindowResult> {
        let messages = self.parse(input, format)?;
        build_window(messages, options, self.counter.as_ref(), self.sink.as_ref())
    }

    /// Like [`run`](Self::run), guessing the format from the content.
    ///
    /// # Errors
    ///
    /// Returns [`ChatwindowError::UnsupportedFormat`] if the format cannot
    /// be recognized (HTML exports, non-UTF-8 bytes).
    pub fn run_detected(&self, input: &[u8], options: &WindowOptions) -> Result<WindowResult> {
        let format = SourceFormat::detect(input)
            .ok_or_else(|| ChatwindowError::unsupported_format("unrecognized content"))?;
        self.run(input, format, options)
    }

    /// Parses one export and summarizes it.
    ///
    /// # Errors
    ///
    /// Returns the parser's errors unchanged.
    pub fn inspect(&self, input: &[u8], format: SourceFormat) -> Result<ChatOverview> {
        let messages = self.parse(input, format)?;
        Ok(overview(&messages, self.counter.as_ref()))
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("telegram", &self.telegram)
            .field("whatsapp", &self.whatsapp)
            .finish_non_exhaustive()
    }
}

/// Runs a default [`Pipeline`] on one export.
///
/// # Errors
///
/// See [`Pipeline::new`] and [`Pipeline::run`].
pub fn run(input: &[u8], format: SourceFormat, options: &WindowOptions) -> Result<WindowResult> {
    Pipeline::new()?.run(input, format, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tokens::HeuristicCounter;
    use crate::events::NullSink;

    fn pipeline() -> Pipeline {
        Pipeline::with_counter(Arc::new(HeuristicCounter)).with_sink(Arc::new(NullSink))
    }

    const WHATSAPP: &[u8] = b"01.01.2024, 10:00 - Alice: hi\n01.01.2024, 10:01 - Bob: hello";

    #[test]
    fn test_pipeline_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Pipeline>();
    }

    #[cfg(feature = "whatsapp")]
    #[test]
    fn test_run_whatsapp() {
        let result = pipeline()
            .run(WHATSAPP, SourceFormat::WhatsApp, &WindowOptions::new(100))
            .unwrap();
        assert_eq!(result.content, "У0: hi\nУ1: hello\n");
        assert_eq!(result.messages_total, 2);
    }

    #[cfg(feature = "whatsapp")]
    #[test]
    fn test_run_detected() {
        let result = pipeline()
            .run_detected(WHATSAPP, &WindowOptions::new(100))
            .unwrap();
        assert_eq!(result.messages_included, 2);

        let err = pipeline()
            .run_detected(b"<html><body></body></html>", &WindowOptions::new(100))
            .unwrap_err();
        assert!(matches!(err, ChatwindowError::UnsupportedFormat { .. }));
    }

    #[cfg(feature = "whatsapp")]
    #[test]
    fn test_inspect() {
        let summary = pipeline().inspect(WHATSAPP, SourceFormat::WhatsApp).unwrap();
        assert_eq!(summary.participants, vec!["Alice", "Bob"]);
        assert_eq!(summary.message_count, 2);
    }

    #[cfg(feature = "whatsapp")]
    #[test]
    fn test_with_encoding() {
        let bytes: Vec<u8> = std::str::from_utf8(WHATSAPP)
            .unwrap()
            .encode_utf16()
            .flat_map(u16::to_be_bytes)
            .collect();
        let result = pipeline()
            .with_encoding(Encoding::Utf16Be)
            .run(&bytes, SourceFormat::WhatsApp, &WindowOptions::new(100))
            .unwrap();
        assert_eq!(result.messages_included, 2);
    }

    #[cfg(feature = "telegram")]
    #[test]
    fn test_errors_propagate_unchanged() {
        let err = pipeline()
            .run(b"{\"messages\": 3}", SourceFormat::Telegram, &WindowOptions::new(100))
            .unwrap_err();
        assert!(err.is_schema());
    }
}
