//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`FormatArg`] - Source format selection, including auto-detection
//!
//! # Example
//!
//! ```rust
//! use chatwindow::cli::Args;
//! use clap::Parser;
//!
//! let args = Args::parse_from(["chatwindow", "chat.txt", "--budget", "500", "--exclude", "Bob"]);
//! let options = args.window_options().unwrap();
//!
//! assert_eq!(options.token_budget, 500);
//! assert!(options.excluded_senders.contains("Bob"));
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{Encoding, WindowOptions};
use crate::error::{ChatwindowError, Result};
use crate::parser::SourceFormat;

/// Turn a Telegram or WhatsApp chat export into a cleaned, anonymized
/// context that fits an LLM token budget.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatwindow")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatwindow result.json
    chatwindow chat.txt --budget 1500 --exclude Bob
    chatwindow result.json --since 2024-01-01 --codebook codes.json -o context.txt
    chatwindow chat.txt --overview --json
    chatwindow chat.txt --format wa --encoding utf-16le --estimate")]
pub struct Args {
    /// Path to the exported chat
    pub input: PathBuf,

    /// Export format
    #[arg(short, long, value_enum, default_value = "auto")]
    pub format: FormatArg,

    /// Token budget of the assembled window
    #[arg(short, long, default_value_t = 3000, value_name = "TOKENS")]
    pub budget: usize,

    /// Keep real sender names instead of codes
    #[arg(long)]
    pub no_anonymize: bool,

    /// Prefix each line with the message date
    #[arg(short = 'd', long)]
    pub keep_dates: bool,

    /// Drop messages before this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub since: Option<String>,

    /// Drop every message of this participant (name or id, repeatable)
    #[arg(short = 'x', long, value_name = "NAME")]
    pub exclude: Vec<String>,

    /// Keep only the last N hours of the chat
    #[arg(long, value_name = "HOURS")]
    pub lookback_hours: Option<u32>,

    /// Input text encoding
    #[arg(long, default_value = "utf-8", value_name = "LABEL")]
    pub encoding: Encoding,

    /// Write the codebook as JSON to this file
    #[arg(long, value_name = "PATH")]
    pub codebook: Option<PathBuf>,

    /// Print the whole result as JSON instead of plain text
    #[arg(long)]
    pub json: bool,

    /// Summarize the chat (participants, span, size) instead of windowing it
    #[arg(long)]
    pub overview: bool,

    /// Estimate tokens (about 4 characters each) instead of loading cl100k_base
    #[arg(long)]
    pub estimate: bool,

    /// Write output to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

impl Args {
    /// Builds window options from the flags.
    ///
    /// # Errors
    ///
    /// Returns [`ChatwindowError::InvalidDate`] if `--since` is not
    /// `YYYY-MM-DD`.
    pub fn window_options(&self) -> Result<WindowOptions> {
        let mut options = WindowOptions::new(self.budget)
            .with_anonymize(!self.no_anonymize)
            .with_keep_dates(self.keep_dates)
            .with_excluded_senders(self.exclude.iter().cloned());

        if let Some(ref since) = self.since {
            options = options.with_start_date_str(since)?;
        }
        if let Some(hours) = self.lookback_hours {
            options = options.with_lookback_hours(hours);
        }
        Ok(options)
    }

    /// Resolves `--format`, sniffing `input` when it is `auto`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatwindowError::UnsupportedFormat`] if auto-detection fails.
    pub fn resolve_format(&self, input: &[u8]) -> Result<SourceFormat> {
        match self.format.source_format() {
            Some(format) => Ok(format),
            None => SourceFormat::detect(input).ok_or_else(|| {
                ChatwindowError::unsupported_format(format!(
                    "unrecognized content in {}",
                    self.input.display()
                ))
            }),
        }
    }
}

/// Export format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default)]
pub enum FormatArg {
    /// Guess from the content
    #[default]
    Auto,

    /// Telegram Desktop JSON export
    #[value(alias = "tg")]
    Telegram,

    /// WhatsApp TXT export
    #[value(name = "whatsapp", alias = "wa")]
    WhatsApp,
}

impl FormatArg {
    /// Returns the explicit format, or `None` for [`Auto`](FormatArg::Auto).
    pub fn source_format(self) -> Option<SourceFormat> {
        match self {
            FormatArg::Auto => None,
            FormatArg::Telegram => Some(SourceFormat::Telegram),
            FormatArg::WhatsApp => Some(SourceFormat::WhatsApp),
        }
    }
}

impl From<SourceFormat> for FormatArg {
    fn from(format: SourceFormat) -> Self {
        match format {
            SourceFormat::Telegram => FormatArg::Telegram,
            SourceFormat::WhatsApp => FormatArg::WhatsApp,
        }
    }
}
