//! Token counting.
//!
//! The window budget is measured with a [`TokenCounter`]. The default
//! [`Cl100kCounter`] uses the `cl100k_base` BPE table; the table is built
//! once per process and then shared read-only by every counter and thread.

use std::sync::{Arc, OnceLock};

use tiktoken_rs::CoreBPE;

use crate::error::{ChatwindowError, Result};

/// Returns the cost of a piece of text in tokens.
pub trait TokenCounter: Send + Sync {
    /// Counts the tokens in `text`.
    fn count(&self, text: &str) -> usize;
}

impl<T: TokenCounter + ?Sized> TokenCounter for &T {
    fn count(&self, text: &str) -> usize {
        (**self).count(text)
    }
}

impl<T: TokenCounter + ?Sized> TokenCounter for Arc<T> {
    fn count(&self, text: &str) -> usize {
        (**self).count(text)
    }
}

static CL100K: OnceLock<std::result::Result<CoreBPE, String>> = OnceLock::new();

fn cl100k() -> Result<&'static CoreBPE> {
    CL100K
        .get_or_init(|| tiktoken_rs::cl100k_base().map_err(|e| e.to_string()))
        .as_ref()
        .map_err(|e| ChatwindowError::Tokenizer(e.clone()))
}

/// Exact counter over the `cl100k_base` encoding.
///
/// # Example
///
/// ```rust
/// use chatwindow::core::tokens::{Cl100kCounter, TokenCounter};
///
/// let counter = Cl100kCounter::new()?;
/// assert_eq!(counter.count(""), 0);
/// assert!(counter.count("Alice: hello there") > 0);
/// # Ok::<(), chatwindow::ChatwindowError>(())
/// ```
#[derive(Clone, Copy)]
pub struct Cl100kCounter {
    bpe: &'static CoreBPE,
}

impl Cl100kCounter {
    /// Loads the shared table on first use.
    ///
    /// # Errors
    ///
    /// Returns [`ChatwindowError::Tokenizer`] if the table cannot be built.
    pub fn new() -> Result<Self> {
        Ok(Self { bpe: cl100k()? })
    }
}

impl std::fmt::Debug for Cl100kCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cl100kCounter").finish_non_exhaustive()
    }
}

impl TokenCounter for Cl100kCounter {
    fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}

/// Rough estimate of about four characters per token, rounded up.
///
/// Needs no table; useful for quick estimates and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicCounter;

impl HeuristicCounter {
    const CHARS_PER_TOKEN: usize = 4;
}

impl TokenCounter for HeuristicCounter {
    fn count(&self, text: &str) -> usize {
        text.chars().count().div_ceil(Self::CHARS_PER_TOKEN)
    }
}
