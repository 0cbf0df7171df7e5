//! Core processing logic for chatwindow.
//!
//! This module contains:
//! - [`sanitize`] - Message text cleaning and sender-name normalization
//! - [`tokens`] - Token counting
//! - [`filter`] - Sender exclusion and date filters
//! - [`anonymize`] - Sender codes and the [`Codebook`]
//! - [`window`] - The token-budgeted window builder
//! - [`overview`] - Whole-chat summary
//!
//! # Quick Start
//!
//! ```rust
//! use chatwindow::core::{
//!     Codebook, HeuristicCounter, WindowResult,
//!     build_window, sanitize, normalize_name,
//! };
//! ```

pub mod anonymize;
pub mod filter;
pub mod overview;
pub mod sanitize;
pub mod tokens;
pub mod window;

// Re-export main types for convenience
pub use anonymize::{Codebook, anonymize, canonical_name};
pub use filter::{FilterConfig, apply_filters};
pub use overview::{ChatOverview, overview};
pub use sanitize::{normalize_name, sanitize};
pub use tokens::{Cl100kCounter, HeuristicCounter, TokenCounter};
pub use window::{WindowResult, build_window};

// Re-export Message from the crate root
pub use crate::Message;
