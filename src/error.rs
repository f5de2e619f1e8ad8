//! Error types.
//!
//! Malformed markdown is never an error: every construct has a literal
//! fallback. A [`ParseError`] means the block engine broke one of its own
//! structural invariants and the parse was aborted.

use thiserror::Error;

/// Result type for parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Structural invariant violated while building the document tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Text was routed to a block that had already been finalized.
    #[error("attempted to add text on line {line} to a closed {tag} block")]
    ClosedContainer { tag: &'static str, line: usize },

    /// Unwinding open blocks walked past the document root.
    #[error("no open ancestor left while closing {tag} on line {line}")]
    MissingAncestor { tag: &'static str, line: usize },

    /// The inline pass reached a leaf that carries no raw text.
    #[error("{tag} block has no raw text to parse inlines from")]
    MissingContent { tag: &'static str },
}

/// Parser settings could not be loaded.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("invalid parser settings: {0}")]
    Json(#[from] serde_json::Error),
}
