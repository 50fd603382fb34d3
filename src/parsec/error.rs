//! Error types for tokenizing and context-driven parsing
//!
//!     Every failure the engine can raise is a variant of [`ParsecError`]. Handlers return
//!     [`ParseResult`] and use `?`, so an error raised in a deeply nested context travels
//!     unchanged through every `enter_context` level up to the caller of `parse`.
//!
//!     A token kind without a handler is silently ignored, so there is no "unhandled
//!     token" error.

use crate::parsec::position::Position;
use thiserror::Error;

/// Errors raised while tokenizing or driving contexts
#[derive(Debug, Error)]
pub enum ParsecError {
    /// Raised explicitly by a context that received a token it cannot accept
    #[error("Syntax error, unexpected token '{kind}'{}", at_position(.position))]
    Syntax {
        kind: String,
        position: Option<Position>,
    },

    /// No registered factory matched the requested context name
    #[error("Unresolved context '{name}' (searched namespaces: [{}])", .namespaces.join(", "))]
    UnresolvedContext {
        name: String,
        namespaces: Vec<String>,
    },

    /// The cursor was dereferenced outside of the token sequence
    #[error("Cursor out of bounds: index {index} outside of 0..{len}")]
    CursorOutOfBounds { index: isize, len: usize },

    /// A pattern table entry failed to compile
    #[error("Invalid pattern for token kind '{kind}': {source}")]
    InvalidPattern {
        kind: String,
        #[source]
        source: regex::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used by tokenizer, cursor, contexts and parser
pub type ParseResult<T> = Result<T, ParsecError>;

fn at_position(position: &Option<Position>) -> String {
    match position {
        Some(position) => format!(" at {}", position),
        None => String::new(),
    }
}

impl ParsecError {
    /// Build a syntax error for a token kind, with or without a known position
    pub fn syntax(kind: impl Into<String>, position: Option<Position>) -> Self {
        ParsecError::Syntax {
            kind: kind.into(),
            position,
        }
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, ParsecError::Syntax { .. })
    }
}
