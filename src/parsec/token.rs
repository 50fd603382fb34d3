//! Token values produced by the tokenizer
//!
//!     A token is either a pattern match ([`Token::Lexeme`]), a run of source text that no
//!     pattern matched ([`Token::Text`]) or the [`Token::EndOfStream`] sentinel that the
//!     parser appends to every sequence.
//!
//!     Contexts dispatch on the token's kind name. Text and the end marker have reserved
//!     kind names, [`TEXT`] and [`EOS`], so grammars can handle them like any other kind.

use crate::parsec::position::Position;
use serde::Serialize;
use std::fmt;

/// Kind name of [`Token::Text`]
pub const TEXT: &str = "text";

/// Kind name of [`Token::EndOfStream`]
pub const EOS: &str = "eos";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "token", rename_all = "snake_case")]
pub enum Token {
    /// Source text between two matches, possibly trimmed
    Text { value: String },
    /// A match of the pattern registered under `kind`
    Lexeme {
        kind: String,
        value: String,
        position: Position,
    },
    EndOfStream,
}

impl Token {
    pub fn text(value: impl Into<String>) -> Self {
        Token::Text {
            value: value.into(),
        }
    }

    pub fn lexeme(kind: impl Into<String>, value: impl Into<String>, position: Position) -> Self {
        Token::Lexeme {
            kind: kind.into(),
            value: value.into(),
            position,
        }
    }

    /// The kind name used for handler dispatch and navigation
    pub fn kind(&self) -> &str {
        match self {
            Token::Text { .. } => TEXT,
            Token::Lexeme { kind, .. } => kind.as_str(),
            Token::EndOfStream => EOS,
        }
    }

    /// The raw value; the end marker has none
    pub fn value(&self) -> Option<&str> {
        match self {
            Token::Text { value } | Token::Lexeme { value, .. } => Some(value.as_str()),
            Token::EndOfStream => None,
        }
    }

    /// Only lexemes carry a position
    pub fn position(&self) -> Option<&Position> {
        match self {
            Token::Lexeme { position, .. } => Some(position),
            _ => None,
        }
    }

    /// Check whether this token has the given kind name
    pub fn is(&self, kind: &str) -> bool {
        self.kind() == kind
    }

    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Token::EndOfStream)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Text { value } => write!(f, "{}:{:?}", TEXT, value),
            Token::Lexeme {
                kind,
                value,
                position,
            } => write!(f, "{}:{:?}@{}", kind, value, position.offset),
            Token::EndOfStream => write!(f, "{}", EOS),
        }
    }
}
