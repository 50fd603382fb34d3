//! Main module for the parsec engine
//!
//! Source text goes through two stages:
//!
//!     1. [`tokenizing`]: an ordered pattern table turns the source into a flat sequence
//!        of positioned tokens, with the unmatched text in between kept as text tokens.
//!     2. [`parser`]: the tokens are wrapped in a [`cursor::TokenCursor`] and fed one at a
//!        time to a stack of [`context`]s resolved by name through the [`registry`].
//!
//! Grammars are written as contexts. See [`grammars::arithmetic`] for a complete one.

pub mod config;
pub mod context;
pub mod cursor;
pub mod error;
pub mod grammars;
pub mod parser;
pub mod position;
pub mod registry;
pub mod token;
pub mod tokenizing;

pub use context::{Context, ContextRef, ContextState, HandlerTable, Params};
pub use cursor::{Direction, TokenCursor};
pub use error::{ParseResult, ParsecError};
pub use parser::Parser;
pub use position::Position;
pub use registry::ContextRegistry;
pub use token::Token;
pub use tokenizing::{PatternTable, Tokenizer};
