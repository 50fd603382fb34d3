//! Token cursor
//!
//!     The cursor owns the finalized token sequence (tokenizer output plus the trailing
//!     [`Token::EndOfStream`]) and a signed position that starts at -1, before the first
//!     token. It is the single mutable resource shared by every active context: a child
//!     context that skips or rewinds changes what its parent sees once it returns.
//!
//!     Repositioning never clamps. Moving outside of the sequence is allowed, but
//!     dereferencing a position outside of `0..len` fails with
//!     [`ParsecError::CursorOutOfBounds`]. Lookahead predicates and searches that run off
//!     either end simply report that nothing was found.
//!
//!     Every scan is linear in the distance covered; no index is kept besides the flat
//!     sequence.

use crate::parsec::error::{ParsecError, ParseResult};
use crate::parsec::token::Token;

/// Scan direction for lookahead, lookbehind and skipping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    fn step(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TokenCursor {
    tokens: Vec<Token>,
    position: isize,
}

impl TokenCursor {
    /// Wrap tokenizer output, appending the end marker
    pub fn new(mut tokens: Vec<Token>) -> Self {
        tokens.push(Token::EndOfStream);
        Self {
            tokens,
            position: -1,
        }
    }

    pub fn position(&self) -> isize {
        self.position
    }

    /// Number of tokens, end marker included
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Move to an absolute position
    pub fn seek(&mut self, position: isize) -> &mut Self {
        self.position = position;
        self
    }

    pub fn skip_next(&mut self, how_many: usize) -> &mut Self {
        self.position += how_many as isize;
        self
    }

    pub fn rewind(&mut self, how_many: usize) -> &mut Self {
        self.position -= how_many as isize;
        self
    }

    /// Step in `direction` until the cursor rests on a token of `kind` or leaves the sequence
    pub fn skip_until(&mut self, kind: &str, direction: Direction) -> &mut Self {
        let step = direction.step();
        loop {
            self.position += step;
            match self.at(self.position) {
                Some(token) if !token.is(kind) => continue,
                _ => break,
            }
        }
        self
    }

    pub fn rewind_until(&mut self, kind: &str) -> &mut Self {
        self.skip_until(kind, Direction::Backward)
    }

    /// Whether a token remains after the current one
    pub fn has_more_tokens(&self) -> bool {
        self.position < self.last_index()
    }

    pub fn current_token(&self) -> ParseResult<&Token> {
        self.get(self.position)
    }

    pub fn current_token_value(&self) -> ParseResult<Option<&str>> {
        Ok(self.current_token()?.value())
    }

    /// Peek in `direction`, stepping over tokens whose kind is in `ignore`, and compare
    /// the first other token against `kind`
    pub fn is_next_token(&self, kind: &str, ignore: &[&str], direction: Direction) -> bool {
        let step = direction.step();
        let mut index = self.position;
        loop {
            index += step;
            match self.at(index) {
                Some(token) if ignore.contains(&token.kind()) => continue,
                Some(token) => return token.is(kind),
                None => return false,
            }
        }
    }

    pub fn is_previous_token(&self, kind: &str, ignore: &[&str]) -> bool {
        self.is_next_token(kind, ignore, Direction::Backward)
    }

    /// The token after the cursor; `consume` also moves onto it
    pub fn get_next_token(&mut self, consume: bool) -> ParseResult<&Token> {
        self.neighbour(1, consume)
    }

    /// The token before the cursor; `consume` also moves back onto it
    pub fn get_previous_token(&mut self, consume: bool) -> ParseResult<&Token> {
        self.neighbour(-1, consume)
    }

    pub fn get_next_token_value(&mut self, consume: bool) -> ParseResult<Option<&str>> {
        Ok(self.get_next_token(consume)?.value())
    }

    pub fn get_previous_token_value(&mut self, consume: bool) -> ParseResult<Option<&str>> {
        Ok(self.get_previous_token(consume)?.value())
    }

    /// Scan in `direction` for the nearest token of `kind`
    pub fn find_next_token(&self, kind: &str, direction: Direction) -> Option<&Token> {
        let step = direction.step();
        let mut index = self.position;
        loop {
            index += step;
            match self.at(index) {
                Some(token) if token.is(kind) => return Some(token),
                Some(_) => continue,
                None => return None,
            }
        }
    }

    pub fn find_next_token_value(&self, kind: &str, direction: Direction) -> Option<&str> {
        self.find_next_token(kind, direction).and_then(Token::value)
    }

    pub fn find_previous_token_value(&self, kind: &str) -> Option<&str> {
        self.find_next_token_value(kind, Direction::Backward)
    }

    /// Step onto the next token for dispatch. The cursor never steps past the end
    /// marker, so a context entered while resting on it receives it once more.
    pub(crate) fn advance(&mut self) {
        if self.position < self.last_index() {
            self.position += 1;
        }
    }

    fn neighbour(&mut self, offset: isize, consume: bool) -> ParseResult<&Token> {
        let index = self.position + offset;
        self.check(index)?;
        if consume {
            self.position = index;
        }
        self.get(index)
    }

    fn get(&self, index: isize) -> ParseResult<&Token> {
        self.at(index).ok_or(ParsecError::CursorOutOfBounds {
            index,
            len: self.tokens.len(),
        })
    }

    fn check(&self, index: isize) -> ParseResult<()> {
        self.get(index).map(|_| ())
    }

    fn at(&self, index: isize) -> Option<&Token> {
        usize::try_from(index).ok().and_then(|i| self.tokens.get(i))
    }

    fn last_index(&self) -> isize {
        self.tokens.len() as isize - 1
    }
}
