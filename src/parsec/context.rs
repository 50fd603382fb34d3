//! Contexts
//!
//!     A context is a stateful handler for one fragment of a grammar. The parser feeds it
//!     tokens one at a time; for each token the context looks up a handler by the
//!     token's kind, runs it, and tells the parser whether it wants to exit. Handlers can
//!     enter child contexts, which consume tokens from the same cursor and hand back a
//!     value. That is how recursion is expressed: an `Expression` context that sees `+`
//!     enters another `Expression` for the right-hand side and exits with the sum.
//!
//! Writing a Context
//!
//!     Implement [`Context`] for a struct that embeds a [`ContextState`]:
//!         - `create` builds the context when it is entered (this is the place to set a
//!           default exit value);
//!         - `handlers` returns the variant's [`HandlerTable`], built once;
//!         - `before_token` / `after_token` optionally wrap every handled token.
//!
//!     A token kind without a handler is ignored, silently. Grammars opt into strictness
//!     by handling the kinds they care about, or by installing a catch-all.
//!
//! Parent Contexts
//!
//!     The state keeps a [`ContextRef`] to the context that entered it. The reference
//!     does not own anything; [`Parser::frame`] resolves it to the parent's name and
//!     parameters while the parent is active.

pub mod handlers;
pub mod params;

pub use handlers::{append_value, Accumulate, Handler, HandlerTable};
pub use params::Params;

use crate::parsec::error::{ParsecError, ParseResult};
use crate::parsec::parser::Parser;
use crate::parsec::position::Position;
use crate::parsec::token::Token;
use serde_json::Value;
use std::rc::Rc;

/// Non-owning handle on an entered context: its depth in the chain and its name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextRef {
    depth: usize,
    name: String,
}

impl ContextRef {
    pub(crate) fn new(depth: usize, name: impl Into<String>) -> Self {
        Self {
            depth,
            name: name.into(),
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The engine-managed part of every context
#[derive(Debug)]
pub struct ContextState<V> {
    handle: ContextRef,
    params: Rc<Params>,
    parent: Option<ContextRef>,
    exited: bool,
    exit_value: V,
    current: Option<Token>,
}

impl<V: Default> ContextState<V> {
    /// State for a context used on its own, outside of a parser run
    pub fn new(name: &str, params: Params) -> Self {
        Self::entered(ContextRef::new(0, name), Rc::new(params), None)
    }

    pub(crate) fn entered(handle: ContextRef, params: Rc<Params>, parent: Option<ContextRef>) -> Self {
        Self {
            handle,
            params,
            parent,
            exited: false,
            exit_value: V::default(),
            current: None,
        }
    }

    /// Move the exit value out, leaving the default behind
    pub(crate) fn take_exit_value(&mut self) -> V {
        std::mem::take(&mut self.exit_value)
    }
}

impl<V> ContextState<V> {
    /// Replace the value returned when the context is driven to the end without exiting
    pub fn with_default_exit_value(mut self, value: V) -> Self {
        self.exit_value = value;
        self
    }

    /// Update the exit value without flagging the context for exit
    pub fn set_default_exit_value(&mut self, value: V) {
        self.exit_value = value;
    }

    pub fn handle(&self) -> &ContextRef {
        &self.handle
    }

    pub fn name(&self) -> &str {
        self.handle.name()
    }

    pub fn parent(&self) -> Option<&ContextRef> {
        self.parent.as_ref()
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn has_param(&self, name: &str) -> bool {
        self.params.has(name)
    }

    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    pub fn param_or(&self, name: &str, default: impl Into<Value>) -> Value {
        self.params.get_or(name, default)
    }

    /// Flag the context for exit; a later call overwrites the value
    pub fn exit(&mut self, value: V) {
        self.exit_value = value;
        self.exited = true;
    }

    pub fn has_exited(&self) -> bool {
        self.exited
    }

    pub fn exit_value(&self) -> &V {
        &self.exit_value
    }

    /// The token being handled, or the last one handled
    pub fn current_token(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    pub(crate) fn set_current_token(&mut self, token: &Token) {
        self.current = Some(token.clone());
    }

    /// Syntax error about the current token
    pub fn syntax_error(&self) -> ParsecError {
        match &self.current {
            Some(token) => ParsecError::syntax(token.kind(), token.position().cloned()),
            None => ParsecError::syntax("unknown", None),
        }
    }
}

/// A grammar fragment driven by the parser
pub trait Context<V: 'static>: Sized + 'static {
    /// Build the context when it is entered
    fn create(state: ContextState<V>) -> Self;

    fn state(&self) -> &ContextState<V>;

    fn state_mut(&mut self) -> &mut ContextState<V>;

    /// The variant's handler table
    fn handlers() -> &'static HandlerTable<Self, V>;

    /// Runs before every handled token
    fn before_token(&mut self, _parser: &mut Parser<V>) -> ParseResult<()> {
        Ok(())
    }

    /// Runs after every handled token
    fn after_token(&mut self, _parser: &mut Parser<V>) -> ParseResult<()> {
        Ok(())
    }

    /// Enter a child context on the shared cursor and return its exit value
    fn enter_context(&self, parser: &mut Parser<V>, name: &str, params: Params) -> ParseResult<V>
    where
        V: Default + 'static,
    {
        parser.enter_context(name, params, Some(self.state().handle().clone()))
    }

    /// Exit once the current handler returns
    fn exit_context(&mut self, value: V) {
        self.state_mut().exit(value);
    }

    /// Syntax error about the token being handled
    fn syntax_error(&self) -> ParsecError {
        self.state().syntax_error()
    }

    /// Syntax error about an explicit kind and position
    fn syntax_error_at(&self, kind: &str, position: Option<Position>) -> ParsecError {
        ParsecError::syntax(kind, position)
    }

    fn param(&self, name: &str) -> Option<&Value> {
        self.state().param(name)
    }
}

/// Object-safe face of a context, used by the parser's dispatch loop
pub trait Dispatch<V> {
    /// Handle one token; returns whether the context asked to exit
    fn execute(&mut self, parser: &mut Parser<V>, token: &Token) -> ParseResult<bool>;

    fn has_exited(&self) -> bool;

    fn into_exit_value(self: Box<Self>) -> V;
}

impl<V: Default + 'static, C: Context<V>> Dispatch<V> for C {
    fn execute(&mut self, parser: &mut Parser<V>, token: &Token) -> ParseResult<bool> {
        self.state_mut().set_current_token(token);

        let Some(handler) = <C as Context<V>>::handlers().resolve(token.kind()) else {
            return Ok(false);
        };

        self.before_token(parser)?;
        handler(self, parser, token.value())?;
        self.after_token(parser)?;

        Ok(self.state().has_exited())
    }

    fn has_exited(&self) -> bool {
        self.state().has_exited()
    }

    fn into_exit_value(mut self: Box<Self>) -> V {
        self.state_mut().take_exit_value()
    }
}
