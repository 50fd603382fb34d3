//! Handler tables
//!
//!     Each context variant declares, once, which token kinds it reacts to. The table
//!     maps a kind name to a plain function; kinds that are not in the table are
//!     ignored unless the table has a catch-all handler.
//!
//!     Tables are meant to live in a `once_cell::sync::Lazy` static inside the
//!     variant's [`Context::handlers`](super::Context::handlers) implementation:
//!
//!     ```rust,ignore
//!     fn handlers() -> &'static HandlerTable<Self, f64> {
//!         static HANDLERS: Lazy<HandlerTable<Expression, f64>> = Lazy::new(|| {
//!             HandlerTable::new()
//!                 .on("number", Expression::number)
//!                 .on("plus", Expression::plus)
//!         });
//!         &HANDLERS
//!     }
//!     ```

use crate::parsec::error::ParseResult;
use crate::parsec::parser::Parser;
use std::collections::HashMap;
use std::fmt;

/// A token handler: receives the context, the parser driving it and the token value
pub type Handler<C, V> = fn(&mut C, &mut Parser<V>, Option<&str>) -> ParseResult<()>;

pub struct HandlerTable<C, V> {
    handlers: HashMap<String, Handler<C, V>>,
    catch_all: Option<Handler<C, V>>,
}

impl<C, V> HandlerTable<C, V> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            catch_all: None,
        }
    }

    /// Route tokens of `kind` to `handler`
    pub fn on(mut self, kind: impl Into<String>, handler: Handler<C, V>) -> Self {
        self.handlers.insert(kind.into(), handler);
        self
    }

    /// Route every kind without its own handler to `handler`
    pub fn catch_all(mut self, handler: Handler<C, V>) -> Self {
        self.catch_all = Some(handler);
        self
    }

    /// Catch-all that appends raw token values to the context's accumulator
    pub fn catch_all_append(self) -> Self
    where
        C: Accumulate,
    {
        self.catch_all(append_value::<C, V>)
    }

    /// The handler for `kind`: its own, else the catch-all, else none
    pub fn resolve(&self, kind: &str) -> Option<Handler<C, V>> {
        self.handlers.get(kind).copied().or(self.catch_all)
    }

    pub fn handles(&self, kind: &str) -> bool {
        self.handlers.contains_key(kind)
    }

    pub fn has_catch_all(&self) -> bool {
        self.catch_all.is_some()
    }
}

impl<C, V> Default for HandlerTable<C, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, V> fmt::Debug for HandlerTable<C, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        f.debug_struct("HandlerTable")
            .field("kinds", &kinds)
            .field("catch_all", &self.catch_all.is_some())
            .finish()
    }
}

/// A context that collects raw token text, used with [`HandlerTable::catch_all_append`]
pub trait Accumulate {
    fn accumulator(&mut self) -> &mut String;
}

/// Append the token value to the context's accumulator
pub fn append_value<C: Accumulate, V>(
    context: &mut C,
    _parser: &mut Parser<V>,
    value: Option<&str>,
) -> ParseResult<()> {
    if let Some(value) = value {
        context.accumulator().push_str(value);
    }
    Ok(())
}
