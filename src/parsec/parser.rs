//! Parser
//!
//!     The parser ties the pieces together: it tokenizes the source, wraps the tokens in a
//!     [`TokenCursor`] and enters the root context. Every context, root or nested, is run
//!     by the same dispatch loop:
//!
//!         1. advance the cursor (it never steps past the end marker);
//!         2. hand the current token to the context;
//!         3. stop when the context exited, or when no token is left after the current one.
//!
//!     The loop runs at least once, so a context entered while the cursor rests on the
//!     end marker still receives it. A context that never exits is driven to the end of
//!     the stream and returns its default exit value.
//!
//! Frames
//!
//!     While a context is active the parser keeps a [`Frame`] for it (name and
//!     parameters). Contexts refer to their parent through a [`ContextRef`] and look the
//!     frame up with [`Parser::frame`]. Frames are popped when the context returns, errors
//!     included.
//!
//!     Nesting is plain recursion on the call stack. There is no depth limit.
//!
//! Source and Data
//!
//!     The parser keeps the text of the last [`Parser::tokenize`] run so handlers can
//!     slice it by token offsets. Next to it sits a free-form data slot, a JSON value
//!     that grammars use to share results across contexts. Tokenizing replaces the
//!     source; the data slot is left alone.

use crate::parsec::config::ParsecConfig;
use crate::parsec::context::{ContextRef, ContextState, Dispatch, Params};
use crate::parsec::cursor::TokenCursor;
use crate::parsec::error::{ParsecError, ParseResult};
use crate::parsec::registry::ContextRegistry;
use crate::parsec::tokenizing::Tokenizer;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use tracing::{debug, trace};

/// An active context, as seen by its children
#[derive(Debug, Clone)]
pub struct Frame {
    name: String,
    params: Rc<Params>,
}

impl Frame {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &Params {
        &self.params
    }
}

pub struct Parser<V> {
    tokenizer: Tokenizer,
    registry: ContextRegistry<V>,
    cursor: TokenCursor,
    frames: Vec<Frame>,
    source: String,
    data: Option<Value>,
}

impl<V> Parser<V> {
    pub fn new(tokenizer: Tokenizer, registry: ContextRegistry<V>) -> Self {
        Self {
            tokenizer,
            registry,
            cursor: TokenCursor::new(Vec::new()),
            frames: Vec::new(),
            source: String::new(),
            data: None,
        }
    }

    /// Tokenizer and registry settings from configuration; contexts still have to be
    /// registered
    pub fn from_config(config: &ParsecConfig) -> ParseResult<Self> {
        Ok(Self::new(
            Tokenizer::from_config(&config.tokenizer)?,
            ContextRegistry::from_config(&config.registry),
        ))
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn tokenizer_mut(&mut self) -> &mut Tokenizer {
        &mut self.tokenizer
    }

    pub fn registry(&self) -> &ContextRegistry<V> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ContextRegistry<V> {
        &mut self.registry
    }

    pub fn cursor(&self) -> &TokenCursor {
        &self.cursor
    }

    /// The shared cursor; moving it affects every active context
    pub fn cursor_mut(&mut self) -> &mut TokenCursor {
        &mut self.cursor
    }

    /// Number of active contexts
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// The frame `context` points to, if that context is still active
    pub fn frame(&self, context: &ContextRef) -> Option<&Frame> {
        self.frames
            .get(context.depth())
            .filter(|frame| frame.name == context.name())
    }

    /// Text of the last tokenize run
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn data_mut(&mut self) -> Option<&mut Value> {
        self.data.as_mut()
    }

    /// Replace the data slot
    pub fn set_data(&mut self, data: impl Into<Value>) {
        self.data = Some(data.into());
    }

    /// Empty the data slot, returning what it held
    pub fn take_data(&mut self) -> Option<Value> {
        self.data.take()
    }

    /// Tokenize `source` into a fresh cursor, dropping any previous run
    pub fn tokenize(&mut self, source: &str, source_name: Option<&str>) {
        let tokens = self.tokenizer.tokenize(source, source_name);
        self.cursor = TokenCursor::new(tokens);
        self.frames.clear();
        self.source = source.to_string();
    }
}

impl<V: Default + 'static> Parser<V> {
    /// Tokenize `source` and drive the root context over it
    pub fn parse(
        &mut self,
        source: &str,
        root: &str,
        params: Params,
        source_name: Option<&str>,
    ) -> ParseResult<V> {
        debug!(
            target: "parsec::parser",
            root,
            source = source_name.unwrap_or("<input>"),
            "Parsing"
        );
        self.tokenize(source, source_name);
        self.enter_context(root, params, None)
    }

    /// Read `path` and parse it; the path becomes the source name in positions
    pub fn parse_file(&mut self, path: impl AsRef<Path>, root: &str, params: Params) -> ParseResult<V> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        let name = path.display().to_string();
        self.parse(&source, root, params, Some(&name))
    }

    /// Resolve `name`, run the new context on the shared cursor and return its exit value
    pub fn enter_context(
        &mut self,
        name: &str,
        params: Params,
        parent: Option<ContextRef>,
    ) -> ParseResult<V> {
        let factory = self
            .registry
            .resolve(name)
            .ok_or_else(|| ParsecError::UnresolvedContext {
                name: name.to_string(),
                namespaces: self.registry.namespaces().to_vec(),
            })?;

        let depth = self.frames.len();
        let params = Rc::new(params);
        self.frames.push(Frame {
            name: name.to_string(),
            params: Rc::clone(&params),
        });
        debug!(target: "parsec::parser", context = name, depth, "Entering context");

        let mut context = factory(ContextState::entered(
            ContextRef::new(depth, name),
            params,
            parent,
        ));
        let driven = self.drive(context.as_mut());
        self.frames.truncate(depth);
        driven?;

        debug!(
            target: "parsec::parser",
            context = name,
            depth,
            exited = context.has_exited(),
            "Leaving context"
        );
        Ok(context.into_exit_value())
    }

    fn drive(&mut self, context: &mut dyn Dispatch<V>) -> ParseResult<()> {
        loop {
            self.cursor.advance();
            let token = self.cursor.current_token()?.clone();
            trace!(
                target: "parsec::parser",
                position = self.cursor.position(),
                %token,
                "Dispatching token"
            );

            let exited = context.execute(self, &token)?;
            if exited || !self.cursor.has_more_tokens() {
                return Ok(());
            }
        }
    }
}

impl<V> Default for Parser<V> {
    fn default() -> Self {
        Self::new(Tokenizer::default(), ContextRegistry::new())
    }
}
