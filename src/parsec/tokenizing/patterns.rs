//! Ordered pattern table
//!
//! Maps token kind names to compiled regular expressions. Registration order is the
//! tie-break priority: when two patterns match at the same offset, the one registered
//! first wins. Re-registering a kind keeps its original slot.

use crate::parsec::error::{ParsecError, ParseResult};
use regex::{Regex, RegexBuilder};

/// A single named pattern
#[derive(Debug, Clone)]
pub struct Pattern {
    kind: String,
    regex: Regex,
}

impl Pattern {
    /// Compile `pattern` in multi-line mode so `^` and `$` anchor at line boundaries
    pub fn new(kind: impl Into<String>, pattern: &str) -> ParseResult<Self> {
        let kind = kind.into();
        let regex = RegexBuilder::new(pattern)
            .multi_line(true)
            .build()
            .map_err(|source| ParsecError::InvalidPattern {
                kind: kind.clone(),
                source,
            })?;
        Ok(Self { kind, regex })
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PatternTable {
    patterns: Vec<Pattern>,
}

impl PatternTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(kind, pattern)` pairs, in order
    pub fn from_pairs<I, K, P>(pairs: I) -> ParseResult<Self>
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: AsRef<str>,
    {
        let mut table = Self::new();
        for (kind, pattern) in pairs {
            table.add(kind, pattern.as_ref())?;
        }
        Ok(table)
    }

    /// Register a pattern. An existing kind is replaced in place.
    pub fn add(&mut self, kind: impl Into<String>, pattern: &str) -> ParseResult<&mut Self> {
        let pattern = Pattern::new(kind, pattern)?;
        match self.patterns.iter_mut().find(|p| p.kind == pattern.kind) {
            Some(existing) => *existing = pattern,
            None => self.patterns.push(pattern),
        }
        Ok(self)
    }

    /// Remove a kind, returning whether it was registered
    pub fn remove(&mut self, kind: &str) -> bool {
        let before = self.patterns.len();
        self.patterns.retain(|p| p.kind != kind);
        self.patterns.len() != before
    }

    pub fn get(&self, kind: &str) -> Option<&Pattern> {
        self.patterns.iter().find(|p| p.kind == kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.get(kind).is_some()
    }

    /// Kind names in priority order
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.kind.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
