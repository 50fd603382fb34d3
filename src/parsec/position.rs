//! Position tracking for token locations
//!
//! This module maps byte offsets in the source text to positions that can be shown
//! in diagnostics.
//!
//! ## Types
//!
//! - [`Position`] - line, character within the line, absolute offset and source name
//! - [`LineIndex`] - line-start table built once per tokenizer run
//!
//! ## Key Design
//!
//! - **Computed per match**: the index stores one offset per line, never one per character
//! - **Zero-based**: both `line` and `character` start at 0
//! - **Byte offsets**: `character` and `offset` count bytes, matching regex match offsets
//! - **Efficient conversion**: O(log n) binary search over line starts

use serde::Serialize;
use std::fmt;

/// A location in source text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub line: usize,
    pub character: usize,
    pub offset: usize,
    pub source: Option<String>,
}

impl Position {
    pub fn new(line: usize, character: usize, offset: usize, source: Option<String>) -> Self {
        Self {
            line,
            character,
            offset,
            source,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "character {} in line {}", self.character, self.line)?;
        if let Some(source) = &self.source {
            write!(f, " in '{}'", source)?;
        }
        Ok(())
    }
}

/// Converts byte offsets to [`Position`]s for one source text
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offsets where each line starts
    line_starts: Vec<usize>,
    source_name: Option<String>,
}

impl LineIndex {
    /// Scan `source` once for line terminators
    pub fn new(source: &str, source_name: Option<&str>) -> Self {
        let mut line_starts = vec![0];

        for (byte_pos, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(byte_pos + 1);
            }
        }

        Self {
            line_starts,
            source_name: source_name.map(str::to_string),
        }
    }

    /// Convert a byte offset to a position
    pub fn position(&self, offset: usize) -> Position {
        let line = self
            .line_starts
            .binary_search(&offset)
            .unwrap_or_else(|i| i - 1);

        Position::new(
            line,
            offset - self.line_starts[line],
            offset,
            self.source_name.clone(),
        )
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte offset for the start of a line
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }

    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_single_line() {
        let index = LineIndex::new("3 + 4", None);
        assert_eq!(index.position(0), Position::new(0, 0, 0, None));
        assert_eq!(index.position(2), Position::new(0, 2, 2, None));
        assert_eq!(index.position(4), Position::new(0, 4, 4, None));
    }

    #[test]
    fn test_position_multiline() {
        let index = LineIndex::new("Hello\nworld\ntest", Some("doc.txt"));

        assert_eq!(index.position(0).line, 0);
        assert_eq!(index.position(5).character, 5);

        let second = index.position(6);
        assert_eq!((second.line, second.character), (1, 0));
        assert_eq!(second.offset, 6);

        let third = index.position(15);
        assert_eq!((third.line, third.character), (2, 3));
        assert_eq!(third.source.as_deref(), Some("doc.txt"));
    }

    #[test]
    fn test_position_on_line_break() {
        // The newline itself belongs to the line it terminates
        let index = LineIndex::new("ab\ncd", None);
        let pos = index.position(2);
        assert_eq!((pos.line, pos.character), (0, 2));
    }

    #[test]
    fn test_position_with_multibyte_text() {
        let index = LineIndex::new("é\nü", None);
        // 'é' is two bytes, the newline sits at byte 2
        assert_eq!(index.position(3).line, 1);
        assert_eq!(index.position(3).character, 0);
    }

    #[test]
    fn test_line_count_and_starts() {
        assert_eq!(LineIndex::new("", None).line_count(), 1);
        assert_eq!(LineIndex::new("single", None).line_count(), 1);

        let index = LineIndex::new("line1\nline2\n", None);
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.line_start(1), Some(6));
        assert_eq!(index.line_start(2), Some(12));
        assert_eq!(index.line_start(3), None);
    }

    #[test]
    fn test_position_display() {
        let named = Position::new(2, 7, 31, Some("calc.txt".to_string()));
        assert_eq!(format!("{}", named), "character 7 in line 2 in 'calc.txt'");

        let anonymous = Position::new(0, 3, 3, None);
        assert_eq!(format!("{}", anonymous), "character 3 in line 0");
    }
}
