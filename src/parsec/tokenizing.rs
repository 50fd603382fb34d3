//! Tokenizer
//!
//!     Turns source text into a flat sequence of [`Token`]s using an ordered
//!     [`PatternTable`]. It is a one-shot pass: the whole source is tokenized before any
//!     context sees a token.
//!
//! The Scan
//!
//!     From the current offset, every pattern is searched forward and the match that
//!     starts first is taken. On equal starts the pattern registered earlier wins; a
//!     later candidate only replaces the current best when it starts strictly before
//!     it. A candidate must start before the end of the source.
//!
//!     The source between the previous token and the chosen match becomes a
//!     [`Token::Text`]. With `ignore_whitespace` (the default) that gap is trimmed and
//!     dropped when nothing is left. Trimming never touches matches: a pattern that
//!     matches whitespace still produces lexemes.
//!
//!     When nothing matches, the rest of the source becomes trailing text and the scan
//!     ends.
//!
//! Zero-Length Matches
//!
//!     A pattern may match the empty string. The scan then resumes one character after
//!     the match so it always makes progress, and the skipped character is kept as the
//!     start of the next text gap. Concatenating the values of an untrimmed run always
//!     rebuilds the source exactly.

pub mod patterns;

pub use patterns::{Pattern, PatternTable};

use crate::parsec::config::TokenizerConfig;
use crate::parsec::error::ParseResult;
use crate::parsec::position::LineIndex;
use crate::parsec::token::Token;
use tracing::{debug, trace};

/// The earliest match found from some offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NextMatch<'t> {
    kind: &'t str,
    start: usize,
    end: usize,
}

#[derive(Debug, Clone)]
pub struct Tokenizer {
    patterns: PatternTable,
    ignore_whitespace: bool,
}

impl Tokenizer {
    pub fn new(patterns: PatternTable) -> Self {
        Self {
            patterns,
            ignore_whitespace: true,
        }
    }

    /// Build a tokenizer from configuration, compiling its pattern list in order
    pub fn from_config(config: &TokenizerConfig) -> ParseResult<Self> {
        let patterns = PatternTable::from_pairs(
            config
                .patterns
                .iter()
                .map(|entry| (entry.kind.as_str(), entry.pattern.as_str())),
        )?;
        Ok(Self::new(patterns).with_ignore_whitespace(config.ignore_whitespace))
    }

    pub fn with_ignore_whitespace(mut self, ignore: bool) -> Self {
        self.ignore_whitespace = ignore;
        self
    }

    pub fn set_ignore_whitespace(&mut self, ignore: bool) -> &mut Self {
        self.ignore_whitespace = ignore;
        self
    }

    pub fn is_whitespace_ignored(&self) -> bool {
        self.ignore_whitespace
    }

    pub fn patterns(&self) -> &PatternTable {
        &self.patterns
    }

    pub fn patterns_mut(&mut self) -> &mut PatternTable {
        &mut self.patterns
    }

    /// Replace the whole pattern table
    pub fn set_patterns(&mut self, patterns: PatternTable) -> &mut Self {
        self.patterns = patterns;
        self
    }

    /// Register one more pattern at the lowest priority
    pub fn add_pattern(&mut self, kind: impl Into<String>, pattern: &str) -> ParseResult<&mut Self> {
        self.patterns.add(kind, pattern)?;
        Ok(self)
    }

    /// Tokenize `source`. The end marker is not appended here; the parser adds it.
    pub fn tokenize(&self, source: &str, source_name: Option<&str>) -> Vec<Token> {
        let index = LineIndex::new(source, source_name);
        let length = source.len();
        let mut tokens = Vec::new();
        let mut gap_start = 0;
        let mut offset = 0;

        while offset <= length {
            let next = self.next_match(source, offset);
            let match_start = next.map_or(length, |found| found.start);

            self.push_text(&mut tokens, &source[gap_start..match_start]);

            let Some(found) = next else {
                break;
            };

            trace!(
                target: "parsec::tokenizer",
                kind = found.kind,
                start = found.start,
                end = found.end,
                "Matched pattern"
            );
            tokens.push(Token::lexeme(
                found.kind,
                &source[found.start..found.end],
                index.position(found.start),
            ));

            if found.end > found.start {
                gap_start = found.end;
                offset = found.end;
            } else {
                gap_start = found.start;
                offset = next_char_boundary(source, found.start);
            }
        }

        debug!(
            target: "parsec::tokenizer",
            source = source_name.unwrap_or("<string>"),
            bytes = length,
            tokens = tokens.len(),
            "Tokenized source"
        );
        tokens
    }

    /// Find the match that starts first at or after `offset`
    fn next_match(&self, source: &str, offset: usize) -> Option<NextMatch<'_>> {
        let mut best: Option<NextMatch<'_>> = None;
        let mut best_start = source.len();

        for pattern in self.patterns.iter() {
            if let Some(found) = pattern.regex().find_at(source, offset) {
                // strict comparison: on a tie the earlier pattern keeps priority
                if found.start() < best_start {
                    best_start = found.start();
                    best = Some(NextMatch {
                        kind: pattern.kind(),
                        start: found.start(),
                        end: found.end(),
                    });
                }
            }
        }

        best
    }

    fn push_text(&self, tokens: &mut Vec<Token>, gap: &str) {
        let text = if self.ignore_whitespace {
            gap.trim()
        } else {
            gap
        };
        if !text.is_empty() {
            tokens.push(Token::text(text));
        }
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(PatternTable::new())
    }
}

/// Offset of the character after the one starting at `offset`, or one past the end
fn next_char_boundary(source: &str, offset: usize) -> usize {
    source[offset..]
        .chars()
        .next()
        .map_or(offset + 1, |ch| offset + ch.len_utf8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsec::token::TEXT;

    fn arithmetic() -> Tokenizer {
        Tokenizer::new(
            PatternTable::from_pairs([("number", "[0-9]+"), ("plus", r"\+"), ("minus", "-")])
                .unwrap(),
        )
    }

    fn kinds(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(Token::kind).collect()
    }

    #[test]
    fn test_tokenize_ignores_whitespace() {
        let tokens = arithmetic().tokenize("3 + 4 - 10", None);

        assert_eq!(kinds(&tokens), vec!["number", "plus", "number", "minus", "number"]);
        let offsets: Vec<usize> = tokens
            .iter()
            .map(|t| t.position().unwrap().offset)
            .collect();
        assert_eq!(offsets, vec![0, 2, 4, 6, 8]);
        assert_eq!(tokens[4].value(), Some("10"));
    }

    #[test]
    fn test_tokenize_keeps_whitespace() {
        let tokens = arithmetic()
            .with_ignore_whitespace(false)
            .tokenize("3 + 4 - 10", None);

        assert_eq!(tokens.len(), 9);
        assert!(tokens[0].is("number"));
        assert_eq!(tokens[1], Token::text(" "));
        assert!(tokens[1].is(TEXT));
    }

    #[test]
    fn test_empty_source_yields_no_tokens() {
        assert!(arithmetic().tokenize("", None).is_empty());
        assert!(arithmetic().tokenize("   ", None).is_empty());
    }

    #[test]
    fn test_unmatched_source_is_trailing_text() {
        let tokens = arithmetic().tokenize("1 apples", None);
        assert_eq!(tokens, vec![tokens[0].clone(), Token::text("apples")]);
        assert!(tokens[0].is("number"));
    }

    #[test]
    fn test_tie_goes_to_earlier_pattern() {
        let tokenizer = Tokenizer::new(
            PatternTable::from_pairs([("keyword", "if"), ("ident", "[a-z]+")]).unwrap(),
        );
        let tokens = tokenizer.tokenize("if", None);
        assert_eq!(kinds(&tokens), vec!["keyword"]);

        let reversed = Tokenizer::new(
            PatternTable::from_pairs([("ident", "[a-z]+"), ("keyword", "if")]).unwrap(),
        );
        assert_eq!(kinds(&reversed.tokenize("if", None)), vec!["ident"]);
    }

    #[test]
    fn test_earliest_start_beats_registration_order() {
        let tokenizer =
            Tokenizer::new(PatternTable::from_pairs([("b", "b"), ("a", "a")]).unwrap());
        assert_eq!(kinds(&tokenizer.tokenize("ab", None)), vec!["a", "b"]);
    }

    #[test]
    fn test_zero_length_match_makes_progress() {
        let tokenizer = Tokenizer::new(PatternTable::from_pairs([("empty", "x*")]).unwrap())
            .with_ignore_whitespace(false);
        let tokens = tokenizer.tokenize("ab", None);

        // one empty lexeme per character, the characters themselves survive as text
        let rebuilt: String = tokens.iter().filter_map(Token::value).collect();
        assert_eq!(rebuilt, "ab");
        assert!(tokens.iter().any(|t| t.is("empty")));
    }

    #[test]
    fn test_zero_length_match_on_multibyte_text() {
        let tokenizer = Tokenizer::new(PatternTable::from_pairs([("empty", "")]).unwrap())
            .with_ignore_whitespace(false);
        let tokens = tokenizer.tokenize("éü", None);
        let rebuilt: String = tokens.iter().filter_map(Token::value).collect();
        assert_eq!(rebuilt, "éü");
    }

    #[test]
    fn test_positions_use_source_name_and_lines() {
        let tokens = arithmetic().tokenize("1\n+ 2", Some("calc.txt"));
        let plus = tokens[1].position().unwrap();
        assert_eq!((plus.line, plus.character, plus.offset), (1, 0, 2));
        assert_eq!(plus.source.as_deref(), Some("calc.txt"));
    }

    #[test]
    fn test_add_pattern_lowest_priority() {
        let mut tokenizer = Tokenizer::default();
        tokenizer.add_pattern("word", "[a-z]+").unwrap();
        tokenizer.add_pattern("hello", "hello").unwrap();
        assert_eq!(kinds(&tokenizer.tokenize("hello", None)), vec!["word"]);
    }

    #[test]
    fn test_from_config() {
        use crate::parsec::config::PatternConfig;

        let config = TokenizerConfig {
            ignore_whitespace: false,
            patterns: vec![PatternConfig {
                kind: "number".to_string(),
                pattern: "[0-9]+".to_string(),
            }],
        };
        let tokenizer = Tokenizer::from_config(&config).unwrap();
        assert!(!tokenizer.is_whitespace_ignored());
        assert_eq!(tokenizer.tokenize("1 2", None).len(), 3);
    }
}
