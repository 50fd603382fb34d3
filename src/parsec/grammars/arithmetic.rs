//! Arithmetic expressions
//!
//!     A single `Expression` context evaluates integers with `+ - * /` and brackets.
//!     Evaluation is right-recursive and has no precedence: `a op rest` enters a fresh
//!     `Expression` for `rest` and exits with `a op rest`. An opening bracket multiplies
//!     the pending number (1 when there is none) by the bracketed expression. A closing
//!     bracket or the end of the stream exits with the pending number.
//!
//!         2 * 3 + 4   evaluates as   2 * (3 + 4) = 14
//!         6 * (2 / 3) evaluates as   4
//!
//!     Values are `f64`, so division is real division. Anything the patterns do not
//!     cover ends up as text and is a syntax error, and so is a number that directly
//!     follows another one.

use crate::parsec::context::{Context, ContextState, HandlerTable, Params};
use crate::parsec::error::ParseResult;
use crate::parsec::parser::Parser;
use crate::parsec::registry::ContextRegistry;
use crate::parsec::token::{EOS, TEXT};
use crate::parsec::tokenizing::{PatternTable, Tokenizer};
use once_cell::sync::Lazy;

pub const NAMESPACE: &str = "arith";
pub const ROOT: &str = "Expression";

/// Token kinds in priority order
pub const PATTERNS: [(&str, &str); 7] = [
    ("number", "[0-9]+"),
    ("plus", r"\+"),
    ("minus", "-"),
    ("multi", r"\*"),
    ("div", "/"),
    ("bracketOpen", r"\("),
    ("bracketClose", r"\)"),
];

pub fn patterns() -> ParseResult<PatternTable> {
    PatternTable::from_pairs(PATTERNS)
}

/// Register the grammar's contexts and make its namespace searchable
pub fn register(registry: &mut ContextRegistry<f64>) {
    registry
        .register_context::<Expression>(format!("{}::{}", NAMESPACE, ROOT))
        .add_namespace(NAMESPACE);
}

/// A parser ready to evaluate expressions
pub fn parser() -> ParseResult<Parser<f64>> {
    let mut registry = ContextRegistry::new();
    register(&mut registry);
    Ok(Parser::new(Tokenizer::new(patterns()?), registry))
}

pub fn evaluate(expression: &str) -> ParseResult<f64> {
    parser()?.parse(expression, ROOT, Params::new(), None)
}

pub struct Expression {
    state: ContextState<f64>,
    number: Option<f64>,
}

type Operator = fn(f64, f64) -> f64;

impl Expression {
    fn pending(&self) -> f64 {
        self.number.unwrap_or_default()
    }

    fn apply(&mut self, parser: &mut Parser<f64>, operator: Operator) -> ParseResult<()> {
        let rest = self.enter_context(parser, ROOT, Params::new())?;
        let value = operator(self.pending(), rest);
        self.exit_context(value);
        Ok(())
    }

    fn number(&mut self, _parser: &mut Parser<f64>, value: Option<&str>) -> ParseResult<()> {
        if self.number.is_some() {
            return Err(self.syntax_error());
        }
        let number = value
            .unwrap_or_default()
            .parse::<f64>()
            .map_err(|_| self.syntax_error())?;
        self.number = Some(number);
        Ok(())
    }

    fn plus(&mut self, parser: &mut Parser<f64>, _value: Option<&str>) -> ParseResult<()> {
        self.apply(parser, |a, b| a + b)
    }

    fn minus(&mut self, parser: &mut Parser<f64>, _value: Option<&str>) -> ParseResult<()> {
        self.apply(parser, |a, b| a - b)
    }

    fn multi(&mut self, parser: &mut Parser<f64>, _value: Option<&str>) -> ParseResult<()> {
        self.apply(parser, |a, b| a * b)
    }

    fn div(&mut self, parser: &mut Parser<f64>, _value: Option<&str>) -> ParseResult<()> {
        self.apply(parser, |a, b| a / b)
    }

    fn bracket_open(&mut self, parser: &mut Parser<f64>, _value: Option<&str>) -> ParseResult<()> {
        self.number.get_or_insert(1.0);
        self.apply(parser, |a, b| a * b)
    }

    fn close(&mut self, _parser: &mut Parser<f64>, _value: Option<&str>) -> ParseResult<()> {
        let value = self.pending();
        self.exit_context(value);
        Ok(())
    }

    fn text(&mut self, _parser: &mut Parser<f64>, _value: Option<&str>) -> ParseResult<()> {
        Err(self.syntax_error())
    }
}

impl Context<f64> for Expression {
    fn create(state: ContextState<f64>) -> Self {
        Expression {
            state,
            number: None,
        }
    }

    fn state(&self) -> &ContextState<f64> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ContextState<f64> {
        &mut self.state
    }

    fn handlers() -> &'static HandlerTable<Self, f64> {
        static HANDLERS: Lazy<HandlerTable<Expression, f64>> = Lazy::new(|| {
            HandlerTable::new()
                .on("number", Expression::number)
                .on("plus", Expression::plus)
                .on("minus", Expression::minus)
                .on("multi", Expression::multi)
                .on("div", Expression::div)
                .on("bracketOpen", Expression::bracket_open)
                .on("bracketClose", Expression::close)
                .on(EOS, Expression::close)
                .on(TEXT, Expression::text)
        });
        &HANDLERS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsec::error::ParsecError;
    use rstest::rstest;

    #[rstest]
    #[case("3 + 4", 7.0)]
    #[case("10 - 4", 6.0)]
    #[case("2 * 3 + 4", 14.0)]
    #[case("8 / 2", 4.0)]
    #[case("(2 + 3)", 5.0)]
    #[case("42", 42.0)]
    #[case("", 0.0)]
    fn test_evaluate(#[case] expression: &str, #[case] expected: f64) {
        assert_eq!(evaluate(expression).unwrap(), expected);
    }

    #[test]
    fn test_real_division() {
        let value = evaluate("6 * (2 / 3)").unwrap();
        assert!((value - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_stray_text() {
        let err = evaluate("3 + x").unwrap_err();
        assert!(err.is_syntax());
        assert!(matches!(err, ParsecError::Syntax { ref kind, .. } if kind == "text"));
    }

    #[test]
    fn test_adjacent_numbers() {
        let err = evaluate("4 2").unwrap_err();
        assert!(matches!(
            err,
            ParsecError::Syntax { ref kind, position: Some(ref position) }
                if kind == "number" && position.offset == 2
        ));
    }

    #[test]
    fn test_register_uses_namespace() {
        let mut registry = ContextRegistry::new();
        register(&mut registry);
        assert_eq!(registry.namespaces(), ["arith"]);
        assert!(registry.contains(ROOT));
    }
}
