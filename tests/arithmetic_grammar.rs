//! The bundled arithmetic grammar, end to end

use parsec_engine::parsec::config::Loader;
use parsec_engine::parsec::grammars::arithmetic::{self, Expression};
use parsec_engine::parsec::{Params, Parser};
use rstest::rstest;

#[rstest]
#[case("6 * (2 / 3)", 4.0)]
#[case("3 + 4", 7.0)]
#[case("3 + 4 - 10", -3.0)] // right-recursive: 3 + (4 - 10)
#[case("10 - 4 - 3", 9.0)] // 10 - (4 - 3)
#[case("2 * (3 + 1)", 8.0)]
#[case("(((5)))", 5.0)]
#[case("1 / 4", 0.25)]
fn test_evaluate(#[case] expression: &str, #[case] expected: f64) {
    let value = arithmetic::evaluate(expression).unwrap();
    assert!((value - expected).abs() < 1e-9, "{} = {}", expression, value);
}

#[test]
fn test_syntax_error_position() {
    let mut parser = arithmetic::parser().unwrap();
    let err = parser
        .parse("1 +\n2 3", arithmetic::ROOT, Params::new(), Some("calc"))
        .unwrap_err();

    assert!(err.is_syntax());
    insta::assert_snapshot!(
        err.to_string(),
        @"Syntax error, unexpected token 'number' at character 2 in line 1 in 'calc'"
    );
    assert_eq!(parser.depth(), 0);
}

#[test]
fn test_stray_text_has_no_position() {
    let err = arithmetic::evaluate("1 + 2 $").unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"Syntax error, unexpected token 'text'");

    let mut parser = arithmetic::parser().unwrap();
    parser.tokenizer_mut().add_pattern("dollar", r"\$").unwrap();
    let value = parser
        .parse("1 + 2 $", arithmetic::ROOT, Params::new(), Some("calc"))
        .unwrap();
    assert_eq!(value, 3.0);
}

#[test]
fn test_parser_from_config() {
    let config = Loader::new()
        .with_str(
            r#"
            [registry]
            namespaces = ["calc"]

            [[tokenizer.patterns]]
            kind = "number"
            pattern = "[0-9]+"

            [[tokenizer.patterns]]
            kind = "plus"
            pattern = '\+'
            "#,
        )
        .build()
        .unwrap();

    let mut parser = Parser::<f64>::from_config(&config).unwrap();
    parser
        .registry_mut()
        .register_context::<Expression>("calc::Expression");

    let value = parser
        .parse("20 + 22", "Expression", Params::new(), None)
        .unwrap();
    assert_eq!(value, 42.0);
}

#[test]
fn test_parse_file() {
    let path = std::env::temp_dir().join(format!("parsec-arith-{}.txt", std::process::id()));
    std::fs::write(&path, "2 *\n(4 + 1)").unwrap();

    let mut parser = arithmetic::parser().unwrap();
    let value = parser
        .parse_file(&path, arithmetic::ROOT, Params::new())
        .unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(value, 10.0);
}
