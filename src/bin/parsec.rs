//! Command-line interface for parsec
//! Evaluates arithmetic with the bundled grammar and dumps the tokens of any input.
//!
//! Usage:
//!   parsec eval `<expression>`                             - Evaluate an arithmetic expression
//!   parsec tokens `<path>` [--format simple|json|yaml]    - Print the tokens of a file ('-' for stdin)
//!
//! Global options:
//!   --config `<file>`     Layer a TOML file over the built-in defaults
//!   --log-level `<level>` Override `logging.level`
#[path = "parsec/logging.rs"]
mod logging;

use clap::{Arg, Command};
use config::ConfigError;
use parsec_engine::parsec::config::{Loader, ParsecConfig};
use parsec_engine::parsec::cursor::TokenCursor;
use parsec_engine::parsec::grammars::arithmetic;
use parsec_engine::parsec::tokenizing::Tokenizer;
use parsec_engine::parsec::ParsecError;
use std::io::{self, Read};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Parse(#[from] ParsecError),

    #[error("Error reading input: {0}")]
    Io(#[from] io::Error),

    #[error("Error formatting tokens: {0}")]
    Format(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

fn main() {
    let matches = Command::new("parsec")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Context-driven tokenizing and parsing")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("TOML file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .help("Log level: off, error, warn, info, debug, trace"),
        )
        .subcommand(
            Command::new("eval")
                .about("Evaluate an arithmetic expression")
                .arg(
                    Arg::new("expression")
                        .help("Expression such as '6 * (2 / 3)'")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("tokens")
                .about("Print the tokens of a file")
                .arg(
                    Arg::new("path")
                        .help("Path to the input file, '-' for stdin")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format")
                        .value_parser(["simple", "json", "yaml"])
                        .default_value("simple"),
                ),
        )
        .get_matches();

    let result = load_config(
        matches.get_one::<String>("config").map(String::as_str),
        matches.get_one::<String>("log-level").map(String::as_str),
    )
    .and_then(|config| {
        logging::init(&config.logging).map_err(CliError::Logging)?;
        match matches.subcommand() {
            Some(("eval", eval_matches)) => {
                let expression = string_arg(eval_matches, "expression");
                handle_eval_command(expression)
            }
            Some(("tokens", tokens_matches)) => {
                let path = string_arg(tokens_matches, "path");
                let format = string_arg(tokens_matches, "format");
                handle_tokens_command(&config, path, format)
            }
            _ => Ok(()),
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn string_arg<'a>(matches: &'a clap::ArgMatches, name: &str) -> &'a str {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .unwrap_or_default()
}

fn load_config(path: Option<&str>, log_level: Option<&str>) -> Result<ParsecConfig, CliError> {
    let mut loader = Loader::new();
    if let Some(path) = path {
        loader = loader.with_file(path);
    }
    if let Some(level) = log_level {
        loader = loader.set_override("logging.level", level)?;
    }
    Ok(loader.build()?)
}

/// Handle the eval command
fn handle_eval_command(expression: &str) -> Result<(), CliError> {
    println!("{}", eval_output(expression)?);
    Ok(())
}

/// Handle the tokens command
fn handle_tokens_command(config: &ParsecConfig, path: &str, format: &str) -> Result<(), CliError> {
    let (source, source_name) = read_source(path)?;
    println!(
        "{}",
        tokens_output(config, &source, source_name.as_deref(), format)?
    );
    Ok(())
}

fn eval_output(expression: &str) -> Result<String, CliError> {
    Ok(arithmetic::evaluate(expression)?.to_string())
}

/// Read `path`, or stdin for "-"; a file path doubles as the source name
fn read_source(path: &str) -> Result<(String, Option<String>), CliError> {
    if path == "-" {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source)?;
        Ok((source, None))
    } else {
        Ok((std::fs::read_to_string(path)?, Some(path.to_string())))
    }
}

fn tokens_output(
    config: &ParsecConfig,
    source: &str,
    source_name: Option<&str>,
    format: &str,
) -> Result<String, CliError> {
    let tokenizer = if config.tokenizer.patterns.is_empty() {
        debug!(target: "parsec::cli", "No patterns configured, using the arithmetic table");
        Tokenizer::new(arithmetic::patterns()?)
            .with_ignore_whitespace(config.tokenizer.ignore_whitespace)
    } else {
        Tokenizer::from_config(&config.tokenizer)?
    };

    let cursor = TokenCursor::new(tokenizer.tokenize(source, source_name));
    let tokens = cursor.tokens();

    let formatted = match format {
        "json" => {
            serde_json::to_string_pretty(tokens).map_err(|e| CliError::Format(e.to_string()))?
        }
        "yaml" => serde_yaml::to_string(tokens).map_err(|e| CliError::Format(e.to_string()))?,
        _ => tokens
            .iter()
            .map(|token| token.to_string())
            .collect::<Vec<_>>()
            .join("\n"),
    };
    Ok(formatted)
}
