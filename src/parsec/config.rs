//! Engine configuration
//!
//!     `defaults/parsec.default.toml` is embedded into the crate so documented defaults
//!     and runtime behavior stay in sync. Callers layer their own files and key overrides
//!     on top with [`Loader`] before deserializing into [`ParsecConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/parsec.default.toml");

/// Top-level configuration for the engine and the CLI
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ParsecConfig {
    pub tokenizer: TokenizerConfig,
    pub registry: RegistryConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenizerConfig {
    pub ignore_whitespace: bool,
    /// Ordered pattern table; earlier entries win ties
    #[serde(default)]
    pub patterns: Vec<PatternConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PatternConfig {
    pub kind: String,
    pub pattern: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegistryConfig {
    pub namespace_separator: String,
    #[serde(default)]
    pub namespaces: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Compact => "compact",
            LogFormat::Json => "json",
        };
        f.write_str(name)
    }
}

/// Layers user files and overrides over the built-in defaults
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start from the embedded defaults
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a TOML file; a missing file is an error at build time
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer a TOML file if it exists
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer TOML text, e.g. an inline grammar table
    pub fn with_str(mut self, toml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(toml, FileFormat::Toml));
        self
    }

    /// Override a single key (`logging.level`, `tokenizer.ignore_whitespace`, ...)
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<ParsecConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults, nothing layered on top
pub fn load_defaults() -> Result<ParsecConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert!(config.tokenizer.ignore_whitespace);
        assert!(config.tokenizer.patterns.is_empty());
        assert_eq!(config.registry.namespace_separator, "::");
        assert!(config.registry.namespaces.is_empty());
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, LogFormat::Compact);
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("logging.format", "json")
            .expect("override to apply")
            .set_override("tokenizer.ignore_whitespace", false)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(!config.tokenizer.ignore_whitespace);
    }

    #[test]
    fn layers_pattern_table() {
        let config = Loader::new()
            .with_str(
                r#"
                [[tokenizer.patterns]]
                kind = "number"
                pattern = "[0-9]+"

                [[tokenizer.patterns]]
                kind = "plus"
                pattern = '\+'
                "#,
            )
            .build()
            .expect("config to build");

        let kinds: Vec<&str> = config
            .tokenizer
            .patterns
            .iter()
            .map(|p| p.kind.as_str())
            .collect();
        assert_eq!(kinds, vec!["number", "plus"]);
        assert_eq!(config.tokenizer.patterns[1].pattern, r"\+");
    }

    #[test]
    fn layers_files() {
        let path = std::env::temp_dir().join(format!("parsec-config-{}.toml", std::process::id()));
        std::fs::write(&path, "[registry]\nnamespaces = [\"arith\", \"\"]\n").unwrap();

        let config = Loader::new()
            .with_file(&path)
            .with_optional_file("/definitely/not/here.toml")
            .build()
            .expect("config to build");
        std::fs::remove_file(&path).ok();

        assert_eq!(config.registry.namespaces, vec!["arith", ""]);
        assert_eq!(config.registry.namespace_separator, "::");
    }

    #[test]
    fn missing_required_file_fails() {
        let result = Loader::new().with_file("/definitely/not/here.toml").build();
        assert!(result.is_err());
    }
}
