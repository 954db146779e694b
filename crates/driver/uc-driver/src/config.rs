//! Driver configuration

use codespan_reporting::term;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{fs, io};
use toml::de;

/// Options controlling a compilation run
///
/// Every field has a default, so an empty document is a valid configuration:
///
/// ```toml
/// module_name = "main"
/// log_filter = "uc_ir_lower=debug"
///
/// [diagnostics]
/// style = "rich"
/// tab_width = 4
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Name of the produced IR module
    pub module_name: String,

    /// Tracing filter directives used instead of `RUST_LOG`
    pub log_filter: Option<String>,

    /// Diagnostic rendering
    pub diagnostics: DiagnosticsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            module_name: "main".to_string(),
            log_filter: None,
            diagnostics: DiagnosticsConfig::default(),
        }
    }
}

/// How diagnostics are rendered
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiagnosticsConfig {
    /// Amount of source context shown
    pub style: DiagnosticStyle,

    /// Columns per tab when rendering source snippets
    pub tab_width: usize,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            style: DiagnosticStyle::Rich,
            tab_width: 4,
        }
    }
}

impl DiagnosticsConfig {
    /// Renderer configuration for `codespan-reporting`
    #[must_use]
    pub fn term_config(&self) -> term::Config {
        term::Config {
            display_style: match self.style {
                DiagnosticStyle::Rich => term::DisplayStyle::Rich,
                DiagnosticStyle::Medium => term::DisplayStyle::Medium,
                DiagnosticStyle::Short => term::DisplayStyle::Short,
            },
            tab_width: self.tab_width,
            ..term::Config::default()
        }
    }
}

/// Diagnostic layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticStyle {
    /// Message, labels and source snippets
    Rich,
    /// Message and notes
    Medium,
    /// Single line per diagnostic
    Short,
}

/// Configuration could not be loaded
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The document is not valid TOML or does not match [`Config`]
    #[error("invalid configuration: {0}")]
    Parse(#[from] de::Error),

    /// The configuration file could not be read
    #[error("cannot read `{}`: {source}", path.display())]
    Io {
        /// File that was read
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },
}

impl Config {
    /// Parses a configuration document
    ///
    /// # Errors
    ///
    /// Fails on invalid TOML, unknown keys and ill-typed values.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Reads and parses a configuration file
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_document_uses_defaults() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
        assert_eq!(Config::default().module_name, "main");
        assert_eq!(Config::default().diagnostics.tab_width, 4);
    }

    #[test]
    fn test_partial_document() {
        let config = Config::from_toml_str(
            r#"
            module_name = "prog"

            [diagnostics]
            style = "short"
            "#,
        )
        .unwrap();

        assert_eq!(config.module_name, "prog");
        assert_eq!(config.log_filter, None);
        assert_eq!(config.diagnostics.style, DiagnosticStyle::Short);
        assert_eq!(config.diagnostics.tab_width, 4);
        assert_eq!(config.diagnostics.term_config().tab_width, 4);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let err = Config::from_toml_str("modul_name = \"x\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load("/nonexistent/uc.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/uc.toml"));
    }
}
