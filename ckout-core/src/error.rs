//! Error types shared by the parser, the store and the typed accessors.

use thiserror::Error;

/// Errors surfaced by configuration lookups.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required parameter has no value in the sources and no default.
    #[error("Configuration parameter {section}.{option} not found")]
    Missing { section: String, option: String },

    /// A resolved value failed a type, range or validator check.
    #[error("Configuration parameter `{section}.{option} = {value}` is invalid: {reason}")]
    Invalid {
        section: String,
        option: String,
        value: String,
        reason: String,
    },

    /// A configuration source is malformed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A `%(name)s` reference in a value could not be expanded.
    #[error("bad interpolation in {section}.{option}: {kind}")]
    Interpolation {
        section: String,
        option: String,
        kind: InterpolationErrorKind,
    },
}

impl ConfigError {
    pub fn missing(section: &str, option: &str) -> Self {
        Self::Missing {
            section: section.to_owned(),
            option: option.to_owned(),
        }
    }

    pub fn invalid(
        section: &str,
        option: &str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Invalid {
            section: section.to_owned(),
            option: option.to_owned(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// `true` for [`ConfigError::Missing`].
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing { .. })
    }

    /// `true` for [`ConfigError::Invalid`].
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid { .. })
    }
}

/// A syntax error in a configuration source, with its location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{origin}{}: {kind}", line_suffix(.line))]
pub struct ParseError {
    /// File path or `<string>` for in-memory sources.
    pub origin: String,
    /// Line reported by the INI reader; unset for structural errors
    /// found after reading.
    pub line: Option<usize>,
    pub kind: ParseErrorKind,
}

fn line_suffix(line: &Option<usize>) -> String {
    line.map(|l| format!(":{l}")).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("option found before any section header")]
    MissingSectionHeader,

    #[error("section [{0}] already declared in this source")]
    DuplicateSection(String),

    #[error("option `{option}` already declared in section [{section}]")]
    DuplicateOption { section: String, option: String },

    #[error("option with an empty name in section [{0}]")]
    EmptyOption(String),

    #[error("{0}")]
    Syntax(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpolationErrorKind {
    #[error("referenced option `{reference}` does not exist")]
    Missing { reference: String },

    #[error("{0}")]
    Syntax(String),

    #[error("recursion limit exceeded")]
    Depth,
}
