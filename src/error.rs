//! Error types for envargs operations.
//!
//! This module defines [`EnvArgsError`], the primary error type returned by
//! a resolution pass, the narrower errors it wraps, and a [`Result`] alias.
//!
//! # Error Handling Strategy
//!
//! - Declaration problems surface immediately from `add_argument` as
//!   [`DeclarationError`]
//! - Token problems ([`ValueError`]) are wrapped with the argument they
//!   belong to, and the environment key when the tokens came from one
//! - Host parser failures keep the original `clap::Error` so the caller can
//!   render or `exit()` it the way clap does

use std::path::PathBuf;
use thiserror::Error;

/// An argument declaration was rejected.
#[derive(Debug, Error)]
#[error("Invalid declaration for '{argument}': {reason}")]
pub struct DeclarationError {
    /// Destination name of the rejected argument.
    pub argument: String,
    /// Why it was rejected.
    pub reason: String,
}

impl DeclarationError {
    pub(crate) fn new(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            argument: argument.into(),
            reason: reason.into(),
        }
    }
}

/// Available tokens do not satisfy an arity pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected}, got {available}")]
pub struct ArityError {
    /// Human description of the pattern (e.g. "3 values").
    pub expected: String,
    /// Number of tokens that were available.
    pub available: usize,
}

/// A token failed per-argument conversion or validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} value: '{token}'")]
pub struct ConversionError {
    /// Name of the expected value kind.
    pub kind: String,
    /// The raw token that failed.
    pub token: String,
}

impl ConversionError {
    pub fn new(kind: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            token: token.into(),
        }
    }
}

/// Why a set of raw tokens could not become a value.
#[derive(Debug, Error)]
pub enum ValueError {
    /// Environment string is not valid shell words (e.g. unbalanced quote).
    #[error("malformed shell quoting in {raw:?}")]
    MalformedInput { raw: String },

    /// Token count does not fit the arity pattern.
    #[error(transparent)]
    Arity(#[from] ArityError),

    /// A token failed conversion.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Failure reported by a custom environment parser.
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}

/// Core error type for envargs operations.
#[derive(Debug, Error)]
pub enum EnvArgsError {
    /// Argument declaration rejected.
    #[error(transparent)]
    Declaration(#[from] DeclarationError),

    /// An environment-sourced value could not be resolved.
    #[error("argument '{argument}' (from environment variable {key}): {source}")]
    Environment {
        argument: String,
        key: String,
        #[source]
        source: ValueError,
    },

    /// A command-line value failed conversion.
    #[error("argument '{argument}': {source}")]
    InvalidValue {
        argument: String,
        #[source]
        source: ValueError,
    },

    /// The underlying command-line parser rejected the input.
    #[error(transparent)]
    CommandLine(#[from] clap::Error),

    /// Tokens nothing consumed, escalated by `parse_args`.
    #[error("unrecognized arguments: {}", tokens.join(" "))]
    UnrecognizedArguments { tokens: Vec<String> },

    /// Declaration file not found at expected location.
    #[error("Spec file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse a declaration file.
    #[error("Failed to parse spec at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EnvArgsError {
    /// Name of the argument responsible for this error, if one is known.
    pub fn argument(&self) -> Option<&str> {
        match self {
            Self::Declaration(err) => Some(&err.argument),
            Self::Environment { argument, .. } | Self::InvalidValue { argument, .. } => {
                Some(argument)
            }
            _ => None,
        }
    }
}

/// Result type alias for envargs operations.
pub type Result<T> = std::result::Result<T, EnvArgsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_error_displays_argument_and_reason() {
        let err = DeclarationError::new("bar", "positional arguments may not specify env");
        let msg = err.to_string();
        assert!(msg.contains("bar"));
        assert!(msg.contains("positional arguments may not specify env"));
    }

    #[test]
    fn environment_error_names_argument_and_key() {
        let err = EnvArgsError::Environment {
            argument: "bar".into(),
            key: "BAR".into(),
            source: ValueError::Conversion(ConversionError::new("integer", "x")),
        };
        let msg = err.to_string();
        assert!(msg.contains("'bar'"));
        assert!(msg.contains("BAR"));
        assert!(msg.contains("invalid integer value: 'x'"));
        assert_eq!(err.argument(), Some("bar"));
    }

    #[test]
    fn malformed_input_shows_raw_value() {
        let err = ValueError::MalformedInput {
            raw: "'open".into(),
        };
        assert!(err.to_string().contains("'open"));
    }

    #[test]
    fn arity_error_displays_expectation() {
        let err = ArityError {
            expected: "3 values".into(),
            available: 2,
        };
        assert_eq!(err.to_string(), "expected 3 values, got 2");
    }

    #[test]
    fn unrecognized_arguments_joins_tokens() {
        let err = EnvArgsError::UnrecognizedArguments {
            tokens: vec!["3".into(), "--zzz".into()],
        };
        assert_eq!(err.to_string(), "unrecognized arguments: 3 --zzz");
        assert_eq!(err.argument(), None);
    }

    #[test]
    fn config_parse_error_displays_path_and_message() {
        let err = EnvArgsError::ConfigParseError {
            path: PathBuf::from("/args.yml"),
            message: "invalid syntax".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/args.yml"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: EnvArgsError = io_err.into();
        assert!(matches!(err, EnvArgsError::Io(_)));
    }
}
