// Allow unused assignments for diagnostic fields - they're used by the macros
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Error type for loading reason input and configuration
#[derive(Error, Debug, Diagnostic)]
pub enum ReasonError {
    /// Input document could not be read
    #[error("Failed to read {path}: {source}")]
    #[diagnostic(
        code(nodereason::read_error),
        help("Check that the file exists and is readable")
    )]
    ReadError {
        #[allow(unused)]
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Input document could not be parsed
    #[error("Failed to parse {format} input: {message}")]
    #[diagnostic(
        code(nodereason::parse_error),
        help("Reason counts must be a mapping of reason text to a non-negative integer")
    )]
    ParseError {
        #[allow(unused)]
        format: String,
        #[allow(unused)]
        message: String,
    },

    /// Environment variable holds something other than Unicode text
    #[error("Environment variable {name} is not valid unicode")]
    #[diagnostic(
        code(nodereason::invalid_environment),
        help("Set {name} to a comma-separated list of taint keys")
    )]
    InvalidEnvironment {
        #[allow(unused)]
        name: String,
    },
}

/// Result type for nodereason operations
pub type Result<T> = std::result::Result<T, ReasonError>;

impl ReasonError {
    /// Create a ReadError
    pub fn read_error(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Create a ParseError
    pub fn parse_error(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Create an InvalidEnvironment error
    pub fn invalid_environment(name: impl Into<String>) -> Self {
        Self::InvalidEnvironment { name: name.into() }
    }
}
