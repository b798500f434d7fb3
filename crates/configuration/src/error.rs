//! Errors that can be thrown when processing configuration.

use std::path::PathBuf;

use thiserror::Error;

/// The errors that can be thrown when parsing a configuration directory.
#[derive(Debug, Error)]
pub enum ParseConfigurationError {
    #[error("parse error on {file_path}:{line}:{column}: {message}")]
    ParseError {
        file_path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    // This variant is the same as 'IoError', except that it has been stringified.
    // We use it where we need to preserve the file path alongside the error.
    #[error("I/O error: {0}")]
    IoErrorButStringified(String),
}

/// The errors that can be thrown when writing a configuration directory.
#[derive(Debug, Error)]
pub enum WriteParsedConfigurationError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// The errors that can be thrown when turning a parsed configuration into a runtime one.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MakeRuntimeConfigurationError {
    #[error("the space escape token must not be blank")]
    BlankSpaceEscapeToken,

    #[error("the space escape token must not contain whitespace: {token:?}")]
    WhitespaceInSpaceEscapeToken { token: String },
}
