//! Errors for query translation.

use thiserror::Error;

use super::parser::ParseError;

/// A type for translation errors.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Queries containing {0} are not supported.")]
    NotSupported(String),
    #[error(transparent)]
    Parse(#[from] ParseError),
}
