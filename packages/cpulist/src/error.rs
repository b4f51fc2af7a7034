use std::num::ParseIntError;

use thiserror::Error;

/// Errors that can occur when processing cpulist strings.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The caller provided a supposed cpulist string but it did not match the expected format.
    #[error("invalid cpulist syntax: '{invalid_value}' is invalid: {problem}")]
    InvalidSyntax {
        /// The specific token that was invalid.
        invalid_value: String,

        /// A human-readable description of the problem.
        problem: String,

        /// The integer parsing failure behind the problem, if there was one.
        #[source]
        source: Option<ParseIntError>,
    },
}

impl Error {
    pub(crate) fn new(invalid_value: impl Into<String>, problem: impl Into<String>) -> Self {
        Self::InvalidSyntax {
            invalid_value: invalid_value.into(),
            problem: problem.into(),
            source: None,
        }
    }

    pub(crate) fn caused_by(
        invalid_value: impl Into<String>,
        problem: impl Into<String>,
        source: ParseIntError,
    ) -> Self {
        Self::InvalidSyntax {
            invalid_value: invalid_value.into(),
            problem: problem.into(),
            source: Some(source),
        }
    }
}

/// A specialized `Result` type for cpulist operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;
