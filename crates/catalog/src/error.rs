// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types for catalog operations.

use std::fmt;

/// Classifies what went wrong in a catalog operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The typed cache failed.
    Cache,
    /// The authoritative source failed.
    Source,
    /// Input was rejected before reaching the cache or the source.
    Validation,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cache => "cache",
            Self::Source => "source",
            Self::Validation => "validation",
        })
    }
}

/// An error from a catalog operation.
///
/// # Examples
///
/// ```
/// use catalog::{Error, ErrorKind};
///
/// let error = Error::validation("name must not be blank");
/// assert_eq!(error.kind(), ErrorKind::Validation);
/// ```
#[ohno::error]
#[display("catalog {kind} failure")]
#[from(stash::Error(kind: ErrorKind::Cache))]
pub struct Error {
    kind: ErrorKind,
}

impl Error {
    /// Creates a validation error with the given reason.
    pub fn validation(reason: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(ErrorKind::Validation, reason)
    }

    /// Creates a source error wrapping the given cause.
    pub fn source_failure(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(ErrorKind::Source, cause)
    }

    /// Returns the kind of failure.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// A specialized [`Result`] type for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stash_errors_become_cache_errors() {
        let stash_error = stash::Error::caused_by(stash::ErrorKind::Decompression, "bad gzip");
        let error: Error = stash_error.into();
        assert_eq!(error.kind(), ErrorKind::Cache);
    }

    #[test]
    fn display_mentions_kind_and_reason() {
        let error = Error::validation("gender must not be blank");
        let display_str = format!("{error}");
        assert!(display_str.contains("validation"), "got: {display_str}");
        assert!(display_str.contains("gender must not be blank"), "got: {display_str}");
    }
}
