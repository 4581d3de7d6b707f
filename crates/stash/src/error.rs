// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types for typed cache operations.

use std::fmt;

/// Classifies what went wrong in a typed cache operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The underlying byte store failed.
    Store,
    /// Gzip compression of a payload failed.
    Compression,
    /// Gzip decompression of a payload failed, usually because it is corrupt.
    Decompression,
    /// A value could not be serialized.
    Serialization,
    /// A payload could not be turned back into the requested type.
    Deserialization,
}

impl ErrorKind {
    /// Returns a short, stable name for this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Store => "store",
            Self::Compression => "compression",
            Self::Decompression => "decompression",
            Self::Serialization => "serialization",
            Self::Deserialization => "deserialization",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error from a typed cache operation.
///
/// Every error carries an [`ErrorKind`]; the underlying cause, if any, is reachable
/// through [`std::error::Error::source()`].
///
/// # Examples
///
/// ```
/// use stash::{Error, ErrorKind};
///
/// let error = Error::caused_by(ErrorKind::Decompression, "invalid gzip header");
/// assert_eq!(error.kind(), ErrorKind::Decompression);
/// ```
#[ohno::error]
#[display("stash {kind} failure")]
#[from(stash_tier::Error(kind: ErrorKind::Store))]
pub struct Error {
    kind: ErrorKind,
}

impl Error {
    /// Returns the kind of failure.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns `true` if the underlying byte store failed.
    #[must_use]
    pub fn is_store(&self) -> bool {
        self.kind == ErrorKind::Store
    }
}

/// A specialized [`Result`] type for typed cache operations.
pub type Result<T> = std::result::Result<T, Error>;
