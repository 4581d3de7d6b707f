// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types for byte store operations.

/// An error from a byte store operation.
///
/// This is an opaque error type that wraps whatever went wrong inside a backend:
/// an unreachable server, a timed out connection, a poisoned local structure.
/// Use [`std::error::Error::source()`] to reach the underlying cause.
///
/// # Example
///
/// ```
/// use stash_tier::Error;
///
/// let error = Error::from_message("connection refused");
/// ```
#[ohno::error]
pub struct Error {}

impl Error {
    /// Creates a new error from any type that can be converted to an error.
    ///
    /// Backends living outside this crate use this to report their failures.
    ///
    /// # Examples
    ///
    /// ```
    /// use stash_tier::Error;
    ///
    /// let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "backend timed out");
    /// let error = Error::from_message(io);
    /// ```
    pub fn from_message(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(cause)
    }
}

/// A specialized [`Result`] type for byte store operations.
pub type Result<T> = std::result::Result<T, Error>;
