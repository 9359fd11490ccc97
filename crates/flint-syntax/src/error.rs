//! Error handling types and utilities for the Flint language toolchain.
//!
//! Flint distinguishes two failure surfaces. Parser and type-checker
//! diagnostics are accumulated as plain strings and never abort the
//! pipeline; this module's [`Error`] covers the conditions that do abort
//! it: unreadable input at the CLI boundary and fatal runtime conditions
//! in the evaluator (division by zero, unknown symbols, call mismatches).
//!
//! # Examples
//!
//! ```rust
//! use flint_syntax::error::{Error, Result, error};
//!
//! fn parse_count(s: &str) -> Result<i64> {
//!     s.parse().map_err(|_| Error::new(format!("Invalid count: {}", s)))
//! }
//!
//! fn positive_count(s: &str) -> Result<i64> {
//!     let n = parse_count(s)?;
//!     if n <= 0 {
//!         error("Count must be positive")
//!     } else {
//!         Ok(n)
//!     }
//! }
//! ```

use std::fmt;

/// An error that occurred while loading or executing a Flint program.
///
/// Fatal runtime conditions are non-recoverable from the language's
/// perspective: the evaluator gives up on the first one and the CLI
/// reports it and exits non-zero.
#[derive(Debug, Clone)]
pub struct Error {
    /// Human-readable error message
    pub msg: String,
}

impl Error {
    /// Creates a new error with the given message.
    ///
    /// ```rust
    /// use flint_syntax::Error;
    ///
    /// let error = Error::new("division by zero");
    /// ```
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::new(s)
    }
}
impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::new(s)
    }
}

/// A specialized `Result` type for Flint operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Convenience function to create an error result.
///
/// Shorthand for `Err(Error::new(msg))`.
///
/// ```rust
/// use flint_syntax::error::{Result, error};
///
/// fn checked_div(a: i64, b: i64) -> Result<i64> {
///     if b == 0 {
///         error("division by zero")
///     } else {
///         Ok(a / b)
///     }
/// }
/// ```
pub fn error<T>(msg: impl Into<String>) -> Result<T> {
    Err(Error::new(msg))
}
