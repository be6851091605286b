//! SQL Server native error and validator.
//!
//! SQL Server identifies failures by a signed error *number*. The client
//! error type here carries that number and the server message; driver
//! adapters convert their own error type into it (or implement
//! [`NativeError`] for the driver type directly).

use crate::definitions::sqlserver::SQLSERVER_CODES;
use crate::{NativeError, TableValidator};
use std::error::Error;
use std::fmt;
use zeroize::Zeroize;

/// Validator recognizing [`SqlServerError`] by error number.
pub type SqlServerValidator = TableValidator<SqlServerError>;

impl TableValidator<SqlServerError> {
    /// Validator over the built-in SQL Server table.
    #[inline]
    pub const fn new() -> Self {
        Self::with_table(SQLSERVER_CODES)
    }
}

impl Default for TableValidator<SqlServerError> {
    fn default() -> Self {
        Self::new()
    }
}

/// An error reported by a SQL Server client.
///
/// The message is zeroized on drop.
pub struct SqlServerError {
    number: i32,
    message: String,
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

impl SqlServerError {
    /// Create an error with the given number and server message.
    pub fn new(number: i32, message: impl Into<String>) -> Self {
        Self {
            number,
            message: message.into(),
            source: None,
        }
    }

    /// Attach an underlying cause (transport error, TDS decode failure, ...).
    pub fn with_source(mut self, source: impl Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// The SQL Server error number.
    #[inline]
    pub const fn number(&self) -> i32 {
        self.number
    }

    /// The server message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Drop for SqlServerError {
    fn drop(&mut self) {
        self.message.zeroize();
    }
}

impl fmt::Debug for SqlServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlServerError")
            .field("number", &self.number)
            .field("message", &"<REDACTED>")
            .field("has_source", &self.source.is_some())
            .finish()
    }
}

impl fmt::Display for SqlServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SQL Server error {}: {}", self.number, self.message)
    }
}

impl Error for SqlServerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn Error + 'static))
    }
}

impl NativeError for SqlServerError {
    type Code = i32;
    const ENGINE: &'static str = "sqlserver";

    #[inline]
    fn code(&self) -> i32 {
        self.number
    }

    #[inline]
    fn message(&self) -> &str {
        &self.message
    }
}
