//! Structured log record for translated violations.
//!
//! The classifier never logs. Callers that want to record a violation ask it
//! for a [`ViolationLog`], which borrows from the violation and so cannot
//! outlive it: the copied vendor message is zeroized when the violation
//! drops, and no log record can keep it alive past that point.
//!
//! Structured sinks read the fields directly; text sinks use
//! [`ViolationLog::write_to`], which bounds every free-text field.

use crate::{ErrorCode, ViolationKind};
use std::borrow::Cow;
use std::fmt;

/// Maximum bytes of any free-text field in formatted output.
pub const MAX_FIELD_OUTPUT_LEN: usize = 1024;

/// Appended to fields cut at `MAX_FIELD_OUTPUT_LEN`.
pub const TRUNCATION_INDICATOR: &str = "...[TRUNCATED]";

/// Structured view of a [`ConstraintViolation`](crate::ConstraintViolation).
///
/// # Example
///
/// ```rust
/// # #[cfg(feature = "sqlserver")]
/// # {
/// use constraint_guard::{RawError, SqlServerError, ValidatorRegistry};
/// use std::sync::Arc;
///
/// let raw: RawError = Arc::new(SqlServerError::new(515, "Cannot insert the value NULL"));
/// let resolution = ValidatorRegistry::with_builtin().dispatch(raw);
/// let violation = resolution.violation().expect("515 is mapped");
///
/// let mut line = String::new();
/// violation.with_internal_log(|log| log.write_to(&mut line)).unwrap();
/// assert_eq!(
///     line,
///     "[sqlserver 515] kind=not_null depth=1 message='Cannot insert the value NULL'"
/// );
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ViolationLog<'a> {
    /// Portable classification.
    pub kind: ViolationKind,
    /// Engine whose validator produced the violation.
    pub engine: &'static str,
    /// Engine code that matched.
    pub code: ErrorCode,
    /// Native message. Not truncated here.
    pub message: &'a str,
    /// Number of links in the dispatched error's `source()` chain.
    pub chain_depth: usize,
}

impl<'a> ViolationLog<'a> {
    /// Write a single-line record without intermediate allocation
    /// (unless a field needs truncating).
    ///
    /// Format: `[{engine} {code}] kind={kind} depth={chain_depth} message='{message}'`
    pub fn write_to(&self, f: &mut impl fmt::Write) -> fmt::Result {
        write!(
            f,
            "[{} {}] kind={} depth={} message='{}'",
            self.engine,
            self.code,
            self.kind.as_str(),
            self.chain_depth,
            truncate_with_indicator(self.message)
        )
    }

    /// Portable classification.
    #[inline]
    pub const fn kind(&self) -> ViolationKind {
        self.kind
    }

    /// Engine name.
    #[inline]
    pub const fn engine(&self) -> &'static str {
        self.engine
    }

    /// Matched code.
    #[inline]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Untruncated native message.
    #[inline]
    pub const fn message(&self) -> &'a str {
        self.message
    }

    /// 1 when the native error was dispatched bare.
    #[inline]
    pub const fn chain_depth(&self) -> usize {
        self.chain_depth
    }
}

/// Bound a field for text output, cutting on a UTF-8 boundary.
///
/// Borrows when the field already fits.
fn truncate_with_indicator(s: &str) -> Cow<'_, str> {
    if s.len() <= MAX_FIELD_OUTPUT_LEN {
        return Cow::Borrowed(s);
    }

    let mut cut = MAX_FIELD_OUTPUT_LEN.saturating_sub(TRUNCATION_INDICATOR.len());
    while cut > 0 && !s.is_char_boundary(cut) {
        cut -= 1;
    }

    let mut bounded = String::with_capacity(cut + TRUNCATION_INDICATOR.len());
    bounded.push_str(&s[..cut]);
    bounded.push_str(TRUNCATION_INDICATOR);
    Cow::Owned(bounded)
}
