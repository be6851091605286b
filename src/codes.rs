//! Engine error codes and the tables that classify them.
//!
//! Every engine encodes constraint failures its own way:
//!
//! - **SQL Server**: a signed error *number* (`2627`, `547`, `515`)
//! - **PostgreSQL**: a five-character *SQLSTATE* token (`23505`, `23503`, ...)
//!
//! [`ErrorCode`] carries either shape. Codes have identity and equality only;
//! nothing in this crate orders them, and lookup never matches by prefix.
//!
//! # Code Tables
//!
//! A [`CodeTable`] maps one engine's codes to [`ViolationKind`]s. Static tables
//! borrow `'static` data (see `define_code_table!`); tables supplied at runtime
//! own their entries and are checked for duplicate codes on construction, so a
//! code can never map to two kinds.
//!
//! # Example
//!
//! ```rust
//! use constraint_guard::{CodeTable, ErrorCode, SqlState, ViolationKind};
//!
//! const UNIQUE: SqlState = SqlState::new("23505");
//!
//! let table = CodeTable::checked_new(vec![(UNIQUE, ViolationKind::PrimaryKey)]).unwrap();
//! assert_eq!(table.lookup(&UNIQUE), Some(ViolationKind::PrimaryKey));
//! assert_eq!(ErrorCode::from(UNIQUE).to_string(), "23505");
//! ```

use crate::ViolationKind;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// SQLSTATE
// ============================================================================

/// A validated five-character SQLSTATE token.
///
/// SQLSTATE values are exactly five ASCII letters or digits. The first two
/// characters are the *class* (`23` = integrity constraint violation), the
/// last three the *subclass*. Letters are kept exactly as given, so `22P02`
/// and `22p02` are different codes.
///
/// # Construction APIs
///
/// - `new`: For const tables (panics = compile error)
/// - `checked_new`: For runtime input (returns Result, never panics)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SqlState([u8; 5]);

impl SqlState {
    /// Create a SQLSTATE with compile-time validation.
    ///
    /// # Panics
    ///
    /// Panics if `state` is not exactly five ASCII alphanumeric characters.
    /// In const contexts this is a compile error.
    #[inline]
    pub const fn new(state: &str) -> Self {
        match Self::validate(state.as_bytes()) {
            Ok(bytes) => Self(bytes),
            Err(_) => panic!("SQLSTATE must be exactly 5 ASCII alphanumeric characters"),
        }
    }

    /// Create a SQLSTATE with runtime validation.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `state` has the wrong length or a character outside
    /// `[0-9A-Za-z]`.
    #[inline]
    pub fn checked_new(state: &str) -> Result<Self, SqlStateError> {
        Self::validate(state.as_bytes()).map(Self)
    }

    const fn validate(bytes: &[u8]) -> Result<[u8; 5], SqlStateError> {
        if bytes.len() != 5 {
            return Err(SqlStateError::InvalidLength { len: bytes.len() });
        }
        let mut out = [0u8; 5];
        let mut i = 0;
        while i < 5 {
            let b = bytes[i];
            if !b.is_ascii_alphanumeric() {
                return Err(SqlStateError::InvalidCharacter { position: i });
            }
            out[i] = b;
            i += 1;
        }
        Ok(out)
    }

    /// The five-character token.
    #[inline]
    pub fn as_str(&self) -> &str {
        // Validated ASCII on construction.
        std::str::from_utf8(&self.0).unwrap_or("?????")
    }

    /// The two-character class (`"23"` for integrity constraint violations).
    #[inline]
    pub fn class(&self) -> &str {
        &self.as_str()[..2]
    }
}

impl fmt::Debug for SqlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SqlState").field(&self.as_str()).finish()
    }
}

impl fmt::Display for SqlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SqlState {
    type Err = SqlStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::checked_new(s)
    }
}

/// Error type for SQLSTATE validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlStateError {
    /// Input was not exactly five bytes long.
    InvalidLength {
        /// Length of the rejected input in bytes.
        len: usize,
    },
    /// Input contained a byte outside `[0-9A-Za-z]`.
    InvalidCharacter {
        /// Byte offset of the first offending character.
        position: usize,
    },
}

impl fmt::Display for SqlStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength { len } => {
                write!(f, "SQLSTATE must be 5 characters, got {}", len)
            }
            Self::InvalidCharacter { position } => {
                write!(f, "SQLSTATE has a non-alphanumeric character at position {}", position)
            }
        }
    }
}

impl std::error::Error for SqlStateError {}

// ============================================================================
// Error Code
// ============================================================================

/// An engine-specific error identifier.
///
/// Copy because it is at most a few bytes and gets embedded in every
/// produced violation and log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Numeric error number (SQL Server and similar engines).
    Number(i32),
    /// SQLSTATE token (PostgreSQL and other SQL-standard engines).
    State(SqlState),
}

impl ErrorCode {
    /// The numeric code, if this is a numeric code.
    #[inline]
    pub const fn as_number(&self) -> Option<i32> {
        match self {
            Self::Number(n) => Some(*n),
            Self::State(_) => None,
        }
    }

    /// The SQLSTATE, if this is a SQLSTATE code.
    #[inline]
    pub const fn as_sql_state(&self) -> Option<SqlState> {
        match self {
            Self::Number(_) => None,
            Self::State(s) => Some(*s),
        }
    }
}

impl From<i32> for ErrorCode {
    fn from(number: i32) -> Self {
        Self::Number(number)
    }
}

impl From<SqlState> for ErrorCode {
    fn from(state: SqlState) -> Self {
        Self::State(state)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::State(s) => write!(f, "{}", s),
        }
    }
}

// ============================================================================
// Code Table
// ============================================================================

/// Ordered, duplicate-free mapping from one engine's codes to violation kinds.
///
/// Lookup is a linear scan by exact equality. Tables hold a handful of
/// entries, so this beats hashing and keeps `const` construction possible.
#[derive(Debug, Clone)]
pub struct CodeTable<C: Clone + 'static> {
    entries: Cow<'static, [(C, ViolationKind)]>,
}

impl<C> CodeTable<C>
where
    C: Copy + Eq + Into<ErrorCode> + 'static,
{
    /// Wrap a static table without copying it.
    ///
    /// The caller guarantees `entries` has no duplicate codes; the tables in
    /// [`crate::definitions`] are checked by their unit tests.
    #[inline]
    pub const fn from_static(entries: &'static [(C, ViolationKind)]) -> Self {
        Self {
            entries: Cow::Borrowed(entries),
        }
    }

    /// Build a table from entries supplied at runtime.
    ///
    /// # Errors
    ///
    /// Returns `CodeTableError::DuplicateCode` if any code appears twice,
    /// even when both entries name the same kind.
    pub fn checked_new(entries: Vec<(C, ViolationKind)>) -> Result<Self, CodeTableError> {
        for (i, (code, _)) in entries.iter().enumerate() {
            if entries[..i].iter().any(|(earlier, _)| earlier == code) {
                return Err(CodeTableError::DuplicateCode {
                    code: (*code).into(),
                });
            }
        }
        Ok(Self {
            entries: Cow::Owned(entries),
        })
    }

    /// Kind mapped to `code`, if any.
    #[inline]
    pub fn lookup(&self, code: &C) -> Option<ViolationKind> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == code)
            .map(|(_, kind)| *kind)
    }

    /// Whether `code` has an entry.
    #[inline]
    pub fn contains(&self, code: &C) -> bool {
        self.lookup(code).is_some()
    }

    /// Entries in declaration order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (C, ViolationKind)> + '_ {
        self.entries.iter().copied()
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Error type for code table construction failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeTableError {
    /// The same code was listed more than once.
    DuplicateCode {
        /// The repeated code.
        code: ErrorCode,
    },
}

impl fmt::Display for CodeTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateCode { code } => {
                write!(f, "code {} is mapped more than once", code)
            }
        }
    }
}

impl std::error::Error for CodeTableError {}

// ============================================================================
// Tests
// ============================================================================
