//! # Constraint Guard
//!
//! Portable classification of database constraint-violation errors.
//!
//! Database clients surface constraint failures through vendor-specific
//! encodings: SQL Server reports error *numbers* (`2627`, `547`, `515`),
//! PostgreSQL reports five-character *SQLSTATE* tokens (`23505`, `23503`, ...).
//! This crate relabels those signals into one closed set of named outcomes so
//! application code can branch on *what kind of constraint failed* without
//! knowing which engine raised it.
//!
//! ## Design Philosophy
//!
//! 1. **Classification is per engine**: a code is only meaningful next to the
//!    native error type that carried it
//! 2. **Unrecognized errors pass through untouched**: the same `Arc`, not a copy
//! 3. **Registration order is the tie-break**: the first validator to translate wins
//! 4. **The registry is an ordinary value**: construct one per process, per test,
//!    or use [`registry::global()`]
//!
//! ## Quick Start
//!
//! ```rust
//! # #[cfg(feature = "postgres")]
//! # {
//! use constraint_guard::{PostgresError, RawError, Resolution, SqlState, ValidatorRegistry, ViolationKind};
//! use std::sync::Arc;
//!
//! let registry = ValidatorRegistry::with_builtin();
//!
//! let raw: RawError = Arc::new(PostgresError::new(
//!     SqlState::new("23505"),
//!     "duplicate key value violates unique constraint \"users_pkey\"",
//! ));
//!
//! match registry.dispatch(raw) {
//!     Resolution::Violation(v) => assert_eq!(v.kind(), ViolationKind::PrimaryKey),
//!     Resolution::Unchanged(_) => unreachable!("23505 is a known SQLSTATE"),
//! }
//! # }
//! ```
//!
//! ## Wrapped Errors
//!
//! Native errors are often nested inside wrapper errors by the time they reach
//! application code. Validators walk the `source()` chain (see [`chain`]) down
//! to its root cause and classify it only when that root is their engine's
//! native type. A native error that carries its own source (a transport
//! failure, say) is therefore not a constraint violation. The produced
//! [`ConstraintViolation`] reports that same native instance from
//! [`Error::source`], and keeps the original wrapper available via
//! [`ConstraintViolation::cause`].
//!
//! ## Features
//!
//! - `sqlserver`: SQL Server native error type and validator (default)
//! - `postgres`: PostgreSQL native error type and validator (default)

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::error::Error;
use std::fmt;
use std::result;
use std::sync::Arc;
use zeroize::Zeroize;

pub mod chain;
pub mod codes;
pub mod convenience;
pub mod definitions;
pub mod logging;
pub mod models;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod registry;
#[cfg(feature = "sqlserver")]
pub mod sqlserver;
pub mod validator;

pub use codes::*;
pub use convenience::*;
pub use logging::*;
pub use models::*;
#[cfg(feature = "postgres")]
pub use postgres::{PostgresError, PostgresValidator};
pub use registry::{Resolution, ValidatorRegistry};
#[cfg(feature = "sqlserver")]
pub use sqlserver::{SqlServerError, SqlServerValidator};
pub use validator::*;

/// An error value entering the classification pipeline.
///
/// Shared ownership is what lets dispatch hand back the *same* instance on
/// pass-through, and lets a translated violation hold the original as its cause.
pub type RawError = Arc<dyn Error + Send + Sync + 'static>;

/// Type alias for Results whose error arm is a classified violation.
pub type Result<T> = result::Result<T, ConstraintViolation>;

/// A constraint violation recognized by one engine's validator.
///
/// # Key Properties
///
/// - `kind` is one of the four portable [`ViolationKind`]s
/// - `message` is copied from the native error and zeroized on drop
/// - `cause` is the original raw error, shared, never cloned deeply
/// - [`Error::source`] yields the native error instance that was classified
///
/// `Debug` does not print the message. Constraint messages routinely echo
/// key values (`Key (email)=(alice@example.com) already exists`); use
/// [`ConstraintViolation::message`] or [`ConstraintViolation::internal_log`]
/// when the text is wanted.
#[must_use = "constraint violations should be handled or propagated"]
pub struct ConstraintViolation {
    kind: ViolationKind,
    engine: &'static str,
    code: ErrorCode,
    message: String,
    cause: RawError,
    native_depth: usize,
}

impl ConstraintViolation {
    /// Create a violation whose native error is the root cause of `cause`.
    ///
    /// For validators that do not go through [`TableValidator`].
    pub fn new(
        kind: ViolationKind,
        engine: &'static str,
        code: impl Into<ErrorCode>,
        message: impl Into<String>,
        cause: RawError,
    ) -> Self {
        let native_depth = chain::depth(&*cause).saturating_sub(1);
        Self::from_native(kind, engine, code.into(), message.into(), cause, native_depth)
    }

    /// Create a violation whose native error sits `native_depth` links down
    /// the `source()` chain of `cause` (0 = `cause` itself).
    pub(crate) fn from_native(
        kind: ViolationKind,
        engine: &'static str,
        code: ErrorCode,
        message: String,
        cause: RawError,
        native_depth: usize,
    ) -> Self {
        Self {
            kind,
            engine,
            code,
            message,
            cause,
            native_depth,
        }
    }

    /// Portable classification of the failed constraint.
    #[inline]
    pub const fn kind(&self) -> ViolationKind {
        self.kind
    }

    /// Name of the engine whose validator produced this violation.
    #[inline]
    pub const fn engine(&self) -> &'static str {
        self.engine
    }

    /// The engine-specific code that matched.
    #[inline]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Message copied from the native error.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The raw error that was dispatched, wrappers included.
    #[inline]
    pub fn cause(&self) -> &RawError {
        &self.cause
    }

    /// The native error instance that was classified.
    pub fn native_cause(&self) -> &(dyn Error + 'static) {
        let cause: &(dyn Error + 'static) = &*self.cause;
        chain::iter(cause)
            .nth(self.native_depth)
            .unwrap_or_else(|| chain::root_cause(cause))
    }

    /// Downcast the native cause to its concrete type.
    pub fn native<E: Error + 'static>(&self) -> Option<&E> {
        self.native_cause().downcast_ref::<E>()
    }

    /// Release the violation and keep only its raw cause.
    pub fn into_cause(self) -> RawError {
        Arc::clone(&self.cause)
    }

    /// Create a structured log entry borrowing from this violation.
    ///
    /// The entry cannot outlive the violation, so the message it exposes is
    /// still subject to zeroization when the violation drops.
    #[inline]
    pub fn internal_log(&self) -> ViolationLog<'_> {
        ViolationLog {
            kind: self.kind,
            engine: self.engine,
            code: self.code,
            message: &self.message,
            chain_depth: chain::depth(&*self.cause),
        }
    }

    /// Callback-style access to [`ConstraintViolation::internal_log`].
    #[inline]
    pub fn with_internal_log<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ViolationLog<'_>) -> R,
    {
        let log = self.internal_log();
        f(&log)
    }
}

impl Drop for ConstraintViolation {
    fn drop(&mut self) {
        self.message.zeroize();
    }
}

impl fmt::Debug for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstraintViolation")
            .field("kind", &self.kind)
            .field("engine", &self.engine)
            .field("code", &self.code)
            .field("message", &"<REDACTED>")
            .field("native_depth", &self.native_depth)
            .finish()
    }
}

impl fmt::Display for ConstraintViolation {
    /// Format: "{Kind} violation ({engine} {code}): {message}"
    ///
    /// Example: "Foreign key violation (sqlserver 547): The INSERT statement conflicted..."
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} violation ({} {}): {}",
            self.kind.display_name(),
            self.engine,
            self.code,
            self.message
        )
    }
}

impl Error for ConstraintViolation {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.native_cause())
    }
}
