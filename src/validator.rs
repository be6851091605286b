//! The validator capability and the table-driven per-engine classifier.
//!
//! # Layers
//!
//! - [`ConstraintValidator`]: what the registry sees. One polymorphic
//!   `classify` operation, implemented by any number of engines.
//! - [`NativeError`]: what an engine's client error must expose. Its code,
//!   its message, and (through `'static` + `Any`) its type identity.
//! - [`TableValidator`]: the classifier shared by every table-driven engine.
//!   Finds the native error in the chain, looks its code up, done.
//!
//! New engines implement `NativeError` for their client error type and get a
//! validator for free; engines needing logic beyond a table implement
//! `ConstraintValidator` directly.

use crate::{chain, CodeTable, CodeTableError, ConstraintViolation, ErrorCode, Outcome, RawError, ViolationKind};
use std::error::Error;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A single-engine classifier.
///
/// # Contract
///
/// - `classify` never fails: an error it does not recognize is
///   `Outcome::Unrecognized`
/// - `classify` has no side effects; the same input yields the same outcome
/// - A translated outcome holds `error` (the same `Arc`) as its cause
pub trait ConstraintValidator: Send + Sync {
    /// Name of the engine this validator recognizes.
    fn engine(&self) -> &'static str;

    /// Classify `error`.
    fn classify(&self, error: &RawError) -> Outcome;

    /// Classify an error that may be absent.
    ///
    /// # Errors
    ///
    /// Returns `InputError::MissingError` when `error` is `None`. This is a
    /// caller bug, not an unrecognized error.
    fn try_classify(&self, error: Option<&RawError>) -> Result<Outcome, InputError> {
        error
            .map(|error| self.classify(error))
            .ok_or(InputError::MissingError {
                operation: "classify",
            })
    }
}

/// Capability a native database client error exposes to its validator.
pub trait NativeError: Error + Send + Sync + 'static {
    /// Engine-specific code type.
    type Code: Copy + Eq + fmt::Debug + Into<ErrorCode> + Send + Sync + 'static;

    /// Engine name reported on produced violations.
    const ENGINE: &'static str;

    /// The code this error carries.
    fn code(&self) -> Self::Code;

    /// Human-readable message, copied into produced violations.
    fn message(&self) -> &str;
}

/// Input-validation failure raised before any classification happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    /// No error value was supplied.
    MissingError {
        /// Operation that required the error.
        operation: &'static str,
    },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingError { operation } => {
                write!(f, "{} requires an error value, got none", operation)
            }
        }
    }
}

impl Error for InputError {}

/// Table-driven classifier for native error type `E`.
///
/// # Classification
///
/// 1. Walk the `source()` chain of the input to its root cause (see [`chain`])
/// 2. Downcast the root to `E`; any other type means `Unrecognized`
/// 3. Look its code up by exact equality; no entry means `Unrecognized`
/// 4. Otherwise produce a violation with the native message and the input as cause
///
/// Engines that coincidentally share codes never collide: step 2 gates on
/// the native type before any code is read.
pub struct TableValidator<E: NativeError> {
    table: CodeTable<E::Code>,
    _native: PhantomData<fn() -> E>,
}

impl<E: NativeError> TableValidator<E> {
    /// Validator over an existing table.
    #[inline]
    pub const fn with_table(table: CodeTable<E::Code>) -> Self {
        Self {
            table,
            _native: PhantomData,
        }
    }

    /// Validator over a table supplied at runtime.
    ///
    /// # Errors
    ///
    /// Returns `CodeTableError::DuplicateCode` if a code is listed twice.
    pub fn checked_from_entries(
        entries: Vec<(E::Code, ViolationKind)>,
    ) -> Result<Self, CodeTableError> {
        CodeTable::checked_new(entries).map(Self::with_table)
    }

    /// The table this validator consults.
    #[inline]
    pub fn table(&self) -> &CodeTable<E::Code> {
        &self.table
    }

    /// Classify an already-extracted native error.
    #[inline]
    pub fn kind_of(&self, native: &E) -> Option<ViolationKind> {
        self.table.lookup(&native.code())
    }
}

impl<E: NativeError> ConstraintValidator for TableValidator<E> {
    fn engine(&self) -> &'static str {
        E::ENGINE
    }

    fn classify(&self, error: &RawError) -> Outcome {
        let root = chain::root_cause(&**error);
        let Some(native) = root.downcast_ref::<E>() else {
            return Outcome::Unrecognized;
        };
        let depth = chain::depth(&**error).saturating_sub(1);

        match self.kind_of(native) {
            Some(kind) => Outcome::Translated(ConstraintViolation::from_native(
                kind,
                E::ENGINE,
                native.code().into(),
                native.message().to_owned(),
                Arc::clone(error),
                depth,
            )),
            None => Outcome::Unrecognized,
        }
    }
}

impl<E: NativeError> Clone for TableValidator<E> {
    fn clone(&self) -> Self {
        Self::with_table(self.table.clone())
    }
}

impl<E: NativeError> fmt::Debug for TableValidator<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableValidator")
            .field("engine", &E::ENGINE)
            .field("codes", &self.table.len())
            .finish()
    }
}
