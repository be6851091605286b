//! Ordered validator registry and dispatch.
//!
//! # Dispatch
//!
//! Validators are consulted in registration order; the first one to
//! translate wins and the rest are never asked. When none translates, the
//! input comes back as the *same* `Arc`, so callers can rethrow it without
//! losing identity.
//!
//! # Concurrency
//!
//! - **RwLock-based**: any number of concurrent dispatches, exclusive mutation
//! - **Snapshot dispatch**: the validator list is copied (refcount bumps only)
//!   under the read lock and classified outside it. A validator may touch the
//!   registry from inside `classify` without deadlocking, and a concurrent
//!   `register`/`unregister` is either fully visible to a dispatch or not at all
//! - **Poison recovery**: no operation leaves the list half-mutated, so a
//!   panic elsewhere while holding the lock does not disable the registry
//!
//! # Instances
//!
//! A registry is an ordinary value; `Clone` shares state. [`global()`] is a
//! process-wide instance for callers that want one, starting empty.

use crate::{ConstraintValidator, ConstraintViolation, InputError, Outcome, RawError, ViolationKind};
use once_cell::sync::Lazy;
use smallvec::SmallVec;
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Inline capacity covers the built-in engines plus a couple of custom ones.
type Validators = SmallVec<[Arc<dyn ConstraintValidator>; 4]>;

static GLOBAL_REGISTRY: Lazy<ValidatorRegistry> = Lazy::new(ValidatorRegistry::new);

/// The process-wide registry. Starts empty.
///
/// Tests should prefer their own instances: state registered here is
/// visible to every thread for the life of the process.
#[inline]
pub fn global() -> &'static ValidatorRegistry {
    &GLOBAL_REGISTRY
}

/// Outcome of dispatching one error through a registry.
#[derive(Debug)]
#[must_use = "an unchanged error still has to be propagated"]
pub enum Resolution {
    /// A validator translated the error.
    Violation(ConstraintViolation),
    /// No validator recognized the error; this is the input, unchanged.
    Unchanged(RawError),
}

impl Resolution {
    /// The error to propagate: the violation, or the original input.
    pub fn into_error(self) -> RawError {
        match self {
            Self::Violation(violation) => Arc::new(violation),
            Self::Unchanged(error) => error,
        }
    }

    /// Whether a validator translated the error.
    #[inline]
    pub const fn is_violation(&self) -> bool {
        matches!(self, Self::Violation(_))
    }

    /// The produced violation, if any.
    #[inline]
    pub fn violation(&self) -> Option<&ConstraintViolation> {
        match self {
            Self::Violation(violation) => Some(violation),
            Self::Unchanged(_) => None,
        }
    }

    /// Kind of the produced violation, if any.
    #[inline]
    pub fn kind(&self) -> Option<ViolationKind> {
        self.violation().map(ConstraintViolation::kind)
    }
}

/// Ordered collection of validators.
///
/// # Example
///
/// ```rust
/// use constraint_guard::{RawError, ValidatorRegistry};
/// use std::io;
/// use std::sync::Arc;
///
/// let registry = ValidatorRegistry::new();
/// let raw: RawError = Arc::new(io::Error::other("connection reset"));
///
/// // Nothing registered: the same instance comes back
/// let resolved = registry.resolve(Arc::clone(&raw));
/// assert!(Arc::ptr_eq(&resolved, &raw));
/// ```
#[derive(Clone, Default)]
pub struct ValidatorRegistry {
    validators: Arc<RwLock<Validators>>,
}

impl ValidatorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in validator enabled by
    /// features, SQL Server first, then PostgreSQL.
    pub fn with_builtin() -> Self {
        let registry = Self::new();
        #[cfg(feature = "sqlserver")]
        registry.register(Arc::new(crate::SqlServerValidator::new()));
        #[cfg(feature = "postgres")]
        registry.register(Arc::new(crate::PostgresValidator::new()));
        registry
    }

    #[inline]
    fn read_validators(&self) -> RwLockReadGuard<'_, Validators> {
        match self.validators.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[inline]
    fn write_validators(&self) -> RwLockWriteGuard<'_, Validators> {
        match self.validators.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Append a validator to the end of the dispatch order.
    ///
    /// The same instance may be registered more than once; it is then
    /// consulted at each position.
    pub fn register(&self, validator: Arc<dyn ConstraintValidator>) {
        self.write_validators().push(validator);
    }

    /// Remove the first registration of exactly this instance.
    ///
    /// Matching is by pointer identity: a different instance with the same
    /// engine and table is left in place. Returns whether anything was
    /// removed. Remaining validators keep their relative order.
    pub fn unregister<V>(&self, validator: &Arc<V>) -> bool
    where
        V: ConstraintValidator + ?Sized,
    {
        let target = Arc::as_ptr(validator).cast::<()>();
        let mut validators = self.write_validators();

        match validators
            .iter()
            .position(|registered| Arc::as_ptr(registered).cast::<()>() == target)
        {
            Some(index) => {
                validators.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove every validator.
    pub fn clear(&self) {
        self.write_validators().clear();
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.read_validators().len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.read_validators().is_empty()
    }

    /// Engine names in dispatch order.
    pub fn engines(&self) -> Vec<&'static str> {
        self.read_validators().iter().map(|v| v.engine()).collect()
    }

    /// Classify `error` with the first validator that recognizes it.
    pub fn dispatch(&self, error: RawError) -> Resolution {
        let snapshot: Validators = self.read_validators().clone();

        for validator in &snapshot {
            if let Outcome::Translated(violation) = validator.classify(&error) {
                return Resolution::Violation(violation);
            }
        }
        Resolution::Unchanged(error)
    }

    /// Dispatch and return the error to propagate.
    ///
    /// Idempotent: resolving an already-resolved error returns it unchanged.
    #[inline]
    pub fn resolve(&self, error: RawError) -> RawError {
        self.dispatch(error).into_error()
    }

    /// [`dispatch`](Self::dispatch) for an error that may be absent.
    ///
    /// # Errors
    ///
    /// Returns `InputError::MissingError` when `error` is `None`.
    pub fn try_dispatch(&self, error: Option<RawError>) -> Result<Resolution, InputError> {
        error
            .map(|error| self.dispatch(error))
            .ok_or(InputError::MissingError {
                operation: "dispatch",
            })
    }

    /// [`resolve`](Self::resolve) for an error that may be absent.
    ///
    /// # Errors
    ///
    /// Returns `InputError::MissingError` when `error` is `None`.
    pub fn try_resolve(&self, error: Option<RawError>) -> Result<RawError, InputError> {
        error
            .map(|error| self.resolve(error))
            .ok_or(InputError::MissingError {
                operation: "resolve",
            })
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("engines", &self.engines())
            .finish()
    }
}
