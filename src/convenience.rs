//! Declaration macros and `Result` extensions.
//!
//! # Code Tables
//!
//! `define_code_table!` declares one named constant per code plus a
//! [`CodeTable`](crate::CodeTable) constant listing them, in declaration order:
//!
//! ```rust
//! use constraint_guard::{define_code_table, ViolationKind};
//!
//! define_code_table! {
//!     /// Codes of a made-up engine.
//!     pub ACME_CODES: i32 => {
//!         /// Duplicate key.
//!         ACME_DUPLICATE = 9001 => PrimaryKey,
//!         /// Dangling reference.
//!         ACME_DANGLING = 9002 => ForeignKey,
//!     }
//! }
//!
//! assert_eq!(ACME_DUPLICATE, 9001);
//! assert_eq!(ACME_CODES.lookup(&ACME_DANGLING), Some(ViolationKind::ForeignKey));
//! ```
//!
//! The macro cannot reject duplicate codes at compile time; tables declared
//! with it should get a unit test built on `CodeTable::checked_new`.
//!
//! # Resolving Results
//!
//! [`ResolveExt`] maps the error arm of a `Result` through a registry, so
//! repository code can classify at the call site:
//!
//! ```rust
//! # #[cfg(feature = "sqlserver")]
//! # {
//! use constraint_guard::{RawError, ResolveExt, SqlServerError, ValidatorRegistry};
//!
//! fn insert_order() -> Result<u64, SqlServerError> {
//!     Err(SqlServerError::new(547, "FK_Orders_Customers"))
//! }
//!
//! let registry = ValidatorRegistry::with_builtin();
//! let err: RawError = insert_order().resolve_with(&registry).unwrap_err();
//! assert!(err.is::<constraint_guard::ConstraintViolation>());
//! # }
//! ```

use crate::{registry, RawError, ValidatorRegistry};
use std::error::Error;
use std::sync::Arc;

// ============================================================================
// Table Declaration
// ============================================================================

/// Declare code constants and the table classifying them.
///
/// # Syntax
///
/// ```text
/// define_code_table! {
///     $(#[attr])* $vis TABLE_NAME: CodeType => {
///         $(#[attr])* CONST_NAME = code_expr => ViolationKindVariant,
///         ...
///     }
/// }
/// ```
///
/// Each `CONST_NAME` becomes `$vis const CONST_NAME: CodeType`, and
/// `TABLE_NAME` becomes `$vis const TABLE_NAME: CodeTable<CodeType>`.
#[macro_export]
macro_rules! define_code_table {
    (
        $(#[$meta:meta])*
        $vis:vis $table:ident : $ty:ty => {
            $( $(#[$code_meta:meta])* $name:ident = $code:expr => $kind:ident ),+ $(,)?
        }
    ) => {
        $(
            $(#[$code_meta])*
            $vis const $name: $ty = $code;
        )+

        $(#[$meta])*
        $vis const $table: $crate::CodeTable<$ty> = {
            const ENTRIES: &[($ty, $crate::ViolationKind)] = &[
                $( ($name, $crate::ViolationKind::$kind) ),+
            ];
            $crate::CodeTable::from_static(ENTRIES)
        };
    };
}

// ============================================================================
// Result Extension
// ============================================================================

/// Classify the error arm of a `Result` on the way out.
pub trait ResolveExt<T> {
    /// Resolve the error through `registry`.
    ///
    /// A recognized error becomes a [`ConstraintViolation`](crate::ConstraintViolation);
    /// anything else comes back as the original error behind an `Arc`.
    fn resolve_with(self, registry: &ValidatorRegistry) -> Result<T, RawError>;

    /// Resolve the error through [`registry::global()`].
    fn resolve_global(self) -> Result<T, RawError>;
}

// `RawError` itself implements `Error`, so a `Result<T, RawError>` would be
// wrapped a second time here. Map those with `registry.resolve` directly.
impl<T, E> ResolveExt<T> for Result<T, E>
where
    E: Error + Send + Sync + 'static,
{
    #[inline]
    fn resolve_with(self, registry: &ValidatorRegistry) -> Result<T, RawError> {
        self.map_err(|err| {
            let raw: RawError = Arc::new(err);
            registry.resolve(raw)
        })
    }

    #[inline]
    fn resolve_global(self) -> Result<T, RawError> {
        self.resolve_with(registry::global())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CodeTable, ConstraintValidator, ConstraintViolation, Outcome, ViolationKind};
    use std::io;

    define_code_table! {
        TEST_CODES: i32 => {
            FIRST = 1 => PrimaryKey,
            SECOND = 2 => CheckConstraint,
        }
    }

    /// Translates every `io::Error` as a not-null violation.
    struct IoValidator;

    impl ConstraintValidator for IoValidator {
        fn engine(&self) -> &'static str {
            "io"
        }

        fn classify(&self, error: &RawError) -> Outcome {
            if error.is::<io::Error>() {
                Outcome::Translated(ConstraintViolation::new(
                    ViolationKind::NotNull,
                    "io",
                    0,
                    "io",
                    Arc::clone(error),
                ))
            } else {
                Outcome::Unrecognized
            }
        }
    }

    #[test]
    fn macro_declares_constants_and_table() {
        assert_eq!(FIRST, 1);
        assert_eq!(SECOND, 2);
        assert_eq!(TEST_CODES.len(), 2);
        assert_eq!(TEST_CODES.lookup(&SECOND), Some(ViolationKind::CheckConstraint));
    }

    #[test]
    fn macro_table_preserves_declaration_order() {
        let codes: Vec<i32> = TEST_CODES.iter().map(|(code, _)| code).collect();
        assert_eq!(codes, vec![FIRST, SECOND]);
        assert!(CodeTable::checked_new(TEST_CODES.iter().collect()).is_ok());
    }

    #[test]
    fn resolve_with_keeps_ok_values() {
        let registry = ValidatorRegistry::new();
        registry.register(Arc::new(IoValidator));

        let ok: Result<u8, io::Error> = Ok(7);
        assert_eq!(ok.resolve_with(&registry).unwrap(), 7);
    }

    #[test]
    fn resolve_with_translates_error_arm() {
        let registry = ValidatorRegistry::new();
        registry.register(Arc::new(IoValidator));

        let failed: Result<(), io::Error> = Err(io::Error::other("null"));
        let err = failed.resolve_with(&registry).unwrap_err();

        let violation = err
            .downcast_ref::<ConstraintViolation>()
            .expect("io errors are translated");
        assert_eq!(violation.kind(), ViolationKind::NotNull);
    }

    #[test]
    fn resolve_with_empty_registry_passes_through() {
        let registry = ValidatorRegistry::new();

        let failed: Result<(), io::Error> = Err(io::Error::other("untouched"));
        let err = failed.resolve_with(&registry).unwrap_err();

        assert!(err.is::<io::Error>());
        assert_eq!(err.to_string(), "untouched");
    }
}
