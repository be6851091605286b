//! PostgreSQL native error and validator.
//!
//! PostgreSQL identifies failures by a five-character SQLSTATE. Besides the
//! primary message, the server usually reports a `DETAIL` line (which echoes
//! the offending key values) and the name of the violated constraint; both
//! are kept here so adapters lose nothing when converting driver errors.

use crate::definitions::postgres::POSTGRES_CODES;
use crate::{NativeError, SqlState, TableValidator};
use std::error::Error;
use std::fmt;
use zeroize::Zeroize;

/// Validator recognizing [`PostgresError`] by SQLSTATE.
pub type PostgresValidator = TableValidator<PostgresError>;

impl TableValidator<PostgresError> {
    /// Validator over the built-in PostgreSQL table.
    #[inline]
    pub const fn new() -> Self {
        Self::with_table(POSTGRES_CODES)
    }
}

impl Default for TableValidator<PostgresError> {
    fn default() -> Self {
        Self::new()
    }
}

/// An error reported by a PostgreSQL server.
///
/// Message and detail are zeroized on drop.
pub struct PostgresError {
    sql_state: SqlState,
    message: String,
    detail: Option<String>,
    constraint: Option<String>,
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

impl PostgresError {
    /// Create an error with the given SQLSTATE and primary message.
    pub fn new(sql_state: SqlState, message: impl Into<String>) -> Self {
        Self {
            sql_state,
            message: message.into(),
            detail: None,
            constraint: None,
            source: None,
        }
    }

    /// Attach the server's `DETAIL` field.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Attach the name of the violated constraint.
    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraint = Some(constraint.into());
        self
    }

    /// Attach an underlying cause.
    pub fn with_source(mut self, source: impl Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// The SQLSTATE.
    #[inline]
    pub const fn sql_state(&self) -> SqlState {
        self.sql_state
    }

    /// The primary message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The `DETAIL` field, if the server sent one.
    #[inline]
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// The violated constraint's name, if the server sent one.
    #[inline]
    pub fn constraint(&self) -> Option<&str> {
        self.constraint.as_deref()
    }

    /// Whether the SQLSTATE is in class 23 (integrity constraint violation).
    ///
    /// True for codes the built-in table does not classify, such as `23001`.
    #[inline]
    pub fn is_integrity_violation(&self) -> bool {
        self.sql_state.class() == "23"
    }
}

impl Drop for PostgresError {
    fn drop(&mut self) {
        self.message.zeroize();
        if let Some(detail) = self.detail.as_mut() {
            detail.zeroize();
        }
    }
}

impl fmt::Debug for PostgresError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresError")
            .field("sql_state", &self.sql_state)
            .field("message", &"<REDACTED>")
            .field("constraint", &self.constraint)
            .field("has_source", &self.source.is_some())
            .finish()
    }
}

impl fmt::Display for PostgresError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.sql_state, self.message)
    }
}

impl Error for PostgresError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn Error + 'static))
    }
}

impl NativeError for PostgresError {
    type Code = SqlState;
    const ENGINE: &'static str = "postgres";

    #[inline]
    fn code(&self) -> SqlState {
        self.sql_state
    }

    #[inline]
    fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{chain, ConstraintValidator, ErrorCode, RawError, ViolationKind};
    use std::io;
    use std::sync::Arc;

    #[derive(Debug)]
    struct QueryFailed(RawError);

    impl fmt::Display for QueryFailed {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("query failed")
        }
    }

    impl Error for QueryFailed {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            let inner: &(dyn Error + 'static) = &*self.0;
            Some(inner)
        }
    }

    fn classify(state: &str) -> Option<ViolationKind> {
        let state = SqlState::checked_new(state).unwrap();
        let raw: RawError = Arc::new(PostgresError::new(state, "server says no"));
        PostgresValidator::new().classify(&raw).kind()
    }

    #[test]
    fn maps_builtin_states() {
        assert_eq!(classify("23505"), Some(ViolationKind::PrimaryKey));
        assert_eq!(classify("23503"), Some(ViolationKind::ForeignKey));
        assert_eq!(classify("23514"), Some(ViolationKind::CheckConstraint));
        assert_eq!(classify("23502"), Some(ViolationKind::NotNull));
    }

    #[test]
    fn other_states_are_unrecognized() {
        assert_eq!(classify("23001"), None);
        assert_eq!(classify("42P01"), None);
        assert_eq!(classify("40001"), None);
    }

    #[test]
    fn violation_keeps_primary_message() {
        let raw: RawError = Arc::new(
            PostgresError::new(
                SqlState::new("23505"),
                "duplicate key value violates unique constraint \"users_email_key\"",
            )
            .with_detail("Key (email)=(alice@example.com) already exists.")
            .with_constraint("users_email_key"),
        );

        let violation = PostgresValidator::default()
            .classify(&raw)
            .into_violation()
            .expect("23505 is mapped");

        assert_eq!(violation.engine(), "postgres");
        assert_eq!(violation.code(), ErrorCode::State(SqlState::new("23505")));
        assert!(violation.message().starts_with("duplicate key value"));
        assert!(!violation.message().contains("alice"));

        let native = violation.native::<PostgresError>().expect("native is postgres");
        assert_eq!(native.constraint(), Some("users_email_key"));
        assert!(native.detail().is_some_and(|d| d.contains("alice")));
    }

    #[test]
    fn integrity_class_detection() {
        assert!(PostgresError::new(SqlState::new("23001"), "restrict").is_integrity_violation());
        assert!(!PostgresError::new(SqlState::new("42601"), "syntax").is_integrity_violation());
    }

    #[test]
    fn display_leads_with_sql_state() {
        let err = PostgresError::new(SqlState::new("23502"), "null value in column \"name\"");
        assert_eq!(err.to_string(), "23502: null value in column \"name\"");
    }

    #[test]
    fn debug_hides_message_keeps_constraint() {
        let err = PostgresError::new(SqlState::new("23514"), "value 42 fails check")
            .with_constraint("orders_qty_check");
        let debug = format!("{:?}", err);
        assert!(debug.contains("orders_qty_check"));
        assert!(!debug.contains("value 42"));
    }

    #[test]
    fn native_with_transport_root_is_unrecognized() {
        let raw: RawError = Arc::new(
            PostgresError::new(SqlState::new("23505"), "dup")
                .with_source(io::Error::other("connection reset")),
        );
        assert!(chain::root_cause(&*raw).is::<io::Error>());
        assert!(!PostgresValidator::new().classify(&raw).is_translated());
    }

    #[test]
    fn wrapped_native_root_is_translated() {
        let native: RawError = Arc::new(PostgresError::new(SqlState::new("23503"), "fk"));
        let raw: RawError = Arc::new(QueryFailed(native));

        let violation = PostgresValidator::new()
            .classify(&raw)
            .into_violation()
            .expect("23503 is mapped");

        assert_eq!(violation.kind(), ViolationKind::ForeignKey);
        assert!(Arc::ptr_eq(violation.cause(), &raw));
        assert_eq!(
            violation.native::<PostgresError>().map(|e| e.sql_state()),
            Some(SqlState::new("23503"))
        );
    }
}
