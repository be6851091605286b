//! Portable violation kinds and per-validator outcomes.

use crate::ConstraintViolation;
use std::fmt;

/// Closed set of portable constraint-violation classifications.
///
/// Each kind is purely semantic and carries no engine data. Adding a kind is
/// a breaking change by intent: callers match on this enum exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// Duplicate value for a primary key or unique constraint.
    PrimaryKey,
    /// Referenced row missing, or referencing rows still present.
    ForeignKey,
    /// A CHECK constraint evaluated to false.
    CheckConstraint,
    /// NULL written to a NOT NULL column.
    NotNull,
}

impl ViolationKind {
    /// Every kind, in declaration order.
    pub const ALL: [ViolationKind; 4] = [
        Self::PrimaryKey,
        Self::ForeignKey,
        Self::CheckConstraint,
        Self::NotNull,
    ];

    /// Human-readable name, e.g. "Primary key".
    #[inline]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::PrimaryKey => "Primary key",
            Self::ForeignKey => "Foreign key",
            Self::CheckConstraint => "Check constraint",
            Self::NotNull => "Not null",
        }
    }

    /// Stable snake_case identifier for structured sinks.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PrimaryKey => "primary_key",
            Self::ForeignKey => "foreign_key",
            Self::CheckConstraint => "check_constraint",
            Self::NotNull => "not_null",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Result of asking one validator to classify one error.
///
/// `Unrecognized` is a valid negative answer, not a failure: the error is
/// either not this engine's native type, or its code is not in the table.
#[derive(Debug)]
#[must_use = "an unrecognized outcome means the original error must still be propagated"]
pub enum Outcome {
    /// The validator recognized the error.
    Translated(ConstraintViolation),
    /// The validator does not apply to this error.
    Unrecognized,
}

impl Outcome {
    /// Whether a violation was produced.
    #[inline]
    pub const fn is_translated(&self) -> bool {
        matches!(self, Self::Translated(_))
    }

    /// Kind of the produced violation.
    #[inline]
    pub fn kind(&self) -> Option<ViolationKind> {
        match self {
            Self::Translated(violation) => Some(violation.kind()),
            Self::Unrecognized => None,
        }
    }

    /// Take the produced violation.
    #[inline]
    pub fn into_violation(self) -> Option<ConstraintViolation> {
        match self {
            Self::Translated(violation) => Some(violation),
            Self::Unrecognized => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RawError;
    use std::io;
    use std::sync::Arc;

    #[test]
    fn kinds_have_distinct_identifiers() {
        let mut ids: Vec<_> = ViolationKind::ALL.iter().map(|k| k.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), ViolationKind::ALL.len());
    }

    #[test]
    fn display_uses_display_name() {
        assert_eq!(ViolationKind::CheckConstraint.to_string(), "Check constraint");
    }

    #[test]
    fn outcome_accessors() {
        let raw: RawError = Arc::new(io::Error::other("fk"));
        let translated = Outcome::Translated(ConstraintViolation::new(
            ViolationKind::ForeignKey,
            "test",
            547,
            "fk",
            raw,
        ));

        assert!(translated.is_translated());
        assert_eq!(translated.kind(), Some(ViolationKind::ForeignKey));
        assert!(translated.into_violation().is_some());

        assert!(!Outcome::Unrecognized.is_translated());
        assert_eq!(Outcome::Unrecognized.kind(), None);
        assert!(Outcome::Unrecognized.into_violation().is_none());
    }
}
