use constraint_guard::{
    define_code_table, NativeError, RawError, SqlServerError,
    SqlServerValidator, TableValidator, ValidatorRegistry, ViolationKind,
};
use std::error::Error;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// A third engine, plugged in without touching the crate
// ============================================================================

/// Error type of a hypothetical embedded database client.
#[derive(Debug)]
struct EmbeddedError {
    extended_code: i32,
    message: String,
}

impl fmt::Display for EmbeddedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "embedded error {}: {}", self.extended_code, self.message)
    }
}

impl Error for EmbeddedError {}

impl NativeError for EmbeddedError {
    type Code = i32;
    const ENGINE: &'static str = "embedded";

    fn code(&self) -> i32 {
        self.extended_code
    }

    fn message(&self) -> &str {
        &self.message
    }
}

define_code_table! {
    /// Extended result codes of the embedded engine.
    EMBEDDED_CODES: i32 => {
        /// Primary key constraint failed.
        CONSTRAINT_PRIMARYKEY = 1555 => PrimaryKey,
        /// Foreign key constraint failed.
        CONSTRAINT_FOREIGNKEY = 787 => ForeignKey,
        /// CHECK constraint failed.
        CONSTRAINT_CHECK = 275 => CheckConstraint,
        /// NOT NULL constraint failed.
        CONSTRAINT_NOTNULL = 1299 => NotNull,
    }
}

fn main() {
    println!("--- Custom Engine Example ---\n");

    // 1. Static table declared with the macro
    let embedded: TableValidator<EmbeddedError> = TableValidator::with_table(EMBEDDED_CODES);
    let registry = ValidatorRegistry::with_builtin();
    registry.register(Arc::new(embedded));
    println!("1. Engines in dispatch order: {:?}", registry.engines());

    let raw: RawError = Arc::new(EmbeddedError {
        extended_code: CONSTRAINT_NOTNULL,
        message: "NOT NULL constraint failed: orders.customer_id".to_string(),
    });
    println!("   {} -> {:?}", raw, registry.dispatch(raw.clone()).kind());

    // 2. Table supplied at runtime, e.g. from configuration. This schema has
    //    no foreign keys, so SQL Server 547 can only be a CHECK failure.
    let schema_specific = match SqlServerValidator::checked_from_entries(vec![
        (2627, ViolationKind::PrimaryKey),
        (2601, ViolationKind::PrimaryKey),
        (547, ViolationKind::CheckConstraint),
        (515, ViolationKind::NotNull),
    ]) {
        Ok(validator) => Arc::new(validator),
        Err(err) => {
            println!("Rejected table: {}", err);
            return;
        }
    };

    // 3. Registration order is precedence: the more specific table goes first
    let check_failed: RawError = Arc::new(SqlServerError::new(
        547,
        "The UPDATE statement conflicted with the CHECK constraint \"CK_Orders_Qty\".",
    ));

    let builtin_first = ValidatorRegistry::with_builtin();
    builtin_first.register(schema_specific.clone());

    let specific_first = ValidatorRegistry::new();
    specific_first.register(schema_specific.clone());
    specific_first.register(Arc::new(SqlServerValidator::new()));

    println!("\n2. Same error, two registration orders:");
    println!("   built-in first: {:?}", builtin_first.dispatch(check_failed.clone()).kind());
    println!("   specific first: {:?}", specific_first.dispatch(check_failed.clone()).kind());

    // 4. Removing the specific table is by identity; the built-in one takes over
    let removed = specific_first.unregister(&schema_specific);
    println!(
        "\n3. Unregistered specific table: {}, 547 now -> {:?}",
        removed,
        specific_first.dispatch(check_failed).kind()
    );
}
