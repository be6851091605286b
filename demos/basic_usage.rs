use constraint_guard::{
    PostgresError, RawError, ResolveExt, SqlState, ValidatorRegistry, ViolationKind,
};
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// What a repository layer typically wraps driver errors in.
#[derive(Debug)]
struct RepositoryError {
    operation: &'static str,
    source: RawError,
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "repository operation '{}' failed", self.operation)
    }
}

impl Error for RepositoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        let inner: &(dyn Error + 'static) = &*self.source;
        Some(inner)
    }
}

fn insert_user(email: &str) -> Result<u64, RepositoryError> {
    // Simulate the server rejecting a duplicate email
    let driver_error = PostgresError::new(
        SqlState::new("23505"),
        "duplicate key value violates unique constraint \"users_email_key\"",
    )
    .with_detail(format!("Key (email)=({}) already exists.", email))
    .with_constraint("users_email_key");

    Err(RepositoryError {
        operation: "insert_user",
        source: Arc::new(driver_error),
    })
}

fn main() {
    // 1. Build the registry once at startup and hand it to whoever talks to the database
    let registry = ValidatorRegistry::with_builtin();
    println!("--- Basic Usage Example ---\n");
    println!("Registered engines: {:?}\n", registry.engines());

    // 2. Classify at the call site
    match insert_user("alice@example.com").resolve_with(&registry) {
        Ok(id) => println!("Inserted user {}", id),
        Err(err) => match err.downcast_ref::<constraint_guard::ConstraintViolation>() {
            Some(violation) => {
                println!("1. [BRANCH] Application decides by kind:");
                let reply = match violation.kind() {
                    ViolationKind::PrimaryKey => "409 Conflict: email already registered",
                    ViolationKind::ForeignKey => "422 Unprocessable: unknown reference",
                    ViolationKind::CheckConstraint => "422 Unprocessable: invalid value",
                    ViolationKind::NotNull => "400 Bad Request: missing field",
                };
                println!("   {}", reply);

                println!("\n2. [INTERNAL LOG] What the operator sees:");
                violation.with_internal_log(|log| {
                    let mut line = String::new();
                    if log.write_to(&mut line).is_ok() {
                        println!("   {}", line);
                    }
                });

                println!("\n3. [NATIVE] Engine specifics stay reachable:");
                if let Some(native) = violation.native::<PostgresError>() {
                    println!("   SQLSTATE:   {}", native.sql_state());
                    println!("   Constraint: {}", native.constraint().unwrap_or("<none>"));
                }
            }
            None => println!("Unclassified failure: {}", err),
        },
    }
}
