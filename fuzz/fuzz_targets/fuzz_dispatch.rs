//! Dispatch arbitrary native errors through the built-in registry.
//!
//! Invariants checked on every input:
//! - dispatch never panics
//! - an unrecognized error comes back as the same allocation
//! - a translated error keeps the input as its cause
//! - resolving twice equals resolving once

#![no_main]

use constraint_guard::{
    PostgresError, RawError, Resolution, SqlServerError, SqlState, ValidatorRegistry,
};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

fn native_error(data: &[u8]) -> Option<RawError> {
    let (&selector, rest) = data.split_first()?;
    let message = String::from_utf8_lossy(rest.get(5..).unwrap_or_default()).into_owned();

    if selector % 2 == 0 {
        let bytes: [u8; 4] = rest.get(..4)?.try_into().ok()?;
        Some(Arc::new(SqlServerError::new(i32::from_le_bytes(bytes), message)))
    } else {
        let token = std::str::from_utf8(rest.get(..5)?).ok()?;
        let state = SqlState::checked_new(token).ok()?;
        Some(Arc::new(
            PostgresError::new(state, message).with_constraint("fuzz_constraint"),
        ))
    }
}

fuzz_target!(|data: &[u8]| {
    let Some(input) = native_error(data) else {
        return;
    };

    let registry = ValidatorRegistry::with_builtin();

    match registry.dispatch(Arc::clone(&input)) {
        Resolution::Unchanged(output) => assert!(Arc::ptr_eq(&output, &input)),
        Resolution::Violation(violation) => {
            assert!(Arc::ptr_eq(violation.cause(), &input));
            let _ = violation.to_string();
        }
    }

    let once = registry.resolve(input);
    let twice = registry.resolve(Arc::clone(&once));
    assert!(Arc::ptr_eq(&once, &twice));
});
