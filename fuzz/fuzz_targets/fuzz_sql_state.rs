//! SQLSTATE parsing must be total: arbitrary text either parses into an
//! five-character token spelled exactly as given or is rejected, never panics.

#![no_main]

use constraint_guard::SqlState;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(state) = SqlState::checked_new(text) {
        assert_eq!(state.as_str(), text);
        assert_eq!(state.class().len(), 2);
    }
});
