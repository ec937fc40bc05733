//! Fuzz target for settings.json parsing and validation.
//!
//! Tests that settings parsing handles arbitrary input without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use riser_config::{validate_settings, Settings};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(settings) = Settings::from_json(text) {
        let _ = validate_settings(&settings);
    }
});
