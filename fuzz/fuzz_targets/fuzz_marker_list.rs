//! Fuzz target for marker list parsing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use riser_core::markers::parse_marker_list;
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(entries) = parse_marker_list(text, Path::new("/base"), Path::new("list.txt")) {
        for entry in entries {
            assert!(!entry.name.is_empty());
        }
    }
});
